use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use flowtuple_config::FlowtupleConfig;
use flowtuple_protocols::{DiagnosticSink, FlowtupleReader, TracingSink, WriterSink};
use flowtuple_telemetry::{EventLogger, MetricsRecorder};
use validator::Validate;

use crate::input::{self, Compression, Input};
use crate::report::{self, DumpFormat, Totals};

#[derive(Parser)]
#[command(name = "flowtuple", version, about = "Read binary flowtuple files")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Configuration file; defaults to config/flowtuple.yaml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Input compression, overriding the configuration
    #[arg(long, global = true, value_enum)]
    pub compression: Option<Compression>,
    /// Log interval and class details while decoding
    #[arg(long, global = true)]
    pub diagnostics: bool,
    /// Print prometheus metrics when done
    #[arg(long, global = true)]
    pub metrics: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every record as a pipe-delimited line
    Dump(DumpArgs),
    /// Print per-class record and packet counts
    Summary(FileArgs),
    /// Check every marker in the file and report totals
    Validate(FileArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DumpArgs {
    pub file: PathBuf,
    /// Stop after this many records
    #[arg(short, long)]
    pub limit: Option<u64>,
    /// Also print interval and class boundaries
    #[arg(long)]
    pub events: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FileArgs {
    pub file: PathBuf,
}

fn load_config(global: &GlobalArgs) -> anyhow::Result<FlowtupleConfig> {
    let mut config = match &global.config {
        Some(path) => FlowtupleConfig::load_from_path(path)?,
        None => FlowtupleConfig::load()?,
    };
    if let Some(compression) = global.compression {
        config.input.compression = match compression {
            Compression::Auto => "auto",
            Compression::Gzip => "gzip",
            Compression::None => "none",
        }
        .to_string();
    }
    config.telemetry.diagnostics |= global.diagnostics;
    config.telemetry.metrics |= global.metrics;
    config.validate().context("validating configuration")?;
    Ok(config)
}

fn make_sink(config: &FlowtupleConfig) -> anyhow::Result<Option<Box<dyn DiagnosticSink + Send>>> {
    if let Some(path) = &config.telemetry.diagnostics_file {
        let file = File::create(path)
            .with_context(|| format!("creating diagnostics file {}", path.display()))?;
        return Ok(Some(Box::new(WriterSink::new(BufWriter::new(file)))));
    }
    if config.telemetry.diagnostics {
        return Ok(Some(Box::new(TracingSink::new())));
    }
    Ok(None)
}

fn open_reader(path: &Path, config: &FlowtupleConfig) -> anyhow::Result<FlowtupleReader<Input>> {
    let compression = config.input.compression.parse()?;
    let source = input::open_input(path, compression, config.input.buffer_size)?;
    let reader = FlowtupleReader::new(source);
    Ok(match make_sink(config)? {
        Some(sink) => reader.with_sink(sink),
        None => reader,
    })
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.global)?;
    if let Err(err) = EventLogger::init(&config.telemetry.log_level) {
        eprintln!("logging already initialised: {err}");
    }
    let metrics = if config.telemetry.metrics {
        Some(MetricsRecorder::new().context("registering metrics")?)
    } else {
        None
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let totals: Totals = match &cli.command {
        Commands::Dump(args) => {
            let _span = EventLogger::file_span(&args.file).entered();
            let format = if args.events || config.output.format == "events" {
                DumpFormat::Events
            } else {
                DumpFormat::Records
            };
            let limit = args.limit.or(config.output.limit);
            let reader = open_reader(&args.file, &config)?;
            report::dump(reader, &mut out, format, limit, metrics.as_ref())
                .with_context(|| format!("decoding {}", args.file.display()))?
        }
        Commands::Summary(args) => {
            let _span = EventLogger::file_span(&args.file).entered();
            let reader = open_reader(&args.file, &config)?;
            let (rows, totals) = report::summarize(reader, metrics.as_ref())
                .with_context(|| format!("decoding {}", args.file.display()))?;
            report::write_summary(&mut out, &rows)?;
            totals
        }
        Commands::Validate(args) => {
            let _span = EventLogger::file_span(&args.file).entered();
            let reader = open_reader(&args.file, &config)?;
            let totals = report::validate(reader, metrics.as_ref())
                .with_context(|| format!("validating {}", args.file.display()))?;
            writeln!(
                out,
                "OK: {} intervals, {} classes, {} records, {} packets",
                totals.intervals, totals.classes, totals.records, totals.packets
            )?;
            totals
        }
    };

    EventLogger::log_totals(totals.intervals, totals.classes, totals.records, totals.packets);

    if let Some(metrics) = &metrics {
        out.write_all(metrics.gather_metrics()?.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}
