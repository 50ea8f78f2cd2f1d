//! ## flowtuple-telemetry::logging
//! Structured logging with `tracing`.
//!
//! Log output goes to stderr so decoded records on stdout stay clean.

use std::path::Path;

use tracing::{info_span, Span};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, Debug)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. `RUST_LOG` overrides `default_level`.
    pub fn init(default_level: &str) -> Result<(), TryInitError> {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .finish()
            .try_init()
    }

    /// Span covering the decoding of one input file.
    pub fn file_span(path: &Path) -> Span {
        info_span!("flowtuple_file", path = %path.display())
    }

    /// Logs the totals of a finished run.
    pub fn log_totals(intervals: u64, classes: u64, records: u64, packets: u64) {
        tracing::info!(intervals, classes, records, packets, "Finished decoding");
    }
}
