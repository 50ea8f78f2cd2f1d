//! ## flowtuple-cli
//! Command-line front end for reading flowtuple files.
//!
//! ```text
//! flowtuple dump data.flowtuple.cors.gz --limit 10
//! flowtuple summary data.flowtuple.cors.gz
//! flowtuple validate data.flowtuple.cors --compression none
//! ```

use clap::Parser;

mod commands;
mod input;
mod report;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run_command(cli)
}
