//! # mzTab Validator
//!
//! A command-line tool for checking mzTab 1.0 files.
//!
//! ## Usage
//!
//! ```bash
//! # Validate a file, reporting warnings and errors
//! mztab validate results.mzTab
//!
//! # Only fail on errors, with settings from a config file
//! mztab validate results.mzTab.gz --level error --config mztab.toml
//!
//! # Summarise a file
//! mztab info results.mzTab
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
