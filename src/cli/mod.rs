use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use mztab::error::Level;

mod config;
mod info;
mod validate;

/// mzTab - validating reader for mzTab 1.0 files
#[derive(Parser)]
#[command(name = "mztab")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Lowest severity reported by the validator.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum LevelArg {
    /// Report warnings and errors
    #[default]
    Warn,
    /// Report errors only
    Error,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Warn => Level::Warn,
            LevelArg::Error => Level::Error,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an mzTab file and print a report
    Validate {
        /// Input mzTab file (plain or gzip-compressed)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Lowest severity to report (default: warn, or the config file value)
        #[arg(short = 'l', long, value_enum)]
        level: Option<LevelArg>,

        /// Stop after this many errors (default: 300, or the config file value)
        #[arg(short = 'm', long)]
        max_errors: Option<usize>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Display a summary of an mzTab file
    Info {
        /// Input mzTab file (plain or gzip-compressed)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the metadata block as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Validate {
            file,
            level,
            max_errors,
            config,
        } => validate::run(file, level.map(Level::from), max_errors, config),
        Commands::Info { file, json } => info::run(file, json),
    }
}
