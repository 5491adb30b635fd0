use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use mztab::error::{Level, ParseError};
use mztab::parser::{self, MzTabParser};
use mztab::validator::ValidationReport;

use super::config::Config;

/// Validate an mzTab file
pub fn run(
    file: PathBuf,
    level: Option<Level>,
    max_errors: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let config = match config_path {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };
    let parser_config = config.parser_config(level, max_errors);

    info!("mzTab Validator");
    info!("===============");
    info!("File: {}", file.display());
    info!("Level: {}", parser_config.level);
    info!("Max errors: {}", parser_config.max_errors);

    let reader = parser::open(&file)
        .with_context(|| format!("Failed to open {}", file.display()))?;

    let level = parser_config.level;
    let mut parser = MzTabParser::new(parser_config);
    let aborted = match parser
        .parse_all(reader)
        .and_then(|()| parser.end_of_input())
    {
        Ok(()) => None,
        Err(ParseError::IoError(e)) => {
            return Err(e).with_context(|| format!("Failed to read {}", file.display()));
        }
        Err(e) => Some(e),
    };

    let report = ValidationReport::from_errors(
        file.display().to_string(),
        level,
        parser.errors(),
        aborted.as_ref(),
    );

    // Use colorized output if available
    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    // Exit with error code if validation failed
    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
