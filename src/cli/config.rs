//! TOML configuration file support.
//!
//! Settings shared across runs can live in a config file instead of flags:
//!
//! ```toml
//! # mztab.toml
//! [validation]
//! level = "error"
//! max_errors = 1000
//! validate_integrity = true
//! ```
//!
//! Flags given on the command line take precedence.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use mztab::error::Level;
use mztab::parser::ParserConfig;

/// Root configuration structure for mztab.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Configuration for the validate command.
#[derive(Debug, Default, Deserialize)]
pub struct ValidationConfig {
    /// Lowest severity to report.
    pub level: Option<Level>,

    /// Capacity of the error list.
    pub max_errors: Option<usize>,

    /// Run the mode and type dependent column rules.
    pub validate_integrity: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Resolve parser settings; explicit overrides win over file values.
    pub fn parser_config(&self, level: Option<Level>, max_errors: Option<usize>) -> ParserConfig {
        let defaults = ParserConfig::default();
        ParserConfig {
            level: level.or(self.validation.level).unwrap_or(defaults.level),
            max_errors: max_errors
                .or(self.validation.max_errors)
                .unwrap_or(defaults.max_errors),
            validate_integrity: self
                .validation
                .validate_integrity
                .unwrap_or(defaults.validate_integrity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [validation]
            level = "error"
            max_errors = 1000
            validate_integrity = false
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.validation.level, Some(Level::Error));
        assert_eq!(config.validation.max_errors, Some(1_000));
        assert_eq!(config.validation.validate_integrity, Some(false));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [validation]
            max_errors = 10
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.validation.max_errors, Some(10));
        assert_eq!(config.validation.level, None);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.validation.level, None);
        assert_eq!(config.parser_config(None, None), ParserConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let config = Config::from_str("[validation]\nlevel = \"error\"\nmax_errors = 5\n").unwrap();
        let resolved = config.parser_config(Some(Level::Warn), None);
        assert_eq!(resolved.level, Level::Warn);
        assert_eq!(resolved.max_errors, 5);
        assert!(resolved.validate_integrity);
    }
}
