use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::error::{Level, MzTabError, MzTabErrorList, ParseError};

/// Result status of one check group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// No violation
    Ok,
    /// Only Warn-level violations
    Warning(String),
    /// At least one Error-level violation, or the parse aborted
    Failed(String),
}

impl CheckStatus {
    fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }

    fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed(_))
    }
}

/// One group of related checks
#[derive(Debug, Clone)]
pub struct ValidationCheck {
    /// Group name
    pub name: String,
    /// Outcome
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }
}

/// Check groups by error code block
const GROUPS: [(&str, u16, u16); 5] = [
    ("Document structure", 1000, 1100),
    ("Header lines", 1100, 1200),
    ("Metadata lines", 1200, 1300),
    ("Data lines", 1300, 2000),
    ("Cross-references and mandatory elements", 2000, 3000),
];

/// Human-readable outcome of validating one mzTab file
#[derive(Debug)]
pub struct ValidationReport {
    /// Check group results
    pub checks: Vec<ValidationCheck>,
    /// Every reported violation, fatal error last
    pub errors: Vec<MzTabError>,
    /// Path of the file that was validated
    pub file_path: String,
    /// Acceptance threshold
    pub level: Level,
}

impl ValidationReport {
    /// Create an empty report
    pub fn new(file_path: impl Into<String>, level: Level) -> Self {
        Self {
            checks: Vec::new(),
            errors: Vec::new(),
            file_path: file_path.into(),
            level,
        }
    }

    /// Build a report from the accumulated error list and the parse outcome
    pub fn from_errors(
        file_path: impl Into<String>,
        level: Level,
        errors: &MzTabErrorList,
        aborted: Option<&ParseError>,
    ) -> Self {
        let mut report = Self::new(file_path, level);
        report.errors = errors.at_or_above(level).cloned().collect();
        let fatal = aborted.and_then(ParseError::as_mztab_error);
        if let Some(fatal) = fatal {
            report.errors.push(fatal.clone());
        }

        for (name, low, high) in GROUPS {
            let in_group: Vec<&MzTabError> = report
                .errors
                .iter()
                .filter(|e| (low..high).contains(&e.code()))
                .collect();
            let failures = in_group.iter().filter(|e| e.level() == Level::Error).count();
            let warnings = in_group.len() - failures;
            let check = if failures > 0 {
                ValidationCheck::failed(name, format!("{} error(s), {} warning(s)", failures, warnings))
            } else if warnings > 0 {
                ValidationCheck::warning(name, format!("{} warning(s)", warnings))
            } else {
                ValidationCheck::ok(name)
            };
            report.add_check(check);
        }

        if let Some(err) = aborted.filter(|_| fatal.is_none()) {
            report.add_check(ValidationCheck::failed("Parse", err.to_string()));
        }
        report
    }

    /// Add a check result
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// Check if any check group failed
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_failed())
    }

    /// Check if any check group produced warnings
    pub fn has_warnings(&self) -> bool {
        self.checks
            .iter()
            .any(|c| matches!(c.status, CheckStatus::Warning(_)))
    }

    /// Count of passing groups
    pub fn success_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_ok()).count()
    }

    /// Count of groups with warnings only
    pub fn warning_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| matches!(c.status, CheckStatus::Warning(_)))
            .count()
    }

    /// Count of failed groups
    pub fn failure_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_failed()).count()
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();

            output.push_str(&format!("{}\n", style("mzTab Validation Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("=======================").cyan()));
            output.push_str(&format!("{}: {}\n", style("File").bold(), self.file_path));
            output.push_str(&format!("{}: {}\n\n", style("Level").bold(), self.level));

            for check in &self.checks {
                let (symbol, color_fn): (_, fn(&str) -> console::StyledObject<&str>) =
                    match &check.status {
                        CheckStatus::Ok => (OK, |s| style(s).green()),
                        CheckStatus::Warning(_) => (WARN, |s| style(s).yellow()),
                        CheckStatus::Failed(_) => (FAIL, |s| style(s).red()),
                    };

                output.push_str(&format!("[{}] {}", symbol, color_fn(&check.name)));

                match &check.status {
                    CheckStatus::Ok => output.push('\n'),
                    CheckStatus::Warning(msg) => {
                        output.push_str(&format!(" - {}: {}\n", style("WARNING").yellow().bold(), msg));
                    }
                    CheckStatus::Failed(msg) => {
                        output.push_str(&format!(" - {}: {}\n", style("FAILED").red().bold(), msg));
                    }
                }
            }

            if !self.errors.is_empty() {
                output.push('\n');
                for error in &self.errors {
                    let line = error.to_string();
                    let styled = match error.level() {
                        Level::Error => style(line).red(),
                        Level::Warn => style(line).yellow(),
                    };
                    output.push_str(&format!("  {}\n", styled));
                }
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} passed, {} warnings, {} failed\n",
                style("Summary").bold(),
                style(self.success_count()).green(),
                style(self.warning_count()).yellow(),
                style(self.failure_count()).red()
            ));

            output.push('\n');
            if self.has_failures() {
                output.push_str(&format!("{}\n", style("Validation FAILED").red().bold()));
            } else if self.has_warnings() {
                output.push_str(&format!(
                    "{}\n",
                    style("Validation PASSED with warnings").yellow().bold()
                ));
            } else {
                output.push_str(&format!("{}\n", style("Validation PASSED").green().bold()));
            }

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mzTab Validation Report")?;
        writeln!(f, "=======================")?;
        writeln!(f, "File: {}", self.file_path)?;
        writeln!(f, "Level: {}", self.level)?;
        writeln!(f)?;

        for check in &self.checks {
            let symbol = match &check.status {
                CheckStatus::Ok => "✓",
                CheckStatus::Warning(_) => "⚠",
                CheckStatus::Failed(_) => "✗",
            };

            write!(f, "[{}] {}", symbol, check.name)?;

            match &check.status {
                CheckStatus::Ok => writeln!(f)?,
                CheckStatus::Warning(msg) => writeln!(f, " - WARNING: {}", msg)?,
                CheckStatus::Failed(msg) => writeln!(f, " - FAILED: {}", msg)?,
            }
        }

        if !self.errors.is_empty() {
            writeln!(f)?;
            for error in &self.errors {
                writeln!(f, "  {}", error)?;
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} passed, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )?;

        writeln!(f)?;
        if self.has_failures() {
            writeln!(f, "Validation FAILED")?;
        } else if self.has_warnings() {
            writeln!(f, "Validation PASSED with warnings")?;
        } else {
            writeln!(f, "Validation PASSED")?;
        }

        Ok(())
    }
}
