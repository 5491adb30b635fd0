//! # Error taxonomy
//!
//! Violations are split into two categories. **Format** errors are tokens that
//! fail their own grammar; **logical** errors are well-formed tokens that break
//! a cross-reference or cardinality rule against the metadata.
//!
//! Structural failures on header and metadata lines abort the parse with a
//! [`ParseError::Fatal`]. Everything else accumulates in an
//! [`MzTabErrorList`] tagged with a [`Level`]; the caller picks the acceptance
//! threshold.

use std::fmt;

mod kind;
mod list;

#[cfg(test)]
mod tests;

pub use kind::{Category, ErrorKind, Level};
pub use list::{MzTabErrorList, DEFAULT_MAX_ERRORS};

/// A single diagnosed violation
#[derive(Debug, Clone, PartialEq)]
pub struct MzTabError {
    /// What went wrong
    pub kind: ErrorKind,
    /// 1-based line number, when known
    pub line: Option<usize>,
}

impl MzTabError {
    /// Create an error without a line number
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, line: None }
    }

    /// Attach a 1-based line number
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Numeric error code
    pub fn code(&self) -> u16 {
        self.kind.code()
    }

    /// Format or logical
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Severity
    pub fn level(&self) -> Level {
        self.kind.level()
    }
}

impl From<ErrorKind> for MzTabError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for MzTabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}] ", self.level(), self.code())?;
        if let Some(line) = self.line {
            write!(f, "line {}: ", line)?;
        }
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for MzTabError {}

/// Errors that stop a parse
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// I/O error while reading lines
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A header or metadata line failed structurally
    #[error("Fatal error: {0}")]
    Fatal(MzTabError),

    /// The error list reached its capacity
    #[error("Too many errors: the error list is limited to {capacity} entries")]
    Overflow {
        /// Configured capacity
        capacity: usize,
    },
}

impl ParseError {
    /// The fatal violation, if this is one
    pub fn as_mztab_error(&self) -> Option<&MzTabError> {
        match self {
            ParseError::Fatal(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MzTabError> for ParseError {
    fn from(error: MzTabError) -> Self {
        ParseError::Fatal(error)
    }
}
