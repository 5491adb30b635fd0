use super::{Level, MzTabError, ParseError};

/// Default capacity of the error list used by the file parser
pub const DEFAULT_MAX_ERRORS: usize = 300;

/// Append-only collection of accumulated violations.
///
/// Errors below the list's level are dropped without being counted. When a
/// capacity is set, adding past it fails with [`ParseError::Overflow`] rather
/// than truncating silently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MzTabErrorList {
    errors: Vec<MzTabError>,
    capacity: Option<usize>,
    level: Level,
}

impl MzTabErrorList {
    /// Create a bounded list keeping errors at or above `level`
    pub fn new(level: Level, capacity: usize) -> Self {
        Self {
            errors: Vec::new(),
            capacity: Some(capacity),
            level,
        }
    }

    /// Create a list with no capacity bound that keeps every level
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Minimum level kept by this list
    pub fn level(&self) -> Level {
        self.level
    }

    /// Capacity, if bounded
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Add an error. Returns whether it was kept.
    pub fn add(&mut self, error: MzTabError) -> Result<bool, ParseError> {
        if error.level() < self.level {
            return Ok(false);
        }
        if let Some(capacity) = self.capacity {
            if self.errors.len() >= capacity {
                return Err(ParseError::Overflow { capacity });
            }
        }
        self.errors.push(error);
        Ok(true)
    }

    /// Move every error of `other` into this list
    pub fn append(&mut self, other: MzTabErrorList) -> Result<(), ParseError> {
        for error in other.errors {
            self.add(error)?;
        }
        Ok(())
    }

    /// Number of kept errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when nothing was kept
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, MzTabError> {
        self.errors.iter()
    }

    /// Errors at or above `level`
    pub fn at_or_above(&self, level: Level) -> impl Iterator<Item = &MzTabError> {
        self.errors.iter().filter(move |e| e.level() >= level)
    }

    /// Whether any error at or above `level` was kept
    pub fn has_errors_at(&self, level: Level) -> bool {
        self.at_or_above(level).next().is_some()
    }

    /// Consume into a vector
    pub fn into_vec(self) -> Vec<MzTabError> {
        self.errors
    }
}

/// Collects into an unbounded list keeping every level
impl FromIterator<MzTabError> for MzTabErrorList {
    fn from_iter<I: IntoIterator<Item = MzTabError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
            ..Self::unbounded()
        }
    }
}

impl<'a> IntoIterator for &'a MzTabErrorList {
    type Item = &'a MzTabError;
    type IntoIter = std::slice::Iter<'a, MzTabError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
