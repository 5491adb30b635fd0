use std::collections::{BTreeMap, HashMap};

use super::column::LogicalPosition;
use super::factory::ColumnFactory;

/// Errors raised while building or querying a position mapping
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// Header token that matches no registered column
    #[error("Header '{header}' at position {physical} is not a registered column")]
    UnknownHeader {
        /// Header text
        header: String,
        /// 1-based physical index
        physical: usize,
    },

    /// Two tokens resolve to the same column
    #[error("Header '{header}' occurs at positions {first} and {second}")]
    DuplicateHeader {
        /// Header text
        header: String,
        /// First physical index
        first: usize,
        /// Second physical index
        second: usize,
    },

    /// A registered column has no physical index
    #[error("Column '{header}' is registered but missing from the header line")]
    MissingColumn {
        /// Header text
        header: String,
    },

    /// Physical index with no column
    #[error("Physical position {0} is outside the header line")]
    NoSuchPhysical(usize),

    /// Logical position with no column
    #[error("Logical position {0} is not mapped")]
    NoSuchLogical(LogicalPosition),
}

/// Bidirectional map between the 1-based physical columns of one header line
/// and the logical positions of its factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionMapping {
    forward: BTreeMap<usize, LogicalPosition>,
    reverse: HashMap<LogicalPosition, usize>,
}

impl PositionMapping {
    /// Build the mapping for a header line's tokens (prefix excluded). Every
    /// token must resolve to a distinct registered column and every column
    /// must be covered.
    pub fn new<S: AsRef<str>>(
        factory: &ColumnFactory,
        headers: &[S],
    ) -> Result<Self, MappingError> {
        let mut forward = BTreeMap::new();
        let mut reverse = HashMap::with_capacity(headers.len());

        for (index, header) in headers.iter().enumerate() {
            let header = header.as_ref();
            let physical = index + 1;
            let column =
                factory
                    .find_column_by_header(header)
                    .ok_or_else(|| MappingError::UnknownHeader {
                        header: header.to_string(),
                        physical,
                    })?;
            let position = column.logical_position().clone();
            if let Some(first) = reverse.insert(position.clone(), physical) {
                return Err(MappingError::DuplicateHeader {
                    header: header.to_string(),
                    first,
                    second: physical,
                });
            }
            forward.insert(physical, position);
        }

        if let Some(missing) = factory
            .columns()
            .find(|c| !reverse.contains_key(c.logical_position()))
        {
            return Err(MappingError::MissingColumn {
                header: missing.header().to_string(),
            });
        }

        Ok(Self { forward, reverse })
    }

    /// Mapping that places the factory's columns in canonical logical order
    pub fn canonical(factory: &ColumnFactory) -> Self {
        let mut forward = BTreeMap::new();
        let mut reverse = HashMap::with_capacity(factory.len());
        for (index, column) in factory.columns().enumerate() {
            forward.insert(index + 1, column.logical_position().clone());
            reverse.insert(column.logical_position().clone(), index + 1);
        }
        Self { forward, reverse }
    }

    /// Logical position of a 1-based physical column
    pub fn forward(&self, physical: usize) -> Result<&LogicalPosition, MappingError> {
        self.forward
            .get(&physical)
            .ok_or(MappingError::NoSuchPhysical(physical))
    }

    /// 1-based physical column of a logical position
    pub fn reverse(&self, position: &LogicalPosition) -> Result<usize, MappingError> {
        self.reverse
            .get(position)
            .copied()
            .ok_or_else(|| MappingError::NoSuchLogical(position.clone()))
    }

    /// Number of mapped columns
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// True when nothing is mapped
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// `(physical, logical)` pairs in physical order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &LogicalPosition)> {
        self.forward.iter().map(|(p, l)| (*p, l))
    }

    /// Logical positions in physical order
    pub fn logical_positions(&self) -> impl Iterator<Item = &LogicalPosition> {
        self.forward.values()
    }
}
