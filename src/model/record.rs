use std::collections::BTreeMap;
use std::sync::Arc;

use super::column::{ColumnDataType, LogicalPosition};
use super::factory::ColumnFactory;
use super::value::{CellValue, Reliability, SpectraRef};
use crate::controlled_vocabulary::CvParamList;

/// Errors raised when filling a record
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    /// Header not registered in the record's factory
    #[error("Column '{0}' is not part of this table")]
    UnknownHeader(String),

    /// Logical position not registered in the record's factory
    #[error("Logical position {0} is not part of this table")]
    UnknownPosition(LogicalPosition),

    /// Value of the wrong type for its column
    #[error("Value '{value}' is not {expected}")]
    InvalidValue {
        /// Column type
        expected: ColumnDataType,
        /// Offending value text
        value: String,
    },
}

/// One data row, keyed by logical position.
///
/// Every column of the factory has an entry from creation on; missing values
/// are stored as [`CellValue::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    factory: Arc<ColumnFactory>,
    values: BTreeMap<LogicalPosition, CellValue>,
}

impl Record {
    /// Create a record with every cell set to null
    pub fn new(factory: Arc<ColumnFactory>) -> Self {
        let values = factory
            .columns()
            .map(|c| (c.logical_position().clone(), CellValue::Null))
            .collect();
        Self { factory, values }
    }

    /// The table layout this record follows
    pub fn factory(&self) -> &ColumnFactory {
        &self.factory
    }

    /// Store a value after checking it against the column type
    pub fn set_value(
        &mut self,
        position: &LogicalPosition,
        value: CellValue,
    ) -> Result<(), RecordError> {
        let column = self
            .factory
            .find_column_by_logical_position(position)
            .ok_or_else(|| RecordError::UnknownPosition(position.clone()))?;
        if !value.fits(column.data_type()) {
            return Err(RecordError::InvalidValue {
                expected: column.data_type(),
                value: value.to_string(),
            });
        }
        self.values.insert(position.clone(), value);
        Ok(())
    }

    /// Store a value by header text
    pub fn set_by_header(&mut self, header: &str, value: CellValue) -> Result<(), RecordError> {
        let position = self
            .factory
            .find_column_by_header(header)
            .map(|c| c.logical_position().clone())
            .ok_or_else(|| RecordError::UnknownHeader(header.to_string()))?;
        self.set_value(&position, value)
    }

    /// Parse cell text with the column's grammar and store it
    pub fn set_raw(&mut self, position: &LogicalPosition, raw: &str) -> Result<(), RecordError> {
        let data_type = self
            .factory
            .find_column_by_logical_position(position)
            .map(|c| c.data_type())
            .ok_or_else(|| RecordError::UnknownPosition(position.clone()))?;
        let value = CellValue::parse(raw, data_type)?;
        self.values.insert(position.clone(), value);
        Ok(())
    }

    /// Value at a logical position
    pub fn get(&self, position: &LogicalPosition) -> Option<&CellValue> {
        self.values.get(position)
    }

    /// Value of the column with this header
    pub fn get_by_header(&self, header: &str) -> Option<&CellValue> {
        self.factory
            .find_column_by_header(header)
            .and_then(|c| self.values.get(c.logical_position()))
    }

    /// Text value, for string-typed columns
    pub fn get_string(&self, header: &str) -> Option<&str> {
        match self.get_by_header(header)? {
            CellValue::String(s) | CellValue::Uri(s) => Some(s),
            _ => None,
        }
    }

    /// Double value
    pub fn get_double(&self, header: &str) -> Option<f64> {
        match self.get_by_header(header)? {
            CellValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer value
    pub fn get_integer(&self, header: &str) -> Option<i64> {
        match self.get_by_header(header)? {
            CellValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean value
    pub fn get_boolean(&self, header: &str) -> Option<bool> {
        match self.get_by_header(header)? {
            CellValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Reliability value
    pub fn get_reliability(&self) -> Option<Reliability> {
        match self.get_by_header("reliability")? {
            CellValue::Reliability(r) => Some(*r),
            _ => None,
        }
    }

    /// Parameter list value
    pub fn get_param_list(&self, header: &str) -> Option<&CvParamList> {
        match self.get_by_header(header)? {
            CellValue::ParamList(list) => Some(list),
            _ => None,
        }
    }

    /// Spectra references, empty when absent or null
    pub fn spectra_refs(&self) -> &[SpectraRef] {
        match self.get_by_header("spectra_ref") {
            Some(CellValue::SpectraRefs(refs)) => refs,
            _ => &[],
        }
    }

    /// `(logical position, value)` pairs in logical order
    pub fn iter(&self) -> impl Iterator<Item = (&LogicalPosition, &CellValue)> {
        self.values.iter()
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for a table without columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
