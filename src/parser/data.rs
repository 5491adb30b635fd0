use std::collections::HashSet;
use std::sync::Arc;

use crate::error::ErrorKind;
use crate::metadata::Metadata;
use crate::model::{ColumnFactory, PositionMapping, Record, RecordError};
use crate::section::Section;

/// State shared by every data line of one document
#[derive(Debug, Default)]
pub struct ParseSession {
    protein_accessions: HashSet<String>,
}

impl ParseSession {
    /// Start a session with nothing seen
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a protein accession. Returns false if it was seen before.
    pub fn register_accession(&mut self, accession: &str) -> bool {
        self.protein_accessions.insert(accession.to_string())
    }
}

/// Parse the tokens of one data line (prefix excluded) into a record.
///
/// A line whose width differs from the header is dropped. Cells that fail
/// their column grammar stay null and are reported; the record is still
/// returned.
pub fn parse_data_line(
    factory: &Arc<ColumnFactory>,
    mapping: &PositionMapping,
    tokens: &[&str],
    metadata: &Metadata,
    session: &mut ParseSession,
) -> (Option<Record>, Vec<ErrorKind>) {
    if tokens.len() != mapping.len() {
        let error = ErrorKind::ColumnCount {
            expected: mapping.len(),
            found: tokens.len(),
        };
        return (None, vec![error]);
    }

    let mut record = Record::new(Arc::clone(factory));
    let mut violations = Vec::new();

    for (physical, position) in mapping.iter() {
        let raw = tokens[physical - 1];
        match record.set_raw(position, raw) {
            Ok(()) => {}
            Err(RecordError::InvalidValue { expected, value }) => {
                let header = factory
                    .find_column_by_logical_position(position)
                    .map(|c| c.header().to_string())
                    .unwrap_or_default();
                violations.push(ErrorKind::CellFormat {
                    header,
                    expected: expected.to_string(),
                    value,
                });
            }
            Err(e) => {
                log::debug!("Skipping cell {}: {}", physical, e);
            }
        }
    }

    for spectra_ref in record.spectra_refs() {
        if !metadata.has_ms_run(spectra_ref.ms_run) {
            violations.push(ErrorKind::MsRunNotDefined {
                id: spectra_ref.ms_run,
                reference: spectra_ref.to_string(),
            });
        }
    }

    if factory.section() == Section::ProteinHeader {
        if let Some(accession) = record.get_string("accession") {
            if !session.register_accession(accession) {
                violations.push(ErrorKind::DuplicateAccession {
                    accession: accession.to_string(),
                });
            }
        }
    }

    (Some(record), violations)
}
