//! Header line parsing.
//!
//! A header line is resolved in a fixed sequence of scans. Each scan marks
//! the tokens it consumes; whatever is left after the fixed scans must be an
//! option or abundance column. Any structural failure aborts the parse.

use std::collections::HashSet;

use super::grammar::{
    parse_id, ABUNDANCE_COLUMN, BEST_SCORE_COLUMN, CV_COLUMN, MS_RUN_COLUMN, OPT_COLUMN,
    SCORE_COLUMN,
};
use crate::error::{ErrorKind, MzTabErrorList};
use crate::metadata::Metadata;
use crate::model::{ColumnFactory, FactoryError, FlexibleElement, OptionTarget, OptionalColumn};
use crate::section::Section;
use crate::validator;

/// Build the column layout of one table from its header tokens (prefix
/// excluded), resolving ids against the metadata read so far.
pub fn parse_header_line(
    section: Section,
    headers: &[&str],
    metadata: &Metadata,
) -> Result<ColumnFactory, ErrorKind> {
    let mut scanner = HeaderScanner::new(section, headers, metadata)?;
    scanner.check_duplicates()?;
    scanner.stable_columns()?;
    scanner.stable_optional_columns()?;
    scanner.best_search_engine_scores()?;
    scanner.ms_run_columns()?;
    if scanner.section == Section::PsmHeader {
        scanner.psm_search_engine_scores()?;
    }
    scanner.trailing_columns()?;
    Ok(scanner.factory)
}

/// Mode and type dependent checks on a parsed header
pub fn refine(metadata: &Metadata, factory: &ColumnFactory) -> MzTabErrorList {
    validator::check_columns(metadata, factory)
        .into_vec()
        .into_iter()
        .chain(validator::check_column_units(metadata, factory).into_vec())
        .collect()
}

fn factory_error(error: FactoryError, header: &str, section: Section) -> ErrorKind {
    match error {
        FactoryError::IdOutOfRange { max, .. } => ErrorKind::MalformedId {
            header: header.to_string(),
            max,
        },
        FactoryError::NotApplicable { .. } | FactoryError::UnsupportedSection(_) => {
            ErrorKind::UnknownColumn {
                header: header.to_string(),
                section,
            }
        }
    }
}

struct HeaderScanner<'a> {
    section: Section,
    headers: &'a [&'a str],
    consumed: Vec<bool>,
    metadata: &'a Metadata,
    factory: ColumnFactory,
}

impl<'a> HeaderScanner<'a> {
    fn new(
        section: Section,
        headers: &'a [&'a str],
        metadata: &'a Metadata,
    ) -> Result<Self, ErrorKind> {
        let factory = ColumnFactory::with_stable_columns(section).map_err(|_| {
            ErrorKind::LinePrefix {
                prefix: section.prefix().to_string(),
            }
        })?;
        Ok(Self {
            section: factory.section(),
            headers,
            consumed: vec![false; headers.len()],
            metadata,
            factory,
        })
    }

    fn add(&mut self, index: usize, request: OptionalColumn) -> Result<(), ErrorKind> {
        let header = self.headers[index];
        self.factory
            .add_optional_column(request)
            .map_err(|e| factory_error(e, header, self.section))?;
        self.consumed[index] = true;
        Ok(())
    }

    fn unconsumed(&self) -> Vec<usize> {
        (0..self.headers.len())
            .filter(|i| !self.consumed[*i])
            .collect()
    }

    fn unknown(&self, header: &str) -> ErrorKind {
        ErrorKind::UnknownColumn {
            header: header.to_string(),
            section: self.section,
        }
    }

    fn check_duplicates(&self) -> Result<(), ErrorKind> {
        let mut seen = HashSet::with_capacity(self.headers.len());
        for header in self.headers {
            if !seen.insert(*header) {
                return Err(ErrorKind::DuplicateColumn {
                    header: header.to_string(),
                });
            }
        }
        Ok(())
    }

    fn position_of(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| *h == header)
    }

    fn stable_columns(&mut self) -> Result<(), ErrorKind> {
        let required: Vec<String> = self
            .factory
            .stable_columns()
            .map(|c| c.header().to_string())
            .collect();
        for header in required {
            let index = self
                .position_of(&header)
                .ok_or(ErrorKind::StableColumn { header })?;
            self.consumed[index] = true;
        }
        Ok(())
    }

    fn stable_optional_columns(&mut self) -> Result<(), ErrorKind> {
        let optional: Vec<&'static str> = self
            .factory
            .schema()
            .stable
            .iter()
            .filter(|c| !c.mandatory)
            .map(|c| c.header)
            .collect();
        for index in self.unconsumed() {
            if optional.contains(&self.headers[index]) {
                let header = self.headers[index].to_string();
                self.add(index, OptionalColumn::Stable(header))?;
            }
        }
        Ok(())
    }

    fn score_id(&self, raw: &str, header: &str) -> Result<u32, ErrorKind> {
        let id = parse_id(raw, header)?;
        if !self.metadata.has_search_engine_score(self.section, id) {
            return Err(ErrorKind::SearchEngineScoreNotDefined {
                id,
                header: header.to_string(),
                section: self.section,
            });
        }
        Ok(id)
    }

    fn best_search_engine_scores(&mut self) -> Result<(), ErrorKind> {
        for index in self.unconsumed() {
            let header = self.headers[index];
            let Some(caps) = BEST_SCORE_COLUMN.captures(header) else {
                continue;
            };
            let id = self.score_id(&caps[1], header)?;
            self.add(index, OptionalColumn::best_search_engine_score(id))?;
        }
        Ok(())
    }

    fn ms_run_columns(&mut self) -> Result<(), ErrorKind> {
        for index in self.unconsumed() {
            let header = self.headers[index];
            if header.starts_with("opt_") {
                continue;
            }
            let Some(caps) = MS_RUN_COLUMN.captures(header) else {
                continue;
            };
            let run = parse_id(&caps[2], header)?;
            if !self.metadata.has_ms_run(run) {
                return Err(ErrorKind::MsRunNotDefined {
                    id: run,
                    reference: header.to_string(),
                });
            }

            let name = &caps[1];
            let request = match name {
                "num_psms" => OptionalColumn::per_ms_run(FlexibleElement::NumPsms, run),
                "num_peptides_distinct" => {
                    OptionalColumn::per_ms_run(FlexibleElement::NumPeptidesDistinct, run)
                }
                "num_peptides_unique" => {
                    OptionalColumn::per_ms_run(FlexibleElement::NumPeptidesUnique, run)
                }
                _ => match SCORE_COLUMN.captures(name) {
                    Some(score) => {
                        let id = self.score_id(&score[1], header)?;
                        OptionalColumn::search_engine_score_ms_run(id, run)
                    }
                    None => {
                        return Err(ErrorKind::MsRunColumn {
                            header: header.to_string(),
                            section: self.section,
                        })
                    }
                },
            };
            self.add(index, request).map_err(|e| match e {
                ErrorKind::UnknownColumn { header, section } => {
                    ErrorKind::MsRunColumn { header, section }
                }
                other => other,
            })?;
        }
        Ok(())
    }

    fn psm_search_engine_scores(&mut self) -> Result<(), ErrorKind> {
        for index in self.unconsumed() {
            let header = self.headers[index];
            let Some(caps) = SCORE_COLUMN.captures(header) else {
                continue;
            };
            let id = self.score_id(&caps[1], header)?;
            self.add(index, OptionalColumn::search_engine_score(id))?;
        }
        Ok(())
    }

    fn trailing_columns(&mut self) -> Result<(), ErrorKind> {
        for index in self.unconsumed() {
            // Triples consume their companions ahead of the cursor.
            if self.consumed[index] {
                continue;
            }
            let header = self.headers[index];
            if header.starts_with("opt_") {
                self.option_column(index)?;
            } else if header.contains("abundance") {
                self.abundance_columns(index)?;
            } else {
                return Err(self.unknown(header));
            }
        }
        Ok(())
    }

    fn option_column(&mut self, index: usize) -> Result<(), ErrorKind> {
        let header = self.headers[index];
        let caps = OPT_COLUMN.captures(header).ok_or(ErrorKind::OptionColumn {
            header: header.to_string(),
        })?;

        let target = match (caps.get(2).map(|m| m.as_str()), caps.get(3)) {
            (Some(kind), Some(raw_id)) => {
                let id = parse_id(raw_id.as_str(), header)?;
                let reference = header.to_string();
                match kind {
                    "assay" if self.metadata.has_assay(id) => OptionTarget::Assay(id),
                    "assay" => return Err(ErrorKind::AssayNotDefined { id, reference }),
                    "study_variable" if self.metadata.has_study_variable(id) => {
                        OptionTarget::StudyVariable(id)
                    }
                    "study_variable" => {
                        return Err(ErrorKind::StudyVariableNotDefined { id, reference })
                    }
                    _ if self.metadata.has_ms_run(id) => OptionTarget::MsRun(id),
                    _ => return Err(ErrorKind::MsRunNotDefined { id, reference }),
                }
            }
            _ => OptionTarget::Global,
        };

        let name = &caps[4];
        let cv = if name == "cv" || name.starts_with("cv_") {
            CV_COLUMN.captures(name)
        } else {
            None
        };
        let request = match cv {
            Some(cv) => OptionalColumn::CvParamOption {
                target,
                accession: cv.get(2).map(|m| m.as_str().to_string()),
                name: cv.get(4).map(|m| m.as_str().to_string()),
            },
            None => OptionalColumn::Option {
                target,
                name: name.to_string(),
            },
        };
        self.add(index, request)
    }

    /// `(kind, raw id)` of an abundance header of this table
    fn parse_abundance(&self, header: &str) -> Option<(String, String)> {
        let caps = ABUNDANCE_COLUMN.captures(header)?;
        (Some(&caps[1]) == self.factory.abundance_header_prefix())
            .then(|| (caps[2].to_string(), caps[3].to_string()))
    }

    /// Header and raw id of the triple member `offset` tokens after `index`
    fn triple_member(
        &self,
        index: usize,
        offset: usize,
        expected: &str,
    ) -> Result<(&'a str, String), ErrorKind> {
        let incomplete = || ErrorKind::IncompleteAbundanceTriple {
            header: self.headers[index].to_string(),
        };
        let next: &'a str = self.headers.get(index + offset).copied().ok_or_else(incomplete)?;
        match self.parse_abundance(next) {
            Some((kind, id)) if kind == expected => Ok((next, id)),
            _ => Err(incomplete()),
        }
    }

    /// Register an assay column or a study variable triple starting at `index`
    fn abundance_columns(&mut self, index: usize) -> Result<(), ErrorKind> {
        let header = self.headers[index];
        let (kind, raw_id) = self
            .parse_abundance(header)
            .ok_or_else(|| self.unknown(header))?;

        match kind.as_str() {
            "assay" => {
                let id = parse_id(&raw_id, header)?;
                if !self.metadata.has_assay(id) {
                    return Err(ErrorKind::AssayNotDefined {
                        id,
                        reference: header.to_string(),
                    });
                }
                self.add(index, OptionalColumn::AbundanceAssay(id))
            }
            "study_variable" => {
                let (stdev, stdev_id) = self.triple_member(index, 1, "stdev_study_variable")?;
                let (std_error, std_error_id) =
                    self.triple_member(index, 2, "std_error_study_variable")?;

                let id = parse_id(&raw_id, header)?;
                let ids = [parse_id(&stdev_id, stdev)?, parse_id(&std_error_id, std_error)?];
                if ids.iter().any(|other| *other != id) {
                    return Err(ErrorKind::AbundanceIdMismatch {
                        value: header.to_string(),
                        stdev: stdev.to_string(),
                        std_error: std_error.to_string(),
                    });
                }
                if !self.metadata.has_study_variable(id) {
                    return Err(ErrorKind::StudyVariableNotDefined {
                        id,
                        reference: header.to_string(),
                    });
                }

                self.add(index, OptionalColumn::AbundanceStudyVariable(id))?;
                self.consumed[index + 1] = true;
                self.consumed[index + 2] = true;
                Ok(())
            }
            _ => Err(ErrorKind::IncompleteAbundanceTriple {
                header: header.to_string(),
            }),
        }
    }
}
