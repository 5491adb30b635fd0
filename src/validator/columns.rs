use crate::error::{ErrorKind, MzTabError, MzTabErrorList};
use crate::metadata::{Metadata, Mode, MzTabType};
use crate::model::{AbundanceStatistic, AbundanceTarget, ColumnFactory, FlexibleElement};

/// Per-run protein counts required in Complete Identification files
const PROTEIN_RUN_COUNTS: [FlexibleElement; 3] = [
    FlexibleElement::NumPsms,
    FlexibleElement::NumPeptidesDistinct,
    FlexibleElement::NumPeptidesUnique,
];

fn into_list(violations: Vec<ErrorKind>) -> MzTabErrorList {
    violations.into_iter().map(MzTabError::new).collect()
}

/// Check one table's columns against the mode and type declared in metadata.
///
/// Undeclared mode and type are treated as Summary and Identification.
pub fn check_columns(metadata: &Metadata, factory: &ColumnFactory) -> MzTabErrorList {
    let section = factory.section();
    let mode = metadata.mode();
    let file_type = metadata.file_type();
    let mut violations = Vec::new();
    let mut require = |header: String| {
        if !factory.contains_header(&header) {
            violations.push(ErrorKind::MissingColumn {
                header,
                mode,
                file_type,
            });
        }
    };

    let scores = metadata.search_engine_scores(section);

    match (mode, file_type) {
        (_, MzTabType::Quantification) => {
            if let Some(prefix) = factory.abundance_header_prefix() {
                for id in metadata.study_variables.keys() {
                    for stat in AbundanceStatistic::TRIPLE {
                        require(AbundanceTarget::StudyVariable(*id, stat).header(prefix));
                    }
                }
                if mode == Mode::Complete {
                    for id in metadata.assays.keys() {
                        require(AbundanceTarget::Assay(*id).header(prefix));
                    }
                }
            }
        }
        (Mode::Complete, MzTabType::Identification) => {
            let schema = factory.schema();
            let per_run_scores = schema
                .flexible_order(FlexibleElement::SearchEngineScoreMsRun)
                .is_some();
            let per_run_counts = schema.flexible_order(FlexibleElement::NumPsms).is_some();

            for run in metadata.ms_runs.keys() {
                if per_run_scores {
                    for score in scores.into_iter().flat_map(|s| s.keys()) {
                        require(
                            FlexibleElement::SearchEngineScoreMsRun.header(Some(*score), Some(*run)),
                        );
                    }
                }
                if per_run_counts {
                    for element in PROTEIN_RUN_COUNTS {
                        require(element.header(None, Some(*run)));
                    }
                }
            }
        }
        (Mode::Summary, MzTabType::Identification) => {}
    }

    if scores.map_or(true, |s| s.is_empty()) {
        violations.insert(
            0,
            ErrorKind::SectionScoreNotDefined {
                section: section.to_data(),
            },
        );
    }
    if file_type == MzTabType::Quantification
        && factory.abundance_header_prefix().is_some()
        && metadata.quantification_unit(section).is_none()
    {
        violations.push(ErrorKind::NotDefinedInMetadata {
            key: format!("{}-quantification_unit", section.table_name()),
            mode,
            file_type,
        });
    }

    into_list(violations)
}

/// Check that every `colunit-{table}` entry names a column of the table
pub fn check_column_units(metadata: &Metadata, factory: &ColumnFactory) -> MzTabErrorList {
    into_list(
        metadata
            .column_units(factory.section())
            .filter(|unit| !factory.contains_header(&unit.column))
            .map(|unit| ErrorKind::ColumnUnitTarget {
                header: unit.column.clone(),
                section: factory.section(),
            })
            .collect(),
    )
}
