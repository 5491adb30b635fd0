use super::*;
use crate::controlled_vocabulary::{ms_terms, CvParam};
use crate::error::{ErrorKind, Level, MzTabErrorList};
use crate::metadata::{
    Assay, Metadata, ModificationDefinition, Mode, MsRun, MzTabType, Software, StudyVariable,
};
use crate::model::{ColumnFactory, FlexibleElement, OptionalColumn};
use crate::section::Section;

fn base_metadata(mode: Mode, file_type: MzTabType) -> Metadata {
    let mut metadata = Metadata::new().with_mode(mode).with_type(file_type);
    metadata.version = Some("1.0.0".into());
    metadata.description = Some("validator test".into());
    metadata.fixed_mods.insert(
        1,
        ModificationDefinition {
            id: 1,
            param: Some(ms_terms::no_fixed_modifications()),
            ..Default::default()
        },
    );
    metadata.variable_mods.insert(
        1,
        ModificationDefinition {
            id: 1,
            param: Some(ms_terms::no_variable_modifications()),
            ..Default::default()
        },
    );
    metadata.software.insert(
        1,
        Software {
            id: 1,
            param: Some(CvParam::new("MS:1001207", "Mascot").with_value("2.3")),
            ..Default::default()
        },
    );
    metadata.add_ms_run(MsRun::new(1).with_location("file:///data/run1.mzML"));
    metadata.add_search_engine_score(Section::Protein, 1, ms_terms::mascot_score());
    metadata
}

fn codes(errors: &MzTabErrorList) -> Vec<u16> {
    errors.iter().map(|e| e.code()).collect()
}

fn missing_headers(errors: &MzTabErrorList) -> Vec<String> {
    errors
        .iter()
        .filter_map(|e| match &e.kind {
            ErrorKind::MissingColumn { header, .. } => Some(header.clone()),
            _ => None,
        })
        .collect()
}

// ==================== Metadata Rules ====================

#[test]
fn test_complete_metadata_passes() {
    let metadata = base_metadata(Mode::Complete, MzTabType::Identification);
    assert!(check_metadata(&metadata).is_empty());
}

#[test]
fn test_metadata_reports_every_violation() {
    let mut metadata = Metadata::new().with_mode(Mode::Complete);
    metadata.add_ms_run(MsRun {
        id: 1,
        hash: Some("de9f2c7fd25e1b3afad3e85a0bd17d9b100db4b3".into()),
        ..Default::default()
    });

    let errors = check_metadata(&metadata);
    let keys: Vec<String> = errors
        .iter()
        .filter_map(|e| match &e.kind {
            ErrorKind::NotDefinedInMetadata { key, .. } => Some(key.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            "mzTab-version",
            "mzTab-type",
            "description",
            "fixed_mod[1-n]",
            "variable_mod[1-n]",
            "software[1-n]",
            "ms_run[1]-location",
        ]
    );
    assert!(codes(&errors).contains(&2008));
}

#[test]
fn test_software_only_required_in_complete_mode() {
    let mut metadata = base_metadata(Mode::Summary, MzTabType::Identification);
    metadata.software.clear();
    assert!(check_metadata(&metadata).is_empty());

    metadata.mode = Some(Mode::Complete);
    assert_eq!(codes(&check_metadata(&metadata)), vec![2007]);
}

#[test]
fn test_quantification_metadata_rules() {
    let mut metadata = base_metadata(Mode::Complete, MzTabType::Quantification);
    metadata.add_assay(Assay::new(1));
    metadata.add_study_variable(StudyVariable::new(1));

    let errors = check_metadata(&metadata);
    let messages: Vec<String> = errors.iter().map(|e| e.kind.to_string()).collect();
    assert_eq!(errors.len(), 5, "{:?}", messages);
    assert!(messages.iter().any(|m| m.contains("'quantification_method'")));
    assert!(messages.iter().any(|m| m.contains("'assay[1]-ms_run_ref'")));
    assert!(messages
        .iter()
        .any(|m| m.contains("'study_variable[1]-assay_refs'")));
}

#[test]
fn test_unsupported_version_is_a_warning() {
    let mut metadata = base_metadata(Mode::Summary, MzTabType::Identification);
    metadata.version = Some("2.0.0-M".into());
    let errors = check_metadata(&metadata);
    assert_eq!(codes(&errors), vec![1211]);
    assert!(!errors.has_errors_at(Level::Error));
}

// ==================== Column Rules ====================

#[test]
fn test_protein_score_registry_must_not_be_empty() {
    for (mode, file_type) in [
        (Mode::Summary, MzTabType::Identification),
        (Mode::Complete, MzTabType::Quantification),
    ] {
        let metadata = Metadata::new().with_mode(mode).with_type(file_type);
        let factory = ColumnFactory::with_stable_columns(Section::ProteinHeader).unwrap();
        let errors = check_columns(&metadata, &factory);
        assert_eq!(errors.iter().next().unwrap().code(), 2005);
        assert_eq!(
            errors.iter().next().unwrap().kind.to_string(),
            "protein search engine score not defined in metadata"
        );
    }
}

#[test]
fn test_complete_identification_requires_per_run_columns() {
    let mut metadata = base_metadata(Mode::Complete, MzTabType::Identification);
    metadata.add_ms_run(MsRun::new(2).with_location("file:///data/run2.mzML"));
    let mut factory = ColumnFactory::with_stable_columns(Section::ProteinHeader).unwrap();
    factory
        .add_optional_column(OptionalColumn::search_engine_score_ms_run(1, 1))
        .unwrap();
    factory
        .add_optional_column(OptionalColumn::per_ms_run(FlexibleElement::NumPsms, 1))
        .unwrap();

    let missing = missing_headers(&check_columns(&metadata, &factory));
    assert_eq!(
        missing,
        vec![
            "num_peptides_distinct_ms_run[1]",
            "num_peptides_unique_ms_run[1]",
            "search_engine_score[1]_ms_run[2]",
            "num_psms_ms_run[2]",
            "num_peptides_distinct_ms_run[2]",
            "num_peptides_unique_ms_run[2]",
        ]
    );
}

#[test]
fn test_summary_identification_requires_no_optional_columns() {
    let metadata = base_metadata(Mode::Summary, MzTabType::Identification);
    let factory = ColumnFactory::with_stable_columns(Section::ProteinHeader).unwrap();
    assert!(check_columns(&metadata, &factory).is_empty());
}

#[test]
fn test_quantification_requires_study_variable_triple() {
    let mut metadata = base_metadata(Mode::Summary, MzTabType::Quantification);
    metadata.add_study_variable(StudyVariable::new(1));
    metadata.add_assay(Assay::new(1));
    metadata
        .quantification_units
        .insert(Section::Protein, CvParam::new("PRIDE:0000395", "Ratio"));
    let factory = ColumnFactory::with_stable_columns(Section::ProteinHeader).unwrap();

    let missing = missing_headers(&check_columns(&metadata, &factory));
    // Summary mode does not require per-assay abundance.
    assert_eq!(
        missing,
        vec![
            "protein_abundance_study_variable[1]",
            "protein_abundance_stdev_study_variable[1]",
            "protein_abundance_std_error_study_variable[1]",
        ]
    );
}

#[test]
fn test_complete_quantification_requires_assay_abundance() {
    let mut metadata = base_metadata(Mode::Complete, MzTabType::Quantification);
    metadata.add_assay(Assay::new(1));
    metadata.add_assay(Assay::new(2));
    let mut factory = ColumnFactory::with_stable_columns(Section::ProteinHeader).unwrap();
    factory
        .add_optional_column(OptionalColumn::AbundanceAssay(1))
        .unwrap();

    let errors = check_columns(&metadata, &factory);
    assert_eq!(missing_headers(&errors), vec!["protein_abundance_assay[2]"]);
    assert!(errors.iter().any(|e| matches!(
        &e.kind,
        ErrorKind::NotDefinedInMetadata { key, .. } if key == "protein-quantification_unit"
    )));
}

#[test]
fn test_psm_table_has_no_quantification_rules() {
    let mut metadata = base_metadata(Mode::Complete, MzTabType::Quantification);
    metadata.add_assay(Assay::new(1));
    metadata.add_search_engine_score(Section::Psm, 1, ms_terms::mascot_score());
    let factory = ColumnFactory::with_stable_columns(Section::PsmHeader).unwrap();
    assert!(check_columns(&metadata, &factory).is_empty());
}

#[test]
fn test_column_units_must_name_columns() {
    let mut metadata = base_metadata(Mode::Summary, MzTabType::Identification);
    metadata.column_units.push(crate::metadata::ColumnUnit {
        section: Section::Protein,
        column: "retention_time".into(),
        unit: CvParam::new("UO:0000031", "minute"),
    });
    let factory = ColumnFactory::with_stable_columns(Section::ProteinHeader).unwrap();
    assert_eq!(codes(&check_column_units(&metadata, &factory)), vec![2010]);
}

// ==================== Report ====================

#[test]
fn test_validation_report_display() {
    let mut errors = MzTabErrorList::unbounded();
    errors
        .add(crate::error::MzTabError::new(ErrorKind::UnsupportedVersion {
            version: "0.9".into(),
        }))
        .unwrap();
    errors
        .add(
            crate::error::MzTabError::new(ErrorKind::SectionScoreNotDefined {
                section: Section::Protein,
            })
            .at_line(7),
        )
        .unwrap();

    let report = ValidationReport::from_errors("test.mztab", Level::Warn, &errors, None);
    let output = format!("{}", report);
    assert!(output.contains("✓"));
    assert!(output.contains("⚠"));
    assert!(output.contains("✗"));
    assert!(output.contains("3 passed, 1 warnings, 1 failed"));
    assert!(output.contains("[Error-2005] line 7"));
    assert!(report.has_failures());

    let lenient = ValidationReport::from_errors("test.mztab", Level::Error, &errors, None);
    assert_eq!(lenient.warning_count(), 0);
    assert_eq!(lenient.errors.len(), 1);
}
