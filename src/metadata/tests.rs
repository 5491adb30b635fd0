use super::*;
use crate::controlled_vocabulary::ms_terms;

#[test]
fn test_mode_and_type_defaults() {
    let metadata = Metadata::new();
    assert_eq!(metadata.mode(), Mode::Summary);
    assert_eq!(metadata.file_type(), MzTabType::Identification);

    let metadata = metadata
        .with_mode(Mode::Complete)
        .with_type(MzTabType::Quantification);
    assert_eq!(metadata.mode(), Mode::Complete);
    assert_eq!(metadata.file_type(), MzTabType::Quantification);
}

#[test]
fn test_mode_type_parsing() {
    assert_eq!("Complete".parse::<Mode>().unwrap(), Mode::Complete);
    assert_eq!(
        "Quantification".parse::<MzTabType>().unwrap(),
        MzTabType::Quantification
    );
    assert!(matches!(
        "complete".parse::<Mode>(),
        Err(ErrorKind::InvalidMode { .. })
    ));
}

#[test]
fn test_search_engine_scores_shared_between_header_and_data() {
    let mut metadata = Metadata::new();
    metadata.add_search_engine_score(Section::ProteinHeader, 1, ms_terms::mascot_score());

    assert!(metadata.has_search_engine_score(Section::Protein, 1));
    assert!(metadata.has_search_engine_score(Section::ProteinHeader, 1));
    assert!(!metadata.has_search_engine_score(Section::Protein, 2));
    assert!(metadata.search_engine_scores(Section::Psm).is_none());
}

#[test]
fn test_registries() {
    let mut metadata = Metadata::new();
    metadata.add_ms_run(MsRun::new(1).with_location("file:///data/run1.mzML"));
    metadata.add_assay(Assay::new(2));
    metadata.add_study_variable(StudyVariable::new(3));

    assert!(metadata.has_ms_run(1));
    assert!(metadata.has_assay(2));
    assert!(metadata.has_study_variable(3));
    assert!(!metadata.has_sample(1));
}

#[test]
fn test_metadata_json() {
    let mut metadata = Metadata::new().with_mode(Mode::Complete);
    metadata.description = Some("test file".to_string());
    metadata.add_search_engine_score(Section::Psm, 1, ms_terms::xtandem_expect());

    let json = metadata.to_json().unwrap();
    let restored: Metadata = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, metadata);
}
