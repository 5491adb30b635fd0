use super::*;
use crate::controlled_vocabulary::ms_terms;
use crate::model::{CellValue, ColumnDataType, OptionTarget};

const METADATA: &str = "\
MTD\tmzTab-version\t1.0.0
MTD\tmzTab-mode\tSummary
MTD\tmzTab-type\tIdentification
MTD\tdescription\tparser test
MTD\tms_run[1]-location\tfile:///data/run1.mzML
MTD\tprotein_search_engine_score[1]\t[MS, MS:1001171, Mascot:score, ]
MTD\tfixed_mod[1]\t[MS, MS:1002453, No fixed modifications searched, ]
MTD\tvariable_mod[1]\t[MS, MS:1002454, No variable modifications searched, ]
";

const PROTEIN_STABLE: [&str; 10] = [
    "accession",
    "description",
    "taxid",
    "species",
    "database",
    "database_version",
    "search_engine",
    "ambiguity_members",
    "modifications",
    "protein_coverage",
];

const PRH: &str = "PRH\taccession\tdescription\ttaxid\tspecies\tdatabase\tdatabase_version\tsearch_engine\tbest_search_engine_score[1]\tambiguity_members\tmodifications\tprotein_coverage";

fn prt(accession: &str, score: &str) -> String {
    format!(
        "PRT\t{}\tAspartate aminotransferase\t10116\tRattus norvegicus\tUniProtKB\t2011_11\t[MS, MS:1001207, Mascot, ]\t{}\tnull\t0\t0.4",
        accession, score
    )
}

fn metadata_from(lines: &[(&str, &str)]) -> Metadata {
    let mut parser = MetadataParser::new();
    let mut metadata = Metadata::new();
    for (key, value) in lines {
        parser
            .parse_line(&["MTD", key, value], &mut metadata)
            .unwrap();
    }
    metadata
}

fn base_metadata() -> Metadata {
    let mut parser = MzTabParser::new(ParserConfig::default());
    parser.parse_all(METADATA.as_bytes()).unwrap();
    parser.metadata().clone()
}

fn with_protein<'a>(extra: &[&'a str]) -> Vec<&'a str> {
    PROTEIN_STABLE.iter().copied().chain(extra.iter().copied()).collect()
}

fn parse(document: &str) -> Result<MzTabFile, ParseError> {
    parse_reader(document.as_bytes(), &ParserConfig::default())
}

fn fatal_kind(result: Result<MzTabFile, ParseError>) -> (ErrorKind, Option<usize>) {
    match result {
        Err(ParseError::Fatal(e)) => (e.kind, e.line),
        other => panic!("expected a fatal error, got {:?}", other.map(|_| ())),
    }
}

// ==================== Header Lines ====================

#[test]
fn test_best_score_column_registered() {
    let metadata = base_metadata();
    let headers = with_protein(&["best_search_engine_score[1]"]);
    let factory = parse_header_line(Section::ProteinHeader, &headers, &metadata).unwrap();

    assert_eq!(factory.optional_columns().count(), 1);
    assert!(factory.contains_header("best_search_engine_score[1]"));
    assert!(refine(&metadata, &factory).is_empty());
}

#[test]
fn test_undefined_best_score_is_fatal() {
    let metadata = base_metadata();
    let headers = with_protein(&["best_search_engine_score[2]"]);
    let err = parse_header_line(Section::ProteinHeader, &headers, &metadata).unwrap_err();
    assert!(matches!(
        err,
        ErrorKind::SearchEngineScoreNotDefined { id: 2, .. }
    ));
}

#[test]
fn test_refine_reports_columns_then_units() {
    let metadata = metadata_from(&[(
        "colunit-protein",
        "opt_global_missing=[UO, UO:0000031, minute, ]",
    )]);
    let headers = with_protein(&[]);
    let factory = parse_header_line(Section::ProteinHeader, &headers, &metadata).unwrap();

    let errors = refine(&metadata, &factory);
    assert_eq!(errors.capacity(), None);
    let codes: Vec<u16> = errors.iter().map(|e| e.code()).collect();
    assert_eq!(codes, vec![2005, 2010]);
}

#[test]
fn test_non_canonical_ids_are_malformed() {
    let metadata = base_metadata();
    for header in [
        "best_search_engine_score[01]",
        "best_search_engine_score[ 1]",
        "search_engine_score[1]_ms_run[01]",
    ] {
        let headers = with_protein(&[header]);
        let err = parse_header_line(Section::ProteinHeader, &headers, &metadata).unwrap_err();
        assert!(
            matches!(&err, ErrorKind::MalformedId { header: h, .. } if h == header),
            "{}: {:?}",
            header,
            err
        );
        assert_eq!(err.code(), 1103);
    }

    // Both spellings in one header do not silently share a column.
    let headers = with_protein(&["best_search_engine_score[1]", "best_search_engine_score[01]"]);
    assert!(parse_header_line(Section::ProteinHeader, &headers, &metadata).is_err());

    let document = format!(
        "{}PRH\t{}\tbest_search_engine_score[01]\n",
        METADATA,
        PROTEIN_STABLE.join("\t")
    );
    let (kind, line) = fatal_kind(parse(&document));
    assert_eq!(kind.code(), 1103);
    assert_eq!(line, Some(9));
}

#[test]
fn test_abundance_triple_ids_must_match() {
    let mut metadata = base_metadata();
    metadata.add_study_variable(crate::metadata::StudyVariable::new(1));
    let headers = with_protein(&[
        "protein_abundance_study_variable[1]",
        "protein_abundance_stdev_study_variable[2]",
        "protein_abundance_std_error_study_variable[1]",
    ]);
    let err = parse_header_line(Section::ProteinHeader, &headers, &metadata).unwrap_err();
    assert!(matches!(err, ErrorKind::AbundanceIdMismatch { .. }));
    assert_eq!(err.code(), 1104);
}

#[test]
fn test_abundance_triple_must_be_complete() {
    let mut metadata = base_metadata();
    metadata.add_study_variable(crate::metadata::StudyVariable::new(1));

    let headers = with_protein(&[
        "protein_abundance_study_variable[1]",
        "protein_abundance_std_error_study_variable[1]",
    ]);
    let err = parse_header_line(Section::ProteinHeader, &headers, &metadata).unwrap_err();
    assert!(matches!(err, ErrorKind::IncompleteAbundanceTriple { .. }));

    let headers = with_protein(&["protein_abundance_stdev_study_variable[1]"]);
    let err = parse_header_line(Section::ProteinHeader, &headers, &metadata).unwrap_err();
    assert!(matches!(err, ErrorKind::IncompleteAbundanceTriple { .. }));
}

#[test]
fn test_abundance_triple_registers_three_columns() {
    let mut metadata = base_metadata();
    metadata.add_study_variable(crate::metadata::StudyVariable::new(1));
    let headers = with_protein(&[
        "protein_abundance_study_variable[1]",
        "protein_abundance_stdev_study_variable[1]",
        "protein_abundance_std_error_study_variable[1]",
    ]);
    let factory = parse_header_line(Section::ProteinHeader, &headers, &metadata).unwrap();
    assert_eq!(factory.abundance_columns().count(), 3);
    assert_eq!(factory.len(), 13);
}

#[test]
fn test_cv_option_column_on_declared_assay() {
    let mut metadata = base_metadata();
    metadata.add_assay(crate::metadata::Assay::new(1));
    let header = "opt_assay[1]_cv_MS:1002217_decoy_peptide";

    let factory =
        parse_header_line(Section::ProteinHeader, &with_protein(&[header]), &metadata).unwrap();
    let column = factory.find_column_by_header(header).unwrap();
    assert_eq!(column.data_type(), ColumnDataType::Boolean);
    assert_eq!(
        column.cv_param().unwrap().accession,
        ms_terms::DECOY_PEPTIDE
    );

    let header = "opt_assay[2]_cv_MS:1002217_decoy_peptide";
    let err =
        parse_header_line(Section::ProteinHeader, &with_protein(&[header]), &metadata).unwrap_err();
    assert!(matches!(err, ErrorKind::AssayNotDefined { id: 2, .. }));
}

#[test]
fn test_option_columns() {
    let metadata = base_metadata();
    let headers = with_protein(&["opt_global_cv_MS:1001905_emPAI_value", "opt_ms_run[1]_note"]);
    let factory = parse_header_line(Section::ProteinHeader, &headers, &metadata).unwrap();
    assert_eq!(
        factory
            .find_column_by_header("opt_global_cv_MS:1001905_emPAI_value")
            .unwrap()
            .data_type(),
        ColumnDataType::Double
    );
    assert!(factory.contains_header("opt_ms_run[1]_note"));

    let err = parse_header_line(
        Section::ProteinHeader,
        &with_protein(&["opt_sample[1]_note"]),
        &metadata,
    )
    .unwrap_err();
    assert!(matches!(err, ErrorKind::OptionColumn { .. }));

    let err = parse_header_line(
        Section::ProteinHeader,
        &with_protein(&["opt_ms_run[3]_note"]),
        &metadata,
    )
    .unwrap_err();
    assert!(matches!(err, ErrorKind::MsRunNotDefined { id: 3, .. }));
}

#[test]
fn test_header_structure_errors() {
    let metadata = base_metadata();

    let headers: Vec<&str> = PROTEIN_STABLE[1..].to_vec();
    let err = parse_header_line(Section::ProteinHeader, &headers, &metadata).unwrap_err();
    assert_eq!(
        err,
        ErrorKind::StableColumn {
            header: "accession".into()
        }
    );

    let err = parse_header_line(
        Section::ProteinHeader,
        &with_protein(&["accession"]),
        &metadata,
    )
    .unwrap_err();
    assert!(matches!(err, ErrorKind::DuplicateColumn { .. }));

    let err = parse_header_line(Section::ProteinHeader, &with_protein(&["score"]), &metadata)
        .unwrap_err();
    assert!(matches!(err, ErrorKind::UnknownColumn { .. }));

    let err = parse_header_line(
        Section::ProteinHeader,
        &with_protein(&["best_search_engine_score[0]"]),
        &metadata,
    )
    .unwrap_err();
    assert!(matches!(err, ErrorKind::MalformedId { .. }));
}

#[test]
fn test_ms_run_columns() {
    let metadata = base_metadata();
    let headers = with_protein(&[
        "search_engine_score[1]_ms_run[1]",
        "num_psms_ms_run[1]",
        "num_peptides_unique_ms_run[1]",
    ]);
    let factory = parse_header_line(Section::ProteinHeader, &headers, &metadata).unwrap();
    assert_eq!(factory.optional_columns().count(), 3);

    let err = parse_header_line(
        Section::ProteinHeader,
        &with_protein(&["num_psms_ms_run[2]"]),
        &metadata,
    )
    .unwrap_err();
    assert!(matches!(err, ErrorKind::MsRunNotDefined { id: 2, .. }));

    let err = parse_header_line(
        Section::ProteinHeader,
        &with_protein(&["num_spectra_ms_run[1]"]),
        &metadata,
    )
    .unwrap_err();
    assert!(matches!(err, ErrorKind::MsRunColumn { .. }));
}

#[test]
fn test_psm_search_engine_score() {
    let mut metadata = base_metadata();
    metadata.add_search_engine_score(Section::Psm, 1, ms_terms::mascot_score());
    let mut headers = vec![
        "sequence",
        "PSM_ID",
        "accession",
        "unique",
        "database",
        "database_version",
        "search_engine",
        "modifications",
        "retention_time",
        "charge",
        "exp_mass_to_charge",
        "calc_mass_to_charge",
        "spectra_ref",
        "pre",
        "post",
        "start",
        "end",
    ];
    headers.insert(7, "search_engine_score[1]");
    let factory = parse_header_line(Section::PsmHeader, &headers, &metadata).unwrap();
    assert!(factory.contains_header("search_engine_score[1]"));

    headers.push("best_search_engine_score[1]");
    assert!(parse_header_line(Section::PsmHeader, &headers, &metadata).is_err());
}

// ==================== Metadata Lines ====================

#[test]
fn test_metadata_lines() {
    let metadata = metadata_from(&[
        ("mzTab-version", "1.0.0"),
        ("mzTab-mode", "Complete"),
        ("mzTab-type", "Quantification"),
        ("title", "Rat liver"),
        ("instrument[1]-analyzer[1]", "[MS, MS:1000291, linear ion trap, ]"),
        ("software[1]", "[MS, MS:1001207, Mascot, 2.3]"),
        ("software[1]-setting[1]", "Fragment tolerance = 0.1 Da"),
        ("publication[1]", "pubmed:21063943|doi:10.1007/978-1-60761-987-1_6"),
        ("contact[1]-email", "jane.doe@example.org"),
        ("ms_run[1]-location", "file:///data/run1.mzML"),
        ("sample[1]-species[1]", "[NEWT, 10116, Rattus norvegicus (Rat), ]"),
        ("assay[1]-quantification_reagent", "[PRIDE, PRIDE:0000114, iTRAQ reagent 114, ]"),
        ("assay[1]-sample_ref", "sample[1]"),
        ("assay[1]-ms_run_ref", "ms_run[1]"),
        ("assay[1]-quantification_mod[1]-site", "K"),
        ("study_variable[1]-assay_refs", "assay[1]"),
        ("protein-quantification_unit", "[PRIDE, PRIDE:0000395, Ratio, ]"),
        ("colunit-protein", "protein_coverage=[UO, UO:0000187, percent, ]"),
    ]);

    assert_eq!(metadata.mode(), crate::metadata::Mode::Complete);
    assert_eq!(metadata.instruments[&1].analyzers.len(), 1);
    assert_eq!(metadata.software[&1].settings[&1], "Fragment tolerance = 0.1 Da");
    assert_eq!(metadata.publications[&1].len(), 2);
    assert_eq!(metadata.assays[&1].sample_ref, Some(1));
    assert_eq!(metadata.assays[&1].quantification_mods[&1].site.as_deref(), Some("K"));
    assert_eq!(metadata.study_variables[&1].assay_refs, vec![1]);
    assert!(metadata.quantification_unit(Section::Protein).is_some());
    assert_eq!(metadata.column_units(Section::Protein).count(), 1);
}

#[test]
fn test_metadata_standard_terms() {
    let metadata = base_metadata();
    assert_eq!(
        metadata.fixed_mods[&1].param,
        Some(ms_terms::no_fixed_modifications())
    );
    assert_eq!(
        metadata.variable_mods[&1].param,
        Some(ms_terms::no_variable_modifications())
    );

    let metadata = metadata_from(&[
        ("ms_run[1]-format", "[MS, MS:1000584, mzML format, ]"),
        ("ms_run[2]-format", "[MS, MS:1001062, Mascot MGF file, ]"),
    ]);
    assert_eq!(metadata.ms_runs[&1].format, Some(ms_terms::mzml_format()));
    assert_eq!(metadata.ms_runs[&2].format, Some(ms_terms::mascot_mgf_format()));

    let err = MetadataParser::new()
        .parse_line(&["MTD", "ms_run[01]-location", "file:///x"], &mut Metadata::new())
        .unwrap_err();
    assert_eq!(err.code(), 1103);
}

#[test]
fn test_metadata_line_errors() {
    let mut parser = MetadataParser::new();
    let mut metadata = Metadata::new();

    let mut line = |tokens: &[&str]| parser.parse_line(tokens, &mut metadata);
    assert!(line(&["MTD", "mzTab-mode", "Complete"]).is_ok());
    assert!(matches!(
        line(&["MTD", "mzTab-mode", "Complete"]),
        Err(ErrorKind::DuplicateDefinition { .. })
    ));
    assert_eq!(
        line(&["MTD", "title"]),
        Err(ErrorKind::MetadataLine { found: 2 })
    );
    assert!(matches!(
        line(&["MTD", "mzTab-colour", "blue"]),
        Err(ErrorKind::MetadataKey { .. })
    ));
    assert!(matches!(
        line(&["MTD", "mzTab-type", "Quantitation"]),
        Err(ErrorKind::InvalidType { .. })
    ));
    assert!(matches!(
        line(&["MTD", "ms_run[0]-location", "file:///a.mzML"]),
        Err(ErrorKind::MalformedId { .. })
    ));
    assert!(matches!(
        line(&["MTD", "ms_run[1]-location", "not a uri"]),
        Err(ErrorKind::UriFormat { .. })
    ));
    assert!(matches!(
        line(&["MTD", "contact[1]-email", "nobody"]),
        Err(ErrorKind::EmailFormat { .. })
    ));
    assert!(matches!(
        line(&["MTD", "publication[1]", "isbn:123"]),
        Err(ErrorKind::PublicationFormat { .. })
    ));
    assert!(matches!(
        line(&["MTD", "custom[1]", "no brackets"]),
        Err(ErrorKind::ParamFormat { .. })
    ));
    assert!(matches!(
        line(&["MTD", "assay[1]-ms_run_ref", "ms_run[4]"]),
        Err(ErrorKind::MsRunNotDefined { id: 4, .. })
    ));
    assert!(matches!(
        line(&["MTD", "assay[1]-sample_ref", "assay[1]"]),
        Err(ErrorKind::ReferenceFormat { .. })
    ));
    assert!(matches!(
        line(&["MTD", "study_variable[1]-assay_refs", "assay[1]"]),
        Err(ErrorKind::AssayNotDefined { id: 1, .. })
    ));
    assert!(matches!(
        line(&["MTD", "colunit-protein", "retention_time"]),
        Err(ErrorKind::ColumnUnitFormat { .. })
    ));
}

#[test]
fn test_colunit_may_repeat() {
    let metadata = metadata_from(&[
        ("colunit-peptide", "retention_time=[UO, UO:0000031, minute, ]"),
        ("colunit-peptide", "mass_to_charge=[UO, UO:0000221, dalton, ]"),
    ]);
    assert_eq!(metadata.column_units(Section::Peptide).count(), 2);
}

// ==================== Data Lines ====================

#[test]
fn test_data_line_values() {
    let file = parse(&format!("{}{}\n{}\n", METADATA, PRH, prt("P12345", "50"))).unwrap();
    assert!(file.errors.is_empty(), "{:?}", file.errors);

    let table = file.table(Section::Protein).unwrap();
    assert_eq!(table.header_line, 9);
    let record = &table.records[0];
    assert_eq!(record.get_string("accession"), Some("P12345"));
    assert_eq!(record.get_integer("taxid"), Some(10116));
    assert_eq!(record.get_double("best_search_engine_score[1]"), Some(50.0));
    assert_eq!(
        record.get_by_header("ambiguity_members"),
        Some(&CellValue::Null)
    );
}

#[test]
fn test_data_line_errors_accumulate() {
    let document = format!(
        "{}{}\n{}\n{}\n{}\n",
        METADATA,
        PRH,
        prt("P12345", "high"),
        prt("P12345", "50"),
        "PRT\tP99999\ttoo short",
    );
    let file = parse(&document).unwrap();

    let kinds: Vec<(u16, Option<usize>)> = file.errors.iter().map(|e| (e.code(), e.line)).collect();
    // cell format, duplicate accession, column count
    assert_eq!(kinds, vec![(1301, Some(10)), (2009, Some(11)), (1300, Some(12))]);

    let table = file.table(Section::Protein).unwrap();
    assert_eq!(table.records.len(), 2);
    assert_eq!(
        table.records[0].get_by_header("best_search_engine_score[1]"),
        Some(&CellValue::Null)
    );
}

#[test]
fn test_spectra_ref_must_name_declared_run() {
    let (factory, mapping, metadata) = {
        let mut metadata = base_metadata();
        metadata.add_search_engine_score(Section::Psm, 1, ms_terms::mascot_score());
        let headers = [
            "sequence",
            "PSM_ID",
            "accession",
            "unique",
            "database",
            "database_version",
            "search_engine",
            "modifications",
            "retention_time",
            "charge",
            "exp_mass_to_charge",
            "calc_mass_to_charge",
            "spectra_ref",
            "pre",
            "post",
            "start",
            "end",
        ];
        let factory = parse_header_line(Section::PsmHeader, &headers, &metadata).unwrap();
        let mapping = PositionMapping::new(&factory, &headers).unwrap();
        (Arc::new(factory), mapping, metadata)
    };
    let row = [
        "KVPQVSTPTLVEVSR",
        "1",
        "P02768",
        "0",
        "UniProtKB",
        "2011_11",
        "[MS, MS:1001207, Mascot, ]",
        "0",
        "10.2",
        "3",
        "1234.5",
        "1234.4",
        "ms_run[1]:index=5|ms_run[2]:index=7",
        "K",
        "D",
        "45",
        "57",
    ];
    let (record, errors) =
        parse_data_line(&factory, &mapping, &row, &metadata, &mut ParseSession::new());
    assert_eq!(record.unwrap().spectra_refs().len(), 2);
    assert!(matches!(
        errors.as_slice(),
        [ErrorKind::MsRunNotDefined { id: 2, .. }]
    ));
}

// ==================== Document Structure ====================

#[test]
fn test_section_order_is_enforced() {
    let document = format!("{}{}\n{}\nMTD\ttitle\tlate\n", METADATA, PRH, prt("P1", "1"));
    let (kind, line) = fatal_kind(parse(&document));
    assert!(matches!(
        kind,
        ErrorKind::LinesOrder {
            section: Section::Metadata,
            previous: Section::Protein
        }
    ));
    assert_eq!(line, Some(11));
}

#[test]
fn test_document_structure_errors() {
    let (kind, _) = fatal_kind(parse(&format!("{}{}\n", METADATA, prt("P1", "1"))));
    assert_eq!(
        kind,
        ErrorKind::NoHeaderLine {
            section: Section::Protein
        }
    );

    let (kind, _) = fatal_kind(parse(&format!("{}{}\n{}\n", METADATA, PRH, PRH)));
    assert_eq!(
        kind,
        ErrorKind::DuplicateHeader {
            section: Section::ProteinHeader
        }
    );

    let (kind, line) = fatal_kind(parse("XYZ\tsomething\n"));
    assert!(matches!(kind, ErrorKind::LinePrefix { .. }));
    assert_eq!(line, Some(1));
}

#[test]
fn test_comments_and_blank_lines() {
    let document = format!(
        "COM\tgenerated for tests\r\n\n{}\nCOM\tbetween tables\n{}\n{}\n",
        METADATA.trim_end(),
        PRH,
        prt("P1", "1")
    );
    let file = parse(&document).unwrap();
    assert_eq!(
        file.comments,
        vec![
            (1, "generated for tests".to_string()),
            (11, "between tables".to_string())
        ]
    );
    assert_eq!(file.protein.unwrap().records.len(), 1);
}

#[test]
fn test_metadata_rules_run_once_after_block() {
    let document = "MTD\tmzTab-version\t1.0.0\nMTD\tmzTab-mode\tSummary\n";
    let file = parse(document).unwrap();
    // type, description, fixed_mod, variable_mod
    assert_eq!(file.errors.len(), 4);
    assert!(file.errors.iter().all(|e| e.line.is_none()));
}

#[test]
fn test_error_list_overflow() {
    let config = ParserConfig {
        max_errors: 2,
        ..Default::default()
    };
    let document = format!(
        "{}{}\n{}\n{}\n{}\n",
        METADATA,
        PRH,
        "PRT\tshort",
        "PRT\tshort",
        "PRT\tshort"
    );
    let mut parser = MzTabParser::new(config);
    let result = parser.parse_all(document.as_bytes());
    assert!(matches!(result, Err(ParseError::Overflow { capacity: 2 })));
    assert_eq!(parser.errors().len(), 2);
}

#[test]
fn test_integrity_rules_attach_header_line() {
    let document = METADATA.replace(
        "MTD\tmzTab-mode\tSummary",
        "MTD\tmzTab-mode\tComplete\nMTD\tsoftware[1]\t[MS, MS:1001207, Mascot, 2.3]",
    );
    let file = parse(&format!("{}{}\n", document, PRH)).unwrap();
    let missing: Vec<&MzTabError> = file.errors.iter().collect();
    assert!(!missing.is_empty());
    assert!(missing.iter().all(|e| e.line == Some(10)));
    assert!(missing
        .iter()
        .any(|e| e.kind.to_string().contains("num_psms_ms_run[1]")));

    let lenient = parse_reader(
        format!("{}{}\n", document, PRH).as_bytes(),
        &ParserConfig {
            validate_integrity: false,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(lenient.errors.is_empty());
}

#[test]
fn test_option_target_resolution() {
    let mut metadata = base_metadata();
    metadata.add_study_variable(crate::metadata::StudyVariable::new(1));
    let factory = parse_header_line(
        Section::ProteinHeader,
        &with_protein(&["opt_study_variable[1]_note"]),
        &metadata,
    )
    .unwrap();
    let column = factory.find_column_by_header("opt_study_variable[1]_note").unwrap();
    assert!(matches!(
        column.kind(),
        crate::model::ColumnKind::Option {
            target: OptionTarget::StudyVariable(1),
            ..
        }
    ));
}
