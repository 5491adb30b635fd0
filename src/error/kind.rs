use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metadata::{Mode, MzTabType};
use crate::section::Section;

/// Broad classification of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// A token fails its own grammar
    Format,
    /// A grammatically valid token violates a cross-reference or cardinality rule
    Logical,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Format => f.write_str("Format"),
            Category::Logical => f.write_str("Logical"),
        }
    }
}

/// Severity of a violation. Ordered so that `Warn < Error`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Non-conformance that does not prevent use of the document
    #[default]
    Warn,
    /// Non-conformance that makes the document invalid
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Warn => f.write_str("Warn"),
            Level::Error => f.write_str("Error"),
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            other => Err(format!("unknown level '{}'", other)),
        }
    }
}

/// Every condition the reader can diagnose.
///
/// Format kinds use codes `1xxx`, logical kinds use `2xxx`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    // ---------------------------------------------------------------------
    // Document structure
    // ---------------------------------------------------------------------
    /// Line starts with an unknown prefix
    #[error("Unknown line prefix '{prefix}'")]
    LinePrefix {
        /// The offending prefix
        prefix: String,
    },

    /// A line appears after a section that must follow it
    #[error("{section} line appears after {previous} lines")]
    LinesOrder {
        /// Section of the offending line
        section: Section,
        /// Section already reached
        previous: Section,
    },

    /// Data line without a header line for its table
    #[error("{section} data line found before its {} header line", .section.to_header())]
    NoHeaderLine {
        /// Data section without header
        section: Section,
    },

    /// A table header was given twice
    #[error("{section} header line defined more than once")]
    DuplicateHeader {
        /// Repeated header section
        section: Section,
    },

    // ---------------------------------------------------------------------
    // Header lines
    // ---------------------------------------------------------------------
    /// A stable column is absent from a header line
    #[error("Stable column '{header}' is missing from the header line")]
    StableColumn {
        /// Header text of the missing column
        header: String,
    },

    /// The same header text appears twice
    #[error("Column '{header}' occurs more than once in the header line")]
    DuplicateColumn {
        /// Repeated header text
        header: String,
    },

    /// Header text matching no column grammar
    #[error("Column '{header}' is not a valid {section} column")]
    UnknownColumn {
        /// Header text
        header: String,
        /// Header section
        section: Section,
    },

    /// An `[id]` that is not a positive integer
    #[error("Invalid id in '{header}': ids must be integers between 1 and {max}")]
    MalformedId {
        /// Header text containing the id
        header: String,
        /// Largest accepted id
        max: u32,
    },

    /// Columns of one study variable abundance triple carry different ids
    #[error("Abundance columns '{value}', '{stdev}' and '{std_error}' must refer to the same study variable")]
    AbundanceIdMismatch {
        /// Abundance value header
        value: String,
        /// Standard deviation header
        stdev: String,
        /// Standard error header
        std_error: String,
    },

    /// A study variable abundance column without its companions
    #[error("Abundance column '{header}' must be followed by its stdev and std_error columns")]
    IncompleteAbundanceTriple {
        /// Header text starting the incomplete triple
        header: String,
    },

    /// Free-form option column not matching `opt_{target}_{name}`
    #[error("Optional column '{header}' does not match opt_((assay|study_variable|ms_run)[id]|global)_name")]
    OptionColumn {
        /// Header text
        header: String,
    },

    /// `<name>_ms_run[id]` with an unknown name
    #[error("Column '{header}' is not a valid per-ms_run column for {section}")]
    MsRunColumn {
        /// Header text
        header: String,
        /// Header section
        section: Section,
    },

    // ---------------------------------------------------------------------
    // Metadata lines
    // ---------------------------------------------------------------------
    /// Metadata line with the wrong number of tokens
    #[error("Metadata line must have exactly 3 tab-separated fields, found {found}")]
    MetadataLine {
        /// Token count found
        found: usize,
    },

    /// Unknown metadata key
    #[error("Unknown metadata key '{key}'")]
    MetadataKey {
        /// Key text
        key: String,
    },

    /// A metadata key defined twice
    #[error("Metadata key '{key}' is defined more than once")]
    DuplicateDefinition {
        /// Key text
        key: String,
    },

    /// Malformed `[label, accession, name, value]`
    #[error("'{value}' is not a valid parameter, expected [label, accession, name, value]")]
    ParamFormat {
        /// Offending value
        value: String,
    },

    /// Malformed URI or URL
    #[error("'{value}' is not a valid URI")]
    UriFormat {
        /// Offending value
        value: String,
    },

    /// Malformed email address
    #[error("'{value}' is not a valid email address")]
    EmailFormat {
        /// Offending value
        value: String,
    },

    /// Malformed publication list
    #[error("'{value}' is not a valid publication, expected pubmed:{{id}} or doi:{{id}}")]
    PublicationFormat {
        /// Offending value
        value: String,
    },

    /// Malformed element reference like `ms_run[1]`
    #[error("'{value}' is not a valid reference, expected {element}[id]")]
    ReferenceFormat {
        /// Offending value
        value: String,
        /// Expected element name
        element: &'static str,
    },

    /// Malformed column unit definition
    #[error("'{value}' is not a valid column unit, expected column_name=[param]")]
    ColumnUnitFormat {
        /// Offending value
        value: String,
    },

    /// Unknown `mzTab-mode`
    #[error("mzTab-mode must be 'Summary' or 'Complete', found '{value}'")]
    InvalidMode {
        /// Offending value
        value: String,
    },

    /// Unknown `mzTab-type`
    #[error("mzTab-type must be 'Identification' or 'Quantification', found '{value}'")]
    InvalidType {
        /// Offending value
        value: String,
    },

    /// Version other than 1.0.0
    #[error("mzTab-version '{version}' is not supported, expected 1.0.0")]
    UnsupportedVersion {
        /// Declared version
        version: String,
    },

    // ---------------------------------------------------------------------
    // Data lines
    // ---------------------------------------------------------------------
    /// Data line width differs from its header
    #[error("Data line has {found} fields but the header defines {expected}")]
    ColumnCount {
        /// Header column count
        expected: usize,
        /// Data column count
        found: usize,
    },

    /// Cell value fails the column's grammar
    #[error("Column '{header}' expects {expected}, found '{value}'")]
    CellFormat {
        /// Column header text
        header: String,
        /// Expected value description
        expected: String,
        /// Offending value
        value: String,
    },

    // ---------------------------------------------------------------------
    // Cross-references
    // ---------------------------------------------------------------------
    /// Header refers to an undeclared search engine score id
    #[error("search_engine_score[{id}] referenced by '{header}' is not defined for the {} section", .section.table_name())]
    SearchEngineScoreNotDefined {
        /// Score id
        id: u32,
        /// Header text
        header: String,
        /// Header section
        section: Section,
    },

    /// Undeclared ms_run
    #[error("ms_run[{id}] referenced by '{reference}' is not defined in metadata")]
    MsRunNotDefined {
        /// ms_run id
        id: u32,
        /// Referencing text
        reference: String,
    },

    /// Undeclared assay
    #[error("assay[{id}] referenced by '{reference}' is not defined in metadata")]
    AssayNotDefined {
        /// assay id
        id: u32,
        /// Referencing text
        reference: String,
    },

    /// Undeclared study variable
    #[error("study_variable[{id}] referenced by '{reference}' is not defined in metadata")]
    StudyVariableNotDefined {
        /// study variable id
        id: u32,
        /// Referencing text
        reference: String,
    },

    /// Undeclared sample
    #[error("sample[{id}] referenced by '{reference}' is not defined in metadata")]
    SampleNotDefined {
        /// sample id
        id: u32,
        /// Referencing text
        reference: String,
    },

    /// A section's search engine score registry is empty
    #[error("{} search engine score not defined in metadata", .section.table_name())]
    SectionScoreNotDefined {
        /// Table section
        section: Section,
    },

    /// A column required by the declared mode and type is absent
    #[error("Column '{header}' is mandatory for {mode} {file_type} files")]
    MissingColumn {
        /// Missing header text
        header: String,
        /// Declared mode
        mode: Mode,
        /// Declared type
        file_type: MzTabType,
    },

    /// A metadata element required by the declared mode and type is absent
    #[error("'{key}' must be defined in metadata for {mode} {file_type} files")]
    NotDefinedInMetadata {
        /// Missing key
        key: String,
        /// Declared mode
        mode: Mode,
        /// Declared type
        file_type: MzTabType,
    },

    /// `ms_run[n]-hash` without `ms_run[n]-hash_method`
    #[error("ms_run[{id}]-hash is set but ms_run[{id}]-hash_method is not")]
    HashMethodMissing {
        /// ms_run id
        id: u32,
    },

    /// Same protein accession on two rows
    #[error("Protein accession '{accession}' occurs more than once")]
    DuplicateAccession {
        /// Repeated accession
        accession: String,
    },

    /// `colunit-*` names a column absent from the header
    #[error("colunit for '{header}' refers to a column not present in the {section} header")]
    ColumnUnitTarget {
        /// Column name from the colunit line
        header: String,
        /// Header section
        section: Section,
    },
}

impl ErrorKind {
    /// Stable numeric code
    pub fn code(&self) -> u16 {
        match self {
            ErrorKind::LinePrefix { .. } => 1000,
            ErrorKind::LinesOrder { .. } => 1001,
            ErrorKind::NoHeaderLine { .. } => 1002,
            ErrorKind::DuplicateHeader { .. } => 1003,
            ErrorKind::StableColumn { .. } => 1100,
            ErrorKind::DuplicateColumn { .. } => 1101,
            ErrorKind::UnknownColumn { .. } => 1102,
            ErrorKind::MalformedId { .. } => 1103,
            ErrorKind::AbundanceIdMismatch { .. } => 1104,
            ErrorKind::IncompleteAbundanceTriple { .. } => 1105,
            ErrorKind::OptionColumn { .. } => 1106,
            ErrorKind::MsRunColumn { .. } => 1107,
            ErrorKind::MetadataLine { .. } => 1200,
            ErrorKind::MetadataKey { .. } => 1201,
            ErrorKind::DuplicateDefinition { .. } => 1202,
            ErrorKind::ParamFormat { .. } => 1203,
            ErrorKind::UriFormat { .. } => 1204,
            ErrorKind::EmailFormat { .. } => 1205,
            ErrorKind::PublicationFormat { .. } => 1206,
            ErrorKind::ReferenceFormat { .. } => 1207,
            ErrorKind::ColumnUnitFormat { .. } => 1208,
            ErrorKind::InvalidMode { .. } => 1209,
            ErrorKind::InvalidType { .. } => 1210,
            ErrorKind::UnsupportedVersion { .. } => 1211,
            ErrorKind::ColumnCount { .. } => 1300,
            ErrorKind::CellFormat { .. } => 1301,
            ErrorKind::SearchEngineScoreNotDefined { .. } => 2000,
            ErrorKind::MsRunNotDefined { .. } => 2001,
            ErrorKind::AssayNotDefined { .. } => 2002,
            ErrorKind::StudyVariableNotDefined { .. } => 2003,
            ErrorKind::SampleNotDefined { .. } => 2004,
            ErrorKind::SectionScoreNotDefined { .. } => 2005,
            ErrorKind::MissingColumn { .. } => 2006,
            ErrorKind::NotDefinedInMetadata { .. } => 2007,
            ErrorKind::HashMethodMissing { .. } => 2008,
            ErrorKind::DuplicateAccession { .. } => 2009,
            ErrorKind::ColumnUnitTarget { .. } => 2010,
        }
    }

    /// Format or logical
    pub fn category(&self) -> Category {
        if self.code() < 2000 {
            Category::Format
        } else {
            Category::Logical
        }
    }

    /// Default severity
    pub fn level(&self) -> Level {
        match self {
            ErrorKind::UnsupportedVersion { .. } => Level::Warn,
            _ => Level::Error,
        }
    }
}
