use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::controlled_vocabulary::{CvParam, CvParamList};
use crate::section::Section;

/// An `ms_run[n]` element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MsRun {
    /// 1-based id
    pub id: u32,
    /// Data format of the run file
    pub format: Option<CvParam>,
    /// Location of the run file
    pub location: Option<String>,
    /// Spectrum id format
    pub id_format: Option<CvParam>,
    /// Fragmentation methods
    pub fragmentation_method: Option<CvParamList>,
    /// Checksum of the run file
    pub hash: Option<String>,
    /// Checksum algorithm
    pub hash_method: Option<CvParam>,
}

impl MsRun {
    /// Create an ms_run with the given id
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Set the run location (builder pattern)
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// A modification declared in metadata (`fixed_mod`, `variable_mod`, or an
/// assay's `quantification_mod`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModificationDefinition {
    /// 1-based id
    pub id: u32,
    /// Modification term
    pub param: Option<CvParam>,
    /// Amino acid or terminus site
    pub site: Option<String>,
    /// Position constraint (e.g., "Anywhere", "Protein N-term")
    pub position: Option<String>,
}

/// An `assay[n]` element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assay {
    /// 1-based id
    pub id: u32,
    /// Label or reagent used for quantification
    pub quantification_reagent: Option<CvParam>,
    /// Quantification modifications keyed by id
    pub quantification_mods: BTreeMap<u32, ModificationDefinition>,
    /// Referenced sample id
    pub sample_ref: Option<u32>,
    /// Referenced ms_run id
    pub ms_run_ref: Option<u32>,
}

impl Assay {
    /// Create an assay with the given id
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

/// A `study_variable[n]` element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyVariable {
    /// 1-based id
    pub id: u32,
    /// Assays aggregated by this study variable
    pub assay_refs: Vec<u32>,
    /// Samples aggregated by this study variable
    pub sample_refs: Vec<u32>,
    /// Free-text description
    pub description: Option<String>,
}

impl StudyVariable {
    /// Create a study variable with the given id
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

/// A `sample[n]` element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// 1-based id
    pub id: u32,
    /// Species terms
    pub species: BTreeMap<u32, CvParam>,
    /// Tissue terms
    pub tissue: BTreeMap<u32, CvParam>,
    /// Cell type terms
    pub cell_type: BTreeMap<u32, CvParam>,
    /// Disease terms
    pub disease: BTreeMap<u32, CvParam>,
    /// Custom parameters
    pub custom: BTreeMap<u32, CvParam>,
    /// Free-text description
    pub description: Option<String>,
}

/// An `instrument[n]` element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// 1-based id
    pub id: u32,
    /// Instrument model
    pub name: Option<CvParam>,
    /// Ion source
    pub source: Option<CvParam>,
    /// Mass analyzers keyed by id
    pub analyzers: BTreeMap<u32, CvParam>,
    /// Detector
    pub detector: Option<CvParam>,
}

/// A `software[n]` element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Software {
    /// 1-based id
    pub id: u32,
    /// Software term with version as value
    pub param: Option<CvParam>,
    /// Settings keyed by id
    pub settings: BTreeMap<u32, String>,
}

/// A `contact[n]` element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// 1-based id
    pub id: u32,
    /// Contact name
    pub name: Option<String>,
    /// Affiliation
    pub affiliation: Option<String>,
    /// Email address
    pub email: Option<String>,
}

/// Kind of a publication reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicationKind {
    /// PubMed id
    PubMed,
    /// Digital object identifier
    Doi,
}

/// A single `pubmed:` or `doi:` reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationItem {
    /// Reference kind
    pub kind: PublicationKind,
    /// Identifier after the prefix
    pub accession: String,
}

impl fmt::Display for PublicationItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PublicationKind::PubMed => write!(f, "pubmed:{}", self.accession),
            PublicationKind::Doi => write!(f, "doi:{}", self.accession),
        }
    }
}

/// A `cv[n]` element describing a controlled vocabulary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvDefinition {
    /// 1-based id
    pub id: u32,
    /// Label used in parameters (e.g., "MS")
    pub label: Option<String>,
    /// Full name
    pub full_name: Option<String>,
    /// Version
    pub version: Option<String>,
    /// Location of the vocabulary
    pub url: Option<String>,
}

/// A `colunit-{table}` entry assigning a unit to a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnUnit {
    /// Table the column belongs to (data section)
    pub section: Section,
    /// Column header text
    pub column: String,
    /// Unit term
    pub unit: CvParam,
}
