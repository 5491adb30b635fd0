//! # Metadata Model for mzTab
//!
//! The metadata block (`MTD` lines) declares the file's mode and type and the
//! id-indexed elements that table columns refer to: ms_runs, assays, study
//! variables and one search engine score registry per table.
//!
//! The model is built one line at a time by the metadata line parser, or
//! directly through the builder methods by converters that produce mzTab from
//! other formats. Once the first table header is reached it is only read.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::controlled_vocabulary::{CvParam, CvParamList};
use crate::error::ErrorKind;
use crate::section::Section;

mod elements;

#[cfg(test)]
mod tests;

pub use elements::{
    Assay, ColumnUnit, Contact, CvDefinition, Instrument, ModificationDefinition, MsRun,
    PublicationItem, PublicationKind, Sample, Software, StudyVariable,
};

/// The only format version this crate validates
pub const MZTAB_VERSION: &str = "1.0.0";

/// Whether per-ms_run and per-assay values are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Only summarised values
    #[default]
    Summary,
    /// Per-ms_run and per-assay values
    Complete,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Summary => f.write_str("Summary"),
            Mode::Complete => f.write_str("Complete"),
        }
    }
}

impl FromStr for Mode {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Summary" => Ok(Mode::Summary),
            "Complete" => Ok(Mode::Complete),
            other => Err(ErrorKind::InvalidMode {
                value: other.to_string(),
            }),
        }
    }
}

/// Whether abundance values are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MzTabType {
    /// Identification results only
    #[default]
    Identification,
    /// Identification and quantification results
    Quantification,
}

impl fmt::Display for MzTabType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MzTabType::Identification => f.write_str("Identification"),
            MzTabType::Quantification => f.write_str("Quantification"),
        }
    }
}

impl FromStr for MzTabType {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Identification" => Ok(MzTabType::Identification),
            "Quantification" => Ok(MzTabType::Quantification),
            other => Err(ErrorKind::InvalidType {
                value: other.to_string(),
            }),
        }
    }
}

/// The parsed metadata block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// `mzTab-version`
    pub version: Option<String>,
    /// `mzTab-mode`
    pub mode: Option<Mode>,
    /// `mzTab-type`
    pub file_type: Option<MzTabType>,
    /// `mzTab-ID`
    pub mztab_id: Option<String>,
    /// `title`
    pub title: Option<String>,
    /// `description`
    pub description: Option<String>,
    /// `sample_processing[n]`
    pub sample_processing: BTreeMap<u32, CvParamList>,
    /// `instrument[n]-*`
    pub instruments: BTreeMap<u32, Instrument>,
    /// `software[n]`
    pub software: BTreeMap<u32, Software>,
    /// `{table}_search_engine_score[n]`, keyed by data section
    pub search_engine_scores: BTreeMap<Section, BTreeMap<u32, CvParam>>,
    /// `false_discovery_rate`
    pub false_discovery_rate: Option<CvParamList>,
    /// `publication[n]`
    pub publications: BTreeMap<u32, Vec<PublicationItem>>,
    /// `contact[n]-*`
    pub contacts: BTreeMap<u32, Contact>,
    /// `uri[n]`
    pub uris: BTreeMap<u32, String>,
    /// `fixed_mod[n]`
    pub fixed_mods: BTreeMap<u32, ModificationDefinition>,
    /// `variable_mod[n]`
    pub variable_mods: BTreeMap<u32, ModificationDefinition>,
    /// `quantification_method`
    pub quantification_method: Option<CvParam>,
    /// `{table}-quantification_unit`, keyed by data section
    pub quantification_units: BTreeMap<Section, CvParam>,
    /// `ms_run[n]-*`
    pub ms_runs: BTreeMap<u32, MsRun>,
    /// `custom[n]`
    pub custom: BTreeMap<u32, CvParam>,
    /// `sample[n]-*`
    pub samples: BTreeMap<u32, Sample>,
    /// `assay[n]-*`
    pub assays: BTreeMap<u32, Assay>,
    /// `study_variable[n]-*`
    pub study_variables: BTreeMap<u32, StudyVariable>,
    /// `cv[n]-*`
    pub cvs: BTreeMap<u32, CvDefinition>,
    /// `colunit-{table}`
    pub column_units: Vec<ColumnUnit>,
}

impl Metadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared mode, Summary when undeclared
    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or_default()
    }

    /// Declared type, Identification when undeclared
    pub fn file_type(&self) -> MzTabType {
        self.file_type.unwrap_or_default()
    }

    /// Set the mode (builder pattern)
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the type (builder pattern)
    pub fn with_type(mut self, file_type: MzTabType) -> Self {
        self.file_type = Some(file_type);
        self
    }

    /// Search engine scores declared for a table. Header and data sections
    /// share one registry.
    pub fn search_engine_scores(&self, section: Section) -> Option<&BTreeMap<u32, CvParam>> {
        self.search_engine_scores.get(&section.to_data())
    }

    /// Whether `{table}_search_engine_score[id]` is declared
    pub fn has_search_engine_score(&self, section: Section, id: u32) -> bool {
        self.search_engine_scores(section)
            .is_some_and(|scores| scores.contains_key(&id))
    }

    /// Declare a search engine score for a table
    pub fn add_search_engine_score(&mut self, section: Section, id: u32, param: CvParam) {
        self.search_engine_scores
            .entry(section.to_data())
            .or_default()
            .insert(id, param);
    }

    /// Quantification unit declared for a table
    pub fn quantification_unit(&self, section: Section) -> Option<&CvParam> {
        self.quantification_units.get(&section.to_data())
    }

    /// Declare an ms_run, replacing any previous one with the same id
    pub fn add_ms_run(&mut self, ms_run: MsRun) {
        self.ms_runs.insert(ms_run.id, ms_run);
    }

    /// Declare an assay, replacing any previous one with the same id
    pub fn add_assay(&mut self, assay: Assay) {
        self.assays.insert(assay.id, assay);
    }

    /// Declare a study variable, replacing any previous one with the same id
    pub fn add_study_variable(&mut self, study_variable: StudyVariable) {
        self.study_variables
            .insert(study_variable.id, study_variable);
    }

    /// Whether `ms_run[id]` is declared
    pub fn has_ms_run(&self, id: u32) -> bool {
        self.ms_runs.contains_key(&id)
    }

    /// Whether `assay[id]` is declared
    pub fn has_assay(&self, id: u32) -> bool {
        self.assays.contains_key(&id)
    }

    /// Whether `study_variable[id]` is declared
    pub fn has_study_variable(&self, id: u32) -> bool {
        self.study_variables.contains_key(&id)
    }

    /// Whether `sample[id]` is declared
    pub fn has_sample(&self, id: u32) -> bool {
        self.samples.contains_key(&id)
    }

    /// Column units declared for a table
    pub fn column_units(&self, section: Section) -> impl Iterator<Item = &ColumnUnit> {
        let section = section.to_data();
        self.column_units
            .iter()
            .filter(move |unit| unit.section == section)
    }

    /// Serialize metadata to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
