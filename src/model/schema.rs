//! Per-section column tables.
//!
//! Each table section has a fixed set of stable columns, a set of repeatable
//! columns with fixed places in the order, and optionally abundance columns.
//! The order numbers below define the canonical column order of each table.

use super::column::{ColumnDataType, FlexibleElement};
use crate::section::Section;

/// A column with fixed header, type and order
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StableColumnDef {
    pub header: &'static str,
    pub data_type: ColumnDataType,
    pub order: u8,
    pub mandatory: bool,
}

/// Abundance column layout of a quantifiable table
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AbundanceSchema {
    /// Header prefix before `_abundance`
    pub prefix: &'static str,
    pub assay_order: u8,
    pub study_variable_order: u8,
}

/// Column layout of one table
#[derive(Debug, PartialEq)]
pub(crate) struct SectionSchema {
    pub section: Section,
    pub stable: &'static [StableColumnDef],
    pub flexible: &'static [(FlexibleElement, u8)],
    pub abundance: Option<AbundanceSchema>,
}

impl SectionSchema {
    pub fn mandatory(&self) -> impl Iterator<Item = &StableColumnDef> {
        self.stable.iter().filter(|c| c.mandatory)
    }

    pub fn stable_def(&self, header: &str) -> Option<&StableColumnDef> {
        self.stable.iter().find(|c| c.header == header)
    }

    pub fn flexible_order(&self, element: FlexibleElement) -> Option<u8> {
        self.flexible
            .iter()
            .find(|(e, _)| *e == element)
            .map(|(_, order)| *order)
    }
}

const fn col(header: &'static str, data_type: ColumnDataType, order: u8) -> StableColumnDef {
    StableColumnDef {
        header,
        data_type,
        order,
        mandatory: true,
    }
}

const fn opt(header: &'static str, data_type: ColumnDataType, order: u8) -> StableColumnDef {
    StableColumnDef {
        header,
        data_type,
        order,
        mandatory: false,
    }
}

use ColumnDataType as T;
use FlexibleElement as F;

static PROTEIN: SectionSchema = SectionSchema {
    section: Section::ProteinHeader,
    stable: &[
        col("accession", T::String, 1),
        col("description", T::String, 2),
        col("taxid", T::Integer, 3),
        col("species", T::String, 4),
        col("database", T::String, 5),
        col("database_version", T::String, 6),
        col("search_engine", T::ParamList, 7),
        opt("reliability", T::Reliability, 10),
        col("ambiguity_members", T::StringList(','), 14),
        col("modifications", T::ModificationList, 15),
        opt("uri", T::Uri, 16),
        opt("go_terms", T::StringList('|'), 17),
        col("protein_coverage", T::Double, 18),
    ],
    flexible: &[
        (F::BestSearchEngineScore, 8),
        (F::SearchEngineScoreMsRun, 9),
        (F::NumPsms, 11),
        (F::NumPeptidesDistinct, 12),
        (F::NumPeptidesUnique, 13),
    ],
    abundance: Some(AbundanceSchema {
        prefix: "protein",
        assay_order: 19,
        study_variable_order: 20,
    }),
};

static PEPTIDE: SectionSchema = SectionSchema {
    section: Section::PeptideHeader,
    stable: &[
        col("sequence", T::String, 1),
        col("accession", T::String, 2),
        col("unique", T::Boolean, 3),
        col("database", T::String, 4),
        col("database_version", T::String, 5),
        col("search_engine", T::ParamList, 6),
        opt("reliability", T::Reliability, 9),
        col("modifications", T::ModificationList, 10),
        col("retention_time", T::DoubleList('|'), 11),
        col("retention_time_window", T::DoubleList('|'), 12),
        col("charge", T::Integer, 13),
        col("mass_to_charge", T::Double, 14),
        opt("uri", T::Uri, 15),
        col("spectra_ref", T::SpectraRefList, 16),
    ],
    flexible: &[(F::BestSearchEngineScore, 7), (F::SearchEngineScoreMsRun, 8)],
    abundance: Some(AbundanceSchema {
        prefix: "peptide",
        assay_order: 17,
        study_variable_order: 18,
    }),
};

static PSM: SectionSchema = SectionSchema {
    section: Section::PsmHeader,
    stable: &[
        col("sequence", T::String, 1),
        col("PSM_ID", T::Integer, 2),
        col("accession", T::String, 3),
        col("unique", T::Boolean, 4),
        col("database", T::String, 5),
        col("database_version", T::String, 6),
        col("search_engine", T::ParamList, 7),
        opt("reliability", T::Reliability, 9),
        col("modifications", T::ModificationList, 10),
        col("retention_time", T::DoubleList('|'), 11),
        col("charge", T::Integer, 12),
        col("exp_mass_to_charge", T::Double, 13),
        col("calc_mass_to_charge", T::Double, 14),
        opt("uri", T::Uri, 15),
        col("spectra_ref", T::SpectraRefList, 16),
        col("pre", T::String, 17),
        col("post", T::String, 18),
        col("start", T::String, 19),
        col("end", T::String, 20),
    ],
    flexible: &[(F::SearchEngineScore, 8)],
    abundance: None,
};

static SMALL_MOLECULE: SectionSchema = SectionSchema {
    section: Section::SmallMoleculeHeader,
    stable: &[
        col("identifier", T::StringList('|'), 1),
        col("chemical_formula", T::String, 2),
        col("smiles", T::StringList('|'), 3),
        col("inchi_key", T::StringList('|'), 4),
        col("description", T::String, 5),
        col("exp_mass_to_charge", T::Double, 6),
        col("calc_mass_to_charge", T::Double, 7),
        col("charge", T::Integer, 8),
        col("retention_time", T::DoubleList('|'), 9),
        col("taxid", T::Integer, 10),
        col("species", T::String, 11),
        col("database", T::String, 12),
        col("database_version", T::String, 13),
        opt("reliability", T::Reliability, 14),
        opt("uri", T::Uri, 15),
        col("spectra_ref", T::SpectraRefList, 16),
        col("search_engine", T::ParamList, 17),
        col("modifications", T::ModificationList, 20),
    ],
    flexible: &[(F::BestSearchEngineScore, 18), (F::SearchEngineScoreMsRun, 19)],
    abundance: Some(AbundanceSchema {
        prefix: "smallmolecule",
        assay_order: 21,
        study_variable_order: 22,
    }),
};

/// Column layout for a table section (header or data)
pub(crate) fn schema_for(section: Section) -> Option<&'static SectionSchema> {
    match section.to_header() {
        Section::ProteinHeader => Some(&PROTEIN),
        Section::PeptideHeader => Some(&PEPTIDE),
        Section::PsmHeader => Some(&PSM),
        Section::SmallMoleculeHeader => Some(&SMALL_MOLECULE),
        _ => None,
    }
}
