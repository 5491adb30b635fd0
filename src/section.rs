//! Document sections and their line prefixes.
//!
//! Every non-blank mzTab line starts with a three-letter prefix naming the
//! section it belongs to. Sections carry a height used to enforce document
//! order: metadata first, then each table's header followed by its rows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A structural block of an mzTab document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    /// `COM` free-text comment lines
    Comment,
    /// `MTD` metadata lines
    Metadata,
    /// `PRH` protein table header
    ProteinHeader,
    /// `PRT` protein rows
    Protein,
    /// `PEH` peptide table header
    PeptideHeader,
    /// `PEP` peptide rows
    Peptide,
    /// `PSH` PSM table header
    PsmHeader,
    /// `PSM` PSM rows
    Psm,
    /// `SMH` small molecule table header
    SmallMoleculeHeader,
    /// `SML` small molecule rows
    SmallMolecule,
}

impl Section {
    /// All sections in document order
    pub const ALL: [Section; 10] = [
        Section::Comment,
        Section::Metadata,
        Section::ProteinHeader,
        Section::Protein,
        Section::PeptideHeader,
        Section::Peptide,
        Section::PsmHeader,
        Section::Psm,
        Section::SmallMoleculeHeader,
        Section::SmallMolecule,
    ];

    /// Resolve a line prefix such as `PRH`
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.prefix() == prefix)
    }

    /// The three-letter line prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            Section::Comment => "COM",
            Section::Metadata => "MTD",
            Section::ProteinHeader => "PRH",
            Section::Protein => "PRT",
            Section::PeptideHeader => "PEH",
            Section::Peptide => "PEP",
            Section::PsmHeader => "PSH",
            Section::Psm => "PSM",
            Section::SmallMoleculeHeader => "SMH",
            Section::SmallMolecule => "SML",
        }
    }

    /// Ordinal used to enforce document order. Comments have no height and
    /// may appear anywhere.
    pub fn height(&self) -> u8 {
        match self {
            Section::Comment => 0,
            Section::Metadata => 1,
            Section::ProteinHeader => 2,
            Section::Protein => 3,
            Section::PeptideHeader => 4,
            Section::Peptide => 5,
            Section::PsmHeader => 6,
            Section::Psm => 7,
            Section::SmallMoleculeHeader => 8,
            Section::SmallMolecule => 9,
        }
    }

    /// Whether this is a table header section
    pub fn is_header(&self) -> bool {
        matches!(
            self,
            Section::ProteinHeader
                | Section::PeptideHeader
                | Section::PsmHeader
                | Section::SmallMoleculeHeader
        )
    }

    /// Whether this is a table data section
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            Section::Protein | Section::Peptide | Section::Psm | Section::SmallMolecule
        )
    }

    /// Map a header section to its data section and vice versa onto the data
    /// section. Metadata and comments map to themselves.
    pub fn to_data(&self) -> Section {
        match self {
            Section::ProteinHeader => Section::Protein,
            Section::PeptideHeader => Section::Peptide,
            Section::PsmHeader => Section::Psm,
            Section::SmallMoleculeHeader => Section::SmallMolecule,
            other => *other,
        }
    }

    /// Map a data section to its header section. Metadata and comments map to
    /// themselves.
    pub fn to_header(&self) -> Section {
        match self {
            Section::Protein => Section::ProteinHeader,
            Section::Peptide => Section::PeptideHeader,
            Section::Psm => Section::PsmHeader,
            Section::SmallMolecule => Section::SmallMoleculeHeader,
            other => *other,
        }
    }

    /// Lowercase table name used in `colunit-{name}` and messages
    pub fn table_name(&self) -> &'static str {
        match self.to_data() {
            Section::Protein => "protein",
            Section::Peptide => "peptide",
            Section::Psm => "psm",
            Section::SmallMolecule => "small_molecule",
            Section::Metadata => "metadata",
            _ => "comment",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_roundtrip() {
        for section in Section::ALL {
            assert_eq!(Section::from_prefix(section.prefix()), Some(section));
        }
        assert_eq!(Section::from_prefix("XYZ"), None);
    }

    #[test]
    fn test_heights_follow_document_order() {
        let heights: Vec<u8> = Section::ALL.iter().map(Section::height).collect();
        assert!(heights.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_header_data_mapping() {
        assert_eq!(Section::PsmHeader.to_data(), Section::Psm);
        assert_eq!(Section::SmallMolecule.to_header(), Section::SmallMoleculeHeader);
        assert!(Section::PeptideHeader.is_header());
        assert!(!Section::Metadata.is_data());
        assert_eq!(Section::SmallMoleculeHeader.table_name(), "small_molecule");
    }
}
