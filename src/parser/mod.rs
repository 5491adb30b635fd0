//! # mzTab document parser
//!
//! Lines are read one at a time and dispatched by their three-letter prefix:
//!
//! ```text
//! MTD  ->  MetadataParser      (fatal on any failure)
//! xxH  ->  parse_header_line   (fatal on structural failure) + integrity rules
//! xxx  ->  parse_data_line     (accumulates)
//! COM  ->  kept with its line number
//! ```
//!
//! Sections must appear in the order metadata, protein, peptide, PSM, small
//! molecule; comment lines may appear anywhere. Metadata integrity rules run
//! once, when the first line after the metadata block is reached.
//!
//! ```no_run
//! use mztab::parser::{parse_file, ParserConfig};
//!
//! let file = parse_file("results.mzTab", &ParserConfig::default())?;
//! if let Some(proteins) = &file.protein {
//!     println!("{} protein rows", proteins.records.len());
//! }
//! # Ok::<(), mztab::error::ParseError>(())
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

#[cfg(feature = "gzip")]
use flate2::bufread::MultiGzDecoder;
use serde::Deserialize;

use crate::error::{ErrorKind, Level, MzTabError, MzTabErrorList, ParseError, DEFAULT_MAX_ERRORS};
use crate::metadata::Metadata;
use crate::model::{ColumnFactory, MappingError, PositionMapping, Record};
use crate::section::Section;
use crate::validator;

mod data;
mod grammar;
mod header;
mod metadata;

#[cfg(test)]
mod tests;

pub use data::{parse_data_line, ParseSession};
pub use header::{parse_header_line, refine};
pub use metadata::MetadataParser;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Parser settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Lowest level kept in the error list
    pub level: Level,
    /// Capacity of the error list
    pub max_errors: usize,
    /// Run the mode and type dependent rules on each header line
    pub validate_integrity: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            level: Level::Warn,
            max_errors: DEFAULT_MAX_ERRORS,
            validate_integrity: true,
        }
    }
}

/// A parsed table: its layout and rows
#[derive(Debug, Clone)]
pub struct SectionTable {
    /// Column layout shared by every row
    pub factory: Arc<ColumnFactory>,
    /// Physical to logical column mapping of the header line
    pub mapping: PositionMapping,
    /// Rows in file order
    pub records: Vec<Record>,
    /// 1-based line number of the header line
    pub header_line: usize,
}

/// A parsed mzTab document
#[derive(Debug, Clone, Default)]
pub struct MzTabFile {
    /// Metadata block
    pub metadata: Metadata,
    /// Protein table
    pub protein: Option<SectionTable>,
    /// Peptide table
    pub peptide: Option<SectionTable>,
    /// PSM table
    pub psm: Option<SectionTable>,
    /// Small molecule table
    pub small_molecule: Option<SectionTable>,
    /// Comment lines with their line numbers
    pub comments: Vec<(usize, String)>,
    /// Accumulated non-fatal errors
    pub errors: MzTabErrorList,
}

impl MzTabFile {
    /// Table of a header or data section
    pub fn table(&self, section: Section) -> Option<&SectionTable> {
        match section.to_header() {
            Section::ProteinHeader => self.protein.as_ref(),
            Section::PeptideHeader => self.peptide.as_ref(),
            Section::PsmHeader => self.psm.as_ref(),
            Section::SmallMoleculeHeader => self.small_molecule.as_ref(),
            _ => None,
        }
    }

    fn table_mut(&mut self, section: Section) -> Option<&mut Option<SectionTable>> {
        match section.to_header() {
            Section::ProteinHeader => Some(&mut self.protein),
            Section::PeptideHeader => Some(&mut self.peptide),
            Section::PsmHeader => Some(&mut self.psm),
            Section::SmallMoleculeHeader => Some(&mut self.small_molecule),
            _ => None,
        }
    }

    /// Present tables in section order
    pub fn tables(&self) -> impl Iterator<Item = (Section, &SectionTable)> {
        [
            (Section::Protein, self.protein.as_ref()),
            (Section::Peptide, self.peptide.as_ref()),
            (Section::Psm, self.psm.as_ref()),
            (Section::SmallMolecule, self.small_molecule.as_ref()),
        ]
        .into_iter()
        .filter_map(|(section, table)| table.map(|t| (section, t)))
    }
}

/// Line-by-line mzTab parser.
///
/// Feed lines with [`parse_line`](Self::parse_line) or a whole reader with
/// [`parse_all`](Self::parse_all). The accumulated errors stay readable after
/// a fatal error through [`errors`](Self::errors).
#[derive(Debug)]
pub struct MzTabParser {
    config: ParserConfig,
    metadata_parser: MetadataParser,
    session: ParseSession,
    file: MzTabFile,
    high_water: u8,
    metadata_checked: bool,
}

impl MzTabParser {
    /// Create a parser
    pub fn new(config: ParserConfig) -> Self {
        let errors = MzTabErrorList::new(config.level, config.max_errors);
        Self {
            config,
            metadata_parser: MetadataParser::new(),
            session: ParseSession::new(),
            file: MzTabFile {
                errors,
                ..Default::default()
            },
            high_water: 0,
            metadata_checked: false,
        }
    }

    /// Errors accumulated so far
    pub fn errors(&self) -> &MzTabErrorList {
        &self.file.errors
    }

    /// Metadata read so far
    pub fn metadata(&self) -> &Metadata {
        &self.file.metadata
    }

    /// Parse every line of `reader`, numbering lines from 1
    pub fn parse_all<R: BufRead>(&mut self, reader: R) -> Result<(), ParseError> {
        for (index, line) in reader.lines().enumerate() {
            self.parse_line(index + 1, &line?)?;
        }
        Ok(())
    }

    /// Parse one line. `line_no` is 1-based.
    pub fn parse_line(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            return Ok(());
        }

        let tokens: Vec<&str> = line.split('\t').map(str::trim).collect();
        let fatal = |kind: ErrorKind| ParseError::Fatal(MzTabError::new(kind).at_line(line_no));

        let section = Section::from_prefix(tokens[0]).ok_or_else(|| {
            fatal(ErrorKind::LinePrefix {
                prefix: tokens[0].to_string(),
            })
        })?;

        if section == Section::Comment {
            self.file.comments.push((line_no, tokens[1..].join("\t")));
            return Ok(());
        }

        if section.height() < self.high_water {
            let previous = self.previous_section();
            return Err(fatal(ErrorKind::LinesOrder { section, previous }));
        }
        self.high_water = section.height();

        if section == Section::Metadata {
            return self
                .metadata_parser
                .parse_line(&tokens, &mut self.file.metadata)
                .map_err(fatal);
        }

        self.check_metadata()?;

        if section.is_header() {
            self.parse_header(section, line_no, &tokens[1..])
        } else {
            self.parse_data(section, line_no, &tokens[1..])
        }
    }

    /// Run the checks that wait for the end of input. Safe to call twice.
    pub fn end_of_input(&mut self) -> Result<(), ParseError> {
        self.check_metadata()
    }

    /// Finish the parse, running any check that has not run yet
    pub fn finish(mut self) -> Result<MzTabFile, ParseError> {
        self.end_of_input()?;

        for (section, table) in self.file.tables() {
            log::debug!(
                "{} table: {} columns, {} rows",
                section.table_name(),
                table.factory.len(),
                table.records.len()
            );
        }
        log::info!(
            "Parsed mzTab file: {} ms_run(s), {} table(s), {} comment(s)",
            self.file.metadata.ms_runs.len(),
            self.file.tables().count(),
            self.file.comments.len()
        );
        if !self.file.errors.is_empty() {
            log::warn!("{} error(s) found", self.file.errors.len());
        }
        Ok(self.file)
    }

    fn previous_section(&self) -> Section {
        [
            Section::Metadata,
            Section::ProteinHeader,
            Section::Protein,
            Section::PeptideHeader,
            Section::Peptide,
            Section::PsmHeader,
            Section::Psm,
            Section::SmallMoleculeHeader,
            Section::SmallMolecule,
        ]
        .into_iter()
        .find(|s| s.height() == self.high_water)
        .unwrap_or(Section::Metadata)
    }

    fn check_metadata(&mut self) -> Result<(), ParseError> {
        if self.metadata_checked {
            return Ok(());
        }
        self.metadata_checked = true;
        let errors = validator::check_metadata(&self.file.metadata);
        log::debug!("Metadata block checked: {} issue(s)", errors.len());
        self.file.errors.append(errors)
    }

    fn parse_header(
        &mut self,
        section: Section,
        line_no: usize,
        headers: &[&str],
    ) -> Result<(), ParseError> {
        let fatal = |kind: ErrorKind| ParseError::Fatal(MzTabError::new(kind).at_line(line_no));

        let slot = self.file.table_mut(section).ok_or_else(|| {
            fatal(ErrorKind::LinePrefix {
                prefix: section.prefix().to_string(),
            })
        })?;
        if slot.is_some() {
            return Err(fatal(ErrorKind::DuplicateHeader { section }));
        }

        let factory =
            parse_header_line(section, headers, &self.file.metadata).map_err(fatal)?;
        let mapping = PositionMapping::new(&factory, headers)
            .map_err(|e| fatal(mapping_error(e, section)))?;
        log::debug!(
            "{} header at line {}: {} columns ({} optional)",
            section.prefix(),
            line_no,
            factory.len(),
            factory.optional_columns().count()
        );

        if self.config.validate_integrity {
            for error in refine(&self.file.metadata, &factory).into_vec() {
                self.file.errors.add(error.at_line(line_no))?;
            }
        }

        *self.file.table_mut(section).ok_or_else(|| {
            fatal(ErrorKind::LinePrefix {
                prefix: section.prefix().to_string(),
            })
        })? = Some(SectionTable {
            factory: Arc::new(factory),
            mapping,
            records: Vec::new(),
            header_line: line_no,
        });
        Ok(())
    }

    fn parse_data(
        &mut self,
        section: Section,
        line_no: usize,
        tokens: &[&str],
    ) -> Result<(), ParseError> {
        let MzTabFile {
            metadata,
            protein,
            peptide,
            psm,
            small_molecule,
            errors,
            ..
        } = &mut self.file;
        let slot = match section {
            Section::Protein => protein,
            Section::Peptide => peptide,
            Section::Psm => psm,
            _ => small_molecule,
        };
        let table = slot.as_mut().ok_or_else(|| {
            ParseError::Fatal(MzTabError::new(ErrorKind::NoHeaderLine { section }).at_line(line_no))
        })?;

        let (record, violations) =
            parse_data_line(&table.factory, &table.mapping, tokens, metadata, &mut self.session);
        for kind in violations {
            errors.add(MzTabError::new(kind).at_line(line_no))?;
        }
        if let Some(record) = record {
            table.records.push(record);
        }
        Ok(())
    }
}

fn mapping_error(error: MappingError, section: Section) -> ErrorKind {
    match error {
        MappingError::DuplicateHeader { header, .. } => ErrorKind::DuplicateColumn { header },
        MappingError::MissingColumn { header } => ErrorKind::StableColumn { header },
        MappingError::UnknownHeader { header, .. } => ErrorKind::UnknownColumn { header, section },
        other => ErrorKind::UnknownColumn {
            header: other.to_string(),
            section,
        },
    }
}

/// Parse a whole document from a buffered reader
pub fn parse_reader<R: BufRead>(reader: R, config: &ParserConfig) -> Result<MzTabFile, ParseError> {
    let mut parser = MzTabParser::new(config.clone());
    parser.parse_all(reader)?;
    parser.finish()
}

/// Parse a file, decompressing gzip input transparently
pub fn parse_file<P: AsRef<Path>>(path: P, config: &ParserConfig) -> Result<MzTabFile, ParseError> {
    parse_reader(open(path)?, config)
}

/// Open a plain or gzip-compressed mzTab file for reading
pub fn open<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>, ParseError> {
    let mut reader = BufReader::new(File::open(path)?);
    let compressed = reader.fill_buf()?.starts_with(&GZIP_MAGIC);
    if !compressed {
        return Ok(Box::new(reader));
    }

    #[cfg(feature = "gzip")]
    {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    }
    #[cfg(not(feature = "gzip"))]
    {
        Err(ParseError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "gzip-compressed input requires the `gzip` feature",
        )))
    }
}
