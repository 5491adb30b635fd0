//! # mzTab - A Validating Reader for the mzTab 1.0 Format
//!
//! `mztab` reads the tab-separated mzTab exchange format used to report
//! proteomics and metabolomics identification and quantification results,
//! and checks it against the format's structural and cross-reference rules.
//!
//! ## Key Features
//!
//! - **Order-independent columns**: every column gets a logical position
//!   derived from its kind and ids, so two files that list optional columns
//!   in different orders resolve to the same column layout.
//!
//! - **Conditional-mandatory checks**: columns and metadata required by the
//!   declared `mzTab-mode` and `mzTab-type` are reported in one pass, without
//!   stopping at the first violation.
//!
//! - **Coded diagnostics**: each violation carries a stable numeric code, a
//!   category (format or logical) and a severity level; the caller picks the
//!   acceptance threshold.
//!
//! - **Gzip input**: compressed files are detected and decompressed
//!   transparently (default `gzip` feature).
//!
//! ## Quick Start
//!
//! ```rust
//! use mztab::parser::{parse_reader, ParserConfig};
//! use mztab::section::Section;
//!
//! let document = "\
//! MTD\tmzTab-version\t1.0.0
//! MTD\tmzTab-mode\tSummary
//! MTD\tmzTab-type\tIdentification
//! MTD\tdescription\tExample
//! MTD\tms_run[1]-location\tfile:///data/run1.mzML
//! MTD\tprotein_search_engine_score[1]\t[MS, MS:1001171, Mascot:score, ]
//! MTD\tfixed_mod[1]\t[MS, MS:1002453, No fixed modifications searched, ]
//! MTD\tvariable_mod[1]\t[MS, MS:1002454, No variable modifications searched, ]
//! PRH\taccession\tdescription\ttaxid\tspecies\tdatabase\tdatabase_version\tsearch_engine\tbest_search_engine_score[1]\tambiguity_members\tmodifications\tprotein_coverage
//! PRT\tP12345\tAspartate aminotransferase\t10116\tRattus norvegicus\tUniProtKB\t2011_11\t[MS, MS:1001207, Mascot, ]\t50\tnull\t0\t0.4
//! ";
//!
//! let file = parse_reader(document.as_bytes(), &ParserConfig::default())?;
//! assert!(file.errors.is_empty());
//!
//! let proteins = file.table(Section::Protein).unwrap();
//! assert_eq!(proteins.records[0].get_string("accession"), Some("P12345"));
//! # Ok::<(), mztab::error::ParseError>(())
//! ```
//!
//! ## Building Tables Programmatically
//!
//! Converters that produce mzTab content use the column factory and record
//! API directly, without going through text:
//!
//! ```rust
//! use std::sync::Arc;
//! use mztab::model::{CellValue, ColumnFactory, OptionalColumn, Record};
//! use mztab::section::Section;
//!
//! let mut factory = ColumnFactory::with_stable_columns(Section::Protein)?;
//! factory.add_optional_column(OptionalColumn::best_search_engine_score(1))?;
//!
//! let mut record = Record::new(Arc::new(factory));
//! record.set_by_header("accession", CellValue::String("P12345".into()))?;
//! record.set_by_header("best_search_engine_score[1]", CellValue::Double(50.0))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`section`]: line prefixes and their ordering
//! - [`error`]: coded diagnostics, the bounded error list and fatal errors
//! - [`controlled_vocabulary`]: `[label, accession, name, value]` parameters
//! - [`metadata`]: the `MTD` block model
//! - [`model`]: column kinds, logical positions, the column factory, position
//!   mapping and records
//! - [`parser`]: metadata, header and data line parsers and the file reader
//! - [`validator`]: mode and type dependent integrity rules and reports

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod controlled_vocabulary;
pub mod error;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod section;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::controlled_vocabulary::{ms_terms, CvParam, CvParamList};
    pub use crate::error::{ErrorKind, Level, MzTabError, MzTabErrorList, ParseError};
    pub use crate::metadata::{Metadata, Mode, MzTabType};
    pub use crate::model::{
        CellValue, Column, ColumnDataType, ColumnFactory, LogicalPosition, OptionalColumn,
        PositionMapping, Record,
    };
    pub use crate::parser::{parse_file, parse_reader, MzTabFile, MzTabParser, ParserConfig};
    pub use crate::section::Section;
    pub use crate::validator::{check_columns, check_metadata, ValidationReport};
}
