//! # mzTab Column Model
//!
//! Typed table layouts for the four mzTab tables:
//!
//! - [`Column`]: one column with its header, cell type and [`LogicalPosition`]
//! - [`ColumnFactory`]: the ordered column set of one table, built once per header line
//! - [`PositionMapping`]: physical index to logical position for one concrete header line
//! - [`Record`]: one data row keyed by logical position
//!
//! ## Logical positions
//!
//! A logical position is the fixed-width string `{order:02}{id:05}{sub:05}`.
//! `order` is the column's structural place in its table, `id` the instance
//! id of repeatable columns and `sub` distinguishes the members of a study
//! variable abundance triple. Sorting positions as strings yields the
//! canonical column order, whatever order the header line used:
//!
//! ```text
//! accession                                   010000000000
//! best_search_engine_score[1]                 080000100000
//! search_engine_score[1]_ms_run[2]            090000100002
//! protein_abundance_study_variable[1]         200000100001
//! protein_abundance_stdev_study_variable[1]   200000100002
//! opt_global_cv_MS:1002217_decoy_peptide      900000000000cv_MS:1002217_decoy_peptide
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use mztab::model::{CellValue, ColumnFactory, OptionalColumn, PositionMapping, Record};
//! use mztab::section::Section;
//!
//! let mut factory = ColumnFactory::with_stable_columns(Section::ProteinHeader)?;
//! factory.add_optional_column(OptionalColumn::best_search_engine_score(1))?;
//!
//! let canonical = PositionMapping::canonical(&factory);
//! assert_eq!(canonical.len(), factory.len());
//!
//! let mut record = Record::new(Arc::new(factory));
//! record.set_by_header("accession", CellValue::String("P12345".into()))?;
//! assert_eq!(record.get_string("accession"), Some("P12345"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod column;
mod factory;
mod mapping;
mod record;
mod schema;
mod value;


pub use column::{
    logical_position, AbundanceStatistic, AbundanceTarget, Column, ColumnDataType, ColumnKind,
    FlexibleElement, LogicalPosition, OptionTarget, MAX_ID, OPTION_ORDER,
};
pub use factory::{ColumnFactory, FactoryError, OptionalColumn};
pub use mapping::{MappingError, PositionMapping};
pub use record::{Record, RecordError};
pub use value::{
    CellValue, Modification, ModificationKind, ModificationPosition, Reliability, SpectraRef, NULL,
};
