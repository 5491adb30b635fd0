//! # mzTab Integrity Validation
//!
//! Conditional-mandatory checks that depend on the declared `mzTab-mode` and
//! `mzTab-type`. All checks are pure functions of their inputs: they read the
//! metadata and column layout, append one error per violated rule and never
//! stop at the first violation.
//!
//! ## Rule Matrix
//!
//! | Rule                                             | Summary | Complete |
//! |--------------------------------------------------|---------|----------|
//! | `{table}_search_engine_score[n]` declared        | all     | all      |
//! | `description`, `fixed_mod[n]`, `variable_mod[n]` | all     | all      |
//! | `software[n]`                                    |         | all      |
//! | quantification unit, study variable triple       | Quant   | Quant    |
//! | `{table}_abundance_assay[n]` per assay           |         | Quant    |
//! | `search_engine_score[n]_ms_run[m]` per run       |         | Ident    |
//! | protein `num_*_ms_run[m]` per run                |         | Ident    |
//!
//! ## Usage
//!
//! ```rust
//! use mztab::metadata::{Metadata, Mode, MzTabType};
//! use mztab::model::ColumnFactory;
//! use mztab::section::Section;
//! use mztab::validator::check_columns;
//!
//! let metadata = Metadata::new()
//!     .with_mode(Mode::Summary)
//!     .with_type(MzTabType::Identification);
//! let factory = ColumnFactory::with_stable_columns(Section::ProteinHeader)?;
//!
//! // No protein search engine score is declared.
//! let errors = check_columns(&metadata, &factory);
//! assert_eq!(errors.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod columns;
mod metadata;
mod report;

#[cfg(test)]
mod tests;

pub use columns::{check_column_units, check_columns};
pub use metadata::check_metadata;
pub use report::{CheckStatus, ValidationCheck, ValidationReport};
