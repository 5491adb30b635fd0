use std::collections::{BTreeMap, HashMap};

use super::column::{
    AbundanceStatistic, AbundanceTarget, Column, ColumnKind, FlexibleElement, LogicalPosition,
    OptionTarget, MAX_ID,
};
use super::schema::{schema_for, SectionSchema};
use crate::section::Section;

/// Errors raised by the column factory
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    /// Section without a column schema (metadata, comments)
    #[error("No column schema is defined for section {0}")]
    UnsupportedSection(Section),

    /// Column kind not available in this table
    #[error("Column '{header}' is not applicable to the {section} table")]
    NotApplicable {
        /// Requested header
        header: String,
        /// Table header section
        section: Section,
    },

    /// Id outside `1..=MAX_ID`
    #[error("Id {id} is outside the accepted range 1..={max}")]
    IdOutOfRange {
        /// Offending id
        id: u32,
        /// Largest accepted id
        max: u32,
    },
}

/// Request for an optional column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionalColumn {
    /// Conventionally positioned optional column (`reliability`, `uri`, `go_terms`)
    Stable(String),
    /// Repeatable column
    Flexible {
        /// Which repeatable column
        element: FlexibleElement,
        /// Score id
        id: Option<u32>,
        /// ms_run id
        ms_run: Option<u32>,
    },
    /// `..._abundance_assay[id]`
    AbundanceAssay(u32),
    /// The `..._abundance_*study_variable[id]` triple
    AbundanceStudyVariable(u32),
    /// `opt_{target}_{name}`
    Option {
        /// Attached element
        target: OptionTarget,
        /// Column name
        name: String,
    },
    /// `opt_{target}_cv_{accession}_{name}`
    CvParamOption {
        /// Attached element
        target: OptionTarget,
        /// CV accession
        accession: Option<String>,
        /// Term name
        name: Option<String>,
    },
}

impl OptionalColumn {
    /// `best_search_engine_score[id]`
    pub fn best_search_engine_score(id: u32) -> Self {
        Self::Flexible {
            element: FlexibleElement::BestSearchEngineScore,
            id: Some(id),
            ms_run: None,
        }
    }

    /// `search_engine_score[id]` (PSM table)
    pub fn search_engine_score(id: u32) -> Self {
        Self::Flexible {
            element: FlexibleElement::SearchEngineScore,
            id: Some(id),
            ms_run: None,
        }
    }

    /// `search_engine_score[id]_ms_run[ms_run]`
    pub fn search_engine_score_ms_run(id: u32, ms_run: u32) -> Self {
        Self::Flexible {
            element: FlexibleElement::SearchEngineScoreMsRun,
            id: Some(id),
            ms_run: Some(ms_run),
        }
    }

    /// `num_psms_ms_run[ms_run]` and the other per-ms_run counts
    pub fn per_ms_run(element: FlexibleElement, ms_run: u32) -> Self {
        Self::Flexible {
            element,
            id: None,
            ms_run: Some(ms_run),
        }
    }
}

/// The ordered column set of one table.
///
/// Built once per header line. Stable columns are fixed by the table's schema;
/// optional columns are added by header text and adding the same header twice
/// returns the existing column. Ids are not checked against metadata here;
/// the header line parser does that before registering a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFactory {
    section: Section,
    schema: &'static SectionSchema,
    columns: BTreeMap<LogicalPosition, Column>,
    headers: HashMap<String, LogicalPosition>,
}

impl ColumnFactory {
    /// Create an empty factory for a table. Accepts the header or data section.
    pub fn new(section: Section) -> Result<Self, FactoryError> {
        let schema = schema_for(section).ok_or(FactoryError::UnsupportedSection(section))?;
        Ok(Self {
            section: schema.section,
            schema,
            columns: BTreeMap::new(),
            headers: HashMap::new(),
        })
    }

    /// Create a factory already holding the table's stable columns
    pub fn with_stable_columns(section: Section) -> Result<Self, FactoryError> {
        let mut factory = Self::new(section)?;
        factory.add_stable_columns();
        Ok(factory)
    }

    /// Header section of the table
    pub fn section(&self) -> Section {
        self.section
    }

    /// Add every mandatory stable column. Calling it again has no effect.
    pub fn add_stable_columns(&mut self) {
        for def in self.schema.mandatory() {
            self.insert(Column::stable(def.header, def.data_type, def.order, true));
        }
    }

    /// Add an optional column, or return the existing one with the same
    /// header. Study variable abundance requests add the whole triple and
    /// return the position of its value column.
    pub fn add_optional_column(
        &mut self,
        request: OptionalColumn,
    ) -> Result<LogicalPosition, FactoryError> {
        let column = self.build_column(request)?;
        if let AbundanceTarget::StudyVariable(id, AbundanceStatistic::Value) =
            match column.kind() {
                ColumnKind::Abundance { target } => *target,
                _ => AbundanceTarget::Assay(0),
            }
        {
            let prefix = self.abundance_prefix(column.header())?;
            let order = column.order();
            let value = self.insert(column);
            for stat in [AbundanceStatistic::Stdev, AbundanceStatistic::StdError] {
                self.insert(Column::abundance(
                    AbundanceTarget::StudyVariable(id, stat),
                    prefix,
                    order,
                ));
            }
            return Ok(value);
        }
        Ok(self.insert(column))
    }

    fn abundance_prefix(&self, header: &str) -> Result<&'static str, FactoryError> {
        self.schema
            .abundance
            .map(|a| a.prefix)
            .ok_or_else(|| self.not_applicable(header))
    }

    fn not_applicable(&self, header: &str) -> FactoryError {
        FactoryError::NotApplicable {
            header: header.to_string(),
            section: self.section,
        }
    }

    fn check_id(id: u32) -> Result<u32, FactoryError> {
        if (1..=MAX_ID).contains(&id) {
            Ok(id)
        } else {
            Err(FactoryError::IdOutOfRange { id, max: MAX_ID })
        }
    }

    fn build_column(&self, request: OptionalColumn) -> Result<Column, FactoryError> {
        match request {
            OptionalColumn::Stable(header) => {
                let def = self
                    .schema
                    .stable_def(&header)
                    .ok_or_else(|| self.not_applicable(&header))?;
                Ok(Column::stable(def.header, def.data_type, def.order, def.mandatory))
            }
            OptionalColumn::Flexible { element, id, ms_run } => {
                let header = element.header(id, ms_run);
                let order = self
                    .schema
                    .flexible_order(element)
                    .ok_or_else(|| self.not_applicable(&header))?;
                if element.has_score_id() != id.is_some() || element.has_ms_run() != ms_run.is_some()
                {
                    return Err(self.not_applicable(&header));
                }
                let id = id.map(Self::check_id).transpose()?;
                let ms_run = ms_run.map(Self::check_id).transpose()?;
                Ok(Column::flexible(element, order, id, ms_run))
            }
            OptionalColumn::AbundanceAssay(id) => {
                let header = AbundanceTarget::Assay(id).header("");
                let abundance = self.schema.abundance.ok_or_else(|| self.not_applicable(&header))?;
                Ok(Column::abundance(
                    AbundanceTarget::Assay(Self::check_id(id)?),
                    abundance.prefix,
                    abundance.assay_order,
                ))
            }
            OptionalColumn::AbundanceStudyVariable(id) => {
                let target = AbundanceTarget::StudyVariable(id, AbundanceStatistic::Value);
                let abundance = self
                    .schema
                    .abundance
                    .ok_or_else(|| self.not_applicable(&target.header("")))?;
                Self::check_id(id)?;
                Ok(Column::abundance(
                    target,
                    abundance.prefix,
                    abundance.study_variable_order,
                ))
            }
            OptionalColumn::Option { target, name } => {
                if let Some(id) = target.id() {
                    Self::check_id(id)?;
                }
                Ok(Column::option(target, &name))
            }
            OptionalColumn::CvParamOption {
                target,
                accession,
                name,
            } => {
                if let Some(id) = target.id() {
                    Self::check_id(id)?;
                }
                Ok(Column::cv_param_option(
                    target,
                    accession.as_deref(),
                    name.as_deref(),
                ))
            }
        }
    }

    fn insert(&mut self, column: Column) -> LogicalPosition {
        if let Some(existing) = self.headers.get(column.header()) {
            return existing.clone();
        }
        let position = column.logical_position().clone();
        self.headers
            .insert(column.header().to_string(), position.clone());
        self.columns.insert(position.clone(), column);
        position
    }

    /// Find a column by its header text
    pub fn find_column_by_header(&self, header: &str) -> Option<&Column> {
        self.headers
            .get(header)
            .and_then(|position| self.columns.get(position))
    }

    /// Find a column by its logical position
    pub fn find_column_by_logical_position(&self, position: &LogicalPosition) -> Option<&Column> {
        self.columns.get(position)
    }

    /// Whether a column with this header is registered
    pub fn contains_header(&self, header: &str) -> bool {
        self.headers.contains_key(header)
    }

    /// All columns in logical order
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Mandatory stable columns in logical order
    pub fn stable_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns().filter(|c| !c.is_optional())
    }

    /// Every other column in logical order
    pub fn optional_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns().filter(|c| c.is_optional())
    }

    /// Abundance columns in logical order
    pub fn abundance_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns()
            .filter(|c| matches!(c.kind(), ColumnKind::Abundance { .. }))
    }

    /// Number of registered columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when no column is registered
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Header prefix of the table's abundance columns, if quantifiable
    pub fn abundance_header_prefix(&self) -> Option<&'static str> {
        self.schema.abundance.map(|a| a.prefix)
    }

    pub(crate) fn schema(&self) -> &'static SectionSchema {
        self.schema
    }
}
