use serde::{Deserialize, Serialize};
use std::fmt;

use crate::controlled_vocabulary::CvParam;

/// Largest id accepted in `[id]` suffixes. Keeps every logical position
/// field at a fixed width.
pub const MAX_ID: u32 = 99_999;

/// Value type of a column's cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnDataType {
    /// Free text
    String,
    /// Floating point, with `NaN` and `INF` sentinels
    Double,
    /// Signed integer
    Integer,
    /// `0` or `1`
    Boolean,
    /// URI
    Uri,
    /// `1`, `2` or `3`
    Reliability,
    /// `|`-separated parameters
    ParamList,
    /// Strings separated by the given character
    StringList(char),
    /// Doubles separated by the given character
    DoubleList(char),
    /// Comma-separated modifications
    ModificationList,
    /// `|`-separated spectra references
    SpectraRefList,
}

impl ColumnDataType {
    /// True for the structured list types
    pub fn is_structured_list(&self) -> bool {
        matches!(
            self,
            ColumnDataType::ParamList
                | ColumnDataType::StringList(_)
                | ColumnDataType::DoubleList(_)
                | ColumnDataType::ModificationList
                | ColumnDataType::SpectraRefList
        )
    }
}

impl fmt::Display for ColumnDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnDataType::String => f.write_str("a string"),
            ColumnDataType::Double => f.write_str("a double"),
            ColumnDataType::Integer => f.write_str("an integer"),
            ColumnDataType::Boolean => f.write_str("a boolean (0 or 1)"),
            ColumnDataType::Uri => f.write_str("a URI"),
            ColumnDataType::Reliability => f.write_str("a reliability (1, 2 or 3)"),
            ColumnDataType::ParamList => f.write_str("a '|'-separated parameter list"),
            ColumnDataType::StringList(sep) => write!(f, "a '{}'-separated string list", sep),
            ColumnDataType::DoubleList(sep) => write!(f, "a '{}'-separated double list", sep),
            ColumnDataType::ModificationList => f.write_str("a modification list"),
            ColumnDataType::SpectraRefList => f.write_str("a spectra reference list"),
        }
    }
}

/// Order-independent identity of a column.
///
/// Rendered as `{order:02}{id:05}{sub:05}` with `0` standing in for an absent
/// field, so comparing the strings reproduces the canonical column order no
/// matter in which order columns were registered. Free-form option columns
/// append their name to keep distinct columns apart.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogicalPosition(String);

impl LogicalPosition {
    /// Width of the order field
    pub const ORDER_WIDTH: usize = 2;
    /// Width of the id and sub-element fields
    pub const ID_WIDTH: usize = 5;

    fn with_name(order: u8, id: Option<u32>, name: &str) -> Self {
        let mut position = logical_position(order, id, None);
        position.0.push_str(name);
        position
    }

    /// The rendered key
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Structural order number
    pub fn order(&self) -> u8 {
        self.0[..Self::ORDER_WIDTH].parse().unwrap_or_default()
    }
}

impl fmt::Display for LogicalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the logical position of a column from its structural order, an
/// optional instance id and an optional sub-element id
pub fn logical_position(order: u8, id: Option<u32>, sub_element: Option<u32>) -> LogicalPosition {
    LogicalPosition(format!(
        "{:0ow$}{:0iw$}{:0iw$}",
        order,
        id.unwrap_or(0),
        sub_element.unwrap_or(0),
        ow = LogicalPosition::ORDER_WIDTH,
        iw = LogicalPosition::ID_WIDTH,
    ))
}

/// Repeatable columns with a fixed place in the column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlexibleElement {
    /// `best_search_engine_score[id]`
    BestSearchEngineScore,
    /// `search_engine_score[id]` (PSM table)
    SearchEngineScore,
    /// `search_engine_score[id]_ms_run[run]`
    SearchEngineScoreMsRun,
    /// `num_psms_ms_run[run]`
    NumPsms,
    /// `num_peptides_distinct_ms_run[run]`
    NumPeptidesDistinct,
    /// `num_peptides_unique_ms_run[run]`
    NumPeptidesUnique,
}

impl FlexibleElement {
    /// Header name before any `[id]`
    pub fn name(&self) -> &'static str {
        match self {
            FlexibleElement::BestSearchEngineScore => "best_search_engine_score",
            FlexibleElement::SearchEngineScore | FlexibleElement::SearchEngineScoreMsRun => {
                "search_engine_score"
            }
            FlexibleElement::NumPsms => "num_psms",
            FlexibleElement::NumPeptidesDistinct => "num_peptides_distinct",
            FlexibleElement::NumPeptidesUnique => "num_peptides_unique",
        }
    }

    /// Whether the header carries a score id
    pub fn has_score_id(&self) -> bool {
        matches!(
            self,
            FlexibleElement::BestSearchEngineScore
                | FlexibleElement::SearchEngineScore
                | FlexibleElement::SearchEngineScoreMsRun
        )
    }

    /// Whether the header carries an `_ms_run[run]` suffix
    pub fn has_ms_run(&self) -> bool {
        matches!(
            self,
            FlexibleElement::SearchEngineScoreMsRun
                | FlexibleElement::NumPsms
                | FlexibleElement::NumPeptidesDistinct
                | FlexibleElement::NumPeptidesUnique
        )
    }

    /// Cell type
    pub fn data_type(&self) -> ColumnDataType {
        match self {
            FlexibleElement::NumPsms
            | FlexibleElement::NumPeptidesDistinct
            | FlexibleElement::NumPeptidesUnique => ColumnDataType::Integer,
            _ => ColumnDataType::Double,
        }
    }

    pub(crate) fn header(&self, id: Option<u32>, ms_run: Option<u32>) -> String {
        let mut header = self.name().to_string();
        if let Some(id) = id {
            header.push_str(&format!("[{}]", id));
        }
        if let Some(run) = ms_run {
            header.push_str(&format!("_ms_run[{}]", run));
        }
        header
    }
}

/// Statistic carried by a study variable abundance column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbundanceStatistic {
    /// `..._abundance_study_variable[id]`
    Value,
    /// `..._abundance_stdev_study_variable[id]`
    Stdev,
    /// `..._abundance_std_error_study_variable[id]`
    StdError,
}

impl AbundanceStatistic {
    /// The ordered triple
    pub const TRIPLE: [AbundanceStatistic; 3] = [
        AbundanceStatistic::Value,
        AbundanceStatistic::Stdev,
        AbundanceStatistic::StdError,
    ];

    fn sub_element(&self) -> u32 {
        match self {
            AbundanceStatistic::Value => 1,
            AbundanceStatistic::Stdev => 2,
            AbundanceStatistic::StdError => 3,
        }
    }

    fn infix(&self) -> &'static str {
        match self {
            AbundanceStatistic::Value => "abundance",
            AbundanceStatistic::Stdev => "abundance_stdev",
            AbundanceStatistic::StdError => "abundance_std_error",
        }
    }
}

/// What an abundance column quantifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbundanceTarget {
    /// `..._abundance_assay[id]`
    Assay(u32),
    /// One member of the `..._study_variable[id]` triple
    StudyVariable(u32, AbundanceStatistic),
}

impl AbundanceTarget {
    pub(crate) fn header(&self, prefix: &str) -> String {
        match self {
            AbundanceTarget::Assay(id) => format!("{}_abundance_assay[{}]", prefix, id),
            AbundanceTarget::StudyVariable(id, stat) => {
                format!("{}_{}_study_variable[{}]", prefix, stat.infix(), id)
            }
        }
    }
}

/// Element an `opt_` column is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionTarget {
    /// `opt_global_...`
    Global,
    /// `opt_ms_run[id]_...`
    MsRun(u32),
    /// `opt_assay[id]_...`
    Assay(u32),
    /// `opt_study_variable[id]_...`
    StudyVariable(u32),
}

impl OptionTarget {
    /// Order block shared by all option columns of this target kind
    fn order(&self) -> u8 {
        match self {
            OptionTarget::Global => OPTION_ORDER,
            OptionTarget::MsRun(_) => OPTION_ORDER + 1,
            OptionTarget::Assay(_) => OPTION_ORDER + 2,
            OptionTarget::StudyVariable(_) => OPTION_ORDER + 3,
        }
    }

    /// Referenced id, if any
    pub fn id(&self) -> Option<u32> {
        match self {
            OptionTarget::Global => None,
            OptionTarget::MsRun(id) | OptionTarget::Assay(id) | OptionTarget::StudyVariable(id) => {
                Some(*id)
            }
        }
    }
}

impl fmt::Display for OptionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionTarget::Global => f.write_str("global"),
            OptionTarget::MsRun(id) => write!(f, "ms_run[{}]", id),
            OptionTarget::Assay(id) => write!(f, "assay[{}]", id),
            OptionTarget::StudyVariable(id) => write!(f, "study_variable[{}]", id),
        }
    }
}

/// First order number of the option column block; always after every
/// structural column of every table.
pub const OPTION_ORDER: u8 = 90;

/// Column category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Fixed header, type and order. `mandatory` is false for the
    /// conventionally positioned optional columns (`reliability`, `uri`,
    /// `go_terms`).
    Stable {
        /// Whether the header must be present
        mandatory: bool,
    },
    /// Repeatable column with a fixed place in the order
    FlexibleStable {
        /// Which repeatable column
        element: FlexibleElement,
        /// Score id
        id: Option<u32>,
        /// ms_run id
        ms_run: Option<u32>,
    },
    /// Abundance value or statistic
    Abundance {
        /// Quantified element
        target: AbundanceTarget,
    },
    /// Free-form `opt_{target}_{name}` column
    Option {
        /// Attached element
        target: OptionTarget,
        /// Name after the target
        name: String,
    },
    /// `opt_{target}_cv_{accession}_{name}` column
    CvParamOption {
        /// Attached element
        target: OptionTarget,
        /// CV accession
        accession: Option<String>,
        /// Term name with spaces written as underscores
        name: Option<String>,
    },
}

/// A single table column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    header: String,
    data_type: ColumnDataType,
    order: u8,
    kind: ColumnKind,
    position: LogicalPosition,
}

impl Column {
    pub(crate) fn stable(header: &str, data_type: ColumnDataType, order: u8, mandatory: bool) -> Self {
        Self {
            header: header.to_string(),
            data_type,
            order,
            kind: ColumnKind::Stable { mandatory },
            position: logical_position(order, None, None),
        }
    }

    pub(crate) fn flexible(
        element: FlexibleElement,
        order: u8,
        id: Option<u32>,
        ms_run: Option<u32>,
    ) -> Self {
        // Columns keyed only by ms_run use the run as their instance id.
        let position = match (id, ms_run) {
            (Some(id), run) => logical_position(order, Some(id), run),
            (None, run) => logical_position(order, run, None),
        };
        Self {
            header: element.header(id, ms_run),
            data_type: element.data_type(),
            order,
            kind: ColumnKind::FlexibleStable { element, id, ms_run },
            position,
        }
    }

    pub(crate) fn abundance(target: AbundanceTarget, prefix: &str, order: u8) -> Self {
        let position = match target {
            AbundanceTarget::Assay(id) => logical_position(order, Some(id), None),
            AbundanceTarget::StudyVariable(id, stat) => {
                logical_position(order, Some(id), Some(stat.sub_element()))
            }
        };
        Self {
            header: target.header(prefix),
            data_type: ColumnDataType::Double,
            order,
            kind: ColumnKind::Abundance { target },
            position,
        }
    }

    pub(crate) fn option(target: OptionTarget, name: &str) -> Self {
        Self {
            header: format!("opt_{}_{}", target, name),
            data_type: ColumnDataType::String,
            order: target.order(),
            kind: ColumnKind::Option {
                target,
                name: name.to_string(),
            },
            position: LogicalPosition::with_name(target.order(), target.id(), name),
        }
    }

    pub(crate) fn cv_param_option(
        target: OptionTarget,
        accession: Option<&str>,
        name: Option<&str>,
    ) -> Self {
        let name = name.map(|n| n.replace(' ', "_"));
        let mut suffix = String::from("cv");
        if let Some(accession) = accession {
            suffix.push('_');
            suffix.push_str(accession);
        }
        if let Some(name) = &name {
            suffix.push('_');
            suffix.push_str(name);
        }
        Self {
            header: format!("opt_{}_{}", target, suffix),
            data_type: crate::controlled_vocabulary::option_column_type(accession),
            order: target.order(),
            kind: ColumnKind::CvParamOption {
                target,
                accession: accession.map(str::to_string),
                name,
            },
            position: LogicalPosition::with_name(target.order(), target.id(), &suffix),
        }
    }

    /// Header text
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Cell type
    pub fn data_type(&self) -> ColumnDataType {
        self.data_type
    }

    /// Structural order number
    pub fn order(&self) -> u8 {
        self.order
    }

    /// Column category
    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    /// Logical position
    pub fn logical_position(&self) -> &LogicalPosition {
        &self.position
    }

    /// True for every column that is not a mandatory stable column
    pub fn is_optional(&self) -> bool {
        !matches!(self.kind, ColumnKind::Stable { mandatory: true })
    }

    /// The CV parameter named by a CV option column
    pub fn cv_param(&self) -> Option<CvParam> {
        match &self.kind {
            ColumnKind::CvParamOption {
                accession: Some(accession),
                name,
                ..
            } => Some(CvParam::new(
                accession,
                &name.as_deref().unwrap_or_default().replace('_', " "),
            )),
            _ => None,
        }
    }
}
