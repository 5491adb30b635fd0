//! Header and metadata key grammars.
//!
//! The option column and CV column patterns are part of the file format and
//! keep their exact character classes.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ErrorKind;
use crate::model::MAX_ID;

/// `opt_{target}_{name}`: group 2 is the target kind, 3 its id, 4 the name
pub(crate) static OPT_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^opt_((assay|study_variable|ms_run)\[(\w+)\]|global)_([A-Za-z0-9_\-\[\]:\.]+)$")
        .expect("valid pattern")
});

/// `cv_{accession}_{name}` after the option target: group 2 is the
/// accession, 4 the name
pub(crate) static CV_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^cv(_([A-Za-z0-9\-\[\]:\.]+))?(_([A-Za-z0-9_\-\[\]:\.]+))?$")
        .expect("valid pattern")
});

pub(crate) static BEST_SCORE_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^best_search_engine_score\[([^\]]*)\]$").expect("valid pattern")
});

pub(crate) static SCORE_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^search_engine_score\[([^\]]*)\]$").expect("valid pattern"));

/// `{name}_ms_run[{id}]`
pub(crate) static MS_RUN_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)_ms_run\[([^\]]*)\]$").expect("valid pattern"));

/// `{prefix}_abundance_{kind}[{id}]`
pub(crate) static ABUNDANCE_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([a-z]+)_abundance_(assay|study_variable|stdev_study_variable|std_error_study_variable)\[([^\]]*)\]$",
    )
    .expect("valid pattern")
});

/// `{element}[{id}]-{rest}`
pub(crate) static METADATA_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_]+)(?:\[([^\]]*)\])?(?:-(.+))?$").expect("valid pattern")
});

/// `{property}[{id}]-{sub property}`
pub(crate) static METADATA_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_]+)(?:\[([^\]]*)\])?(?:-([A-Za-z_]+))?$").expect("valid pattern")
});

/// `{element}[{id}]` references in metadata values
pub(crate) static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_]+)\[([^\]]*)\]$").expect("valid pattern"));

pub(crate) static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid pattern")
});

pub(crate) static URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:\S+$").expect("valid pattern")
});

/// Parse an `[id]` as an integer in `1..=MAX_ID`. Only the canonical
/// decimal form is accepted, so `[01]` and `[ 1]` are malformed.
pub(crate) fn parse_id(raw: &str, header: &str) -> Result<u32, ErrorKind> {
    raw.parse::<u32>()
        .ok()
        .filter(|id| (1..=MAX_ID).contains(id) && id.to_string() == raw)
        .ok_or_else(|| ErrorKind::MalformedId {
            header: header.to_string(),
            max: MAX_ID,
        })
}
