//! # Controlled vocabulary parameters
//!
//! mzTab writes every controlled-vocabulary reference as a four-field
//! parameter `[label, accession, name, value]`. A parameter whose label and
//! accession are empty is a user parameter carrying only a name and value.
//!
//! ## Reference
//! - PSI-MS OBO: https://raw.githubusercontent.com/HUPO-PSI/psi-ms-CV/master/psi-ms.obo
//! - mzTab 1.0 format: https://github.com/HUPO-PSI/mzTab

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ErrorKind;
use crate::model::ColumnDataType;

/// A controlled vocabulary or user parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CvParam {
    /// CV label (e.g., "MS"), empty for user parameters
    pub label: String,
    /// CV accession (e.g., "MS:1001477"), empty for user parameters
    pub accession: String,
    /// Human-readable name
    pub name: String,
    /// Optional value
    pub value: Option<String>,
}

impl CvParam {
    /// Create a CV parameter. The label is taken from the accession prefix.
    pub fn new(accession: &str, name: &str) -> Self {
        let label = accession.split(':').next().unwrap_or_default();
        Self {
            label: label.to_string(),
            accession: accession.to_string(),
            name: name.to_string(),
            value: None,
        }
    }

    /// Create a user parameter with no CV reference
    pub fn user(name: &str) -> Self {
        Self {
            label: String::new(),
            accession: String::new(),
            name: name.to_string(),
            value: None,
        }
    }

    /// Add a value to the parameter
    pub fn with_value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// True when label and accession are empty
    pub fn is_user_param(&self) -> bool {
        self.label.is_empty() && self.accession.is_empty()
    }
}

impl fmt::Display for CvParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = |s: &str| {
            if s.contains(',') {
                format!("\"{}\"", s)
            } else {
                s.to_string()
            }
        };
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.label,
            self.accession,
            quote(&self.name),
            quote(self.value.as_deref().unwrap_or_default())
        )
    }
}

impl FromStr for CvParam {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ErrorKind::ParamFormat {
            value: s.to_string(),
        };
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .ok_or_else(invalid)?;

        let fields = split_unquoted(inner, ',');
        if fields.len() != 4 {
            return Err(invalid());
        }
        let field = |i: usize| {
            let f = fields[i].trim();
            f.strip_prefix('"')
                .and_then(|f| f.strip_suffix('"'))
                .unwrap_or(f)
                .trim()
                .to_string()
        };

        let label = field(0);
        let accession = field(1);
        let name = field(2);
        let value = field(3);

        if name.is_empty() || label.is_empty() != accession.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            label,
            accession,
            name,
            value: if value.is_empty() { None } else { Some(value) },
        })
    }
}

/// Split on `separator`, ignoring separators inside double quotes
fn split_unquoted(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == separator && !in_quotes {
            parts.push(&s[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Split on `separator`, ignoring separators inside square brackets or quotes
pub(crate) fn split_outside_brackets(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '[' if !in_quotes => depth += 1,
            ']' if !in_quotes => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 && !in_quotes => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// A `|`-separated list of parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvParamList {
    params: Vec<CvParam>,
}

impl CvParamList {
    /// Create a new empty parameter list
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Add a parameter to the list
    pub fn add(&mut self, param: CvParam) {
        self.params.push(param);
    }

    /// Add a parameter to the list (builder pattern)
    pub fn with(mut self, param: CvParam) -> Self {
        self.add(param);
        self
    }

    /// Get a parameter by accession
    pub fn get(&self, accession: &str) -> Option<&CvParam> {
        self.params.iter().find(|t| t.accession == accession)
    }

    /// Iterate over all parameters
    pub fn iter(&self) -> impl Iterator<Item = &CvParam> {
        self.params.iter()
    }

    /// Get the number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl FromIterator<CvParam> for CvParamList {
    fn from_iter<I: IntoIterator<Item = CvParam>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

impl FromStr for CvParamList {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        split_outside_brackets(s.trim(), '|')
            .into_iter()
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for CvParamList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{}", param)?;
        }
        Ok(())
    }
}

/// Data type of a `opt_{target}_cv_{accession}_{name}` column, resolved from
/// the accession. Unlisted accessions are strings.
pub fn option_column_type(accession: Option<&str>) -> ColumnDataType {
    match accession {
        Some(ms_terms::EMPAI_VALUE) => ColumnDataType::Double,
        Some(ms_terms::DECOY_PEPTIDE) | Some(ms_terms::PRIDE_DECOY_HIT) => ColumnDataType::Boolean,
        _ => ColumnDataType::String,
    }
}

/// PSI-MS terms with special meaning in mzTab
pub mod ms_terms {
    use super::CvParam;

    /// MS:1001905 - emPAI value
    pub const EMPAI_VALUE: &str = "MS:1001905";
    /// MS:1002217 - decoy peptide
    pub const DECOY_PEPTIDE: &str = "MS:1002217";
    /// PRIDE:0000303 - decoy hit
    pub const PRIDE_DECOY_HIT: &str = "PRIDE:0000303";
    /// MS:1002453 - No fixed modifications searched
    pub const NO_FIXED_MODIFICATIONS: &str = "MS:1002453";
    /// MS:1002454 - No variable modifications searched
    pub const NO_VARIABLE_MODIFICATIONS: &str = "MS:1002454";

    /// MS:1002453 - No fixed modifications searched
    pub fn no_fixed_modifications() -> CvParam {
        CvParam::new(NO_FIXED_MODIFICATIONS, "No fixed modifications searched")
    }

    /// MS:1002454 - No variable modifications searched
    pub fn no_variable_modifications() -> CvParam {
        CvParam::new(NO_VARIABLE_MODIFICATIONS, "No variable modifications searched")
    }

    /// MS:1001905 - emPAI value
    pub fn empai_value() -> CvParam {
        CvParam::new(EMPAI_VALUE, "emPAI value")
    }

    /// MS:1002217 - decoy peptide
    pub fn decoy_peptide() -> CvParam {
        CvParam::new(DECOY_PEPTIDE, "decoy peptide")
    }

    /// MS:1001171 - Mascot:score
    pub fn mascot_score() -> CvParam {
        CvParam::new("MS:1001171", "Mascot:score")
    }

    /// MS:1001330 - X!Tandem:expect
    pub fn xtandem_expect() -> CvParam {
        CvParam::new("MS:1001330", "X!Tandem:expect")
    }

    /// MS:1001062 - Mascot MGF file
    pub fn mascot_mgf_format() -> CvParam {
        CvParam::new("MS:1001062", "Mascot MGF file")
    }

    /// MS:1000584 - mzML format
    pub fn mzml_format() -> CvParam {
        CvParam::new("MS:1000584", "mzML format")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cv_param() {
        let param: CvParam = "[MS, MS:1001477, SpectraST, ]".parse().unwrap();
        assert_eq!(param.label, "MS");
        assert_eq!(param.accession, "MS:1001477");
        assert_eq!(param.name, "SpectraST");
        assert_eq!(param.value, None);
    }

    #[test]
    fn test_parse_user_param_with_quoted_comma() {
        let param: CvParam = "[, , \"tolerance, precursor\", 10 ppm]".parse().unwrap();
        assert!(param.is_user_param());
        assert_eq!(param.name, "tolerance, precursor");
        assert_eq!(param.value.as_deref(), Some("10 ppm"));
    }

    #[test]
    fn test_reject_malformed_params() {
        assert!("MS, MS:1001477, SpectraST, ".parse::<CvParam>().is_err());
        assert!("[MS, MS:1001477, SpectraST]".parse::<CvParam>().is_err());
        assert!("[MS, , SpectraST, ]".parse::<CvParam>().is_err());
        assert!("[MS, MS:1, , ]".parse::<CvParam>().is_err());
    }

    #[test]
    fn test_display_roundtrips() {
        let param = ms_terms::mascot_score().with_value("40");
        assert_eq!(param.to_string(), "[MS, MS:1001171, Mascot:score, 40]");
        assert_eq!(param.to_string().parse::<CvParam>().unwrap(), param);
    }

    #[test]
    fn test_param_list() {
        let list: CvParamList = "[MS, MS:1001207, Mascot, ]|[MS, MS:1001208, Sequest, ]"
            .parse()
            .unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.get("MS:1001208").is_some());
        assert!("[MS, MS:1001207, Mascot, ]|garbage".parse::<CvParamList>().is_err());
    }

    #[test]
    fn test_option_column_type_table() {
        assert_eq!(option_column_type(Some("MS:1002217")), ColumnDataType::Boolean);
        assert_eq!(option_column_type(Some("MS:1001905")), ColumnDataType::Double);
        assert_eq!(option_column_type(Some("MS:1000001")), ColumnDataType::String);
        assert_eq!(option_column_type(None), ColumnDataType::String);
    }
}
