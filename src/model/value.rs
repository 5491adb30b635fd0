//! Typed cell values and their text grammars.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use super::column::ColumnDataType;
use super::record::RecordError;
use crate::controlled_vocabulary::{split_outside_brackets, CvParam, CvParamList};

/// Text written for a missing value
pub const NULL: &str = "null";

static URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:\S+$").expect("valid pattern"));

static SPECTRA_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ms_run\[(\d+)\]:(\S.*)$").expect("valid pattern"));

static POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(\[.*\])?$").expect("valid pattern"));

/// Identification reliability of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Reliability {
    /// `1`
    High,
    /// `2`
    Medium,
    /// `3`
    Poor,
}

impl Reliability {
    /// Numeric code written in the file
    pub fn code(&self) -> u8 {
        match self {
            Reliability::High => 1,
            Reliability::Medium => 2,
            Reliability::Poor => 3,
        }
    }
}

/// Identifier of a reported modification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModificationKind {
    /// `UNIMOD:{n}`
    Unimod(String),
    /// `MOD:{n}` (PSI-MOD)
    PsiMod(String),
    /// `CHEMMOD:{formula or mass}`
    ChemMod(String),
    /// `SUBST:{residue}`
    Substitution(String),
    /// A neutral loss reported as a parameter on its own
    NeutralLoss(CvParam),
}

impl fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModificationKind::Unimod(a) => write!(f, "UNIMOD:{}", a),
            ModificationKind::PsiMod(a) => write!(f, "MOD:{}", a),
            ModificationKind::ChemMod(a) => write!(f, "CHEMMOD:{}", a),
            ModificationKind::Substitution(a) => write!(f, "SUBST:{}", a),
            ModificationKind::NeutralLoss(p) => write!(f, "{}", p),
        }
    }
}

/// Position of a modification, optionally with a localisation score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModificationPosition {
    /// 1-based residue position, `0` for the N-terminus
    pub position: u32,
    /// Localisation reliability parameter
    pub reliability: Option<CvParam>,
}

/// One entry of a modifications cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    /// Possible positions, empty when unknown
    pub positions: Vec<ModificationPosition>,
    /// Modification identifier
    pub kind: ModificationKind,
    /// Neutral loss attached to the modification
    pub neutral_loss: Option<CvParam>,
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.positions.is_empty() {
            let positions: Vec<String> = self
                .positions
                .iter()
                .map(|p| match &p.reliability {
                    Some(param) => format!("{}{}", p.position, param),
                    None => p.position.to_string(),
                })
                .collect();
            write!(f, "{}-", positions.join("|"))?;
        }
        write!(f, "{}", self.kind)?;
        if let Some(loss) = &self.neutral_loss {
            write!(f, "|{}", loss)?;
        }
        Ok(())
    }
}

/// `ms_run[n]:{spectrum id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpectraRef {
    /// Referenced ms_run id
    pub ms_run: u32,
    /// Native spectrum id within the run
    pub reference: String,
}

impl fmt::Display for SpectraRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ms_run[{}]:{}", self.ms_run, self.reference)
    }
}

/// A typed cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// `null`
    #[default]
    Null,
    /// Free text
    String(String),
    /// Double, possibly `NaN` or infinite
    Double(f64),
    /// Integer
    Integer(i64),
    /// Boolean
    Boolean(bool),
    /// URI
    Uri(String),
    /// Reliability
    Reliability(Reliability),
    /// Parameter list
    ParamList(CvParamList),
    /// String list
    StringList(Vec<String>),
    /// Double list
    DoubleList(Vec<f64>),
    /// Modifications; empty for the `0` marker
    Modifications(Vec<Modification>),
    /// Spectra references
    SpectraRefs(Vec<SpectraRef>),
}

impl CellValue {
    /// True for `null`
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Whether this value may be stored in a column of the given type
    pub fn fits(&self, data_type: ColumnDataType) -> bool {
        matches!(
            (self, data_type),
            (CellValue::Null, _)
                | (CellValue::String(_), ColumnDataType::String)
                | (CellValue::Double(_), ColumnDataType::Double)
                | (CellValue::Integer(_), ColumnDataType::Integer)
                | (CellValue::Boolean(_), ColumnDataType::Boolean)
                | (CellValue::Uri(_), ColumnDataType::Uri)
                | (CellValue::Reliability(_), ColumnDataType::Reliability)
                | (CellValue::ParamList(_), ColumnDataType::ParamList)
                | (CellValue::StringList(_), ColumnDataType::StringList(_))
                | (CellValue::DoubleList(_), ColumnDataType::DoubleList(_))
                | (CellValue::Modifications(_), ColumnDataType::ModificationList)
                | (CellValue::SpectraRefs(_), ColumnDataType::SpectraRefList)
        )
    }

    /// Parse cell text according to a column type
    pub fn parse(raw: &str, data_type: ColumnDataType) -> Result<Self, RecordError> {
        let text = raw.trim();
        if text.is_empty() || text.eq_ignore_ascii_case(NULL) {
            return Ok(CellValue::Null);
        }
        let invalid = || RecordError::InvalidValue {
            expected: data_type,
            value: raw.to_string(),
        };

        let value = match data_type {
            ColumnDataType::String => CellValue::String(text.to_string()),
            ColumnDataType::Double => CellValue::Double(parse_double(text).ok_or_else(invalid)?),
            ColumnDataType::Integer => CellValue::Integer(text.parse().map_err(|_| invalid())?),
            ColumnDataType::Boolean => match text {
                "0" => CellValue::Boolean(false),
                "1" => CellValue::Boolean(true),
                _ => return Err(invalid()),
            },
            ColumnDataType::Uri => {
                if !URI.is_match(text) {
                    return Err(invalid());
                }
                CellValue::Uri(text.to_string())
            }
            ColumnDataType::Reliability => CellValue::Reliability(match text {
                "1" => Reliability::High,
                "2" => Reliability::Medium,
                "3" => Reliability::Poor,
                _ => return Err(invalid()),
            }),
            ColumnDataType::ParamList => {
                CellValue::ParamList(text.parse().map_err(|_| invalid())?)
            }
            ColumnDataType::StringList(sep) => CellValue::StringList(
                split_outside_brackets(text, sep)
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .collect(),
            ),
            ColumnDataType::DoubleList(sep) => CellValue::DoubleList(
                text.split(sep)
                    .map(|s| parse_double(s.trim()))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(invalid)?,
            ),
            ColumnDataType::ModificationList => {
                if text == "0" {
                    CellValue::Modifications(Vec::new())
                } else {
                    CellValue::Modifications(
                        split_outside_brackets(text, ',')
                            .into_iter()
                            .map(|item| parse_modification(item.trim()))
                            .collect::<Option<Vec<_>>>()
                            .ok_or_else(invalid)?,
                    )
                }
            }
            ColumnDataType::SpectraRefList => CellValue::SpectraRefs(
                text.split('|')
                    .map(|item| parse_spectra_ref(item.trim()))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(invalid)?,
            ),
        };
        Ok(value)
    }
}

/// Write a double the way mzTab does, with `NaN` and `INF` sentinels
fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        value.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str(NULL),
            CellValue::String(s) | CellValue::Uri(s) => f.write_str(s),
            CellValue::Double(v) => f.write_str(&format_double(*v)),
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Boolean(v) => f.write_str(if *v { "1" } else { "0" }),
            CellValue::Reliability(r) => write!(f, "{}", r.code()),
            CellValue::ParamList(list) => write!(f, "{}", list),
            CellValue::StringList(items) => f.write_str(&items.join("|")),
            CellValue::DoubleList(items) => {
                let items: Vec<String> = items.iter().map(|v| format_double(*v)).collect();
                f.write_str(&items.join("|"))
            }
            CellValue::Modifications(mods) if mods.is_empty() => f.write_str("0"),
            CellValue::Modifications(mods) => {
                let items: Vec<String> = mods.iter().map(ToString::to_string).collect();
                f.write_str(&items.join(","))
            }
            CellValue::SpectraRefs(refs) => {
                let items: Vec<String> = refs.iter().map(ToString::to_string).collect();
                f.write_str(&items.join("|"))
            }
        }
    }
}

/// Plain decimal or scientific notation, or one of `NaN`, `INF`, `-INF`
pub(crate) fn parse_double(text: &str) -> Option<f64> {
    match text {
        "NaN" => Some(f64::NAN),
        "INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        _ if !text.is_empty()
            && text
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')) =>
        {
            text.parse().ok()
        }
        _ => None,
    }
}

fn parse_spectra_ref(item: &str) -> Option<SpectraRef> {
    let caps = SPECTRA_REF.captures(item)?;
    let ms_run = caps[1].parse().ok().filter(|id| *id >= 1)?;
    Some(SpectraRef {
        ms_run,
        reference: caps[2].to_string(),
    })
}

fn parse_modification(item: &str) -> Option<Modification> {
    if item.starts_with('[') {
        let param: CvParam = item.parse().ok()?;
        return Some(Modification {
            positions: Vec::new(),
            kind: ModificationKind::NeutralLoss(param),
            neutral_loss: None,
        });
    }

    let (positions, identifier) = match split_positions(item) {
        Some((head, tail)) => (parse_positions(head)?, tail),
        None => (Vec::new(), item),
    };

    let mut parts = split_outside_brackets(identifier, '|').into_iter();
    let kind = parse_modification_kind(parts.next()?.trim())?;
    let neutral_loss = match parts.next() {
        Some(loss) => Some(loss.trim().parse::<CvParam>().ok()?),
        None => None,
    };
    if parts.next().is_some() {
        return None;
    }

    Some(Modification {
        positions,
        kind,
        neutral_loss,
    })
}

/// Split `{positions}-{identifier}` at the first `-` outside brackets whose
/// prefix starts with a digit. `CHEMMOD:-18.01` has no position block.
fn split_positions(item: &str) -> Option<(&str, &str)> {
    if !item.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in item.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '-' if depth == 0 => return Some((&item[..i], &item[i + 1..])),
            _ => {}
        }
    }
    None
}

fn parse_positions(text: &str) -> Option<Vec<ModificationPosition>> {
    split_outside_brackets(text, '|')
        .into_iter()
        .map(|p| {
            let caps = POSITION.captures(p.trim())?;
            let position = caps[1].parse().ok()?;
            let reliability = match caps.get(2) {
                Some(param) => Some(param.as_str().parse::<CvParam>().ok()?),
                None => None,
            };
            Some(ModificationPosition {
                position,
                reliability,
            })
        })
        .collect()
}

fn parse_modification_kind(text: &str) -> Option<ModificationKind> {
    let (prefix, accession) = text.split_once(':')?;
    if accession.is_empty() {
        return None;
    }
    let accession = accession.to_string();
    match prefix {
        "UNIMOD" => Some(ModificationKind::Unimod(accession)),
        "MOD" => Some(ModificationKind::PsiMod(accession)),
        "CHEMMOD" => Some(ModificationKind::ChemMod(accession)),
        "SUBST" => Some(ModificationKind::Substitution(accession)),
        _ => None,
    }
}
