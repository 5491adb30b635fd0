//! Metadata line parsing.
//!
//! Keys follow `{element}[{id}]-{property}[{sub id}]-{sub property}`. Each
//! line updates the metadata model in place; any failure is fatal.

use std::collections::{BTreeMap, HashSet};

use super::grammar::{parse_id, EMAIL, METADATA_KEY, METADATA_PROPERTY, REFERENCE, URI};
use crate::controlled_vocabulary::{CvParam, CvParamList};
use crate::error::ErrorKind;
use crate::metadata::{
    Assay, ColumnUnit, Metadata, ModificationDefinition, Mode, MsRun, MzTabType,
    PublicationItem, PublicationKind, StudyVariable,
};
use crate::section::Section;

/// Decomposed metadata key
#[derive(Debug, Default, PartialEq, Eq)]
struct MetadataKey<'k> {
    element: &'k str,
    id: Option<u32>,
    property: Option<&'k str>,
    sub_id: Option<u32>,
    sub_property: Option<&'k str>,
}

impl<'k> MetadataKey<'k> {
    fn parse(key: &'k str) -> Result<Self, ErrorKind> {
        let unknown = || ErrorKind::MetadataKey {
            key: key.to_string(),
        };
        let caps = METADATA_KEY.captures(key).ok_or_else(unknown)?;
        let id = caps
            .get(2)
            .map(|m| parse_id(m.as_str(), key))
            .transpose()?;
        let mut parsed = Self {
            element: caps.get(1).map_or("", |m| m.as_str()),
            id,
            ..Default::default()
        };
        if let Some(rest) = caps.get(3) {
            let prop = METADATA_PROPERTY
                .captures(rest.as_str())
                .ok_or_else(unknown)?;
            parsed.property = prop.get(1).map(|m| m.as_str());
            parsed.sub_id = prop
                .get(2)
                .map(|m| parse_id(m.as_str(), key))
                .transpose()?;
            parsed.sub_property = prop.get(3).map(|m| m.as_str());
        }
        Ok(parsed)
    }
}

/// Stateful parser for the `MTD` block
#[derive(Debug, Default)]
pub struct MetadataParser {
    defined: HashSet<String>,
}

impl MetadataParser {
    /// Create a parser with no keys seen
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one `MTD` line, given as its tab-separated tokens (prefix
    /// included), to `metadata`
    pub fn parse_line(&mut self, tokens: &[&str], metadata: &mut Metadata) -> Result<(), ErrorKind> {
        let [_, key, value] = tokens else {
            return Err(ErrorKind::MetadataLine {
                found: tokens.len(),
            });
        };
        let key = key.trim();
        let value = value.trim();
        let parsed = MetadataKey::parse(key)?;

        // colunit lines share one key per table.
        if parsed.element != "colunit" && !self.defined.insert(key.to_string()) {
            return Err(ErrorKind::DuplicateDefinition {
                key: key.to_string(),
            });
        }

        apply(&parsed, key, value, metadata)
    }
}

fn param(value: &str) -> Result<CvParam, ErrorKind> {
    value.parse()
}

fn param_list(value: &str) -> Result<CvParamList, ErrorKind> {
    value.parse()
}

fn uri(value: &str) -> Result<String, ErrorKind> {
    if URI.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(ErrorKind::UriFormat {
            value: value.to_string(),
        })
    }
}

fn email(value: &str) -> Result<String, ErrorKind> {
    if EMAIL.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(ErrorKind::EmailFormat {
            value: value.to_string(),
        })
    }
}

fn publication(value: &str) -> Result<Vec<PublicationItem>, ErrorKind> {
    let invalid = || ErrorKind::PublicationFormat {
        value: value.to_string(),
    };
    value
        .split('|')
        .map(|item| {
            let (prefix, accession) = item.trim().split_once(':').ok_or_else(invalid)?;
            let kind = match prefix.trim() {
                "pubmed" => PublicationKind::PubMed,
                "doi" => PublicationKind::Doi,
                _ => return Err(invalid()),
            };
            let accession = accession.trim();
            if accession.is_empty() {
                return Err(invalid());
            }
            Ok(PublicationItem {
                kind,
                accession: accession.to_string(),
            })
        })
        .collect()
}

/// Parse `element[n]`, returning `n`
fn reference(value: &str, element: &'static str) -> Result<u32, ErrorKind> {
    let invalid = || ErrorKind::ReferenceFormat {
        value: value.to_string(),
        element,
    };
    let caps = REFERENCE.captures(value.trim()).ok_or_else(invalid)?;
    if &caps[1] != element {
        return Err(invalid());
    }
    caps[2]
        .parse::<u32>()
        .ok()
        .filter(|id| *id >= 1)
        .ok_or_else(invalid)
}

/// Parse a comma-separated reference list such as `assay[1], assay[2]`
fn references(value: &str, element: &'static str) -> Result<Vec<u32>, ErrorKind> {
    value.split(',').map(|r| reference(r, element)).collect()
}

fn column_unit(value: &str, section: Section) -> Result<ColumnUnit, ErrorKind> {
    let invalid = || ErrorKind::ColumnUnitFormat {
        value: value.to_string(),
    };
    let (column, unit) = value.split_once('=').ok_or_else(invalid)?;
    let column = column.trim();
    if column.is_empty() {
        return Err(invalid());
    }
    Ok(ColumnUnit {
        section,
        column: column.to_string(),
        unit: unit.trim().parse().map_err(|_| invalid())?,
    })
}

fn score_section(element: &str) -> Option<Section> {
    match element {
        "protein_search_engine_score" => Some(Section::Protein),
        "peptide_search_engine_score" => Some(Section::Peptide),
        "psm_search_engine_score" => Some(Section::Psm),
        "smallmolecule_search_engine_score" => Some(Section::SmallMolecule),
        _ => None,
    }
}

fn table_section(name: &str) -> Option<Section> {
    match name {
        "protein" => Some(Section::Protein),
        "peptide" => Some(Section::Peptide),
        "psm" => Some(Section::Psm),
        "small_molecule" => Some(Section::SmallMolecule),
        _ => None,
    }
}

fn ms_run_entry(metadata: &mut Metadata, id: u32) -> &mut MsRun {
    metadata.ms_runs.entry(id).or_insert_with(|| MsRun::new(id))
}

fn assay_entry(metadata: &mut Metadata, id: u32) -> &mut Assay {
    metadata.assays.entry(id).or_insert_with(|| Assay::new(id))
}

fn study_variable_entry(metadata: &mut Metadata, id: u32) -> &mut StudyVariable {
    metadata
        .study_variables
        .entry(id)
        .or_insert_with(|| StudyVariable::new(id))
}

fn modification_entry(
    mods: &mut BTreeMap<u32, ModificationDefinition>,
    id: u32,
) -> &mut ModificationDefinition {
    mods.entry(id).or_insert_with(|| ModificationDefinition {
        id,
        ..Default::default()
    })
}

fn apply(
    key: &MetadataKey<'_>,
    raw_key: &str,
    value: &str,
    metadata: &mut Metadata,
) -> Result<(), ErrorKind> {
    let unknown = || ErrorKind::MetadataKey {
        key: raw_key.to_string(),
    };

    match (key.element, key.id, key.property, key.sub_id, key.sub_property) {
        ("mzTab", None, Some(property), None, None) => match property {
            "version" => metadata.version = Some(value.to_string()),
            "mode" => metadata.mode = Some(value.parse::<Mode>()?),
            "type" => metadata.file_type = Some(value.parse::<MzTabType>()?),
            "ID" => metadata.mztab_id = Some(value.to_string()),
            _ => return Err(unknown()),
        },
        ("title", None, None, None, None) => metadata.title = Some(value.to_string()),
        ("description", None, None, None, None) => {
            metadata.description = Some(value.to_string())
        }
        ("sample_processing", Some(id), None, None, None) => {
            metadata.sample_processing.insert(id, param_list(value)?);
        }
        ("instrument", Some(id), Some(property), sub_id, None) => {
            let instrument = metadata.instruments.entry(id).or_default();
            instrument.id = id;
            match (property, sub_id) {
                ("name", None) => instrument.name = Some(param(value)?),
                ("source", None) => instrument.source = Some(param(value)?),
                ("detector", None) => instrument.detector = Some(param(value)?),
                ("analyzer", Some(sub)) => {
                    instrument.analyzers.insert(sub, param(value)?);
                }
                _ => return Err(unknown()),
            }
        }
        ("software", Some(id), property, sub_id, None) => {
            let software = metadata.software.entry(id).or_default();
            software.id = id;
            match (property, sub_id) {
                (None, None) => software.param = Some(param(value)?),
                (Some("setting"), Some(sub)) => {
                    software.settings.insert(sub, value.to_string());
                }
                _ => return Err(unknown()),
            }
        }
        (element, Some(id), None, None, None) if score_section(element).is_some() => {
            let section = score_section(element).ok_or_else(unknown)?;
            metadata.add_search_engine_score(section, id, param(value)?);
        }
        ("false_discovery_rate", None, None, None, None) => {
            metadata.false_discovery_rate = Some(param_list(value)?);
        }
        ("publication", Some(id), None, None, None) => {
            metadata.publications.insert(id, publication(value)?);
        }
        ("contact", Some(id), Some(property), None, None) => {
            let contact = metadata.contacts.entry(id).or_default();
            contact.id = id;
            match property {
                "name" => contact.name = Some(value.to_string()),
                "affiliation" => contact.affiliation = Some(value.to_string()),
                "email" => contact.email = Some(email(value)?),
                _ => return Err(unknown()),
            }
        }
        ("uri", Some(id), None, None, None) => {
            metadata.uris.insert(id, uri(value)?);
        }
        (kind @ ("fixed_mod" | "variable_mod"), Some(id), property, None, None) => {
            let mods = if kind == "fixed_mod" {
                &mut metadata.fixed_mods
            } else {
                &mut metadata.variable_mods
            };
            let modification = modification_entry(mods, id);
            match property {
                None => modification.param = Some(param(value)?),
                Some("site") => modification.site = Some(value.to_string()),
                Some("position") => modification.position = Some(value.to_string()),
                Some(_) => return Err(unknown()),
            }
        }
        ("quantification_method", None, None, None, None) => {
            metadata.quantification_method = Some(param(value)?);
        }
        (table, None, Some("quantification_unit"), None, None) => {
            let section = match table {
                "protein" | "peptide" | "small_molecule" => table_section(table),
                _ => None,
            }
            .ok_or_else(unknown)?;
            metadata.quantification_units.insert(section, param(value)?);
        }
        ("ms_run", Some(id), Some(property), None, None) => {
            let ms_run = ms_run_entry(metadata, id);
            match property {
                "format" => ms_run.format = Some(param(value)?),
                "location" => ms_run.location = Some(uri(value)?),
                "id_format" => ms_run.id_format = Some(param(value)?),
                "fragmentation_method" => ms_run.fragmentation_method = Some(param_list(value)?),
                "hash" => ms_run.hash = Some(value.to_string()),
                "hash_method" => ms_run.hash_method = Some(param(value)?),
                _ => return Err(unknown()),
            }
        }
        ("custom", Some(id), None, None, None) => {
            metadata.custom.insert(id, param(value)?);
        }
        ("sample", Some(id), Some(property), sub_id, None) => {
            let sample = metadata.samples.entry(id).or_default();
            sample.id = id;
            match (property, sub_id) {
                ("description", None) => sample.description = Some(value.to_string()),
                ("species", Some(sub)) => {
                    sample.species.insert(sub, param(value)?);
                }
                ("tissue", Some(sub)) => {
                    sample.tissue.insert(sub, param(value)?);
                }
                ("cell_type", Some(sub)) => {
                    sample.cell_type.insert(sub, param(value)?);
                }
                ("disease", Some(sub)) => {
                    sample.disease.insert(sub, param(value)?);
                }
                ("custom", Some(sub)) => {
                    sample.custom.insert(sub, param(value)?);
                }
                _ => return Err(unknown()),
            }
        }
        ("assay", Some(id), Some(property), sub_id, sub_property) => {
            match (property, sub_id, sub_property) {
                ("quantification_reagent", None, None) => {
                    assay_entry(metadata, id).quantification_reagent = Some(param(value)?);
                }
                ("sample_ref", None, None) => {
                    let sample = reference(value, "sample")?;
                    if !metadata.has_sample(sample) {
                        return Err(ErrorKind::SampleNotDefined {
                            id: sample,
                            reference: raw_key.to_string(),
                        });
                    }
                    assay_entry(metadata, id).sample_ref = Some(sample);
                }
                ("ms_run_ref", None, None) => {
                    let run = reference(value, "ms_run")?;
                    if !metadata.has_ms_run(run) {
                        return Err(ErrorKind::MsRunNotDefined {
                            id: run,
                            reference: raw_key.to_string(),
                        });
                    }
                    assay_entry(metadata, id).ms_run_ref = Some(run);
                }
                ("quantification_mod", Some(sub), sub_property) => {
                    let modification =
                        modification_entry(&mut assay_entry(metadata, id).quantification_mods, sub);
                    match sub_property {
                        None => modification.param = Some(param(value)?),
                        Some("site") => modification.site = Some(value.to_string()),
                        Some("position") => modification.position = Some(value.to_string()),
                        Some(_) => return Err(unknown()),
                    }
                }
                _ => return Err(unknown()),
            }
        }
        ("study_variable", Some(id), Some(property), None, None) => match property {
            "assay_refs" => {
                let assays = references(value, "assay")?;
                if let Some(missing) = assays.iter().find(|a| !metadata.has_assay(**a)) {
                    return Err(ErrorKind::AssayNotDefined {
                        id: *missing,
                        reference: raw_key.to_string(),
                    });
                }
                study_variable_entry(metadata, id).assay_refs = assays;
            }
            "sample_refs" => {
                let samples = references(value, "sample")?;
                if let Some(missing) = samples.iter().find(|s| !metadata.has_sample(**s)) {
                    return Err(ErrorKind::SampleNotDefined {
                        id: *missing,
                        reference: raw_key.to_string(),
                    });
                }
                study_variable_entry(metadata, id).sample_refs = samples;
            }
            "description" => {
                study_variable_entry(metadata, id).description = Some(value.to_string());
            }
            _ => return Err(unknown()),
        },
        ("cv", Some(id), Some(property), None, None) => {
            let cv = metadata.cvs.entry(id).or_default();
            cv.id = id;
            match property {
                "label" => cv.label = Some(value.to_string()),
                "full_name" => cv.full_name = Some(value.to_string()),
                "version" => cv.version = Some(value.to_string()),
                "url" => cv.url = Some(uri(value)?),
                _ => return Err(unknown()),
            }
        }
        ("colunit", None, Some(table), None, None) => {
            let section = table_section(table).ok_or_else(unknown)?;
            metadata.column_units.push(column_unit(value, section)?);
        }
        _ => return Err(unknown()),
    }
    Ok(())
}
