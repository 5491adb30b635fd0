use crate::error::{ErrorKind, MzTabError, MzTabErrorList};
use crate::metadata::{Metadata, Mode, MzTabType, MZTAB_VERSION};

/// Check the metadata block on its own, independent of any table.
pub fn check_metadata(metadata: &Metadata) -> MzTabErrorList {
    let mode = metadata.mode();
    let file_type = metadata.file_type();
    let mut violations = Vec::new();
    let mut require = |present: bool, key: String| {
        if !present {
            violations.push(ErrorKind::NotDefinedInMetadata {
                key,
                mode,
                file_type,
            });
        }
    };

    require(metadata.version.is_some(), "mzTab-version".into());
    require(metadata.mode.is_some(), "mzTab-mode".into());
    require(metadata.file_type.is_some(), "mzTab-type".into());
    require(metadata.description.is_some(), "description".into());
    require(!metadata.fixed_mods.is_empty(), "fixed_mod[1-n]".into());
    require(!metadata.variable_mods.is_empty(), "variable_mod[1-n]".into());
    if mode == Mode::Complete {
        require(!metadata.software.is_empty(), "software[1-n]".into());
    }

    for (id, run) in &metadata.ms_runs {
        require(run.location.is_some(), format!("ms_run[{}]-location", id));
    }

    if file_type == MzTabType::Quantification {
        require(
            metadata.quantification_method.is_some(),
            "quantification_method".into(),
        );
        for (id, assay) in &metadata.assays {
            require(
                assay.quantification_reagent.is_some(),
                format!("assay[{}]-quantification_reagent", id),
            );
            if mode == Mode::Complete {
                require(
                    assay.ms_run_ref.is_some(),
                    format!("assay[{}]-ms_run_ref", id),
                );
            }
        }
        for (id, study_variable) in &metadata.study_variables {
            require(
                study_variable.description.is_some(),
                format!("study_variable[{}]-description", id),
            );
            require(
                !study_variable.assay_refs.is_empty(),
                format!("study_variable[{}]-assay_refs", id),
            );
        }
    }

    for (id, run) in &metadata.ms_runs {
        if run.hash.is_some() && run.hash_method.is_none() {
            violations.push(ErrorKind::HashMethodMissing { id: *id });
        }
    }
    if let Some(version) = metadata.version.as_deref() {
        if version != MZTAB_VERSION {
            violations.push(ErrorKind::UnsupportedVersion {
                version: version.to_string(),
            });
        }
    }

    violations.into_iter().map(MzTabError::new).collect()
}
