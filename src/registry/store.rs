//! Registry store: create-if-absent and schema verification

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{csv_path, html_path, refresh_mirror, Schema, Table};
use crate::params::{extract, ParameterSet};
use crate::{Error, Result};

/// Make sure the registry for `parameters`' kind exists under `root` and that
/// its header matches the parameter set's fields.
///
/// Returns the registry directory `root/<kind>`.
///
/// # Errors
///
/// Returns [`Error::SchemaMismatch`] if an existing registry records a
/// different field set, [`Error::InvalidParameter`] if the kind name is not a
/// usable directory name, and IO errors from creating the files.
pub fn ensure_registry<P: ParameterSet + ?Sized>(root: &Path, parameters: &P) -> Result<PathBuf> {
    let schema = Schema::from_parameters(&extract(parameters)?);
    ensure_registry_for(root, &parameters.kind_name(), &schema)
}

/// [`ensure_registry`] for an already extracted kind name and schema.
///
/// # Errors
///
/// See [`ensure_registry`].
pub fn ensure_registry_for(root: &Path, kind: &str, schema: &Schema) -> Result<PathBuf> {
    validate_kind_name(kind)?;
    let path = root.join(kind);

    if !path.is_dir() {
        fs::create_dir(&path)?;
        let csv = csv_path(&path);
        Table::new(schema.columns()).write(&csv)?;
        refresh_mirror(&csv, &html_path(&path))?;
        info!(kind, path = %path.display(), fields = schema.fields().len(), "created registry");
    }

    verify_schema(&path, schema)?;
    Ok(path)
}

/// Compare a registry's header with the expected schema.
///
/// # Errors
///
/// Returns [`Error::MissingRegistry`] if `registry.csv` is absent and
/// [`Error::SchemaMismatch`] (carrying both column lists) on disagreement.
pub fn verify_schema(registry_dir: &Path, schema: &Schema) -> Result<()> {
    let table = Table::read(&csv_path(registry_dir))?;
    let observed = schema.columns();
    if table.columns != observed {
        return Err(Error::SchemaMismatch {
            expected: table.columns,
            observed,
        });
    }
    debug!(path = %registry_dir.display(), "registry schema verified");
    Ok(())
}

fn validate_kind_name(kind: &str) -> Result<()> {
    let usable = !kind.is_empty()
        && kind != "."
        && kind != ".."
        && !kind.contains(['/', '\\', '\0']);
    if usable {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "kind name {kind:?} cannot be used as a registry directory"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ParamValue, ParameterMap};

    fn schema(fields: &[&str]) -> Schema {
        let params: ParameterMap = fields
            .iter()
            .map(|f| ((*f).to_string(), ParamValue::Int(0)))
            .collect();
        Schema::from_parameters(&params)
    }

    #[test]
    fn test_creates_registry_files() {
        let root = tempfile::tempdir().unwrap();
        let dir = ensure_registry_for(root.path(), "demo", &schema(&["ready", "alpha"])).unwrap();

        assert_eq!(dir, root.path().join("demo"));
        assert_eq!(
            fs::read_to_string(dir.join("registry.csv")).unwrap(),
            "Sample,Time,alpha,ready\n"
        );
        assert!(dir.join("registry.html").is_file());
    }

    #[test]
    fn test_existing_registry_is_verified() {
        let root = tempfile::tempdir().unwrap();
        ensure_registry_for(root.path(), "demo", &schema(&["alpha"])).unwrap();
        assert!(ensure_registry_for(root.path(), "demo", &schema(&["alpha"])).is_ok());

        let err = ensure_registry_for(root.path(), "demo", &schema(&["beta"])).unwrap_err();
        match err {
            Error::SchemaMismatch { expected, observed } => {
                assert_eq!(expected, ["Sample", "Time", "alpha"]);
                assert_eq!(observed, ["Sample", "Time", "beta"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ensure_registry_from_parameter_set() {
        use crate::params::{GradientDescentParams, TargetName};

        let root = tempfile::tempdir().unwrap();
        let params = GradientDescentParams::new(TargetName::SicPovm, 6);
        let dir = ensure_registry(root.path(), &params).unwrap();
        assert_eq!(dir, root.path().join("random-gd"));
        let header = fs::read_to_string(dir.join("registry.csv")).unwrap();
        assert!(header.starts_with("Sample,Time,f_evals_max,"));
        assert_eq!(ensure_registry(root.path(), &params).unwrap(), dir);
    }

    #[test]
    fn test_directory_without_registry_file() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("demo")).unwrap();
        assert!(matches!(
            ensure_registry_for(root.path(), "demo", &schema(&["alpha"])),
            Err(Error::MissingRegistry { .. })
        ));
    }

    #[test]
    fn test_rejects_unusable_kind_names() {
        let root = tempfile::tempdir().unwrap();
        for kind in ["", ".", "..", "a/b"] {
            assert!(matches!(
                ensure_registry_for(root.path(), kind, &schema(&["alpha"])),
                Err(Error::InvalidParameter(_))
            ));
        }
    }
}
