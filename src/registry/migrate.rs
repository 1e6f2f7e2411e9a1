//! Schema migrator: add a field to an existing registry

use std::path::Path;

use tracing::info;

use super::{Schema, Table};
use crate::params::{has_separator, validate_name};
use crate::{Error, Result};

/// Add `field` to the registry file, giving every existing sample `value`.
///
/// Columns after `Sample,Time` are re-sorted and every row is rewritten in
/// the new order. The file is read completely before being overwritten. The
/// HTML mirror is left alone; call [`super::refresh_mirror`] if wanted.
///
/// # Errors
///
/// Returns [`Error::DuplicateField`] if the header already contains `field`
/// (the file is left untouched), [`Error::InvalidField`] if the name or
/// value cannot be stored, and read/write errors otherwise.
pub fn expand_registry(registry_file: &Path, field: &str, value: &str) -> Result<()> {
    validate_name(field)?;
    if has_separator(value) {
        return Err(Error::InvalidField {
            name: field.to_string(),
            reason: format!("value {value:?} contains a comma or line break"),
        });
    }

    let table = Table::read(registry_file)?;
    Schema::from_header(&table.columns, registry_file)?;
    let expanded = table
        .with_sorted_column(field, value)
        .ok_or_else(|| Error::DuplicateField {
            field: field.to_string(),
            path: registry_file.to_path_buf(),
        })?;

    expanded.write(registry_file)?;
    info!(
        path = %registry_file.display(),
        field,
        value,
        samples = expanded.rows.len(),
        "expanded registry"
    );
    Ok(())
}
