//! Read samples back from a registry

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{csv_path, SampleId, Schema, Table};
use crate::{Error, Result};

/// One catalogued sample as recorded in `registry.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Sample id
    pub sample: SampleId,
    /// Allocation time, as written
    pub time: String,
    /// Parameter values keyed by field name
    pub values: BTreeMap<String, String>,
}

impl SampleRecord {
    fn from_row(schema: &Schema, row: &[String], path: &Path) -> Result<Self> {
        let sample = row[0].parse().map_err(|_| Error::MalformedRegistry {
            path: path.to_path_buf(),
            reason: format!("sample id {:?} is not an integer", row[0]),
        })?;
        let values = schema
            .fields()
            .iter()
            .cloned()
            .zip(row[2..].iter().cloned())
            .collect();
        Ok(Self {
            sample,
            time: row[1].clone(),
            values,
        })
    }
}

/// All samples of a registry, in file order.
///
/// # Errors
///
/// Returns [`Error::MissingRegistry`] or [`Error::MalformedRegistry`] if the
/// registry cannot be read.
pub fn list_samples(registry_dir: &Path) -> Result<Vec<SampleRecord>> {
    let path = csv_path(registry_dir);
    let table = Table::read(&path)?;
    let schema = Schema::from_header(&table.columns, &path)?;
    table
        .rows
        .iter()
        .map(|row| SampleRecord::from_row(&schema, row, &path))
        .collect()
}

/// Look up one sample's catalogued parameters.
///
/// # Errors
///
/// Returns [`Error::UnknownSample`] if no row carries `sample`, plus the
/// errors of [`list_samples`].
pub fn load_sample(registry_dir: &Path, sample: SampleId) -> Result<SampleRecord> {
    list_samples(registry_dir)?
        .into_iter()
        .find(|record| record.sample == sample)
        .ok_or_else(|| Error::UnknownSample {
            sample: sample.get(),
            path: csv_path(registry_dir),
        })
}
