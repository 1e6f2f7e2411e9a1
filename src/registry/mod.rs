//! Per-kind sample registries
//!
//! Every experiment kind owns one directory under the results root:
//!
//! ```text
//! <root>/<kind>/
//! ├── registry.csv     authoritative: Sample,Time,<sorted fields>
//! ├── registry.html    derived mirror, regenerated after every append
//! ├── 10000/           sample directories, owned by the caller
//! └── 10001/
//! ```
//!
//! ## Write Pattern
//!
//! Registries are append-only. Sample ids are allocated from the *last* row
//! of `registry.csv` (not a max-scan), so hand-reordered files desynchronise
//! allocation. There is no locking: callers must serialise writers per kind.

mod allocator;
mod migrate;
mod mirror;
mod query;
mod store;
mod table;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::params::{ParameterMap, RESERVED_COLUMNS};
use crate::{Error, Result};

pub use allocator::{
    allocate, next_sample_id, sample_row, Clock, FixedClock, SystemClock, TIME_FORMAT,
};
pub use migrate::expand_registry;
pub use mirror::{csv_to_html, refresh_mirror, render_html};
pub use query::{list_samples, load_sample, SampleRecord};
pub use store::{ensure_registry, ensure_registry_for, verify_schema};
pub use table::Table;

/// File name of the authoritative registry.
pub const REGISTRY_CSV: &str = "registry.csv";

/// File name of the derived HTML mirror.
pub const REGISTRY_HTML: &str = "registry.html";

/// Path of `registry.csv` inside a registry directory.
#[must_use]
pub fn csv_path(registry_dir: &Path) -> PathBuf {
    registry_dir.join(REGISTRY_CSV)
}

/// Path of `registry.html` inside a registry directory.
#[must_use]
pub fn html_path(registry_dir: &Path) -> PathBuf {
    registry_dir.join(REGISTRY_HTML)
}

/// Numeric sample identifier, unique and increasing within one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleId(u64);

impl SampleId {
    /// Id given to the first sample of a fresh registry.
    pub const FIRST: Self = Self(10_000);

    /// Wrap a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id following this one, or `None` on overflow.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SampleId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Ordered column set a registry enforces for all of its rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<String>,
}

impl Schema {
    /// Schema for an extracted parameter map (keys are already sorted).
    #[must_use]
    pub fn from_parameters(parameters: &ParameterMap) -> Self {
        Self {
            fields: parameters.keys().cloned().collect(),
        }
    }

    /// Parse a registry header row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRegistry`] if the header does not start with
    /// the `Sample,Time` columns.
    pub fn from_header(header: &[String], path: &Path) -> Result<Self> {
        if header.len() < RESERVED_COLUMNS.len()
            || header[0] != RESERVED_COLUMNS[0]
            || header[1] != RESERVED_COLUMNS[1]
        {
            return Err(Error::MalformedRegistry {
                path: path.to_path_buf(),
                reason: format!("header must start with Sample,Time, found {header:?}"),
            });
        }
        Ok(Self {
            fields: header[RESERVED_COLUMNS.len()..].to_vec(),
        })
    }

    /// Parameter field names, without the fixed columns.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Full header: `Sample`, `Time`, then the fields.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        RESERVED_COLUMNS
            .iter()
            .map(|c| (*c).to_string())
            .chain(self.fields.iter().cloned())
            .collect()
    }
}
