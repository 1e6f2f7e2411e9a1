//! Catalogue facade: parameters in, fresh sample directory out
//!
//! ## Control Flow
//!
//! ```text
//! catalogue(root, params)
//!   ├─ extract(params)           sorted field map
//!   ├─ ensure_registry_for(..)   create root/<kind>/registry.csv or verify header
//!   ├─ allocate(..)              next id, append row, refresh registry.html
//!   └─ create_dir(root/<kind>/<id>)
//! ```
//!
//! Nothing here is safe against concurrent writers to the same kind; drivers
//! must catalogue sequentially before forking workers.

use std::fs;
use std::path::{Path, PathBuf};

use crate::params::{extract, ParameterSet};
use crate::registry::{allocate, ensure_registry_for, Clock, Schema, SystemClock};
use crate::{Error, Result};

/// Results root plus the clock used to timestamp new samples.
#[derive(Debug, Clone)]
pub struct Catalogue<C: Clock = SystemClock> {
    root: PathBuf,
    clock: C,
}

impl Catalogue {
    /// Catalogue under `root`, timestamped with local system time.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_clock(root, SystemClock)
    }
}

impl<C: Clock> Catalogue<C> {
    /// Catalogue under `root` with a custom clock.
    #[must_use]
    pub fn with_clock(root: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    /// Results root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Registry directory a parameter set's samples go into.
    #[must_use]
    pub fn registry_dir<P: ParameterSet + ?Sized>(&self, parameters: &P) -> PathBuf {
        self.root.join(parameters.kind_name())
    }

    /// Record `parameters` as a new sample and create its (empty) directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotADirectory`] if the root does not exist,
    /// [`Error::SchemaMismatch`] if the kind's registry records other fields,
    /// and IO errors, including `AlreadyExists` if the sample directory is
    /// already present.
    pub fn catalogue<P: ParameterSet + ?Sized>(&self, parameters: &P) -> Result<PathBuf> {
        if !self.root.is_dir() {
            return Err(Error::NotADirectory {
                path: self.root.clone(),
            });
        }

        let values = extract(parameters)?;
        let registry = ensure_registry_for(
            &self.root,
            &parameters.kind_name(),
            &Schema::from_parameters(&values),
        )?;
        let sample = allocate(&registry, &values, &self.clock)?;

        let sample_dir = registry.join(sample.to_string());
        fs::create_dir(&sample_dir)?;
        Ok(sample_dir)
    }
}

/// Record `parameters` under `root` and return a fresh sample directory.
///
/// # Errors
///
/// See [`Catalogue::catalogue`].
pub fn catalogue<P: ParameterSet + ?Sized>(root: &Path, parameters: &P) -> Result<PathBuf> {
    Catalogue::new(root).catalogue(parameters)
}
