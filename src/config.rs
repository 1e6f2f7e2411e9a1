//! Environment-driven configuration
//!
//! | Variable                 | Values          | Default                     |
//! |--------------------------|-----------------|-----------------------------|
//! | `CATALOGUE_RESULTS_DIR`  | path            | derived, see below          |
//! | `CATALOGUE_EXPERIMENTAL` | `True`/`False`  | `False`                     |
//! | `CATALOGUE_DEBUG`        | `1`..=`5`       | `4` (info)                  |
//!
//! Without an explicit results directory, experimental runs go to the
//! relative `experimental_results` directory and all others to
//! `$HOME/catalogue-results`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::Level;

use crate::{Error, Result};

/// Explicit results root.
pub const RESULTS_DIR_VAR: &str = "CATALOGUE_RESULTS_DIR";
/// Experimental-mode flag.
pub const EXPERIMENTAL_VAR: &str = "CATALOGUE_EXPERIMENTAL";
/// Log verbosity, 1 (critical) to 5 (debug).
pub const DEBUG_VAR: &str = "CATALOGUE_DEBUG";

/// Where samples are catalogued and how loudly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueConfig {
    results_root: PathBuf,
    log_level: Level,
}

impl CatalogueConfig {
    /// Configuration with an explicit root and level.
    #[must_use]
    pub fn new(results_root: impl Into<PathBuf>, log_level: Level) -> Self {
        Self {
            results_root: results_root.into(),
            log_level,
        }
    }

    /// Read the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on unrecognised flag values or a missing `HOME`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`CatalogueConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let experimental = match lookup(EXPERIMENTAL_VAR).as_deref() {
            None | Some("False") => false,
            Some("True") => true,
            Some(other) => {
                return Err(Error::Config(format!(
                    "unknown value '{other}' for {EXPERIMENTAL_VAR} (expected True or False)"
                )))
            }
        };

        let log_level = log_level_from_lookup(&lookup)?;

        let results_root = if let Some(dir) = lookup(RESULTS_DIR_VAR) {
            PathBuf::from(dir)
        } else if experimental {
            PathBuf::from("experimental_results")
        } else {
            let home = lookup("HOME")
                .ok_or_else(|| Error::Config("environment variable HOME not set".to_string()))?;
            Path::new(&home).join("catalogue-results")
        };

        Ok(Self {
            results_root,
            log_level,
        })
    }

    /// Root directory holding one registry per kind.
    #[must_use]
    pub fn results_root(&self) -> &Path {
        &self.results_root
    }

    /// Default log level.
    #[must_use]
    pub const fn log_level(&self) -> Level {
        self.log_level
    }

    /// Create the results root (and parents) if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns IO errors from directory creation.
    pub fn ensure_results_root(&self) -> Result<&Path> {
        fs::create_dir_all(&self.results_root)?;
        Ok(&self.results_root)
    }
}

/// Log level from `CATALOGUE_DEBUG` alone, for callers that need no results root.
///
/// # Errors
///
/// Returns [`Error::Config`] if the variable holds anything but `1`..=`5`.
pub fn log_level_from_env() -> Result<Level> {
    log_level_from_lookup(&|key: &str| std::env::var(key).ok())
}

fn log_level_from_lookup<F>(lookup: &F) -> Result<Level>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(DEBUG_VAR).as_deref() {
        Some("1" | "2") => Ok(Level::ERROR),
        Some("3") => Ok(Level::WARN),
        None | Some("4") => Ok(Level::INFO),
        Some("5") => Ok(Level::DEBUG),
        Some(other) => Err(Error::Config(format!(
            "unknown value '{other}' for {DEBUG_VAR} (expected 1-5)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CatalogueConfig::from_lookup(lookup(&[("HOME", "/home/u")])).unwrap();
        assert_eq!(config.results_root(), Path::new("/home/u/catalogue-results"));
        assert_eq!(config.log_level(), Level::INFO);
    }

    #[test]
    fn test_experimental_and_explicit_root() {
        let config =
            CatalogueConfig::from_lookup(lookup(&[(EXPERIMENTAL_VAR, "True")])).unwrap();
        assert_eq!(config.results_root(), Path::new("experimental_results"));

        let config = CatalogueConfig::from_lookup(lookup(&[
            (EXPERIMENTAL_VAR, "True"),
            (RESULTS_DIR_VAR, "/data/runs"),
        ]))
        .unwrap();
        assert_eq!(config.results_root(), Path::new("/data/runs"));
    }

    #[test]
    fn test_debug_levels() {
        for (flag, level) in [
            ("1", Level::ERROR),
            ("2", Level::ERROR),
            ("3", Level::WARN),
            ("4", Level::INFO),
            ("5", Level::DEBUG),
        ] {
            let config =
                CatalogueConfig::from_lookup(lookup(&[("HOME", "/h"), (DEBUG_VAR, flag)]))
                    .unwrap();
            assert_eq!(config.log_level(), level);
        }
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            CatalogueConfig::from_lookup(lookup(&[("HOME", "/h"), (EXPERIMENTAL_VAR, "yes")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            CatalogueConfig::from_lookup(lookup(&[("HOME", "/h"), (DEBUG_VAR, "9")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            CatalogueConfig::from_lookup(lookup(&[])),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_log_level_ignores_root_settings() {
        let level = log_level_from_lookup(&lookup(&[(EXPERIMENTAL_VAR, "yes")])).unwrap();
        assert_eq!(level, Level::INFO);
        let level = log_level_from_lookup(&lookup(&[(DEBUG_VAR, "3")])).unwrap();
        assert_eq!(level, Level::WARN);
        assert!(log_level_from_lookup(&lookup(&[(DEBUG_VAR, "0")])).is_err());
    }

    #[test]
    fn test_ensure_results_root() {
        let tmp = tempfile::tempdir().unwrap();
        let config = CatalogueConfig::new(tmp.path().join("a/b"), Level::INFO);
        assert!(config.ensure_results_root().unwrap().is_dir());
    }
}
