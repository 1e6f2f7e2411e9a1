//! Sample allocator: next id from the last registry row

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use tracing::info;

use super::table::append_record;
use super::{csv_path, html_path, refresh_mirror, SampleId, Schema, Table};
use crate::params::{ParameterMap, RESERVED_COLUMNS};
use crate::{Error, Result};

/// Timestamp format of the `Time` column (local time, second resolution).
pub const TIME_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

/// Source of allocation timestamps.
pub trait Clock {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(
    /// Instant returned by every call
    pub NaiveDateTime,
);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Id following the registry row whose first column is `first_column`.
///
/// The header row (`Sample`) yields [`SampleId::FIRST`]; a numeric row
/// yields its successor. Anything else is `None`.
#[must_use]
pub fn next_sample_id(first_column: &str) -> Option<SampleId> {
    if first_column == RESERVED_COLUMNS[0] {
        return Some(SampleId::FIRST);
    }
    first_column.parse::<SampleId>().ok()?.next()
}

/// Registry row for a new sample: id, formatted time, then values in key order.
#[must_use]
pub fn sample_row(id: SampleId, time: NaiveDateTime, parameters: &ParameterMap) -> Vec<String> {
    [id.to_string(), time.format(TIME_FORMAT).to_string()]
        .into_iter()
        .chain(parameters.values().map(ToString::to_string))
        .collect()
}

/// Allocate the next sample id, append its row and refresh the mirror.
///
/// Only the last row is consulted, so ids keep increasing even when sample
/// directories are removed, and gaps are never refilled.
///
/// # Errors
///
/// Returns [`Error::SchemaMismatch`] if the parameter names differ from the
/// registry header (nothing is written in that case),
/// [`Error::MalformedRegistry`] if the last row does not start with an
/// integer id, and IO/CSV errors from reading or appending.
pub fn allocate<C: Clock + ?Sized>(
    registry_dir: &Path,
    parameters: &ParameterMap,
    clock: &C,
) -> Result<SampleId> {
    let csv = csv_path(registry_dir);
    let table = Table::read(&csv)?;
    let observed = Schema::from_parameters(parameters).columns();
    if table.columns != observed {
        return Err(Error::SchemaMismatch {
            expected: table.columns,
            observed,
        });
    }
    let last = table.last_record().first().map_or("", String::as_str);
    let id = next_sample_id(last).ok_or_else(|| Error::MalformedRegistry {
        path: csv.clone(),
        reason: format!("last row starts with {last:?}, expected a sample id"),
    })?;

    append_record(&csv, &sample_row(id, clock.now(), parameters))?;
    refresh_mirror(&csv, &html_path(registry_dir))?;
    info!(sample = %id, path = %registry_dir.display(), "allocated sample");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, 17)
            .unwrap()
            .and_hms_opt(12, 0, 9)
            .unwrap()
    }

    #[test]
    fn test_next_sample_id() {
        assert_eq!(next_sample_id("Sample"), Some(SampleId::FIRST));
        assert_eq!(next_sample_id("10000"), Some(SampleId::new(10_001)));
        assert_eq!(next_sample_id("10099"), Some(SampleId::new(10_100)));
        assert_eq!(next_sample_id("abc"), None);
        assert_eq!(next_sample_id(""), None);
    }

    #[test]
    fn test_sample_row_format() {
        let mut params = ParameterMap::new();
        params.insert("ready".to_string(), ParamValue::Bool(true));
        params.insert("alpha".to_string(), ParamValue::Float(1.0));
        let row = sample_row(SampleId::FIRST, noon(), &params);
        assert_eq!(row, ["10000", "2023-05-17-12:00:09", "1.0", "True"]);
    }

    #[test]
    fn test_allocate_appends_rows() {
        let dir = tempfile::tempdir().unwrap();
        let csv = csv_path(dir.path());
        std::fs::write(&csv, "Sample,Time,alpha\n").unwrap();

        let mut params = ParameterMap::new();
        params.insert("alpha".to_string(), ParamValue::Float(0.5));
        let clock = FixedClock(noon());

        assert_eq!(allocate(dir.path(), &params, &clock).unwrap(), SampleId::FIRST);
        assert_eq!(
            allocate(dir.path(), &params, &clock).unwrap(),
            SampleId::new(10_001)
        );
        assert_eq!(
            std::fs::read_to_string(&csv).unwrap(),
            "Sample,Time,alpha\n\
             10000,2023-05-17-12:00:09,0.5\n\
             10001,2023-05-17-12:00:09,0.5\n"
        );
        assert!(html_path(dir.path()).is_file());
    }

    #[test]
    fn test_allocate_rejects_other_shape_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let csv = csv_path(dir.path());
        let before = "Sample,Time,alpha\n10000,2023-05-17-12:00:09,0.5\n";
        std::fs::write(&csv, before).unwrap();

        let mut params = ParameterMap::new();
        params.insert("alpha".to_string(), ParamValue::Float(1.0));
        params.insert("beta".to_string(), ParamValue::Int(2));
        let err = allocate(dir.path(), &params, &FixedClock(noon())).unwrap_err();

        match err {
            Error::SchemaMismatch { expected, observed } => {
                assert_eq!(expected, ["Sample", "Time", "alpha"]);
                assert_eq!(observed, ["Sample", "Time", "alpha", "beta"]);
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
        assert_eq!(std::fs::read_to_string(&csv).unwrap(), before);
        assert!(!html_path(dir.path()).exists());
    }

    #[test]
    fn test_allocate_uses_last_row_only() {
        let dir = tempfile::tempdir().unwrap();
        let csv = csv_path(dir.path());
        std::fs::write(&csv, "Sample,Time\n10050,t\n10003,t\n").unwrap();
        let id = allocate(dir.path(), &ParameterMap::new(), &FixedClock(noon())).unwrap();
        assert_eq!(id, SampleId::new(10_004));
    }

    #[test]
    fn test_allocate_rejects_garbage_last_row() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(csv_path(dir.path()), "Sample,Time\nxyz,t\n").unwrap();
        assert!(matches!(
            allocate(dir.path(), &ParameterMap::new(), &FixedClock(noon())),
            Err(Error::MalformedRegistry { .. })
        ));
    }
}
