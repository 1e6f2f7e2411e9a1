//! Tests for error types

use std::path::PathBuf;

use sample_catalogue::Error;

#[test]
fn test_not_a_directory_error() {
    let error = Error::NotADirectory {
        path: PathBuf::from("/missing/results"),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Not a directory"));
    assert!(error_str.contains("/missing/results"));
    assert!(error_str.contains("Create the results root"));
}

#[test]
fn test_schema_mismatch_lists_both_schemas() {
    let error = Error::SchemaMismatch {
        expected: vec!["Sample".into(), "Time".into(), "alpha".into()],
        observed: vec!["Sample".into(), "Time".into(), "beta".into()],
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("\"alpha\""));
    assert!(error_str.contains("\"beta\""));
    assert!(error_str.contains("do not match"));
}

#[test]
fn test_duplicate_field_error() {
    let error = Error::DuplicateField {
        field: "momentum".to_string(),
        path: PathBuf::from("shgo/registry.csv"),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("momentum"));
    assert!(error_str.contains("already exists"));
    assert!(error_str.contains("shgo/registry.csv"));
}

#[test]
fn test_malformed_registry_error() {
    let error = Error::MalformedRegistry {
        path: PathBuf::from("devo/registry.csv"),
        reason: "file is empty".to_string(),
    };
    assert_eq!(
        format!("{error}"),
        "Malformed registry devo/registry.csv: file is empty"
    );
}

#[test]
fn test_unknown_sample_error() {
    let error = Error::UnknownSample {
        sample: 10_013,
        path: PathBuf::from("random-gd/registry.csv"),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("10013"));
    assert!(error_str.contains("not found"));
}

#[test]
fn test_invalid_field_and_parameter_errors() {
    let error = Error::InvalidField {
        name: "label".to_string(),
        reason: "contains a comma".to_string(),
    };
    assert_eq!(format!("{error}"), "Invalid field 'label': contains a comma");

    let error = Error::InvalidParameter("pop_thinning_factor must be <= 1.0".to_string());
    assert!(format!("{error}").starts_with("Invalid parameter"));

    let error = Error::Config("HOME not set".to_string());
    assert!(format!("{error}").starts_with("Configuration error"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
}

#[test]
fn test_error_debug() {
    let error = Error::Config("x".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("Config"));
}

#[test]
fn test_result_type_alias_error() {
    fn returns_error() -> sample_catalogue::Result<i32> {
        Err(Error::Config("test error".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
}
