//! Parameter sets and the parameter extractor
//!
//! A parameter set is any value that can (a) name the kind of experiment it
//! configures and (b) describe its scalar fields. The extractor turns that
//! description into the canonical, lexicographically ordered mapping that
//! registries are keyed on.
//!
//! ## Usage
//!
//! ```rust
//! use sample_catalogue::params::{extract, fields_from_serialize, ParamValue, ParameterSet};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Demo {
//!     ready: bool,
//!     alpha: f64,
//! }
//!
//! impl ParameterSet for Demo {
//!     fn kind_name(&self) -> String {
//!         "demo".to_string()
//!     }
//!
//!     fn describe_fields(&self) -> sample_catalogue::Result<Vec<(String, ParamValue)>> {
//!         fields_from_serialize(self)
//!     }
//! }
//!
//! let params = extract(&Demo { ready: true, alpha: 1.0 })?;
//! let names: Vec<&str> = params.keys().map(String::as_str).collect();
//! assert_eq!(names, ["alpha", "ready"]);
//! # Ok::<(), sample_catalogue::Error>(())
//! ```

mod describe;
pub mod kinds;
mod value;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Error, Result};

pub use kinds::{
    BaseParameters, DifferentialEvolutionParams, GlobalOptimizationParams,
    GradientDescentParams, SamplingMethod, TargetName,
};
pub use value::{format_float, ParamValue};

/// Canonical ordered mapping of field name to value.
pub type ParameterMap = BTreeMap<String, ParamValue>;

/// Column names every registry reserves for itself.
pub const RESERVED_COLUMNS: [&str; 2] = ["Sample", "Time"];

/// A named, typed set of scalar experiment parameters.
///
/// Implementors list every field that should be catalogued. Names starting
/// with `_` are treated as private and skipped by [`extract`]; helper values
/// that are not parameters (option maps, constraint objects) simply stay out
/// of [`ParameterSet::describe_fields`].
pub trait ParameterSet {
    /// Kind of experiment, e.g. `random-gd`. Used as the registry directory name.
    fn kind_name(&self) -> String;

    /// Every catalogued field with its current value, in any order.
    ///
    /// # Errors
    ///
    /// Returns an error if the fields cannot be described, e.g. a serde
    /// derived description encountered a non-scalar value.
    fn describe_fields(&self) -> Result<Vec<(String, ParamValue)>>;
}

/// Extract the public fields of a parameter set, sorted by name.
///
/// # Errors
///
/// Returns [`Error::InvalidField`] if a name is empty, reserved, repeated or
/// contains a comma/newline, or if a string value contains a comma/newline.
pub fn extract<P: ParameterSet + ?Sized>(parameters: &P) -> Result<ParameterMap> {
    let mut map = ParameterMap::new();
    for (name, value) in parameters.describe_fields()? {
        if name.starts_with('_') {
            continue;
        }
        validate_name(&name)?;
        validate_value(&name, &value)?;
        if map.contains_key(&name) {
            return Err(Error::InvalidField {
                name,
                reason: "field described more than once".to_string(),
            });
        }
        map.insert(name, value);
    }
    Ok(map)
}

/// Derive a field description from a serde serialization.
///
/// The value must serialize to a struct (or string-keyed map) of scalars.
/// Integers map to [`ParamValue::Int`], floats to [`ParamValue::Float`]
/// (non-finite values included), fieldless enum variants to their name.
///
/// # Errors
///
/// Returns [`Error::InvalidField`] for `None`, sequences, nested structs or
/// integers outside the `i64` range, and [`Error::InvalidParameter`] if the
/// value does not serialize to a map of named fields.
pub fn fields_from_serialize<T: Serialize + ?Sized>(
    value: &T,
) -> Result<Vec<(String, ParamValue)>> {
    value.serialize(describe::FieldCollector)
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "field name is empty"
    } else if RESERVED_COLUMNS.contains(&name) {
        "field name is reserved by the registry"
    } else if has_separator(name) {
        "field name contains a comma or line break"
    } else {
        return Ok(());
    };
    Err(Error::InvalidField {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

fn validate_value(name: &str, value: &ParamValue) -> Result<()> {
    match value {
        ParamValue::Str(s) if has_separator(s) => Err(Error::InvalidField {
            name: name.to_string(),
            reason: format!("value {s:?} contains a comma or line break"),
        }),
        _ => Ok(()),
    }
}

pub(crate) fn has_separator(text: &str) -> bool {
    text.contains([',', '\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Manual {
        fields: Vec<(&'static str, ParamValue)>,
    }

    impl ParameterSet for Manual {
        fn kind_name(&self) -> String {
            "manual".to_string()
        }

        fn describe_fields(&self) -> Result<Vec<(String, ParamValue)>> {
            Ok(self
                .fields
                .iter()
                .map(|(n, v)| ((*n).to_string(), v.clone()))
                .collect())
        }
    }

    #[derive(Serialize)]
    struct Derived {
        use_acceleration: bool,
        learning_rate: f64,
        epochs: u32,
        optimizer: String,
    }

    #[test]
    fn test_extract_sorts_and_skips_private() {
        let p = Manual {
            fields: vec![
                ("zeta", ParamValue::Int(1)),
                ("_hidden", ParamValue::Int(2)),
                ("alpha", ParamValue::Float(0.5)),
            ],
        };
        let map = extract(&p).unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["alpha", "zeta"]);
    }

    #[test]
    fn test_extract_rejects_duplicate_names() {
        let p = Manual {
            fields: vec![("a", ParamValue::Int(1)), ("a", ParamValue::Int(2))],
        };
        assert!(matches!(extract(&p), Err(Error::InvalidField { .. })));
    }

    #[test]
    fn test_extract_rejects_reserved_and_comma_names() {
        for bad in ["Sample", "Time", "", "a,b"] {
            let p = Manual {
                fields: vec![(bad, ParamValue::Int(1))],
            };
            assert!(matches!(extract(&p), Err(Error::InvalidField { .. })), "{bad:?}");
        }
    }

    #[test]
    fn test_extract_rejects_comma_values() {
        let p = Manual {
            fields: vec![("label", ParamValue::from("a,b"))],
        };
        let err = extract(&p).unwrap_err();
        assert!(err.to_string().contains("label"));
    }

    #[test]
    fn test_fields_from_serialize() {
        let d = Derived {
            use_acceleration: true,
            learning_rate: 0.5,
            epochs: 10,
            optimizer: "adam".to_string(),
        };
        let mut fields = fields_from_serialize(&d).unwrap();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            fields,
            vec![
                ("epochs".to_string(), ParamValue::Int(10)),
                ("learning_rate".to_string(), ParamValue::Float(0.5)),
                ("optimizer".to_string(), ParamValue::from("adam")),
                ("use_acceleration".to_string(), ParamValue::Bool(true)),
            ]
        );
    }

    #[test]
    fn test_fields_from_serialize_rejects_nested() {
        #[derive(Serialize)]
        struct Nested {
            bounds: (f64, f64),
        }
        let err = fields_from_serialize(&Nested { bounds: (-1.0, 1.0) }).unwrap_err();
        assert!(matches!(err, Error::InvalidField { ref name, .. } if name == "bounds"));
    }

    #[test]
    fn test_fields_from_serialize_keeps_non_finite_floats() {
        #[derive(Serialize)]
        struct Bounds {
            lower: f64,
            upper: f64,
            scale: f64,
        }
        let fields = fields_from_serialize(&Bounds {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            scale: f64::NAN,
        })
        .unwrap();
        assert_eq!(fields[0], ("lower".to_string(), ParamValue::Float(f64::NEG_INFINITY)));
        assert_eq!(fields[1], ("upper".to_string(), ParamValue::Float(f64::INFINITY)));
        assert!(matches!(fields[2], (ref n, ParamValue::Float(x)) if n == "scale" && x.is_nan()));
    }

    #[test]
    fn test_fields_from_serialize_scalar_shapes() {
        #[derive(Serialize)]
        #[serde(rename_all = "kebab-case")]
        enum Mode {
            FastPath,
        }
        #[derive(Serialize)]
        struct Shapes {
            mode: Mode,
            tag: char,
            shift: Option<i8>,
        }
        let fields = fields_from_serialize(&Shapes {
            mode: Mode::FastPath,
            tag: 'x',
            shift: Some(-3),
        })
        .unwrap();
        assert_eq!(
            fields,
            vec![
                ("mode".to_string(), ParamValue::from("fast-path")),
                ("tag".to_string(), ParamValue::from("x")),
                ("shift".to_string(), ParamValue::Int(-3)),
            ]
        );
    }

    #[test]
    fn test_fields_from_serialize_rejects_none_and_wide_ints() {
        #[derive(Serialize)]
        struct Missing {
            seed: Option<u32>,
        }
        #[derive(Serialize)]
        struct Wide {
            count: u64,
        }
        let err = fields_from_serialize(&Missing { seed: None }).unwrap_err();
        assert!(matches!(err, Error::InvalidField { ref name, .. } if name == "seed"));
        let err = fields_from_serialize(&Wide { count: u64::MAX }).unwrap_err();
        assert!(err.to_string().contains("does not fit in i64"));
    }

    #[test]
    fn test_fields_from_serialize_rejects_non_object() {
        assert!(matches!(
            fields_from_serialize(&42),
            Err(Error::InvalidParameter(_))
        ));
    }
}
