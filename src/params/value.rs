//! Scalar parameter values and their registry text form

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single catalogued parameter value.
///
/// Registries store every value as plain text, so the [`fmt::Display`]
/// implementation is the canonical on-disk form: strings verbatim, integers
/// in base 10, booleans as `True`/`False` and floats in the shortest decimal
/// form that round-trips (switching to exponent notation for very small or
/// very large magnitudes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Free-form text (must not contain commas or newlines)
    Str(String),
}

impl ParamValue {
    /// Registry text for this value.
    #[must_use]
    pub fn to_csv_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&format_float(*v)),
            Self::Str(v) => f.write_str(v),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Format a float the way numerical drivers conventionally print it.
///
/// Positional notation is used while the decimal exponent lies in `-4..16`
/// (always with at least one fractional digit, e.g. `1.0`); outside that
/// range the value is printed as `<mantissa>e<sign><exp>` with a two-digit
/// minimum exponent, e.g. `1e-11` or `1.5e+16`.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "-1.25e-3"
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = mantissa
        .strip_prefix('-')
        .map_or(("", mantissa), |m| ("-", m));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    if (-4..16).contains(&exponent) {
        let point = exponent + 1;
        let body = if point <= 0 {
            let zeros = "0".repeat(point.unsigned_abs() as usize);
            format!("0.{zeros}{digits}")
        } else {
            let point = point.unsigned_abs() as usize;
            if digits.len() > point {
                format!("{}.{}", &digits[..point], &digits[point..])
            } else {
                let zeros = "0".repeat(point - digits.len());
                format!("{digits}{zeros}.0")
            }
        };
        format!("{sign}{body}")
    } else {
        let (lead, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() {
            String::new()
        } else {
            format!(".{rest}")
        };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{sign}{lead}{fraction}e{exp_sign}{:02}",
            exponent.unsigned_abs()
        )
    }
}
