//! Type inference for loaded cells and field statistics
//!
//! CSV cells arrive as text; they are converted to typed JSON values so
//! that CSV and JSON sources produce identical records.

use regex::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;

/// Static compiled regex patterns for date detection
static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // YYYY-MM-DD
        Regex::new(r"^(19|20)\d{2}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").unwrap(),
        // MM/DD/YYYY
        Regex::new(r"^(0[1-9]|1[0-2])/(0[1-9]|[12]\d|3[01])/(19|20)\d{2}$").unwrap(),
        // YYYY/MM/DD
        Regex::new(r"^(19|20)\d{2}/(0[1-9]|1[0-2])/(0[1-9]|[12]\d|3[01])$").unwrap(),
        // ISO 8601 with time and optional zone
        Regex::new(
            r"^(19|20)\d{2}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?$",
        )
        .unwrap(),
    ]
});

/// Detected data type for a value or field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferredType {
    Boolean,
    Integer,
    Float,
    DateTime,
    String,
    Mixed,
    Null,
}

impl InferredType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferredType::Boolean => "boolean",
            InferredType::Integer => "integer",
            InferredType::Float => "float",
            InferredType::DateTime => "datetime",
            InferredType::String => "string",
            InferredType::Mixed => "mixed",
            InferredType::Null => "null",
        }
    }
}

/// Type inference utilities
pub struct TypeInference;

impl TypeInference {
    /// Infer the type of a single text cell.
    ///
    /// Order of checks matters: booleans and integers are cheap, the
    /// datetime regexes are tried last.
    pub fn infer_from_string(value: &str) -> InferredType {
        if value.is_empty() || value.eq_ignore_ascii_case("null") {
            return InferredType::Null;
        }
        if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
            return InferredType::Boolean;
        }
        // Codes like zip 00501 would lose their leading zero as numbers
        if !Self::has_leading_zero(value) {
            if value.parse::<i64>().is_ok() {
                return InferredType::Integer;
            }
            if value.parse::<f64>().is_ok() {
                return InferredType::Float;
            }
        }
        if Self::looks_like_datetime(value) {
            return InferredType::DateTime;
        }
        InferredType::String
    }

    /// `0` followed by another digit, optionally signed: `00501`, `-07`
    pub fn has_leading_zero(value: &str) -> bool {
        let digits = value.strip_prefix('-').unwrap_or(value).as_bytes();
        digits.len() > 1 && digits[0] == b'0' && digits[1].is_ascii_digit()
    }

    /// Type of an already-typed JSON value
    pub fn infer_from_json(value: &Value) -> InferredType {
        match value {
            Value::Null => InferredType::Null,
            Value::Bool(_) => InferredType::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => InferredType::Integer,
            Value::Number(_) => InferredType::Float,
            Value::String(s) if Self::looks_like_datetime(s) => InferredType::DateTime,
            Value::String(_) => InferredType::String,
            Value::Array(_) | Value::Object(_) => InferredType::Mixed,
        }
    }

    /// Check if a string looks like a datetime value
    pub fn looks_like_datetime(value: &str) -> bool {
        // Dates are typically 8-35 chars
        if value.len() < 8 || value.len() > 35 {
            return false;
        }
        DATE_PATTERNS.iter().any(|pattern| pattern.is_match(value))
    }

    /// Merge two types seen in the same field
    pub fn merge_types(type1: InferredType, type2: InferredType) -> InferredType {
        use InferredType::*;

        match (type1, type2) {
            (t1, t2) if t1 == t2 => t1,
            (Null, t) | (t, Null) => t,
            (Integer, Float) | (Float, Integer) => Float,
            _ => Mixed,
        }
    }

    /// Convert a text cell into a typed JSON value
    pub fn to_json_value(cell: &str) -> Value {
        match Self::infer_from_string(cell) {
            InferredType::Null => Value::Null,
            InferredType::Boolean => Value::Bool(cell.eq_ignore_ascii_case("true")),
            InferredType::Integer => cell
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(cell.to_string())),
            InferredType::Float => cell
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(cell.to_string())),
            _ => Value::String(cell.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_basic_type_inference() {
        assert_eq!(TypeInference::infer_from_string("123"), InferredType::Integer);
        assert_eq!(TypeInference::infer_from_string("123.45"), InferredType::Float);
        assert_eq!(TypeInference::infer_from_string("FALSE"), InferredType::Boolean);
        assert_eq!(TypeInference::infer_from_string("hello"), InferredType::String);
        assert_eq!(TypeInference::infer_from_string(""), InferredType::Null);
        assert_eq!(TypeInference::infer_from_string("2024-03-15"), InferredType::DateTime);
    }

    #[test]
    fn test_id_strings_are_not_dates() {
        assert!(!TypeInference::looks_like_datetime("ORDER-2024-001"));
        assert!(!TypeInference::looks_like_datetime("BQ-123456"));
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(TypeInference::to_json_value("42"), json!(42));
        assert_eq!(TypeInference::to_json_value("2.5"), json!(2.5));
        assert_eq!(TypeInference::to_json_value("true"), json!(true));
        assert_eq!(TypeInference::to_json_value(""), Value::Null);
        assert_eq!(TypeInference::to_json_value("US"), json!("US"));
        // NaN is not representable in JSON
        assert_eq!(TypeInference::to_json_value("NaN"), json!("NaN"));
    }

    #[test]
    fn test_leading_zero_codes_stay_text() {
        assert_eq!(TypeInference::infer_from_string("00501"), InferredType::String);
        assert_eq!(TypeInference::infer_from_string("-07"), InferredType::String);
        assert_eq!(TypeInference::infer_from_string("0"), InferredType::Integer);
        assert_eq!(TypeInference::infer_from_string("0.5"), InferredType::Float);
        assert_eq!(TypeInference::infer_from_string("01/15/2024"), InferredType::DateTime);
        assert_eq!(TypeInference::to_json_value("00501"), json!("00501"));
    }

    #[test]
    fn test_merge() {
        use InferredType::*;
        assert_eq!(TypeInference::merge_types(Integer, Float), Float);
        assert_eq!(TypeInference::merge_types(Null, String), String);
        assert_eq!(TypeInference::merge_types(Boolean, String), Mixed);
    }
}
