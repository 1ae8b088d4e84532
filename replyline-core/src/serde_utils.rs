//! Serde helpers shared by the wire records and the draft documents.
//!
//! The backend and hand-written draft files both send numbers as strings from
//! time to time (`"25"`, `""`). These helpers coerce them into typed values and
//! treat an empty string as "absent" so that "unlimited" never turns into zero.

use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::errors::{ReplyLineError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Loose {
    fn into_int<E: de::Error>(self) -> std::result::Result<Option<i64>, E> {
        match self {
            Loose::Int(value) => Ok(Some(value)),
            Loose::Float(value) if value.fract() == 0.0 => Ok(Some(value as i64)),
            Loose::Float(value) => Err(E::custom(format!("expected a whole number, got {value}"))),
            Loose::Text(text) => parse_int_text(&text).map_err(E::custom),
        }
    }

    fn into_float<E: de::Error>(self) -> std::result::Result<Option<f64>, E> {
        match self {
            Loose::Int(value) => Ok(Some(value as f64)),
            Loose::Float(value) => Ok(Some(value)),
            Loose::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| E::custom(format!("expected a number, got '{trimmed}'")))
            }
        }
    }
}

/// Parses user-entered integer text. Empty input means "not set".
pub fn parse_int_text(text: &str) -> std::result::Result<Option<i64>, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| format!("expected a whole number, got '{trimmed}'"))
}

/// `null`, `""`, `12` or `"12"` into `Option<i64>`.
pub fn optional_int<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        Some(value) => value.into_int(),
        None => Ok(None),
    }
}

/// Like [`optional_int`] but a missing value reads as zero.
pub fn int_or_zero<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    optional_int(deserializer).map(|value| value.unwrap_or(0))
}

/// `0.7` or `"0.7"` into `f64`. Missing or empty input is an error.
pub fn float<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        Some(value) => value
            .into_float()?
            .ok_or_else(|| de::Error::custom("expected a number, got an empty value")),
        None => Err(de::Error::custom("expected a number, got null")),
    }
}

/// `0.7`, `"0.7"`, `""` or `null` into `Option<f64>`.
pub fn optional_float<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Loose>::deserialize(deserializer)? {
        Some(value) => value.into_float(),
        None => Ok(None),
    }
}

/// Serializes a value to pretty JSON with canonical error handling.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|err| ReplyLineError::Serialization(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Limits {
        #[serde(default, deserialize_with = "optional_int")]
        max: Option<i64>,
        #[serde(default, deserialize_with = "int_or_zero")]
        count: i64,
        #[serde(deserialize_with = "float")]
        temperature: f64,
    }

    #[test]
    fn coerces_numeric_strings() {
        let limits: Limits =
            serde_json::from_value(json!({"max": "25", "count": "3", "temperature": "0.7"}))
                .expect("coerce");
        assert_eq!(limits.max, Some(25));
        assert_eq!(limits.count, 3);
        assert!((limits.temperature - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_string_means_unlimited_not_zero() {
        let limits: Limits =
            serde_json::from_value(json!({"max": "", "temperature": 1})).expect("coerce");
        assert_eq!(limits.max, None);
        assert_eq!(limits.count, 0);
    }

    #[test]
    fn negative_values_are_kept_for_validation() {
        let limits: Limits =
            serde_json::from_value(json!({"max": "-1", "temperature": 0.2})).expect("coerce");
        assert_eq!(limits.max, Some(-1));
    }

    #[test]
    fn rejects_garbage() {
        let result: std::result::Result<Limits, _> =
            serde_json::from_value(json!({"max": "lots", "temperature": 0.2}));
        assert!(result.is_err());
    }

    #[test]
    fn pretty_round_trip() {
        let value = json!({"key": "value"});
        let json = to_pretty_json(&value).expect("serialize");
        let decoded: serde_json::Value = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded["key"], "value");
    }
}
