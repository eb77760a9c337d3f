//! Raw backend output and the field accessors used to adapt it

use serde_json::{Map, Value};

use crate::{MultirouteError, Result};

/// Fallback for categorical fields the backend could not determine.
pub const UNKNOWN: &str = "unknown";

/// The JSON object a backend produced for one analysis call.
///
/// Accessors never invent values for fields that are present: a field is
/// either taken as-is, replaced by the caller's fallback when absent or
/// `null`, or rejected as malformed when it has the wrong JSON type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOutput {
    fields: Map<String, Value>,
}

impl RawOutput {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap a decoded JSON value; anything but an object is malformed.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(MultirouteError::MalformedOutput(format!(
                "expected a JSON object from the backend, got: {other}"
            ))),
        }
    }

    /// Raw access to a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    /// A string field, or `None` when absent or `null`.
    pub fn string(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(wrong_type(key, "a string", other)),
        }
    }

    /// A categorical label; blank strings count as undetermined.
    pub fn label(&self, key: &str, fallback: &str) -> Result<String> {
        Ok(self
            .string(key)?
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string()))
    }

    /// A float field, defaulting to `0.0`.
    pub fn number(&self, key: &str) -> Result<f64> {
        match self.get(key) {
            None => Ok(0.0),
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| wrong_type(key, "a finite number", &Value::Number(n.clone()))),
            Some(other) => Err(wrong_type(key, "a number", other)),
        }
    }

    /// A non-negative integer field, or `None` when absent or `null`.
    ///
    /// Integral floats such as `25.0` are accepted.
    pub fn count(&self, key: &str) -> Result<Option<u64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_u64() {
                    return Ok(Some(v));
                }
                match n.as_f64() {
                    Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                        Ok(Some(f as u64))
                    }
                    _ => Err(wrong_type(
                        key,
                        "a non-negative integer",
                        &Value::Number(n.clone()),
                    )),
                }
            }
            Some(other) => Err(wrong_type(key, "a non-negative integer", other)),
        }
    }

    /// An ordered list of strings, defaulting to empty. Order is preserved.
    pub fn string_list(&self, key: &str) -> Result<Vec<String>> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(wrong_type(key, "a list of strings", other)),
                })
                .collect(),
            Some(other) => Err(wrong_type(key, "a list of strings", other)),
        }
    }
}

impl From<Map<String, Value>> for RawOutput {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

impl TryFrom<Value> for RawOutput {
    type Error = MultirouteError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

fn wrong_type(key: &str, expected: &str, got: &Value) -> MultirouteError {
    MultirouteError::MalformedOutput(format!(
        "backend field `{key}` should be {expected}, got: {got}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawOutput {
        RawOutput::from_value(value).unwrap()
    }

    #[test]
    fn non_object_is_malformed() {
        let err = RawOutput::from_value(json!(["a", "b"])).unwrap_err();
        assert!(matches!(err, MultirouteError::MalformedOutput(_)));
    }

    #[test]
    fn null_is_treated_as_absent() {
        let out = raw(json!({"label": null, "score": null, "items": null, "n": null}));
        assert_eq!(out.label("label", UNKNOWN).unwrap(), "unknown");
        assert_eq!(out.number("score").unwrap(), 0.0);
        assert!(out.string_list("items").unwrap().is_empty());
        assert_eq!(out.count("n").unwrap(), None);
    }

    #[test]
    fn blank_label_falls_back() {
        let out = raw(json!({"label": "   "}));
        assert_eq!(out.label("label", UNKNOWN).unwrap(), "unknown");
    }

    #[test]
    fn present_label_is_not_altered() {
        let out = raw(json!({"label": " Mixed Case "}));
        assert_eq!(out.label("label", UNKNOWN).unwrap(), " Mixed Case ");
    }

    #[test]
    fn count_accepts_integral_floats_only() {
        let out = raw(json!({"a": 25.0, "b": 2.5, "c": -1}));
        assert_eq!(out.count("a").unwrap(), Some(25));
        assert!(out.count("b").is_err());
        assert!(out.count("c").is_err());
    }

    #[test]
    fn list_with_non_string_item_is_malformed() {
        let out = raw(json!({"items": ["a", 1]}));
        let err = out.string_list("items").unwrap_err();
        assert!(err.to_string().contains("`items`"));
    }

    #[test]
    fn wrong_scalar_type_is_malformed() {
        let out = raw(json!({"score": "high", "label": 3}));
        assert!(out.number("score").is_err());
        assert!(out.label("label", UNKNOWN).is_err());
    }
}
