//! Scalar-or-list values for script variables
//!
//! Raw and resolved variable values share one shape: a scalar piece of text
//! or an ordered list of values. Raw scalars may carry `{$name}` placeholders
//! that the compiler substitutes during resolution.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A variable value, either a single piece of text or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A single textual value (may contain placeholders when raw)
    Scalar(String),
    /// An ordered list of values
    List(Vec<Value>),
}

impl Value {
    /// Build a scalar value from anything string-like
    pub fn scalar(text: impl Into<String>) -> Self {
        Value::Scalar(text.into())
    }

    /// The empty-string scalar used as the default for absent variables
    pub fn empty() -> Self {
        Value::Scalar(String::new())
    }

    /// Whether this value is a list
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Scalar(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Scalar(text)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

// Manifests are JSON, where variable values may be written as numbers or
// booleans; those coerce to scalar text the same way the host's dynamic
// metadata format would stringify them.
impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number, boolean, or list of values")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
                Ok(Value::Scalar(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
                Ok(Value::Scalar(v))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
                Ok(Value::Scalar(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
                Ok(Value::Scalar(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
                Ok(Value::Scalar(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
                Ok(Value::Scalar(v.to_string()))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element::<Value>()? {
                    items.push(item);
                }
                Ok(Value::List(items))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_scalar() {
        let value: Value = serde_json::from_str(r#""hello""#).unwrap();
        assert_eq!(value, Value::scalar("hello"));
    }

    #[test]
    fn test_deserialize_list() {
        let value: Value = serde_json::from_str(r#"["foo", "bar"]"#).unwrap();
        assert_eq!(value, Value::from(vec!["foo", "bar"]));
    }

    #[test]
    fn test_deserialize_coerces_numbers_and_bools() {
        let value: Value = serde_json::from_str("[1, true, \"x\"]").unwrap();
        assert_eq!(value, Value::from(vec!["1", "true", "x"]));
    }

    #[test]
    fn test_deserialize_nested_list() {
        let value: Value = serde_json::from_str(r#"["a", ["b", "c"]]"#).unwrap();
        assert_eq!(
            value,
            Value::List(vec![Value::scalar("a"), Value::from(vec!["b", "c"])])
        );
    }

    #[test]
    fn test_serialize_round_trip() {
        let value = Value::from(vec!["foo", "bar"]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"["foo","bar"]"#);
    }
}
