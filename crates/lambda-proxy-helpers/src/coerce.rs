//! JSON-compatibility coercion of handler payloads.
//!
//! `serde_json` cannot serialize arbitrary-precision decimals or timestamps
//! directly, so payloads pass through [`Payload`], a JSON value sum type
//! extended with the two non-native source types. [`Payload::into_json`]
//! rewrites the tree depth-first into plain JSON before encoding.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

/// A JSON-like payload value, extended with decimal and timestamp leaves.
///
/// Handlers can build one from a `serde_json::Value`, from primitives, or
/// from collections via the `From` impls. Cycles are unrepresentable (the
/// tree owns its children), so coercion always terminates.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Arbitrary-precision decimal, coerced before encoding.
    Decimal(Decimal),
    /// Timestamp, coerced to its ISO-8601 string representation.
    Timestamp(DateTime<Utc>),
    Array(Vec<Payload>),
    Object(BTreeMap<String, Payload>),
}

impl Payload {
    /// Coerce this payload into a plain JSON value.
    ///
    /// - arrays coerce each element, preserving order and length;
    /// - objects coerce each value, preserving all keys;
    /// - integral decimals become signed integers, fractional decimals the
    ///   nearest representable float; values outside both ranges fall back
    ///   to their string rendering rather than fail;
    /// - timestamps become RFC 3339 strings;
    /// - everything else passes through unchanged.
    pub fn into_json(self) -> Value {
        match self {
            Payload::Null => Value::Null,
            Payload::Bool(flag) => Value::Bool(flag),
            Payload::Number(number) => Value::Number(number),
            Payload::String(text) => Value::String(text),
            Payload::Decimal(decimal) => decimal_to_json(decimal),
            Payload::Timestamp(timestamp) => Value::String(timestamp.to_rfc3339()),
            Payload::Array(items) => {
                Value::Array(items.into_iter().map(Payload::into_json).collect())
            }
            Payload::Object(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key, value.into_json());
                }
                Value::Object(map)
            }
        }
    }

    /// Whether this payload counts as empty for response-body purposes.
    ///
    /// Null, empty strings, empty arrays and empty objects produce no body.
    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Null => true,
            Payload::String(text) => text.is_empty(),
            Payload::Array(items) => items.is_empty(),
            Payload::Object(entries) => entries.is_empty(),
            _ => false,
        }
    }
}

fn decimal_to_json(decimal: Decimal) -> Value {
    if decimal.is_integer() {
        if let Some(int) = decimal.to_i64() {
            return Value::Number(Number::from(int));
        }
    }
    decimal
        .to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(decimal.to_string()))
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Payload::Null,
            Value::Bool(flag) => Payload::Bool(flag),
            Value::Number(number) => Payload::Number(number),
            Value::String(text) => Payload::String(text),
            Value::Array(items) => Payload::Array(items.into_iter().map(Payload::from).collect()),
            Value::Object(map) => Payload::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Payload::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Decimal> for Payload {
    fn from(decimal: Decimal) -> Self {
        Payload::Decimal(decimal)
    }
}

impl From<DateTime<Utc>> for Payload {
    fn from(timestamp: DateTime<Utc>) -> Self {
        Payload::Timestamp(timestamp)
    }
}

impl From<bool> for Payload {
    fn from(flag: bool) -> Self {
        Payload::Bool(flag)
    }
}

impl From<i32> for Payload {
    fn from(number: i32) -> Self {
        Payload::Number(Number::from(number))
    }
}

impl From<i64> for Payload {
    fn from(number: i64) -> Self {
        Payload::Number(Number::from(number))
    }
}

impl From<u64> for Payload {
    fn from(number: u64) -> Self {
        Payload::Number(Number::from(number))
    }
}

impl From<f64> for Payload {
    fn from(number: f64) -> Self {
        // Non-finite floats have no JSON representation; map them to null.
        Number::from_f64(number)
            .map(Payload::Number)
            .unwrap_or(Payload::Null)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::String(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::String(text)
    }
}

impl<T: Into<Payload>> From<Vec<T>> for Payload {
    fn from(items: Vec<T>) -> Self {
        Payload::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Set-like collections coerce element-wise; JSON has no set representation,
/// so the result serializes as a sequence.
impl<T: Into<Payload> + Ord> From<BTreeSet<T>> for Payload {
    fn from(items: BTreeSet<T>) -> Self {
        Payload::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Payload>> From<BTreeMap<String, T>> for Payload {
    fn from(entries: BTreeMap<String, T>) -> Self {
        Payload::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key, value.into()))
                .collect(),
        )
    }
}
