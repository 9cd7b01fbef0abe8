use std::collections::BTreeMap;

use serde_json::Value;
use time::OffsetDateTime;

/// A coerced, validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Coerced from a string field.
    Text(String),
    /// Coerced from a numeric field (numeric strings included).
    Number(f64),
    /// Coerced from a date field.
    Timestamp(OffsetDateTime),
    /// An array field, passed through.
    List(Vec<Value>),
    /// An object field, passed through.
    Map(serde_json::Map<String, Value>),
    /// An empty value copied through unconverted because the field declares
    /// a default.
    Raw(Value),
}

impl FieldValue {
    /// Render the value as JSON for display or serialization.
    ///
    /// Timestamps render as RFC 3339 strings. Non-finite numbers cannot
    /// occur here (coercion rejects them), so numeric conversion is total.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Timestamp(ts) => ts
                .format(&time::format_description::well_known::Rfc3339)
                .map(Value::String)
                .unwrap_or_else(|_| Value::Number(ts.unix_timestamp().into())),
            FieldValue::List(items) => Value::Array(items.clone()),
            FieldValue::Map(map) => Value::Object(map.clone()),
            FieldValue::Raw(value) => value.clone(),
        }
    }
}

/// The validated value map handed to endpoint handlers: field name to
/// coerced value, containing only fields that were present and valid (or
/// defaulted).
pub type Body = BTreeMap<String, FieldValue>;

/// The tagged failure result naming which fields failed validation.
///
/// Partial results are discarded: one bad field fails the whole parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Names of the fields that failed, in raw-map order.
    pub failed_fields: Vec<String>,
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed for: {}", self.failed_fields.join(", "))
    }
}

/// What a schema parse produced: a validated body or a failure descriptor.
///
/// A sum type, so a success can never carry an error flag and vice versa.
/// Handlers match on this directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// All present fields validated; here is the coerced map.
    Valid(Body),
    /// One or more fields failed; no partial map is exposed.
    Invalid(ValidationFailure),
}

impl ParseOutcome {
    /// True when the parse produced a validated body.
    pub fn is_valid(&self) -> bool {
        matches!(self, ParseOutcome::Valid(_))
    }

    /// The validated body, if any.
    pub fn body(&self) -> Option<&Body> {
        match self {
            ParseOutcome::Valid(body) => Some(body),
            ParseOutcome::Invalid(_) => None,
        }
    }

    /// The failure descriptor, if any.
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            ParseOutcome::Valid(_) => None,
            ParseOutcome::Invalid(failure) => Some(failure),
        }
    }
}
