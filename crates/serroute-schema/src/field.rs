use serde::Deserialize;
use serde_json::Value;

/// The closed set of field kinds a schema may declare.
///
/// In JSON descriptors these appear lowercase: `"string"`, `"number"`,
/// `"date"`, `"array"`, `"object"`. Anything else fails descriptor loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// A plain text value.
    String,
    /// A numeric value; numeric strings are coerced.
    Number,
    /// A timestamp; RFC 3339 strings and epoch-millisecond numbers coerce.
    Date,
    /// A JSON array, passed through as-is.
    Array,
    /// A JSON object (arrays do not qualify), passed through as-is.
    Object,
}

impl FieldKind {
    /// Descriptor spelling of the kind.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Array => "array",
            FieldKind::Object => "object",
        }
    }
}

/// Schema entry for a single field: expected kind, whether the field is
/// required, and an optional default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldSpec {
    /// Expected kind of the field value.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// When true, an empty or missing value fails validation.
    #[serde(default)]
    pub required: bool,
    /// When set, a present-but-empty value passes through unconverted
    /// instead of being dropped.
    #[serde(default)]
    pub default: Option<Value>,
}

impl FieldSpec {
    /// An optional field of the given kind.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            default: None,
        }
    }

    /// Mark the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Declare a default, enabling the pass-through branch for empty values.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_deserializes_from_lowercase() {
        let kind: FieldKind = serde_json::from_str("\"number\"").unwrap();
        assert_eq!(kind, FieldKind::Number);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result: Result<FieldKind, _> = serde_json::from_str("\"boolean\"");
        assert!(result.is_err());
    }

    #[test]
    fn spec_defaults_to_optional() {
        let spec: FieldSpec = serde_json::from_str(r#"{"type": "string"}"#).unwrap();
        assert_eq!(spec.kind, FieldKind::String);
        assert!(!spec.required);
        assert!(spec.default.is_none());
    }

    #[test]
    fn builder_matches_descriptor_form() {
        let built = FieldSpec::new(FieldKind::Number).required();
        let parsed: FieldSpec =
            serde_json::from_str(r#"{"type": "number", "required": true}"#).unwrap();
        assert_eq!(built, parsed);
    }
}
