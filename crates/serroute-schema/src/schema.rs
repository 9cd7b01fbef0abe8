use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::coerce::{coerce, is_empty};
use crate::error::Result;
use crate::field::FieldSpec;
use crate::outcome::{Body, FieldValue, ParseOutcome, ValidationFailure};

/// A declared body schema: field name to [`FieldSpec`].
///
/// Immutable once built. Raw fields with no matching spec are silently
/// dropped during parsing — only declared fields ever reach a handler.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct BodySchema {
    fields: BTreeMap<String, FieldSpec>,
}

impl BodySchema {
    /// An empty schema; every raw field is dropped, every parse succeeds
    /// with an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field declaration (builder style).
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Load a schema from a JSON descriptor.
    ///
    /// An unknown kind or malformed descriptor fails here, at configuration
    /// load — not silently per request.
    pub fn from_json(descriptor: &str) -> Result<Self> {
        Ok(serde_json::from_str(descriptor)?)
    }

    /// Look up the spec for a field.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate and coerce a raw field map against this schema.
    ///
    /// Walks the *raw* map, not the schema: declared fields absent from the
    /// input are not synthesized. Per present field:
    /// 1. Empty value: fail if required, pass through unconverted if a
    ///    default is declared, otherwise drop.
    /// 2. Non-empty value: coerce to the declared kind or record a failure.
    ///
    /// Any failure discards the partial body and returns the failed field
    /// names instead.
    pub fn parse(&self, raw: &Map<String, Value>) -> ParseOutcome {
        let mut failed_fields = Vec::new();
        let mut body = Body::new();

        for (name, value) in raw {
            let Some(spec) = self.fields.get(name) else {
                // Undeclared field: no coercion rule applies, drop silently.
                continue;
            };

            if is_empty(value) {
                if spec.required {
                    failed_fields.push(name.clone());
                } else if spec.default.is_some() {
                    body.insert(name.clone(), FieldValue::Raw(value.clone()));
                }
                continue;
            }

            match coerce(spec.kind, value) {
                Ok(coerced) => {
                    body.insert(name.clone(), coerced);
                }
                Err(()) => failed_fields.push(name.clone()),
            }
        }

        if failed_fields.is_empty() {
            ParseOutcome::Valid(body)
        } else {
            debug!(?failed_fields, "body failed schema validation");
            ParseOutcome::Invalid(ValidationFailure { failed_fields })
        }
    }
}
