//! Field schema validation and coercion at the routing boundary.
//!
//! Endpoints declare a schema — field name to `{kind, required, default}` —
//! and every incoming raw field map is validated and coerced against it
//! before a handler ever sees it. Handlers receive either a typed value map
//! or a failure naming the offending fields; the two shapes cannot overlap.
//!
//! Validation failures are per-request and recoverable. A malformed schema
//! descriptor, by contrast, is a configuration error and fails at load time.

pub mod coerce;
pub mod error;
pub mod field;
pub mod outcome;
pub mod schema;

pub use error::{Result, SchemaError};
pub use field::{FieldKind, FieldSpec};
pub use outcome::{Body, FieldValue, ParseOutcome, ValidationFailure};
pub use schema::BodySchema;
