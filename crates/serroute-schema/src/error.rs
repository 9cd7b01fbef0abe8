/// Errors that can occur loading schema descriptors.
///
/// Per-field validation failures are not errors at this level — they are
/// reported to handlers as [`crate::ValidationFailure`] values.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema descriptor is not valid JSON or names an unknown kind.
    #[error("invalid schema descriptor: {0}")]
    InvalidDescriptor(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
