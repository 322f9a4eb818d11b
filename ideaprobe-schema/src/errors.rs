//! Schema authoring errors.

use thiserror::Error;

/// Errors raised while declaring or resolving schemas.
///
/// These indicate programming errors upstream of any model call, so they are
/// never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// No schema was declared under this name.
    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    /// A schema with this name was already declared.
    #[error("Schema '{0}' is already declared")]
    AlreadyDeclared(String),

    /// A field name appears twice in one schema.
    #[error("Duplicate field '{field}' in schema '{schema}'")]
    DuplicateField {
        /// Schema being built.
        schema: String,
        /// The repeated field name.
        field: String,
    },

    /// A schema or field was given an empty name.
    #[error("Schema and field names must not be empty")]
    EmptyName,
}

impl SchemaError {
    /// Create an unknown schema error.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownSchema(name.into())
    }

    /// Create a duplicate field error.
    pub fn duplicate_field(schema: impl Into<String>, field: impl Into<String>) -> Self {
        Self::DuplicateField {
            schema: schema.into(),
            field: field.into(),
        }
    }
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
