//! # ideaprobe-output
//!
//! Turning free-form model text into schema-conforming documents.
//!
//! ## Core Concepts
//!
//! - **[`synthesize`]**: Placeholder example document for a schema
//! - **[`extract`]**: Pull JSON documents out of model text
//! - **[`validate`]**: Partition documents into validated and failed
//! - **[`TypedDocument`]**: A validated document, bindable with serde
//! - **[`StructuredOutput`]**: Ties a Rust type to its schema
//!
//! ## Example
//!
//! ```rust
//! use ideaprobe_output::{extract, validate};
//! use ideaprobe_schema::Schema;
//!
//! let schema = Schema::builder("KeywordSet").string_list("keywords").build()?;
//!
//! let text = "Sure! ```json\n{\"keywords\": [\"coffee\", \"delivery\"]}\n```";
//! let documents = extract(text).unwrap_or_default();
//! let outcome = validate(&schema, &serde_json::Value::Array(documents))?;
//!
//! assert!(outcome.is_clean());
//! assert_eq!(outcome.validated[0].get("keywords").unwrap()[0], "coffee");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod example;
pub mod parser;
pub mod schema;
pub mod types;
pub mod validator;

// Re-exports
pub use error::{BindError, InvalidInputKind};
pub use example::{render_example, synthesize, LIST_FAN_OUT};
pub use parser::{extract, extract_first};
pub use schema::StructuredOutput;
pub use types::TypedDocument;
pub use validator::{
    validate, validate_document, validate_documents, FieldIssue, ValidationFailure,
    ValidationOutcome,
};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        extract, render_example, synthesize, validate, StructuredOutput, TypedDocument,
        ValidationOutcome,
    };
}
