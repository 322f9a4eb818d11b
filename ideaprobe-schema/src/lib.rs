//! # ideaprobe-schema
//!
//! Declarative record shapes for structured model output.
//!
//! ## Core Concepts
//!
//! - **[`Schema`]**: A named, ordered set of typed fields
//! - **[`FieldType`]**: Primitive, nested record, list, or arbitrary JSON
//! - **[`SchemaBuilder`]**: Fluent construction with duplicate-field checks
//! - **[`SchemaRegistry`]**: Name-to-schema lookup populated at startup
//!
//! Schemas carry no behavior of their own. The example synthesizer and the
//! validator in `ideaprobe-output` walk them structurally.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod errors;
pub mod registry;
pub mod schema;

pub use errors::{SchemaError, SchemaResult};
pub use registry::SchemaRegistry;
pub use schema::{Field, FieldType, Schema, SchemaBuilder};
