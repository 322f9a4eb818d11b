//! Binding between Rust types and declared schemas.

use ideaprobe_schema::{Schema, SchemaResult};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// A Rust type that a model can be asked to produce.
///
/// The schema drives the prompt example and validation; serde then binds the
/// validated document into `Self`. The two must agree on field names and
/// types, otherwise generation reports a binding error.
///
/// # Example
///
/// ```rust
/// use ideaprobe_output::StructuredOutput;
/// use ideaprobe_schema::{Schema, SchemaResult};
/// use serde::Deserialize;
/// use std::sync::Arc;
///
/// #[derive(Deserialize)]
/// struct KeywordSet {
///     keywords: Vec<String>,
/// }
///
/// impl StructuredOutput for KeywordSet {
///     fn schema() -> SchemaResult<Arc<Schema>> {
///         Schema::builder("KeywordSet").string_list("keywords").build().map(Arc::new)
///     }
/// }
///
/// assert_eq!(KeywordSet::schema()?.name(), "KeywordSet");
/// # Ok::<(), ideaprobe_schema::SchemaError>(())
/// ```
pub trait StructuredOutput: DeserializeOwned + Send + 'static {
    /// The schema documents of this type must satisfy.
    fn schema() -> SchemaResult<Arc<Schema>>;
}
