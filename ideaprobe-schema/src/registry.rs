//! Schema registry.
//!
//! The registry is a plain lookup table: populate it once at startup, then
//! share it read-only (behind an `Arc` or a `OnceLock`) with every caller.
//! It has no interior mutability, so concurrent readers need no locking.

use indexmap::IndexMap;
use std::sync::Arc;

use crate::errors::{SchemaError, SchemaResult};
use crate::schema::Schema;

/// Registry of named schemas.
///
/// # Example
///
/// ```rust
/// use ideaprobe_schema::{Schema, SchemaRegistry};
///
/// let mut registry = SchemaRegistry::new();
/// registry.declare(Schema::builder("KeywordSet").string_list("keywords").build()?)?;
///
/// let schema = registry.resolve("KeywordSet")?;
/// assert_eq!(schema.field_names(), vec!["keywords"]);
/// assert!(registry.resolve("Missing").is_err());
/// # Ok::<(), ideaprobe_schema::SchemaError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a schema under its own name.
    ///
    /// Returns the shared handle that the registry now holds.
    pub fn declare(&mut self, schema: Schema) -> SchemaResult<Arc<Schema>> {
        self.declare_arc(Arc::new(schema))
    }

    /// Declare an already shared schema.
    pub fn declare_arc(&mut self, schema: Arc<Schema>) -> SchemaResult<Arc<Schema>> {
        let name = schema.name().to_string();
        if self.schemas.contains_key(&name) {
            return Err(SchemaError::AlreadyDeclared(name));
        }
        self.schemas.insert(name, Arc::clone(&schema));
        Ok(schema)
    }

    /// Resolve a schema by name.
    pub fn resolve(&self, name: &str) -> SchemaResult<Arc<Schema>> {
        self.schemas
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::unknown(name))
    }

    /// Borrow a schema by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    /// Whether a schema with this name is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Declared names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Number of declared schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Iterate over declared schemas.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.values()
    }
}
