//! Record schema declarations.
//!
//! A [`Schema`] is a named, ordered mapping from field name to [`FieldType`].
//! Nested schemas are held behind an [`Arc`], so a schema can only ever embed
//! schemas that were fully built before it. Cycles are therefore impossible to
//! express, which keeps every structural recursion over a schema finite.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{SchemaError, SchemaResult};

/// The declared type of a schema field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// UTF-8 string.
    String,
    /// Signed or unsigned integer.
    Integer,
    /// Floating point number.
    Float,
    /// Boolean.
    Boolean,
    /// Nested record.
    Object(Arc<Schema>),
    /// Homogeneous list.
    List(Box<FieldType>),
    /// Arbitrary JSON value.
    Any,
}

impl FieldType {
    /// A list of the given item type.
    #[must_use]
    pub fn list(item: FieldType) -> Self {
        Self::List(Box::new(item))
    }

    /// A nested record.
    #[must_use]
    pub fn object(schema: impl Into<Arc<Schema>>) -> Self {
        Self::Object(schema.into())
    }

    /// A list of nested records.
    #[must_use]
    pub fn object_list(schema: impl Into<Arc<Schema>>) -> Self {
        Self::list(Self::object(schema))
    }

    /// Whether this is a scalar type.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::String | Self::Integer | Self::Float | Self::Boolean
        )
    }

    /// The item type if this is a list.
    #[must_use]
    pub fn item_type(&self) -> Option<&FieldType> {
        match self {
            Self::List(item) => Some(item),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "boolean"),
            Self::Object(schema) => write!(f, "object {}", schema.name()),
            Self::List(item) => write!(f, "list of {}", item),
            Self::Any => write!(f, "any"),
        }
    }
}

/// A single field of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name, matched against JSON object keys.
    pub name: String,
    /// Declared type.
    pub ty: FieldType,
    /// Whether the field must be present and non-null.
    pub required: bool,
    /// Human-readable description.
    pub description: Option<String>,
}

impl Field {
    /// Create a required field.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            description: None,
        }
    }

    /// Mark the field optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named, ordered record shape.
///
/// Schemas are immutable once built and are typically shared behind an
/// [`Arc`] by the registry, the synthesizer and the validator.
///
/// # Example
///
/// ```rust
/// use ideaprobe_schema::{FieldType, Schema};
///
/// let insight = Schema::builder("PlatformInsight")
///     .string("platform")
///     .string("insights")
///     .build()?;
///
/// let report = Schema::builder("Report")
///     .integer("overall_score")
///     .field_of("platform_insights", FieldType::object_list(insight))
///     .build()?;
///
/// assert_eq!(report.len(), 2);
/// # Ok::<(), ideaprobe_schema::SchemaError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    description: Option<String>,
    fields: IndexMap<String, Field>,
}

impl Schema {
    /// Start building a schema.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Field names in declaration order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Create a builder for a schema with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Set the schema description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a fully specified field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a required field of the given type.
    #[must_use]
    pub fn field_of(self, name: &str, ty: FieldType) -> Self {
        self.field(Field::new(name, ty))
    }

    /// Add a required string field.
    #[must_use]
    pub fn string(self, name: &str) -> Self {
        self.field_of(name, FieldType::String)
    }

    /// Add a required integer field.
    #[must_use]
    pub fn integer(self, name: &str) -> Self {
        self.field_of(name, FieldType::Integer)
    }

    /// Add a required float field.
    #[must_use]
    pub fn float(self, name: &str) -> Self {
        self.field_of(name, FieldType::Float)
    }

    /// Add a required boolean field.
    #[must_use]
    pub fn boolean(self, name: &str) -> Self {
        self.field_of(name, FieldType::Boolean)
    }

    /// Add a required list-of-string field.
    #[must_use]
    pub fn string_list(self, name: &str) -> Self {
        self.field_of(name, FieldType::list(FieldType::String))
    }

    /// Add a required nested record field.
    #[must_use]
    pub fn object(self, name: &str, schema: impl Into<Arc<Schema>>) -> Self {
        self.field_of(name, FieldType::object(schema))
    }

    /// Add a required list-of-record field.
    #[must_use]
    pub fn object_list(self, name: &str, schema: impl Into<Arc<Schema>>) -> Self {
        self.field_of(name, FieldType::object_list(schema))
    }

    /// Build the schema, rejecting empty names and duplicate fields.
    pub fn build(self) -> SchemaResult<Schema> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }

        let mut fields = IndexMap::with_capacity(self.fields.len());
        for field in self.fields {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyName);
            }
            if fields.contains_key(&field.name) {
                return Err(SchemaError::duplicate_field(&self.name, &field.name));
            }
            fields.insert(field.name.clone(), field);
        }

        Ok(Schema {
            name: self.name,
            description: self.description,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn insight() -> Schema {
        Schema::builder("PlatformInsight")
            .string("platform")
            .string("insights")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_preserves_declaration_order() {
        let schema = Schema::builder("PostAnalysis")
            .boolean("relevant")
            .string_list("pain_points")
            .string("sentiment")
            .integer("engagement_score")
            .build()
            .unwrap();

        assert_eq!(
            schema.field_names(),
            vec!["relevant", "pain_points", "sentiment", "engagement_score"]
        );
        assert_eq!(schema.len(), 4);
        assert!(schema.field("sentiment").unwrap().required);
    }

    #[test]
    fn test_builder_rejects_duplicate_field() {
        let result = Schema::builder("KeywordSet")
            .string_list("keywords")
            .string("keywords")
            .build();

        assert_eq!(
            result,
            Err(SchemaError::duplicate_field("KeywordSet", "keywords"))
        );
    }

    #[rstest]
    #[case("", "field")]
    #[case("  ", "field")]
    #[case("Schema", "")]
    fn test_builder_rejects_empty_names(#[case] schema: &str, #[case] field: &str) {
        let result = Schema::builder(schema).string(field).build();
        assert_eq!(result, Err(SchemaError::EmptyName));
    }

    #[test]
    fn test_optional_field() {
        let schema = Schema::builder("Post")
            .field(Field::new("url", FieldType::String).optional().with_description("Link"))
            .build()
            .unwrap();

        let field = schema.field("url").unwrap();
        assert!(!field.required);
        assert_eq!(field.description.as_deref(), Some("Link"));
    }

    #[rstest]
    #[case(FieldType::String, "string")]
    #[case(FieldType::list(FieldType::Integer), "list of integer")]
    #[case(FieldType::object(insight()), "object PlatformInsight")]
    #[case(FieldType::object_list(insight()), "list of object PlatformInsight")]
    #[case(FieldType::Any, "any")]
    fn test_field_type_display(#[case] ty: FieldType, #[case] expected: &str) {
        assert_eq!(ty.to_string(), expected);
    }

    #[test]
    fn test_nested_schema_is_shared() {
        let nested = Arc::new(insight());
        let report = Schema::builder("Report")
            .object_list("platform_insights", Arc::clone(&nested))
            .build()
            .unwrap();

        let field = report.field("platform_insights").unwrap();
        match field.ty.item_type() {
            Some(FieldType::Object(schema)) => assert!(Arc::ptr_eq(schema, &nested)),
            other => panic!("unexpected item type: {:?}", other),
        }
    }
}
