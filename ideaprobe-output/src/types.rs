//! Validated document wrapper.

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};
use std::ops::Deref;

use crate::error::BindError;

/// A document that passed validation against a named schema.
///
/// Holds exactly the schema's fields, in declaration order. Serializes as
/// the plain JSON object, without the schema name.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedDocument {
    schema: String,
    fields: Map<String, JsonValue>,
}

impl TypedDocument {
    /// Wrap validated fields.
    #[must_use]
    pub fn new(schema: impl Into<String>, fields: Map<String, JsonValue>) -> Self {
        Self {
            schema: schema.into(),
            fields,
        }
    }

    /// Name of the schema this document satisfies.
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Get a field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    /// Borrow the field map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.fields
    }

    /// Copy into a JSON object value.
    #[must_use]
    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(self.fields.clone())
    }

    /// Convert into a JSON object value.
    #[must_use]
    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.fields)
    }

    /// Compact JSON text.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        // A map of JSON values always serializes.
        serde_json::to_string(&self.fields).unwrap_or_default()
    }

    /// Deserialize into a concrete type without consuming the document.
    ///
    /// # Errors
    ///
    /// Returns [`BindError`] if the type's shape disagrees with the document.
    pub fn bind<T: DeserializeOwned>(&self) -> Result<T, BindError> {
        serde_json::from_value(self.to_value()).map_err(|source| BindError {
            schema: self.schema.clone(),
            source,
        })
    }

    /// Deserialize into a concrete type.
    ///
    /// # Errors
    ///
    /// Returns [`BindError`] if the type's shape disagrees with the document.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, BindError> {
        let Self { schema, fields } = self;
        serde_json::from_value(JsonValue::Object(fields))
            .map_err(|source| BindError { schema, source })
    }
}

impl Deref for TypedDocument {
    type Target = Map<String, JsonValue>;

    fn deref(&self) -> &Self::Target {
        &self.fields
    }
}

impl Serialize for TypedDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl From<TypedDocument> for JsonValue {
    fn from(doc: TypedDocument) -> Self {
        doc.into_value()
    }
}
