//! Response schema for structured output
//!
//! Models the OpenAPI subset that Gemini accepts as `responseSchema`. Only the
//! shapes needed for JSON-object answers are covered.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Primitive type tag of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

/// A schema node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSchema {
    /// Type of this node
    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    /// Object members
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, ResponseSchema>>,

    /// Required object members
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// Order in which the model should emit object members
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_ordering: Option<Vec<String>>,

    /// Element schema for arrays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ResponseSchema>>,
}

impl ResponseSchema {
    fn leaf(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            properties: None,
            required: None,
            property_ordering: None,
            items: None,
        }
    }

    /// A string node
    pub fn string() -> Self {
        Self::leaf(SchemaType::String)
    }

    /// A number node
    pub fn number() -> Self {
        Self::leaf(SchemaType::Number)
    }

    /// An array of `items`
    pub fn array(items: ResponseSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::leaf(SchemaType::Array)
        }
    }

    /// An object whose members keep the given order
    ///
    /// Every member is listed in `propertyOrdering`. Use [`Self::require_all`]
    /// to also mark them required.
    pub fn object<I, K>(members: I) -> Self
    where
        I: IntoIterator<Item = (K, ResponseSchema)>,
        K: Into<String>,
    {
        let mut properties = BTreeMap::new();
        let mut ordering = Vec::new();
        for (name, schema) in members {
            let name = name.into();
            ordering.push(name.clone());
            properties.insert(name, schema);
        }

        Self {
            properties: Some(properties),
            property_ordering: Some(ordering),
            ..Self::leaf(SchemaType::Object)
        }
    }

    /// Mark every declared object member as required
    pub fn require_all(mut self) -> Self {
        self.required = self.property_ordering.clone();
        self
    }
}
