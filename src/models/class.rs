//! Class, schema snapshot and object models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::property::Property;
use super::value::{PropertyMap, PropertyValue};

/// A named schema entity with its properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    /// Class name
    #[serde(rename = "class")]
    pub name: String,
    /// Human readable description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Properties in declaration order
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl Class {
    /// Create a class without properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            properties: Vec::new(),
        }
    }

    /// Set the properties
    pub fn with_properties(mut self, properties: Vec<Property>) -> Self {
        self.properties = properties;
        self
    }

    /// Find a property by name
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Read-only snapshot of the schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub classes: Vec<Class>,
}

impl Schema {
    /// Create a snapshot from classes
    pub fn new(classes: Vec<Class>) -> Self {
        Self { classes }
    }

    /// Find a class by its (normalized) name
    pub fn get_class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name == name)
    }
}

/// Caller identity forwarded to the schema store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub username: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Principal {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            groups: Vec::new(),
        }
    }
}

/// An object submitted for ingestion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    /// Class name as submitted; normalized in place by the manager
    pub class: String,
    pub id: Option<Uuid>,
    pub tenant: Option<String>,
    pub properties: PropertyMap,
}

impl Object {
    /// Create an object without properties
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ..Default::default()
        }
    }

    /// Create an object from a JSON properties document
    ///
    /// Numbers are kept as unresolved literals. A document that is not a
    /// JSON object yields no properties.
    pub fn from_json(class: impl Into<String>, properties: serde_json::Value) -> Self {
        let properties = match PropertyValue::from_json(properties) {
            PropertyValue::Object(map) => map,
            _ => PropertyMap::new(),
        };
        Self {
            class: class.into(),
            properties,
            ..Default::default()
        }
    }

    /// Add a property value
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// Force the first letter of a class name to uppercase
pub fn uppercase_class_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Force the first letter of a property name to lowercase
pub fn lowercase_first_letter(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
