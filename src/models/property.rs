//! Property and nested property models

use serde::{Deserialize, Serialize};

use super::data_type::{DataType, as_nested};

/// A named, typed field of a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Property name
    pub name: String,
    /// Declared data type; more than one entry only for multi-target references
    pub data_type: Vec<DataType>,
    /// Human readable description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Children of an object or object array property
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_properties: Vec<NestedProperty>,
}

impl Property {
    /// Create a property without description or children
    pub fn new(name: impl Into<String>, data_type: Vec<DataType>) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: String::new(),
            nested_properties: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the nested properties
    pub fn with_nested_properties(mut self, nested: Vec<NestedProperty>) -> Self {
        self.nested_properties = nested;
        self
    }

    /// Check if this property is object or object array typed
    pub fn is_nested(&self) -> bool {
        as_nested(&self.data_type).is_some()
    }
}

/// A property living inside an object or object array property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedProperty {
    /// Property name, unique among its siblings
    pub name: String,
    /// Declared data type
    pub data_type: Vec<DataType>,
    /// Human readable description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Children of an object or object array property
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_properties: Vec<NestedProperty>,
}

impl NestedProperty {
    /// Create a nested property without description or children
    pub fn new(name: impl Into<String>, data_type: Vec<DataType>) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: String::new(),
            nested_properties: Vec::new(),
        }
    }

    /// Set the nested properties
    pub fn with_nested_properties(mut self, nested: Vec<NestedProperty>) -> Self {
        self.nested_properties = nested;
        self
    }

    /// Check if this property is object or object array typed
    pub fn is_nested(&self) -> bool {
        as_nested(&self.data_type).is_some()
    }

    /// Find a direct child by name
    pub fn child(&self, name: &str) -> Option<&NestedProperty> {
        self.nested_properties.iter().find(|np| np.name == name)
    }
}
