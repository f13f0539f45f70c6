//! Data type tags assigned to properties

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name used for cross-references in lists of allowed types
pub const CROSS_REFERENCE_NAME: &str = "cref";

/// Error returned when a data type name is not recognized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown data type '{0}'")]
pub struct UnknownDataType(pub String);

/// A property data type
///
/// Scalar kinds (except geo coordinates, phone numbers and references) have
/// an array counterpart. A cross-reference carries the name of its target
/// class, which is also its wire name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DataType {
    Text,
    String,
    Number,
    Int,
    Boolean,
    Date,
    Uuid,
    Object,
    GeoCoordinates,
    PhoneNumber,
    TextArray,
    StringArray,
    NumberArray,
    IntArray,
    BooleanArray,
    DateArray,
    UuidArray,
    ObjectArray,
    /// Reference to an object of the named class
    CrossReference(String),
}

impl DataType {
    /// Get the wire name of this data type
    pub fn as_str(&self) -> &str {
        match self {
            DataType::Text => "text",
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Int => "int",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::Uuid => "uuid",
            DataType::Object => "object",
            DataType::GeoCoordinates => "geoCoordinates",
            DataType::PhoneNumber => "phoneNumber",
            DataType::TextArray => "text[]",
            DataType::StringArray => "string[]",
            DataType::NumberArray => "number[]",
            DataType::IntArray => "int[]",
            DataType::BooleanArray => "boolean[]",
            DataType::DateArray => "date[]",
            DataType::UuidArray => "uuid[]",
            DataType::ObjectArray => "object[]",
            DataType::CrossReference(class) => class,
        }
    }

    /// Get the array counterpart of a scalar type
    pub fn as_array(&self) -> Option<DataType> {
        match self {
            DataType::Text => Some(DataType::TextArray),
            DataType::String => Some(DataType::StringArray),
            DataType::Number => Some(DataType::NumberArray),
            DataType::Int => Some(DataType::IntArray),
            DataType::Boolean => Some(DataType::BooleanArray),
            DataType::Date => Some(DataType::DateArray),
            DataType::Uuid => Some(DataType::UuidArray),
            DataType::Object => Some(DataType::ObjectArray),
            _ => None,
        }
    }

    /// Get the single-valued type of an array type
    ///
    /// Non-array types are returned unchanged.
    pub fn element_type(&self) -> DataType {
        match self {
            DataType::TextArray => DataType::Text,
            DataType::StringArray => DataType::String,
            DataType::NumberArray => DataType::Number,
            DataType::IntArray => DataType::Int,
            DataType::BooleanArray => DataType::Boolean,
            DataType::DateArray => DataType::Date,
            DataType::UuidArray => DataType::Uuid,
            DataType::ObjectArray => DataType::Object,
            other => other.clone(),
        }
    }

    /// Check if this is an array type
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            DataType::TextArray
                | DataType::StringArray
                | DataType::NumberArray
                | DataType::IntArray
                | DataType::BooleanArray
                | DataType::DateArray
                | DataType::UuidArray
                | DataType::ObjectArray
        )
    }

    /// Check if this is a cross-reference
    pub fn is_reference(&self) -> bool {
        matches!(self, DataType::CrossReference(_))
    }

    /// Check if this type carries nested properties
    pub fn is_nested(&self) -> bool {
        matches!(self, DataType::Object | DataType::ObjectArray)
    }

    /// Names of the types a property value can be inferred as
    pub fn value_type_names(nested: bool) -> Vec<String> {
        let mut names = Self::base_names();
        if !nested {
            names.push(DataType::PhoneNumber.to_string());
            names.push(DataType::GeoCoordinates.to_string());
        }
        names
    }

    /// Names of the types a sequence element can be inferred as
    pub fn element_type_names(nested: bool) -> Vec<String> {
        let mut names = Self::base_names();
        if !nested {
            names.push(CROSS_REFERENCE_NAME.to_string());
        }
        names
    }

    fn base_names() -> Vec<String> {
        [
            DataType::Text,
            DataType::Number,
            DataType::Int,
            DataType::Boolean,
            DataType::Date,
            DataType::Uuid,
            DataType::Object,
        ]
        .iter()
        .map(|dt| dt.to_string())
        .collect()
    }
}

/// Get the nested type of a declared data type list
///
/// Returns the tag only when the list is exactly `[object]` or `[object[]]`.
pub fn as_nested(data_type: &[DataType]) -> Option<&DataType> {
    match data_type {
        [dt] if dt.is_nested() => Some(dt),
        _ => None,
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = UnknownDataType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dt = match s {
            "text" => DataType::Text,
            "string" => DataType::String,
            "number" => DataType::Number,
            "int" => DataType::Int,
            "boolean" => DataType::Boolean,
            "date" => DataType::Date,
            "uuid" => DataType::Uuid,
            "object" => DataType::Object,
            "geoCoordinates" => DataType::GeoCoordinates,
            "phoneNumber" => DataType::PhoneNumber,
            "text[]" => DataType::TextArray,
            "string[]" => DataType::StringArray,
            "number[]" => DataType::NumberArray,
            "int[]" => DataType::IntArray,
            "boolean[]" => DataType::BooleanArray,
            "date[]" => DataType::DateArray,
            "uuid[]" => DataType::UuidArray,
            "object[]" => DataType::ObjectArray,
            // Any other name is a reference target class
            class if !class.is_empty() && !class.ends_with("[]") => {
                DataType::CrossReference(class.to_string())
            }
            other => return Err(UnknownDataType(other.to_string())),
        };
        Ok(dt)
    }
}

impl From<DataType> for String {
    fn from(dt: DataType) -> Self {
        match dt {
            DataType::CrossReference(class) => class,
            other => other.as_str().to_string(),
        }
    }
}

impl TryFrom<String> for DataType {
    type Error = UnknownDataType;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
