//! Schema and payload models
//!
//! Defines the schema entities (classes, properties, nested properties and
//! their data types) and the loosely-typed objects whose values the
//! inference engine classifies.

pub mod class;
pub mod crossref;
pub mod data_type;
pub mod property;
pub mod value;

pub use class::{Class, Object, Principal, Schema, lowercase_first_letter, uppercase_class_name};
pub use crossref::{Reference, ReferenceError};
pub use data_type::{CROSS_REFERENCE_NAME, DataType, UnknownDataType, as_nested};
pub use property::{NestedProperty, Property};
pub use value::{PropertyMap, PropertyValue};
