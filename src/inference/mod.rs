//! Type inference for untyped object payloads
//!
//! This module maps loosely-typed property values to schema data types and
//! builds nested property trees for object-typed values.
//!
//! ## Features
//!
//! - **Type inference** - Map values to scalar, array and reference types
//! - **Format detection** - Recognize dates, UUIDs, geo coordinates and phone numbers
//! - **Reference resolution** - Resolve class-less beacons through an object lookup
//! - **Nested building** - Build superset trees for objects and object arrays
//! - **Nested merging** - Extend existing nested trees without retyping them
//!
//! ## Example
//!
//! ```rust,ignore
//! use auto_schema::inference::{AutoSchemaConfig, TypeInferrer};
//! use auto_schema::models::PropertyValue;
//!
//! let inferrer = TypeInferrer::new(AutoSchemaConfig::default());
//! let value = PropertyValue::from_json(serde_json::json!(["a", "b"]));
//!
//! let types = inferrer.determine_type(&value, false).await?;
//! assert_eq!(types[0].as_str(), "text[]");
//! ```

mod config;
mod formats;
mod inferrer;
mod merge;
mod nested;
mod types;

pub use config::{
    AutoSchemaConfig, AutoSchemaConfigBuilder, ENV_DEFAULT_DATE, ENV_DEFAULT_NUMBER,
    ENV_DEFAULT_STRING, ENV_ENABLED,
};
pub use formats::{
    BEACON_KEY, ObjectFormat, StringFormat, beacon_reference, detect_object_format,
    detect_string_format, is_geo_coordinates, is_phone_number,
};
pub use inferrer::TypeInferrer;
pub use merge::merge_nested_properties;
pub use nested::{DESCRIPTION_DATE_FORMAT, NestedPropertyBuilder, generated_description};
pub use types::ElementType;
