//! Auto-schema - schema inference for loosely-typed object payloads
//!
//! Provides:
//! - Type inference over untyped values (scalars, arrays, geo coordinates,
//!   phone numbers, cross-references)
//! - Nested property tree building and merging
//! - An auto-schema manager deciding create-class vs add-property vs
//!   merge-property against a remote schema store

pub mod error;
pub mod inference;
pub mod manager;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use error::{AutoSchemaError, AutoSchemaResult};
pub use inference::{AutoSchemaConfig, AutoSchemaConfigBuilder, ElementType, TypeInferrer};
pub use manager::{AutoSchemaManager, AutoSchemaOutcome, SchemaChange, plan_changes};
pub use store::{
    AdditionalProperties, FoundObject, ObjectLookup, SchemaStore, SelectProperties, StoreError,
};

// Re-export models
pub use models::{
    Class, DataType, NestedProperty, Object, Principal, Property, PropertyMap, PropertyValue,
    Reference, Schema,
};
