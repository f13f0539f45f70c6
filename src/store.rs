//! Collaborator contracts
//!
//! Defines the traits through which the manager talks to the outside world:
//! - SchemaStore: holds classes and properties and applies mutations
//! - ObjectLookup: resolves an object id to its class for class-less beacons
//!
//! Both are remote authorities with their own consistency guarantees; the
//! manager only decides which mutation to request.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Class, Principal, Property, Schema};

/// Error type for collaborator operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Unavailable: {0}")]
    Unavailable(String),
    #[error("Store backend error: {0}")]
    BackendError(String),
}

/// Trait for the schema store
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Get a snapshot of the current schema
    async fn get_schema(&self, principal: Option<&Principal>) -> Result<Schema, StoreError>;

    /// Create a class
    async fn add_class(&self, principal: Option<&Principal>, class: Class)
    -> Result<(), StoreError>;

    /// Add a property to an existing class
    async fn add_class_property(
        &self,
        principal: Option<&Principal>,
        class_name: &str,
        property: Property,
    ) -> Result<(), StoreError>;

    /// Replace the nested properties of an existing object property
    async fn merge_class_object_property(
        &self,
        principal: Option<&Principal>,
        class_name: &str,
        property: Property,
    ) -> Result<(), StoreError>;
}

/// Properties to select when looking up an object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectProperties(pub Vec<String>);

/// Additional (non-property) fields to return with an object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdditionalProperties {
    pub vector: bool,
    pub creation_time: bool,
    pub last_update_time: bool,
}

/// An object found by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundObject {
    pub id: Uuid,
    pub class_name: String,
}

/// Trait for looking up objects by id
#[async_trait]
pub trait ObjectLookup: Send + Sync {
    /// Find an object by id, returning `None` when it does not exist
    async fn object_by_id(
        &self,
        id: Uuid,
        selection: &SelectProperties,
        additional: &AdditionalProperties,
        tenant: Option<&str>,
    ) -> Result<Option<FoundObject>, StoreError>;
}
