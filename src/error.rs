//! Error types for auto-schema operations
//!
//! Inference failures carry enough context (element index, nested property
//! name, property and class name) to locate the offending value inside the
//! submitted object. Failures returned by the schema store are wrapped with
//! the class or property they concerned and are never translated.

use thiserror::Error;

use crate::store::StoreError;

/// Message used when no object was handed to the manager
pub const MISSING_OBJECT: &str = "no object present";

/// Message used when the object carries an empty class name
pub const MISSING_CLASS: &str = "the given class is empty";

/// Errors that can occur while inferring or applying a schema
#[derive(Error, Debug)]
pub enum AutoSchemaError {
    /// The object handed in cannot be processed at all
    #[error("Validation error: {0}")]
    Validation(String),

    /// The class does not exist and the caller did not allow creating it
    #[error("given class does not exist: {class}")]
    ClassNotAllowed { class: String },

    /// Sequence elements disagree on their type or on being references
    #[error("element [{index}]: mismatched data type - '{expected}' expected, got '{actual}'")]
    TypeConflict {
        index: usize,
        expected: String,
        actual: String,
    },

    /// A value has a shape no detector recognizes
    #[error("unrecognized data type of value '{value}' - one of '{}' expected", .allowed.join("', '"))]
    UnrecognizedType { value: String, allowed: Vec<String> },

    /// Failure while classifying one element of a sequence
    #[error("element [{index}]: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<AutoSchemaError>,
    },

    /// Failure while building a nested property
    #[error("nested property '{name}': {source}")]
    NestedProperty {
        name: String,
        #[source]
        source: Box<AutoSchemaError>,
    },

    /// Failure while inferring a top-level property
    #[error("property '{name}' on class '{class}': {source}")]
    Property {
        class: String,
        name: String,
        #[source]
        source: Box<AutoSchemaError>,
    },

    /// A schema store request failed
    #[error("{operation} '{target}' failed: {source}")]
    Store {
        operation: &'static str,
        target: String,
        #[source]
        source: StoreError,
    },

    /// Invalid auto-schema configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for auto-schema operations
pub type AutoSchemaResult<T> = Result<T, AutoSchemaError>;

impl AutoSchemaError {
    /// Wrap an error with the index of the sequence element it came from
    pub fn element(index: usize, source: AutoSchemaError) -> Self {
        Self::Element {
            index,
            source: Box::new(source),
        }
    }

    /// Wrap an error with the nested property it came from
    pub fn nested_property(name: impl Into<String>, source: AutoSchemaError) -> Self {
        Self::NestedProperty {
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Wrap an error with the top-level property and class it came from
    pub fn property(
        class: impl Into<String>,
        name: impl Into<String>,
        source: AutoSchemaError,
    ) -> Self {
        Self::Property {
            class: class.into(),
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a schema store failure
    pub fn store(operation: &'static str, target: impl Into<String>, source: StoreError) -> Self {
        Self::Store {
            operation,
            target: target.into(),
            source,
        }
    }

    /// Strip the context wrappers and return the underlying error
    pub fn innermost(&self) -> &AutoSchemaError {
        match self {
            Self::Element { source, .. }
            | Self::NestedProperty { source, .. }
            | Self::Property { source, .. } => source.innermost(),
            other => other,
        }
    }

    /// Check if the underlying error is a sequence type conflict
    pub fn is_type_conflict(&self) -> bool {
        matches!(self.innermost(), Self::TypeConflict { .. })
    }
}
