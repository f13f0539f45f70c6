//! Auto-schema manager
//!
//! Decides, for one submitted object, whether its class has to be created,
//! which properties have to be added and which nested object properties have
//! to be extended, then requests those mutations from the schema store.
//!
//! Invocations are serialized by one lock per manager, held across the
//! whole snapshot/decide/mutate sequence including the awaited store calls.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{AutoSchemaError, AutoSchemaResult, MISSING_CLASS, MISSING_OBJECT};
use crate::inference::{
    AutoSchemaConfig, NestedPropertyBuilder, TypeInferrer, generated_description,
    merge_nested_properties,
};
use crate::models::{
    Class, Object, Principal, Property, lowercase_first_letter, uppercase_class_name,
};
use crate::store::{ObjectLookup, SchemaStore, StoreError};

/// A mutation to request from the schema store
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaChange {
    /// Create the class with its inferred properties
    CreateClass(Class),
    /// Add a property the class does not have yet
    AddProperty(Property),
    /// Replace an object property's children with the merged tree
    MergeProperty(Property),
}

/// What an auto-schema invocation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoSchemaOutcome {
    /// The feature is turned off; nothing was inspected
    Disabled,
    /// The class was created with the listed properties
    ClassCreated {
        class: String,
        properties: Vec<String>,
    },
    /// The class existed; lists the properties added and merged
    ClassUpdated {
        class: String,
        added: Vec<String>,
        merged: Vec<String>,
    },
}

/// Plan the mutations bringing a class in line with inferred properties
///
/// Without an existing class the plan is a single class creation. Otherwise
/// unseen property names become additions, and properties that are nested
/// in the existing class become merges when merging changes anything. All
/// additions precede all merges. Property names are compared after
/// lowercasing their first letter.
pub fn plan_changes(
    class_name: &str,
    existing: Option<&Class>,
    properties: Vec<Property>,
    now: DateTime<Utc>,
) -> Vec<SchemaChange> {
    let Some(existing) = existing else {
        let mut class = Class::new(class_name).with_properties(properties);
        class.description = generated_description("class", now);
        return vec![SchemaChange::CreateClass(class)];
    };

    let mut additions = Vec::new();
    let mut merges = Vec::new();
    for mut property in properties {
        let name = lowercase_first_letter(&property.name);
        match existing.property(&name) {
            None => additions.push(SchemaChange::AddProperty(property)),
            Some(current) if current.is_nested() => {
                let (merged, changed) = merge_nested_properties(
                    &current.nested_properties,
                    &property.nested_properties,
                );
                if changed {
                    property.nested_properties = merged;
                    merges.push(SchemaChange::MergeProperty(property));
                }
            }
            // Declared types are never changed
            Some(_) => {}
        }
    }

    additions.extend(merges);
    additions
}

/// Serializes auto-schema decisions against one schema store
pub struct AutoSchemaManager {
    lock: Mutex<()>,
    schema_store: Arc<dyn SchemaStore>,
    inferrer: TypeInferrer,
}

impl AutoSchemaManager {
    /// Create a manager, rejecting an invalid configuration
    ///
    /// Without an object lookup, beacons that do not name their class are
    /// typed as plain object arrays.
    pub fn new(
        schema_store: Arc<dyn SchemaStore>,
        objects: Option<Arc<dyn ObjectLookup>>,
        config: AutoSchemaConfig,
    ) -> AutoSchemaResult<Self> {
        config.validate()?;

        let mut inferrer = TypeInferrer::new(config);
        if let Some(objects) = objects {
            inferrer = inferrer.with_object_lookup(objects);
        }

        Ok(Self {
            lock: Mutex::new(()),
            schema_store,
            inferrer,
        })
    }

    /// Get the configuration the manager was validated with
    pub fn config(&self) -> &AutoSchemaConfig {
        self.inferrer.config()
    }

    /// Bring the schema in line with a submitted object
    ///
    /// The object's class name is normalized in place. With
    /// `allow_create_class` unset, an unknown class is an error and nothing
    /// is requested from the store. Mutations are requested one by one; the
    /// first failure aborts the rest and earlier ones stay applied.
    pub async fn auto_schema(
        &self,
        principal: Option<&Principal>,
        object: Option<&mut Object>,
        allow_create_class: bool,
    ) -> AutoSchemaResult<AutoSchemaOutcome> {
        if !self.config().enabled {
            return Ok(AutoSchemaOutcome::Disabled);
        }

        let _guard = self.lock.lock().await;

        let object =
            object.ok_or_else(|| AutoSchemaError::Validation(MISSING_OBJECT.to_string()))?;
        if object.class.is_empty() {
            return Err(AutoSchemaError::Validation(MISSING_CLASS.to_string()));
        }
        object.class = uppercase_class_name(&object.class);
        let class_name = object.class.as_str();

        let schema = self
            .schema_store
            .get_schema(principal)
            .await
            .map_err(|e| AutoSchemaError::store("get schema", class_name, e))?;
        let existing = schema.get_class(class_name);
        if existing.is_none() && !allow_create_class {
            return Err(AutoSchemaError::ClassNotAllowed {
                class: class_name.to_string(),
            });
        }

        let now = Utc::now();
        let properties = self.infer_properties(object, now).await?;
        let changes = plan_changes(class_name, existing, properties, now);
        self.apply_changes(principal, class_name, changes).await
    }

    /// Infer one property per top-level value of the object
    async fn infer_properties(
        &self,
        object: &Object,
        now: DateTime<Utc>,
    ) -> AutoSchemaResult<Vec<Property>> {
        let builder = NestedPropertyBuilder::new(&self.inferrer, now);
        let mut properties = Vec::with_capacity(object.properties.len());

        for (name, value) in &object.properties {
            let wrap = |e: AutoSchemaError| AutoSchemaError::property(&object.class, name, e);

            let data_type = self
                .inferrer
                .determine_type(value, false)
                .await
                .map_err(wrap)?;
            let children = builder.build_children(&data_type, value).map_err(wrap)?;

            properties.push(
                Property::new(name, data_type)
                    .with_description(generated_description("property", now))
                    .with_nested_properties(children),
            );
        }

        Ok(properties)
    }

    async fn apply_changes(
        &self,
        principal: Option<&Principal>,
        class_name: &str,
        changes: Vec<SchemaChange>,
    ) -> AutoSchemaResult<AutoSchemaOutcome> {
        let mut created = None;
        let mut added = Vec::new();
        let mut merged = Vec::new();

        for change in changes {
            match change {
                SchemaChange::CreateClass(class) => {
                    debug!(auto_schema = "createClass", "create class {}", class_name);
                    let properties = class.properties.iter().map(|p| p.name.clone()).collect();
                    self.schema_store
                        .add_class(principal, class)
                        .await
                        .map_err(|e| request_failed("add class", class_name.to_string(), e))?;
                    created = Some(properties);
                }
                SchemaChange::AddProperty(property) => {
                    debug!(
                        auto_schema = "updateClass",
                        "update class {} add property {}", class_name, property.name
                    );
                    let target = format!("{}.{}", class_name, property.name);
                    let name = property.name.clone();
                    self.schema_store
                        .add_class_property(principal, class_name, property)
                        .await
                        .map_err(|e| request_failed("add property", target, e))?;
                    added.push(name);
                }
                SchemaChange::MergeProperty(property) => {
                    debug!(
                        auto_schema = "updateClass",
                        "update class {} merge object property {}", class_name, property.name
                    );
                    let target = format!("{}.{}", class_name, property.name);
                    let name = property.name.clone();
                    self.schema_store
                        .merge_class_object_property(principal, class_name, property)
                        .await
                        .map_err(|e| request_failed("merge property", target, e))?;
                    merged.push(name);
                }
            }
        }

        let class = class_name.to_string();
        Ok(match created {
            Some(properties) => AutoSchemaOutcome::ClassCreated { class, properties },
            None => AutoSchemaOutcome::ClassUpdated {
                class,
                added,
                merged,
            },
        })
    }
}

fn request_failed(operation: &'static str, target: String, source: StoreError) -> AutoSchemaError {
    warn!(auto_schema = operation, "{} '{}' failed: {}", operation, target, source);
    AutoSchemaError::store(operation, target, source)
}
