//! Recording collaborators for manager tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use auto_schema::{
    AdditionalProperties, Class, FoundObject, ObjectLookup, Principal, Property, Schema,
    SchemaStore, SelectProperties, StoreError,
};
use uuid::Uuid;

/// A request received by the recording store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    GetSchema,
    AddClass(Class),
    AddProperty { class: String, property: Property },
    MergeProperty { class: String, property: Property },
}

impl StoreCall {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, StoreCall::GetSchema)
    }
}

/// In-memory schema store that applies and records every request
#[derive(Default)]
pub struct RecordingStore {
    schema: Mutex<Schema>,
    calls: Mutex<Vec<StoreCall>>,
    fail_property: Option<String>,
    fail_get_schema: bool,
    read_delay: Option<Duration>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classes(classes: Vec<Class>) -> Self {
        Self {
            schema: Mutex::new(Schema::new(classes)),
            ..Default::default()
        }
    }

    /// Reject add/merge requests for the named property
    pub fn failing_on(mut self, property: &str) -> Self {
        self.fail_property = Some(property.to_string());
        self
    }

    pub fn failing_get_schema(mut self) -> Self {
        self.fail_get_schema = true;
        self
    }

    /// Sleep inside every schema read so concurrent callers interleave
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<StoreCall> {
        self.calls().into_iter().filter(StoreCall::is_mutation).collect()
    }

    pub fn schema(&self) -> Schema {
        self.schema.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_property(&self, property: &Property) -> Result<(), StoreError> {
        match &self.fail_property {
            Some(name) if *name == property.name => Err(StoreError::BackendError(format!(
                "rejected property {name}"
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SchemaStore for RecordingStore {
    async fn get_schema(&self, _principal: Option<&Principal>) -> Result<Schema, StoreError> {
        self.record(StoreCall::GetSchema);
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_get_schema {
            return Err(StoreError::Unavailable("schema store offline".to_string()));
        }
        Ok(self.schema())
    }

    async fn add_class(
        &self,
        _principal: Option<&Principal>,
        class: Class,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::AddClass(class.clone()));
        let mut schema = self.schema.lock().unwrap();
        if schema.get_class(&class.name).is_some() {
            return Err(StoreError::Conflict(format!("class {} exists", class.name)));
        }
        schema.classes.push(class);
        Ok(())
    }

    async fn add_class_property(
        &self,
        _principal: Option<&Principal>,
        class_name: &str,
        property: Property,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::AddProperty {
            class: class_name.to_string(),
            property: property.clone(),
        });
        self.check_property(&property)?;

        let mut schema = self.schema.lock().unwrap();
        let class = schema
            .classes
            .iter_mut()
            .find(|c| c.name == class_name)
            .ok_or_else(|| StoreError::NotFound(class_name.to_string()))?;
        class.properties.push(property);
        Ok(())
    }

    async fn merge_class_object_property(
        &self,
        _principal: Option<&Principal>,
        class_name: &str,
        property: Property,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::MergeProperty {
            class: class_name.to_string(),
            property: property.clone(),
        });
        self.check_property(&property)?;

        let mut schema = self.schema.lock().unwrap();
        let existing = schema
            .classes
            .iter_mut()
            .find(|c| c.name == class_name)
            .and_then(|c| c.properties.iter_mut().find(|p| p.name == property.name))
            .ok_or_else(|| StoreError::NotFound(format!("{class_name}.{}", property.name)))?;
        existing.nested_properties = property.nested_properties;
        Ok(())
    }
}

/// Object lookup backed by a fixed id-to-class table
#[derive(Default)]
pub struct StaticLookup {
    objects: HashMap<Uuid, String>,
}

impl StaticLookup {
    pub fn with_object(mut self, id: Uuid, class: &str) -> Self {
        self.objects.insert(id, class.to_string());
        self
    }
}

#[async_trait]
impl ObjectLookup for StaticLookup {
    async fn object_by_id(
        &self,
        id: Uuid,
        _selection: &SelectProperties,
        _additional: &AdditionalProperties,
        _tenant: Option<&str>,
    ) -> Result<Option<FoundObject>, StoreError> {
        Ok(self.objects.get(&id).map(|class| FoundObject {
            id,
            class_name: class.clone(),
        }))
    }
}
