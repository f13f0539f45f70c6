//! Type inference for property values

use std::sync::Arc;

use tracing::debug;

use super::config::AutoSchemaConfig;
use super::formats::{
    ObjectFormat, StringFormat, beacon_reference, detect_object_format, detect_string_format,
};
use super::types::{ElementType, SequenceType};
use crate::error::{AutoSchemaError, AutoSchemaResult};
use crate::models::{DataType, PropertyValue, Reference};
use crate::store::{AdditionalProperties, ObjectLookup, SelectProperties};

/// Outcome of classifying an element before reference resolution
enum Classified {
    Element(ElementType),
    /// Reference whose beacon does not name the target class
    Unresolved(Reference),
}

/// Type inference engine
///
/// Maps untyped values to data types under the configured default kinds.
/// Geo coordinates, phone numbers and cross-references are only detected
/// outside nested context.
pub struct TypeInferrer {
    config: AutoSchemaConfig,
    objects: Option<Arc<dyn ObjectLookup>>,
}

impl TypeInferrer {
    /// Create an inferrer without object lookup
    ///
    /// Beacons that do not name their class are then treated as plain
    /// objects.
    pub fn new(config: AutoSchemaConfig) -> Self {
        Self {
            config,
            objects: None,
        }
    }

    /// Resolve class-less beacons through the given object lookup
    pub fn with_object_lookup(mut self, objects: Arc<dyn ObjectLookup>) -> Self {
        self.objects = Some(objects);
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &AutoSchemaConfig {
        &self.config
    }

    /// Determine the data type of a value
    ///
    /// A sequence yields one array type, or one reference type per element
    /// when every element is a reference.
    pub async fn determine_type(
        &self,
        value: &PropertyValue,
        nested: bool,
    ) -> AutoSchemaResult<Vec<DataType>> {
        let PropertyValue::Array(items) = value else {
            return Ok(self.single_value_type(value, nested).unwrap_or_default());
        };

        let mut sequence = SequenceType::default();
        for (index, item) in items.iter().enumerate() {
            let element = self
                .determine_array_element_type(item, nested)
                .await
                .map_err(|e| AutoSchemaError::element(index, e))?;
            sequence.push(index, element)?;
        }
        Ok(sequence.finish())
    }

    /// Determine the data type of a value inside a nested property
    ///
    /// Nested context never resolves references, so no lookup is needed.
    pub fn determine_nested_type(&self, value: &PropertyValue) -> AutoSchemaResult<Vec<DataType>> {
        let PropertyValue::Array(items) = value else {
            return Ok(self.single_value_type(value, true).unwrap_or_default());
        };

        let mut sequence = SequenceType::default();
        for (index, item) in items.iter().enumerate() {
            let element = match self
                .classify_element(item, true)
                .map_err(|e| AutoSchemaError::element(index, e))?
            {
                Classified::Element(element) => element,
                Classified::Unresolved(_) => ElementType::Array(DataType::ObjectArray),
            };
            sequence.push(index, element)?;
        }
        Ok(sequence.finish())
    }

    /// Determine the contribution of one sequence element
    pub async fn determine_array_element_type(
        &self,
        value: &PropertyValue,
        nested: bool,
    ) -> AutoSchemaResult<ElementType> {
        match self.classify_element(value, nested)? {
            Classified::Element(element) => Ok(element),
            Classified::Unresolved(reference) => Ok(match self.resolve_class(&reference).await {
                Some(class) => ElementType::Reference(class),
                None => ElementType::Array(DataType::ObjectArray),
            }),
        }
    }

    /// Type of a value that is not a sequence; `None` for sequences
    fn single_value_type(&self, value: &PropertyValue, nested: bool) -> Option<Vec<DataType>> {
        let dt = match value {
            PropertyValue::String(s) => match detect_string_format(s) {
                StringFormat::Date => self.config.default_date.clone(),
                StringFormat::Uuid => DataType::Uuid,
                StringFormat::Plain => self
                    .config
                    .default_string
                    .clone()
                    .unwrap_or(DataType::Text),
            },
            PropertyValue::Number(_) => self.config.default_number.clone(),
            PropertyValue::Float(_) => DataType::Number,
            PropertyValue::Int(_) => DataType::Int,
            PropertyValue::Bool(_) => DataType::Boolean,
            PropertyValue::Object(map) if !nested => match detect_object_format(map) {
                ObjectFormat::GeoCoordinates => DataType::GeoCoordinates,
                ObjectFormat::PhoneNumber => DataType::PhoneNumber,
                ObjectFormat::Plain => DataType::Object,
            },
            PropertyValue::Object(_) => DataType::Object,
            // Missing values must not block class creation
            PropertyValue::Null => DataType::Text,
            PropertyValue::Array(_) => return None,
        };
        Some(vec![dt])
    }

    fn classify_element(&self, value: &PropertyValue, nested: bool) -> AutoSchemaResult<Classified> {
        let dt = match value {
            PropertyValue::String(s) => match detect_string_format(s) {
                StringFormat::Date => DataType::DateArray,
                StringFormat::Uuid => DataType::UuidArray,
                StringFormat::Plain if self.config.default_string == Some(DataType::String) => {
                    DataType::StringArray
                }
                StringFormat::Plain => DataType::TextArray,
            },
            PropertyValue::Number(_) if self.config.default_number == DataType::Int => {
                DataType::IntArray
            }
            PropertyValue::Number(_) | PropertyValue::Float(_) => DataType::NumberArray,
            PropertyValue::Int(_) => DataType::IntArray,
            PropertyValue::Bool(_) => DataType::BooleanArray,
            PropertyValue::Object(map) if !nested => match beacon_reference(map) {
                Some(Reference {
                    class: Some(class), ..
                }) => return Ok(Classified::Element(ElementType::Reference(class))),
                Some(reference) => return Ok(Classified::Unresolved(reference)),
                None => DataType::ObjectArray,
            },
            PropertyValue::Object(_) => DataType::ObjectArray,
            PropertyValue::Null | PropertyValue::Array(_) => {
                return Err(AutoSchemaError::UnrecognizedType {
                    value: value.to_string(),
                    allowed: DataType::element_type_names(nested),
                });
            }
        };
        Ok(Classified::Element(ElementType::Array(dt)))
    }

    /// Find the class of a referenced object
    ///
    /// Lookup failures are not errors: the value is then not a reference.
    async fn resolve_class(&self, reference: &Reference) -> Option<String> {
        let objects = self.objects.as_ref()?;
        match objects
            .object_by_id(
                reference.target_id,
                &SelectProperties::default(),
                &AdditionalProperties::default(),
                None,
            )
            .await
        {
            Ok(Some(found)) => Some(found.class_name),
            Ok(None) => {
                debug!(target_id = %reference.target_id, "Referenced object not found");
                None
            }
            Err(e) => {
                debug!(target_id = %reference.target_id, error = %e, "Reference lookup failed");
                None
            }
        }
    }
}
