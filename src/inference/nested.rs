//! Nested property tree building
//!
//! Turns a mapping, or a sequence of mappings, into a tree of nested
//! properties. Every level is typed by the inferrer in nested context, so
//! cross-references, geo coordinates and phone numbers are never detected
//! below the top level.
//!
//! Heterogeneous sequence elements collapse into a single superset tree:
//! the first element seeds the properties, later elements add unseen keys
//! and extend nested children of keys already seen.

use chrono::{DateTime, Utc};

use super::inferrer::TypeInferrer;
use super::merge::merge_nested_properties;
use crate::error::{AutoSchemaError, AutoSchemaResult};
use crate::models::{DataType, NestedProperty, PropertyMap, PropertyValue, as_nested};

/// Format of timestamps in generated descriptions (`Mon Jan  2 15:04:05 2006`)
pub const DESCRIPTION_DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Description attached to schema entities created by auto-schema
pub fn generated_description(subject: &str, now: DateTime<Utc>) -> String {
    format!(
        "This {subject} was generated by the auto-schema feature on {}",
        now.format(DESCRIPTION_DATE_FORMAT)
    )
}

/// Builds nested property trees from values
pub struct NestedPropertyBuilder<'a> {
    inferrer: &'a TypeInferrer,
    now: DateTime<Utc>,
}

impl<'a> NestedPropertyBuilder<'a> {
    /// Create a builder stamping descriptions with `now`
    pub fn new(inferrer: &'a TypeInferrer, now: DateTime<Utc>) -> Self {
        Self { inferrer, now }
    }

    /// Build the children of a property of the given type
    ///
    /// Only object and object array types have children; everything else
    /// yields an empty list.
    pub fn build_children(
        &self,
        data_type: &[DataType],
        value: &PropertyValue,
    ) -> AutoSchemaResult<Vec<NestedProperty>> {
        match (as_nested(data_type), value) {
            (Some(DataType::Object), PropertyValue::Object(map)) => {
                self.build_nested_properties(map)
            }
            (Some(DataType::ObjectArray), PropertyValue::Array(items)) => {
                self.build_nested_properties_of_array(items)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Build one nested property per key of a mapping
    pub fn build_nested_properties(
        &self,
        values: &PropertyMap,
    ) -> AutoSchemaResult<Vec<NestedProperty>> {
        values
            .iter()
            .map(|(name, value)| {
                self.build_nested_property(name, value)
                    .map_err(|e| AutoSchemaError::nested_property(name.as_str(), e))
            })
            .collect()
    }

    /// Build a single nested property, recursing into its children
    pub fn build_nested_property(
        &self,
        name: &str,
        value: &PropertyValue,
    ) -> AutoSchemaResult<NestedProperty> {
        let data_type = self.inferrer.determine_nested_type(value)?;
        let children = self.build_children(&data_type, value)?;

        let mut property = NestedProperty::new(name, data_type).with_nested_properties(children);
        property.description = generated_description("nested property", self.now);
        Ok(property)
    }

    /// Build a superset tree describing every mapping of a sequence
    pub fn build_nested_properties_of_array(
        &self,
        values: &[PropertyValue],
    ) -> AutoSchemaResult<Vec<NestedProperty>> {
        let Some((first, rest)) = values.split_first() else {
            return Ok(Vec::new());
        };

        let mut properties = self
            .build_nested_properties(element_map(first)?)
            .map_err(|e| AutoSchemaError::element(0, e))?;

        for (offset, value) in rest.iter().enumerate() {
            let index = offset + 1;
            let map = element_map(value).map_err(|e| AutoSchemaError::element(index, e))?;
            self.extend_with_element(&mut properties, map)
                .map_err(|e| AutoSchemaError::element(index, e))?;
        }

        Ok(properties)
    }

    fn extend_with_element(
        &self,
        properties: &mut Vec<NestedProperty>,
        values: &PropertyMap,
    ) -> AutoSchemaResult<()> {
        for (name, value) in values {
            let position = properties.iter().position(|p| &p.name == name);
            match position {
                None => {
                    let property = self
                        .build_nested_property(name, value)
                        .map_err(|e| AutoSchemaError::nested_property(name.as_str(), e))?;
                    properties.push(property);
                }
                Some(i) if properties[i].is_nested() => {
                    let incoming = self
                        .build_nested_property(name, value)
                        .map_err(|e| AutoSchemaError::nested_property(name.as_str(), e))?;
                    let (children, changed) = merge_nested_properties(
                        &properties[i].nested_properties,
                        &incoming.nested_properties,
                    );
                    if changed {
                        properties[i].nested_properties = children;
                    }
                }
                // First inferred type wins
                Some(_) => {}
            }
        }
        Ok(())
    }
}

fn element_map(value: &PropertyValue) -> AutoSchemaResult<&PropertyMap> {
    value.as_object().ok_or_else(|| AutoSchemaError::UnrecognizedType {
        value: value.to_string(),
        allowed: vec![DataType::Object.to_string()],
    })
}
