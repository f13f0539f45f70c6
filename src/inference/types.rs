//! Intermediate types used while classifying sequences

use crate::error::{AutoSchemaError, AutoSchemaResult};
use crate::models::DataType;

/// Classification of a single sequence element
///
/// An element either contributes an array type or resolves to the class of
/// a referenced object, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementType {
    /// Array-family type the whole sequence would get
    Array(DataType),
    /// Target class of a cross-reference
    Reference(String),
}

impl ElementType {
    /// Name used in type conflict messages
    pub fn type_name(&self) -> String {
        match self {
            ElementType::Array(dt) => dt.element_type().to_string(),
            ElementType::Reference(_) => "reference".to_string(),
        }
    }

    /// Check if this element is a reference
    pub fn is_reference(&self) -> bool {
        matches!(self, ElementType::Reference(_))
    }
}

/// Accumulates element classifications into the type of a sequence
///
/// The first element fixes whether the sequence holds references. Every
/// later element must agree with that mode and, outside references, with
/// the first element's array type.
#[derive(Debug, Default)]
pub(crate) struct SequenceType {
    first: Option<ElementType>,
    references: Vec<DataType>,
}

impl SequenceType {
    pub(crate) fn push(&mut self, index: usize, element: ElementType) -> AutoSchemaResult<()> {
        if let Some(first) = &self.first {
            let conflict = match (first, &element) {
                (ElementType::Array(expected), ElementType::Array(actual)) => expected != actual,
                (first, element) => first.is_reference() != element.is_reference(),
            };
            if conflict {
                return Err(AutoSchemaError::TypeConflict {
                    index,
                    expected: first.type_name(),
                    actual: element.type_name(),
                });
            }
        }

        if let ElementType::Reference(class) = &element {
            self.references
                .push(DataType::CrossReference(class.clone()));
        }
        if self.first.is_none() {
            self.first = Some(element);
        }
        Ok(())
    }

    pub(crate) fn finish(self) -> Vec<DataType> {
        match self.first {
            Some(ElementType::Array(dt)) => vec![dt],
            Some(ElementType::Reference(_)) => self.references,
            None => vec![DataType::TextArray],
        }
    }
}
