//! Nested property merging
//!
//! Reconciles a freshly built nested property tree against an existing one.
//! Existing properties are never retyped: only unseen names are added, and
//! only properties that are nested on both sides are descended into.

use crate::models::NestedProperty;

/// Merge an incoming nested property tree into an existing one
///
/// Returns the merged tree and whether it differs from `existing`.
/// Identity is by name. The inputs are left untouched.
pub fn merge_nested_properties(
    existing: &[NestedProperty],
    incoming: &[NestedProperty],
) -> (Vec<NestedProperty>, bool) {
    let mut merged = existing.to_vec();
    let mut changed = false;

    for property in incoming {
        match merged.iter_mut().find(|p| p.name == property.name) {
            None => {
                merged.push(property.clone());
                changed = true;
            }
            Some(current) if current.is_nested() && property.is_nested() => {
                let (children, children_changed) = merge_nested_properties(
                    &current.nested_properties,
                    &property.nested_properties,
                );
                if children_changed {
                    current.nested_properties = children;
                    changed = true;
                }
            }
            Some(_) => {}
        }
    }

    (merged, changed)
}
