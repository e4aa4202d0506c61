//! Checkbox field helper.

use crate::field::{FieldDescriptor, FieldKind};

/// Creates a checkbox whose label sits next to the box.
pub fn checkbox_field(name: &str, label: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Checkbox)
}
