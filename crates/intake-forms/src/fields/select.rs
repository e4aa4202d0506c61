//! Select field helper.

use crate::field::{FieldDescriptor, FieldKind, SelectOption};

/// Creates a dropdown over `(value, label)` pairs, kept in the given order.
pub fn select_field(
    name: &str,
    label: &str,
    placeholder: &str,
    choices: Vec<(&str, &str)>,
) -> FieldDescriptor {
    let options = choices
        .into_iter()
        .map(|(value, label)| SelectOption::new(value, label))
        .collect();
    FieldDescriptor::new(name, label, FieldKind::Select(options)).placeholder(placeholder)
}
