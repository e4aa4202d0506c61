//! Text-like field helpers.

use crate::field::{FieldDescriptor, FieldKind};

/// Creates a single-line text field.
pub fn text_field(name: &str, label: &str, placeholder: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Text).placeholder(placeholder)
}

/// Creates an email field with the envelope icon.
pub fn email_field(name: &str, label: &str, placeholder: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::Email)
        .placeholder(placeholder)
        .icon("/assets/icons/email.svg", "email")
}

/// Creates an international phone number field.
pub fn phone_field(name: &str, label: &str, placeholder: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::PhoneNumber).placeholder(placeholder)
}

/// Creates a multi-line text field.
pub fn textarea_field(name: &str, label: &str, placeholder: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::TextArea).placeholder(placeholder)
}

/// Creates a date picker.
pub fn date_field(name: &str, label: &str) -> FieldDescriptor {
    FieldDescriptor::new(name, label, FieldKind::DatePicker)
}
