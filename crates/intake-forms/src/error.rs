//! Error types for forms.

use std::collections::BTreeMap;

use thiserror::Error;

/// Form-specific errors.
#[derive(Debug, Error)]
pub enum FormError {
    /// No field with this name is registered on the form.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A select or radio widget was given a value that is not one of its options.
    #[error("field {field} has no option {value:?}")]
    UnknownOption { field: String, value: String },

    /// The widget cannot take this kind of input (e.g. ticking a text box).
    #[error("field {field} does not accept {expected}")]
    WidgetMismatch {
        field: String,
        expected: &'static str,
    },

    /// A field descriptor is malformed.
    #[error("invalid field descriptor {field}: {message}")]
    InvalidDescriptor { field: String, message: String },

    /// A route pattern could not be parsed or reversed.
    #[error("invalid route pattern: {0}")]
    InvalidRoute(String),

    /// The form was unmounted; its state can no longer change.
    #[error("form has been unmounted")]
    Unmounted,

    /// Submitted data could not be interpreted for a field.
    #[error("failed to parse value for field {field}: {message}")]
    ParseError { field: String, message: String },
}

/// Validation errors keyed by field name, one message per field.
///
/// A field without an entry has no error; clearing an error removes the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the error for a field, replacing any previous message.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }

    /// Clears the error for a field.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.errors.remove(field)
    }

    /// Returns the error for a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Returns whether the field has an error.
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Keeps only the errors whose field satisfies the predicate.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.errors.retain(|field, _| keep(field));
    }

    /// Iterates over `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
