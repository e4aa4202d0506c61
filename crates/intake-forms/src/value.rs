//! Field values held in form state.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Current values of a form, keyed by field name.
pub type FormValues = BTreeMap<String, FieldValue>;

/// An uploaded file as seen by the form: metadata only, never the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    /// File name as picked by the user.
    pub name: String,
    /// MIME type reported by the browser.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileHandle {
    /// Creates a new file handle.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}

/// The value of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value.
    #[default]
    Null,
    /// Checkbox state.
    Bool(bool),
    /// Free text, phone numbers, emails and selected option values.
    Text(String),
    /// Files attached through an upload widget.
    Files(Vec<FileHandle>),
    /// A calendar date.
    Date(NaiveDate),
}

impl FieldValue {
    /// Returns the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a checkbox value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the date, if this is a date value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the attached files, if this is a file value.
    pub fn as_files(&self) -> Option<&[FileHandle]> {
        match self {
            Self::Files(files) => Some(files),
            _ => None,
        }
    }

    /// Whether the value counts as "not provided" for required checks.
    ///
    /// `Bool(false)` is a provided value; consent checks use a dedicated rule.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Files(files) => files.is_empty(),
            Self::Bool(_) | Self::Date(_) => false,
        }
    }

    /// Text shown by a text-like widget for this value.
    pub fn to_display_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Text(s) => s.clone(),
            Self::Files(files) => files
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<Vec<FileHandle>> for FieldValue {
    fn from(value: Vec<FileHandle>) -> Self {
        Self::Files(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::from("   ").is_empty());
        assert!(FieldValue::Files(Vec::new()).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
        assert!(!FieldValue::from("x").is_empty());
    }

    #[test]
    fn test_json_shapes() {
        let date = NaiveDate::from_ymd_opt(1990, 4, 12).unwrap();
        assert_eq!(
            serde_json::to_string(&FieldValue::Date(date)).unwrap(),
            "\"1990-04-12\""
        );
        assert_eq!(serde_json::to_string(&FieldValue::Null).unwrap(), "null");

        let parsed: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(parsed, FieldValue::Bool(true));
        let parsed: FieldValue = serde_json::from_str("\"Jane\"").unwrap();
        assert_eq!(parsed, FieldValue::from("Jane"));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FieldValue::from(None::<&str>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some("a")), FieldValue::from("a"));
    }
}
