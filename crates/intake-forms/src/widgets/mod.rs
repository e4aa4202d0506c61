//! Concrete widgets produced by the field renderer.
//!
//! A [`Widget`] is the rendered, value-bound form of a field. It knows what it
//! displays and can be turned into Bootstrap 5 markup with [`Widget::to_html`].

mod bootstrap;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::field::FieldIcon;
use crate::value::{FieldValue, FileHandle};

/// Country preselected in phone inputs.
pub const DEFAULT_PHONE_COUNTRY: &str = "US";

/// Display format of date pickers.
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// HTML input types used by text inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Email,
    Tel,
    Date,
}

impl InputType {
    /// The `type` attribute value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Date => "date",
        }
    }
}

/// One selectable entry of a select or radio widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOption {
    pub value: String,
    pub label: String,
    pub image: Option<String>,
    pub selected: bool,
}

/// A rendered input bound to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    /// Single-line input (text, email).
    Input {
        input_type: InputType,
        value: String,
        placeholder: Option<String>,
        icon: Option<FieldIcon>,
    },
    /// International phone input.
    Phone {
        value: String,
        placeholder: Option<String>,
        default_country: &'static str,
    },
    /// Date picker.
    DatePicker {
        value: Option<NaiveDate>,
        date_format: &'static str,
    },
    /// Dropdown.
    Select {
        placeholder: Option<String>,
        options: Vec<RenderedOption>,
    },
    /// Checkbox with its own label.
    Checkbox { checked: bool, label: String },
    /// Multi-line input.
    TextArea {
        value: String,
        placeholder: Option<String>,
        rows: usize,
    },
    /// Group of radio buttons.
    RadioGroup { options: Vec<RenderedOption> },
    /// File picker listing the files attached so far.
    FileUpload {
        files: Vec<FileHandle>,
        accept: String,
    },
    /// Opaque markup produced by a custom renderer.
    Markup(String),
}

impl Widget {
    /// The value the widget currently shows.
    pub fn displayed_value(&self) -> FieldValue {
        match self {
            Self::Input { value, .. } | Self::Phone { value, .. } | Self::TextArea { value, .. } => {
                FieldValue::Text(value.clone())
            }
            Self::DatePicker { value, .. } => FieldValue::from(*value),
            Self::Select { options, .. } | Self::RadioGroup { options } => options
                .iter()
                .find(|o| o.selected)
                .map_or(FieldValue::Null, |o| FieldValue::Text(o.value.clone())),
            Self::Checkbox { checked, .. } => FieldValue::Bool(*checked),
            Self::FileUpload { files, .. } => FieldValue::Files(files.clone()),
            Self::Markup(_) => FieldValue::Null,
        }
    }

    /// Options of a select or radio widget, in display order.
    pub fn options(&self) -> &[RenderedOption] {
        match self {
            Self::Select { options, .. } | Self::RadioGroup { options } => options,
            _ => &[],
        }
    }

    /// Short description of the input the widget accepts, used in errors.
    pub(crate) fn accepts(&self) -> &'static str {
        match self {
            Self::Input { .. } | Self::Phone { .. } | Self::TextArea { .. } => "text",
            Self::DatePicker { .. } => "a date",
            Self::Select { .. } | Self::RadioGroup { .. } => "an option",
            Self::Checkbox { .. } => "a checked state",
            Self::FileUpload { .. } => "files",
            Self::Markup(_) => "no input",
        }
    }
}

/// Builds the options of a select/radio widget, marking the one matching `value`.
pub fn rendered_options<'a>(
    options: impl IntoIterator<Item = (&'a str, &'a str, Option<&'a str>)>,
    value: &FieldValue,
) -> Vec<RenderedOption> {
    let current = value.as_text();
    options
        .into_iter()
        .map(|(opt_value, label, image)| RenderedOption {
            value: opt_value.to_string(),
            label: label.to_string(),
            image: image.map(str::to_string),
            selected: current == Some(opt_value),
        })
        .collect()
}

/// Attributes that can be applied to a widget.
#[derive(Debug, Clone, Default)]
pub struct WidgetAttrs {
    /// HTML attributes, rendered in key order.
    pub attrs: BTreeMap<String, String>,
}

impl WidgetAttrs {
    /// Creates new empty widget attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Gets an attribute.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.attrs.get(key)
    }

    /// Renders the attributes other than `class` and `id`, each with a leading space.
    pub fn extra_html(&self) -> String {
        self.attrs
            .iter()
            .filter(|(k, _)| k.as_str() != "class" && k.as_str() != "id")
            .map(|(k, v)| format!(r#" {k}="{}""#, html_escape(v)))
            .collect()
    }

    /// Builder method to set an attribute.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("\"test\""), "&quot;test&quot;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }

    #[test]
    fn test_widget_attrs_extra_html_skips_class_and_id() {
        let attrs = WidgetAttrs::new()
            .with("class", "is-invalid")
            .with("id", "id_name")
            .with("required", "required");
        assert_eq!(attrs.extra_html(), r#" required="required""#);
    }

    #[test]
    fn test_displayed_value_of_select() {
        let options = rendered_options(
            [("A", "A", None), ("B", "B", None)],
            &FieldValue::from("B"),
        );
        let widget = Widget::Select {
            placeholder: None,
            options,
        };
        assert_eq!(widget.displayed_value(), FieldValue::from("B"));
    }

    #[test]
    fn test_markup_displays_nothing() {
        assert_eq!(
            Widget::Markup("<p>hi</p>".into()).displayed_value(),
            FieldValue::Null
        );
    }
}
