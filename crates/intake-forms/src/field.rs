//! Field descriptors: the static description of one form input.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{FormError, Result};
use crate::form::ChangeHandle;
use crate::value::{FieldValue, FileHandle};
use crate::widgets::Widget;

/// Caller-supplied renderer for a [`FieldKind::CustomSlot`] field.
///
/// Receives the field's present value and its change callback.
pub type CustomRender = Arc<dyn Fn(&FieldValue, &ChangeHandle) -> Widget + Send + Sync>;

/// One entry of a select field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value stored in the form when this option is chosen.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
    /// Optional image shown next to the label (e.g. a physician's photo).
    pub image: Option<String>,
}

impl SelectOption {
    /// Creates an option with the given value and label.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            image: None,
        }
    }

    /// Creates an option whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            image: None,
        }
    }

    /// Attaches an image.
    #[must_use]
    pub fn image(mut self, src: impl Into<String>) -> Self {
        self.image = Some(src.into());
        self
    }
}

/// The closed set of input kinds.
///
/// Kind-specific data travels with the variant: only `Select` has options and
/// only `CustomSlot` has a renderer.
#[derive(Clone)]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Phone number in international format.
    PhoneNumber,
    /// Email address.
    Email,
    /// Calendar date.
    DatePicker,
    /// Dropdown over a fixed, ordered list of options.
    Select(Vec<SelectOption>),
    /// Boolean checkbox.
    Checkbox,
    /// Multi-line text.
    TextArea,
    /// Rendering supplied by the caller.
    CustomSlot(CustomRender),
}

impl std::fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select(options) => f.debug_tuple("Select").field(options).finish(),
            Self::CustomSlot(_) => f.write_str("CustomSlot(..)"),
            other => f.write_str(other.name()),
        }
    }
}

impl FieldKind {
    /// A custom slot rendered by `render`.
    pub fn custom<F>(render: F) -> Self
    where
        F: Fn(&FieldValue, &ChangeHandle) -> Widget + Send + Sync + 'static,
    {
        Self::CustomSlot(Arc::new(render))
    }

    /// Short name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::PhoneNumber => "PhoneNumber",
            Self::Email => "Email",
            Self::DatePicker => "DatePicker",
            Self::Select(_) => "Select",
            Self::Checkbox => "Checkbox",
            Self::TextArea => "TextArea",
            Self::CustomSlot(_) => "CustomSlot",
        }
    }

    /// Value a fresh form holds for a field of this kind.
    pub fn default_value(&self) -> FieldValue {
        match self {
            Self::Text | Self::PhoneNumber | Self::Email | Self::TextArea => {
                FieldValue::Text(String::new())
            }
            Self::Checkbox => FieldValue::Bool(false),
            Self::DatePicker | Self::Select(_) | Self::CustomSlot(_) => FieldValue::Null,
        }
    }
}

/// Icon shown inside a text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIcon {
    /// Image source.
    pub src: String,
    /// Alternative text.
    pub alt: String,
}

/// Definition of a form field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Field kind.
    pub kind: FieldKind,
    /// Field name; the key into form values and the validation schema.
    pub name: String,
    /// Field label.
    pub label: String,
    /// Placeholder text.
    pub placeholder: Option<String>,
    /// Leading icon.
    pub icon: Option<FieldIcon>,
    /// Help text shown under the widget.
    pub help_text: Option<String>,
    /// Whether the field is disabled.
    pub disabled: bool,
    /// Value a fresh form starts with; falls back to the kind's default.
    pub default: Option<FieldValue>,
}

impl FieldDescriptor {
    /// Creates a new field descriptor.
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            kind,
            name: name.into(),
            label: label.into(),
            placeholder: None,
            icon: None,
            help_text: None,
            disabled: false,
            default: None,
        }
    }

    /// Sets the placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    /// Sets the leading icon.
    #[must_use]
    pub fn icon(mut self, src: impl Into<String>, alt: impl Into<String>) -> Self {
        self.icon = Some(FieldIcon {
            src: src.into(),
            alt: alt.into(),
        });
        self
    }

    /// Sets help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    /// Disables the field.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn initial(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Options of a select field, `None` for every other kind.
    pub fn children(&self) -> Option<&[SelectOption]> {
        match &self.kind {
            FieldKind::Select(options) => Some(options),
            _ => None,
        }
    }

    /// Renderer of a custom slot, `None` for every other kind.
    pub fn custom_render(&self) -> Option<&CustomRender> {
        match &self.kind {
            FieldKind::CustomSlot(render) => Some(render),
            _ => None,
        }
    }

    /// The value a fresh form holds for this field.
    pub fn default_value(&self) -> FieldValue {
        self.default
            .clone()
            .unwrap_or_else(|| self.kind.default_value())
    }

    /// Checks the descriptor for mistakes that are bugs in the form definition.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| FormError::InvalidDescriptor {
            field: self.name.clone(),
            message: message.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("field name must not be empty"));
        }

        if let FieldKind::Select(options) = &self.kind {
            let mut seen = HashSet::new();
            if let Some(dup) = options.iter().find(|o| !seen.insert(o.value.as_str())) {
                return Err(invalid(&format!("duplicate option value {:?}", dup.value)));
            }
        }

        Ok(())
    }

    /// Interprets a raw JSON value (e.g. from a submitted values file) for this field.
    pub fn parse_value(&self, raw: &serde_json::Value) -> Result<FieldValue> {
        use serde_json::Value;

        let parse_error = |message: String| FormError::ParseError {
            field: self.name.clone(),
            message,
        };

        if raw.is_null() {
            return Ok(FieldValue::Null);
        }

        match (&self.kind, raw) {
            (FieldKind::Checkbox, Value::Bool(b)) => Ok(FieldValue::Bool(*b)),
            (FieldKind::Checkbox, other) => {
                Err(parse_error(format!("expected a boolean, got {other}")))
            }
            (FieldKind::DatePicker, Value::String(s)) => {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map(FieldValue::Date)
                    .map_err(|e| parse_error(format!("expected YYYY-MM-DD: {e}")))
            }
            (FieldKind::DatePicker, other) => {
                Err(parse_error(format!("expected a date string, got {other}")))
            }
            (FieldKind::Select(options), Value::String(s)) => {
                if options.iter().any(|o| &o.value == s) {
                    Ok(FieldValue::Text(s.clone()))
                } else {
                    Err(parse_error(format!("{s:?} is not one of the options")))
                }
            }
            (
                FieldKind::Text | FieldKind::PhoneNumber | FieldKind::Email | FieldKind::TextArea,
                Value::String(s),
            ) => Ok(FieldValue::Text(s.clone())),
            (FieldKind::CustomSlot(_), other) => {
                serde_json::from_value::<Vec<FileHandle>>(other.clone())
                    .map(FieldValue::Files)
                    .or_else(|_| serde_json::from_value::<FieldValue>(other.clone()))
                    .map_err(|e| parse_error(e.to_string()))
            }
            (kind, other) => Err(parse_error(format!(
                "{} field cannot hold {other}",
                kind.name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_only_for_select() {
        let select = FieldDescriptor::new(
            "idType",
            "Identification Type",
            FieldKind::Select(vec![SelectOption::plain("Passport")]),
        );
        assert_eq!(select.children().map(<[_]>::len), Some(1));
        assert!(select.custom_render().is_none());

        let text = FieldDescriptor::new("name", "Full Name", FieldKind::Text);
        assert!(text.children().is_none());
        assert!(text.custom_render().is_none());
    }

    #[test]
    fn test_custom_render_only_for_custom_slot() {
        let kind = FieldKind::custom(|_: &FieldValue, _: &ChangeHandle| {
            Widget::Markup(String::new())
        });
        let field = FieldDescriptor::new("gender", "Gender", kind);
        assert!(field.custom_render().is_some());
        assert!(field.children().is_none());
    }

    #[test]
    fn test_default_values() {
        assert_eq!(
            FieldDescriptor::new("name", "Name", FieldKind::Text).default_value(),
            FieldValue::Text(String::new())
        );
        assert_eq!(
            FieldDescriptor::new("consent", "Consent", FieldKind::Checkbox).default_value(),
            FieldValue::Bool(false)
        );
        assert_eq!(
            FieldDescriptor::new("gender", "Gender", FieldKind::Text)
                .initial("Male")
                .default_value(),
            FieldValue::from("Male")
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_options() {
        let field = FieldDescriptor::new(
            "doctor",
            "Doctor",
            FieldKind::Select(vec![SelectOption::plain("A"), SelectOption::plain("A")]),
        );
        assert!(matches!(
            field.validate(),
            Err(FormError::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let field = FieldDescriptor::new(" ", "Blank", FieldKind::Text);
        assert!(field.validate().is_err());
    }

    #[test]
    fn test_parse_value_by_kind() {
        let date = FieldDescriptor::new("birthDate", "Date of Birth", FieldKind::DatePicker);
        assert_eq!(
            date.parse_value(&serde_json::json!("1990-04-12")).unwrap(),
            FieldValue::Date(NaiveDate::from_ymd_opt(1990, 4, 12).unwrap())
        );
        assert!(date.parse_value(&serde_json::json!("12/04/1990")).is_err());

        let select = FieldDescriptor::new(
            "idType",
            "Identification Type",
            FieldKind::Select(vec![SelectOption::plain("Passport")]),
        );
        assert!(select.parse_value(&serde_json::json!("Passport")).is_ok());
        assert!(select.parse_value(&serde_json::json!("Library card")).is_err());

        let checkbox = FieldDescriptor::new("consent", "Consent", FieldKind::Checkbox);
        assert_eq!(
            checkbox.parse_value(&serde_json::json!(true)).unwrap(),
            FieldValue::Bool(true)
        );
        assert!(checkbox.parse_value(&serde_json::json!("yes")).is_err());
    }
}
