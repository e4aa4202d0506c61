//! The field renderer: turns a descriptor and its current value into a widget.

use chrono::NaiveDate;

use crate::error::{FormError, Result};
use crate::field::{FieldDescriptor, FieldKind};
use crate::form::ChangeHandle;
use crate::value::{FieldValue, FileHandle};
use crate::widgets::{
    rendered_options, InputType, RenderedOption, Widget, WidgetAttrs, DEFAULT_DATE_FORMAT,
    DEFAULT_PHONE_COUNTRY,
};

/// Rows shown by a text area.
pub const TEXTAREA_ROWS: usize = 4;

/// A field ready for display: its widget bound to the current value and to
/// the form's change callback.
///
/// Every interaction goes through [`RenderedField::on_change`], so the value
/// a user enters is exactly the value the form holds.
#[derive(Debug, Clone)]
pub struct RenderedField {
    /// Field name.
    pub name: String,
    /// Field label.
    pub label: String,
    /// The concrete widget.
    pub widget: Widget,
    /// Current validation error.
    pub error: Option<String>,
    /// Help text.
    pub help_text: Option<String>,
    /// Whether the widget is disabled.
    pub disabled: bool,
    /// Whether the schema requires a value.
    pub required: bool,
    /// Change callback.
    pub on_change: ChangeHandle,
}

impl RenderedField {
    /// The value the widget displays.
    pub fn displayed_value(&self) -> FieldValue {
        self.widget.displayed_value()
    }

    /// Options of a select or radio widget, in declared order.
    pub fn options(&self) -> &[RenderedOption] {
        self.widget.options()
    }

    fn mismatch(&self) -> FormError {
        FormError::WidgetMismatch {
            field: self.name.clone(),
            expected: self.widget.accepts(),
        }
    }

    /// Types into a text, email, phone or text area widget.
    pub fn input(&self, text: impl Into<String>) -> Result<()> {
        match self.widget {
            Widget::Input { .. } | Widget::Phone { .. } | Widget::TextArea { .. } => {
                self.on_change.set(FieldValue::Text(text.into()))
            }
            _ => Err(self.mismatch()),
        }
    }

    /// Chooses an option of a select or radio widget by value.
    pub fn select(&self, value: &str) -> Result<()> {
        match &self.widget {
            Widget::Select { options, .. } | Widget::RadioGroup { options } => {
                if !options.iter().any(|o| o.value == value) {
                    return Err(FormError::UnknownOption {
                        field: self.name.clone(),
                        value: value.to_string(),
                    });
                }
                self.on_change.set(value)
            }
            _ => Err(self.mismatch()),
        }
    }

    /// Ticks or unticks a checkbox.
    pub fn set_checked(&self, checked: bool) -> Result<()> {
        match self.widget {
            Widget::Checkbox { .. } => self.on_change.set(checked),
            _ => Err(self.mismatch()),
        }
    }

    /// Picks a date in a date picker.
    pub fn pick_date(&self, date: NaiveDate) -> Result<()> {
        match self.widget {
            Widget::DatePicker { .. } => self.on_change.set(date),
            _ => Err(self.mismatch()),
        }
    }

    /// Replaces the files attached to a file upload widget.
    pub fn attach_files(&self, files: Vec<FileHandle>) -> Result<()> {
        match self.widget {
            Widget::FileUpload { .. } => self.on_change.set(files),
            _ => Err(self.mismatch()),
        }
    }

    /// Clears the field back to "no value".
    pub fn clear(&self) -> Result<()> {
        let empty = match self.widget {
            Widget::Input { .. } | Widget::Phone { .. } | Widget::TextArea { .. } => {
                FieldValue::Text(String::new())
            }
            Widget::Checkbox { .. } => FieldValue::Bool(false),
            _ => FieldValue::Null,
        };
        self.on_change.set(empty)
    }

    /// Marks the field as touched.
    pub fn blur(&self) -> Result<()> {
        self.on_change.touch()
    }

    /// The widget's Bootstrap markup with state attributes applied.
    pub fn widget_html(&self) -> String {
        let mut attrs = WidgetAttrs::new().with("id", format!("id_{}", self.name));
        if self.error.is_some() {
            attrs.set("class", "is-invalid");
            attrs.set("aria-invalid", "true");
        }
        if self.disabled {
            attrs.set("disabled", "disabled");
        }
        if self.required {
            attrs.set("required", "required");
        }
        self.widget.to_html(&self.name, &attrs)
    }
}

/// Produces the widget for one field.
///
/// The match is exhaustive over [`FieldKind`]: a kind without a widget does
/// not compile. Errors and the required flag are filled in by the controller.
pub fn render_field(
    descriptor: &FieldDescriptor,
    value: &FieldValue,
    on_change: ChangeHandle,
) -> RenderedField {
    let text = || value.as_text().unwrap_or_default().to_string();
    let placeholder = descriptor.placeholder.clone();

    let widget = match &descriptor.kind {
        FieldKind::Text => Widget::Input {
            input_type: InputType::Text,
            value: text(),
            placeholder,
            icon: descriptor.icon.clone(),
        },
        FieldKind::Email => Widget::Input {
            input_type: InputType::Email,
            value: text(),
            placeholder,
            icon: descriptor.icon.clone(),
        },
        FieldKind::PhoneNumber => Widget::Phone {
            value: text(),
            placeholder,
            default_country: DEFAULT_PHONE_COUNTRY,
        },
        FieldKind::DatePicker => Widget::DatePicker {
            value: value.as_date(),
            date_format: DEFAULT_DATE_FORMAT,
        },
        FieldKind::Select(options) => Widget::Select {
            placeholder,
            options: rendered_options(
                options
                    .iter()
                    .map(|o| (o.value.as_str(), o.label.as_str(), o.image.as_deref())),
                value,
            ),
        },
        FieldKind::Checkbox => Widget::Checkbox {
            checked: value.as_bool().unwrap_or(false),
            label: descriptor.label.clone(),
        },
        FieldKind::TextArea => Widget::TextArea {
            value: text(),
            placeholder,
            rows: TEXTAREA_ROWS,
        },
        FieldKind::CustomSlot(render) => render(value, &on_change),
    };

    RenderedField {
        name: descriptor.name.clone(),
        label: descriptor.label.clone(),
        widget,
        error: None,
        help_text: descriptor.help_text.clone(),
        disabled: descriptor.disabled,
        required: false,
        on_change,
    }
}
