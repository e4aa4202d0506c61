//! Fields rendered through a custom slot.

use crate::field::{FieldDescriptor, FieldKind};
use crate::form::ChangeHandle;
use crate::value::FieldValue;
use crate::widgets::{rendered_options, Widget};

/// Creates a field whose widget comes from `render`.
pub fn custom_field<F>(name: &str, label: &str, render: F) -> FieldDescriptor
where
    F: Fn(&FieldValue, &ChangeHandle) -> Widget + Send + Sync + 'static,
{
    FieldDescriptor::new(name, label, FieldKind::custom(render))
}

/// Creates a radio group over `choices`, with the first choice preselected.
pub fn radio_group(name: &str, label: &str, choices: &[&str]) -> FieldDescriptor {
    let choices: Vec<String> = choices.iter().map(|c| (*c).to_string()).collect();
    let initial = choices.first().cloned();

    let field = custom_field(name, label, move |value: &FieldValue, _: &ChangeHandle| {
        Widget::RadioGroup {
            options: rendered_options(
                choices.iter().map(|c| (c.as_str(), c.as_str(), None)),
                value,
            ),
        }
    });

    match initial {
        Some(initial) => field.initial(initial),
        None => field,
    }
}

/// Creates a file upload field accepting the given MIME pattern.
pub fn file_uploader(name: &str, label: &str, accept: &str) -> FieldDescriptor {
    let accept = accept.to_string();
    custom_field(name, label, move |value: &FieldValue, _: &ChangeHandle| {
        Widget::FileUpload {
            files: value.as_files().map(<[_]>::to_vec).unwrap_or_default(),
            accept: accept.clone(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radio_group_preselects_first_choice() {
        let field = radio_group("gender", "Gender", &["Male", "Female", "Other"]);
        assert_eq!(field.default_value(), FieldValue::from("Male"));
        assert!(field.custom_render().is_some());
    }

    #[test]
    fn test_empty_radio_group_has_no_default() {
        let field = radio_group("gender", "Gender", &[]);
        assert_eq!(field.default_value(), FieldValue::Null);
    }

    #[test]
    fn test_file_uploader_defaults_to_no_files() {
        let field = file_uploader("identificationDocument", "Scanned copy", "image/*");
        assert_eq!(field.default_value(), FieldValue::Null);
        assert!(field.custom_render().is_some());
    }
}
