//! Bootstrap 5 markup for widgets.

use super::{html_escape, InputType, RenderedOption, Widget, WidgetAttrs};

impl Widget {
    /// Renders the widget as Bootstrap 5 HTML.
    ///
    /// `name` becomes the `name` attribute; `attrs` may carry `id`, an extra
    /// `class` and any other attribute (`required`, `disabled`, ...).
    pub fn to_html(&self, name: &str, attrs: &WidgetAttrs) -> String {
        let id = attrs
            .get("id")
            .cloned()
            .unwrap_or_else(|| format!("id_{name}"));

        match self {
            Self::Input {
                input_type,
                value,
                placeholder,
                icon,
            } => {
                let input = text_input(*input_type, &id, name, value, placeholder.as_deref(), attrs);
                match icon {
                    Some(icon) => format!(
                        r#"<div class="input-group"><span class="input-group-text"><img src="{}" alt="{}" width="24" height="24"></span>{input}</div>"#,
                        html_escape(&icon.src),
                        html_escape(&icon.alt)
                    ),
                    None => input,
                }
            }
            Self::Phone {
                value,
                placeholder,
                default_country,
            } => {
                let attrs = attrs.clone().with("data-default-country", *default_country);
                text_input(InputType::Tel, &id, name, value, placeholder.as_deref(), &attrs)
            }
            Self::DatePicker { value, date_format } => {
                // Browsers submit ISO dates; the display format rides along for the picker script.
                let iso = value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
                let attrs = attrs.clone().with("data-date-format", *date_format);
                text_input(InputType::Date, &id, name, &iso, None, &attrs)
            }
            Self::Select {
                placeholder,
                options,
            } => select(&id, name, placeholder.as_deref(), options, attrs),
            Self::Checkbox { checked, label } => checkbox(&id, name, *checked, label, attrs),
            Self::TextArea {
                value,
                placeholder,
                rows,
            } => {
                let placeholder_attr = placeholder
                    .as_ref()
                    .map(|p| format!(r#" placeholder="{}""#, html_escape(p)))
                    .unwrap_or_default();
                format!(
                    r#"<textarea class="{}" id="{}" name="{}" rows="{}"{placeholder_attr}{}>{}</textarea>"#,
                    control_class("form-control", attrs),
                    html_escape(&id),
                    html_escape(name),
                    rows,
                    attrs.extra_html(),
                    html_escape(value)
                )
            }
            Self::RadioGroup { options } => radio_group(name, options),
            Self::FileUpload { files, accept } => {
                let listed: String = files
                    .iter()
                    .map(|f| {
                        format!(
                            r#"<li class="list-group-item">{} <span class="text-muted">({} bytes)</span></li>"#,
                            html_escape(&f.name),
                            f.size
                        )
                    })
                    .collect();
                format!(
                    r#"<input type="file" class="{}" id="{}" name="{}" accept="{}"{}><ul class="list-group mt-2">{listed}</ul>"#,
                    control_class("form-control", attrs),
                    html_escape(&id),
                    html_escape(name),
                    html_escape(accept),
                    attrs.extra_html()
                )
            }
            Self::Markup(markup) => markup.clone(),
        }
    }
}

fn control_class(base: &str, attrs: &WidgetAttrs) -> String {
    match attrs.get("class") {
        Some(extra) => format!("{base} {extra}"),
        None => base.to_string(),
    }
}

fn text_input(
    input_type: InputType,
    id: &str,
    name: &str,
    value: &str,
    placeholder: Option<&str>,
    attrs: &WidgetAttrs,
) -> String {
    let value_attr = if value.is_empty() {
        String::new()
    } else {
        format!(r#" value="{}""#, html_escape(value))
    };
    let placeholder_attr = placeholder
        .map(|p| format!(r#" placeholder="{}""#, html_escape(p)))
        .unwrap_or_default();

    format!(
        r#"<input type="{}" class="{}" id="{}" name="{}"{value_attr}{placeholder_attr}{}>"#,
        input_type.as_str(),
        control_class("form-control", attrs),
        html_escape(id),
        html_escape(name),
        attrs.extra_html()
    )
}

fn select(
    id: &str,
    name: &str,
    placeholder: Option<&str>,
    options: &[RenderedOption],
    attrs: &WidgetAttrs,
) -> String {
    let mut html = String::new();

    let nothing_selected = options.iter().all(|o| !o.selected);
    let blank_selected = if nothing_selected { " selected" } else { "" };
    html.push_str(&format!(
        r#"<option value=""{blank_selected} disabled>{}</option>"#,
        html_escape(placeholder.unwrap_or("---------"))
    ));

    for option in options {
        let selected_attr = if option.selected { " selected" } else { "" };
        let image_attr = option
            .image
            .as_ref()
            .map(|src| format!(r#" data-image="{}""#, html_escape(src)))
            .unwrap_or_default();
        html.push_str(&format!(
            r#"<option value="{}"{selected_attr}{image_attr}>{}</option>"#,
            html_escape(&option.value),
            html_escape(&option.label)
        ));
    }

    format!(
        r#"<select class="{}" id="{}" name="{}"{}>{html}</select>"#,
        control_class("form-select", attrs),
        html_escape(id),
        html_escape(name),
        attrs.extra_html()
    )
}

fn checkbox(id: &str, name: &str, checked: bool, label: &str, attrs: &WidgetAttrs) -> String {
    let checked_attr = if checked { " checked" } else { "" };
    format!(
        r#"<div class="form-check">
  <input class="{}" type="checkbox" id="{}" name="{}" value="true"{checked_attr}{}>
  <label class="form-check-label" for="{}">{}</label>
</div>"#,
        control_class("form-check-input", attrs),
        html_escape(id),
        html_escape(name),
        attrs.extra_html(),
        html_escape(id),
        html_escape(label)
    )
}

fn radio_group(name: &str, options: &[RenderedOption]) -> String {
    let mut html = String::from(r#"<div class="d-flex gap-4">"#);

    for (i, option) in options.iter().enumerate() {
        let id = format!("id_{name}_{i}");
        let checked_attr = if option.selected { " checked" } else { "" };
        html.push_str(&format!(
            r#"<div class="form-check form-check-inline">
  <input class="form-check-input" type="radio" id="{}" name="{}" value="{}"{checked_attr}>
  <label class="form-check-label" for="{}">{}</label>
</div>"#,
            html_escape(&id),
            html_escape(name),
            html_escape(&option.value),
            html_escape(&id),
            html_escape(&option.label)
        ));
    }

    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::value::{FieldValue, FileHandle};
    use crate::widgets::rendered_options;

    #[test]
    fn test_text_input() {
        let widget = Widget::Input {
            input_type: InputType::Email,
            value: "jane@example.com".into(),
            placeholder: Some("johndoe@google.com".into()),
            icon: None,
        };
        let html = widget.to_html("email", &WidgetAttrs::new());
        assert!(html.contains(r#"type="email""#));
        assert!(html.contains(r#"class="form-control""#));
        assert!(html.contains(r#"value="jane@example.com""#));
        assert!(html.contains(r#"placeholder="johndoe@google.com""#));
    }

    #[test]
    fn test_input_with_icon() {
        let widget = Widget::Input {
            input_type: InputType::Text,
            value: String::new(),
            placeholder: None,
            icon: Some(crate::field::FieldIcon {
                src: "/assets/icons/user.svg".into(),
                alt: "user".into(),
            }),
        };
        let html = widget.to_html("name", &WidgetAttrs::new());
        assert!(html.contains("input-group"));
        assert!(html.contains(r#"src="/assets/icons/user.svg""#));
        assert!(!html.contains("value="));
    }

    #[test]
    fn test_phone_input() {
        let widget = Widget::Phone {
            value: "+15551234567".into(),
            placeholder: None,
            default_country: "US",
        };
        let html = widget.to_html("phone", &WidgetAttrs::new());
        assert!(html.contains(r#"type="tel""#));
        assert!(html.contains(r#"data-default-country="US""#));
    }

    #[test]
    fn test_date_picker_uses_iso_value() {
        let widget = Widget::DatePicker {
            value: NaiveDate::from_ymd_opt(1990, 4, 12),
            date_format: "%m/%d/%Y",
        };
        let html = widget.to_html("birthDate", &WidgetAttrs::new());
        assert!(html.contains(r#"type="date""#));
        assert!(html.contains(r#"value="1990-04-12""#));
    }

    #[test]
    fn test_select_marks_selected_option() {
        let widget = Widget::Select {
            placeholder: Some("Select a physician".into()),
            options: rendered_options(
                [("1", "Option 1", None), ("2", "Option 2", None)],
                &FieldValue::from("2"),
            ),
        };
        let html = widget.to_html("choice", &WidgetAttrs::new());
        assert!(html.contains(r#"class="form-select""#));
        assert!(html.contains(r#"value="2" selected"#));
        assert!(html.contains("Select a physician"));
        assert!(!html.contains(r#"value="" selected"#));
    }

    #[test]
    fn test_checkbox() {
        let widget = Widget::Checkbox {
            checked: true,
            label: "I consent to treatment".into(),
        };
        let html = widget.to_html("treatmentConsent", &WidgetAttrs::new());
        assert!(html.contains("form-check"));
        assert!(html.contains("checked"));
        assert!(html.contains("I consent to treatment"));
    }

    #[test]
    fn test_textarea_escapes_content() {
        let widget = Widget::TextArea {
            value: "<b>Peanuts</b>".into(),
            placeholder: None,
            rows: 4,
        };
        let html = widget.to_html("allergies", &WidgetAttrs::new());
        assert!(html.contains("&lt;b&gt;Peanuts&lt;/b&gt;"));
        assert!(html.contains(r#"rows="4""#));
    }

    #[test]
    fn test_radio_group() {
        let widget = Widget::RadioGroup {
            options: rendered_options(
                [("Male", "Male", None), ("Female", "Female", None)],
                &FieldValue::from("Female"),
            ),
        };
        let html = widget.to_html("gender", &WidgetAttrs::new());
        assert!(html.contains(r#"value="Female" checked"#));
        assert!(html.contains(r#"id="id_gender_0""#));
    }

    #[test]
    fn test_file_upload_lists_files() {
        let widget = Widget::FileUpload {
            files: vec![FileHandle::new("passport.png", "image/png", 2048)],
            accept: "image/*".into(),
        };
        let html = widget.to_html("identificationDocument", &WidgetAttrs::new());
        assert!(html.contains(r#"type="file""#));
        assert!(html.contains("passport.png"));
    }
}
