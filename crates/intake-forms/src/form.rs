//! Form controller and form rendering.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ironhtml::html;
use ironhtml_elements::Div;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{FieldErrors, FormError, Result};
use crate::field::FieldDescriptor;
use crate::render::{render_field, RenderedField};
use crate::submission::{SubmissionLifecycle, SubmissionStatus, SubmitError, SubmitOutcome};
use crate::validation::Schema;
use crate::value::{FieldValue, FormValues};

/// When a changed field is re-validated.
///
/// After the first submit attempt every mode re-validates on change, so fixed
/// errors disappear as the user types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Validate a field on every change.
    #[default]
    OnChange,
    /// Validate a field when it loses focus.
    OnBlur,
    /// Validate nothing until the form is submitted.
    OnSubmit,
}

impl ValidationMode {
    fn on_change(self, submit_count: u32) -> bool {
        self == Self::OnChange || submit_count > 0
    }

    fn on_blur(self) -> bool {
        self == Self::OnBlur
    }
}

/// Snapshot of a form's state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// Current values by field name.
    pub values: FormValues,
    /// Current errors by field name.
    pub errors: FieldErrors,
    /// Whether a submission is in flight.
    pub is_submitting: bool,
    /// Fields whose value differs from their default.
    pub dirty: BTreeSet<String>,
    /// Fields that have lost focus at least once.
    pub touched: BTreeSet<String>,
    /// Number of submit attempts, valid or not.
    pub submit_count: u32,
}

struct Inner {
    state: FormState,
    defaults: FormValues,
    mode: ValidationMode,
}

/// State shared between a controller, its change handles and its submissions.
pub(crate) struct FormCore {
    inner: Mutex<Inner>,
    schema: Arc<dyn Schema>,
    teardown: CancellationToken,
}

impl FormCore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_torn_down(&self) -> bool {
        self.teardown.is_cancelled()
    }

    pub(crate) fn end_submission(&self) {
        self.lock().state.is_submitting = false;
    }

    fn validate_field(&self, inner: &mut Inner, name: &str) {
        match self.schema.validate_field(name, &inner.state.values) {
            Some(message) => inner.state.errors.insert(name, message),
            None => {
                inner.state.errors.remove(name);
            }
        }
    }

    /// Runs the whole schema, keeping only errors for registered fields.
    fn validate_all(&self, inner: &mut Inner) -> bool {
        let mut errors = self.schema.validate(&inner.state.values);
        errors.retain(|name| inner.defaults.contains_key(name));
        inner.state.errors = errors;
        inner.state.errors.is_empty()
    }

    fn set_value(&self, name: &str, value: FieldValue) -> Result<()> {
        if self.is_torn_down() {
            return Err(FormError::Unmounted);
        }

        let mut inner = self.lock();
        let is_default = match inner.defaults.get(name) {
            Some(default) => *default == value,
            None => return Err(FormError::UnknownField(name.to_string())),
        };

        if is_default {
            inner.state.dirty.remove(name);
        } else {
            inner.state.dirty.insert(name.to_string());
        }
        debug!(field = name, "value changed");
        inner.state.values.insert(name.to_string(), value);

        if inner.mode.on_change(inner.state.submit_count) {
            self.validate_field(&mut inner, name);
        }
        Ok(())
    }

    fn touch(&self, name: &str) -> Result<()> {
        if self.is_torn_down() {
            return Err(FormError::Unmounted);
        }

        let mut inner = self.lock();
        if !inner.defaults.contains_key(name) {
            return Err(FormError::UnknownField(name.to_string()));
        }
        inner.state.touched.insert(name.to_string());

        if inner.mode.on_blur() {
            self.validate_field(&mut inner, name);
        }
        Ok(())
    }

    fn value(&self, name: &str) -> Option<FieldValue> {
        self.lock().state.values.get(name).cloned()
    }
}

/// The change callback bound to one field.
///
/// Cloneable and cheap; every widget of the field shares it. Once the form is
/// unmounted every call fails with [`FormError::Unmounted`].
#[derive(Clone)]
pub struct ChangeHandle {
    core: Arc<FormCore>,
    name: Arc<str>,
}

impl std::fmt::Debug for ChangeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ChangeHandle {
    /// The field this handle writes to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the field's value.
    pub fn set(&self, value: impl Into<FieldValue>) -> Result<()> {
        self.core.set_value(&self.name, value.into())
    }

    /// Marks the field as touched (focus lost).
    pub fn touch(&self) -> Result<()> {
        self.core.touch(&self.name)
    }

    /// The field's current value.
    pub fn value(&self) -> FieldValue {
        self.core.value(&self.name).unwrap_or_default()
    }
}

/// Owns the state of one mounted form.
///
/// Fields are registered as [`FieldDescriptor`]s; values change through
/// [`FormController::set_value`] or the [`ChangeHandle`] a rendered field
/// carries; [`FormController::submit`] validates and hands valid values to the
/// [`SubmissionLifecycle`].
///
/// Dropping the controller unmounts the form: change handles stop working and
/// in-flight submissions apply nothing when they finish.
pub struct FormController {
    core: Arc<FormCore>,
    fields: Vec<FieldDescriptor>,
    lifecycle: SubmissionLifecycle,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("fields", &self.fields.iter().map(|d| &d.name).collect::<Vec<_>>())
            .field("state", &self.state())
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

impl FormController {
    /// Creates a controller with no fields.
    pub fn new(schema: Arc<dyn Schema>, lifecycle: SubmissionLifecycle) -> Self {
        Self {
            core: Arc::new(FormCore {
                inner: Mutex::new(Inner {
                    state: FormState::default(),
                    defaults: FormValues::new(),
                    mode: ValidationMode::default(),
                }),
                schema,
                teardown: CancellationToken::new(),
            }),
            fields: Vec::new(),
            lifecycle,
        }
    }

    /// Sets when changed fields are validated.
    #[must_use]
    pub fn with_mode(self, mode: ValidationMode) -> Self {
        self.core.lock().mode = mode;
        self
    }

    /// Registers fields in order.
    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        for field in fields {
            self.register_field(field);
        }
        self
    }

    /// Registers a field. Registering an existing name replaces its descriptor
    /// in place and keeps the current value.
    pub fn register_field(&mut self, descriptor: FieldDescriptor) {
        debug_assert!(
            descriptor.validate().is_ok(),
            "{:?}",
            descriptor.validate()
        );
        debug_assert!(
            self.core.schema.declares(&descriptor.name),
            "field {:?} is not declared in the validation schema",
            descriptor.name
        );

        let default = descriptor.default_value();
        {
            let mut inner = self.core.lock();
            inner
                .state
                .values
                .entry(descriptor.name.clone())
                .or_insert_with(|| default.clone());
            inner.defaults.insert(descriptor.name.clone(), default);
        }

        match self.fields.iter_mut().find(|d| d.name == descriptor.name) {
            Some(existing) => {
                debug!(field = %descriptor.name, kind = descriptor.kind.name(), "field replaced");
                *existing = descriptor;
            }
            None => {
                debug!(field = %descriptor.name, kind = descriptor.kind.name(), "field registered");
                self.fields.push(descriptor);
            }
        }
    }

    /// Removes a field with its value and error.
    pub fn unregister_field(&mut self, name: &str) -> Option<FieldDescriptor> {
        let index = self.fields.iter().position(|d| d.name == name)?;
        let mut inner = self.core.lock();
        inner.defaults.remove(name);
        inner.state.values.remove(name);
        inner.state.errors.remove(name);
        inner.state.dirty.remove(name);
        inner.state.touched.remove(name);
        debug!(field = name, "field unregistered");
        Some(self.fields.remove(index))
    }

    /// Registered fields, in registration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a registered field.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|d| d.name == name)
    }

    /// The change callback for a registered field.
    pub fn change_handle(&self, name: &str) -> Option<ChangeHandle> {
        self.field(name).map(|d| ChangeHandle {
            core: Arc::clone(&self.core),
            name: Arc::from(d.name.as_str()),
        })
    }

    /// Sets one field's value and validates that field according to the mode.
    pub fn set_value(&self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        self.core.set_value(name, value.into())
    }

    /// Marks a field as touched.
    pub fn touch(&self, name: &str) -> Result<()> {
        self.core.touch(name)
    }

    /// A field's current value.
    pub fn value(&self, name: &str) -> Option<FieldValue> {
        self.core.value(name)
    }

    /// All current values.
    pub fn values(&self) -> FormValues {
        self.core.lock().state.values.clone()
    }

    /// All current errors.
    pub fn errors(&self) -> FieldErrors {
        self.core.lock().state.errors.clone()
    }

    /// A field's current error.
    pub fn error(&self, name: &str) -> Option<String> {
        self.core.lock().state.errors.get(name).map(str::to_string)
    }

    /// Whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.core.lock().state.is_submitting
    }

    /// A snapshot of the whole state.
    pub fn state(&self) -> FormState {
        self.core.lock().state.clone()
    }

    /// Current submission status.
    pub fn status(&self) -> SubmissionStatus {
        self.lifecycle.status()
    }

    /// Subscribes to submission status changes (busy indicator, disabled button).
    pub fn subscribe_status(&self) -> watch::Receiver<SubmissionStatus> {
        self.lifecycle.subscribe()
    }

    /// Validates every field against the schema and replaces the errors.
    ///
    /// Returns `true` when the form is valid.
    pub fn validate_all(&self) -> bool {
        let mut inner = self.core.lock();
        self.core.validate_all(&mut inner)
    }

    /// Restores every field to its default and clears errors and flags.
    pub fn reset(&self) {
        let mut inner = self.core.lock();
        let defaults = inner.defaults.clone();
        let state = &mut inner.state;
        state.values = defaults;
        state.errors = FieldErrors::new();
        state.dirty.clear();
        state.touched.clear();
        state.submit_count = 0;
    }

    /// Renders every registered field with its value, error and change callback.
    pub fn render(&self) -> Vec<RenderedField> {
        let state = self.state();
        self.fields
            .iter()
            .map(|descriptor| {
                let value = state
                    .values
                    .get(&descriptor.name)
                    .cloned()
                    .unwrap_or_default();
                let handle = ChangeHandle {
                    core: Arc::clone(&self.core),
                    name: Arc::from(descriptor.name.as_str()),
                };
                let mut field = render_field(descriptor, &value, handle);
                field.error = state.errors.get(&descriptor.name).map(str::to_string);
                field.required = self.core.schema.is_required(&descriptor.name);
                field.disabled |= state.is_submitting;
                field
            })
            .collect()
    }

    /// Renders the whole form as Bootstrap 5 HTML.
    pub fn render_html(&self, action: &str, submit_label: &str) -> String {
        render_bootstrap_form(
            &self.render(),
            action,
            "post",
            self.is_submitting(),
            submit_label,
        )
    }

    /// Validates and, when valid, starts a submission that calls `on_valid`
    /// with a snapshot of the values.
    ///
    /// `on_valid` resolves to the created record's identifier, `None` when
    /// nothing was created, or an error. While a submission is in flight
    /// further calls return [`SubmitOutcome::Busy`] without validating.
    pub fn submit<F, Fut>(&self, on_valid: F) -> SubmitOutcome
    where
        F: FnOnce(FormValues) -> Fut,
        Fut: Future<Output = std::result::Result<Option<String>, SubmitError>> + Send + 'static,
    {
        let values = {
            let mut inner = self.core.lock();
            if inner.state.is_submitting {
                warn!("submit ignored: a submission is already in flight");
                return SubmitOutcome::Busy;
            }

            inner.state.submit_count += 1;
            if !self.core.validate_all(&mut inner) {
                debug!(errors = %inner.state.errors, "submit blocked by validation");
                return SubmitOutcome::Invalid(inner.state.errors.clone());
            }

            inner.state.is_submitting = true;
            inner.state.values.clone()
        };

        SubmitOutcome::Started(
            self.lifecycle
                .start(Arc::clone(&self.core), values, on_valid),
        )
    }

    /// Unmounts the form. Equivalent to dropping the controller.
    pub fn unmount(self) {}
}

impl Drop for FormController {
    fn drop(&mut self) {
        self.core.teardown.cancel();
    }
}

/// Renders a rendered field with its label, error and help text.
pub fn render_bootstrap_field(field: &RenderedField) -> String {
    let id = format!("id_{}", field.name);
    let required_marker = if field.required { " *" } else { "" };
    let label_text = format!("{}{}", field.label, required_marker);
    // Checkboxes carry their own label.
    let show_label = !matches!(field.widget, crate::widgets::Widget::Checkbox { .. });

    let label_el = html! {
        label.for_(#id).class("form-label") { #label_text }
    };

    let error = field.error.clone();
    let help_text = field.help_text.clone();

    html! { div.class("mb-3") }
        .when(show_label, |d| d.raw(label_el.render()))
        .raw(&field.widget_html())
        .when(error.is_some(), |d| {
            d.child::<Div, _>(|e| {
                e.class("invalid-feedback d-block")
                    .text(error.as_deref().unwrap_or(""))
            })
        })
        .when(help_text.is_some(), |d| {
            d.child::<Div, _>(|h| h.class("form-text").text(help_text.as_deref().unwrap_or("")))
        })
        .render()
}

/// Renders a complete form with Bootstrap 5 styling.
///
/// While `submitting` the submit button is disabled and shows a loading label.
pub fn render_bootstrap_form(
    fields: &[RenderedField],
    action: &str,
    method: &str,
    submitting: bool,
    submit_label: &str,
) -> String {
    let mut form = html! {
        form.action(#action).method(#method).class("space-y-6 flex-1")
    };

    for field in fields {
        let field_html = render_bootstrap_field(field);
        form = form.child::<Div, _>(|d| d.raw(&field_html));
    }

    let label = if submitting { "Loading..." } else { submit_label };
    form = form.child::<Div, _>(|d| {
        let btn = html! {
            button.type_("submit").class("btn btn-primary w-100") {
                #label
            }
        }
        .when(submitting, |b| b.attr("disabled", "disabled").attr("aria-busy", "true"));
        d.raw(btn.render())
    });

    form.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, SelectOption};
    use crate::navigation::{RecordingNavigator, RoutePattern};
    use crate::validation::{FieldRules, ValidationSchema};

    fn controller(mode: ValidationMode) -> FormController {
        let schema = ValidationSchema::new()
            .field("name", FieldRules::required().min_length(2))
            .field("email", FieldRules::required().email())
            .field("doctor", FieldRules::required());
        let lifecycle = SubmissionLifecycle::new(
            Arc::new(RecordingNavigator::new()),
            RoutePattern::new("/patients/{id}/register").unwrap(),
        )
        .unwrap();
        FormController::new(Arc::new(schema), lifecycle)
            .with_mode(mode)
            .with_fields([
                FieldDescriptor::new("name", "Full Name", FieldKind::Text),
                FieldDescriptor::new("email", "Email", FieldKind::Email),
                FieldDescriptor::new(
                    "doctor",
                    "Primary care physician",
                    FieldKind::Select(vec![
                        SelectOption::plain("A"),
                        SelectOption::plain("B"),
                        SelectOption::plain("C"),
                    ]),
                ),
            ])
    }

    #[test]
    fn test_register_sets_defaults() {
        let form = controller(ValidationMode::OnChange);
        assert_eq!(form.value("name"), Some(FieldValue::Text(String::new())));
        assert_eq!(form.value("doctor"), Some(FieldValue::Null));
        assert_eq!(form.fields().len(), 3);
    }

    #[test]
    fn test_register_same_name_replaces_in_place() {
        let mut form = controller(ValidationMode::OnChange);
        form.set_value("name", "Jane").unwrap();
        form.register_field(
            FieldDescriptor::new("name", "Legal Name", FieldKind::Text).placeholder("Jane Doe"),
        );

        assert_eq!(form.fields().len(), 3);
        assert_eq!(form.fields()[0].label, "Legal Name");
        assert_eq!(form.value("name"), Some(FieldValue::from("Jane")));
    }

    #[test]
    fn test_set_value_touches_only_that_field() {
        let form = controller(ValidationMode::OnChange);
        form.set_value("name", "J").unwrap();

        let state = form.state();
        assert_eq!(state.values.get("name"), Some(&FieldValue::from("J")));
        assert_eq!(state.values.get("email"), Some(&FieldValue::Text(String::new())));
        assert!(state.errors.contains("name"));
        assert!(!state.errors.contains("email"));
        assert!(state.dirty.contains("name"));
        assert!(!state.dirty.contains("email"));
    }

    #[test]
    fn test_set_value_unknown_field() {
        let form = controller(ValidationMode::OnChange);
        assert!(matches!(
            form.set_value("nickname", "JJ"),
            Err(FormError::UnknownField(_))
        ));
    }

    #[test]
    fn test_setting_default_again_clears_dirty() {
        let form = controller(ValidationMode::OnChange);
        form.set_value("name", "Jane").unwrap();
        form.set_value("name", "").unwrap();
        assert!(!form.state().dirty.contains("name"));
    }

    #[test]
    fn test_on_submit_mode_defers_validation() {
        let form = controller(ValidationMode::OnSubmit);
        form.set_value("name", "J").unwrap();
        assert!(form.error("name").is_none());

        let outcome = form.submit(|_| async { Ok(None) });
        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert!(form.error("name").is_some());

        form.set_value("name", "Jane").unwrap();
        assert!(form.error("name").is_none());
    }

    #[test]
    fn test_on_blur_mode_validates_on_touch() {
        let form = controller(ValidationMode::OnBlur);
        form.set_value("email", "nope").unwrap();
        assert!(form.error("email").is_none());

        form.touch("email").unwrap();
        assert_eq!(form.error("email").as_deref(), Some("Invalid email address."));
        assert!(form.state().touched.contains("email"));
    }

    #[test]
    fn test_validate_all_removes_cleared_errors() {
        let form = controller(ValidationMode::OnSubmit);
        assert!(!form.validate_all());
        assert_eq!(form.errors().len(), 3);

        form.set_value("name", "Jane").unwrap();
        form.set_value("email", "jane@example.com").unwrap();
        form.set_value("doctor", "B").unwrap();
        assert!(form.validate_all());
        assert!(form.errors().is_empty());
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_unregister_drops_value_and_errors() {
        let mut form = controller(ValidationMode::OnChange);
        form.validate_all();
        assert!(form.error("doctor").is_some());

        let removed = form.unregister_field("doctor").unwrap();
        assert_eq!(removed.name, "doctor");
        assert!(form.value("doctor").is_none());
        assert!(form.error("doctor").is_none());

        // The schema still requires it, but it is no longer on the form.
        form.set_value("name", "Jane").unwrap();
        form.set_value("email", "jane@example.com").unwrap();
        assert!(form.validate_all());
    }

    #[test]
    fn test_reset() {
        let form = controller(ValidationMode::OnChange);
        form.set_value("name", "J").unwrap();
        form.touch("name").unwrap();
        form.reset();

        let state = form.state();
        assert_eq!(state.values.get("name"), Some(&FieldValue::Text(String::new())));
        assert!(state.errors.is_empty());
        assert!(state.dirty.is_empty());
        assert!(state.touched.is_empty());
    }

    #[test]
    fn test_change_handle_after_unmount() {
        let form = controller(ValidationMode::OnChange);
        let handle = form.change_handle("name").unwrap();
        handle.set("Jane").unwrap();
        assert_eq!(handle.value(), FieldValue::from("Jane"));

        form.unmount();
        assert!(matches!(handle.set("John"), Err(FormError::Unmounted)));
    }

    #[test]
    fn test_render_attaches_errors_and_required() {
        let form = controller(ValidationMode::OnChange);
        form.validate_all();
        let fields = form.render();

        assert_eq!(fields.len(), 3);
        assert!(fields.iter().all(|f| f.required));
        assert_eq!(fields[0].error.as_deref(), Some("This field is required."));
    }

    #[test]
    fn test_render_bootstrap_field_with_error() {
        let form = controller(ValidationMode::OnChange);
        form.set_value("email", "nope").unwrap();
        let fields = form.render();
        let html = render_bootstrap_field(&fields[1]);

        assert!(html.contains("form-label"));
        assert!(html.contains("Email *"));
        assert!(html.contains("is-invalid"));
        assert!(html.contains("Invalid email address."));
    }

    #[test]
    fn test_render_html_has_submit_button() {
        let form = controller(ValidationMode::OnChange);
        let html = form.render_html("/patients", "Get Started");
        assert!(html.contains("Get Started"));
        assert!(!html.contains("aria-busy"));
        assert_eq!(html.matches("<option").count(), 4);
    }
}
