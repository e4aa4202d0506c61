//! # intake-forms
//!
//! Schema-driven patient intake forms with Bootstrap 5 widgets.
//!
//! This crate provides:
//! - Field descriptors over a closed set of input kinds
//! - A field renderer that binds each kind to its widget
//! - A form controller holding values, errors and the submitting flag
//! - A submission lifecycle that navigates to the created record
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use intake_forms::fields::{email_field, text_field};
//! use intake_forms::validation::{FieldRules, ValidationSchema};
//! use intake_forms::{FormController, RecordingNavigator, RoutePattern, SubmissionLifecycle};
//!
//! let schema = ValidationSchema::new()
//!     .field("name", FieldRules::required().min_length(2).max_length(50))
//!     .field("email", FieldRules::required().email());
//!
//! let lifecycle = SubmissionLifecycle::new(
//!     Arc::new(RecordingNavigator::new()),
//!     RoutePattern::new("/patients/{id}/register").unwrap(),
//! )
//! .unwrap();
//!
//! let form = FormController::new(Arc::new(schema), lifecycle).with_fields([
//!     text_field("name", "Full name", "John Doe"),
//!     email_field("email", "Email", "johndoe@gmail.com"),
//! ]);
//!
//! form.render()[0].input("Jane Doe").unwrap();
//! assert!(form.error("name").is_none());
//!
//! form.set_value("email", "not-an-email").unwrap();
//! assert_eq!(form.error("email").as_deref(), Some("Invalid email address."));
//! ```
//!
//! ## Submitting
//!
//! ```rust
//! # use std::sync::Arc;
//! # use intake_forms::fields::text_field;
//! # use intake_forms::validation::{FieldRules, ValidationSchema};
//! # use intake_forms::{FormController, RecordingNavigator, RoutePattern, SubmissionLifecycle};
//! use intake_forms::{SubmissionOutcome, SubmitOutcome};
//!
//! # let navigator = Arc::new(RecordingNavigator::new());
//! # let lifecycle = SubmissionLifecycle::new(
//! #     navigator.clone(),
//! #     RoutePattern::new("/patients/{id}/register").unwrap(),
//! # )
//! # .unwrap();
//! # let schema = ValidationSchema::new().field("name", FieldRules::required());
//! # let form = FormController::new(Arc::new(schema), lifecycle)
//! #     .with_fields([text_field("name", "Full name", "John Doe")]);
//! form.set_value("name", "Jane Doe").unwrap();
//!
//! let outcome = form.submit(|_values| async { Ok(Some("abc123".to_string())) });
//! let SubmitOutcome::Started(submission) = outcome else { panic!("invalid form") };
//!
//! let done = futures::executor::block_on(submission);
//! assert!(matches!(done, SubmissionOutcome::Succeeded { .. }));
//! assert_eq!(navigator.last().as_deref(), Some("/patients/abc123/register"));
//! ```
//!
//! ## Widgets
//!
//! | Kind          | Widget                                |
//! |---------------|---------------------------------------|
//! | `Text`        | text input, optional leading icon     |
//! | `Email`       | email input, optional leading icon    |
//! | `PhoneNumber` | international phone input (US first)  |
//! | `DatePicker`  | date picker (`MM/DD/YYYY` display)    |
//! | `Select`      | dropdown in declared option order     |
//! | `Checkbox`    | checkbox labelled with the field label |
//! | `TextArea`    | multi-line input                      |
//! | `CustomSlot`  | whatever the caller's renderer returns |

mod error;
pub mod field;
pub mod fields;
mod form;
pub mod navigation;
mod render;
pub mod submission;
pub mod validation;
pub mod value;
pub mod widgets;

pub use error::{FieldErrors, FormError, Result};
pub use field::{CustomRender, FieldDescriptor, FieldIcon, FieldKind, SelectOption};
pub use form::{
    render_bootstrap_field, render_bootstrap_form, ChangeHandle, FormController, FormState,
    ValidationMode,
};
pub use navigation::{Navigator, RecordingNavigator, RoutePattern};
pub use render::{render_field, RenderedField, TEXTAREA_ROWS};
pub use submission::{
    Submission, SubmissionLifecycle, SubmissionOutcome, SubmissionStatus, SubmitError,
    SubmitOutcome,
};
pub use validation::{FieldRules, Schema, ValidationSchema};
pub use value::{FieldValue, FileHandle, FormValues};
