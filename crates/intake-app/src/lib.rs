//! # intake-app
//!
//! The patient registration form wired to a patient service, the admin
//! patient table and the `intake` command-line tool.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use intake_app::registration::RegistrationForm;
//! use intake_app::service::InMemoryPatientService;
//! use intake_forms::{RecordingNavigator, SubmitOutcome};
//!
//! let form = RegistrationForm::new(
//!     Arc::new(InMemoryPatientService::new()),
//!     Arc::new(RecordingNavigator::new()),
//! )
//! .unwrap();
//!
//! // Nothing filled in yet.
//! assert!(matches!(form.submit(), SubmitOutcome::Invalid(_)));
//! ```

pub mod config;
mod error;
pub mod patients;
pub mod registration;
pub mod service;

pub use config::AppConfig;
pub use error::{AppError, Result};
