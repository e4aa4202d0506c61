//! Application configuration.

use std::path::PathBuf;

use intake_table::{AccessGate, DEFAULT_PAGE_SIZE};

/// Default location of the patient store.
pub const DEFAULT_STORE: &str = "patients.json";

/// Settings passed down from the command line.
#[derive(Clone)]
pub struct AppConfig {
    /// Passkey expected by the patient table gate.
    pub admin_passkey: Option<String>,
    /// Rows per table page.
    pub page_size: usize,
    /// JSON file holding created patients.
    pub store: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("admin_passkey", &self.admin_passkey.as_ref().map(|_| "***"))
            .field("page_size", &self.page_size)
            .field("store", &self.store)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin_passkey: None,
            page_size: DEFAULT_PAGE_SIZE,
            store: PathBuf::from(DEFAULT_STORE),
        }
    }
}

impl AppConfig {
    /// The access gate, when a passkey is configured.
    pub fn access_gate(&self) -> Option<AccessGate> {
        self.admin_passkey.as_deref().map(AccessGate::new)
    }
}
