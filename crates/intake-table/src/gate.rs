//! Client-side access gate for the admin table.
//!
//! The browser keeps the passkey the admin entered, base64-encoded. The gate
//! decodes it and compares it with the expected passkey. This decides what the
//! page renders and nothing more: the expected key ships with the page, so
//! anyone can read it. Do not rely on the gate to protect data.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};

use crate::error::Result;
use crate::table::DataTable;
use crate::templates::render_data_table;

/// Where a mismatching key is sent.
pub const DEFAULT_REDIRECT: &str = "/";

/// What the page should do for a stored key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The stored key matches; show the table.
    Granted,
    /// No key is stored; the table is shown.
    Unverified,
    /// The stored key does not match; leave for this route.
    Redirect(String),
}

impl GateDecision {
    /// Whether the table is shown.
    pub fn shows_table(&self) -> bool {
        matches!(self, Self::Granted | Self::Unverified)
    }
}

/// A gated page: the table markup, or where to go instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatedView {
    /// Table markup.
    Table(String),
    /// Route to navigate to.
    Redirect(String),
}

/// Compares a stored access key with the expected passkey.
#[derive(Clone)]
pub struct AccessGate {
    expected_key: String,
    redirect: String,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("redirect", &self.redirect)
            .finish_non_exhaustive()
    }
}

impl AccessGate {
    /// Creates a gate expecting `expected_key` that redirects to `/`.
    pub fn new(expected_key: impl Into<String>) -> Self {
        Self {
            expected_key: expected_key.into(),
            redirect: DEFAULT_REDIRECT.to_string(),
        }
    }

    /// Sets the route a mismatching key is sent to.
    #[must_use]
    pub fn redirect_to(mut self, route: impl Into<String>) -> Self {
        self.redirect = route.into();
        self
    }

    /// Decodes a stored key.
    pub fn decode_key(stored: &str) -> Result<String> {
        let bytes = STANDARD.decode(stored.trim())?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Decides what to do for the key in storage, if any.
    ///
    /// A key that cannot be decoded counts as a mismatch.
    pub fn check(&self, stored: Option<&str>) -> GateDecision {
        let Some(stored) = stored.filter(|s| !s.is_empty()) else {
            debug!("no stored access key");
            return GateDecision::Unverified;
        };

        match Self::decode_key(stored) {
            Ok(key) if key == self.expected_key => GateDecision::Granted,
            Ok(_) => {
                warn!(redirect = %self.redirect, "stored access key does not match");
                GateDecision::Redirect(self.redirect.clone())
            }
            Err(err) => {
                warn!(error = %err, redirect = %self.redirect, "stored access key unreadable");
                GateDecision::Redirect(self.redirect.clone())
            }
        }
    }

    /// Renders the table when the gate lets it through.
    pub fn render(&self, stored: Option<&str>, table: &DataTable) -> GatedView {
        match self.check(stored) {
            GateDecision::Redirect(route) => GatedView::Redirect(route),
            GateDecision::Granted | GateDecision::Unverified => {
                GatedView::Table(render_data_table(table))
            }
        }
    }
}

/// Encodes a passkey the way the browser stores it.
pub fn encode_key(key: &str) -> String {
    STANDARD.encode(key)
}
