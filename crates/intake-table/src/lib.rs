//! # intake-table
//!
//! Paginated patient table with a client-side access gate.
//!
//! ## Quick Start
//!
//! ```rust
//! use intake_table::{AccessGate, Column, DataTable, GateDecision};
//!
//! let mut table = DataTable::new(
//!     vec![Column::new("name", "Patient"), Column::new("email", "Email")],
//!     vec![
//!         vec!["Jane Doe".to_string(), "jane@example.com".to_string()],
//!         vec!["John Roe".to_string(), "john@example.com".to_string()],
//!     ],
//! )
//! .unwrap()
//! .with_page_size(1)
//! .unwrap();
//!
//! assert_eq!(table.page_rows()[0][0], "Jane Doe");
//! assert!(table.next_page());
//! assert_eq!(table.page_rows()[0][0], "John Roe");
//! assert!(!table.can_next_page());
//!
//! let gate = AccessGate::new("111111");
//! assert_eq!(gate.check(Some("MTExMTEx")), GateDecision::Granted);
//! assert_eq!(gate.check(Some("MjIyMjIy")), GateDecision::Redirect("/".into()));
//! ```
//!
//! The access gate compares a key kept in browser storage with the expected
//! passkey. It only decides what the page shows; it protects nothing.

mod error;
mod gate;
mod table;
mod templates;

pub use error::{Result, TableError};
pub use gate::{encode_key, AccessGate, GateDecision, GatedView, DEFAULT_REDIRECT};
pub use table::{Column, DataTable, PageInfo, TableRow, DEFAULT_PAGE_SIZE};
pub use templates::render_data_table;
