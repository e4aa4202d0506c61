//! The admin list of registered patients.

use intake_table::{AccessGate, Column, DataTable, GatedView, TableRow};

use crate::error::Result;
use crate::service::UserRecord;

/// Columns of the patient table.
pub fn patient_columns() -> Vec<Column> {
    vec![
        Column::new("name", "Patient"),
        Column::new("email", "Email"),
        Column::new("phone", "Phone"),
        Column::new("created_at", "Registered"),
    ]
}

impl TableRow for UserRecord {
    fn cell(&self, column: &Column) -> String {
        match column.key.as_str() {
            "id" => self.id.clone(),
            "name" => self.name.clone(),
            "email" => self.email.clone(),
            "phone" => self.phone.clone(),
            "created_at" => self.created_at.format("%b %d, %Y").to_string(),
            _ => String::new(),
        }
    }
}

/// Builds the patient table positioned on a zero-based page.
pub fn patient_table(records: &[UserRecord], page_size: usize, page: usize) -> Result<DataTable> {
    let mut table = DataTable::from_records(patient_columns(), records).with_page_size(page_size)?;
    table.set_page_index(page);
    Ok(table)
}

/// Renders the patient table behind the access gate.
pub fn render_patients(
    gate: &AccessGate,
    stored_key: Option<&str>,
    records: &[UserRecord],
    page_size: usize,
    page: usize,
) -> Result<GatedView> {
    let table = patient_table(records, page_size, page)?;
    Ok(gate.render(stored_key, &table))
}
