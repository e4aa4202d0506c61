//! Client-side paginated table.

use serde::Serialize;

use crate::error::{Result, TableError};

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Key of the value shown in this column.
    pub key: String,
    /// Header text.
    pub header: String,
}

impl Column {
    /// Creates a column.
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
        }
    }
}

/// A record that can be shown as a table row.
pub trait TableRow {
    /// The text of the cell under `column`.
    fn cell(&self, column: &Column) -> String;
}

/// Pagination summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Zero-based page index.
    pub page_index: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Number of pages; at least 1.
    pub page_count: usize,
    /// Number of rows over all pages.
    pub total_rows: usize,
}

/// Rows and columns with a current page.
#[derive(Debug, Clone)]
pub struct DataTable {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    page_size: usize,
    page_index: usize,
}

impl DataTable {
    /// Creates a table. Every row must have one cell per column.
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(TableError::ColumnMismatch {
                row,
                expected: columns.len(),
                found: cells.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 0,
        })
    }

    /// Creates a table from records, one row each.
    pub fn from_records<'a, R: TableRow + 'a>(
        columns: Vec<Column>,
        records: impl IntoIterator<Item = &'a R>,
    ) -> Self {
        let rows = records
            .into_iter()
            .map(|record| columns.iter().map(|c| record.cell(c)).collect())
            .collect();
        Self {
            columns,
            rows,
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 0,
        }
    }

    /// Sets the page size and goes back to the first page.
    pub fn with_page_size(mut self, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(TableError::InvalidPageSize);
        }
        self.page_size = page_size;
        self.page_index = 0;
        Ok(self)
    }

    /// The columns.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of rows over all pages.
    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of pages; an empty table has one empty page.
    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(self.page_size).max(1)
    }

    /// Zero-based index of the current page.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Pagination summary.
    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            page_index: self.page_index,
            page_size: self.page_size,
            page_count: self.page_count(),
            total_rows: self.rows.len(),
        }
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> &[Vec<String>] {
        let start = (self.page_index * self.page_size).min(self.rows.len());
        let end = (start + self.page_size).min(self.rows.len());
        &self.rows[start..end]
    }

    /// Whether there is a page before the current one.
    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    /// Whether there is a page after the current one.
    pub fn can_next_page(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    /// Moves to the previous page. Returns `false` on the first page.
    pub fn previous_page(&mut self) -> bool {
        if !self.can_previous_page() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Moves to the next page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.can_next_page() {
            return false;
        }
        self.page_index += 1;
        true
    }

    /// Jumps to a page, clamped to the last one.
    pub fn set_page_index(&mut self, page_index: usize) {
        self.page_index = page_index.min(self.page_count() - 1);
    }
}
