//! Spreadsheet table extraction.
//!
//! A [`TableSource`] yields the rows of one named table as ordered
//! column-name -> text maps. [`XlsxTable`] reads them from an Excel workbook.

mod cell_ref;
mod xml;
mod xlsx;

use std::path::PathBuf;

pub use cell_ref::{column_index, parse_cell, CellRange};
pub use xlsx::XlsxTable;

#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("not a valid xlsx package: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("workbook part missing: {0}")]
    MissingPart(String),
    #[error("sheet not found: {0}")]
    SheetNotFound(String),
    #[error("table {table} not found on sheet {sheet}")]
    TableNotFound { sheet: String, table: String },
    #[error("invalid cell reference: {0}")]
    InvalidReference(String),
    #[error("shared string index {0} out of range")]
    SharedString(usize),
    #[error("malformed workbook XML: {0}")]
    Xml(String),
}

/// One table row: column names (in table order) with their cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new(cells: Vec<(String, String)>) -> Self {
        Self { cells }
    }

    /// Convenience for building rows from literals.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Cell text for `column`. Falls back to a case-insensitive match that
    /// ignores spaces, so `Table Name` also answers `TableName`.
    pub fn get(&self, column: &str) -> Option<&str> {
        if let Some((_, v)) = self.cells.iter().find(|(k, _)| k == column) {
            return Some(v);
        }
        let wanted = normalize(column);
        self.cells
            .iter()
            .find(|(k, _)| normalize(k) == wanted)
            .map(|(_, v)| v.as_str())
    }

    pub fn cells(&self) -> &[(String, String)] {
        &self.cells
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Produces the ordered rows of one table.
pub trait TableSource {
    fn rows(&self) -> Result<Vec<Row>, WorkbookError>;
}

impl TableSource for Vec<Row> {
    fn rows(&self) -> Result<Vec<Row>, WorkbookError> {
        Ok(self.clone())
    }
}
