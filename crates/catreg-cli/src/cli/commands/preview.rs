//! `catreg preview` – show the rows `register` would publish.

use anyhow::{Context, Result};
use catreg_core::catalog::{DESCRIPTION_COLUMN, TABLE_COLUMN};
use catreg_core::config::CatregConfig;
use catreg_core::workbook::TableSource;

use crate::cli::WorkbookArgs;

pub fn run_preview(cfg: &CatregConfig, workbook: &WorkbookArgs) -> Result<()> {
    let table = workbook.table(cfg)?;
    let rows = table
        .rows()
        .with_context(|| format!("reading table {} from {}", table.table, table.path.display()))?;
    if rows.is_empty() {
        println!("No rows in table {}.", table.table);
        return Ok(());
    }
    println!("{:<4} {:<32} {}", "ROW", TABLE_COLUMN.to_uppercase(), DESCRIPTION_COLUMN.to_uppercase());
    for (i, row) in rows.iter().enumerate() {
        println!(
            "{:<4} {:<32} {}",
            i + 1,
            row.get(TABLE_COLUMN).unwrap_or("-"),
            row.get(DESCRIPTION_COLUMN).unwrap_or("")
        );
    }
    Ok(())
}
