//! `catreg register` – container, then every workbook row.

use anyhow::{bail, Context, Result};
use catreg_core::catalog::{publish_rows, register_container, PublishEvent};
use catreg_core::config::CatregConfig;
use catreg_core::workbook::TableSource;

use super::session::PublishOptions;
use crate::cli::WorkbookArgs;

pub fn run_register(cfg: &CatregConfig, workbook: &WorkbookArgs, opts: &PublishOptions) -> Result<()> {
    let table = workbook.table(cfg)?;
    let rows = table
        .rows()
        .with_context(|| format!("reading table {} from {}", table.table, table.path.display()))?;
    let templates = opts.templates(cfg)?;
    let upn = opts.upn(cfg);
    let client = opts.connect(cfg)?;

    let container_id =
        register_container(&client, &templates, upn).context("container registration failed")?;
    println!("Container Registered: {container_id}");

    let report = publish_rows(&client, &container_id, &rows, &templates, upn, |event| match event {
        PublishEvent::Registered { table, asset_id } => {
            println!("Data Asset Registered: {table} - {asset_id}")
        }
        PublishEvent::Annotated { asset_id } => {
            println!("Data Asset Description Annotated: {asset_id}")
        }
        PublishEvent::Failed { outcome } => {
            let table = outcome.table.as_deref().unwrap_or("<no table>");
            if let Some(failure) = &outcome.failure {
                eprintln!("Row {} ({table}): {failure}", outcome.index + 1);
            }
        }
    });

    println!(
        "Published {} of {} data assets.",
        report.succeeded(),
        report.outcomes.len()
    );
    if report.failed() > 0 {
        bail!("{} of {} rows failed", report.failed(), report.outcomes.len());
    }
    Ok(())
}
