//! Row-by-row registration of workbook tables under a container.

use std::fmt;

use super::client::Catalog;
use super::endpoint::ViewType;
use crate::payload::{description_payload, PayloadError, PayloadTemplates};
use crate::retry::Failure;
use crate::workbook::Row;

pub const TABLE_COLUMN: &str = "Table";
pub const DESCRIPTION_COLUMN: &str = "Description";
pub const DESCRIPTIONS_ANNOTATION: &str = "descriptions";

/// Where a row's processing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Render,
    Register,
    Annotate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Render => "render",
            Stage::Register => "register",
            Stage::Annotate => "annotate",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("row has no {0:?} column")]
    MissingColumn(&'static str),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Catalog(#[from] Failure),
}

#[derive(Debug)]
pub struct RowFailure {
    pub stage: Stage,
    pub error: PublishError,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

/// Result for one row; `asset_id` is set once registration succeeded.
#[derive(Debug)]
pub struct RowOutcome {
    pub index: usize,
    pub table: Option<String>,
    pub asset_id: Option<String>,
    pub failure: Option<RowFailure>,
}

impl RowOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Default)]
pub struct PublishReport {
    pub outcomes: Vec<RowOutcome>,
}

impl PublishReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Progress notifications, emitted as each step completes.
#[derive(Debug)]
pub enum PublishEvent<'a> {
    Registered { table: &'a str, asset_id: &'a str },
    Annotated { asset_id: &'a str },
    Failed { outcome: &'a RowOutcome },
}

/// Registers the container described by the container template; returns its `Location`.
pub fn register_container<C: Catalog>(
    catalog: &C,
    templates: &PayloadTemplates,
    upn: &str,
) -> Result<String, PublishError> {
    let payload = templates.container_payload(upn)?;
    Ok(catalog.register(ViewType::Containers, &payload)?)
}

/// For each row in order: render the asset payload, register it, then post
/// the row's description against the returned location. A failing row is
/// reported and the remaining rows still run.
pub fn publish_rows<C, F>(
    catalog: &C,
    container_id: &str,
    rows: &[Row],
    templates: &PayloadTemplates,
    upn: &str,
    mut observe: F,
) -> PublishReport
where
    C: Catalog,
    F: FnMut(PublishEvent<'_>),
{
    let mut report = PublishReport::default();
    for (index, row) in rows.iter().enumerate() {
        let mut outcome = RowOutcome {
            index,
            table: row.get(TABLE_COLUMN).map(str::to_string),
            asset_id: None,
            failure: None,
        };
        if let Err(failure) = publish_row(catalog, container_id, row, templates, upn, &mut outcome, &mut observe) {
            tracing::warn!(row = index, table = ?outcome.table, %failure, "row not published");
            outcome.failure = Some(failure);
            observe(PublishEvent::Failed { outcome: &outcome });
        }
        report.outcomes.push(outcome);
    }
    tracing::info!(succeeded = report.succeeded(), failed = report.failed(), "publish finished");
    report
}

fn publish_row<C, F>(
    catalog: &C,
    container_id: &str,
    row: &Row,
    templates: &PayloadTemplates,
    upn: &str,
    outcome: &mut RowOutcome,
    observe: &mut F,
) -> Result<(), RowFailure>
where
    C: Catalog,
    F: FnMut(PublishEvent<'_>),
{
    let at = |stage: Stage| move |error: PublishError| RowFailure { stage, error };

    let table = row
        .get(TABLE_COLUMN)
        .ok_or(PublishError::MissingColumn(TABLE_COLUMN))
        .map_err(at(Stage::Render))?;
    let payload = templates
        .asset_payload(container_id, table, upn)
        .map_err(|e| at(Stage::Render)(e.into()))?;

    let asset_id = catalog
        .register(ViewType::Tables, &payload)
        .map_err(|e| at(Stage::Register)(e.into()))?;
    observe(PublishEvent::Registered { table, asset_id: &asset_id });
    outcome.asset_id = Some(asset_id.clone());

    let description = row.get(DESCRIPTION_COLUMN).unwrap_or("");
    let body = description_payload(description).map_err(|e| at(Stage::Annotate)(e.into()))?;
    catalog
        .annotate(&asset_id, DESCRIPTIONS_ANNOTATION, &body)
        .map_err(|e| at(Stage::Annotate)(e.into()))?;
    observe(PublishEvent::Annotated { asset_id: &asset_id });
    Ok(())
}
