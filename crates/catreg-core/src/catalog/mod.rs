//! Catalog REST surface: endpoint URLs, the client, and table publishing.

mod client;
mod endpoint;
mod publish;

pub use client::{Catalog, CatalogClient};
pub use endpoint::{CatalogEndpoint, ViewType};
pub use publish::{
    publish_rows, register_container, PublishError, PublishEvent, PublishReport, RowFailure,
    RowOutcome, Stage, DESCRIPTIONS_ANNOTATION, DESCRIPTION_COLUMN, TABLE_COLUMN,
};
