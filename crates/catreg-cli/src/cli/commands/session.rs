//! Shared setup for commands that talk to the catalog.

use anyhow::{bail, Context, Result};
use catreg_core::auth::{CachedTokenProvider, TokenSource};
use catreg_core::catalog::CatalogClient;
use catreg_core::config::CatregConfig;
use catreg_core::http::{CurlTransport, HttpExecutor};
use catreg_core::payload::PayloadTemplates;
use catreg_core::workbook::XlsxTable;
use std::path::PathBuf;

use crate::cli::WorkbookArgs;

pub type Client = CatalogClient<CurlTransport, CachedTokenProvider<Box<dyn TokenSource>>>;

/// Flag overrides shared by `register` and `container`.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    pub upn: Option<String>,
    pub catalog: Option<String>,
    pub container_template: Option<PathBuf>,
    pub asset_template: Option<PathBuf>,
}

impl PublishOptions {
    pub fn upn<'a>(&'a self, cfg: &'a CatregConfig) -> &'a str {
        self.upn.as_deref().unwrap_or(&cfg.upn)
    }

    pub fn templates(&self, cfg: &CatregConfig) -> Result<PayloadTemplates> {
        let t = cfg.templates.clone().unwrap_or_default();
        let container = self.container_template.clone().or(t.container);
        let asset = self.asset_template.clone().or(t.asset);
        PayloadTemplates::load(container.as_deref(), asset.as_deref())
            .context("loading payload templates")
    }

    /// Catalog client for `cfg` with the `--catalog` override applied.
    pub fn connect(&self, cfg: &CatregConfig) -> Result<Client> {
        let mut cfg = cfg.clone();
        if let Some(name) = &self.catalog {
            cfg.catalog_name = name.clone();
        }
        let endpoint = cfg.endpoint()?;
        let source = cfg.auth().token_source().context("no access token available")?;
        let executor = HttpExecutor::new(
            cfg.transport(),
            CachedTokenProvider::new(source),
            cfg.retry_policy()?,
        )
        .with_max_redirects(cfg.max_redirects);
        tracing::info!(catalog = endpoint.catalog(), "catalog client ready");
        Ok(CatalogClient::new(executor, endpoint))
    }
}

impl WorkbookArgs {
    /// Flags first, then the `[workbook]` section.
    pub fn table(&self, cfg: &CatregConfig) -> Result<XlsxTable> {
        let wb = cfg.workbook();
        let Some(path) = self.workbook.clone().or(wb.path) else {
            bail!("no workbook given: pass --workbook or set [workbook] path in config");
        };
        let sheet = self.sheet.clone().unwrap_or(wb.sheet);
        let table = self.table.clone().unwrap_or(wb.table);
        Ok(XlsxTable::new(path, sheet, table))
    }
}
