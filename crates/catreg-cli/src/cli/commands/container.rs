//! `catreg container` – register only the container.

use anyhow::{Context, Result};
use catreg_core::catalog::register_container;
use catreg_core::config::CatregConfig;

use super::session::PublishOptions;

pub fn run_container(cfg: &CatregConfig, opts: &PublishOptions) -> Result<()> {
    let templates = opts.templates(cfg)?;
    let client = opts.connect(cfg)?;
    let id = register_container(&client, &templates, opts.upn(cfg))
        .context("container registration failed")?;
    println!("{id}");
    Ok(())
}
