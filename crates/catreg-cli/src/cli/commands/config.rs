//! `catreg config` – print the config file in use.

use anyhow::Result;
use catreg_core::config;
use std::path::Path;

pub fn run_config(explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => config::config_path()?,
    };
    println!("{}", path.display());
    Ok(())
}
