//! CLI for catreg.

mod commands;

use anyhow::Result;
use catreg_core::config::{self, CatregConfig};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use commands::{run_config, run_container, run_preview, run_register, PublishOptions};

/// Top-level CLI for catreg.
#[derive(Debug, Parser)]
#[command(name = "catreg")]
#[command(about = "Register spreadsheet-listed tables as data catalog assets", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/catreg/config.toml (must exist).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Where to read the asset table from; unset values come from `[workbook]`.
#[derive(Debug, Clone, Default, Args)]
pub struct WorkbookArgs {
    /// Path to the .xlsx workbook.
    #[arg(long, value_name = "PATH")]
    pub workbook: Option<PathBuf>,
    /// Worksheet holding the table.
    #[arg(long)]
    pub sheet: Option<String>,
    /// Name of the table (ListObject) on that sheet.
    #[arg(long)]
    pub table: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Register the container, then one table asset (plus description) per workbook row.
    Register {
        #[command(flatten)]
        workbook: WorkbookArgs,
        /// Owner/expert UPN recorded on every asset.
        #[arg(long)]
        upn: Option<String>,
        /// Catalog name (default from config).
        #[arg(long)]
        catalog: Option<String>,
        /// JSON template file for the container payload.
        #[arg(long, value_name = "FILE")]
        container_template: Option<PathBuf>,
        /// JSON template file for each table asset payload.
        #[arg(long, value_name = "FILE")]
        asset_template: Option<PathBuf>,
    },

    /// Register only the container and print its id.
    Container {
        #[arg(long)]
        upn: Option<String>,
        #[arg(long)]
        catalog: Option<String>,
        #[arg(long, value_name = "FILE")]
        container_template: Option<PathBuf>,
    },

    /// Print the rows that would be registered, without contacting the catalog.
    Preview {
        #[command(flatten)]
        workbook: WorkbookArgs,
    },

    /// Print the path of the config file in use.
    Config,
}

/// Explicit `--config` must exist; otherwise the XDG file is created on first use.
pub fn load_config(explicit: Option<&Path>) -> Result<CatregConfig> {
    match explicit {
        Some(path) => config::load_from(path),
        None => config::load_or_init(),
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Register {
                workbook,
                upn,
                catalog,
                container_template,
                asset_template,
            } => {
                let opts = PublishOptions {
                    upn,
                    catalog,
                    container_template,
                    asset_template,
                };
                run_register(&cfg, &workbook, &opts)?;
            }
            CliCommand::Container {
                upn,
                catalog,
                container_template,
            } => {
                let opts = PublishOptions {
                    upn,
                    catalog,
                    container_template,
                    asset_template: None,
                };
                run_container(&cfg, &opts)?;
            }
            CliCommand::Preview { workbook } => run_preview(&cfg, &workbook)?,
            CliCommand::Config => run_config(cli.config.as_deref())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
