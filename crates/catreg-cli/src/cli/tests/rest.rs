//! Tests for preview, config and config loading.

use super::{parse, parse_cli};
use crate::cli::{load_config, Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_preview() {
    match parse(&["catreg", "preview", "--workbook", "x.xlsx", "--table", "T"]) {
        CliCommand::Preview { workbook } => {
            assert_eq!(workbook.workbook.as_deref(), Some(std::path::Path::new("x.xlsx")));
            assert!(workbook.sheet.is_none());
            assert_eq!(workbook.table.as_deref(), Some("T"));
        }
        _ => panic!("expected Preview"),
    }
}

#[test]
fn cli_parse_config() {
    let cli = parse_cli(&["catreg", "--config", "c.toml", "config"]);
    assert!(matches!(cli.command, CliCommand::Config));
    assert!(cli.config.is_some());
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["catreg", "upload"]).is_err());
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["catreg"]).is_err());
}

#[test]
fn explicit_config_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());

    let path = dir.path().join("catreg.toml");
    std::fs::write(
        &path,
        r#"
            catalog_name = "Sales"
            tenant_id = "contoso"
            api_version = "2015-07.1.0-Preview"
            upn = "owner@contoso.com"
            max_redirects = 3
        "#,
    )
    .unwrap();
    let cfg = load_config(Some(&path)).unwrap();
    assert_eq!(cfg.catalog_name, "Sales");
    assert_eq!(cfg.max_redirects, 3);
}
