use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::{AuthError, CommandTokenSource, StaticTokenSource, TokenSource};
use crate::catalog::CatalogEndpoint;
use crate::http::{CurlTransport, DEFAULT_MAX_REDIRECTS};
use crate::payload::PayloadTemplates;
use crate::retry::{HttpTransientClassifier, RetryPolicy};

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per logical request (including the first).
    pub max_attempts: u32,
    /// Delay before the first retry, doubled per attempt.
    pub min_backoff_ms: u64,
    /// Upper bound on any single delay.
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_backoff_ms: 100,
            max_backoff_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let t = CurlTransport::default();
        Self {
            connect_timeout_secs: t.connect_timeout.as_secs(),
            timeout_secs: t.timeout.as_secs(),
        }
    }
}

/// Where the asset list lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbookConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    pub sheet: String,
    pub table: String,
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        Self {
            path: None,
            sheet: "AdventureWorks2014".to_string(),
            table: "Table1".to_string(),
        }
    }
}

/// Optional replacements for the built-in payload templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default)]
    pub container: Option<PathBuf>,
    #[serde(default)]
    pub asset: Option<PathBuf>,
}

/// Token acquisition. `command` wins over `token_env` when both are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub token_env: String,
    #[serde(default)]
    pub command: Option<Vec<String>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_env: "CATREG_ACCESS_TOKEN".to_string(),
            command: None,
        }
    }
}

impl AuthConfig {
    pub fn token_source(&self) -> Result<Box<dyn TokenSource>, AuthError> {
        if let Some(source) = self.command.as_deref().and_then(CommandTokenSource::from_argv) {
            return Ok(Box::new(source));
        }
        Ok(Box::new(StaticTokenSource::from_env(&self.token_env)?))
    }
}

/// Global configuration loaded from `~/.config/catreg/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatregConfig {
    pub catalog_name: String,
    /// Directory tenant; used to derive the catalog host.
    #[serde(default)]
    pub tenant_id: String,
    /// Overrides the host derived from `tenant_id` (e.g. a test server).
    #[serde(default)]
    pub base_url: Option<String>,
    pub api_version: String,
    /// Owner / expert recorded on registered assets.
    pub upn: String,
    pub max_redirects: u32,
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub http: Option<HttpConfig>,
    #[serde(default)]
    pub workbook: Option<WorkbookConfig>,
    #[serde(default)]
    pub templates: Option<TemplatesConfig>,
    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

impl Default for CatregConfig {
    fn default() -> Self {
        Self {
            catalog_name: "DefaultCatalog".to_string(),
            tenant_id: String::new(),
            base_url: None,
            api_version: CatalogEndpoint::DEFAULT_API_VERSION.to_string(),
            upn: "user1@contoso.com".to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            retry: Some(RetryConfig::default()),
            http: None,
            workbook: Some(WorkbookConfig::default()),
            templates: None,
            auth: Some(AuthConfig::default()),
        }
    }
}

impl CatregConfig {
    pub fn endpoint(&self) -> Result<CatalogEndpoint> {
        match self.base_url.as_deref() {
            Some(base) if !base.trim().is_empty() => Ok(CatalogEndpoint::new(
                base.trim(),
                &self.catalog_name,
                &self.api_version,
            )),
            _ if !self.tenant_id.trim().is_empty() => Ok(CatalogEndpoint::for_tenant(
                self.tenant_id.trim(),
                &self.catalog_name,
                &self.api_version,
            )),
            _ => bail!("config needs either tenant_id or base_url"),
        }
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        let retry = self.retry.clone().unwrap_or_default();
        RetryPolicy::new(
            HttpTransientClassifier,
            retry.max_attempts,
            Duration::from_millis(retry.min_backoff_ms),
            Duration::from_millis(retry.max_backoff_ms),
        )
        .context("invalid [retry] section")
    }

    pub fn transport(&self) -> CurlTransport {
        let http = self.http.clone().unwrap_or_default();
        CurlTransport {
            connect_timeout: Duration::from_secs(http.connect_timeout_secs),
            timeout: Duration::from_secs(http.timeout_secs),
        }
    }

    pub fn workbook(&self) -> WorkbookConfig {
        self.workbook.clone().unwrap_or_default()
    }

    pub fn auth(&self) -> AuthConfig {
        self.auth.clone().unwrap_or_default()
    }

    pub fn templates(&self) -> Result<PayloadTemplates> {
        let t = self.templates.clone().unwrap_or_default();
        Ok(PayloadTemplates::load(t.container.as_deref(), t.asset.as_deref())?)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("catreg")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CatregConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CatregConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load an explicitly named config file; it must exist.
pub fn load_from(path: &Path) -> Result<CatregConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let cfg: CatregConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        catalog_name = "DefaultCatalog"
        api_version = "2015-07.1.0-Preview"
        upn = "user1@contoso.com"
        max_redirects = 5
    "#;

    #[test]
    fn default_config_values() {
        let cfg = CatregConfig::default();
        assert_eq!(cfg.catalog_name, "DefaultCatalog");
        assert_eq!(cfg.api_version, "2015-07.1.0-Preview");
        assert_eq!(cfg.upn, "user1@contoso.com");
        assert_eq!(cfg.max_redirects, 5);
        assert_eq!(cfg.workbook().sheet, "AdventureWorks2014");
        assert_eq!(cfg.workbook().table, "Table1");
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = CatregConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: CatregConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn minimal_config_uses_defaults_for_sections() {
        let cfg: CatregConfig = toml::from_str(MINIMAL).unwrap();
        assert!(cfg.retry.is_none());
        assert!(cfg.auth.is_none());
        let policy = cfg.retry_policy().unwrap();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(cfg.auth().token_env, "CATREG_ACCESS_TOKEN");
        assert_eq!(cfg.transport().timeout, Duration::from_secs(60));
    }

    #[test]
    fn endpoint_from_tenant_or_override() {
        let mut cfg: CatregConfig = toml::from_str(MINIMAL).unwrap();
        assert!(cfg.endpoint().is_err());

        cfg.tenant_id = "contoso".to_string();
        assert_eq!(
            cfg.endpoint().unwrap(),
            CatalogEndpoint::for_tenant("contoso", "DefaultCatalog", "2015-07.1.0-Preview")
        );

        cfg.base_url = Some("http://127.0.0.1:9000".to_string());
        assert_eq!(
            cfg.endpoint().unwrap(),
            CatalogEndpoint::new("http://127.0.0.1:9000", "DefaultCatalog", "2015-07.1.0-Preview")
        );
    }

    #[test]
    fn config_toml_sections() {
        let toml = format!(
            "{}{}",
            MINIMAL,
            r#"
            tenant_id = "contoso"

            [retry]
            max_attempts = 3
            min_backoff_ms = 50
            max_backoff_ms = 400

            [http]
            connect_timeout_secs = 5
            timeout_secs = 20

            [workbook]
            path = "assets.xlsx"
            sheet = "Sheet1"
            table = "Assets"

            [templates]
            asset = "asset.json"

            [auth]
            token_env = "ADC_TOKEN"
            command = ["az", "account", "get-access-token"]
        "#
        );
        let cfg: CatregConfig = toml::from_str(&toml).unwrap();
        let policy = cfg.retry_policy().unwrap();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.backoff(1), Duration::from_millis(50));
        assert_eq!(cfg.transport().connect_timeout, Duration::from_secs(5));
        let wb = cfg.workbook();
        assert_eq!(wb.path.as_deref(), Some(Path::new("assets.xlsx")));
        assert_eq!(wb.table, "Assets");
        let templates = cfg.templates.as_ref().unwrap();
        assert!(templates.container.is_none());
        assert_eq!(templates.asset.as_deref(), Some(Path::new("asset.json")));
        assert_eq!(cfg.auth().command.unwrap()[0], "az");
    }

    #[test]
    fn invalid_retry_section_is_rejected() {
        let mut cfg = CatregConfig::default();
        cfg.retry = Some(RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        });
        assert!(cfg.retry_policy().is_err());
        cfg.retry = Some(RetryConfig {
            max_attempts: 2,
            min_backoff_ms: 900,
            max_backoff_ms: 100,
        });
        assert!(cfg.retry_policy().is_err());
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catreg.toml");
        fs::write(&path, format!("{}tenant_id = \"t1\"\n", MINIMAL)).unwrap();
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.tenant_id, "t1");
        assert!(load_from(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn command_auth_wins_over_env() {
        let auth = AuthConfig {
            token_env: "CATREG_TEST_UNSET_VARIABLE".to_string(),
            command: Some(vec!["echo".to_string(), "tok".to_string()]),
        };
        assert!(auth.token_source().is_ok());
        let env_only = AuthConfig {
            command: None,
            ..auth
        };
        assert!(matches!(
            env_only.token_source(),
            Err(AuthError::MissingEnv(_))
        ));
    }
}
