//! Request bodies: rendered container/asset templates and description annotations.

mod annotation;
mod template;

use std::fs;
use std::path::{Path, PathBuf};

pub use annotation::description_payload;
pub use template::render;

const DEFAULT_CONTAINER_TEMPLATE: &str = include_str!("../../templates/container.json");
const DEFAULT_ASSET_TEMPLATE: &str = include_str!("../../templates/asset.json");

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("cannot read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template placeholder {{{index}}} has no argument ({provided} given)")]
    MissingArgument { index: usize, provided: usize },
    #[error("invalid placeholder index {0}")]
    Placeholder(String),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Container template (`{0}` = UPN) and asset template
/// (`{0}` = container id, `{1}` = table name, `{2}` = UPN).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadTemplates {
    pub container: String,
    pub asset: String,
}

impl Default for PayloadTemplates {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER_TEMPLATE.to_string(),
            asset: DEFAULT_ASSET_TEMPLATE.to_string(),
        }
    }
}

impl PayloadTemplates {
    /// Built-in templates, each replaced by the file at the given path if any.
    pub fn load(container: Option<&Path>, asset: Option<&Path>) -> Result<Self, PayloadError> {
        let mut templates = Self::default();
        if let Some(p) = container {
            templates.container = read_template(p)?;
        }
        if let Some(p) = asset {
            templates.asset = read_template(p)?;
        }
        Ok(templates)
    }

    pub fn container_payload(&self, upn: &str) -> Result<String, PayloadError> {
        render(&self.container, &[upn])
    }

    pub fn asset_payload(&self, container_id: &str, table: &str, upn: &str) -> Result<String, PayloadError> {
        render(&self.asset, &[container_id, table, upn])
    }
}

fn read_template(path: &Path) -> Result<String, PayloadError> {
    fs::read_to_string(path).map_err(|source| PayloadError::Read {
        path: path.to_path_buf(),
        source,
    })
}
