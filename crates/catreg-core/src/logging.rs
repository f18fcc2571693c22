//! Tracing setup. Events go to `$XDG_STATE_HOME/catreg/catreg.log`; when that
//! file cannot be opened they go to stderr instead.

use anyhow::Result;
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info,catreg=debug,catreg_core=debug";

/// Where [`init_logging`] sent events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    File(PathBuf),
    Stderr,
}

impl fmt::Display for LogDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogDestination::File(path) => write!(f, "{}", path.display()),
            LogDestination::Stderr => f.write_str("stderr"),
        }
    }
}

/// `$XDG_STATE_HOME/catreg/catreg.log`, creating the directory if needed.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("catreg")?;
    Ok(xdg_dirs.place_state_file("catreg.log")?)
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::OpenOptions::new().create(true).append(true).open(path)
}

fn install<W>(writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    // A subscriber installed earlier (tests, embedding) wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
}

/// Installs the global subscriber once per process.
pub fn init_logging() -> LogDestination {
    let opened = log_path().and_then(|path| Ok((open_append(&path)?, path)));
    match opened {
        Ok((file, path)) => {
            install(Mutex::new(file));
            tracing::info!("catreg logging initialized at {}", path.display());
            LogDestination::File(path)
        }
        Err(err) => {
            install(io::stderr);
            tracing::warn!("file logging unavailable, using stderr: {:#}", err);
            LogDestination::Stderr
        }
    }
}
