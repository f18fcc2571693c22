use std::process::Command;
use std::time::{Duration, UNIX_EPOCH};

use serde::Deserialize;

use super::{AccessToken, AuthError, TokenSource};

/// A fixed token, e.g. taken from an environment variable.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn from_env(var: &str) -> Result<Self, AuthError> {
        match std::env::var(var) {
            Ok(v) if !v.trim().is_empty() => Ok(Self::new(v.trim())),
            _ => Err(AuthError::MissingEnv(var.to_string())),
        }
    }
}

impl TokenSource for StaticTokenSource {
    fn acquire(&self) -> Result<AccessToken, AuthError> {
        if self.token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        Ok(AccessToken::new(self.token.clone(), None))
    }
}

/// Runs a token-printing CLI, e.g.
/// `az account get-access-token --resource https://datacatalog.azure.com -o json`.
#[derive(Debug, Clone)]
pub struct CommandTokenSource {
    program: String,
    args: Vec<String>,
}

impl CommandTokenSource {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// First element is the program, the rest are arguments.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl TokenSource for CommandTokenSource {
    fn acquire(&self) -> Result<AccessToken, AuthError> {
        tracing::debug!(program = %self.program, "acquiring token from command");
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| AuthError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(AuthError::CommandFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        parse_token_output(&String::from_utf8_lossy(&output.stdout))
    }
}

#[derive(Debug, Deserialize)]
struct CliToken {
    #[serde(rename = "accessToken")]
    access_token: String,
    /// Unix seconds.
    #[serde(default)]
    expires_on: Option<u64>,
}

/// Accepts either JSON with `accessToken` (and optionally `expires_on`) or a raw token line.
pub fn parse_token_output(stdout: &str) -> Result<AccessToken, AuthError> {
    let trimmed = stdout.trim();
    if trimmed.starts_with('{') {
        let parsed: CliToken = serde_json::from_str(trimmed)?;
        if parsed.access_token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        let expires_at = parsed
            .expires_on
            .map(|secs| UNIX_EPOCH + Duration::from_secs(secs));
        return Ok(AccessToken::new(parsed.access_token, expires_at));
    }
    match trimmed.lines().map(str::trim).find(|l| !l.is_empty()) {
        Some(line) => Ok(AccessToken::new(line, None)),
        None => Err(AuthError::EmptyToken),
    }
}
