//! Client configuration.
//!
//! Configuration is resolved once at startup into a [`ClientConfig`] that is
//! handed to [`HttpGuidanceClient::new`](crate::HttpGuidanceClient::new).
//! Nothing reads the environment after that point.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pathfinder_core::model::AnswerPolicy;

/// Used when neither a flag, the config file, nor the environment names a back end.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Environment variable consulted for the base URL.
pub const BASE_URL_ENV: &str = "PATHFINDER_API_BASE_URL";

/// Environment variable consulted for the bearer token.
pub const TOKEN_ENV: &str = "PATHFINDER_TOKEN";

/// Resolved settings for talking to the back end.
///
/// `Debug` masks the token.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Bearer token attached to authenticated calls.
    pub token: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ClientConfig {
    /// A config pointing at `base_url` with default timeout and no token.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            timeout: Duration::from_secs(default_timeout()),
            token: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// The `[api]` table of the config file.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub token: Option<String>,
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout(),
            token: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// Top-level pathfinder configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathfinderConfig {
    /// Back end connection settings.
    #[serde(default)]
    pub api: ApiSettings,
    /// Quiz used when `take` is run without `--quiz`.
    #[serde(default)]
    pub default_quiz: Option<PathBuf>,
    /// Catalog used when `recommendations` is run without `--catalog`.
    #[serde(default)]
    pub default_catalog: Option<PathBuf>,
    /// How answers are checked against question options.
    #[serde(default)]
    pub answer_policy: AnswerPolicy,
}

impl PathfinderConfig {
    /// Resolve the client settings.
    ///
    /// The base URL comes from, in order: `flag`, the config file, the
    /// `PATHFINDER_API_BASE_URL` value in `env_base_url`, then
    /// [`DEFAULT_BASE_URL`].
    pub fn client_config(&self, flag: Option<&str>, env_base_url: Option<&str>) -> ClientConfig {
        let base_url = [flag, self.api.base_url.as_deref(), env_base_url]
            .into_iter()
            .flatten()
            .find(|url| !url.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_URL);

        ClientConfig {
            base_url: normalize_base_url(base_url),
            timeout: Duration::from_secs(self.api.timeout_secs.max(1)),
            token: self.api.token.clone().filter(|t| !t.is_empty()),
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `pathfinder.toml` in the current directory
/// 2. `~/.config/pathfinder/config.toml`
///
/// Environment variable fallback: `PATHFINDER_TOKEN` when no token is configured.
pub fn load_config() -> Result<PathfinderConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<PathfinderConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("pathfinder.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config_file(&path)?
        }
        None => PathfinderConfig::default(),
    };

    if config.api.token.is_none() {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            config.api.token = Some(token);
        }
    }

    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<PathfinderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config_str(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Parse config TOML, expanding `${VAR}` references in the `[api]` values.
pub fn parse_config_str(content: &str) -> Result<PathfinderConfig> {
    let mut config: PathfinderConfig = toml::from_str(content)?;
    config.api.base_url = config.api.base_url.as_deref().map(resolve_env_vars);
    config.api.token = config.api.token.as_deref().map(resolve_env_vars);
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("pathfinder"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_PATHFINDER_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_PATHFINDER_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_PATHFINDER_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars ${unterminated"), "no vars ${unterminated");
        std::env::remove_var("_PATHFINDER_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = PathfinderConfig::default();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.answer_policy, AnswerPolicy::Strict);
        let client = config.client_config(None, None);
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert!(client.token.is_none());
    }

    #[test]
    fn base_url_resolution_order() {
        let mut config = PathfinderConfig::default();
        assert_eq!(
            config.client_config(None, Some("http://env:8000/")).base_url,
            "http://env:8000"
        );

        config.api.base_url = Some("https://api.pathfinder.test/".into());
        assert_eq!(
            config.client_config(None, Some("http://env:8000")).base_url,
            "https://api.pathfinder.test"
        );
        assert_eq!(
            config
                .client_config(Some("http://flag:9000"), Some("http://env:8000"))
                .base_url,
            "http://flag:9000"
        );
    }

    #[test]
    fn empty_values_fall_through() {
        let mut config = PathfinderConfig::default();
        config.api.base_url = Some("   ".into());
        config.api.token = Some(String::new());
        let client = config.client_config(None, None);
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
        assert!(client.token.is_none());
    }

    #[test]
    fn parse_config_file_contents() {
        let toml_str = r#"
default_quiz = "assessments/career.toml"
answer_policy = "permissive"

[api]
base_url = "https://api.pathfinder.test"
timeout_secs = 10
token = "tok-123"
"#;
        let config = parse_config_str(toml_str).unwrap();
        assert_eq!(config.answer_policy, AnswerPolicy::Permissive);
        assert_eq!(
            config.default_quiz.as_deref(),
            Some(Path::new("assessments/career.toml"))
        );
        let client = config.client_config(None, None);
        assert_eq!(client.timeout, Duration::from_secs(10));
        assert_eq!(client.token.as_deref(), Some("tok-123"));
    }

    #[test]
    fn debug_masks_token() {
        let client = ClientConfig::new("http://localhost:5000").with_token("secret-token");
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pathfinder.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://example.test/\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(
            config.client_config(None, None).base_url,
            "http://example.test"
        );

        let missing = dir.path().join("missing.toml");
        assert!(load_config_from(Some(&missing)).is_err());
    }
}
