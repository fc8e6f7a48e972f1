//! Configuration loading and validation for adjutant.
//!
//! Settings come from an optional TOML file (`adjutant.toml`, or the
//! path in `ADJUTANT_CONFIG`) with environment variables taking
//! precedence. A `.env` file is honored by the binary before this crate
//! reads the environment.
//!
//! Environment variables:
//!
//! | Variable | Required | Default |
//! |---|---|---|
//! | `OPENAI_API_KEY` | yes, for serve/chat | — |
//! | `OPENAI_BASE_URL` | no | `https://api.openai.com/v1` |
//! | `LLM_MODEL` | no | `gpt-4o-mini` |
//! | `NOTION_TOKEN` | no | — |
//! | `NOTION_VERSION` | no | `2022-06-28` |
//! | `DATABASE_ID` | no | — |
//! | `GITHUB_TOKEN` | no | — |
//! | `GITHUB_DEFAULT_OWNER` | no | — |
//! | `ADJUTANT_HOST` / `ADJUTANT_PORT` | no | `127.0.0.1` / `8000` |
//!
//! Unset backend credentials never block startup: the affected tools
//! answer with a graceful `success == false` result instead.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Language-model provider settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Notion backend settings
    #[serde(default)]
    pub notion: NotionConfig,

    /// GitHub backend settings
    #[serde(default)]
    pub github: GithubConfig,

    /// HTTP gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Settings for the OpenAI-compatible model provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key (`OPENAI_API_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the chat-completions API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name (`LLM_MODEL`)
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per reply (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

/// Settings for the Notion task database.
#[derive(Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Integration token (`NOTION_TOKEN`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// API version header value
    #[serde(default = "default_notion_version")]
    pub version: String,

    /// Task database id (`DATABASE_ID`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
}

fn default_notion_version() -> String {
    "2022-06-28".into()
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: None,
            version: default_notion_version(),
            database_id: None,
        }
    }
}

/// Settings for the GitHub backend.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct GithubConfig {
    /// Personal access token (`GITHUB_TOKEN`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Owner assumed for bare repository names (`GITHUB_DEFAULT_OWNER`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_owner: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Agent loop tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum model↔tool cycles per turn before the turn aborts
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Timeout for one model call (fatal to the turn when exceeded)
    #[serde(default = "default_model_timeout")]
    pub model_timeout_secs: u64,

    /// Timeout for one tool invocation (becomes a failure result)
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,

    /// Replace the built-in system prompt entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,
}

fn default_max_iterations() -> u32 {
    10
}
fn default_model_timeout() -> u64 {
    60
}
fn default_tool_timeout() -> u64 {
    30
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            model_timeout_secs: default_model_timeout(),
            tool_timeout_secs: default_tool_timeout(),
            system_prompt_override: None,
        }
    }
}

impl AgentConfig {
    pub fn model_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.model_timeout_secs)
    }

    pub fn tool_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.tool_timeout_secs)
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl std::fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotionConfig")
            .field("token", &redact(&self.token))
            .field("version", &self.version)
            .field("database_id", &self.database_id)
            .finish()
    }
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("token", &redact(&self.token))
            .field("default_owner", &self.default_owner)
            .finish()
    }
}

/// Read an env var, treating empty strings as unset.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Load configuration from the default file path, then apply
    /// environment overrides.
    ///
    /// The file path is `ADJUTANT_CONFIG` if set, else `adjutant.toml`
    /// in the working directory; a missing file just means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env_opt("ADJUTANT_CONFIG").unwrap_or_else(|| "adjutant.toml".into());
        let mut config = Self::load_from(Path::new(&path))?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(config)
    }

    /// Apply environment variable overrides (highest priority).
    fn apply_env(&mut self) {
        if let Some(key) = env_opt("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(url) = env_opt("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = env_opt("LLM_MODEL") {
            self.llm.model = model;
        }

        if let Some(token) = env_opt("NOTION_TOKEN") {
            self.notion.token = Some(token);
        }
        if let Some(version) = env_opt("NOTION_VERSION") {
            self.notion.version = version;
        }
        if let Some(database_id) = env_opt("DATABASE_ID") {
            self.notion.database_id = Some(database_id);
        }

        if let Some(token) = env_opt("GITHUB_TOKEN") {
            self.github.token = Some(token);
        }
        if let Some(owner) = env_opt("GITHUB_DEFAULT_OWNER") {
            self.github.default_owner = Some(owner);
        }

        if let Some(host) = env_opt("ADJUTANT_HOST") {
            self.gateway.host = host;
        }
        if let Some(port) = env_opt("ADJUTANT_PORT") {
            match port.parse() {
                Ok(port) => self.gateway.port = port,
                Err(_) => tracing::warn!(value = %port, "ignoring unparseable ADJUTANT_PORT"),
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(
                "llm.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_iterations must be at least 1".into(),
            ));
        }

        if self.agent.model_timeout_secs == 0 || self.agent.tool_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "agent timeouts must be at least 1 second".into(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.notion.version, "2022-06-28");
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.agent.max_iterations, 10);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.llm.model, config.llm.model);
        assert_eq!(parsed.gateway.port, config.gateway.port);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.llm.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_iteration_cap_rejected() {
        let mut config = AppConfig::default();
        config.agent.max_iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/adjutant.toml")).unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[llm]
model = "gpt-4o"

[agent]
max_iterations = 5
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.agent.max_iterations, 5);
        // Untouched sections keep their defaults
        assert_eq!(config.notion.version, "2022-06-28");
        assert_eq!(config.gateway.port, 8000);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("sk-super-secret".into());
        config.github.token = Some("ghp_secret".into());

        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-super-secret"));
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
