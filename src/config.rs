//! Configuration loading.
//!
//! Loads `config.toml` from `$SMARTSENSE_CONFIG` or `~/.smartsense/`.
//! Every field has a default and a missing file yields the defaults.
//! Precedence: env vars > config file > defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::providers::openrouter::OPENROUTER_API_URL;

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SMARTSENSE_CONFIG";

/// Env var overriding the fallback tiers (comma-separated model ids).
pub const MODELS_ENV: &str = "SMARTSENSE_MODELS";

/// Env var overriding the per-attempt timeout in seconds.
pub const TIMEOUT_ENV: &str = "SMARTSENSE_QUERY_TIMEOUT_SECS";

/// Default fallback tiers, in attempt order.
pub const DEFAULT_FALLBACK_MODELS: [&str; 4] = [
    "deepseek/deepseek-r1:free",
    "google/gemini-2.0-flash-exp:free",
    "meta-llama/llama-3.2-3b-instruct:free",
    "qwen/qwen-2-7b-instruct:free",
];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote model settings.
    pub models: ModelsConfig,
    /// Query answering limits.
    pub query: QueryConfig,
}

/// Remote model endpoint, credentials and fallback order.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Chat completions endpoint.
    pub base_url: String,
    /// Model ids tried in order until one answers.
    pub fallback: Vec<String>,
    /// Credential / environment key holding the API key.
    pub api_key_env: String,
    /// Optional `HTTP-Referer` attribution header.
    pub referer: Option<String>,
    /// `X-Title` attribution header.
    pub title: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            base_url: OPENROUTER_API_URL.to_owned(),
            fallback: DEFAULT_FALLBACK_MODELS
                .iter()
                .map(|m| (*m).to_owned())
                .collect(),
            api_key_env: "OPENROUTER_API_KEY".to_owned(),
            referer: None,
            title: "SmartSense Inbox".to_owned(),
        }
    }
}

/// Query answering limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Timeout per remote attempt, in seconds.
    pub timeout_secs: u64,
    /// Messages included in the remote context.
    pub context_messages: usize,
    /// Body characters per message in the remote context.
    pub body_preview_chars: usize,
    /// Source ids returned with an answer.
    pub max_sources: usize,
    /// Days covered by `ask` when no date is given.
    pub recent_window_days: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            context_messages: 20,
            body_preview_chars: 150,
            max_sources: 5,
            recent_window_days: 7,
        }
    }
}

impl Config {
    /// Load with precedence env vars > TOML file > defaults.
    ///
    /// `path` wins over `$SMARTSENSE_CONFIG`, which wins over
    /// `~/.smartsense/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path_with(|key| std::env::var(key).ok())?,
        };
        let mut config = load_or_default(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }

    /// Apply environment overrides through `env` (injectable for tests).
    ///
    /// Invalid values are logged and ignored.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env(MODELS_ENV) {
            let models: Vec<String> = v
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_owned)
                .collect();
            if models.is_empty() {
                tracing::warn!(var = MODELS_ENV, value = %v, "ignoring empty env override");
            } else {
                self.models.fallback = models;
            }
        }

        if let Some(v) = env(TIMEOUT_ENV) {
            match v.parse::<u64>() {
                Ok(n) if n > 0 => self.query.timeout_secs = n,
                _ => tracing::warn!(
                    var = TIMEOUT_ENV,
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
    }
}

/// Read `path`, or return defaults when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_or_default(path: &Path) -> anyhow::Result<Config> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            tracing::info!(path = %path.display(), "loading config from file");
            toml::from_str(&contents)
                .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(anyhow::anyhow!(
            "failed to read config at {}: {e}",
            path.display()
        )),
    }
}

/// Resolve the config file path using a custom env resolver.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_path_with(env: impl Fn(&str) -> Option<String>) -> anyhow::Result<PathBuf> {
    if let Some(p) = env(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(p));
    }
    Ok(runtime_paths()?.config_file)
}

/// Resolve the default config directory (`~/.smartsense/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".smartsense"))
}

/// Well-known files under the config directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePaths {
    /// `~/.smartsense/`.
    pub root: PathBuf,
    /// `~/.smartsense/config.toml`.
    pub config_file: PathBuf,
    /// `~/.smartsense/.env`.
    pub env_file: PathBuf,
    /// `~/.smartsense/logs/`.
    pub logs_dir: PathBuf,
}

impl RuntimePaths {
    /// Paths under an explicit root.
    pub fn under(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            config_file: root.join("config.toml"),
            env_file: root.join(".env"),
            logs_dir: root.join("logs"),
        }
    }
}

/// Paths under [`config_dir`].
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn runtime_paths() -> anyhow::Result<RuntimePaths> {
    Ok(RuntimePaths::under(&config_dir()?))
}
