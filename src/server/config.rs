//! Configuration loading for multirouted.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.multiroute/config.toml` (user)
//! 3. `/etc/multiroute/config.toml` (system)
//! 4. built-in defaults
//!
//! Environment variables override individual values afterwards (see
//! [`Config::apply_overrides`]).
//!
//! The Ollama API key is loaded separately with mandatory permission checks:
//! 1. `~/.multiroute/secrets.toml` (user, must be 0600)
//! 2. `/etc/multiroute/secrets.toml` (system, must be 0600)
//! 3. `OLLAMA_API_KEY`

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::providers::ollama::{DEFAULT_BASE_URL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT};
use crate::routing::ModelRoutes;
use crate::{MultirouteError, Result, TaskType};

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub routing: ModelRoutes,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8082).
    #[serde(default = "default_address")]
    pub address: String,
    /// Allow cross-origin requests from any origin (default: true).
    #[serde(default = "default_cors")]
    pub cors: bool,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            cors: default_cors(),
            limits: LimitsConfig::default(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8082".to_string()
}

fn default_cors() -> bool {
    true
}

/// Resource limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum concurrent analysis requests across all endpoints (default: 100).
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent(),
        }
    }
}

fn default_max_concurrent() -> usize {
    100
}

/// Ollama backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaConfig {
    /// Ollama base URL (default: http://localhost:11434).
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    /// Sampling temperature (default: 0.7).
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Per-call HTTP timeout in seconds (default: 120).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
        }
    }
}

impl OllamaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_ollama_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub ollama: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Environment variable holding the Ollama API key.
pub const API_KEY_ENV_VAR: &str = "OLLAMA_API_KEY";

/// Task → environment variable overriding its model.
const MODEL_ENV_VARS: &[(TaskType, &str)] = &[
    (TaskType::Classify, "OLLAMA_MODEL_CLASSIFY"),
    (TaskType::Sentiment, "OLLAMA_MODEL_SENTIMENT"),
    (TaskType::Summarize, "OLLAMA_MODEL_SUMMARIZE"),
    (TaskType::Intent, "OLLAMA_MODEL_INTENT"),
];

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the first of
    /// `~/.multiroute/config.toml` and `/etc/multiroute/config.toml` that
    /// exists is used, and built-in defaults otherwise.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::info!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse a specific config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MultirouteError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MultirouteError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MultirouteError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".multiroute").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/multiroute/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Apply environment overrides, reading variables through `lookup`.
    ///
    /// Recognised variables: `SERVER_ADDRESS`, `SERVER_PORT`,
    /// `OLLAMA_BASE_URL`, `OLLAMA_TEMPERATURE`, `OLLAMA_TIMEOUT_SECS` and
    /// `OLLAMA_MODEL_{CLASSIFY,SENTIMENT,SUMMARIZE,INTENT}`. `SERVER_PORT`
    /// is applied after `SERVER_ADDRESS` and only replaces the port.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup("SERVER_ADDRESS") {
            self.server.address = address;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            let port: u16 = parse_env("SERVER_PORT", &port)?;
            let host = self
                .server
                .address
                .rsplit_once(':')
                .map_or(self.server.address.as_str(), |(host, _)| host);
            self.server.address = format!("{host}:{port}");
        }
        if let Some(url) = lookup("OLLAMA_BASE_URL") {
            self.ollama.base_url = url;
        }
        if let Some(temperature) = lookup("OLLAMA_TEMPERATURE") {
            self.ollama.temperature = parse_env("OLLAMA_TEMPERATURE", &temperature)?;
        }
        if let Some(timeout) = lookup("OLLAMA_TIMEOUT_SECS") {
            self.ollama.timeout_secs = parse_env("OLLAMA_TIMEOUT_SECS", &timeout)?;
        }
        for (task, var) in MODEL_ENV_VARS {
            if let Some(model) = lookup(var) {
                self.routing.set_model(*task, model);
            }
        }
        Ok(())
    }
}

fn parse_env<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        MultirouteError::Configuration(format!("Invalid value for {name} ({value:?}): {e}"))
    })
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.multiroute/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/multiroute/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (the key may come from the environment).
    pub fn load() -> Result<Self> {
        // Try user secrets first
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".multiroute").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        // Try system secrets
        let system_secrets = PathBuf::from("/etc/multiroute/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Parse a specific secrets file, enforcing permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            MultirouteError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MultirouteError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            MultirouteError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(MultirouteError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Ollama API key, falling back to `OLLAMA_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_or(|var| std::env::var(var).ok())
    }

    /// Ollama API key, falling back to `lookup(OLLAMA_API_KEY)`.
    pub fn api_key_or<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.ollama
            .as_ref()
            .map(|s| s.api_key.clone())
            .or_else(|| lookup(API_KEY_ENV_VAR))
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "127.0.0.1:8082");
        assert!(config.server.cors);
        assert_eq!(config.server.limits.max_concurrent_requests, 100);
        assert_eq!(config.ollama.base_url, "http://localhost:11434");
        assert_eq!(config.ollama.timeout_secs, 120);
        assert_eq!(config.routing, ModelRoutes::default());
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [server]
            address = "0.0.0.0:8082"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "0.0.0.0:8082");
        // Defaults preserved
        assert_eq!(config.server.limits.max_concurrent_requests, 100);
        assert_eq!(config.routing.classify, "gemma3:4b");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:9000"
            cors = false

            [server.limits]
            max_concurrent_requests = 8

            [ollama]
            base_url = "https://ollama.com"
            temperature = 0.2
            timeout_secs = 30

            [routing]
            classify = "custom-classify"
            intent = "custom-intent"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.server.cors);
        assert_eq!(config.server.limits.max_concurrent_requests, 8);
        assert_eq!(config.ollama.base_url, "https://ollama.com");
        assert!((config.ollama.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.ollama.timeout(), Duration::from_secs(30));
        assert_eq!(config.routing.model(TaskType::Classify), "custom-classify");
        assert_eq!(config.routing.model(TaskType::Intent), "custom-intent");
        // Unset routes keep their default model
        assert_eq!(config.routing.model(TaskType::Sentiment), "ministral-3:3b");
    }

    #[test]
    fn env_overrides_replace_values() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("SERVER_PORT", "9090"),
                ("OLLAMA_BASE_URL", "https://ollama.com"),
                ("OLLAMA_TEMPERATURE", "0.1"),
                ("OLLAMA_MODEL_SUMMARIZE", "llama3:70b"),
            ]))
            .unwrap();
        assert_eq!(config.server.address, "127.0.0.1:9090");
        assert_eq!(config.ollama.base_url, "https://ollama.com");
        assert_eq!(config.routing.model(TaskType::Summarize), "llama3:70b");
        assert_eq!(config.routing.model(TaskType::Classify), "gemma3:4b");
    }

    #[test]
    fn port_override_applies_after_address() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("SERVER_ADDRESS", "0.0.0.0:1"),
                ("SERVER_PORT", "8082"),
            ]))
            .unwrap();
        assert_eq!(config.server.address, "0.0.0.0:8082");
    }

    #[test]
    fn invalid_env_value_is_a_configuration_error() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(env(&[("OLLAMA_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, MultirouteError::Configuration(_)));
        assert!(err.to_string().contains("OLLAMA_TIMEOUT_SECS"));
    }

    #[test]
    fn parse_secrets() {
        let toml = r#"
            [ollama]
            api_key = "ol-test-key"
        "#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(secrets.ollama.as_ref().unwrap().api_key, "ol-test-key");
    }

    #[test]
    fn api_key_prefers_secrets_file() {
        let secrets = Secrets {
            ollama: Some(ApiKeySecret {
                api_key: "from-file".to_string(),
            }),
        };
        let key = secrets.api_key_or(env(&[(API_KEY_ENV_VAR, "from-env")]));
        assert_eq!(key, Some("from-file".to_string()));
    }

    #[test]
    fn api_key_falls_back_to_env_and_ignores_empty() {
        let secrets = Secrets::default();
        assert_eq!(
            secrets.api_key_or(env(&[(API_KEY_ENV_VAR, "from-env")])),
            Some("from-env".to_string())
        );
        assert_eq!(secrets.api_key_or(env(&[(API_KEY_ENV_VAR, "")])), None);
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn load_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[routing]\nsentiment = \"tiny\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.routing.model(TaskType::Sentiment), "tiny");
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server\naddress = ").unwrap();

        let err = Config::load(Some(&path)).unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }

    #[cfg(unix)]
    #[test]
    fn world_readable_secrets_are_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "[ollama]\napi_key = \"k\"\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let err = Secrets::load_from_file(&path).unwrap_err().to_string();
        assert!(err.contains("insecure permissions"));

        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
        let secrets = Secrets::load_from_file(&path).unwrap();
        assert_eq!(secrets.api_key_or(|_| None), Some("k".to_string()));
    }
}
