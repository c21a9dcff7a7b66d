//! Configuration management
//!
//! This module handles loading and validating configuration from TOML files.
//! One `[panel]` section describes the deployment, each `[[servers]]` entry
//! one monitored game service with its own login.

use crate::models::{AuthCheck, ConfigFileId, Credentials, PasswordSource};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Panel deployment settings
    #[serde(default)]
    pub panel: PanelConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Monitored servers
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelConfig {
    /// Scheme and host of the panel, e.g. `https://panel.example.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_game_id")]
    pub game_id: String,

    #[serde(default = "default_mod_id")]
    pub mod_id: String,

    #[serde(default = "default_config_file_id")]
    pub config_file_id: String,

    #[serde(default)]
    pub auth_check: AuthCheck,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            game_id: default_game_id(),
            mod_id: default_mod_id(),
            config_file_id: default_config_file_id(),
            auth_check: AuthCheck::default(),
        }
    }
}

impl PanelConfig {
    pub fn config_file(&self) -> ConfigFileId {
        ConfigFileId {
            game_id: self.game_id.clone(),
            mod_id: self.mod_id.clone(),
            file_id: self.config_file_id.clone(),
        }
    }
}

/// Configuration for a single monitored server
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Display name, also used to pick the server on the command line
    pub name: String,

    /// Panel service identifier
    pub service_id: String,

    #[serde(default)]
    pub password_source: PasswordSource,

    /// Display colour handed through to whatever renders results
    #[serde(default)]
    pub color: Option<u32>,

    pub credentials: Credentials,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Overrides the browser-like default
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            user_agent: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://localhost".to_string()
}

fn default_game_id() -> String {
    "1098726659".to_string()
}

fn default_mod_id() -> String {
    "0".to_string()
}

fn default_config_file_id() -> String {
    "1".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from an explicit path, or search the default
    /// locations and fall back to defaults if none exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let config_paths = vec![
            PathBuf::from("panelctl.toml"),
            PathBuf::from("/etc/panelctl/config.toml"),
            dirs::home_dir()
                .map(|h| h.join(".config/panelctl/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from: {}", path.display());
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let base = &self.panel.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            bail!("panel.base_url must start with http:// or https://, got '{}'", base);
        }

        let mut seen = HashSet::new();
        for server in &self.servers {
            if server.name.trim().is_empty() {
                bail!("server entry with empty name");
            }
            if server.service_id.trim().is_empty() {
                bail!("server '{}' has no service_id", server.name);
            }
            if server.credentials.username.trim().is_empty() {
                bail!("server '{}' has no credentials.username", server.name);
            }
            if !seen.insert(server.name.as_str()) {
                bail!("duplicate server name '{}'", server.name);
            }
        }
        Ok(())
    }

    /// Look up a server by its configured name
    pub fn server(&self, name: &str) -> Option<&ServerConfig> {
        self.servers.iter().find(|s| s.name == name)
    }
}
