//! Configuration management for `issue_api`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`ISSUE_API_*`)
//! 3. Project config (`./issue-api.yaml`, or the file passed with `--config`)
//! 4. User config (`~/.config/issue-api/config.yaml`)
//! 5. Defaults

use crate::error::{IssueError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Default data file, relative to the working directory.
pub const DEFAULT_DATA_FILENAME: &str = "issues.jsonl";
/// Default project config filename.
pub const PROJECT_CONFIG_FILENAME: &str = "issue-api.yaml";
/// Default listen address.
pub const DEFAULT_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000);
/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "ISSUE_API_";

/// A flat layer of normalized `key -> value` settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Set a key, normalizing its spelling.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(&normalize_key(key))
    }

    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Build a layer from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(contents)?;
        let mut flat = HashMap::new();
        flatten_yaml(&value, "", &mut flat);

        let mut layer = Self::default();
        for (key, value) in flat {
            layer.insert(&key, value);
        }
        Ok(layer)
    }

    /// Build a layer from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_vars(env::vars())
    }

    /// Build a layer from `ISSUE_API_*` entries of an environment listing.
    #[must_use]
    pub fn from_env_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut layer = Self::default();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layer.insert(stripped, value);
            }
        }
        layer
    }
}

/// CLI overrides for config loading (optional).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub addr: Option<String>,
    pub cors: Option<bool>,
    pub log_json: Option<bool>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(path) = &self.data {
            layer.insert("data", path.to_string_lossy());
        }
        if let Some(addr) = &self.addr {
            layer.insert("addr", addr.clone());
        }
        if let Some(cors) = self.cors {
            layer.insert("cors", cors.to_string());
        }
        if let Some(log_json) = self.log_json {
            layer.insert("log-json", log_json.to_string());
        }

        layer
    }
}

/// Fully resolved, typed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    /// JSONL file holding the issue collection.
    pub data_path: PathBuf,
    /// HTTP listen address.
    pub addr: SocketAddr,
    /// Enable permissive CORS.
    pub cors: bool,
    /// Emit logs as JSON lines.
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILENAME),
            addr: DEFAULT_ADDR,
            cors: true,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Resolve a merged layer into typed settings.
    ///
    /// # Errors
    ///
    /// Returns `IssueError::Config` for unparsable addresses or booleans.
    pub fn from_layer(layer: &ConfigLayer) -> Result<Self> {
        let mut config = Self::default();

        if let Some(data) = layer.get("data") {
            let trimmed = data.trim();
            if trimmed.is_empty() {
                return Err(IssueError::Config("data path cannot be empty".to_string()));
            }
            config.data_path = PathBuf::from(trimmed);
        }
        if let Some(addr) = layer.get("addr") {
            config.addr = addr
                .trim()
                .parse()
                .map_err(|e| IssueError::Config(format!("invalid addr '{addr}': {e}")))?;
        }
        if let Some(value) = layer.get("cors") {
            config.cors = require_bool("cors", value)?;
        }
        if let Some(value) = layer.get("log-json") {
            config.log_json = require_bool("log-json", value)?;
        }

        Ok(config)
    }
}

/// Default config layer (lowest precedence).
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let defaults = AppConfig::default();
    let mut layer = ConfigLayer::default();
    layer.insert("data", defaults.data_path.to_string_lossy());
    layer.insert("addr", defaults.addr.to_string());
    layer.insert("cors", defaults.cors.to_string());
    layer.insert("log-json", defaults.log_json.to_string());
    layer
}

/// Load user config (~/.config/issue-api/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    let Ok(home) = env::var("HOME") else {
        return Ok(ConfigLayer::default());
    };
    let path = Path::new(&home)
        .join(".config")
        .join("issue-api")
        .join("config.yaml");
    ConfigLayer::from_yaml(&path)
}

/// Load project config from an explicit path or `./issue-api.yaml`.
///
/// An explicit path must exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_project_config(explicit: Option<&Path>) -> Result<ConfigLayer> {
    match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(IssueError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            ConfigLayer::from_yaml(path)
        }
        None => ConfigLayer::from_yaml(Path::new(PROJECT_CONFIG_FILENAME)),
    }
}

/// Load configuration with the documented precedence order.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed, or a value
/// is invalid.
pub fn load_config(cli: &CliOverrides) -> Result<AppConfig> {
    let merged = ConfigLayer::merge_layers(&[
        default_config_layer(),
        load_user_config()?,
        load_project_config(cli.config.as_deref())?,
        ConfigLayer::from_env(),
        cli.as_layer(),
    ]);
    let config = AppConfig::from_layer(&merged)?;
    tracing::debug!(?config, "Resolved configuration");
    Ok(config)
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn require_bool(key: &str, value: &str) -> Result<bool> {
    parse_bool(value)
        .ok_or_else(|| IssueError::Config(format!("invalid boolean for {key}: '{value}'")))
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        serde_yaml::Value::Sequence(values) => {
            let joined = values
                .iter()
                .filter_map(yaml_scalar_to_string)
                .collect::<Vec<_>>()
                .join(",");
            out.insert(prefix.to_string(), joined);
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
