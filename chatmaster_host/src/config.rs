use chatmaster_session::config::{ChatSettings, ServerConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_core::LevelFilter;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Errors that could happen when loading a config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error on {1}: {0}")]
    IoError(std::io::Error, PathBuf),
    #[error("JSON parse error in {1}: {0}")]
    JsonError(json5::Error, PathBuf),
    #[error("No server config named {0}")]
    NoSuchConfig(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinLogTarget {
    Stdout,
    Stderr,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogTarget {
    File { filename: PathBuf },
    Builtin(BuiltinLogTarget),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LogEntry {
    pub target: LogTarget,
    #[serde(default)]
    pub modules: Vec<String>,
    pub level: Option<LogLevel>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub default_level: Option<LogLevel>,
    #[serde(default)]
    pub module_levels: HashMap<String, LogLevel>,
    pub targets: Vec<LogEntry>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("log"),
            default_level: Some(LogLevel::Info),
            module_levels: HashMap::new(),
            targets: vec![LogEntry {
                target: LogTarget::Builtin(BuiltinLogTarget::Stderr),
                modules: Vec::new(),
                level: None,
            }],
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(arg: LogLevel) -> LevelFilter {
        match arg {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

/// The saved set of server configurations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub configs: BTreeMap<String, ServerConfig>,
    /// Names of configs left out of "connect all"
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl ConfigRecord {
    /// Every config that isn't disabled
    pub fn enabled_configs(&self) -> BTreeMap<String, ServerConfig> {
        self.configs
            .iter()
            .filter(|(name, _)| !self.disabled.contains(name))
            .map(|(name, config)| (name.clone(), config.clone()))
            .collect()
    }

    /// Just the named config, whether or not it's disabled
    pub fn single(&self, name: &str) -> Result<BTreeMap<String, ServerConfig>, ConfigError> {
        let config = self
            .configs
            .get(name)
            .ok_or_else(|| ConfigError::NoSuchConfig(name.to_string()))?;

        Ok(BTreeMap::from([(name.to_string(), config.clone())]))
    }
}

impl Default for ConfigRecord {
    fn default() -> Self {
        let freenode = ServerConfig {
            server: "irc.freenode.net".to_string(),
            port: Some(6667),
            nick: "benzene".to_string(),
            username: "C6H6".to_string(),
            real_name: "Chat Master Test".to_string(),
            ..Default::default()
        };

        Self {
            configs: BTreeMap::from([("freenode".to_string(), freenode)]),
            disabled: Vec::new(),
        }
    }
}

/// Everything the host reads from its config file
#[derive(Clone, Debug, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub record: ConfigRecord,
    #[serde(default)]
    pub settings: ChatSettings,
    #[serde(default)]
    pub log: LoggingConfig,
}

impl HostConfig {
    /// Load configuration from a file
    pub fn load_file<P: AsRef<Path>>(filename: P) -> Result<Self, ConfigError> {
        let filename = filename.as_ref();
        let config = std::fs::read_to_string(filename).map_err(|e| ConfigError::IoError(e, filename.to_owned()))?;
        json5::from_str(&config).map_err(|e| ConfigError::JsonError(e, filename.to_owned()))
    }
}
