//! Configuration loading for mjau.
//!
//! The configuration is a YAML document listing environments and requests
//! (see [`schema`]). It is read once per invocation and handed to the
//! runner as plain data.

pub mod sample;
pub mod schema;

pub use sample::{write_sample_config, SAMPLE_CONFIG};
pub use schema::{text_or_empty, Config, Environment, KeyValue, Request, StoreJsonVariable};

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

/// Default configuration file name, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "mjau.yaml";

/// Errors that can occur while loading or creating a configuration file
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The configuration file does not exist
    FileNotFound(String),

    /// IO error occurred while reading or writing the file
    IoError(String),

    /// Failed to parse YAML content
    ParseError(String),

    /// The document parsed but is not usable
    InvalidFormat(String),

    /// `init` refused to overwrite an existing file
    AlreadyExists(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::IoError(msg) => write!(f, "IO error: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config file: {}", msg),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config: {}", msg),
            ConfigError::AlreadyExists(path) => write!(f, "Config file already exists: {}", path),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::IoError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl Config {
    /// Reads and validates the configuration at `path`.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let config = Config::from_yaml_str(&content)?;
        log::debug!(
            "loaded {} environment(s) and {} request(s) from {}",
            config.environments.len(),
            config.requests.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parses and validates a YAML document.
    ///
    /// An empty document yields an empty configuration.
    pub fn from_yaml_str(content: &str) -> Result<Config, ConfigError> {
        let config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str::<Config>(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that request and environment names are non-empty and unique.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_names("request", self.requests.iter().map(|r| r.name.as_str()))?;
        check_names(
            "environment",
            self.environments.iter().map(|e| e.name.as_str()),
        )?;
        Ok(())
    }

    /// Finds a request by exact name.
    pub fn find_request(&self, name: &str) -> Option<&Request> {
        self.requests.iter().find(|r| r.name == name)
    }

    /// Finds an environment by exact name.
    pub fn find_environment(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.name == name)
    }

    /// Names of all requests in document order.
    pub fn request_names(&self) -> Vec<String> {
        self.requests.iter().map(|r| r.name.clone()).collect()
    }
}

fn check_names<'a>(kind: &str, names: impl Iterator<Item = &'a str>) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidFormat(format!(
                "{} with an empty name",
                kind
            )));
        }
        if !seen.insert(name) {
            return Err(ConfigError::InvalidFormat(format!(
                "duplicate {} name '{}'",
                kind, name
            )));
        }
    }
    Ok(())
}

/// Splits a `run` argument such as `"login,profile"` into request names.
///
/// Surrounding whitespace is trimmed. Empty entries are kept so they are
/// reported as unknown requests.
pub fn parse_request_list(arg: &str) -> Vec<String> {
    arg.split(',').map(|name| name.trim().to_string()).collect()
}
