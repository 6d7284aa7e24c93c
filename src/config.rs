//! Configuration loading and validation
//!
//! Tidepool runs with no configuration file at all; every field has a
//! default. A TOML file can override the HTTP client settings and the
//! output directory:
//!
//! ```toml
//! [fetch]
//! user-agent = "tidepool/1.0"
//! timeout-secs = 30
//! connect-timeout-secs = 10
//!
//! [output]
//! directory = "./mirror"
//! ```

use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Mirror root directory; when unset the seed host name is used
    pub directory: Option<String>,
}

fn default_user_agent() -> String {
    format!("tidepool/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the file
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Validates a configuration
///
/// Rejects values the HTTP client cannot work with: an empty user agent
/// and zero timeouts.
pub fn validate(config: &Config) -> ConfigResult<()> {
    if config.fetch.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "fetch.user-agent must not be empty".to_string(),
        ));
    }

    if config.fetch.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch.timeout-secs must be greater than zero".to_string(),
        ));
    }

    if config.fetch.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch.connect-timeout-secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Used to report which configuration a run actually saw.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.fetch.user_agent.starts_with("tidepool/"));
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.fetch.connect_timeout_secs, 10);
        assert!(config.output.directory.is_none());
    }

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(
            r#"
[fetch]
user-agent = "TestMirror/1.0"
timeout-secs = 5
connect-timeout-secs = 2

[output]
directory = "./out"
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.fetch.user_agent, "TestMirror/1.0");
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.output.directory.as_deref(), Some("./out"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let file = create_temp_config(
            r#"
[output]
directory = "./out"
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.output.directory.as_deref(), Some("./out"));
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let file = create_temp_config("this is not toml [");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_user_agent_is_rejected() {
        let file = create_temp_config(
            r#"
[fetch]
user-agent = "  "
"#,
        );
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let file = create_temp_config(
            r#"
[fetch]
timeout-secs = 0
"#,
        );
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_config_hash_is_stable() {
        let file = create_temp_config("[fetch]\ntimeout-secs = 5\n");
        let first = compute_config_hash(file.path()).unwrap();
        let second = compute_config_hash(file.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_config_hash_tracks_content() {
        let a = create_temp_config("[fetch]\ntimeout-secs = 5\n");
        let b = create_temp_config("[fetch]\ntimeout-secs = 6\n");
        assert_ne!(
            compute_config_hash(a.path()).unwrap(),
            compute_config_hash(b.path()).unwrap()
        );
    }
}
