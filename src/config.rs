//! Configuration module for the board.

use serde::Deserialize;
use std::path::Path;

use crate::{BoardError, Result};

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    5000
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/board.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
    /// Maximum length of a stored file name (0 = unbounded).
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
}

fn default_max_upload_size() -> u64 {
    10
}

fn default_max_name_length() -> usize {
    0
}

impl FilesConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }

    /// Name length limit passed to the store, `None` when unbounded.
    pub fn name_length_limit(&self) -> Option<usize> {
        (self.max_name_length > 0).then_some(self.max_name_length)
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            max_upload_size_mb: default_max_upload_size(),
            max_name_length: default_max_name_length(),
        }
    }
}

/// Remote filesystem backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// HDFS through the WebHDFS REST gateway.
    #[default]
    Webhdfs,
    /// Process-local memory (development and tests).
    Memory,
}

/// HDFS connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HdfsConfig {
    /// Backend used to store file contents.
    #[serde(default)]
    pub backend: StorageBackend,
    /// NameNode host.
    #[serde(default = "default_hdfs_host")]
    pub host: String,
    /// NameNode HTTP port.
    #[serde(default = "default_hdfs_port")]
    pub port: u16,
    /// User identity for simple authentication.
    #[serde(default = "default_hdfs_user")]
    pub user: String,
    /// Use delegation-token authentication instead of simple authentication.
    #[serde(default)]
    pub secure: bool,
    /// Storage root (empty = `/user/{user}`).
    #[serde(default)]
    pub root: String,
    /// Pre-issued delegation token for secure mode (empty = fetch on demand).
    #[serde(default)]
    pub delegation_token: String,
    /// Timeout for delegation token requests in seconds.
    #[serde(default = "default_token_timeout")]
    pub token_timeout_secs: u64,
}

fn default_hdfs_host() -> String {
    "localhost".to_string()
}

fn default_hdfs_port() -> u16 {
    9870
}

fn default_hdfs_user() -> String {
    "hdfs".to_string()
}

fn default_token_timeout() -> u64 {
    10
}

impl HdfsConfig {
    /// Base HTTP endpoint of the NameNode.
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Storage root, defaulting to the user's home directory.
    pub fn effective_root(&self) -> String {
        if self.root.is_empty() {
            format!("/user/{}", self.user)
        } else {
            self.root.clone()
        }
    }
}

impl Default for HdfsConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            host: default_hdfs_host(),
            port: default_hdfs_port(),
            user: default_hdfs_user(),
            secure: false,
            root: String::new(),
            delegation_token: String::new(),
            token_timeout_secs: default_token_timeout(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/board.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Web server configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Upload configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// HDFS configuration.
    #[serde(default)]
    pub hdfs: HdfsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BoardError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BoardError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `HADOOP_HOST`: NameNode host
    /// - `HADOOP_PORT`: NameNode HTTP port
    /// - `HADOOP_USER`: user identity for simple authentication
    /// - `HADOOP_SECURE`: `1`/`true` selects delegation-token authentication
    /// - `HADOOP_DELEGATION_TOKEN`: pre-issued delegation token
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(host) = get("HADOOP_HOST") {
            self.hdfs.host = host;
        }
        if let Some(port) = get("HADOOP_PORT") {
            self.hdfs.port = port
                .parse()
                .map_err(|_| BoardError::Config(format!("invalid HADOOP_PORT: {port}")))?;
        }
        if let Some(user) = get("HADOOP_USER") {
            self.hdfs.user = user;
        }
        if let Some(secure) = get("HADOOP_SECURE") {
            self.hdfs.secure = parse_flag(&secure)
                .ok_or_else(|| BoardError::Config(format!("invalid HADOOP_SECURE: {secure}")))?;
        }
        if let Some(token) = get("HADOOP_DELEGATION_TOKEN") {
            self.hdfs.delegation_token = token;
        }
        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the HDFS host is empty or the port is 0
    /// - simple authentication is selected without a user
    pub fn validate(&self) -> Result<()> {
        if self.hdfs.host.is_empty() {
            return Err(BoardError::Config("hdfs.host is not set".to_string()));
        }
        if self.hdfs.port == 0 {
            return Err(BoardError::Config("hdfs.port must not be 0".to_string()));
        }
        if !self.hdfs.secure && self.hdfs.user.is_empty() {
            return Err(BoardError::Config(
                "hdfs.user is required when secure mode is off. \
                 Set it in config.toml or via HADOOP_USER environment variable."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.web.port, 5000);
        assert!(config.web.cors_origins.is_empty());

        assert_eq!(config.database.path, "data/board.db");

        assert_eq!(config.files.max_upload_size_mb, 10);
        assert_eq!(config.files.max_name_length, 0);

        assert_eq!(config.hdfs.backend, StorageBackend::Webhdfs);
        assert_eq!(config.hdfs.host, "localhost");
        assert_eq!(config.hdfs.port, 9870);
        assert_eq!(config.hdfs.user, "hdfs");
        assert!(!config.hdfs.secure);
        assert!(config.hdfs.root.is_empty());
        assert!(config.hdfs.delegation_token.is_empty());
        assert_eq!(config.hdfs.token_timeout_secs, 10);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/board.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[web]
host = "127.0.0.1"
port = 8080
cors_origins = ["http://localhost:3000"]

[database]
path = "custom/db.sqlite"

[files]
max_upload_size_mb = 20
max_name_length = 64

[hdfs]
backend = "memory"
host = "namenode"
port = 50070
user = "alice"
secure = true
root = "/data/posts"
delegation_token = "abc"
token_timeout_secs = 3

[logging]
level = "debug"
file = "custom/logs/app.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.web.host, "127.0.0.1");
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.web.cors_origins, vec!["http://localhost:3000"]);

        assert_eq!(config.database.path, "custom/db.sqlite");

        assert_eq!(config.files.max_upload_size_mb, 20);
        assert_eq!(config.files.max_name_length, 64);

        assert_eq!(config.hdfs.backend, StorageBackend::Memory);
        assert_eq!(config.hdfs.host, "namenode");
        assert_eq!(config.hdfs.port, 50070);
        assert_eq!(config.hdfs.user, "alice");
        assert!(config.hdfs.secure);
        assert_eq!(config.hdfs.root, "/data/posts");
        assert_eq!(config.hdfs.delegation_token, "abc");
        assert_eq!(config.hdfs.token_timeout_secs, 3);

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[hdfs]
host = "namenode"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.hdfs.host, "namenode");
        assert_eq!(config.hdfs.port, 9870);
        assert_eq!(config.web.port, 5000);
        assert_eq!(config.database.path, "data/board.db");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        if let Err(BoardError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_parse_unknown_backend() {
        let result = Config::parse("[hdfs]\nbackend = \"s3\"\n");
        assert!(matches!(result, Err(BoardError::Config(_))));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(BoardError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[web]\nport = 9000\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.web.port, 9000);
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("HADOOP_HOST", "nn.example.com"),
                ("HADOOP_PORT", "50070"),
                ("HADOOP_USER", "bob"),
                ("HADOOP_SECURE", "1"),
                ("HADOOP_DELEGATION_TOKEN", "tok"),
            ]))
            .unwrap();

        assert_eq!(config.hdfs.host, "nn.example.com");
        assert_eq!(config.hdfs.port, 50070);
        assert_eq!(config.hdfs.user, "bob");
        assert!(config.hdfs.secure);
        assert_eq!(config.hdfs.delegation_token, "tok");
    }

    #[test]
    fn test_apply_overrides_empty_value() {
        let mut config = Config::default();
        config.hdfs.host = "original".to_string();
        config.apply_overrides(env(&[("HADOOP_HOST", "")])).unwrap();

        // Should not override with empty string
        assert_eq!(config.hdfs.host, "original");
    }

    #[test]
    fn test_apply_overrides_invalid_port() {
        let mut config = Config::default();
        let result = config.apply_overrides(env(&[("HADOOP_PORT", "http")]));
        assert!(matches!(result, Err(BoardError::Config(_))));
    }

    #[test]
    fn test_apply_overrides_secure_flag() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("HADOOP_SECURE", "0")])).unwrap();
        assert!(!config.hdfs.secure);

        let result = config.apply_overrides(env(&[("HADOOP_SECURE", "maybe")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_effective_root() {
        let mut hdfs = HdfsConfig::default();
        assert_eq!(hdfs.effective_root(), "/user/hdfs");

        hdfs.root = "/data".to_string();
        assert_eq!(hdfs.effective_root(), "/data");
    }

    #[test]
    fn test_endpoint() {
        let hdfs = HdfsConfig::default();
        assert_eq!(hdfs.endpoint(), "http://localhost:9870");
    }

    #[test]
    fn test_name_length_limit() {
        let mut files = FilesConfig::default();
        assert_eq!(files.name_length_limit(), None);

        files.max_name_length = 100;
        assert_eq!(files.name_length_limit(), Some(100));
        assert_eq!(files.max_upload_size_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_insecure_without_user() {
        let mut config = Config::default();
        config.hdfs.user = String::new();

        let result = config.validate();
        if let Err(BoardError::Config(msg)) = result {
            assert!(msg.contains("hdfs.user"));
        } else {
            panic!("Expected Config error");
        }

        config.hdfs.secure = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.hdfs.port = 0;
        assert!(config.validate().is_err());
    }
}
