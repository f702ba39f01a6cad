//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub keystore: KeystoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on (overridden by the `PORT` environment variable)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served for static files and bundled into the source download
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Maximum JSON request body, in megabytes
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// Maximum uploaded file size, in megabytes
    #[serde(default = "default_upload_limit_mb")]
    pub upload_limit_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            body_limit_mb: default_body_limit_mb(),
            upload_limit_mb: default_upload_limit_mb(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    ".".to_string()
}

fn default_body_limit_mb() -> usize {
    50
}

fn default_upload_limit_mb() -> usize {
    10
}

/// Where generated projects, artifacts and uploads live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root for generated project directories
    #[serde(default = "default_work_dir")]
    pub work_dir: String,

    /// Directory for generated APK artifacts (defaults to `<work_dir>/output`)
    #[serde(default)]
    pub output_dir: Option<String>,

    /// Directory for uploaded keystores and icons
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            output_dir: None,
            upload_dir: default_upload_dir(),
        }
    }
}

impl StorageConfig {
    /// Resolved work directory, with `~` and environment variables expanded
    pub fn work_dir(&self) -> PathBuf {
        expand(&self.work_dir)
    }

    /// Resolved artifact directory
    pub fn output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => expand(dir),
            None => self.work_dir().join("output"),
        }
    }

    /// Resolved upload directory
    pub fn upload_dir(&self) -> PathBuf {
        expand(&self.upload_dir)
    }
}

fn expand(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(path),
    }
}

fn default_work_dir() -> String {
    std::env::temp_dir()
        .join("zeroapp-builder")
        .to_string_lossy()
        .into_owned()
}

fn default_upload_dir() -> String {
    std::env::temp_dir()
        .join("zeroapp-uploads")
        .to_string_lossy()
        .into_owned()
}

/// Renderer limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Deepest container nesting rendered before children are omitted
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    32
}

/// Parameters passed to `keytool -genkey`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreConfig {
    #[serde(default = "default_alias")]
    pub alias: String,

    #[serde(default = "default_key_alg")]
    pub key_alg: String,

    #[serde(default = "default_key_size")]
    pub key_size: u32,

    #[serde(default = "default_validity_days")]
    pub validity_days: u32,

    /// Distinguished name for the generated certificate
    #[serde(default = "default_dname")]
    pub dname: String,

    /// Store and key password used when the request does not supply one
    #[serde(default = "default_password")]
    pub default_password: String,
}

impl Default for KeystoreConfig {
    fn default() -> Self {
        Self {
            alias: default_alias(),
            key_alg: default_key_alg(),
            key_size: default_key_size(),
            validity_days: default_validity_days(),
            dname: default_dname(),
            default_password: default_password(),
        }
    }
}

fn default_alias() -> String {
    "app_key".to_string()
}

fn default_key_alg() -> String {
    "RSA".to_string()
}

fn default_key_size() -> u32 {
    2048
}

fn default_validity_days() -> u32 {
    10000
}

fn default_dname() -> String {
    "CN=ZeroApp Builder, OU=Development, O=ZeroApp, L=Unknown, ST=Unknown, C=US".to_string()
}

fn default_password() -> String {
    "android".to_string()
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write a daily rolling log file here in addition to stderr
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
