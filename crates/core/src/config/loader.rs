//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used when none is present. The `PORT`
    /// environment variable overrides `server.port` in both cases.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            if !Path::new(p).exists() {
                return Err(Error::config_not_found(p));
            }
        }

        let config_path = path.map(String::from).or_else(find_config_file);

        let mut schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        apply_env_overrides(&mut schema, std::env::var("PORT").ok().as_deref())?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(Self {
            schema: toml::from_str(content)?,
            path: None,
        })
    }

    /// Load with defaults only (no file)
    pub fn defaults() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [".zeroapp.toml", "zeroapp.toml", ".config/zeroapp.toml"];

    candidates
        .into_iter()
        .find(|candidate| Path::new(candidate).exists())
        .map(String::from)
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Failed to read config file {}", path))?;

    let schema: ConfigSchema = toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Failed to parse config file {}", path))?;

    tracing::debug!(path, "Loaded configuration");
    Ok(schema)
}

fn apply_env_overrides(schema: &mut ConfigSchema, port: Option<&str>) -> Result<()> {
    if let Some(port) = port {
        schema.server.port = port.trim().parse().map_err(|_| {
            Error::new(
                crate::error::ErrorCode::InvalidConfigValue,
                format!("PORT must be a number between 0 and 65535, got {:?}", port),
            )
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_config_defaults() {
        let config = Config::defaults();
        assert!(config.path.is_none());
        assert_eq!(config.schema.server.port, 5000);
        assert_eq!(config.schema.render.max_depth, 32);
        assert_eq!(config.schema.keystore.alias, "app_key");
        assert!(config.schema.storage.output_dir().ends_with("output"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 8080

            [render]
            max_depth = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.schema.server.port, 8080);
        assert_eq!(config.schema.server.upload_limit_mb, 10);
        assert_eq!(config.schema.render.max_depth, 4);
        assert_eq!(config.schema.keystore.key_size, 2048);
    }

    #[test]
    fn test_explicit_output_dir() {
        let config = Config::from_toml(
            r#"
            [storage]
            work_dir = "/srv/zeroapp"
            output_dir = "/srv/artifacts"
            "#,
        )
        .unwrap();

        assert_eq!(config.schema.storage.work_dir(), Path::new("/srv/zeroapp"));
        assert_eq!(config.schema.storage.output_dir(), Path::new("/srv/artifacts"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[server\nport = ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("zeroapp.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.schema.logging.level, "debug");
        assert!(config.path.is_some());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some("/nonexistent/zeroapp.toml")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_port_override() {
        let mut schema = ConfigSchema::default();
        apply_env_overrides(&mut schema, Some("7000")).unwrap();
        assert_eq!(schema.server.port, 7000);

        let err = apply_env_overrides(&mut schema, Some("seventy")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigValue);
    }
}
