//! Signing keystore generation
//!
//! Uses the JDK's `keytool` when it is installed. Without it (or when it
//! fails) a placeholder file is written instead and the outcome says so.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use zeroapp_core::config::KeystoreConfig;
use zeroapp_core::error::{Error, ErrorCode, Result};
use zeroapp_core::process::{run_command, which_command};

/// Contents of the placeholder keystore
pub const MOCK_KEYSTORE: &str = "MOCK KEYSTORE FILE FOR DEMO";

/// How the keystore for a build was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum KeystoreOutcome {
    /// `keytool` produced a real keystore
    Generated { path: PathBuf },
    /// A placeholder was written
    Simulated { path: PathBuf, reason: String },
    /// A previously uploaded keystore was copied in
    Provided { path: PathBuf },
}

impl KeystoreOutcome {
    /// Short label used in API responses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Generated { .. } => "generated",
            Self::Simulated { .. } => "simulated",
            Self::Provided { .. } => "provided",
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Generated { path } | Self::Simulated { path, .. } | Self::Provided { path } => path,
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated { .. })
    }
}

/// Produces keystores with the configured key parameters
#[derive(Debug, Clone)]
pub struct KeystoreGenerator {
    config: KeystoreConfig,
    program: String,
}

impl KeystoreGenerator {
    pub fn new(config: KeystoreConfig) -> Self {
        Self {
            config,
            program: "keytool".to_string(),
        }
    }

    /// Use a different `keytool` executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Generate a keystore at `path`, falling back to a placeholder
    ///
    /// `password` defaults to the configured one. Only a failure to write the
    /// placeholder itself is an error.
    pub fn generate(&self, path: &Path, password: Option<&str>) -> Result<KeystoreOutcome> {
        let password = password
            .filter(|p| !p.is_empty())
            .unwrap_or(self.config.default_password.as_str());

        let Some(program) = which_command(&self.program) else {
            tracing::warn!(program = %self.program, "keytool not found, writing placeholder keystore");
            return self.simulate(path, format!("{} not found", self.program));
        };

        let path_arg = path.to_string_lossy();
        let key_size = self.config.key_size.to_string();
        let validity = self.config.validity_days.to_string();
        let args = [
            "-genkey",
            "-v",
            "-keystore",
            path_arg.as_ref(),
            "-alias",
            self.config.alias.as_str(),
            "-keyalg",
            self.config.key_alg.as_str(),
            "-keysize",
            key_size.as_str(),
            "-validity",
            validity.as_str(),
            "-storepass",
            password,
            "-keypass",
            password,
            "-dname",
            self.config.dname.as_str(),
        ];

        match run_command(&program.to_string_lossy(), &args) {
            Ok(result) if result.success && path.is_file() => {
                tracing::info!(path = %path.display(), "Generated keystore");
                Ok(KeystoreOutcome::Generated {
                    path: path.to_path_buf(),
                })
            }
            Ok(result) => {
                let reason = match result.stderr.trim() {
                    "" => format!("keytool exited with code {}", result.exit_code),
                    stderr => stderr.lines().last().unwrap_or(stderr).to_string(),
                };
                tracing::warn!(%reason, "keytool failed, writing placeholder keystore");
                self.simulate(path, reason)
            }
            Err(e) => {
                tracing::warn!(error = %e, "keytool could not run, writing placeholder keystore");
                self.simulate(path, e.message)
            }
        }
    }

    /// Copy an uploaded keystore to `path`
    pub fn provide(&self, source: &Path, path: &Path) -> Result<KeystoreOutcome> {
        if !source.is_file() {
            return Err(Error::file_not_found(source));
        }
        fs::copy(source, path).map_err(|e| {
            Error::new(ErrorCode::KeystoreError, format!("Failed to copy keystore: {}", e)).with_source(e)
        })?;
        tracing::info!(source = %source.display(), path = %path.display(), "Using uploaded keystore");
        Ok(KeystoreOutcome::Provided {
            path: path.to_path_buf(),
        })
    }

    fn simulate(&self, path: &Path, reason: String) -> Result<KeystoreOutcome> {
        fs::write(path, MOCK_KEYSTORE).map_err(|e| {
            Error::new(ErrorCode::KeystoreError, format!("Failed to write keystore: {}", e)).with_source(e)
        })?;
        Ok(KeystoreOutcome::Simulated {
            path: path.to_path_buf(),
            reason,
        })
    }
}
