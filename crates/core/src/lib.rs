//! Core utilities for ZeroApp Builder
//!
//! This crate provides functionality shared by the generator and the server:
//!
//! - **Error handling**: errors with codes, context and recovery suggestions
//! - **Configuration**: TOML-based configuration with defaults
//! - **Validation**: fluent validators for request input
//! - **Process execution**: running external tools such as `keytool`
//! - **Health checks**: verify tool dependencies and writable directories
//!
//! # Example
//!
//! ```rust,no_run
//! use zeroapp_core::{config::Config, health::HealthChecker};
//!
//! let config = Config::load(None).expect("invalid configuration");
//! let report = HealthChecker::new()
//!     .with_builder_checks(&[config.schema.storage.work_dir()])
//!     .run();
//!
//! if !report.is_healthy() {
//!     eprintln!("Environment issues detected!");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
#[allow(missing_docs)]
pub mod error;
pub mod health;
pub mod process;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
    pub use crate::health::{HealthChecker, HealthReport, HealthStatus};
    pub use crate::validation::{ValidationResult, Validator};
}
