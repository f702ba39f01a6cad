//! CLI command implementations

pub mod build;
pub mod doctor;
pub mod generate;
pub mod render;
pub mod serve;

use anyhow::{Context, Result};
use std::path::Path;
use zeroapp_android::Project;
use zeroapp_cli::output::Status;
use zeroapp_core::error::{exit_codes, Error};

/// Read and parse a project description
pub fn load_project(path: &Path) -> Result<Project> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let project = serde_json::from_str(&content)
        .map_err(Error::from)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(project)
}

/// Exit code for an error, using the workspace error's category when there is one
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<Error>()
        .map_or(exit_codes::FAILURE, exit_codes::for_error)
}

/// Print validation warnings
pub fn report_warnings(warnings: &[String]) {
    for warning in warnings {
        Status::warning(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_from_validation_error() {
        let err = anyhow::Error::new(Error::validation("bad package"));
        assert_eq!(exit_code(&err), exit_codes::VALIDATION_ERROR);

        let err = anyhow::Error::new(Error::build("disk full")).context("while building");
        assert_eq!(exit_code(&err), exit_codes::FAILURE);

        assert_eq!(exit_code(&anyhow::anyhow!("plain")), exit_codes::FAILURE);
    }

    #[test]
    fn test_load_project_reports_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_project(&path).unwrap_err();
        assert_eq!(exit_code(&err), exit_codes::VALIDATION_ERROR);
        assert!(format!("{:#}", err).contains("broken.json"));
    }
}
