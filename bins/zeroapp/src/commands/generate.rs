//! `zeroapp generate`

use anyhow::Result;
use std::path::Path;
use zeroapp_android::ApkBuilder;
use zeroapp_cli::output::{format_count, Status};
use zeroapp_core::config::Config;
use zeroapp_core::error::exit_codes;

use super::{load_project, report_warnings};

/// Render a project and write it to `out`
pub fn run(config: &Config, project_path: &Path, out: &Path) -> Result<i32> {
    let project = load_project(project_path)?;
    let builder = ApkBuilder::new(&config.schema)?;

    let outcome = builder.generate(&project, out)?;
    report_warnings(&outcome.warnings);

    Status::success(&format!(
        "Generated {} for {} in {}",
        format_count(outcome.files.len(), "file", "files"),
        project.name,
        out.display()
    ));
    Ok(exit_codes::SUCCESS)
}
