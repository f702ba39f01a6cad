//! `zeroapp render`

use anyhow::Result;
use std::path::Path;
use zeroapp_android::render::{render_manifest, Renderer};
use zeroapp_android::validate::validate_project;
use zeroapp_core::config::Config;
use zeroapp_core::error::{exit_codes, Error};
use zeroapp_telemetry::{names, Timer};

use super::{load_project, report_warnings};

/// Print a screen's layout, or the manifest, to stdout
pub fn run(config: &Config, project_path: &Path, screen: Option<&str>) -> Result<i32> {
    let project = load_project(project_path)?;
    let max_depth = config.schema.render.max_depth;

    let validation = validate_project(&project, max_depth);
    let warnings: Vec<String> = validation.warnings().iter().map(ToString::to_string).collect();
    report_warnings(&warnings);
    validation.to_result()?;

    let timer = Timer::start(names::RENDER_DURATION_MS);
    let document = match screen {
        Some(id) => {
            let screen = project.screens.get(id).ok_or_else(|| {
                let known: Vec<&str> = project.screens.keys().map(String::as_str).collect();
                Error::invalid_input(format!("Unknown screen \"{}\"", id))
                    .with_suggestion(format!("Available screens: {}", known.join(", ")))
            })?;
            Renderer::with_max_depth(max_depth)?.render_screen(&project, screen)
        }
        None => render_manifest(&project),
    };
    let elapsed = timer.stop();
    tracing::debug!(
        screen = screen.unwrap_or("manifest"),
        elapsed_ms = elapsed.as_millis() as u64,
        "Rendered document"
    );

    print!("{}", document);
    Ok(exit_codes::SUCCESS)
}
