//! `zeroapp build`

use anyhow::Result;
use std::path::Path;
use zeroapp_android::{ApkBuilder, BuildRequest, KeystoreOutcome};
use zeroapp_cli::output::{format_duration, format_size, is_quiet, Status};
use zeroapp_cli::progress;
use zeroapp_core::config::Config;
use zeroapp_core::error::exit_codes;
use zeroapp_telemetry::{metrics, names};

use super::{load_project, report_warnings};

/// Run the full pipeline and report where the APK went
pub fn run(config: &Config, project_path: &Path, password: Option<&str>) -> Result<i32> {
    let project = load_project(project_path)?;
    let builder = ApkBuilder::new(&config.schema)?;

    let mut request = BuildRequest::new(project);
    if let Some(password) = password {
        request = request.with_password(password);
    }

    metrics().increment(names::BUILDS_STARTED);
    let spinner = progress::spinner(&format!("Building {}", request.project.name));
    let result = builder.build(&request);
    progress::finish(&spinner);

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            metrics().increment(names::BUILDS_FAILED);
            return Err(err.into());
        }
    };
    metrics().increment(names::BUILDS_SUCCEEDED);
    metrics().record_duration(names::BUILD_DURATION_MS, outcome.duration);

    report_warnings(&outcome.warnings);

    if is_quiet() {
        println!("{}", outcome.apk.path.display());
        return Ok(exit_codes::SUCCESS);
    }

    Status::success(&format!("Built {}", outcome.download_name));
    Status::kv("APK", &outcome.apk.path.display().to_string());
    Status::kv("Size", &format_size(outcome.apk.size_bytes));
    Status::kv("SHA-256", &outcome.apk.sha256);
    Status::kv("Project", &outcome.project_dir.display().to_string());
    match &outcome.keystore {
        KeystoreOutcome::Simulated { reason, .. } => {
            Status::kv("Keystore", &format!("simulated ({})", reason));
        }
        other => Status::kv("Keystore", other.kind()),
    }
    Status::kv("Time", &format_duration(outcome.duration));

    Ok(exit_codes::SUCCESS)
}
