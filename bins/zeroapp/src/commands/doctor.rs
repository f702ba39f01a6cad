//! `zeroapp doctor`

use anyhow::Result;
use zeroapp_cli::output::Status;
use zeroapp_core::config::Config;
use zeroapp_core::error::exit_codes;
use zeroapp_core::health::{HealthChecker, HealthStatus};

/// Check keytool availability and the storage directories
pub fn run(config: &Config, json: bool) -> Result<i32> {
    let storage = &config.schema.storage;
    let report = HealthChecker::new()
        .with_builder_checks(&[storage.work_dir(), storage.output_dir(), storage.upload_dir()])
        .run();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        Status::header("Environment Check");
        if let Some(path) = &config.path {
            Status::kv("Config", path);
        }
        for check in &report.checks {
            let line = match &check.message {
                Some(message) => format!("{}: {}", check.name, message),
                None => check.name.clone(),
            };
            match check.status {
                HealthStatus::Healthy => Status::success(&line),
                HealthStatus::Degraded => Status::warning(&line),
                HealthStatus::Unhealthy => Status::error(&line),
            }
        }
    }

    Ok(if report.status.is_operational() {
        exit_codes::SUCCESS
    } else {
        exit_codes::FAILURE
    })
}
