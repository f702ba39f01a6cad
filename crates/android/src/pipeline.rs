//! End-to-end build: validate, render, write, sign, package

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use zeroapp_core::config::ConfigSchema;
use zeroapp_core::error::{Error, Result, ResultExt};
use zeroapp_core::validation::ValidationResult;

use crate::keystore::{KeystoreGenerator, KeystoreOutcome};
use crate::model::Project;
use crate::package::{package_apk, PackageSummary};
use crate::render::Renderer;
use crate::validate::validate_project;
use crate::writer::write_project;

/// One build
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub project: Project,
    /// Keystore password; the configured default when absent
    pub keystore_password: Option<String>,
    /// Previously uploaded keystore to use instead of generating one
    pub keystore_source: Option<PathBuf>,
}

impl BuildRequest {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            keystore_password: None,
            keystore_source: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.keystore_password = Some(password.into());
        self
    }

    pub fn with_keystore(mut self, source: impl Into<PathBuf>) -> Self {
        self.keystore_source = Some(source.into());
        self
    }
}

/// Result of a successful build
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutcome {
    /// `<millis>-<uuid8>`, shared by the project directory and APK name
    pub build_id: String,
    pub project_dir: PathBuf,
    pub apk: PackageSummary,
    /// File name of the APK inside the output directory
    pub apk_filename: String,
    /// Name suggested to the user when downloading
    pub download_name: String,
    pub keystore: KeystoreOutcome,
    pub files_written: usize,
    pub warnings: Vec<String>,
    pub render_duration: Duration,
    pub duration: Duration,
}

/// Result of writing a project without packaging it
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub files: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

/// Runs builds against the configured work and output directories
pub struct ApkBuilder {
    renderer: Renderer,
    keystore: KeystoreGenerator,
    work_dir: PathBuf,
    output_dir: PathBuf,
    max_depth: usize,
}

impl ApkBuilder {
    pub fn new(config: &ConfigSchema) -> Result<Self> {
        Ok(Self {
            renderer: Renderer::with_max_depth(config.render.max_depth)?,
            keystore: KeystoreGenerator::new(config.keystore.clone()),
            work_dir: config.storage.work_dir(),
            output_dir: config.storage.output_dir(),
            max_depth: config.render.max_depth,
        })
    }

    /// Replace the keystore generator
    pub fn with_keystore_generator(mut self, keystore: KeystoreGenerator) -> Self {
        self.keystore = keystore;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Validate a project; errors become a single validation error, warnings
    /// are returned as messages
    pub fn check(&self, project: &Project) -> Result<Vec<String>> {
        let result = validate_project(project, self.max_depth);
        let warnings = warning_messages(&result);
        for warning in &warnings {
            tracing::warn!(package = %project.package, "{}", warning);
        }
        result.to_result().with_suggestion("Fix the listed fields and resubmit")?;
        Ok(warnings)
    }

    /// Render and write a project into `out_dir`
    pub fn generate(&self, project: &Project, out_dir: &Path) -> Result<GenerateOutcome> {
        let warnings = self.check(project)?;
        let rendered = self.renderer.render(project)?;
        let files = write_project(out_dir, &rendered)?;
        Ok(GenerateOutcome { files, warnings })
    }

    /// Run the full pipeline
    pub fn build(&self, request: &BuildRequest) -> Result<BuildOutcome> {
        let started = Instant::now();
        let project = &request.project;
        let warnings = self.check(project)?;

        let build_id = new_build_id();
        let project_dir = self.work_dir.join(format!("project_{}", build_id.replace('-', "_")));
        fs::create_dir_all(&project_dir)
            .map_err(Error::from)
            .context(format!("creating {}", project_dir.display()))?;
        fs::create_dir_all(&self.output_dir)
            .map_err(Error::from)
            .context(format!("creating {}", self.output_dir.display()))?;

        tracing::info!(
            build_id = %build_id,
            app = %project.name,
            package = %project.package,
            screens = project.screens.len(),
            "Starting build"
        );

        let render_started = Instant::now();
        let rendered = self.renderer.render(project)?;
        let render_duration = render_started.elapsed();
        let files = write_project(&project_dir, &rendered)?;

        let keystore_path = project_dir.join("app.keystore");
        let keystore = match &request.keystore_source {
            Some(source) => self.keystore.provide(source, &keystore_path)?,
            None => self
                .keystore
                .generate(&keystore_path, request.keystore_password.as_deref())?,
        };

        let apk_filename = format!("app-{}.apk", build_id);
        let apk = package_apk(&project_dir, &self.output_dir.join(&apk_filename))?;

        let outcome = BuildOutcome {
            download_name: download_name(project),
            build_id,
            project_dir,
            apk,
            apk_filename,
            keystore,
            files_written: files.len(),
            warnings,
            render_duration,
            duration: started.elapsed(),
        };

        tracing::info!(
            build_id = %outcome.build_id,
            apk = %outcome.apk.path.display(),
            keystore = outcome.keystore.kind(),
            duration_ms = outcome.duration.as_millis() as u64,
            "Build finished"
        );
        Ok(outcome)
    }
}

/// `<millis>-<first 8 hex digits of a v4 uuid>`
fn new_build_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", millis, &uuid[..8])
}

/// Download name: app name with every whitespace run (leading and trailing
/// included) replaced by one `_`, then the version
pub fn download_name(project: &Project) -> String {
    let mut name = String::with_capacity(project.name.len());
    let mut in_space = false;
    for c in project.name.chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
        } else {
            name.push(c);
            in_space = false;
        }
    }
    format!("{}-{}.apk", name, project.version())
}

fn warning_messages(result: &ValidationResult) -> Vec<String> {
    result.warnings().iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, Screen};
    use tempfile::TempDir;
    use zeroapp_core::error::ErrorCode;

    fn builder(dir: &TempDir) -> ApkBuilder {
        let mut config = ConfigSchema::default();
        config.storage.work_dir = dir.path().join("work").to_string_lossy().into_owned();
        config.storage.output_dir = Some(dir.path().join("output").to_string_lossy().into_owned());
        ApkBuilder::new(&config)
            .unwrap()
            .with_keystore_generator(
                KeystoreGenerator::new(config.keystore.clone()).with_program("zeroapp-no-such-keytool"),
            )
    }

    fn project() -> Project {
        Project::new("My  Cool\tApp", "com.example.cool")
            .with_version("1.4.0")
            .with_screen("mainScreen", Screen::new("Home", vec![Component::text("Hello")]))
            .with_screen("about", Screen::new("About", vec![]))
    }

    #[test]
    fn test_download_name() {
        assert_eq!(download_name(&project()), "My_Cool_App-1.4.0.apk");
        assert_eq!(download_name(&Project::new("Solo", "a.b")), "Solo-1.0.0.apk");
        assert_eq!(download_name(&Project::new(" Padded  App\n", "a.b")), "_Padded_App_-1.0.0.apk");
    }

    #[test]
    fn test_build_id_shape() {
        let id = new_build_id();
        let (millis, suffix) = id.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 8);
        assert_ne!(new_build_id(), id);
    }

    #[test]
    fn test_build() {
        let dir = TempDir::new().unwrap();
        let builder = builder(&dir);
        let outcome = builder.build(&BuildRequest::new(project())).unwrap();

        assert!(outcome.apk.path.is_file());
        assert!(outcome.apk.path.starts_with(dir.path().join("output")));
        assert_eq!(outcome.apk_filename, format!("app-{}.apk", outcome.build_id));
        assert_eq!(outcome.download_name, "My_Cool_App-1.4.0.apk");
        assert!(outcome.keystore.is_simulated());
        assert!(outcome.project_dir.join("app.keystore").is_file());
        assert!(outcome.project_dir.join("app/src/main/AndroidManifest.xml").is_file());
        // written files plus keystore plus README
        assert_eq!(outcome.apk.entries, outcome.files_written + 2);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_builds_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let builder = builder(&dir);
        let a = builder.build(&BuildRequest::new(project())).unwrap();
        let b = builder.build(&BuildRequest::new(project())).unwrap();
        assert_ne!(a.project_dir, b.project_dir);
        assert_ne!(a.apk.path, b.apk.path);
    }

    #[test]
    fn test_build_with_provided_keystore() {
        let dir = TempDir::new().unwrap();
        let upload = dir.path().join("upload.jks");
        fs::write(&upload, b"jks").unwrap();

        let outcome = builder(&dir)
            .build(&BuildRequest::new(project()).with_keystore(&upload))
            .unwrap();
        assert_eq!(outcome.keystore.kind(), "provided");
    }

    #[test]
    fn test_invalid_project_rejected_before_writing() {
        let dir = TempDir::new().unwrap();
        let builder = builder(&dir);
        let mut bad = project();
        bad.package = "nodots".to_string();

        let err = builder.build(&BuildRequest::new(bad)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!dir.path().join("work").exists());
    }

    #[test]
    fn test_warnings_are_reported() {
        let dir = TempDir::new().unwrap();
        let outcome = builder(&dir)
            .build(&BuildRequest::new(project().with_version("beta")))
            .unwrap();
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].starts_with("version:"));
    }

    #[test]
    fn test_generate() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("android");
        let outcome = builder(&dir).generate(&project(), &out).unwrap();
        assert!(outcome.files.iter().all(|p| p.starts_with(&out)));
        assert!(out.join("settings.gradle").is_file());
    }
}
