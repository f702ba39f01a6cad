//! End-to-end tests for the `zeroapp` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// A command running in a scratch directory with its own config file
fn zeroapp(dir: &TempDir) -> Command {
    let config = dir.path().join("zeroapp.toml");
    if !config.exists() {
        let work = dir.path().join("work");
        let uploads = dir.path().join("uploads");
        std::fs::write(
            &config,
            format!(
                "[storage]\nwork_dir = {:?}\nupload_dir = {:?}\n\n[logging]\nlevel = \"warn\"\n",
                work.to_string_lossy(),
                uploads.to_string_lossy()
            ),
        )
        .unwrap();
    }

    let mut cmd = Command::cargo_bin("zeroapp").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("PORT")
        .env_remove("RUST_LOG")
        .env_remove("ZEROAPP_KEYSTORE_PASSWORD")
        .env("ZEROAPP_CONFIG", &config)
        .arg("--no-color");
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("zeroapp")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn test_generate_writes_project() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("android");

    zeroapp(&dir)
        .arg("generate")
        .arg(fixture("project.json"))
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Field Notes"));

    let main = out.join("app/src/main");
    assert!(out.join("settings.gradle").is_file());
    assert!(main.join("AndroidManifest.xml").is_file());
    assert!(main.join("java/com/example/fieldnotes/MainActivity.java").is_file());

    let layout = std::fs::read_to_string(main.join("res/layout/activity_main.xml")).unwrap();
    assert!(layout.contains("android:text=\"Welcome back\""));
    assert!(layout.contains("android:hint=\"Search notes\""));
    assert!(main.join("res/layout/activity_settings.xml").is_file());
}

#[test]
fn test_render_screen_and_manifest() {
    let dir = TempDir::new().unwrap();

    zeroapp(&dir)
        .args(["render", "--screen", "settings"])
        .arg(fixture("project.json"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml"))
        .stdout(predicate::str::contains("Preferences"));

    zeroapp(&dir)
        .arg("render")
        .arg(fixture("project.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("package=\"com.example.fieldnotes\""))
        .stdout(predicate::str::contains("android.intent.action.MAIN"));
}

#[test]
fn test_render_unknown_screen() {
    let dir = TempDir::new().unwrap();

    zeroapp(&dir)
        .args(["render", "--screen", "checkout"])
        .arg(fixture("project.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown screen"));
}

#[test]
fn test_build_prints_apk_path() {
    let dir = TempDir::new().unwrap();

    let assert = zeroapp(&dir)
        .arg("--quiet")
        .arg("build")
        .arg(fixture("project.json"))
        .args(["--password", "s3cret-pass"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let apk = PathBuf::from(stdout.trim());
    assert!(apk.starts_with(dir.path().join("work/output")));
    assert!(apk.file_name().unwrap().to_string_lossy().starts_with("app-"));

    let bytes = std::fs::read(&apk).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_invalid_project_exits_with_validation_code() {
    let dir = TempDir::new().unwrap();

    zeroapp(&dir)
        .arg("generate")
        .arg(fixture("invalid_project.json"))
        .arg("--out")
        .arg(dir.path().join("out"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("package"));

    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_missing_project_file() {
    let dir = TempDir::new().unwrap();

    zeroapp(&dir)
        .arg("render")
        .arg(dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn test_missing_config_exits_with_config_code() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("zeroapp")
        .unwrap()
        .current_dir(dir.path())
        .args(["--config", "missing.toml", "doctor"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_doctor_json() {
    let dir = TempDir::new().unwrap();

    let assert = zeroapp(&dir).args(["doctor", "--json"]).assert().success();

    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let checks = report["checks"].as_array().unwrap();
    assert!(checks.iter().any(|c| c["name"] == "keytool"));
    assert!(dir.path().join("work/output").is_dir());
}
