//! Zip packaging for the mock APK and the source download

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};
use zeroapp_core::error::{Error, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Note placed at the root of every mock APK
pub const APK_README: &str =
    "This is a mock APK file created by ZeroApp Builder for demonstration purposes.";

/// Readme added to the source download
pub const SOURCE_README: &str = "# ZeroApp Builder\n\nA zero-cost app creation platform that allows building and publishing Android apps to the Play Store.\n\n## Getting Started\n\n1. Build the server: `cargo build --release`\n2. Start it: `zeroapp serve`\n3. Open your browser to: `http://localhost:5000`\n";

/// Directories never included in the source download
const SOURCE_EXCLUDES: &[&str] = &["target", "node_modules", "tmp"];

/// What was written
#[derive(Debug, Clone, Serialize)]
pub struct PackageSummary {
    pub path: PathBuf,
    /// Number of file entries
    pub entries: usize,
    pub size_bytes: u64,
    /// Hex SHA-256 of the archive
    pub sha256: String,
}

fn options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9))
        .unix_permissions(0o644)
}

fn zip_error(dest: &Path, err: impl std::fmt::Display) -> Error {
    Error::packaging(format!("Failed to write {}: {}", dest.display(), err))
}

/// Zip every file under `root` that passes `include` (applied to directories
/// too, so excluding a directory skips its contents), then append `extra`
/// entries verbatim. Entry names are `/`-separated paths relative to `root`.
pub fn package_directory<F>(root: &Path, dest: &Path, include: F, extra: &[(&str, &str)]) -> Result<PackageSummary>
where
    F: Fn(&DirEntry) -> bool,
{
    if !root.is_dir() {
        return Err(Error::file_not_found(root));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(dest)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let mut entries = 0;

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || include(e))
    {
        let entry = entry.map_err(|e| zip_error(dest, e))?;
        if !entry.file_type().is_file() || entry.path() == dest {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| zip_error(dest, e))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(name, options()).map_err(|e| zip_error(dest, e))?;
        let mut source = File::open(entry.path())?;
        io::copy(&mut source, &mut zip)?;
        entries += 1;
    }

    for (name, contents) in extra {
        zip.start_file(*name, options()).map_err(|e| zip_error(dest, e))?;
        zip.write_all(contents.as_bytes())?;
        entries += 1;
    }

    let mut writer = zip.finish().map_err(|e| zip_error(dest, e))?;
    writer.flush()?;
    drop(writer);

    let bytes = fs::read(dest)?;
    let summary = PackageSummary {
        path: dest.to_path_buf(),
        entries,
        size_bytes: bytes.len() as u64,
        sha256: hex::encode(Sha256::digest(&bytes)),
    };
    tracing::debug!(
        path = %dest.display(),
        entries,
        size_bytes = summary.size_bytes,
        "Wrote archive"
    );
    Ok(summary)
}

/// Package a generated project as a mock APK
pub fn package_apk(project_dir: &Path, apk_path: &Path) -> Result<PackageSummary> {
    package_directory(project_dir, apk_path, |_| true, &[("README.txt", APK_README)])
}

/// Package the static web root for download, skipping hidden files and
/// build output
pub fn package_source(static_dir: &Path, dest: &Path) -> Result<PackageSummary> {
    package_directory(
        static_dir,
        dest,
        |entry| {
            let name = entry.file_name().to_string_lossy();
            !name.starts_with('.')
                && !(entry.file_type().is_dir() && SOURCE_EXCLUDES.contains(&&*name))
                && !name.ends_with(".apk")
        },
        &[("README.md", SOURCE_README)],
    )
}
