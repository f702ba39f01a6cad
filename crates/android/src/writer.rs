//! Writing a rendered project to disk

use std::fs;
use std::path::{Path, PathBuf};
use zeroapp_core::error::{Error, Result, ResultExt};

use crate::render::RenderedProject;

/// Write every generated document under `project_dir`, creating directories
/// as needed. Returns the absolute paths written, in write order.
pub fn write_project(project_dir: &Path, rendered: &RenderedProject) -> Result<Vec<PathBuf>> {
    let files = rendered.files();
    let mut written = Vec::with_capacity(files.len());

    for file in files {
        let path = project_dir.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(Error::from)
                .context(format!("creating {}", parent.display()))?;
        }
        fs::write(&path, &file.contents)
            .map_err(Error::from)
            .context(format!("writing {}", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = file.contents.len(), "Wrote file");
        written.push(path);
    }

    Ok(written)
}
