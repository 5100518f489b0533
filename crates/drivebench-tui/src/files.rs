//! Reading local files into upload selections.

use anyhow::{Context, Result};
use drivebench_core::LocalFile;
use std::path::Path;

/// Read a file from disk, inferring its MIME type from the extension.
pub fn read_local_file(path: &Path) -> Result<LocalFile> {
    let content =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file path: {}", path.display()))?;

    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    Ok(LocalFile::new(name, mime_type, content))
}

/// Read every readable path; failures are logged and skipped.
pub fn read_selection<P: AsRef<Path>>(paths: &[P]) -> Vec<LocalFile> {
    paths
        .iter()
        .filter_map(|path| match read_local_file(path.as_ref()) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!("Skipping {}: {:#}", path.as_ref().display(), e);
                None
            }
        })
        .collect()
}
