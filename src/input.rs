use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, SpotscanError};

/// Extensions accepted as input images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
        .unwrap_or(false)
}

/// List the images directly inside `dir`, sorted by file name.
///
/// Subdirectories are not searched. An empty result is not an error.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SpotscanError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("images directory not found: {}", dir.display()),
        )));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| SpotscanError::Io(e.into()))?;

        if entry.file_type().is_file() && is_image_file(entry.path()) {
            images.push(entry.into_path());
        }
    }

    Ok(images)
}
