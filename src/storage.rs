use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Error, Result};
use crate::model::TargetFormat;

/// Accepts only paths whose extension is one of the supported image types.
pub fn ensure_supported(path: &Path) -> Result<TargetFormat> {
    TargetFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))
}

pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    Ok(std::fs::read(path)?)
}

pub fn write_image(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)?;
    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// `<stem>_cropped<.ext>` for the given original path.
pub fn cropped_file_name(original: &Path) -> String {
    let stem = original
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    match original.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_cropped.{ext}"),
        None => format!("{stem}_cropped"),
    }
}

/// Suggested save-as target, next to the original.
pub fn default_save_as_path(original: &Path) -> PathBuf {
    original.with_file_name(cropped_file_name(original))
}
