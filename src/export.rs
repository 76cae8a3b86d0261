use std::path::Path;

use image::DynamicImage;
use log::{debug, info};

use crate::codec;
use crate::error::{Error, Result};
use crate::model::CropRequest;
use crate::storage;

/// Crops, encodes and writes one selection. Returns the number of bytes
/// written.
///
/// Nothing reaches the codec when there is no image or the selection is empty.
pub fn export_crop(
    source: Option<&DynamicImage>,
    request: &CropRequest,
    path: &Path,
) -> Result<usize> {
    let source = source.ok_or(Error::NoImage)?;
    if request.rectangle.is_degenerate() {
        return Err(Error::EmptySelection);
    }
    if !request.format.honours_quality() {
        debug!("Quality {} ignored for {:?}", request.quality, request.format);
    }
    let bytes = codec::crop_and_encode(source, request)?;
    storage::write_image(path, &bytes)?;
    info!(
        "Exported {:?} crop at quality {} to {}",
        request.format,
        request.quality,
        path.display()
    );
    Ok(bytes.len())
}
