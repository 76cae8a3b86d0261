use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("No image loaded")]
    NoImage,
    #[error("Please select an area to crop")]
    EmptySelection,
    #[error("Crop region {x},{y} {width}x{height} is outside the {image_width}x{image_height} image")]
    InvalidRegion {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },
    #[error("Invalid aspect ratio '{0}', expected W:H with positive numbers")]
    InvalidAspect(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Colour quantisation error: {0}")]
    Quantise(#[from] imagequant::Error),
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),
    #[error("Settings encoding error: {0}")]
    Toml(#[from] toml::ser::Error),
    #[error("Settings encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Window error: {0}")]
    Eframe(#[from] eframe::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
