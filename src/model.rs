use eframe::egui;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::Error;

/// A position in the source image's native pixel space.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle with a top-left origin, in image pixels.
///
/// A rectangle with zero width or height means "no selection".
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub const EMPTY: Rectangle = Rectangle::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn at(p: Point) -> Self {
        Self::new(p.x, p.y, 0.0, 0.0)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Strict containment; points on an edge are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x > self.x && p.x < self.right() && p.y > self.y && p.y < self.bottom()
    }

    pub fn fits_within(&self, canvas_w: f32, canvas_h: f32) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= canvas_w && self.bottom() <= canvas_h
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    NW,
    NE,
    SW,
    SE,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::NW, Corner::NE, Corner::SW, Corner::SE];

    /// Whether dragging this corner moves the left edge (otherwise the right one).
    pub fn moves_left(self) -> bool {
        matches!(self, Corner::NW | Corner::SW)
    }

    /// Whether dragging this corner moves the top edge (otherwise the bottom one).
    pub fn moves_top(self) -> bool {
        matches!(self, Corner::NW | Corner::NE)
    }

    pub fn cursor(self) -> egui::CursorIcon {
        match self {
            Corner::NW | Corner::SE => egui::CursorIcon::ResizeNwSe,
            Corner::NE | Corner::SW => egui::CursorIcon::ResizeNeSw,
        }
    }
}

/// Which dimension is authoritative when an aspect ratio is enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Driver {
    Width,
    Height,
}

impl Driver {
    /// The axis that moved further drives; ties go to height.
    pub fn from_delta(dx: f32, dy: f32) -> Self {
        if dx.abs() > dy.abs() {
            Driver::Width
        } else {
            Driver::Height
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AspectConstraint {
    #[default]
    Free,
    Ratio {
        w: f32,
        h: f32,
    },
}

impl AspectConstraint {
    pub fn ratio(w: f32, h: f32) -> Option<Self> {
        (w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite())
            .then_some(AspectConstraint::Ratio { w, h })
    }

    /// Width divided by height, `None` when unconstrained.
    pub fn value(&self) -> Option<f32> {
        match *self {
            AspectConstraint::Free => None,
            AspectConstraint::Ratio { w, h } => Some(w / h),
        }
    }
}

impl FromStr for AspectConstraint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("free") {
            return Ok(AspectConstraint::Free);
        }
        let invalid = || Error::InvalidAspect(s.to_string());
        let (w, h) = trimmed.split_once(':').ok_or_else(invalid)?;
        let w: f32 = w.trim().parse().map_err(|_| invalid())?;
        let h: f32 = h.trim().parse().map_err(|_| invalid())?;
        AspectConstraint::ratio(w, h).ok_or_else(invalid)
    }
}

impl fmt::Display for AspectConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectConstraint::Free => write!(f, "Free"),
            AspectConstraint::Ratio { w, h } => write!(f, "{w}:{h}"),
        }
    }
}

/// Output encoding, picked from the destination file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
    Bmp,
}

pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

impl TargetFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(TargetFormat::Png),
            "jpg" | "jpeg" => Some(TargetFormat::Jpeg),
            "webp" => Some(TargetFormat::WebP),
            "gif" => Some(TargetFormat::Gif),
            "bmp" => Some(TargetFormat::Bmp),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            TargetFormat::Png => image::ImageFormat::Png,
            TargetFormat::Jpeg => image::ImageFormat::Jpeg,
            TargetFormat::WebP => image::ImageFormat::WebP,
            TargetFormat::Gif => image::ImageFormat::Gif,
            TargetFormat::Bmp => image::ImageFormat::Bmp,
        }
    }

    pub fn honours_quality(self) -> bool {
        matches!(self, TargetFormat::Jpeg | TargetFormat::WebP | TargetFormat::Png)
    }
}

/// Everything the codec needs for one export.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRequest {
    pub rectangle: Rectangle,
    pub quality: u8,
    pub format: TargetFormat,
}

impl CropRequest {
    pub fn new(rectangle: Rectangle, quality: u8, format: TargetFormat) -> Self {
        Self {
            rectangle,
            quality: quality.clamp(1, 100),
            format,
        }
    }
}
