use eframe::egui;

use crate::model::{Point, Rectangle};

/// Maps between viewport pixels and the image's native pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSpace {
    image_size: egui::Vec2,
    display: egui::Rect,
}

impl CanvasSpace {
    pub fn new(image_size: egui::Vec2, display: egui::Rect) -> Self {
        Self {
            image_size,
            display,
        }
    }

    /// Fits the image inside `viewport`, centred, keeping its aspect ratio.
    /// Images smaller than the viewport stay at native size.
    pub fn fit(image_size: egui::Vec2, viewport: egui::Rect) -> Self {
        let fit_scale = (viewport.width() / image_size.x)
            .min(viewport.height() / image_size.y)
            .min(1.0);
        let fit_scale = if fit_scale.is_finite() && fit_scale > 0.0 {
            fit_scale
        } else {
            1.0
        };
        let display = egui::Rect::from_center_size(viewport.center(), image_size * fit_scale);
        Self::new(image_size, display)
    }

    pub fn display_rect(&self) -> egui::Rect {
        self.display
    }

    pub fn image_size(&self) -> egui::Vec2 {
        self.image_size
    }

    /// Image pixels per displayed pixel, `(sx, sy)`.
    pub fn scale(&self) -> egui::Vec2 {
        let size = self.display.size();
        egui::vec2(
            if size.x > 0.0 { self.image_size.x / size.x } else { 1.0 },
            if size.y > 0.0 { self.image_size.y / size.y } else { 1.0 },
        )
    }

    pub fn screen_to_image(&self, screen: egui::Pos2) -> Point {
        let rel = screen - self.display.min;
        let s = self.scale();
        Point::new(rel.x * s.x, rel.y * s.y)
    }

    pub fn image_to_screen(&self, p: Point) -> egui::Pos2 {
        let s = self.scale();
        self.display.min + egui::vec2(p.x / s.x, p.y / s.y)
    }

    pub fn rect_to_screen(&self, r: &Rectangle) -> egui::Rect {
        egui::Rect::from_min_max(
            self.image_to_screen(r.top_left()),
            self.image_to_screen(Point::new(r.right(), r.bottom())),
        )
    }
}
