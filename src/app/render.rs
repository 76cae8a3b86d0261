use eframe::egui;

use crate::canvas::CanvasSpace;
use crate::model::{Corner, Rectangle};
use crate::selection::{corner_point, dim_regions};

use super::settings::AppSettings;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct OverlayStyle {
    pub handle_size: f32,
    pub outline: egui::Stroke,
    pub dim: egui::Color32,
    pub handle_fill: egui::Color32,
}

impl OverlayStyle {
    pub(super) fn from_settings(settings: &AppSettings) -> Self {
        let accent = egui::Color32::from_rgb(0, 200, 0);
        Self {
            handle_size: settings.handle_size.max(1.0),
            outline: egui::Stroke::new(settings.outline_width.max(0.0), accent),
            dim: egui::Color32::from_black_alpha(settings.overlay_alpha),
            handle_fill: accent,
        }
    }
}

/// Dimmed surround, outline and corner handles for `rect`, in screen space.
/// An empty selection draws nothing.
pub(super) fn selection_shapes(
    space: &CanvasSpace,
    rect: &Rectangle,
    style: &OverlayStyle,
) -> Vec<egui::Shape> {
    if rect.is_degenerate() {
        return Vec::new();
    }
    let size = space.image_size();
    let mut shapes: Vec<egui::Shape> = dim_regions(rect, size.x, size.y)
        .iter()
        .filter(|r| !r.is_degenerate())
        .map(|r| egui::Shape::rect_filled(space.rect_to_screen(r), 0.0, style.dim))
        .collect();

    shapes.push(egui::Shape::rect_stroke(
        space.rect_to_screen(rect),
        0.0,
        style.outline,
        egui::StrokeKind::Middle,
    ));

    let half = style.handle_size / 2.0;
    shapes.extend(Corner::ALL.into_iter().map(|corner| {
        let center = space.image_to_screen(corner_point(rect, corner));
        egui::Shape::rect_filled(
            egui::Rect::from_center_size(center, egui::vec2(half * 2.0, half * 2.0)),
            0.0,
            style.handle_fill,
        )
    }));
    shapes
}

pub(super) fn draw_canvas(
    painter: &egui::Painter,
    viewport: egui::Rect,
    space: &CanvasSpace,
    texture: egui::TextureId,
    selection: &Rectangle,
    style: &OverlayStyle,
) {
    draw_background(painter, viewport);
    painter.image(
        texture,
        space.display_rect(),
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
    painter.extend(selection_shapes(space, selection, style));
}

pub(super) fn draw_placeholder(painter: &egui::Painter, viewport: egui::Rect) {
    draw_background(painter, viewport);
    painter.text(
        viewport.center(),
        egui::Align2::CENTER_CENTER,
        "Open an image to start cropping",
        egui::FontId::proportional(16.0),
        painter.ctx().style().visuals.weak_text_color(),
    );
}

fn draw_background(painter: &egui::Painter, rect: egui::Rect) {
    let bg = painter.ctx().style().visuals.extreme_bg_color;
    painter.rect_filled(rect, 0.0, bg);
}
