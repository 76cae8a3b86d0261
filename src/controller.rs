//! Pointer-driven state machine that edits the selection.
//!
//! All coordinates arriving here are already in image pixel space; mapping
//! from the viewport happens in [`crate::canvas::CanvasSpace`].

use eframe::egui;
use log::debug;

use crate::model::{AspectConstraint, Corner, Driver, Point, Rectangle};
use crate::selection::{
    SelectionModel, apply_aspect, clamp_to_canvas, hit_test_corner, hit_test_interior,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionState {
    Idle,
    Drawing {
        anchor: Point,
    },
    Dragging {
        grab_offset: Point,
    },
    Resizing {
        corner: Corner,
        anchor_rect: Rectangle,
        origin: Point,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorHint {
    Crosshair,
    Move,
    Resize(Corner),
}

impl CursorHint {
    pub fn icon(self) -> egui::CursorIcon {
        match self {
            CursorHint::Crosshair => egui::CursorIcon::Crosshair,
            CursorHint::Move => egui::CursorIcon::Move,
            CursorHint::Resize(corner) => corner.cursor(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControllerConfig {
    /// Radius around each corner, in image pixels, that grabs a resize.
    pub corner_tolerance: f32,
    /// Resized selections must be strictly larger than this on both axes.
    pub min_size: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            corner_tolerance: 10.0,
            min_size: 10.0,
        }
    }
}

pub struct Controller {
    selection: SelectionModel,
    state: InteractionState,
    canvas_w: f32,
    canvas_h: f32,
    config: ControllerConfig,
}

impl Controller {
    pub fn new(canvas_w: f32, canvas_h: f32, config: ControllerConfig) -> Self {
        Self {
            selection: SelectionModel::default(),
            state: InteractionState::Idle,
            canvas_w,
            canvas_h,
            config,
        }
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn rectangle(&self) -> Rectangle {
        self.selection.rectangle()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    pub fn canvas_size(&self) -> (f32, f32) {
        (self.canvas_w, self.canvas_h)
    }

    pub fn aspect(&self) -> AspectConstraint {
        self.selection.aspect()
    }

    pub fn set_aspect(&mut self, aspect: AspectConstraint) {
        debug!("Aspect constraint set to {aspect}");
        self.selection.set_aspect(aspect);
    }

    pub fn set_width(&mut self, width: f32) {
        self.selection.set_width(width, self.canvas_w, self.canvas_h);
    }

    pub fn set_height(&mut self, height: f32) {
        self.selection.set_height(height, self.canvas_w, self.canvas_h);
    }

    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.selection.reset();
    }

    /// Starts a resize, a move or a fresh draw depending on what is under `p`.
    pub fn pointer_down(&mut self, p: Point) {
        if !self.is_idle() {
            self.pointer_up();
        }
        let rect = self.selection.rectangle();
        let tolerance = self.config.corner_tolerance;

        self.state = if let Some(corner) = hit_test_corner(&rect, p, tolerance) {
            InteractionState::Resizing {
                corner,
                anchor_rect: rect,
                origin: p,
            }
        } else if hit_test_interior(&rect, p, tolerance) {
            InteractionState::Dragging {
                grab_offset: p - rect.top_left(),
            }
        } else {
            let anchor = self.clamp_point(p);
            self.selection.set_rectangle(Rectangle::at(anchor));
            InteractionState::Drawing { anchor }
        };
        debug!("Pointer down at ({:.1}, {:.1}): {:?}", p.x, p.y, self.state);
    }

    /// Applies one drag frame. Returns whether the rectangle changed.
    pub fn pointer_move(&mut self, p: Point) -> bool {
        let before = self.selection.rectangle();
        let next = match self.state {
            InteractionState::Idle => return false,
            InteractionState::Drawing { anchor } => draw_from_anchor(
                anchor,
                self.clamp_point(p),
                self.selection.aspect(),
                self.canvas_w,
                self.canvas_h,
            ),
            InteractionState::Dragging { grab_offset } => clamp_to_canvas(
                Rectangle {
                    x: p.x - grab_offset.x,
                    y: p.y - grab_offset.y,
                    ..before
                },
                self.canvas_w,
                self.canvas_h,
            ),
            InteractionState::Resizing {
                corner,
                anchor_rect,
                origin,
            } => resize_from_corner(
                &anchor_rect,
                corner,
                p - origin,
                self.selection.aspect(),
                self.config.min_size,
                self.canvas_w,
                self.canvas_h,
            )
            .unwrap_or(before),
        };
        self.selection.set_rectangle(next);
        next != before
    }

    /// Ends the current interaction. Returns the committed rectangle when a
    /// non-empty selection results from it.
    pub fn pointer_up(&mut self) -> Option<Rectangle> {
        if self.is_idle() {
            return None;
        }
        self.state = InteractionState::Idle;
        let rect = self.selection.rectangle();
        if rect.is_degenerate() {
            return None;
        }
        debug!(
            "Committed selection {:.0},{:.0} {:.0}x{:.0}",
            rect.x, rect.y, rect.width, rect.height
        );
        Some(rect)
    }

    /// Leaving the canvas ends the interaction in place, same as releasing.
    pub fn pointer_leave(&mut self) -> Option<Rectangle> {
        self.pointer_up()
    }

    pub fn cursor_hint(&self, p: Point) -> CursorHint {
        match self.state {
            InteractionState::Idle => {
                let rect = self.selection.rectangle();
                let tolerance = self.config.corner_tolerance;
                if let Some(corner) = hit_test_corner(&rect, p, tolerance) {
                    CursorHint::Resize(corner)
                } else if hit_test_interior(&rect, p, tolerance) {
                    CursorHint::Move
                } else {
                    CursorHint::Crosshair
                }
            }
            InteractionState::Drawing { .. } => CursorHint::Crosshair,
            InteractionState::Dragging { .. } => CursorHint::Move,
            InteractionState::Resizing { corner, .. } => CursorHint::Resize(corner),
        }
    }

    fn clamp_point(&self, p: Point) -> Point {
        Point::new(
            p.x.min(self.canvas_w).max(0.0),
            p.y.min(self.canvas_h).max(0.0),
        )
    }
}

/// Rectangle spanned by `anchor` and `p`, growing towards `p` on each axis.
///
/// With a ratio the axis that moved further drives the other; the result is
/// shrunk, ratio intact, if it would run past the canvas edge it grows toward.
fn draw_from_anchor(
    anchor: Point,
    p: Point,
    aspect: AspectConstraint,
    canvas_w: f32,
    canvas_h: f32,
) -> Rectangle {
    let dx = p.x - anchor.x;
    let dy = p.y - anchor.y;
    let sign_x = if dx < 0.0 { -1.0 } else { 1.0 };
    let sign_y = if dy < 0.0 { -1.0 } else { 1.0 };

    let mut size = apply_aspect(
        Rectangle::new(0.0, 0.0, dx.abs(), dy.abs()),
        aspect,
        Driver::from_delta(dx, dy),
    );
    if let Some(ratio) = aspect.value() {
        let avail_w = if sign_x < 0.0 { anchor.x } else { canvas_w - anchor.x };
        let avail_h = if sign_y < 0.0 { anchor.y } else { canvas_h - anchor.y };
        if size.width > avail_w {
            size.width = avail_w;
            size.height = avail_w / ratio;
        }
        if size.height > avail_h {
            size.height = avail_h;
            size.width = avail_h * ratio;
        }
    }

    let x = if sign_x < 0.0 { anchor.x - size.width } else { anchor.x };
    let y = if sign_y < 0.0 { anchor.y - size.height } else { anchor.y };
    clamp_to_canvas(
        Rectangle::new(x, y, size.width, size.height),
        canvas_w,
        canvas_h,
    )
}

/// Deforms `anchor` by moving the two edges adjacent to `corner` by `delta`.
///
/// Returns `None` when the result is too small or leaves the canvas.
fn resize_from_corner(
    anchor: &Rectangle,
    corner: Corner,
    delta: Point,
    aspect: AspectConstraint,
    min_size: f32,
    canvas_w: f32,
    canvas_h: f32,
) -> Option<Rectangle> {
    let mut r = *anchor;
    if corner.moves_left() {
        r.x += delta.x;
        r.width -= delta.x;
    } else {
        r.width += delta.x;
    }
    if corner.moves_top() {
        r.y += delta.y;
        r.height -= delta.y;
    } else {
        r.height += delta.y;
    }

    if aspect.value().is_some() {
        r = apply_aspect(r, aspect, Driver::from_delta(delta.x, delta.y));
        // Keep the opposite corner pinned.
        if corner.moves_left() {
            r.x = anchor.right() - r.width;
        }
        if corner.moves_top() {
            r.y = anchor.bottom() - r.height;
        }
    }

    (r.width > min_size && r.height > min_size && r.fits_within(canvas_w, canvas_h)).then_some(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::corner_point;

    const EPS: f32 = 1e-4;

    fn controller() -> Controller {
        Controller::new(400.0, 300.0, ControllerConfig::default())
    }

    fn with_selection(r: Rectangle) -> Controller {
        let mut c = controller();
        c.pointer_down(r.top_left());
        c.pointer_move(Point::new(r.right(), r.bottom()));
        c.pointer_up();
        assert_eq!(c.rectangle(), r);
        c
    }

    fn anchor() -> Rectangle {
        Rectangle::new(10.0, 10.0, 100.0, 80.0)
    }

    #[test]
    fn resize_se_moves_right_and_bottom_edges() {
        let r = resize_from_corner(
            &anchor(),
            Corner::SE,
            Point::new(20.0, 10.0),
            AspectConstraint::Free,
            10.0,
            400.0,
            300.0,
        );
        assert_eq!(r, Some(Rectangle::new(10.0, 10.0, 120.0, 90.0)));
    }

    #[test]
    fn resize_nw_keeps_se_corner_fixed() {
        let r = resize_from_corner(
            &anchor(),
            Corner::NW,
            Point::new(20.0, 10.0),
            AspectConstraint::Free,
            10.0,
            400.0,
            300.0,
        )
        .unwrap();
        assert_eq!(r, Rectangle::new(30.0, 20.0, 80.0, 70.0));
        assert_eq!(corner_point(&r, Corner::SE), Point::new(110.0, 90.0));
    }

    #[test]
    fn resize_ne_and_sw_move_their_edges() {
        let ne = resize_from_corner(
            &anchor(),
            Corner::NE,
            Point::new(15.0, 5.0),
            AspectConstraint::Free,
            10.0,
            400.0,
            300.0,
        );
        assert_eq!(ne, Some(Rectangle::new(10.0, 15.0, 115.0, 75.0)));
        let sw = resize_from_corner(
            &anchor(),
            Corner::SW,
            Point::new(-5.0, 20.0),
            AspectConstraint::Free,
            10.0,
            400.0,
            300.0,
        );
        assert_eq!(sw, Some(Rectangle::new(5.0, 10.0, 105.0, 100.0)));
    }

    #[test]
    fn resize_with_aspect_pins_opposite_corner() {
        let square = AspectConstraint::Ratio { w: 1.0, h: 1.0 };
        let base = Rectangle::new(100.0, 100.0, 100.0, 80.0);
        for corner in Corner::ALL {
            let opposite = match corner {
                Corner::NW => Corner::SE,
                Corner::NE => Corner::SW,
                Corner::SW => Corner::NE,
                Corner::SE => Corner::NW,
            };
            let dx = if corner.moves_left() { 5.0 } else { -5.0 };
            let r = resize_from_corner(
                &base,
                corner,
                Point::new(dx, 2.0),
                square,
                10.0,
                400.0,
                300.0,
            )
            .unwrap();
            assert!((r.width - r.height).abs() < EPS, "{corner:?}: {r:?}");
            assert_eq!(
                corner_point(&r, opposite),
                corner_point(&base, opposite),
                "{corner:?}"
            );
        }
    }

    #[test]
    fn resize_rejects_small_or_out_of_bounds_results() {
        let too_narrow = resize_from_corner(
            &anchor(),
            Corner::SE,
            Point::new(-90.0, 0.0),
            AspectConstraint::Free,
            10.0,
            400.0,
            300.0,
        );
        assert_eq!(too_narrow, None);
        let past_edge = resize_from_corner(
            &anchor(),
            Corner::NW,
            Point::new(-20.0, 0.0),
            AspectConstraint::Free,
            10.0,
            400.0,
            300.0,
        );
        assert_eq!(past_edge, None);
    }

    #[test]
    fn rejected_resize_frame_keeps_previous_rectangle() {
        let mut c = with_selection(anchor());
        c.pointer_down(Point::new(110.0, 90.0));
        assert!(matches!(
            c.state(),
            InteractionState::Resizing {
                corner: Corner::SE,
                ..
            }
        ));
        assert!(c.pointer_move(Point::new(130.0, 100.0)));
        assert_eq!(c.rectangle(), Rectangle::new(10.0, 10.0, 120.0, 90.0));
        // Collapsing to 10px wide is refused, the last good frame stays.
        assert!(!c.pointer_move(Point::new(20.0, 100.0)));
        assert_eq!(c.rectangle(), Rectangle::new(10.0, 10.0, 120.0, 90.0));
        assert_eq!(c.pointer_up(), Some(Rectangle::new(10.0, 10.0, 120.0, 90.0)));
        assert!(c.is_idle());
    }

    #[test]
    fn drawing_up_and_left_flips_the_anchor() {
        let mut c = controller();
        c.pointer_down(Point::new(50.0, 50.0));
        assert!(matches!(c.state(), InteractionState::Drawing { .. }));
        c.pointer_move(Point::new(30.0, 20.0));
        assert_eq!(c.rectangle(), Rectangle::new(30.0, 20.0, 20.0, 30.0));
    }

    #[test]
    fn drawing_with_aspect_keeps_pointer_direction() {
        let mut c = controller();
        c.set_aspect(AspectConstraint::Ratio { w: 1.0, h: 1.0 });
        c.pointer_down(Point::new(50.0, 50.0));
        c.pointer_move(Point::new(80.0, 40.0));
        assert_eq!(c.rectangle(), Rectangle::new(50.0, 20.0, 30.0, 30.0));
    }

    #[test]
    fn drawing_with_aspect_fits_inside_canvas() {
        let mut c = controller();
        c.set_aspect(AspectConstraint::Ratio { w: 2.0, h: 1.0 });
        c.pointer_down(Point::new(300.0, 200.0));
        c.pointer_move(Point::new(300.0, 1000.0));
        let r = c.rectangle();
        assert!(r.fits_within(400.0, 300.0), "{r:?}");
        assert!((r.width / r.height - 2.0).abs() < EPS);
        assert_eq!(r, Rectangle::new(300.0, 200.0, 100.0, 50.0));
    }

    #[test]
    fn drawing_clamps_pointer_to_canvas() {
        let mut c = controller();
        c.pointer_down(Point::new(350.0, 250.0));
        c.pointer_move(Point::new(900.0, 900.0));
        assert_eq!(c.rectangle(), Rectangle::new(350.0, 250.0, 50.0, 50.0));
    }

    #[test]
    fn dragging_translates_within_bounds() {
        let mut c = with_selection(anchor());
        c.pointer_down(Point::new(60.0, 50.0));
        assert_eq!(
            c.state(),
            InteractionState::Dragging {
                grab_offset: Point::new(50.0, 40.0)
            }
        );
        c.pointer_move(Point::new(100.0, 70.0));
        assert_eq!(c.rectangle(), Rectangle::new(50.0, 30.0, 100.0, 80.0));
        c.pointer_move(Point::new(1000.0, -500.0));
        assert_eq!(c.rectangle(), Rectangle::new(300.0, 0.0, 100.0, 80.0));
    }

    #[test]
    fn click_outside_starts_a_new_draw() {
        let mut c = with_selection(anchor());
        c.pointer_down(Point::new(300.0, 250.0));
        assert_eq!(c.rectangle(), Rectangle::new(300.0, 250.0, 0.0, 0.0));
        assert_eq!(c.pointer_up(), None);
        assert!(!c.selection().has_selection());
    }

    #[test]
    fn leave_behaves_like_release() {
        let mut c = controller();
        c.pointer_down(Point::new(10.0, 10.0));
        c.pointer_move(Point::new(60.0, 40.0));
        assert_eq!(c.pointer_leave(), Some(Rectangle::new(10.0, 10.0, 50.0, 30.0)));
        assert!(c.is_idle());
        assert!(!c.pointer_move(Point::new(200.0, 200.0)));
        assert_eq!(c.pointer_leave(), None);
    }

    #[test]
    fn leaving_while_dragging_keeps_the_moved_rectangle() {
        let mut c = with_selection(anchor());
        c.pointer_down(Point::new(60.0, 50.0));
        assert!(matches!(c.state(), InteractionState::Dragging { .. }));
        c.pointer_move(Point::new(160.0, 120.0));
        let moved = Rectangle::new(110.0, 80.0, 100.0, 80.0);
        assert_eq!(c.pointer_leave(), Some(moved));
        assert!(c.is_idle());
        assert_eq!(c.rectangle(), moved);
    }

    #[test]
    fn leaving_while_resizing_keeps_the_last_accepted_frame() {
        let mut c = with_selection(anchor());
        c.pointer_down(Point::new(110.0, 90.0));
        assert!(matches!(
            c.state(),
            InteractionState::Resizing {
                corner: Corner::SE,
                ..
            }
        ));
        c.pointer_move(Point::new(150.0, 130.0));
        // Out of bounds, so this frame is dropped.
        c.pointer_move(Point::new(900.0, 900.0));
        let resized = Rectangle::new(10.0, 10.0, 140.0, 120.0);
        assert_eq!(c.pointer_leave(), Some(resized));
        assert!(c.is_idle());
        assert_eq!(c.rectangle(), resized);
        assert_ne!(c.rectangle(), anchor());
    }

    #[test]
    fn cursor_hint_follows_hover_target_and_state() {
        let mut c = with_selection(anchor());
        assert_eq!(
            c.cursor_hint(Point::new(11.0, 11.0)),
            CursorHint::Resize(Corner::NW)
        );
        assert_eq!(c.cursor_hint(Point::new(60.0, 50.0)), CursorHint::Move);
        assert_eq!(c.cursor_hint(Point::new(300.0, 250.0)), CursorHint::Crosshair);
        assert_eq!(CursorHint::Resize(Corner::NE).icon(), egui::CursorIcon::ResizeNeSw);

        c.pointer_down(Point::new(109.0, 11.0));
        assert_eq!(
            c.cursor_hint(Point::new(300.0, 250.0)),
            CursorHint::Resize(Corner::NE)
        );
    }

    #[test]
    fn reset_clears_selection_and_state() {
        let mut c = with_selection(anchor());
        c.pointer_down(Point::new(60.0, 50.0));
        c.reset();
        assert!(c.is_idle());
        assert_eq!(c.rectangle(), Rectangle::EMPTY);
        assert_eq!(c.cursor_hint(Point::new(60.0, 50.0)), CursorHint::Crosshair);
    }

    #[test]
    fn aspect_change_leaves_current_rectangle() {
        let mut c = with_selection(anchor());
        c.set_aspect(AspectConstraint::Ratio { w: 16.0, h: 9.0 });
        assert_eq!(c.rectangle(), anchor());
    }
}
