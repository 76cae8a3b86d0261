//! Selection state and the pure rectangle geometry it relies on.

use crate::model::{AspectConstraint, Corner, Driver, Point, Rectangle};

/// Current crop rectangle plus the aspect constraint applied to it.
#[derive(Clone, Debug, Default)]
pub struct SelectionModel {
    rect: Rectangle,
    aspect: AspectConstraint,
}

impl SelectionModel {
    pub fn rectangle(&self) -> Rectangle {
        self.rect
    }

    pub fn aspect(&self) -> AspectConstraint {
        self.aspect
    }

    pub fn has_selection(&self) -> bool {
        !self.rect.is_degenerate()
    }

    /// Replaces the rectangle. Only the dimensions are sanitised; clamping is
    /// the caller's job.
    pub fn set_rectangle(&mut self, r: Rectangle) {
        self.rect = Rectangle {
            width: r.width.max(0.0),
            height: r.height.max(0.0),
            ..r
        };
    }

    pub fn set_aspect(&mut self, aspect: AspectConstraint) {
        self.aspect = aspect;
    }

    pub fn reset(&mut self) {
        self.rect = Rectangle::EMPTY;
    }

    /// Sets the width from a numeric input, deriving the height when a ratio
    /// is active. Non-positive values are ignored.
    pub fn set_width(&mut self, width: f32, canvas_w: f32, canvas_h: f32) {
        if !(width > 0.0) {
            return;
        }
        let r = Rectangle {
            width,
            ..self.rect
        };
        let r = apply_aspect(r, self.aspect, Driver::Width);
        self.set_rectangle(self.fit(r, canvas_w, canvas_h));
    }

    pub fn set_height(&mut self, height: f32, canvas_w: f32, canvas_h: f32) {
        if !(height > 0.0) {
            return;
        }
        let r = Rectangle {
            height,
            ..self.rect
        };
        let r = apply_aspect(r, self.aspect, Driver::Height);
        self.set_rectangle(self.fit(r, canvas_w, canvas_h));
    }

    fn fit(&self, r: Rectangle, canvas_w: f32, canvas_h: f32) -> Rectangle {
        match self.aspect {
            AspectConstraint::Free => clamp_to_canvas(r, canvas_w, canvas_h),
            AspectConstraint::Ratio { .. } => fit_to_canvas(r, canvas_w, canvas_h),
        }
    }
}

/// Shrinks `r` to the canvas size if needed, then translates it inside.
pub fn clamp_to_canvas(r: Rectangle, canvas_w: f32, canvas_h: f32) -> Rectangle {
    let canvas_w = canvas_w.max(0.0);
    let canvas_h = canvas_h.max(0.0);
    let width = r.width.max(0.0).min(canvas_w);
    let height = r.height.max(0.0).min(canvas_h);
    Rectangle {
        x: r.x.min(canvas_w - width).max(0.0),
        y: r.y.min(canvas_h - height).max(0.0),
        width,
        height,
    }
}

/// Like [`clamp_to_canvas`], but an oversized rectangle is scaled down by a
/// single factor so its width/height ratio survives.
pub fn fit_to_canvas(r: Rectangle, canvas_w: f32, canvas_h: f32) -> Rectangle {
    let scale = (canvas_w / r.width).min(canvas_h / r.height).min(1.0);
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    clamp_to_canvas(
        Rectangle {
            width: r.width * scale,
            height: r.height * scale,
            ..r
        },
        canvas_w,
        canvas_h,
    )
}

/// Recomputes the non-driving dimension from the constraint. Position is
/// left untouched.
pub fn apply_aspect(r: Rectangle, constraint: AspectConstraint, driver: Driver) -> Rectangle {
    let Some(ratio) = constraint.value() else {
        return r;
    };
    match driver {
        Driver::Width => Rectangle {
            height: r.width / ratio,
            ..r
        },
        Driver::Height => Rectangle {
            width: r.height * ratio,
            ..r
        },
    }
}

pub fn corner_point(r: &Rectangle, corner: Corner) -> Point {
    match corner {
        Corner::NW => Point::new(r.x, r.y),
        Corner::NE => Point::new(r.right(), r.y),
        Corner::SW => Point::new(r.x, r.bottom()),
        Corner::SE => Point::new(r.right(), r.bottom()),
    }
}

/// Nearest corner within `tolerance` of `p`. Empty selections have no corners.
pub fn hit_test_corner(r: &Rectangle, p: Point, tolerance: f32) -> Option<Corner> {
    if r.is_degenerate() {
        return None;
    }
    Corner::ALL
        .into_iter()
        .map(|c| (c, corner_point(r, c).distance(p)))
        .filter(|(_, d)| *d <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}

/// Inside the rectangle and not close enough to a corner to count as a resize.
pub fn hit_test_interior(r: &Rectangle, p: Point, tolerance: f32) -> bool {
    !r.is_degenerate() && hit_test_corner(r, p, tolerance).is_none() && r.contains(p)
}

/// The four regions of the canvas outside `r`: top strip, left, right, bottom
/// strip.
pub fn dim_regions(r: &Rectangle, canvas_w: f32, canvas_h: f32) -> [Rectangle; 4] {
    [
        Rectangle::new(0.0, 0.0, canvas_w, r.y),
        Rectangle::new(0.0, r.y, r.x, r.height),
        Rectangle::new(r.right(), r.y, canvas_w - r.right(), r.height),
        Rectangle::new(0.0, r.bottom(), canvas_w, canvas_h - r.bottom()),
    ]
}
