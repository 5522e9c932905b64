//! Auto-fit: derive a camera that frames all scene content.
//!
//! [`camera_fit_to_content`] scans every `scene`-tagged instruction of a
//! [`RenderModel`], bounds the points each one contributes, corrects the
//! bounds to the canvas aspect ratio, and returns a camera that shows the
//! whole region with a fractional border.
//!
//! Contributing points per operation:
//!
//! | Operation | Points |
//! |-----------|--------|
//! | circle, rounded rect | center only |
//! | text | anchor |
//! | line, dashed line, point trail, fill region | every vertex |
//! | vehicle footprint | center +/- bounding radius |
//!
//! Camera-pixel and camera-relative instructions never contribute.

use glam::DVec2;

use super::CameraState;
use crate::instruction::{CoordinateSystem, DrawOp};
use crate::model::RenderModel;

// ---------------------------------------------------------------------------
// BoundingBox
// ---------------------------------------------------------------------------

/// Running axis-aligned bounds that start out empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    /// The not-yet-seen sentinel: inverted infinite bounds.
    pub const EMPTY: BoundingBox = BoundingBox {
        min: DVec2::splat(f64::INFINITY),
        max: DVec2::splat(f64::NEG_INFINITY),
    };

    /// Whether no point has been included yet.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn include(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Include the axis-aligned square that bounds a circle.
    pub fn include_circle(&mut self, center: DVec2, radius: f64) {
        let r = DVec2::splat(radius.abs());
        self.include(center - r);
        self.include(center + r);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Include the points one drawing op contributes.
    pub fn include_op(&mut self, op: &DrawOp) {
        match op {
            DrawOp::Circle { center, .. } | DrawOp::RoundedRect { center, .. } => self.include(*center),
            DrawOp::Text { anchor, .. } => self.include(*anchor),
            DrawOp::Line { points, .. }
            | DrawOp::DashedLine { points, .. }
            | DrawOp::PointTrail { points, .. }
            | DrawOp::FillRegion { points, .. } => {
                for p in points.points() {
                    self.include(*p);
                }
            }
            DrawOp::VehicleFootprint {
                center, length, width, ..
            } => {
                let radius = (length / 2.0).hypot(width / 2.0);
                self.include_circle(*center, radius);
            }
        }
    }

    /// Grow any zero-sized axis to one unit, centered on its original value.
    #[must_use]
    fn with_minimum_extent(mut self) -> Self {
        if self.width() == 0.0 {
            self.min.x -= 0.5;
            self.max.x += 0.5;
        }
        if self.height() == 0.0 {
            self.min.y -= 0.5;
            self.max.y += 0.5;
        }
        self
    }

    /// Expand the shorter axis symmetrically until `width / height` equals
    /// `aspect`. When the box is relatively wider than `aspect`, height
    /// grows; otherwise width grows.
    #[must_use]
    fn matched_to_aspect(mut self, aspect: f64) -> Self {
        let (w, h) = (self.width(), self.height());
        if w / h > aspect {
            let grow = (w / aspect - h) / 2.0;
            self.min.y -= grow;
            self.max.y += grow;
        } else {
            let grow = (h * aspect - w) / 2.0;
            self.min.x -= grow;
            self.max.x += grow;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// camera_fit_to_content
// ---------------------------------------------------------------------------

/// Compute a camera that frames every scene instruction of `model`.
///
/// `percent_border` is the fraction of the canvas width left as margin
/// (`0.1` leaves 5% on each side horizontally). When nothing in the model
/// contributes a point, a warning is logged and a camera centered on
/// `(canvas_width / 2, canvas_height / 2)` with zoom 1 is returned, i.e.
/// world units map one-to-one onto the canvas.
pub fn camera_fit_to_content(
    model: &RenderModel,
    canvas_width: u32,
    canvas_height: u32,
    percent_border: f64,
) -> CameraState {
    let mut bbox = BoundingBox::EMPTY;
    for instruction in model.in_system(CoordinateSystem::Scene) {
        bbox.include_op(&instruction.op);
    }

    let canvas_w = f64::from(canvas_width);
    let canvas_h = f64::from(canvas_height);

    if bbox.is_empty() {
        tracing::warn!(
            instructions = model.len(),
            "no scene content to fit; using a default camera centered on the canvas"
        );
        return CameraState::for_canvas(canvas_width, canvas_height)
            .with_position(DVec2::new(canvas_w / 2.0, canvas_h / 2.0));
    }

    let fitted = bbox.with_minimum_extent().matched_to_aspect(canvas_w / canvas_h);
    let zoom = canvas_w * (1.0 - percent_border) / fitted.width();

    tracing::debug!(
        min_x = bbox.min.x,
        min_y = bbox.min.y,
        max_x = bbox.max.x,
        max_y = bbox.max.y,
        zoom,
        "fitted camera to scene content"
    );

    CameraState::for_canvas(canvas_width, canvas_height)
        .with_position(fitted.center())
        .with_zoom(zoom)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
