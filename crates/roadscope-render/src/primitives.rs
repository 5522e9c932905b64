//! Drawing ops to surface calls.
//!
//! [`draw_op`] builds each op's outline in user space, maps it through the
//! surface's current matrix, and hands device-space paths to the surface.
//! Stroke widths and dash lengths are scaled by the matrix's mean scale
//! factor, `sqrt(|det|)`.
//!
//! Text is the exception: only its anchor goes through the matrix. The
//! glyphs are then drawn under the identity transform, so labels keep
//! their pixel size and are never rotated or mirrored by the camera.

use glam::{DAffine2, DVec2};

use crate::color::Color;
use crate::instruction::{DrawOp, Polyline, Stroke};
use crate::surface::{DevicePath, StrokeStyle, Surface, TextStyle};

/// Control-point distance for a quarter-circle cubic Bezier.
const KAPPA: f64 = 0.552_284_749_8;

/// Draws into a [`DevicePath`], mapping every user-space point through a
/// fixed matrix.
struct MappedPath {
    matrix: DAffine2,
    path: DevicePath,
}

impl MappedPath {
    fn new(matrix: DAffine2) -> Self {
        Self {
            matrix,
            path: DevicePath::new(),
        }
    }

    fn map(&self, p: DVec2) -> DVec2 {
        self.matrix.transform_point2(p)
    }

    fn move_to(&mut self, p: DVec2) {
        let p = self.map(p);
        self.path.move_to(p);
    }

    fn line_to(&mut self, p: DVec2) {
        let p = self.map(p);
        self.path.line_to(p);
    }

    fn cubic_to(&mut self, c1: DVec2, c2: DVec2, end: DVec2) {
        let (c1, c2, end) = (self.map(c1), self.map(c2), self.map(end));
        self.path.cubic_to(c1, c2, end);
    }

    fn close(&mut self) {
        self.path.close();
    }

    /// A full circle as four cubic arcs, counter-clockwise from +x.
    fn circle(&mut self, center: DVec2, radius: f64) {
        let k = radius * KAPPA;
        let (r, c) = (radius, center);
        self.move_to(c + DVec2::new(r, 0.0));
        self.cubic_to(c + DVec2::new(r, k), c + DVec2::new(k, r), c + DVec2::new(0.0, r));
        self.cubic_to(c + DVec2::new(-k, r), c + DVec2::new(-r, k), c + DVec2::new(-r, 0.0));
        self.cubic_to(c + DVec2::new(-r, -k), c + DVec2::new(-k, -r), c + DVec2::new(0.0, -r));
        self.cubic_to(c + DVec2::new(k, -r), c + DVec2::new(r, -k), c + DVec2::new(r, 0.0));
        self.close();
    }

    /// Closed polygon through `points`.
    fn polygon(&mut self, points: &[DVec2]) {
        self.polyline(points);
        self.close();
    }

    /// Open polyline through `points`.
    fn polyline(&mut self, points: &[DVec2]) {
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            self.move_to(*first);
        }
        for p in iter {
            self.line_to(*p);
        }
    }

    /// Rectangle of `size` centered on `center`, rotated by `rotation`,
    /// with corner radius clamped to half the shorter side.
    fn rounded_rect(&mut self, center: DVec2, size: DVec2, corner_radius: f64, rotation: f64) {
        let local = DAffine2::from_translation(center) * DAffine2::from_angle(rotation);
        let half = size.abs() * 0.5;
        let r = corner_radius.max(0.0).min(half.x).min(half.y);
        let k = r * KAPPA;
        let at = |x: f64, y: f64| local.transform_point2(DVec2::new(x, y));

        if r == 0.0 {
            let corners = [at(-half.x, -half.y), at(half.x, -half.y), at(half.x, half.y), at(-half.x, half.y)];
            self.polygon(&corners);
            return;
        }

        let (hx, hy) = (half.x, half.y);
        self.move_to(at(-hx + r, -hy));
        self.line_to(at(hx - r, -hy));
        self.cubic_to(at(hx - r + k, -hy), at(hx, -hy + r - k), at(hx, -hy + r));
        self.line_to(at(hx, hy - r));
        self.cubic_to(at(hx, hy - r + k), at(hx - r + k, hy), at(hx - r, hy));
        self.line_to(at(-hx + r, hy));
        self.cubic_to(at(-hx + r - k, hy), at(-hx, hy - r + k), at(-hx, hy - r));
        self.line_to(at(-hx, -hy + r));
        self.cubic_to(at(-hx, -hy + r - k), at(-hx + r - k, -hy), at(-hx + r, -hy));
        self.close();
    }

    fn finish(self) -> DevicePath {
        self.path
    }
}

/// Mean linear scale of `matrix`.
pub fn scale_factor(matrix: DAffine2) -> f64 {
    matrix.matrix2.determinant().abs().sqrt()
}

fn stroke_style(stroke: &Stroke, matrix: DAffine2, dash: Option<(f64, f64)>) -> StrokeStyle {
    let s = scale_factor(matrix);
    StrokeStyle {
        color: stroke.color,
        width: stroke.width * s,
        dash: dash.map(|(on, off)| (on * s, off * s)),
    }
}

fn fill_and_stroke<S: Surface + ?Sized>(
    surface: &mut S,
    path: &DevicePath,
    fill: Option<Color>,
    stroke: Option<&Stroke>,
    matrix: DAffine2,
) {
    if let Some(color) = fill {
        surface.fill_path(path, color);
    }
    if let Some(stroke) = stroke {
        surface.stroke_path(path, &stroke_style(stroke, matrix, None));
    }
}

fn stroke_polyline<S: Surface + ?Sized>(
    surface: &mut S,
    points: &Polyline,
    stroke: &Stroke,
    dash: Option<(f64, f64)>,
    matrix: DAffine2,
) {
    if points.len() < 2 {
        return;
    }
    let mut path = MappedPath::new(matrix);
    path.polyline(points.points());
    surface.stroke_path(&path.finish(), &stroke_style(stroke, matrix, dash));
}

/// Draw one op using the surface's current transform.
pub fn draw_op<S: Surface + ?Sized>(surface: &mut S, op: &DrawOp) {
    let matrix = surface.matrix();
    match op {
        DrawOp::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            let mut path = MappedPath::new(matrix);
            path.circle(*center, *radius);
            fill_and_stroke(surface, &path.finish(), *fill, stroke.as_ref(), matrix);
        }
        DrawOp::RoundedRect {
            center,
            width,
            height,
            corner_radius,
            rotation,
            fill,
            stroke,
        } => {
            let mut path = MappedPath::new(matrix);
            path.rounded_rect(*center, DVec2::new(*width, *height), *corner_radius, *rotation);
            fill_and_stroke(surface, &path.finish(), *fill, stroke.as_ref(), matrix);
        }
        DrawOp::Text {
            text,
            anchor,
            size,
            color,
            align,
        } => {
            let position = matrix.transform_point2(*anchor);
            let style = TextStyle {
                size: *size,
                color: *color,
                align: *align,
            };
            surface.save();
            surface.reset_transform();
            surface.fill_text(text, position, &style);
            surface.restore();
        }
        DrawOp::Line { points, stroke } => stroke_polyline(surface, points, stroke, None, matrix),
        DrawOp::DashedLine {
            points,
            stroke,
            dash,
            gap,
        } => stroke_polyline(surface, points, stroke, Some((*dash, *gap)), matrix),
        DrawOp::PointTrail { points, radius, color } => {
            for p in points.points() {
                let mut path = MappedPath::new(matrix);
                path.circle(*p, *radius);
                surface.fill_path(&path.finish(), *color);
            }
        }
        DrawOp::FillRegion { points, color } => {
            if points.len() < 3 {
                tracing::trace!(points = points.len(), "fill region needs three points; skipped");
                return;
            }
            let mut path = MappedPath::new(matrix);
            path.polygon(points.points());
            surface.fill_path(&path.finish(), *color);
        }
        DrawOp::VehicleFootprint {
            center,
            heading,
            length,
            width,
            fill,
            outline,
        } => {
            let mut path = MappedPath::new(matrix);
            path.rounded_rect(*center, DVec2::new(*length, *width), 0.0, *heading);
            fill_and_stroke(surface, &path.finish(), Some(*fill), outline.as_ref(), matrix);
        }
    }
}
