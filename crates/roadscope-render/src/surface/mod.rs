//! Drawing surfaces.
//!
//! A [`Surface`] is the 2D drawing context the executor replays instructions
//! against. It owns a transform stack (save/restore, reset, translate,
//! scale, rotate, current matrix) and a handful of device-space primitives:
//! solid paint, path fill, path stroke, and text. Geometry reaching a
//! surface is already in device pixels; [`crate::primitives`] maps each
//! drawing op through the current matrix before calling in.
//!
//! Three surfaces ship with the crate:
//!
//! | Surface | Output | Module |
//! |---------|--------|--------|
//! | [`RasterSurface`] | PNG (tiny-skia pixmap) | [`raster`] |
//! | [`VectorSurface`] | SVG or PDF document | [`vector`] |
//! | [`RecordingSurface`] | list of calls, for headless checks | [`recording`] |
//!
//! [`Canvas`] wraps any of them behind one owned value.

pub mod raster;
pub mod recording;
pub mod vector;

use std::fmt;

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::instruction::TextAlign;
use crate::RenderError;

pub use raster::RasterSurface;
pub use recording::{RecordingSurface, SurfaceCall};
pub use vector::{VectorFormat, VectorSurface};

// ---------------------------------------------------------------------------
// SurfaceKind
// ---------------------------------------------------------------------------

/// The concrete type behind a surface, which decides the formats it can
/// be written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// Pixel surface, written as PNG.
    #[default]
    Raster,
    /// Vector surface producing SVG.
    Svg,
    /// Vector surface producing PDF.
    Pdf,
    /// In-memory call recorder; cannot be written to a file.
    Recording,
}

impl SurfaceKind {
    /// The kind that writes files with this extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(SurfaceKind::Raster),
            "svg" => Some(SurfaceKind::Svg),
            "pdf" => Some(SurfaceKind::Pdf),
            _ => None,
        }
    }

    /// File extension produced by this kind.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            SurfaceKind::Raster => Some("png"),
            SurfaceKind::Svg => Some("svg"),
            SurfaceKind::Pdf => Some("pdf"),
            SurfaceKind::Recording => None,
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SurfaceKind::Raster => "raster (png)",
            SurfaceKind::Svg => "svg",
            SurfaceKind::Pdf => "pdf",
            SurfaceKind::Recording => "recording",
        })
    }
}

// ---------------------------------------------------------------------------
// Device-space geometry
// ---------------------------------------------------------------------------

/// One segment of a device-space path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(DVec2),
    LineTo(DVec2),
    /// Cubic Bezier: two control points, then the end point.
    CubicTo(DVec2, DVec2, DVec2),
    Close,
}

/// A path in device pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DevicePath {
    pub segments: Vec<PathSegment>,
}

impl DevicePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: DVec2) -> &mut Self {
        self.segments.push(PathSegment::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: DVec2) -> &mut Self {
        self.segments.push(PathSegment::LineTo(p));
        self
    }

    pub fn cubic_to(&mut self, c1: DVec2, c2: DVec2, end: DVec2) -> &mut Self {
        self.segments.push(PathSegment::CubicTo(c1, c2, end));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.segments.push(PathSegment::Close);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Every point mentioned by the path, control points included.
    pub fn points(&self) -> Vec<DVec2> {
        let mut out = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match *segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => out.push(p),
                PathSegment::CubicTo(a, b, c) => out.extend([a, b, c]),
                PathSegment::Close => {}
            }
        }
        out
    }

    /// Axis-aligned hull of [`points`](Self::points), or `None` if empty.
    pub fn bounds(&self) -> Option<(DVec2, DVec2)> {
        let mut iter = self.points().into_iter();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Stroke parameters in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    /// `(on, off)` dash lengths, or `None` for a solid line.
    pub dash: Option<(f64, f64)>,
}

/// Text parameters; `size` is in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub color: Color,
    pub align: TextAlign,
}

// ---------------------------------------------------------------------------
// TransformStack
// ---------------------------------------------------------------------------

/// Current transform plus the saved transforms below it.
///
/// Operations compose on the right, so the most recent call applies first
/// to incoming geometry (the usual 2D-context convention).
#[derive(Debug, Clone, PartialEq)]
pub struct TransformStack {
    current: DAffine2,
    saved: Vec<DAffine2>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self {
            current: DAffine2::IDENTITY,
            saved: Vec::new(),
        }
    }
}

impl TransformStack {
    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Pop the last saved transform. An unbalanced restore keeps the
    /// current transform.
    pub fn restore(&mut self) {
        match self.saved.pop() {
            Some(m) => self.current = m,
            None => tracing::warn!("restore without matching save; transform unchanged"),
        }
    }

    pub fn reset(&mut self) {
        self.current = DAffine2::IDENTITY;
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current = self.current * DAffine2::from_translation(DVec2::new(dx, dy));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.current = self.current * DAffine2::from_scale(DVec2::new(sx, sy));
    }

    pub fn rotate(&mut self, radians: f64) {
        self.current = self.current * DAffine2::from_angle(radians);
    }

    pub fn matrix(&self) -> DAffine2 {
        self.current
    }

    /// Number of saved transforms.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// A 2D drawing context.
pub trait Surface {
    /// Canvas width in pixels.
    fn width(&self) -> u32;
    /// Canvas height in pixels.
    fn height(&self) -> u32;
    /// What this surface can be written as.
    fn kind(&self) -> SurfaceKind;

    fn transform(&self) -> &TransformStack;
    fn transform_mut(&mut self) -> &mut TransformStack;

    /// Cover the whole canvas with a solid color, ignoring the transform.
    fn paint(&mut self, color: Color);
    /// Fill a device-space path (non-zero winding).
    fn fill_path(&mut self, path: &DevicePath, color: Color);
    /// Stroke a device-space path.
    fn stroke_path(&mut self, path: &DevicePath, style: &StrokeStyle);
    /// Draw text whose baseline anchor is the device point `position`.
    fn fill_text(&mut self, text: &str, position: DVec2, style: &TextStyle);

    fn save(&mut self) {
        self.transform_mut().save();
    }

    fn restore(&mut self) {
        self.transform_mut().restore();
    }

    fn reset_transform(&mut self) {
        self.transform_mut().reset();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform_mut().translate(dx, dy);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform_mut().scale(sx, sy);
    }

    fn rotate(&mut self, radians: f64) {
        self.transform_mut().rotate(radians);
    }

    /// The current user-to-device matrix.
    fn matrix(&self) -> DAffine2 {
        self.transform().matrix()
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// An owned surface of any shipped kind.
#[derive(Debug)]
pub enum Canvas {
    Raster(RasterSurface),
    Vector(VectorSurface),
    Recording(RecordingSurface),
}

impl Canvas {
    /// Allocate a blank surface of the given kind.
    pub fn new(kind: SurfaceKind, width: u32, height: u32) -> Result<Self, RenderError> {
        Ok(match kind {
            SurfaceKind::Raster => Canvas::Raster(RasterSurface::new(width, height)?),
            SurfaceKind::Svg => Canvas::Vector(VectorSurface::new(VectorFormat::Svg, width, height)?),
            SurfaceKind::Pdf => Canvas::Vector(VectorSurface::new(VectorFormat::Pdf, width, height)?),
            SurfaceKind::Recording => Canvas::Recording(RecordingSurface::new(width, height)),
        })
    }

    fn inner(&self) -> &dyn Surface {
        match self {
            Canvas::Raster(s) => s,
            Canvas::Vector(s) => s,
            Canvas::Recording(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Surface {
        match self {
            Canvas::Raster(s) => s,
            Canvas::Vector(s) => s,
            Canvas::Recording(s) => s,
        }
    }

    pub fn as_raster(&self) -> Option<&RasterSurface> {
        match self {
            Canvas::Raster(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&VectorSurface> {
        match self {
            Canvas::Vector(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_recording(&self) -> Option<&RecordingSurface> {
        match self {
            Canvas::Recording(s) => Some(s),
            _ => None,
        }
    }
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.inner().width()
    }

    fn height(&self) -> u32 {
        self.inner().height()
    }

    fn kind(&self) -> SurfaceKind {
        self.inner().kind()
    }

    fn transform(&self) -> &TransformStack {
        self.inner().transform()
    }

    fn transform_mut(&mut self) -> &mut TransformStack {
        self.inner_mut().transform_mut()
    }

    fn paint(&mut self, color: Color) {
        self.inner_mut().paint(color);
    }

    fn fill_path(&mut self, path: &DevicePath, color: Color) {
        self.inner_mut().fill_path(path, color);
    }

    fn stroke_path(&mut self, path: &DevicePath, style: &StrokeStyle) {
        self.inner_mut().stroke_path(path, style);
    }

    fn fill_text(&mut self, text: &str, position: DVec2, style: &TextStyle) {
        self.inner_mut().fill_text(text, position, style);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_ops_compose_on_the_right() {
        let mut stack = TransformStack::default();
        stack.translate(10.0, 0.0);
        stack.scale(2.0, 2.0);
        let p = stack.matrix().transform_point2(DVec2::new(1.0, 1.0));
        assert_eq!(p, DVec2::new(12.0, 2.0));
    }

    #[test]
    fn save_restore_roundtrip_and_unbalanced_restore() {
        let mut stack = TransformStack::default();
        stack.translate(5.0, 5.0);
        stack.save();
        stack.reset();
        assert_eq!(stack.matrix(), DAffine2::IDENTITY);
        stack.restore();
        assert_eq!(stack.matrix().translation, DVec2::new(5.0, 5.0));
        stack.restore();
        assert_eq!(stack.matrix().translation, DVec2::new(5.0, 5.0));
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn kind_from_extension_is_case_insensitive() {
        assert_eq!(SurfaceKind::from_extension("PNG"), Some(SurfaceKind::Raster));
        assert_eq!(SurfaceKind::from_extension("svg"), Some(SurfaceKind::Svg));
        assert_eq!(SurfaceKind::from_extension("Pdf"), Some(SurfaceKind::Pdf));
        assert_eq!(SurfaceKind::from_extension("jpg"), None);
    }

    #[test]
    fn path_bounds_cover_control_points() {
        let mut path = DevicePath::new();
        path.move_to(DVec2::new(0.0, 0.0))
            .cubic_to(DVec2::new(5.0, -2.0), DVec2::new(6.0, 8.0), DVec2::new(3.0, 3.0))
            .close();
        assert_eq!(path.bounds(), Some((DVec2::new(0.0, -2.0), DVec2::new(6.0, 8.0))));
        assert_eq!(DevicePath::new().bounds(), None);
    }

    #[test]
    fn canvas_new_dispatches_on_kind() {
        for kind in [SurfaceKind::Raster, SurfaceKind::Svg, SurfaceKind::Pdf, SurfaceKind::Recording] {
            let canvas = Canvas::new(kind, 16, 8).unwrap();
            assert_eq!(canvas.kind(), kind);
            assert_eq!((canvas.width(), canvas.height()), (16, 8));
        }
    }
}
