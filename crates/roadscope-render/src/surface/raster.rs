//! Pixel surface backed by a tiny-skia pixmap.
//!
//! Paths are filled and stroked with anti-aliasing in device space. Text
//! is rasterized glyph by glyph with fontdue and blended source-over into
//! the pixmap; without a loaded font, text calls are skipped.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use glam::DVec2;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

use super::{DevicePath, PathSegment, StrokeStyle, Surface, SurfaceKind, TextStyle, TransformStack};
use crate::color::Color;
use crate::instruction::TextAlign;
use crate::RenderError;

/// Parse a TrueType/OpenType font file for use by raster surfaces.
pub fn load_font(path: impl AsRef<Path>) -> Result<Arc<fontdue::Font>, RenderError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()).map_err(|details| {
        RenderError::Font {
            path: path.display().to_string(),
            details: details.to_string(),
        }
    })?;
    tracing::debug!(path = %path.display(), "loaded font");
    Ok(Arc::new(font))
}

/// A tiny-skia pixmap plus the transform stack.
pub struct RasterSurface {
    pixmap: Pixmap,
    transform: TransformStack,
    font: Option<Arc<fontdue::Font>>,
}

impl fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("font", &self.font.is_some())
            .finish()
    }
}

impl RasterSurface {
    /// Allocate a transparent pixmap.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::SurfaceCreation { width, height })?;
        Ok(Self {
            pixmap,
            transform: TransformStack::default(),
            font: None,
        })
    }

    #[must_use]
    pub fn with_font(mut self, font: Arc<fontdue::Font>) -> Self {
        self.font = Some(font);
        self
    }

    pub fn set_font(&mut self, font: Option<Arc<fontdue::Font>>) {
        self.font = font;
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA of one pixel, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::ImageEncoding(e.to_string()))
    }

    fn paint_for(color: Color) -> Paint<'static> {
        let [r, g, b, a] = color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color(tiny_skia::Color::from_rgba8(r, g, b, a));
        paint.anti_alias = true;
        paint
    }

    fn skia_path(path: &DevicePath) -> Option<tiny_skia::Path> {
        let mut pb = PathBuilder::new();
        for segment in &path.segments {
            match *segment {
                PathSegment::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
                PathSegment::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
                PathSegment::CubicTo(a, b, c) => {
                    pb.cubic_to(a.x as f32, a.y as f32, b.x as f32, b.y as f32, c.x as f32, c.y as f32)
                }
                PathSegment::Close => pb.close(),
            }
        }
        pb.finish()
    }

    /// Blend an 8-bit coverage mask at integer offset `(left, top)`.
    fn blend_coverage(&mut self, left: i32, top: i32, width: usize, coverage: &[u8], color: Color) {
        let (canvas_w, canvas_h) = (self.pixmap.width() as i32, self.pixmap.height() as i32);
        let [r, g, b, a] = color.to_rgba8();
        let data = self.pixmap.data_mut();
        for (i, &cov) in coverage.iter().enumerate() {
            if cov == 0 {
                continue;
            }
            let x = left + (i % width) as i32;
            let y = top + (i / width) as i32;
            if x < 0 || y < 0 || x >= canvas_w || y >= canvas_h {
                continue;
            }
            let src_a = f32::from(cov) / 255.0 * f32::from(a) / 255.0;
            let idx = ((y * canvas_w + x) * 4) as usize;
            let inv = 1.0 - src_a;
            for (k, channel) in [r, g, b].into_iter().enumerate() {
                let src = f32::from(channel) * src_a;
                data[idx + k] = (src + f32::from(data[idx + k]) * inv).round().min(255.0) as u8;
            }
            data[idx + 3] = (src_a * 255.0 + f32::from(data[idx + 3]) * inv).round().min(255.0) as u8;
        }
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Raster
    }

    fn transform(&self) -> &TransformStack {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut TransformStack {
        &mut self.transform
    }

    fn paint(&mut self, color: Color) {
        let [r, g, b, a] = color.to_rgba8();
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    fn fill_path(&mut self, path: &DevicePath, color: Color) {
        let Some(skia_path) = Self::skia_path(path) else {
            return;
        };
        let paint = Self::paint_for(color);
        self.pixmap
            .fill_path(&skia_path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn stroke_path(&mut self, path: &DevicePath, style: &StrokeStyle) {
        let Some(skia_path) = Self::skia_path(path) else {
            return;
        };
        let paint = Self::paint_for(style.color);
        let stroke = Stroke {
            width: style.width as f32,
            dash: style
                .dash
                .and_then(|(on, off)| StrokeDash::new(vec![on as f32, off as f32], 0.0)),
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&skia_path, &paint, &stroke, Transform::identity(), None);
    }

    fn fill_text(&mut self, text: &str, position: DVec2, style: &TextStyle) {
        let Some(font) = self.font.clone() else {
            tracing::debug!(text, "no font loaded; skipping text");
            return;
        };
        let size = style.size as f32;
        let advance: f32 = text.chars().map(|c| font.metrics(c, size).advance_width).sum();
        let mut pen_x = position.x as f32
            - match style.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => advance / 2.0,
                TextAlign::Right => advance,
            };
        let baseline = position.y as f32;

        for c in text.chars() {
            let (metrics, bitmap) = font.rasterize(c, size);
            if metrics.width > 0 && metrics.height > 0 {
                let left = (pen_x + metrics.xmin as f32).round() as i32;
                let top = (baseline - metrics.ymin as f32 - metrics.height as f32).round() as i32;
                self.blend_coverage(left, top, metrics.width, &bitmap, style.color);
            }
            pen_x += metrics.advance_width;
        }
    }
}
