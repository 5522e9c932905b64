//! A surface that records calls instead of drawing.
//!
//! Useful for headless tests and for inspecting what the executor emits:
//! every call is kept in order together with the device-space geometry.

use glam::{DAffine2, DVec2};

use super::{DevicePath, StrokeStyle, Surface, SurfaceKind, TextStyle, TransformStack};
use crate::color::Color;

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Paint(Color),
    FillPath {
        path: DevicePath,
        color: Color,
    },
    StrokePath {
        path: DevicePath,
        style: StrokeStyle,
    },
    /// Text, with the transform that was current when it was drawn.
    Text {
        text: String,
        position: DVec2,
        style: TextStyle,
        matrix: DAffine2,
    },
}

#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    transform: TransformStack,
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            transform: TransformStack::default(),
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Recorded text calls as `(text, position)` pairs.
    pub fn texts(&self) -> impl Iterator<Item = (&str, DVec2)> + '_ {
        self.calls.iter().filter_map(|call| match call {
            SurfaceCall::Text { text, position, .. } => Some((text.as_str(), *position)),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Recording
    }

    fn transform(&self) -> &TransformStack {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut TransformStack {
        &mut self.transform
    }

    fn paint(&mut self, color: Color) {
        self.calls.push(SurfaceCall::Paint(color));
    }

    fn fill_path(&mut self, path: &DevicePath, color: Color) {
        self.calls.push(SurfaceCall::FillPath {
            path: path.clone(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &DevicePath, style: &StrokeStyle) {
        self.calls.push(SurfaceCall::StrokePath {
            path: path.clone(),
            style: *style,
        });
    }

    fn fill_text(&mut self, text: &str, position: DVec2, style: &TextStyle) {
        let matrix = self.matrix();
        self.calls.push(SurfaceCall::Text {
            text: text.to_string(),
            position,
            style: *style,
            matrix,
        });
    }
}
