//! Render configuration.
//!
//! Every field has a default, so a config document only needs the values
//! it changes:
//!
//! ```json
//! { "canvas_width": 1280, "canvas_height": 720, "surface": "svg" }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::camera::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::color::Color;
use crate::model::DEFAULT_BACKGROUND;
use crate::surface::SurfaceKind;
use crate::RenderError;

/// Settings shared by every frame a [`crate::pipeline::Renderer`] produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Canvas width in pixels when no camera supplies one.
    pub canvas_width: u32,
    /// Canvas height in pixels when no camera supplies one.
    pub canvas_height: u32,
    /// Fraction of the canvas width left as margin by auto-fit.
    pub percent_border: f64,
    /// Frame background.
    pub background: Color,
    /// Surface created by [`crate::pipeline::Renderer::render`].
    pub surface: SurfaceKind,
    /// TrueType/OpenType font for raster text. Raster frames have no text
    /// without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
    /// Number of past positions drawn per vehicle by sequence rendering.
    /// Zero disables trails.
    pub trail_length: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            percent_border: 0.05,
            background: DEFAULT_BACKGROUND,
            surface: SurfaceKind::Raster,
            font_path: None,
            trail_length: 20,
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(json: &str) -> Result<Self, RenderError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), surface = %config.surface, "loaded render config");
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RenderConfig::default();
        assert_eq!((config.canvas_width, config.canvas_height), (800, 600));
        assert_eq!(config.percent_border, 0.05);
        assert_eq!(config.surface, SurfaceKind::Raster);
        assert!(config.font_path.is_none());
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config = RenderConfig::from_json_str(
            r##"{ "canvas_width": 1280, "surface": "pdf", "background": "#ffffff" }"##,
        )
        .unwrap();
        assert_eq!(config.canvas_width, 1280);
        assert_eq!(config.canvas_height, 600);
        assert_eq!(config.surface, SurfaceKind::Pdf);
        assert_eq!(config.background, Color::WHITE);
    }

    #[test]
    fn background_accepts_float_arrays() {
        let config = RenderConfig::from_json_str(r#"{ "background": [0.0, 0.0, 0.0] }"#).unwrap();
        assert_eq!(config.background, Color::BLACK);
    }

    #[test]
    fn malformed_document_is_a_json_error() {
        let err = RenderConfig::from_json_str("{ canvas_width: }").unwrap_err();
        assert!(matches!(err, RenderError::Json(_)));
    }

    #[test]
    fn json_roundtrip() {
        let config = RenderConfig {
            surface: SurfaceKind::Svg,
            trail_length: 5,
            ..RenderConfig::default()
        };
        let back = RenderConfig::from_json_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);

        let default = RenderConfig::default();
        assert_eq!(RenderConfig::from_json_str(&default.to_json().unwrap()).unwrap(), default);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RenderConfig::from_path("/nonexistent/roadscope.json").unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }
}
