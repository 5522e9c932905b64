//! Write finished canvases to disk.
//!
//! The output format comes from the file extension (case-insensitive):
//!
//! | Extension | Required canvas |
//! |-----------|-----------------|
//! | `.png` | raster |
//! | `.svg` | vector, SVG flavour |
//! | `.pdf` | vector, PDF flavour |
//!
//! Any other pairing is a [`RenderError::SurfaceMismatch`]; any other
//! extension is a [`RenderError::UnsupportedFormat`].

use std::path::Path;

use crate::surface::{Canvas, Surface, SurfaceKind};
use crate::RenderError;

/// Encode `canvas` in the format named by `extension` (without the dot).
pub fn encode(canvas: &Canvas, extension: &str) -> Result<Vec<u8>, RenderError> {
    let requested = SurfaceKind::from_extension(extension).ok_or_else(|| RenderError::UnsupportedFormat {
        extension: extension.to_string(),
    })?;
    let actual = canvas.kind();
    if actual != requested {
        return Err(RenderError::SurfaceMismatch { actual, requested });
    }
    match canvas {
        Canvas::Raster(surface) => surface.encode_png(),
        Canvas::Vector(surface) => surface.finish(),
        Canvas::Recording(_) => Err(RenderError::SurfaceMismatch { actual, requested }),
    }
}

/// Encode `canvas` according to the extension of `path` and write it.
pub fn write(canvas: &Canvas, path: impl AsRef<Path>) -> Result<(), RenderError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let bytes = encode(canvas, extension)?;
    std::fs::write(path, &bytes)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), kind = %canvas.kind(), "wrote frame");
    Ok(())
}
