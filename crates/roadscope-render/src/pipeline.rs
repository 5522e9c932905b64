//! Render entry points.
//!
//! [`render`] is the low-level call: renderables in, caller-owned surface
//! out. [`Renderer`] wraps it with a [`RenderConfig`], allocates surfaces,
//! writes files, and renders whole [`SceneSequence`]s frame by frame.
//!
//! Each call builds a fresh [`RenderModel`] and drops it afterwards, so
//! nothing carries over between frames except the camera the caller keeps.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use roadscope_scene::sequence::SceneSequence;

use crate::camera::{camera_fit_to_content, Camera, CameraState};
use crate::color::Color;
use crate::config::RenderConfig;
use crate::executor::render_to_canvas;
use crate::model::{RenderModel, DEFAULT_BACKGROUND};
use crate::renderable::{Label, Renderable, Trail};
use crate::surface::raster::load_font;
use crate::surface::{Canvas, Surface, SurfaceKind};
use crate::writer;
use crate::RenderError;

/// Border used by [`render`] when it has to fit the camera itself.
const DEFAULT_PERCENT_BORDER: f64 = 0.05;

/// Render `renderables` onto `surface` and return the camera that was used.
///
/// Without a camera, one is fitted to the content and to the surface size.
pub fn render<S: Surface + ?Sized>(
    renderables: &[&dyn Renderable],
    camera: Option<&CameraState>,
    surface: &mut S,
) -> Result<CameraState, RenderError> {
    render_with(renderables, camera, surface, DEFAULT_BACKGROUND, DEFAULT_PERCENT_BORDER)
}

fn build_model(renderables: &[&dyn Renderable], background: Color) -> RenderModel {
    let mut model = RenderModel::new();
    model.set_background_color(background);
    for renderable in renderables {
        renderable.render_into(&mut model);
    }
    model
}

fn render_with<S: Surface + ?Sized>(
    renderables: &[&dyn Renderable],
    camera: Option<&CameraState>,
    surface: &mut S,
    background: Color,
    percent_border: f64,
) -> Result<CameraState, RenderError> {
    let model = build_model(renderables, background);
    let camera = match camera {
        Some(camera) => *camera,
        None => camera_fit_to_content(&model, surface.width(), surface.height(), percent_border),
    };
    render_to_canvas(&model, &camera, surface)?;
    Ok(camera)
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Configured renderer. Loads the raster font once and reuses it.
pub struct Renderer {
    config: RenderConfig,
    font: Option<Arc<fontdue::Font>>,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("font_loaded", &self.font.is_some())
            .finish()
    }
}

impl Renderer {
    /// # Errors
    ///
    /// Fails if `config.font_path` is set and the font cannot be read or
    /// parsed.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        let font = config.font_path.as_deref().map(|path| load_font(path)).transpose()?;
        Ok(Self { config, font })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// A blank canvas of `kind`, sized by the camera when one is given.
    fn canvas(&self, kind: SurfaceKind, camera: Option<&CameraState>) -> Result<Canvas, RenderError> {
        let (width, height) = match camera {
            Some(camera) => (camera.canvas_width, camera.canvas_height),
            None => (self.config.canvas_width, self.config.canvas_height),
        };
        let mut canvas = Canvas::new(kind, width, height)?;
        if let Canvas::Raster(surface) = &mut canvas {
            surface.set_font(self.font.clone());
        }
        Ok(canvas)
    }

    /// Render onto a caller-owned surface with this renderer's background
    /// and border.
    pub fn render_into<S: Surface + ?Sized>(
        &self,
        renderables: &[&dyn Renderable],
        camera: Option<&CameraState>,
        surface: &mut S,
    ) -> Result<CameraState, RenderError> {
        render_with(
            renderables,
            camera,
            surface,
            self.config.background,
            self.config.percent_border,
        )
    }

    /// Render onto a new canvas of the configured surface kind.
    pub fn render(&self, renderables: &[&dyn Renderable], camera: Option<&CameraState>) -> Result<Canvas, RenderError> {
        let mut canvas = self.canvas(self.config.surface, camera)?;
        self.render_into(renderables, camera, &mut canvas)?;
        Ok(canvas)
    }

    /// Render and write to `path`. The surface kind follows the file
    /// extension rather than the configured kind.
    pub fn render_to_file(
        &self,
        renderables: &[&dyn Renderable],
        camera: Option<&CameraState>,
        path: impl AsRef<Path>,
    ) -> Result<CameraState, RenderError> {
        let path = path.as_ref();
        let kind = kind_for_path(path)?;
        let mut canvas = self.canvas(kind, camera)?;
        let used = self.render_into(renderables, camera, &mut canvas)?;
        writer::write(&canvas, path)?;
        Ok(used)
    }

    /// Render every frame of `sequence` to `out_dir/frame_NNNNN.<extension>`.
    ///
    /// Before each frame the camera policy is applied to that frame's
    /// snapshot. Frames show the snapshot, a trail per vehicle (up to
    /// `trail_length` past positions), and the snapshot time as a HUD label.
    /// Returns the written paths in frame order.
    pub fn render_sequence(
        &self,
        sequence: &SceneSequence,
        camera: &mut Camera,
        out_dir: impl AsRef<Path>,
        extension: &str,
    ) -> Result<Vec<PathBuf>, RenderError> {
        let out_dir = out_dir.as_ref();
        let kind = SurfaceKind::from_extension(extension).ok_or_else(|| RenderError::UnsupportedFormat {
            extension: extension.to_string(),
        })?;
        std::fs::create_dir_all(out_dir)?;

        let mut written = Vec::with_capacity(sequence.len());
        for (index, frame) in sequence.iter().enumerate() {
            camera.update(frame)?;

            let trails: Vec<Trail> = if self.config.trail_length == 0 {
                Vec::new()
            } else {
                frame
                    .vehicles
                    .iter()
                    .map(|v| Trail::new(sequence.trail(&v.id, index, self.config.trail_length)))
                    .collect()
            };
            let label = Label::time(frame);

            let mut renderables: Vec<&dyn Renderable> = Vec::with_capacity(trails.len() + 2);
            renderables.extend(trails.iter().map(|t| t as &dyn Renderable));
            renderables.push(frame);
            renderables.push(&label);

            let mut canvas = self.canvas(kind, Some(&camera.state))?;
            self.render_into(&renderables, Some(&camera.state), &mut canvas)?;

            let path = out_dir.join(format!("frame_{index:05}.{extension}"));
            writer::write(&canvas, &path)?;
            written.push(path);
        }

        tracing::debug!(frames = written.len(), dir = %out_dir.display(), "rendered sequence");
        Ok(written)
    }
}

fn kind_for_path(path: &Path) -> Result<SurfaceKind, RenderError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    SurfaceKind::from_extension(extension).ok_or_else(|| RenderError::UnsupportedFormat {
        extension: extension.to_string(),
    })
}
