//! Roadscope Render -- deferred 2D scene rendering for traffic simulations.
//!
//! Rendering happens in three steps:
//!
//! 1. Renderable adapters ([`renderable::Renderable`]) translate scene
//!    objects (vehicles, lanes, trails, labels) into drawing instructions,
//!    queued in a [`model::RenderModel`]. Each instruction carries the
//!    coordinate system its geometry is expressed in.
//! 2. A camera is chosen: either supplied by the caller (often moved between
//!    frames by a [`camera::CameraPolicy`]) or derived from the queued
//!    content by [`camera::camera_fit_to_content`].
//! 3. The executor ([`executor::render_to_canvas`]) builds the camera
//!    transform and replays every instruction against a drawing
//!    [`surface::Surface`]; the [`writer`] turns the surface into a PNG, SVG
//!    or PDF file.
//!
//! # Quick Start
//!
//! ```
//! use roadscope_render::prelude::*;
//!
//! let mut scene = SceneSnapshot::new(0.0);
//! scene.push_lane(Lane::straight("l0", DVec2::new(0.0, 0.0), DVec2::new(80.0, 0.0), 3.5));
//! scene.push_vehicle(Vehicle::car("ego", DVec2::new(20.0, 0.0), 0.0).with_role("ego"));
//!
//! let renderer = Renderer::new(RenderConfig {
//!     surface: SurfaceKind::Recording,
//!     ..RenderConfig::default()
//! })
//! .unwrap();
//! let canvas = renderer.render(&[&scene], None).unwrap();
//! assert_eq!(canvas.kind(), SurfaceKind::Recording);
//! ```

#![deny(unsafe_code)]

pub mod camera;
pub mod color;
pub mod config;
pub mod executor;
pub mod instruction;
pub mod model;
pub mod pipeline;
pub mod primitives;
pub mod renderable;
pub mod surface;
pub mod writer;

use surface::SurfaceKind;

/// Re-export the scene crate for convenience.
pub use roadscope_scene;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while building, rendering or writing a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A coordinate-system tag outside `scene`, `camera_pixels`,
    /// `camera_relative`.
    #[error("invalid coordinate system '{tag}' (expected scene, camera_pixels or camera_relative)")]
    InvalidCoordinateSystem { tag: String },

    /// A color string that is not `#rgb`, `#rrggbb` or `#rrggbbaa`.
    #[error("invalid color '{value}'")]
    InvalidColor { value: String },

    /// A dense coordinate array with an odd number of values.
    #[error("dense coordinate array must have an even length, got {len}")]
    InvalidPointArray { len: usize },

    /// The camera zoom is zero or not finite.
    #[error("camera zoom {zoom} is degenerate; zoom must be finite and nonzero")]
    DegenerateCamera { zoom: f64 },

    /// A camera policy update failed.
    #[error(transparent)]
    Camera(#[from] camera::CameraError),

    /// A surface cannot be written in the requested format.
    #[error("cannot write a {actual} surface as {requested}")]
    SurfaceMismatch {
        actual: SurfaceKind,
        requested: SurfaceKind,
    },

    /// The output path has an extension no writer handles.
    #[error("unsupported output format '{extension}' (expected png, svg or pdf)")]
    UnsupportedFormat { extension: String },

    /// The surface could not be allocated (e.g. zero-sized canvas).
    #[error("cannot create a {width}x{height} surface")]
    SurfaceCreation { width: u32, height: u32 },

    /// PNG encoding failed.
    #[error("image encoding failed: {0}")]
    ImageEncoding(String),

    /// A font file could not be parsed.
    #[error("failed to load font '{path}': {details}")]
    Font { path: String, details: String },

    /// A config or instruction document could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Loading scene data failed.
    #[error(transparent)]
    Scene(#[from] roadscope_scene::SceneError),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::camera::{
        camera_fit_to_content, BoundingBox, Camera, CameraError, CameraPolicy, CameraState,
    };
    pub use crate::color::Color;
    pub use crate::config::RenderConfig;
    pub use crate::executor::{render_to_canvas, PLACEHOLDER_TEXT};
    pub use crate::instruction::{CoordinateSystem, DrawOp, Instruction, Polyline, Stroke, TextAlign};
    pub use crate::model::RenderModel;
    pub use crate::pipeline::{render, Renderer};
    pub use crate::renderable::{Label, Renderable, Trail};
    pub use crate::surface::{
        Canvas, RasterSurface, RecordingSurface, Surface, SurfaceCall, SurfaceKind, VectorSurface,
    };
    pub use crate::writer::{encode, write};
    pub use crate::RenderError;

    pub use glam::{DAffine2, DVec2};
    pub use roadscope_scene::prelude::{
        Lane, LaneMarking, SceneEntity, SceneSequence, SceneSnapshot, Vehicle, VehicleKind,
    };
}
