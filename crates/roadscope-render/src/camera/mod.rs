//! Camera state and camera policies.
//!
//! [`CameraState`] is plain transform data: where the camera looks (world
//! meters), how many pixels a meter spans, how the view is rotated, and the
//! canvas size in pixels. It is read-only during a render pass.
//!
//! Policies ([`policy::CameraPolicy`]) mutate a state between frames from a
//! scene snapshot; [`fit::camera_fit_to_content`] computes a fresh state that
//! frames everything in a render model.
//!
//! # World-to-canvas mapping
//!
//! The executor builds this exact chain (see [`CameraState::world_transform`]):
//!
//! ```text
//! translate(canvas_center) * scale(zoom, -zoom) * rotate(rotation) * translate(-position)
//! ```
//!
//! The negative y scale makes increasing world y render upward.

pub mod fit;
pub mod policy;

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

pub use fit::{camera_fit_to_content, BoundingBox};
pub use policy::{Camera, CameraPolicy};

// ---------------------------------------------------------------------------
// CameraError
// ---------------------------------------------------------------------------

/// Errors raised by camera policy updates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    /// A target-follow policy named an entity that is not in the snapshot.
    #[error("camera target '{target_id}' not found in scene snapshot")]
    TargetNotFound { target_id: String },

    /// A centroid or bounding-box policy was given a snapshot with no entities.
    #[error("{policy} camera cannot frame an empty scene")]
    EmptyScene { policy: &'static str },

    /// A zooming policy was configured with a step that cannot make progress.
    #[error("zoom step must be positive and finite, got {step}")]
    InvalidStep { step: f64 },
}

// ---------------------------------------------------------------------------
// CameraState
// ---------------------------------------------------------------------------

/// Default canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
/// Default canvas height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;

/// Camera transform state.
///
/// `zoom` is pixels per meter and signed: a negative zoom flips both axes.
/// A zoom of zero collapses the world to a point and is rejected by the
/// executor (see [`CameraState::is_degenerate`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    /// World point shown at the canvas center, in meters.
    pub position: DVec2,
    /// Pixels per meter.
    pub zoom: f64,
    /// View rotation in radians.
    pub rotation: f64,
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            zoom: 1.0,
            rotation: 0.0,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

impl CameraState {
    pub fn new(position: DVec2, zoom: f64, rotation: f64, canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            position,
            zoom,
            rotation,
            canvas_width,
            canvas_height,
        }
    }

    /// A camera at the origin with zoom 1 for the given canvas.
    pub fn for_canvas(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: DVec2) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Canvas size in pixels as a vector.
    pub fn canvas_size(&self) -> DVec2 {
        DVec2::new(f64::from(self.canvas_width), f64::from(self.canvas_height))
    }

    /// Width over height of the canvas.
    pub fn canvas_aspect(&self) -> f64 {
        f64::from(self.canvas_width) / f64::from(self.canvas_height)
    }

    /// Whether the zoom makes a meaningful image impossible.
    pub fn is_degenerate(&self) -> bool {
        self.zoom == 0.0 || !self.zoom.is_finite()
    }

    /// World extent visible on the canvas, in meters.
    pub fn visible_world_size(&self) -> DVec2 {
        self.canvas_size() / self.zoom.abs()
    }

    /// The world-to-canvas matrix.
    pub fn world_transform(&self) -> DAffine2 {
        DAffine2::from_translation(self.canvas_size() * 0.5)
            * DAffine2::from_scale(DVec2::new(self.zoom, -self.zoom))
            * DAffine2::from_angle(self.rotation)
            * DAffine2::from_translation(-self.position)
    }

    /// Map a world point to canvas pixels.
    pub fn world_to_canvas(&self, world: DVec2) -> DVec2 {
        self.world_transform().transform_point2(world)
    }

    /// Map a canvas pixel back to world meters. Meaningless for a
    /// degenerate camera.
    pub fn canvas_to_world(&self, canvas: DVec2) -> DVec2 {
        self.world_transform().inverse().transform_point2(canvas)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
