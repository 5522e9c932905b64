//! Roadscope Scene -- the simulation-side view that the renderer consumes.
//!
//! This crate does not simulate anything. It describes a *snapshot* of a
//! traffic simulation at one instant: the vehicles on the road (identifier,
//! position, heading, footprint extent) and the lanes they drive on. Camera
//! policies and renderable adapters in `roadscope-render` read these types;
//! simulators produce them (directly, or as JSON recordings).
//!
//! # Quick Start
//!
//! ```
//! use roadscope_scene::prelude::*;
//!
//! let mut scene = SceneSnapshot::new(0.0);
//! scene.push_vehicle(Vehicle::car("ego", DVec2::new(10.0, 2.0), 0.0).with_role("ego"));
//! scene.push_vehicle(Vehicle::car("v1", DVec2::new(30.0, -1.5), 0.1));
//!
//! let ego = scene.find("ego").unwrap();
//! assert_eq!(ego.position(), DVec2::new(10.0, 2.0));
//! assert_eq!(scene.centroid(), Some(DVec2::new(20.0, 0.25)));
//! ```

#![deny(unsafe_code)]

pub mod lane;
pub mod sequence;
pub mod snapshot;
pub mod vehicle;

/// Re-export of the vector type used for every world-space point.
pub use glam::DVec2;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while loading or querying scene data.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// A snapshot or sequence could not be parsed from (or written to) JSON.
    #[error("scene JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a scene file failed.
    #[error("scene I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A vehicle was referenced by an identifier that is not in the snapshot.
    #[error("vehicle '{id}' not found in snapshot at t={time}")]
    VehicleNotFound {
        id: String,
        time: f64,
    },

    /// A lane was declared with fewer than two centerline points.
    #[error("lane '{id}' needs at least two centerline points, got {points}")]
    DegenerateLane {
        id: String,
        points: usize,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::lane::{Lane, LaneMarking};
    pub use crate::sequence::SceneSequence;
    pub use crate::snapshot::{SceneBounds, SceneSnapshot};
    pub use crate::vehicle::{SceneEntity, Vehicle, VehicleKind};
    pub use crate::SceneError;
    pub use glam::DVec2;
}
