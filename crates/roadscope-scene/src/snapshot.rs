//! Scene snapshots: every vehicle and lane at one simulation instant.
//!
//! A [`SceneSnapshot`] is what camera policies and renderable adapters read.
//! It serializes to JSON so simulators in any language can hand frames to
//! the renderer.
//!
//! # Example
//!
//! ```
//! use roadscope_scene::prelude::*;
//!
//! let json = r#"{
//!     "time": 1.5,
//!     "vehicles": [
//!         {"id": "ego", "position": [0.0, 0.0], "heading": 0.0, "length": 4.5, "width": 1.8}
//!     ]
//! }"#;
//! let scene = SceneSnapshot::from_json(json).unwrap();
//! assert_eq!(scene.len(), 1);
//! assert!(scene.lanes.is_empty());
//! ```

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::lane::Lane;
use crate::vehicle::{SceneEntity, Vehicle};
use crate::SceneError;

// ---------------------------------------------------------------------------
// SceneBounds
// ---------------------------------------------------------------------------

/// Axis-aligned bounds of a set of world points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl SceneBounds {
    /// Bounds of the given points, or `None` if the iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    /// Grow the bounds by `padding` on every side.
    #[must_use]
    pub fn padded(self, padding: f64) -> Self {
        Self {
            min: self.min - DVec2::splat(padding),
            max: self.max + DVec2::splat(padding),
        }
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }
}

// ---------------------------------------------------------------------------
// SceneSnapshot
// ---------------------------------------------------------------------------

/// Every entity of the simulation at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Simulation time in seconds.
    #[serde(default)]
    pub time: f64,
    /// Vehicles, in the order the simulator reported them.
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    /// Road lanes. Static across a recording in most simulators.
    #[serde(default)]
    pub lanes: Vec<Lane>,
}

impl SceneSnapshot {
    /// Create an empty snapshot at the given time.
    pub fn new(time: f64) -> Self {
        Self {
            time,
            vehicles: Vec::new(),
            lanes: Vec::new(),
        }
    }

    /// Append a vehicle.
    pub fn push_vehicle(&mut self, vehicle: Vehicle) -> &mut Self {
        self.vehicles.push(vehicle);
        self
    }

    /// Append a lane.
    pub fn push_lane(&mut self, lane: Lane) -> &mut Self {
        self.lanes.push(lane);
        self
    }

    /// Number of vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether the snapshot has no vehicles.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Look up a vehicle by identifier.
    pub fn find(&self, id: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Look up a vehicle by identifier, failing with a descriptive error.
    pub fn require(&self, id: &str) -> Result<&Vehicle, SceneError> {
        self.find(id).ok_or_else(|| SceneError::VehicleNotFound {
            id: id.to_owned(),
            time: self.time,
        })
    }

    /// Iterate over every entity through the [`SceneEntity`] abstraction.
    pub fn entities(&self) -> impl Iterator<Item = &dyn SceneEntity> + '_ {
        self.vehicles.iter().map(|v| v as &dyn SceneEntity)
    }

    /// World positions of every vehicle.
    pub fn positions(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.vehicles.iter().map(SceneEntity::position)
    }

    /// Mean of all vehicle positions, or `None` for an empty snapshot.
    pub fn centroid(&self) -> Option<DVec2> {
        if self.vehicles.is_empty() {
            return None;
        }
        let sum: DVec2 = self.positions().sum();
        Some(sum / self.vehicles.len() as f64)
    }

    /// Bounds of all vehicle positions, or `None` for an empty snapshot.
    pub fn bounds(&self) -> Option<SceneBounds> {
        SceneBounds::from_points(self.positions())
    }

    // -- JSON ---------------------------------------------------------------

    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let scene = Self::from_json(&text)?;
        tracing::debug!(
            path = %path.display(),
            vehicles = scene.vehicles.len(),
            lanes = scene.lanes.len(),
            "loaded scene snapshot"
        );
        Ok(scene)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
