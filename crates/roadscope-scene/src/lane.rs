//! Lanes: centerline polylines with a width and edge markings.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::SceneError;

/// Painted marking along one edge of a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneMarking {
    /// No marking painted.
    None,
    /// Continuous line (road edge, no-overtaking).
    #[default]
    Solid,
    /// Broken line between lanes of the same direction.
    Dashed,
}

/// A single lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Unique identifier within the snapshot.
    pub id: String,
    /// Centerline vertices in world meters, in driving order.
    pub centerline: Vec<DVec2>,
    /// Lane width in meters.
    pub width: f64,
    /// Marking on the left edge (relative to driving direction).
    #[serde(default)]
    pub left_marking: LaneMarking,
    /// Marking on the right edge.
    #[serde(default)]
    pub right_marking: LaneMarking,
}

impl Lane {
    /// Build a lane, rejecting centerlines with fewer than two points.
    pub fn new(id: impl Into<String>, centerline: Vec<DVec2>, width: f64) -> Result<Self, SceneError> {
        let id = id.into();
        if centerline.len() < 2 {
            return Err(SceneError::DegenerateLane {
                id,
                points: centerline.len(),
            });
        }
        Ok(Self {
            id,
            centerline,
            width,
            left_marking: LaneMarking::Solid,
            right_marking: LaneMarking::Solid,
        })
    }

    /// Straight lane from `start` to `end`.
    pub fn straight(id: impl Into<String>, start: DVec2, end: DVec2, width: f64) -> Self {
        Self {
            id: id.into(),
            centerline: vec![start, end],
            width,
            left_marking: LaneMarking::Solid,
            right_marking: LaneMarking::Solid,
        }
    }

    /// Set both edge markings.
    #[must_use]
    pub fn with_markings(mut self, left: LaneMarking, right: LaneMarking) -> Self {
        self.left_marking = left;
        self.right_marking = right;
        self
    }

    /// Left edge polyline: the centerline offset by `+width/2` along the
    /// left-hand normal.
    pub fn left_edge(&self) -> Vec<DVec2> {
        self.offset(self.width / 2.0)
    }

    /// Right edge polyline.
    pub fn right_edge(&self) -> Vec<DVec2> {
        self.offset(-self.width / 2.0)
    }

    /// Closed outline of the lane surface: left edge forward, right edge back.
    pub fn outline(&self) -> Vec<DVec2> {
        let mut outline = self.left_edge();
        outline.extend(self.right_edge().into_iter().rev());
        outline
    }

    /// Offset every centerline vertex along the averaged normal of its
    /// adjacent segments. Miter length is not compensated; lanes are
    /// expected to bend gently.
    fn offset(&self, distance: f64) -> Vec<DVec2> {
        let pts = &self.centerline;
        let n = pts.len();
        if n < 2 {
            return pts.clone();
        }
        (0..n)
            .map(|i| {
                let before = if i == 0 { pts[1] - pts[0] } else { pts[i] - pts[i - 1] };
                let after = if i + 1 == n { pts[i] - pts[i - 1] } else { pts[i + 1] - pts[i] };
                let tangent = (before.normalize_or_zero() + after.normalize_or_zero()).normalize_or_zero();
                pts[i] + tangent.perp() * distance
            })
            .collect()
    }
}
