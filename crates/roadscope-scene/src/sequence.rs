//! Recorded sequences of snapshots.
//!
//! A [`SceneSequence`] is the on-disk format for a whole simulation run:
//! an ordered list of [`SceneSnapshot`]s. Besides storage it answers the one
//! history question the renderer asks -- where has a vehicle been recently
//! (for trail rendering).

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::snapshot::SceneSnapshot;
use crate::SceneError;

/// An ordered recording of snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSequence {
    /// Frames in recording order (non-decreasing time).
    pub frames: Vec<SceneSnapshot>,
}

impl SceneSequence {
    pub fn new(frames: Vec<SceneSnapshot>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SceneSnapshot> {
        self.frames.iter()
    }

    /// Positions of vehicle `id` over the frames `..=frame`, oldest first,
    /// keeping at most the `max_len` most recent. Frames where the vehicle
    /// is absent are skipped.
    pub fn trail(&self, id: &str, frame: usize, max_len: usize) -> Vec<DVec2> {
        if max_len == 0 || self.frames.is_empty() {
            return Vec::new();
        }
        let end = frame.min(self.frames.len() - 1);
        let mut trail: Vec<DVec2> = self.frames[..=end]
            .iter()
            .rev()
            .filter_map(|f| f.find(id).map(|v| v.position))
            .take(max_len)
            .collect();
        trail.reverse();
        trail
    }

    /// Parse a sequence from JSON.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load a sequence from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let seq = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), frames = seq.frames.len(), "loaded scene sequence");
        Ok(seq)
    }
}

impl<'a> IntoIterator for &'a SceneSequence {
    type Item = &'a SceneSnapshot;
    type IntoIter = std::slice::Iter<'a, SceneSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::Vehicle;

    fn moving_car(frames: usize) -> SceneSequence {
        let frames = (0..frames)
            .map(|i| {
                let mut s = SceneSnapshot::new(i as f64 * 0.1);
                s.push_vehicle(Vehicle::car("ego", DVec2::new(i as f64, 0.0), 0.0));
                s
            })
            .collect();
        SceneSequence::new(frames)
    }

    #[test]
    fn trail_keeps_most_recent_positions_oldest_first() {
        let seq = moving_car(10);
        let trail = seq.trail("ego", 6, 3);
        assert_eq!(
            trail,
            vec![DVec2::new(4.0, 0.0), DVec2::new(5.0, 0.0), DVec2::new(6.0, 0.0)]
        );
    }

    #[test]
    fn trail_clamps_frame_index_and_skips_missing_vehicle() {
        let mut seq = moving_car(4);
        seq.frames[2].vehicles.clear();
        let trail = seq.trail("ego", 99, 10);
        assert_eq!(
            trail,
            vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0), DVec2::new(3.0, 0.0)]
        );
        assert!(seq.trail("nobody", 3, 10).is_empty());
        assert!(seq.trail("ego", 3, 0).is_empty());
    }

    #[test]
    fn json_roundtrip() {
        let seq = moving_car(3);
        let back = SceneSequence::from_json(&seq.to_json().unwrap()).unwrap();
        assert_eq!(back.len(), 3);
        assert_eq!(back, seq);
    }
}
