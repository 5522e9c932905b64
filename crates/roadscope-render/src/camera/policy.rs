//! Camera update policies.
//!
//! A [`CameraPolicy`] is a strategy that mutates one shared [`CameraState`]
//! from a [`SceneSnapshot`]. Policies are a closed set dispatched by `match`;
//! [`CameraPolicy::Composed`] chains children over the same state in list
//! order, so later children win on any field they both write.
//!
//! # Example
//!
//! ```
//! use roadscope_render::prelude::*;
//!
//! let mut scene = SceneSnapshot::new(0.0);
//! scene.push_vehicle(Vehicle::car("ego", DVec2::new(42.0, 3.0), 0.0));
//!
//! // Follow the ego vehicle horizontally, keep y pinned at 0, ease zoom to 8.
//! let policy = CameraPolicy::composed(vec![
//!     CameraPolicy::follow_x("ego", 0.0),
//!     CameraPolicy::Zooming { target_zoom: 8.0, step: 2.0 },
//! ]);
//! let mut camera = Camera::new(CameraState::for_canvas(800, 600).with_zoom(5.0), policy);
//! camera.update(&scene).unwrap();
//!
//! assert_eq!(camera.state.position, DVec2::new(42.0, 0.0));
//! assert_eq!(camera.state.zoom, 7.0);
//! ```

use roadscope_scene::snapshot::SceneSnapshot;
use serde::{Deserialize, Serialize};

use super::{CameraError, CameraState};

// ---------------------------------------------------------------------------
// CameraPolicy
// ---------------------------------------------------------------------------

/// How a camera moves between frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CameraPolicy {
    /// Leave the state untouched.
    #[default]
    Static,

    /// Track an entity by identifier. An axis with a fixed value is pinned
    /// to that value instead of tracking the target.
    TargetFollow {
        target_id: String,
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },

    /// Move zoom toward `target_zoom` by at most `step` per update.
    Zooming { target_zoom: f64, step: f64 },

    /// Frame every entity in the snapshot.
    ///
    /// With `zoom: None` the camera centers on the padded bounding box of
    /// all positions and picks the largest zoom that fits it (each extent
    /// floored at `min_width` / `min_height`). With a fixed zoom it centers
    /// on the mean position instead.
    SceneFollow {
        #[serde(default)]
        padding: f64,
        #[serde(default)]
        zoom: Option<f64>,
        #[serde(default)]
        min_width: f64,
        #[serde(default)]
        min_height: f64,
    },

    /// Apply each child, in order, to the same state.
    Composed { children: Vec<CameraPolicy> },
}

impl CameraPolicy {
    /// Track `target_id` on both axes.
    pub fn follow(target_id: impl Into<String>) -> Self {
        CameraPolicy::TargetFollow {
            target_id: target_id.into(),
            x: None,
            y: None,
        }
    }

    /// Track `target_id` horizontally, pin y.
    pub fn follow_x(target_id: impl Into<String>, fixed_y: f64) -> Self {
        CameraPolicy::TargetFollow {
            target_id: target_id.into(),
            x: None,
            y: Some(fixed_y),
        }
    }

    /// Chain several policies over one state.
    pub fn composed(children: Vec<CameraPolicy>) -> Self {
        CameraPolicy::Composed { children }
    }

    /// Frame the whole scene with automatic zoom.
    pub fn scene_fit(padding: f64) -> Self {
        CameraPolicy::SceneFollow {
            padding,
            zoom: None,
            min_width: 0.0,
            min_height: 0.0,
        }
    }

    /// Short name of the policy, for logging and errors.
    pub fn name(&self) -> &'static str {
        match self {
            CameraPolicy::Static => "static",
            CameraPolicy::TargetFollow { .. } => "target_follow",
            CameraPolicy::Zooming { .. } => "zooming",
            CameraPolicy::SceneFollow { .. } => "scene_follow",
            CameraPolicy::Composed { .. } => "composed",
        }
    }

    /// Mutate `state` for the given snapshot.
    ///
    /// # Errors
    ///
    /// - [`CameraError::TargetNotFound`] when a followed entity is absent.
    /// - [`CameraError::EmptyScene`] when scene-follow sees no entities.
    /// - [`CameraError::InvalidStep`] for a zooming step that is not a
    ///   positive finite number.
    ///
    /// A failing policy leaves `state` untouched; a failing child of a
    /// composed policy stops the chain, keeping the earlier children's
    /// writes.
    pub fn apply(&self, state: &mut CameraState, scene: &SceneSnapshot) -> Result<(), CameraError> {
        match self {
            CameraPolicy::Static => {}

            CameraPolicy::TargetFollow { target_id, x, y } => {
                let target = scene.find(target_id).ok_or_else(|| CameraError::TargetNotFound {
                    target_id: target_id.clone(),
                })?;
                state.position.x = x.unwrap_or(target.position.x);
                state.position.y = y.unwrap_or(target.position.y);
            }

            CameraPolicy::Zooming { target_zoom, step } => {
                if !(step.is_finite() && *step > 0.0) {
                    return Err(CameraError::InvalidStep { step: *step });
                }
                let delta = (target_zoom - state.zoom).clamp(-step, *step);
                state.zoom += delta;
            }

            CameraPolicy::SceneFollow {
                padding,
                zoom,
                min_width,
                min_height,
            } => {
                let bounds = scene.bounds().ok_or(CameraError::EmptyScene { policy: self.name() })?;
                match zoom {
                    Some(fixed) => {
                        // Non-empty was checked above, so the centroid exists.
                        state.position = scene.centroid().unwrap_or(bounds.center());
                        state.zoom = *fixed;
                    }
                    None => {
                        let padded = bounds.padded(*padding);
                        let extent = padded.size();
                        let world_w = extent.x.max(*min_width);
                        let world_h = extent.y.max(*min_height);
                        let canvas = state.canvas_size();
                        state.position = padded.center();
                        state.zoom = fit_zoom(canvas.x, canvas.y, world_w, world_h);
                    }
                }
            }

            CameraPolicy::Composed { children } => {
                for child in children {
                    child.apply(state, scene)?;
                }
            }
        }
        tracing::trace!(
            policy = self.name(),
            x = state.position.x,
            y = state.position.y,
            zoom = state.zoom,
            "camera updated"
        );
        Ok(())
    }
}

/// Largest zoom that fits a `world_w` x `world_h` region on the canvas.
/// A zero-sized axis does not constrain; an entirely zero-sized region
/// keeps a zoom of one pixel per meter.
fn fit_zoom(canvas_w: f64, canvas_h: f64, world_w: f64, world_h: f64) -> f64 {
    let zx = if world_w > 0.0 { canvas_w / world_w } else { f64::INFINITY };
    let zy = if world_h > 0.0 { canvas_h / world_h } else { f64::INFINITY };
    let zoom = zx.min(zy);
    if zoom.is_finite() {
        zoom
    } else {
        1.0
    }
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

/// A camera: one live state plus the policy that moves it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    pub state: CameraState,
    pub policy: CameraPolicy,
}

impl Camera {
    pub fn new(state: CameraState, policy: CameraPolicy) -> Self {
        Self { state, policy }
    }

    /// A camera that never moves.
    pub fn fixed(state: CameraState) -> Self {
        Self::new(state, CameraPolicy::Static)
    }

    /// Run the policy against the snapshot, mutating the state in place.
    pub fn update(&mut self, scene: &SceneSnapshot) -> Result<(), CameraError> {
        self.policy.apply(&mut self.state, scene)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use glam::DVec2;
    use roadscope_scene::vehicle::Vehicle;

    use super::*;

    fn scene_with(points: &[(&str, f64, f64)]) -> SceneSnapshot {
        let mut scene = SceneSnapshot::new(0.0);
        for (id, x, y) in points {
            scene.push_vehicle(Vehicle::car(*id, DVec2::new(*x, *y), 0.0));
        }
        scene
    }

    fn asymmetric_scene() -> SceneSnapshot {
        scene_with(&[("a", 0.0, 0.0), ("b", 1.0, 0.0), ("c", 10.0, 4.0)])
    }

    // -- static -------------------------------------------------------------

    #[test]
    fn static_policy_leaves_state_alone() {
        let before = CameraState::new(DVec2::new(1.0, 2.0), 3.0, 0.5, 320, 200);
        let mut cam = Camera::fixed(before);
        cam.update(&asymmetric_scene()).unwrap();
        assert_eq!(cam.state, before);
    }

    // -- target follow ------------------------------------------------------

    #[test]
    fn target_follow_tracks_both_axes() {
        let mut state = CameraState::default();
        CameraPolicy::follow("c").apply(&mut state, &asymmetric_scene()).unwrap();
        assert_eq!(state.position, DVec2::new(10.0, 4.0));
    }

    #[test]
    fn target_follow_pins_fixed_axes() {
        let scene = asymmetric_scene();
        let mut state = CameraState::default();
        CameraPolicy::follow_x("c", -3.0).apply(&mut state, &scene).unwrap();
        assert_eq!(state.position, DVec2::new(10.0, -3.0));

        let pin_x = CameraPolicy::TargetFollow {
            target_id: "c".into(),
            x: Some(7.0),
            y: None,
        };
        pin_x.apply(&mut state, &scene).unwrap();
        assert_eq!(state.position, DVec2::new(7.0, 4.0));
    }

    #[test]
    fn target_follow_missing_target_is_an_error() {
        let mut state = CameraState::default().with_position(DVec2::new(5.0, 5.0));
        let err = CameraPolicy::follow("ghost")
            .apply(&mut state, &asymmetric_scene())
            .unwrap_err();
        assert_eq!(
            err,
            CameraError::TargetNotFound {
                target_id: "ghost".into()
            }
        );
        assert_eq!(state.position, DVec2::new(5.0, 5.0));
    }

    // -- zooming ------------------------------------------------------------

    #[test]
    fn zooming_steps_toward_target() {
        let scene = SceneSnapshot::new(0.0);
        let mut state = CameraState::default().with_zoom(10.0);
        let policy = CameraPolicy::Zooming {
            target_zoom: 15.0,
            step: 2.0,
        };
        policy.apply(&mut state, &scene).unwrap();
        assert_eq!(state.zoom, 12.0);
    }

    #[test]
    fn zooming_never_overshoots() {
        let scene = SceneSnapshot::new(0.0);
        let mut state = CameraState::default().with_zoom(10.0);
        let policy = CameraPolicy::Zooming {
            target_zoom: 11.0,
            step: 2.0,
        };
        policy.apply(&mut state, &scene).unwrap();
        assert_eq!(state.zoom, 11.0);

        let down = CameraPolicy::Zooming {
            target_zoom: 4.0,
            step: 5.0,
        };
        down.apply(&mut state, &scene).unwrap();
        assert_eq!(state.zoom, 6.0);
        down.apply(&mut state, &scene).unwrap();
        assert_eq!(state.zoom, 4.0);
    }

    #[test]
    fn zooming_rejects_non_positive_step() {
        let scene = SceneSnapshot::new(0.0);
        let mut state = CameraState::default();
        for step in [0.0, -1.0, f64::NAN] {
            let policy = CameraPolicy::Zooming { target_zoom: 5.0, step };
            assert!(matches!(
                policy.apply(&mut state, &scene),
                Err(CameraError::InvalidStep { .. })
            ));
        }
        assert_eq!(state.zoom, 1.0);
    }

    // -- scene follow -------------------------------------------------------

    #[test]
    fn scene_follow_auto_zoom_centers_on_bbox() {
        let mut state = CameraState::for_canvas(200, 100);
        CameraPolicy::scene_fit(0.0).apply(&mut state, &asymmetric_scene()).unwrap();
        assert_eq!(state.position, DVec2::new(5.0, 2.0));
        // 10 x 4 meters on 200 x 100 pixels: width-bound at 20 px/m.
        assert_eq!(state.zoom, 20.0);
    }

    #[test]
    fn scene_follow_fixed_zoom_centers_on_centroid() {
        let scene = asymmetric_scene();
        let mut fixed = CameraState::for_canvas(200, 100);
        let policy = CameraPolicy::SceneFollow {
            padding: 0.0,
            zoom: Some(3.0),
            min_width: 0.0,
            min_height: 0.0,
        };
        policy.apply(&mut fixed, &scene).unwrap();
        assert_eq!(fixed.zoom, 3.0);
        assert!((fixed.position - DVec2::new(11.0 / 3.0, 4.0 / 3.0)).length() < 1e-12);

        let mut auto = CameraState::for_canvas(200, 100);
        CameraPolicy::scene_fit(0.0).apply(&mut auto, &scene).unwrap();
        assert_ne!(fixed.position, auto.position);
    }

    #[test]
    fn scene_follow_respects_padding_and_minimum_extent() {
        let scene = scene_with(&[("a", 0.0, 0.0), ("b", 2.0, 0.0)]);
        let mut state = CameraState::for_canvas(100, 100);
        let policy = CameraPolicy::SceneFollow {
            padding: 1.0,
            zoom: None,
            min_width: 50.0,
            min_height: 20.0,
        };
        policy.apply(&mut state, &scene).unwrap();
        assert_eq!(state.position, DVec2::new(1.0, 0.0));
        assert_eq!(state.zoom, 2.0);
    }

    #[test]
    fn scene_follow_single_point_keeps_unit_zoom() {
        let scene = scene_with(&[("a", 4.0, 4.0)]);
        let mut state = CameraState::for_canvas(100, 100).with_zoom(9.0);
        CameraPolicy::scene_fit(0.0).apply(&mut state, &scene).unwrap();
        assert_eq!(state.position, DVec2::new(4.0, 4.0));
        assert_eq!(state.zoom, 1.0);
    }

    #[test]
    fn scene_follow_rejects_empty_scene() {
        let mut state = CameraState::default();
        let err = CameraPolicy::scene_fit(1.0)
            .apply(&mut state, &SceneSnapshot::new(0.0))
            .unwrap_err();
        assert_eq!(err, CameraError::EmptyScene { policy: "scene_follow" });
        assert_eq!(err.to_string(), "scene_follow camera cannot frame an empty scene");
    }

    // -- composed -----------------------------------------------------------

    #[test]
    fn composed_equals_sequential_application() {
        let scene = asymmetric_scene();
        let children = vec![
            CameraPolicy::scene_fit(2.0),
            CameraPolicy::follow_x("b", 1.5),
            CameraPolicy::Zooming {
                target_zoom: 100.0,
                step: 1.0,
            },
        ];

        let mut composed = CameraState::for_canvas(640, 480);
        CameraPolicy::composed(children.clone())
            .apply(&mut composed, &scene)
            .unwrap();

        let mut manual = CameraState::for_canvas(640, 480);
        for child in &children {
            child.apply(&mut manual, &scene).unwrap();
        }
        assert_eq!(composed, manual);
        assert_eq!(composed.position, DVec2::new(1.0, 1.5));
    }

    #[test]
    fn composed_last_write_wins() {
        let scene = asymmetric_scene();
        let mut state = CameraState::default();
        CameraPolicy::composed(vec![CameraPolicy::follow("a"), CameraPolicy::follow("c")])
            .apply(&mut state, &scene)
            .unwrap();
        assert_eq!(state.position, DVec2::new(10.0, 4.0));
    }

    #[test]
    fn composed_stops_at_first_error() {
        let scene = asymmetric_scene();
        let mut state = CameraState::default().with_zoom(1.0);
        let err = CameraPolicy::composed(vec![
            CameraPolicy::follow("c"),
            CameraPolicy::follow("ghost"),
            CameraPolicy::Zooming {
                target_zoom: 5.0,
                step: 1.0,
            },
        ])
        .apply(&mut state, &scene)
        .unwrap_err();
        assert!(matches!(err, CameraError::TargetNotFound { .. }));
        assert_eq!(state.position, DVec2::new(10.0, 4.0));
        assert_eq!(state.zoom, 1.0);
    }

    #[test]
    fn policy_json_roundtrip() {
        let policy = CameraPolicy::composed(vec![
            CameraPolicy::follow_x("ego", 0.0),
            CameraPolicy::Zooming {
                target_zoom: 4.0,
                step: 0.5,
            },
        ]);
        let json = serde_json::to_string(&policy).unwrap();
        let back: CameraPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, policy);

        let parsed: CameraPolicy =
            serde_json::from_str(r#"{"policy":"target_follow","target_id":"ego","y":0.0}"#).unwrap();
        assert_eq!(parsed, CameraPolicy::follow_x("ego", 0.0));
    }
}
