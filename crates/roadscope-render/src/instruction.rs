//! Deferred drawing instructions.
//!
//! An [`Instruction`] is one drawing call ([`DrawOp`]) bound to the
//! [`CoordinateSystem`] its arguments are expressed in. Instructions are
//! queued in a [`RenderModel`](crate::model::RenderModel) and replayed later
//! by the executor, once the camera is known.
//!
//! # Coordinate systems
//!
//! | Tag | Units | Camera applies? |
//! |-----|-------|-----------------|
//! | `scene` | world meters | yes |
//! | `camera_pixels` | canvas pixels, origin top-left | no |
//! | `camera_relative` | fractions of the canvas, `[0, 1]` | no |

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::RenderError;

// ---------------------------------------------------------------------------
// CoordinateSystem
// ---------------------------------------------------------------------------

/// The frame an instruction's geometry is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSystem {
    /// World meters, transformed by the active camera.
    #[default]
    Scene,
    /// Raw canvas pixels; the camera is ignored.
    CameraPixels,
    /// Normalized `[0, 1]` canvas fractions; the camera is ignored.
    CameraRelative,
}

impl CoordinateSystem {
    pub const ALL: [CoordinateSystem; 3] = [
        CoordinateSystem::Scene,
        CoordinateSystem::CameraPixels,
        CoordinateSystem::CameraRelative,
    ];

    /// The wire name of this tag.
    pub fn as_str(self) -> &'static str {
        match self {
            CoordinateSystem::Scene => "scene",
            CoordinateSystem::CameraPixels => "camera_pixels",
            CoordinateSystem::CameraRelative => "camera_relative",
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordinateSystem {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoordinateSystem::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| RenderError::InvalidCoordinateSystem { tag: s.to_owned() })
    }
}

// ---------------------------------------------------------------------------
// Styles
// ---------------------------------------------------------------------------

/// Stroke style for outlines and lines. `width` is in the instruction's
/// own units (meters for scene instructions, pixels for camera pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// Horizontal placement of text relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

// ---------------------------------------------------------------------------
// Polyline
// ---------------------------------------------------------------------------

/// An ordered vertex set, used by every multi-point drawing op.
///
/// Accepts either a sequence of points or a dense `[x0, y0, x1, y1, ...]`
/// coordinate array (see [`Polyline::from_flat`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline(pub Vec<DVec2>);

impl Polyline {
    /// Build from a dense coordinate array. Odd lengths are rejected.
    pub fn from_flat(coords: &[f64]) -> Result<Self, RenderError> {
        if coords.len() % 2 != 0 {
            return Err(RenderError::InvalidPointArray { len: coords.len() });
        }
        Ok(Self(
            coords
                .chunks_exact(2)
                .map(|xy| DVec2::new(xy[0], xy[1]))
                .collect(),
        ))
    }

    pub fn points(&self) -> &[DVec2] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<DVec2>> for Polyline {
    fn from(points: Vec<DVec2>) -> Self {
        Self(points)
    }
}

impl From<&[DVec2]> for Polyline {
    fn from(points: &[DVec2]) -> Self {
        Self(points.to_vec())
    }
}

impl From<Vec<[f64; 2]>> for Polyline {
    fn from(points: Vec<[f64; 2]>) -> Self {
        Self(points.into_iter().map(DVec2::from).collect())
    }
}

impl<const N: usize> From<[DVec2; N]> for Polyline {
    fn from(points: [DVec2; N]) -> Self {
        Self(points.to_vec())
    }
}

// ---------------------------------------------------------------------------
// DrawOp
// ---------------------------------------------------------------------------

/// A single drawing operation with strongly typed arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Circle around `center`.
    Circle {
        center: DVec2,
        radius: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    /// Rectangle centered on `center`, rotated by `rotation` radians, with
    /// rounded corners.
    RoundedRect {
        center: DVec2,
        width: f64,
        height: f64,
        corner_radius: f64,
        rotation: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    /// Text anchored at the baseline point `anchor`. `size` is always in
    /// pixels; text is never scaled, rotated or mirrored by the camera.
    Text {
        text: String,
        anchor: DVec2,
        size: f64,
        color: Color,
        #[serde(default)]
        align: TextAlign,
    },
    /// Open polyline.
    Line { points: Polyline, stroke: Stroke },
    /// Open polyline with a dash pattern (`dash` on, `gap` off).
    DashedLine {
        points: Polyline,
        stroke: Stroke,
        dash: f64,
        gap: f64,
    },
    /// One filled dot per point.
    PointTrail {
        points: Polyline,
        radius: f64,
        color: Color,
    },
    /// Closed polygon fill.
    FillRegion { points: Polyline, color: Color },
    /// Rotated vehicle rectangle centered on `center`.
    VehicleFootprint {
        center: DVec2,
        heading: f64,
        length: f64,
        width: f64,
        fill: Color,
        outline: Option<Stroke>,
    },
}

impl DrawOp {
    /// Short name of the operation, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            DrawOp::Circle { .. } => "circle",
            DrawOp::RoundedRect { .. } => "rounded_rect",
            DrawOp::Text { .. } => "text",
            DrawOp::Line { .. } => "line",
            DrawOp::DashedLine { .. } => "dashed_line",
            DrawOp::PointTrail { .. } => "point_trail",
            DrawOp::FillRegion { .. } => "fill_region",
            DrawOp::VehicleFootprint { .. } => "vehicle_footprint",
        }
    }

    /// Whether this op is text, which the executor positions through the
    /// camera but renders in pixel space.
    pub fn is_text(&self) -> bool {
        matches!(self, DrawOp::Text { .. })
    }

    // -- constructors -------------------------------------------------------

    pub fn filled_circle(center: DVec2, radius: f64, fill: Color) -> Self {
        DrawOp::Circle {
            center,
            radius,
            fill: Some(fill),
            stroke: None,
        }
    }

    pub fn text(text: impl Into<String>, anchor: DVec2, size: f64, color: Color) -> Self {
        DrawOp::Text {
            text: text.into(),
            anchor,
            size,
            color,
            align: TextAlign::Left,
        }
    }

    pub fn line(points: impl Into<Polyline>, stroke: Stroke) -> Self {
        DrawOp::Line {
            points: points.into(),
            stroke,
        }
    }

    pub fn dashed_line(points: impl Into<Polyline>, stroke: Stroke, dash: f64, gap: f64) -> Self {
        DrawOp::DashedLine {
            points: points.into(),
            stroke,
            dash,
            gap,
        }
    }

    pub fn fill_region(points: impl Into<Polyline>, color: Color) -> Self {
        DrawOp::FillRegion {
            points: points.into(),
            color,
        }
    }

    pub fn point_trail(points: impl Into<Polyline>, radius: f64, color: Color) -> Self {
        DrawOp::PointTrail {
            points: points.into(),
            radius,
            color,
        }
    }
}

// ---------------------------------------------------------------------------
// Instruction
// ---------------------------------------------------------------------------

/// A drawing op bound to its coordinate system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    #[serde(flatten)]
    pub op: DrawOp,
    #[serde(default)]
    pub coordinate_system: CoordinateSystem,
}

impl Instruction {
    pub fn new(op: DrawOp, coordinate_system: CoordinateSystem) -> Self {
        Self {
            op,
            coordinate_system,
        }
    }

    /// An instruction in world coordinates.
    pub fn scene(op: DrawOp) -> Self {
        Self::new(op, CoordinateSystem::Scene)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_system_parses_wire_names() {
        for cs in CoordinateSystem::ALL {
            assert_eq!(cs.as_str().parse::<CoordinateSystem>().unwrap(), cs);
        }
    }

    #[test]
    fn unknown_coordinate_system_names_the_tag() {
        let err = "world".parse::<CoordinateSystem>().unwrap_err();
        assert!(matches!(&err, RenderError::InvalidCoordinateSystem { tag } if tag == "world"));
        assert!(err.to_string().contains("'world'"));
    }

    #[test]
    fn polyline_from_flat_pairs_coordinates() {
        let p = Polyline::from_flat(&[0.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(p.points(), &[DVec2::new(0.0, 1.0), DVec2::new(2.0, 3.0)]);
    }

    #[test]
    fn polyline_from_flat_rejects_odd_length() {
        let err = Polyline::from_flat(&[0.0, 1.0, 2.0]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidPointArray { len: 3 }));
    }

    #[test]
    fn instruction_json_uses_op_tag_and_defaults_to_scene() {
        let json = r##"{"op":"circle","center":[1.0,2.0],"radius":3.0,"fill":"#ff0000","stroke":null}"##;
        let ins: Instruction = serde_json::from_str(json).unwrap();
        assert_eq!(ins.coordinate_system, CoordinateSystem::Scene);
        assert_eq!(ins.op.name(), "circle");
    }

    #[test]
    fn instruction_json_keeps_exact_colors() {
        let ins = Instruction::new(
            DrawOp::filled_circle(DVec2::new(1.0, 2.0), 3.0, Color::rgb(0.3, 0.3, 0.3)),
            CoordinateSystem::CameraRelative,
        );
        let back: Instruction = serde_json::from_str(&serde_json::to_string(&ins).unwrap()).unwrap();
        assert_eq!(back, ins);
    }

    #[test]
    fn instruction_json_rejects_unknown_coordinate_system() {
        let json = r##"{"op":"text","text":"hi","anchor":[0.0,0.0],"size":12.0,"color":"#000","coordinate_system":"screen"}"##;
        assert!(serde_json::from_str::<Instruction>(json).is_err());
    }
}
