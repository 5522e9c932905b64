//! Scene objects that know how to queue themselves into a render model.
//!
//! # Color Mapping
//!
//! | Vehicle | Fill |
//! |---------|------|
//! | role `ego` | Orange (#FF8C1A) |
//! | role `target` / `lead` | Blue (#4488FF) |
//! | Car | Light grey-blue (#A8B4C8) |
//! | Truck | Slate (#707C8C) |
//! | Bus | Sand (#C8B478) |
//! | Motorcycle | Green (#6CBF5A) |
//!
//! Roles win over kinds. Lanes are drawn as asphalt with white markings.

use glam::DVec2;
use roadscope_scene::lane::{Lane, LaneMarking};
use roadscope_scene::snapshot::SceneSnapshot;
use roadscope_scene::vehicle::{Vehicle, VehicleKind};

use crate::color::Color;
use crate::instruction::{CoordinateSystem, DrawOp, Instruction, Stroke, TextAlign};
use crate::model::RenderModel;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Ego vehicle: #FF8C1A.
const COLOR_EGO: Color = Color::rgb(1.0, 0.549, 0.102);
/// Vehicles the ego reacts to: #4488FF.
const COLOR_TARGET: Color = Color::rgb(0.267, 0.533, 1.0);
const COLOR_CAR: Color = Color::rgb(0.659, 0.706, 0.784);
const COLOR_TRUCK: Color = Color::rgb(0.439, 0.486, 0.549);
const COLOR_BUS: Color = Color::rgb(0.784, 0.706, 0.471);
const COLOR_MOTORCYCLE: Color = Color::rgb(0.424, 0.749, 0.353);

const COLOR_OUTLINE: Color = Color::rgb(0.15, 0.15, 0.15);
const COLOR_ASPHALT: Color = Color::rgb(0.35, 0.35, 0.37);
const COLOR_MARKING: Color = Color::WHITE;
const COLOR_TRAIL: Color = Color::rgba(0.2, 0.2, 0.2, 0.6);

/// Outline width in meters.
const OUTLINE_WIDTH: f64 = 0.1;
/// Lane marking width in meters.
const MARKING_WIDTH: f64 = 0.15;
/// Dashed marking pattern in meters: 3 m painted, 6 m gap.
const MARKING_DASH: f64 = 3.0;
const MARKING_GAP: f64 = 6.0;

/// Fill color for a vehicle: role first, then kind.
pub fn vehicle_color(vehicle: &Vehicle) -> Color {
    if vehicle.has_role("ego") {
        return COLOR_EGO;
    }
    if vehicle.has_role("target") || vehicle.has_role("lead") {
        return COLOR_TARGET;
    }
    match vehicle.kind {
        VehicleKind::Car => COLOR_CAR,
        VehicleKind::Truck => COLOR_TRUCK,
        VehicleKind::Bus => COLOR_BUS,
        VehicleKind::Motorcycle => COLOR_MOTORCYCLE,
    }
}

// ---------------------------------------------------------------------------
// Renderable
// ---------------------------------------------------------------------------

/// Something that can contribute instructions to a [`RenderModel`].
pub trait Renderable {
    fn render_into(&self, model: &mut RenderModel);
}

impl<T: Renderable + ?Sized> Renderable for &T {
    fn render_into(&self, model: &mut RenderModel) {
        (**self).render_into(model);
    }
}

impl<T: Renderable> Renderable for [T] {
    fn render_into(&self, model: &mut RenderModel) {
        for item in self {
            item.render_into(model);
        }
    }
}

impl<T: Renderable> Renderable for Vec<T> {
    fn render_into(&self, model: &mut RenderModel) {
        self.as_slice().render_into(model);
    }
}

impl Renderable for Instruction {
    fn render_into(&self, model: &mut RenderModel) {
        model.push(self.clone());
    }
}

/// Footprint with an outline, plus a line from the center to the front
/// bumper showing the heading.
impl Renderable for Vehicle {
    fn render_into(&self, model: &mut RenderModel) {
        let is_ego = self.has_role("ego");
        let outline_width = if is_ego { OUTLINE_WIDTH * 2.5 } else { OUTLINE_WIDTH };
        model.add_scene(DrawOp::VehicleFootprint {
            center: self.position,
            heading: self.heading,
            length: self.length,
            width: self.width,
            fill: vehicle_color(self),
            outline: Some(Stroke::new(COLOR_OUTLINE, outline_width)),
        });
        let nose = self.position + self.direction() * (self.length / 2.0);
        model.add_scene(DrawOp::line(
            vec![self.position, nose],
            Stroke::new(COLOR_OUTLINE, OUTLINE_WIDTH),
        ));
    }
}

impl Renderable for Lane {
    fn render_into(&self, model: &mut RenderModel) {
        model.add_scene(DrawOp::fill_region(self.outline(), COLOR_ASPHALT));
        for (marking, edge) in [
            (self.left_marking, self.left_edge()),
            (self.right_marking, self.right_edge()),
        ] {
            let stroke = Stroke::new(COLOR_MARKING, MARKING_WIDTH);
            match marking {
                LaneMarking::None => {}
                LaneMarking::Solid => {
                    model.add_scene(DrawOp::line(edge, stroke));
                }
                LaneMarking::Dashed => {
                    model.add_scene(DrawOp::dashed_line(edge, stroke, MARKING_DASH, MARKING_GAP));
                }
            }
        }
    }
}

/// Lanes first so vehicles paint on top.
impl Renderable for SceneSnapshot {
    fn render_into(&self, model: &mut RenderModel) {
        for lane in &self.lanes {
            lane.render_into(model);
        }
        for vehicle in &self.vehicles {
            vehicle.render_into(model);
        }
    }
}

// ---------------------------------------------------------------------------
// Trail
// ---------------------------------------------------------------------------

/// Past positions of one vehicle, drawn as dots.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    pub points: Vec<DVec2>,
    pub radius: f64,
    pub color: Color,
}

impl Trail {
    pub fn new(points: Vec<DVec2>) -> Self {
        Self {
            points,
            radius: 0.25,
            color: COLOR_TRAIL,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }
}

impl Renderable for Trail {
    fn render_into(&self, model: &mut RenderModel) {
        if self.points.is_empty() {
            return;
        }
        model.add_scene(DrawOp::point_trail(self.points.clone(), self.radius, self.color));
    }
}

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// Text in any coordinate system.
///
/// Scene labels follow the world; camera-pixel labels stay put as a HUD;
/// camera-relative labels are placed as fractions of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub anchor: DVec2,
    pub coordinate_system: CoordinateSystem,
    pub size: f64,
    pub color: Color,
    pub align: TextAlign,
}

impl Label {
    pub fn new(text: impl Into<String>, anchor: DVec2, coordinate_system: CoordinateSystem) -> Self {
        Self {
            text: text.into(),
            anchor,
            coordinate_system,
            size: 14.0,
            color: Color::BLACK,
            align: TextAlign::Left,
        }
    }

    /// A HUD label in canvas pixels.
    pub fn hud(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self::new(text, DVec2::new(x, y), CoordinateSystem::CameraPixels)
    }

    /// The snapshot time, top-left of the canvas.
    pub fn time(snapshot: &SceneSnapshot) -> Self {
        Self::hud(format!("t = {:.2} s", snapshot.time), 10.0, 20.0)
    }

    #[must_use]
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

impl Renderable for Label {
    fn render_into(&self, model: &mut RenderModel) {
        model.add_instruction(
            DrawOp::Text {
                text: self.text.clone(),
                anchor: self.anchor,
                size: self.size,
                color: self.color,
                align: self.align,
            },
            self.coordinate_system,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_takes_precedence_over_kind() {
        let truck = Vehicle::new("t", VehicleKind::Truck, DVec2::ZERO, 0.0);
        assert_eq!(vehicle_color(&truck), COLOR_TRUCK);
        assert_eq!(vehicle_color(&truck.clone().with_role("Ego")), COLOR_EGO);
        assert_eq!(vehicle_color(&truck.clone().with_role("Lead")), COLOR_TARGET);
        assert_eq!(vehicle_color(&truck.clone().with_role("target")), COLOR_TARGET);
    }

    #[test]
    fn role_match_is_exact_not_substring() {
        let car = Vehicle::car("c", DVec2::ZERO, 0.0);
        assert_eq!(vehicle_color(&car.clone().with_role("legacy")), COLOR_CAR);
        assert_eq!(vehicle_color(&car.clone().with_role("lead_vehicle")), COLOR_CAR);
        assert_eq!(vehicle_color(&car.with_role("retargeted")), COLOR_CAR);
    }

    #[test]
    fn vehicle_emits_footprint_then_heading_marker() {
        let mut model = RenderModel::new();
        Vehicle::car("a", DVec2::new(1.0, 2.0), 0.0).render_into(&mut model);
        let ops: Vec<_> = model.instructions().iter().map(|i| i.op.name()).collect();
        assert_eq!(ops, ["vehicle_footprint", "line"]);
        let DrawOp::Line { points, .. } = &model.instructions()[1].op else {
            panic!("expected heading line");
        };
        let length = Vehicle::car("a", DVec2::ZERO, 0.0).length;
        assert_eq!(points.points()[1], DVec2::new(1.0 + length / 2.0, 2.0));
    }

    #[test]
    fn ego_outline_is_thicker() {
        let mut model = RenderModel::new();
        Vehicle::car("ego", DVec2::ZERO, 0.0).with_role("ego").render_into(&mut model);
        let DrawOp::VehicleFootprint { outline: Some(stroke), .. } = &model.instructions()[0].op else {
            panic!("expected footprint");
        };
        assert!(stroke.width > OUTLINE_WIDTH);
    }

    #[test]
    fn lane_markings_follow_style() {
        let lane = Lane::straight("l", DVec2::ZERO, DVec2::new(50.0, 0.0), 3.5)
            .with_markings(LaneMarking::Dashed, LaneMarking::None);
        let mut model = RenderModel::new();
        lane.render_into(&mut model);
        let ops: Vec<_> = model.instructions().iter().map(|i| i.op.name()).collect();
        assert_eq!(ops, ["fill_region", "dashed_line"]);
    }

    #[test]
    fn snapshot_paints_lanes_below_vehicles() {
        let mut snapshot = SceneSnapshot::new(0.0);
        snapshot
            .push_vehicle(Vehicle::car("v", DVec2::ZERO, 0.0))
            .push_lane(Lane::straight("l", DVec2::ZERO, DVec2::new(10.0, 0.0), 3.0));
        let mut model = RenderModel::new();
        snapshot.render_into(&mut model);
        assert_eq!(model.instructions()[0].op.name(), "fill_region");
        assert_eq!(model.instructions().last().map(|i| i.op.name()), Some("line"));
    }

    #[test]
    fn empty_trail_adds_nothing() {
        let mut model = RenderModel::new();
        Trail::new(Vec::new()).render_into(&mut model);
        assert!(model.is_empty());
    }

    #[test]
    fn label_keeps_its_coordinate_system() {
        let mut model = RenderModel::new();
        let snapshot = SceneSnapshot::new(1.5);
        Label::time(&snapshot).render_into(&mut model);
        let instruction = &model.instructions()[0];
        assert_eq!(instruction.coordinate_system, CoordinateSystem::CameraPixels);
        let DrawOp::Text { text, .. } = &instruction.op else {
            panic!("expected text");
        };
        assert_eq!(text, "t = 1.50 s");
    }

    #[test]
    fn slices_render_in_order() {
        let labels = vec![
            Label::hud("a", 0.0, 0.0),
            Label::hud("b", 0.0, 0.0),
        ];
        let mut model = RenderModel::new();
        labels.render_into(&mut model);
        assert_eq!(model.len(), 2);
    }
}
