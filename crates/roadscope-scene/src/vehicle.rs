//! Vehicles and the entity abstraction camera policies operate on.
//!
//! [`SceneEntity`] is the minimal surface the renderer needs from anything
//! that lives in the world: an identifier, a world position, a heading, and
//! a rectangular extent. [`Vehicle`] is the concrete entity carried by
//! [`SceneSnapshot`](crate::snapshot::SceneSnapshot).

use glam::DVec2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SceneEntity
// ---------------------------------------------------------------------------

/// Anything with an identity, a pose and a rectangular footprint.
///
/// Positions are world meters; heading is radians counter-clockwise from
/// the +x axis.
pub trait SceneEntity {
    /// Stable identifier, unique within a snapshot.
    fn id(&self) -> &str;
    /// Center of the footprint in world meters.
    fn position(&self) -> DVec2;
    /// Heading in radians.
    fn heading(&self) -> f64;
    /// Extent along the heading direction, in meters.
    fn length(&self) -> f64;
    /// Extent across the heading direction, in meters.
    fn width(&self) -> f64;

    /// Radius of the circle that circumscribes the footprint at any heading.
    fn bounding_radius(&self) -> f64 {
        (self.length() / 2.0).hypot(self.width() / 2.0)
    }
}

// ---------------------------------------------------------------------------
// VehicleKind
// ---------------------------------------------------------------------------

/// Broad vehicle class. Drives default dimensions and default colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    #[default]
    Car,
    Truck,
    Bus,
    Motorcycle,
}

impl VehicleKind {
    /// Typical `(length, width)` in meters for this class.
    pub fn default_dimensions(self) -> (f64, f64) {
        match self {
            VehicleKind::Car => (4.5, 1.8),
            VehicleKind::Truck => (12.0, 2.5),
            VehicleKind::Bus => (12.0, 2.55),
            VehicleKind::Motorcycle => (2.2, 0.8),
        }
    }
}

// ---------------------------------------------------------------------------
// Vehicle
// ---------------------------------------------------------------------------

/// One vehicle as seen at a single simulation instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique identifier within the snapshot (e.g. `"ego"`, `"veh_17"`).
    pub id: String,
    /// Footprint center in world meters.
    pub position: DVec2,
    /// Heading in radians, counter-clockwise from +x.
    pub heading: f64,
    /// Longitudinal speed in m/s. Informational; used by labels only.
    #[serde(default)]
    pub speed: f64,
    /// Footprint length in meters.
    pub length: f64,
    /// Footprint width in meters.
    pub width: f64,
    /// Vehicle class.
    #[serde(default)]
    pub kind: VehicleKind,
    /// Optional semantic role (`"ego"`, `"lead"`, ...). Renderers use it to
    /// highlight specific vehicles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Vehicle {
    /// Create a vehicle of the given class with its default dimensions.
    pub fn new(id: impl Into<String>, kind: VehicleKind, position: DVec2, heading: f64) -> Self {
        let (length, width) = kind.default_dimensions();
        Self {
            id: id.into(),
            position,
            heading,
            speed: 0.0,
            length,
            width,
            kind,
            role: None,
        }
    }

    /// Shorthand for a passenger car.
    pub fn car(id: impl Into<String>, position: DVec2, heading: f64) -> Self {
        Self::new(id, VehicleKind::Car, position, heading)
    }

    /// Set the semantic role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the speed in m/s.
    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Override the footprint dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, length: f64, width: f64) -> Self {
        self.length = length;
        self.width = width;
        self
    }

    /// Whether the vehicle carries the given role (case-insensitive).
    pub fn has_role(&self, role: &str) -> bool {
        self.role
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case(role))
    }

    /// Unit vector pointing along the heading.
    pub fn direction(&self) -> DVec2 {
        DVec2::from_angle(self.heading)
    }
}

impl SceneEntity for Vehicle {
    fn id(&self) -> &str {
        &self.id
    }

    fn position(&self) -> DVec2 {
        self.position
    }

    fn heading(&self) -> f64 {
        self.heading
    }

    fn length(&self) -> f64 {
        self.length
    }

    fn width(&self) -> f64 {
        self.width
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
