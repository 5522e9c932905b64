//! The render model: an ordered, deferred instruction list.
//!
//! A [`RenderModel`] is built fresh for every render call. Renderables append
//! instructions; once every renderable has contributed, the camera is chosen
//! (explicitly or by [`camera_fit_to_content`](crate::camera::fit::camera_fit_to_content))
//! and the executor replays the list. Insertion order is paint order: later
//! instructions draw on top.
//!
//! # Example
//!
//! ```
//! use roadscope_render::prelude::*;
//!
//! let mut model = RenderModel::new();
//! model
//!     .add_scene(DrawOp::filled_circle(DVec2::ZERO, 1.0, Color::WHITE))
//!     .add_instruction(
//!         DrawOp::text("t=0.0s", DVec2::new(8.0, 16.0), 12.0, Color::BLACK),
//!         CoordinateSystem::CameraPixels,
//!     );
//! assert_eq!(model.len(), 2);
//!
//! // String tags are validated before anything is stored.
//! assert!(model.add_instruction_tagged(DrawOp::text("x", DVec2::ZERO, 9.0, Color::BLACK), "world").is_err());
//! assert_eq!(model.len(), 2);
//! ```

use crate::color::Color;
use crate::instruction::{CoordinateSystem, DrawOp, Instruction};
use crate::RenderError;

/// Default background: a light asphalt grey.
pub const DEFAULT_BACKGROUND: Color = Color::rgb(0.93, 0.93, 0.93);

/// Deferred instruction list plus background color.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel {
    instructions: Vec<Instruction>,
    background: Color,
}

impl Default for RenderModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderModel {
    pub fn new() -> Self {
        Self {
            instructions: Vec::new(),
            background: DEFAULT_BACKGROUND,
        }
    }

    /// Append an instruction in the given coordinate system.
    pub fn add_instruction(&mut self, op: DrawOp, coordinate_system: CoordinateSystem) -> &mut Self {
        tracing::trace!(op = op.name(), %coordinate_system, "queue instruction");
        self.instructions.push(Instruction::new(op, coordinate_system));
        self
    }

    /// Append an instruction in scene (world) coordinates.
    pub fn add_scene(&mut self, op: DrawOp) -> &mut Self {
        self.add_instruction(op, CoordinateSystem::Scene)
    }

    /// Append an instruction whose coordinate system is given by name.
    ///
    /// # Errors
    ///
    /// [`RenderError::InvalidCoordinateSystem`] if `tag` is not one of
    /// `scene`, `camera_pixels`, `camera_relative`. Nothing is stored.
    pub fn add_instruction_tagged(&mut self, op: DrawOp, tag: &str) -> Result<&mut Self, RenderError> {
        let coordinate_system = tag.parse::<CoordinateSystem>()?;
        Ok(self.add_instruction(op, coordinate_system))
    }

    /// Append an already-built instruction.
    pub fn push(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    /// Store the background color, normalized.
    pub fn set_background_color(&mut self, color: impl Into<Color>) -> &mut Self {
        self.background = color.into().normalized();
        self
    }

    /// Parse and store a hex background color.
    pub fn set_background_hex(&mut self, hex: &str) -> Result<&mut Self, RenderError> {
        let color = Color::from_hex(hex)?;
        Ok(self.set_background_color(color))
    }

    /// Drop every queued instruction. The background is kept.
    pub fn reset_instructions(&mut self) -> &mut Self {
        self.instructions.clear();
        self
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instructions tagged with the given coordinate system, in order.
    pub fn in_system(&self, coordinate_system: CoordinateSystem) -> impl Iterator<Item = &Instruction> + '_ {
        self.instructions
            .iter()
            .filter(move |i| i.coordinate_system == coordinate_system)
    }
}

impl Extend<Instruction> for RenderModel {
    fn extend<T: IntoIterator<Item = Instruction>>(&mut self, iter: T) {
        self.instructions.extend(iter);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;

    fn dot(x: f64) -> DrawOp {
        DrawOp::filled_circle(DVec2::new(x, 0.0), 1.0, Color::BLACK)
    }

    #[test]
    fn instructions_come_back_in_insertion_order() {
        let mut model = RenderModel::new();
        model
            .add_scene(dot(1.0))
            .add_instruction(dot(2.0), CoordinateSystem::CameraPixels)
            .add_instruction(dot(3.0), CoordinateSystem::CameraRelative);
        let got: Vec<(DrawOp, CoordinateSystem)> = model
            .instructions()
            .iter()
            .map(|i| (i.op.clone(), i.coordinate_system))
            .collect();
        assert_eq!(
            got,
            vec![
                (dot(1.0), CoordinateSystem::Scene),
                (dot(2.0), CoordinateSystem::CameraPixels),
                (dot(3.0), CoordinateSystem::CameraRelative),
            ]
        );
    }

    #[test]
    fn tagged_add_rejects_unknown_tag_without_storing() {
        let mut model = RenderModel::new();
        model.add_scene(dot(0.0));
        let err = model.add_instruction_tagged(dot(1.0), "pixels").unwrap_err();
        assert!(matches!(err, RenderError::InvalidCoordinateSystem { ref tag } if tag == "pixels"));
        assert_eq!(model.len(), 1);

        model.add_instruction_tagged(dot(2.0), "camera_relative").unwrap();
        assert_eq!(model.instructions()[1].coordinate_system, CoordinateSystem::CameraRelative);
    }

    #[test]
    fn reset_clears_and_is_idempotent() {
        let mut model = RenderModel::new();
        model.add_scene(dot(0.0)).add_scene(dot(1.0));
        model.reset_instructions();
        assert!(model.is_empty());
        model.reset_instructions();
        assert!(model.is_empty());
    }

    #[test]
    fn background_is_normalized() {
        let mut model = RenderModel::new();
        model.set_background_color([2.0, 0.5, -1.0]);
        assert_eq!(model.background(), Color::rgb(1.0, 0.5, 0.0));
        model.set_background_hex("#000000").unwrap();
        assert_eq!(model.background(), Color::BLACK);
        assert!(model.set_background_hex("#zz").is_err());
    }

    #[test]
    fn in_system_filters_by_tag() {
        let mut model = RenderModel::new();
        model
            .add_scene(dot(0.0))
            .add_instruction(dot(1.0), CoordinateSystem::CameraPixels)
            .add_scene(dot(2.0));
        assert_eq!(model.in_system(CoordinateSystem::Scene).count(), 2);
        assert_eq!(model.in_system(CoordinateSystem::CameraRelative).count(), 0);
    }
}
