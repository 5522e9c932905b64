//! Replays a [`RenderModel`] against a surface through a camera.
//!
//! The surface transform is rebuilt from scratch for every call:
//!
//! ```text
//! reset
//! translate(canvas_width / 2, canvas_height / 2)
//! scale(zoom, -zoom)
//! rotate(rotation)
//! translate(-position)
//! ```
//!
//! Instructions are then replayed in insertion order. Scene instructions
//! draw under that world transform; camera-pixel instructions draw under the
//! identity; camera-relative instructions draw under a scale of the canvas
//! size, so `(0, 0)` to `(1, 1)` spans the whole canvas. Each non-scene
//! instruction is bracketed by save/restore so the world transform is back
//! in place for the next one.

use glam::DVec2;

use crate::camera::CameraState;
use crate::color::Color;
use crate::instruction::{CoordinateSystem, Instruction, TextAlign};
use crate::model::RenderModel;
use crate::primitives::draw_op;
use crate::surface::{Surface, TextStyle};
use crate::RenderError;

/// Text drawn in place of a frame when the model holds no instructions.
pub const PLACEHOLDER_TEXT: &str = "No rendering instructions found";

const PLACEHOLDER_SIZE: f64 = 20.0;

/// Render `model` onto `surface` as seen by `camera`.
///
/// An empty model draws only [`PLACEHOLDER_TEXT`] at the canvas center:
/// no background is painted and the camera is not consulted, so even a
/// degenerate camera succeeds on this path.
///
/// # Errors
///
/// [`RenderError::DegenerateCamera`] when the model is non-empty and the
/// camera zoom is zero or not finite. Nothing is drawn in that case.
pub fn render_to_canvas<S: Surface + ?Sized>(
    model: &RenderModel,
    camera: &CameraState,
    surface: &mut S,
) -> Result<(), RenderError> {
    if model.is_empty() {
        tracing::debug!("render model is empty; drawing placeholder");
        draw_placeholder(surface);
        return Ok(());
    }

    if camera.is_degenerate() {
        return Err(RenderError::DegenerateCamera { zoom: camera.zoom });
    }

    tracing::debug!(
        instructions = model.len(),
        x = camera.position.x,
        y = camera.position.y,
        zoom = camera.zoom,
        rotation = camera.rotation,
        "rendering frame"
    );

    surface.reset_transform();
    surface.paint(model.background());

    let canvas = camera.canvas_size();
    surface.translate(canvas.x / 2.0, canvas.y / 2.0);
    surface.scale(camera.zoom, -camera.zoom);
    surface.rotate(camera.rotation);
    surface.translate(-camera.position.x, -camera.position.y);

    for instruction in model.instructions() {
        replay(surface, instruction, canvas);
    }

    tracing::debug!(instructions = model.len(), "frame rendered");
    Ok(())
}

fn replay<S: Surface + ?Sized>(surface: &mut S, instruction: &Instruction, canvas: DVec2) {
    tracing::trace!(
        op = instruction.op.name(),
        coordinate_system = %instruction.coordinate_system,
        "replaying instruction"
    );
    match instruction.coordinate_system {
        CoordinateSystem::Scene => draw_op(surface, &instruction.op),
        CoordinateSystem::CameraPixels => {
            surface.save();
            surface.reset_transform();
            draw_op(surface, &instruction.op);
            surface.restore();
        }
        CoordinateSystem::CameraRelative => {
            surface.save();
            surface.reset_transform();
            surface.scale(canvas.x, canvas.y);
            draw_op(surface, &instruction.op);
            surface.restore();
        }
    }
}

fn draw_placeholder<S: Surface + ?Sized>(surface: &mut S) {
    let center = DVec2::new(f64::from(surface.width()), f64::from(surface.height())) / 2.0;
    let style = TextStyle {
        size: PLACEHOLDER_SIZE,
        color: Color::BLACK,
        align: TextAlign::Center,
    };
    surface.save();
    surface.reset_transform();
    surface.fill_text(PLACEHOLDER_TEXT, center, &style);
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::DrawOp;
    use crate::surface::{RecordingSurface, SurfaceCall};

    #[test]
    fn empty_model_draws_only_placeholder() {
        let mut surface = RecordingSurface::new(200, 100);
        let camera = CameraState::for_canvas(200, 100).with_zoom(0.0);
        render_to_canvas(&RenderModel::new(), &camera, &mut surface).unwrap();
        let texts: Vec<_> = surface.texts().collect();
        assert_eq!(texts, vec![(PLACEHOLDER_TEXT, DVec2::new(100.0, 50.0))]);
        assert_eq!(surface.calls().len(), 1);
    }

    #[test]
    fn degenerate_camera_is_rejected_before_drawing() {
        let mut model = RenderModel::new();
        model.add_scene(DrawOp::filled_circle(DVec2::ZERO, 1.0, Color::BLACK));
        let mut surface = RecordingSurface::new(10, 10);
        let err = render_to_canvas(&model, &CameraState::for_canvas(10, 10).with_zoom(0.0), &mut surface)
            .unwrap_err();
        assert!(matches!(err, RenderError::DegenerateCamera { zoom } if zoom == 0.0));
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn background_is_painted_first() {
        let mut model = RenderModel::new();
        model
            .set_background_color(Color::WHITE)
            .add_scene(DrawOp::filled_circle(DVec2::ZERO, 1.0, Color::BLACK));
        let mut surface = RecordingSurface::new(10, 10);
        render_to_canvas(&model, &CameraState::for_canvas(10, 10), &mut surface).unwrap();
        assert_eq!(surface.calls()[0], SurfaceCall::Paint(Color::WHITE));
        assert_eq!(surface.calls().len(), 2);
    }

    #[test]
    fn transform_stack_is_balanced_after_replay() {
        let mut model = RenderModel::new();
        for cs in CoordinateSystem::ALL {
            model.add_instruction(DrawOp::filled_circle(DVec2::ZERO, 1.0, Color::BLACK), cs);
        }
        let camera = CameraState::for_canvas(40, 20).with_zoom(3.0);
        let mut surface = RecordingSurface::new(40, 20);
        render_to_canvas(&model, &camera, &mut surface).unwrap();
        assert_eq!(surface.transform().depth(), 0);
        assert!(surface.matrix().abs_diff_eq(camera.world_transform(), 1e-12));
    }
}
