//! End-to-end checks of the executor against recording and raster surfaces.
//!
//! Recording surfaces expose the exact device-space geometry each
//! instruction produced; raster surfaces confirm the pixels land where the
//! camera says they should.

use std::f64::consts::FRAC_PI_2;

use roadscope_render::prelude::*;
use roadscope_render::surface::DevicePath;

const EPS: f64 = 1e-9;

fn fill_paths(surface: &RecordingSurface) -> Vec<&DevicePath> {
    surface
        .calls()
        .iter()
        .filter_map(|call| match call {
            SurfaceCall::FillPath { path, .. } => Some(path),
            _ => None,
        })
        .collect()
}

fn center_of(path: &DevicePath) -> DVec2 {
    let (lo, hi) = path.bounds().unwrap();
    (lo + hi) * 0.5
}

// ---------------------------------------------------------------------------
// Placeholder
// ---------------------------------------------------------------------------

#[test]
fn empty_model_renders_placeholder_text_only() {
    let mut surface = RecordingSurface::new(800, 600);
    render_to_canvas(&RenderModel::new(), &CameraState::default(), &mut surface).unwrap();

    assert_eq!(surface.calls().len(), 1, "no background, no shapes");
    let (text, position) = surface.texts().next().unwrap();
    assert_eq!(text, PLACEHOLDER_TEXT);
    assert_eq!(position, DVec2::new(400.0, 300.0));
}

// ---------------------------------------------------------------------------
// Scene coordinates
// ---------------------------------------------------------------------------

#[test]
fn world_origin_lands_on_canvas_center() {
    let mut model = RenderModel::new();
    model.add_scene(DrawOp::filled_circle(DVec2::ZERO, 1.0, Color::BLACK));
    let camera = CameraState::for_canvas(800, 600).with_zoom(10.0);

    let mut surface = RecordingSurface::new(800, 600);
    render_to_canvas(&model, &camera, &mut surface).unwrap();

    let paths = fill_paths(&surface);
    assert_eq!(paths.len(), 1);
    assert!((center_of(paths[0]) - DVec2::new(400.0, 300.0)).length() < EPS);
    let (lo, hi) = paths[0].bounds().unwrap();
    assert!((hi.x - lo.x - 20.0).abs() < EPS, "radius 1 m at 10 px/m");
}

#[test]
fn positive_world_y_is_drawn_above_center() {
    let mut model = RenderModel::new();
    model.add_scene(DrawOp::filled_circle(DVec2::new(0.0, 5.0), 0.5, Color::BLACK));
    let camera = CameraState::for_canvas(200, 200).with_zoom(10.0);

    let mut surface = RecordingSurface::new(200, 200);
    render_to_canvas(&model, &camera, &mut surface).unwrap();

    let center = center_of(fill_paths(&surface)[0]);
    assert!((center - DVec2::new(100.0, 50.0)).length() < EPS);
}

#[test]
fn camera_position_is_subtracted_before_rotation() {
    let mut model = RenderModel::new();
    model.add_scene(DrawOp::filled_circle(DVec2::new(11.0, 0.0), 0.1, Color::BLACK));
    let camera = CameraState::for_canvas(100, 100)
        .with_position(DVec2::new(10.0, 0.0))
        .with_zoom(20.0)
        .with_rotation(FRAC_PI_2);

    let mut surface = RecordingSurface::new(100, 100);
    render_to_canvas(&model, &camera, &mut surface).unwrap();

    // One meter ahead of the camera, rotated a quarter turn, renders 20 px up.
    let center = center_of(fill_paths(&surface)[0]);
    assert!((center - DVec2::new(50.0, 30.0)).length() < 1e-6);
}

// ---------------------------------------------------------------------------
// Camera-space coordinate systems
// ---------------------------------------------------------------------------

#[test]
fn camera_pixel_instructions_ignore_the_camera() {
    let mut model = RenderModel::new();
    model.add_instruction(
        DrawOp::filled_circle(DVec2::new(10.0, 20.0), 2.0, Color::BLACK),
        CoordinateSystem::CameraPixels,
    );
    let camera = CameraState::new(DVec2::new(500.0, -3.0), 7.0, 1.2, 300, 200);

    let mut surface = RecordingSurface::new(300, 200);
    render_to_canvas(&model, &camera, &mut surface).unwrap();

    let center = center_of(fill_paths(&surface)[0]);
    assert!((center - DVec2::new(10.0, 20.0)).length() < EPS);
}

#[test]
fn camera_relative_instructions_scale_with_canvas() {
    let mut model = RenderModel::new();
    model.add_instruction(
        DrawOp::fill_region(
            vec![
                DVec2::new(0.5, 0.5),
                DVec2::new(1.0, 0.5),
                DVec2::new(1.0, 1.0),
                DVec2::new(0.5, 1.0),
            ],
            Color::BLACK,
        ),
        CoordinateSystem::CameraRelative,
    );
    let camera = CameraState::for_canvas(400, 100).with_zoom(3.0);

    let mut surface = RecordingSurface::new(400, 100);
    render_to_canvas(&model, &camera, &mut surface).unwrap();

    let (lo, hi) = fill_paths(&surface)[0].bounds().unwrap();
    assert_eq!(lo, DVec2::new(200.0, 50.0));
    assert_eq!(hi, DVec2::new(400.0, 100.0));
}

#[test]
fn mixed_systems_replay_in_insertion_order() {
    let mut model = RenderModel::new();
    model
        .add_instruction_tagged(DrawOp::text("a", DVec2::ZERO, 10.0, Color::BLACK), "scene")
        .unwrap()
        .add_instruction_tagged(DrawOp::text("b", DVec2::ZERO, 10.0, Color::BLACK), "camera_pixels")
        .unwrap()
        .add_instruction_tagged(DrawOp::text("c", DVec2::ZERO, 10.0, Color::BLACK), "camera_relative")
        .unwrap();

    let mut surface = RecordingSurface::new(100, 80);
    render_to_canvas(&model, &CameraState::for_canvas(100, 80), &mut surface).unwrap();

    let texts: Vec<_> = surface.texts().collect();
    assert_eq!(
        texts,
        vec![
            ("a", DVec2::new(50.0, 40.0)),
            ("b", DVec2::ZERO),
            ("c", DVec2::ZERO),
        ]
    );
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

#[test]
fn rotated_camera_moves_text_anchor_but_not_glyph_orientation() {
    let mut model = RenderModel::new();
    model.add_scene(DrawOp::text("ego", DVec2::new(1.0, 0.0), 12.0, Color::BLACK));
    let camera = CameraState::for_canvas(100, 100)
        .with_zoom(10.0)
        .with_rotation(FRAC_PI_2);

    let mut surface = RecordingSurface::new(100, 100);
    render_to_canvas(&model, &camera, &mut surface).unwrap();

    let Some(SurfaceCall::Text {
        position,
        matrix,
        style,
        ..
    }) = surface.calls().iter().find(|c| matches!(c, SurfaceCall::Text { .. }))
    else {
        panic!("text was not drawn");
    };
    assert!((*position - DVec2::new(50.0, 40.0)).length() < 1e-6);
    assert_eq!(*matrix, DAffine2::IDENTITY);
    assert_eq!(style.size, 12.0, "text size is in pixels regardless of zoom");
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn zero_zoom_is_rejected_for_non_empty_models() {
    let mut model = RenderModel::new();
    model.add_scene(DrawOp::filled_circle(DVec2::ZERO, 1.0, Color::BLACK));
    let mut surface = RecordingSurface::new(10, 10);
    let err = render_to_canvas(&model, &CameraState::default().with_zoom(0.0), &mut surface).unwrap_err();
    assert!(err.to_string().contains("degenerate"));
}

#[test]
fn unknown_tag_is_rejected_without_storing() {
    let mut model = RenderModel::new();
    let err = model
        .add_instruction_tagged(DrawOp::text("x", DVec2::ZERO, 10.0, Color::BLACK), "screen")
        .unwrap_err();
    assert!(matches!(err, RenderError::InvalidCoordinateSystem { ref tag } if tag == "screen"));
    assert!(model.is_empty());
}

// ---------------------------------------------------------------------------
// Raster output
// ---------------------------------------------------------------------------

#[test]
fn raster_pixels_follow_the_camera() {
    let mut model = RenderModel::new();
    model
        .set_background_color(Color::WHITE)
        .add_scene(DrawOp::filled_circle(DVec2::new(2.0, 0.0), 1.0, Color::rgb8(255, 0, 0)));
    let camera = CameraState::for_canvas(100, 100).with_zoom(10.0);

    let mut surface = RasterSurface::new(100, 100).unwrap();
    render_to_canvas(&model, &camera, &mut surface).unwrap();

    assert_eq!(surface.pixel(70, 50), Some([255, 0, 0, 255]));
    assert_eq!(surface.pixel(50, 50), Some([255, 255, 255, 255]));
    assert_eq!(surface.pixel(5, 5), Some([255, 255, 255, 255]));
}
