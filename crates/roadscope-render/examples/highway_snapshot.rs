//! Render a seeded three-lane highway to PNG, SVG and PDF, then a short
//! follow-camera sequence.
//!
//! Run with:
//!   cargo run --example highway_snapshot -p roadscope-render -- [OUT_DIR] [FONT.ttf]
//!
//! Output goes to `OUT_DIR` (default: `roadscope_out` in the system temp
//! dir). Pass a font file to get text in the PNG frames.

use std::path::PathBuf;

use anyhow::Context;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use roadscope_render::prelude::*;

const LANE_WIDTH: f64 = 3.5;
const LANES: usize = 3;
const ROAD_LENGTH: f64 = 300.0;
const FRAMES: usize = 24;
const DT: f64 = 0.25;

// ---------------------------------------------------------------------------
// Scene setup
// ---------------------------------------------------------------------------

fn lanes() -> Vec<Lane> {
    (0..LANES)
        .map(|i| {
            let y = i as f64 * LANE_WIDTH;
            let left = if i + 1 == LANES { LaneMarking::Solid } else { LaneMarking::Dashed };
            let right = if i == 0 { LaneMarking::Solid } else { LaneMarking::None };
            Lane::straight(format!("lane_{i}"), DVec2::new(0.0, y), DVec2::new(ROAD_LENGTH, y), LANE_WIDTH)
                .with_markings(left, right)
        })
        .collect()
}

fn traffic(rng: &mut Pcg64, count: usize) -> Vec<Vehicle> {
    let mut vehicles = vec![Vehicle::car("ego", DVec2::new(40.0, LANE_WIDTH), 0.0)
        .with_role("ego")
        .with_speed(27.0)];
    for i in 0..count {
        let lane = rng.gen_range(0..LANES);
        let kind = match rng.gen_range(0..10) {
            0..=5 => VehicleKind::Car,
            6 | 7 => VehicleKind::Truck,
            8 => VehicleKind::Bus,
            _ => VehicleKind::Motorcycle,
        };
        let x = rng.gen_range(0.0..ROAD_LENGTH * 0.6);
        let jitter = rng.gen_range(-0.3..0.3);
        let speed = rng.gen_range(18.0..32.0);
        vehicles.push(
            Vehicle::new(format!("veh_{i}"), kind, DVec2::new(x, lane as f64 * LANE_WIDTH + jitter), 0.0)
                .with_speed(speed),
        );
    }
    vehicles
}

fn snapshot_at(time: f64, lanes: &[Lane], vehicles: &[Vehicle]) -> SceneSnapshot {
    let mut scene = SceneSnapshot::new(time);
    for lane in lanes {
        scene.push_lane(lane.clone());
    }
    for vehicle in vehicles {
        let mut moved = vehicle.clone();
        moved.position.x += vehicle.speed * time;
        scene.push_vehicle(moved);
    }
    scene
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("roadscope_out"));
    let font_path = args.next().map(PathBuf::from);
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = Pcg64::seed_from_u64(7);
    let lanes = lanes();
    let vehicles = traffic(&mut rng, 18);

    let renderer = Renderer::new(RenderConfig {
        canvas_width: 1200,
        canvas_height: 400,
        font_path,
        trail_length: 8,
        ..RenderConfig::default()
    })
    .context("building renderer")?;

    // Whole-road overview, camera fitted to the content.
    let scene = snapshot_at(0.0, &lanes, &vehicles);
    let title = Label::hud("roadscope: highway overview", 12.0, 24.0).with_size(16.0);
    for ext in ["png", "svg", "pdf"] {
        let path = out_dir.join(format!("overview.{ext}"));
        let camera = renderer
            .render_to_file(&[&scene, &title], None, &path)
            .with_context(|| format!("rendering {}", path.display()))?;
        println!(
            "wrote {} (zoom {:.2} px/m, center {:.1}, {:.1})",
            path.display(),
            camera.zoom,
            camera.position.x,
            camera.position.y
        );
    }

    // Follow the ego vehicle along x while easing the zoom in.
    let sequence = SceneSequence::new(
        (0..FRAMES)
            .map(|i| snapshot_at(i as f64 * DT, &lanes, &vehicles))
            .collect(),
    );
    let mut camera = Camera::new(
        CameraState::for_canvas(800, 300).with_zoom(4.0),
        CameraPolicy::composed(vec![
            CameraPolicy::follow_x("ego", LANE_WIDTH),
            CameraPolicy::Zooming {
                target_zoom: 9.0,
                step: 0.5,
            },
        ]),
    );
    let frames = renderer
        .render_sequence(&sequence, &mut camera, out_dir.join("follow"), "svg")
        .context("rendering follow sequence")?;
    println!("wrote {} follow frames to {}", frames.len(), out_dir.join("follow").display());

    Ok(())
}
