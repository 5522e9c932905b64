//! Property tests for snapshot bounds and sequence trails.

use proptest::prelude::*;
use roadscope_scene::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    (-100_000i32..100_000i32).prop_map(|v| f64::from(v) * 0.01)
}

fn point() -> impl Strategy<Value = DVec2> {
    (coord(), coord()).prop_map(|(x, y)| DVec2::new(x, y))
}

/// One frame per entry; `None` means the tracked vehicle is absent.
fn presence() -> impl Strategy<Value = Vec<Option<DVec2>>> {
    prop::collection::vec(prop::option::weighted(0.8, point()), 1..40)
}

fn sequence_of(frames: &[Option<DVec2>]) -> SceneSequence {
    SceneSequence::new(
        frames
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut scene = SceneSnapshot::new(i as f64 * 0.1);
                if let Some(p) = p {
                    scene.push_vehicle(Vehicle::car("a", *p, 0.0));
                }
                scene
            })
            .collect(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn bounds_contain_every_vehicle(points in prop::collection::vec(point(), 1..30)) {
        let mut scene = SceneSnapshot::new(0.0);
        for (i, p) in points.iter().enumerate() {
            scene.push_vehicle(Vehicle::car(format!("v{i}"), *p, 0.0));
        }
        let bounds = scene.bounds().unwrap();
        for p in &points {
            prop_assert!(p.x >= bounds.min.x && p.x <= bounds.max.x);
            prop_assert!(p.y >= bounds.min.y && p.y <= bounds.max.y);
        }
        let centroid = scene.centroid().unwrap();
        prop_assert!(centroid.x >= bounds.min.x - 1e-9 && centroid.x <= bounds.max.x + 1e-9);
        prop_assert!(centroid.y >= bounds.min.y - 1e-9 && centroid.y <= bounds.max.y + 1e-9);
    }

    #[test]
    fn trail_is_bounded_and_oldest_first(
        frames in presence(),
        frame in 0usize..50,
        max_len in 0usize..20,
    ) {
        let sequence = sequence_of(&frames);
        let trail = sequence.trail("a", frame, max_len);
        prop_assert!(trail.len() <= max_len);

        // The expected trail is the most recent `max_len` sightings up to
        // `frame`, in frame order.
        let end = frame.min(frames.len() - 1);
        let seen: Vec<DVec2> = frames[..=end].iter().flatten().copied().collect();
        let expected = &seen[seen.len().saturating_sub(max_len)..];
        prop_assert_eq!(trail.as_slice(), expected);
    }
}
