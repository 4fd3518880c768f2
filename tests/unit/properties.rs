//! Property tests for profile closure, scheduling and limit clamping.

use proptest::prelude::*;

use pnp_motion::config::{clamp_overlap_fraction, RotationLimits};
use pnp_motion::{BlendType, CornerBlendMethod, MachineLimits, Move, Planner, Vec3};

fn roomy_limits() -> MachineLimits {
    MachineLimits::new(Vec3::splat(1.0e6), Vec3::splat(1.0e7), Vec3::splat(1.0e8))
        .with_rotation(RotationLimits::new(1.0e4, 1.0e5, 1.0e6))
}

proptest! {
    #[test]
    fn generated_move_closes_on_destination(
        dx in -500.0f64..500.0,
        dy in -500.0f64..500.0,
        dz in -50.0f64..50.0,
        vel in 1.0f64..500.0,
        acc in 10.0f64..5000.0,
        jerk in 100.0f64..100_000.0,
    ) {
        let dst = Vec3::new(dx, dy, dz);
        prop_assume!(dst.length() > 1e-3);

        let mut mv = Move::linear(Vec3::ZERO, dst, vel, acc, jerk);
        mv.generate(&roomy_limits());

        let segments = mv.segments();
        prop_assert!(segments.len() == 5 || segments.len() == 7);

        let total: f64 = segments.iter().map(|s| s.duration).sum();
        prop_assert!((total - mv.duration).abs() <= 1e-9 * mv.duration.max(1.0));

        let scale = dst.length().max(1.0);
        let end = segments[segments.len() - 1].end_state();
        prop_assert!(end.pos.approx_eq(dst, 1e-6 * scale), "end {} for {}", end.pos, dst);
        prop_assert!(end.vel.length() <= 1e-6 * vel.max(1.0));

        let rise = segments.len() / 2;
        let peak = segments[rise].vel.length();
        prop_assert!(peak <= vel * (1.0 + 1e-9));
    }

    #[test]
    fn overlap_fraction_always_in_range(raw in prop::num::f64::ANY) {
        let clamped = clamp_overlap_fraction(raw);
        prop_assert!((0.01..=1.0).contains(&clamped));
        if (0.01..=1.0).contains(&raw) {
            prop_assert_eq!(clamped, raw);
        }
    }

    #[test]
    fn events_trigger_in_order_within_traverse_time(
        delays in prop::collection::vec(0.0f64..2.0, 1..6),
        overlap in 0.01f64..1.0,
    ) {
        let mut planner = Planner::with_limits(
            roomy_limits()
                .with_corner_blend(CornerBlendMethod::InterpolatedMoves)
                .with_max_overlap_fraction(overlap),
        );
        let targets = [
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        ];
        for (i, delay) in delays.iter().enumerate() {
            planner.add_digital_output(1 << i, 1 << i, *delay).unwrap();
            let dst = targets[i % targets.len()];
            planner.add_move(dst, 10.0, 100.0, 1000.0, BlendType::MinJerk, 0.0).unwrap();
        }
        planner.calculate_moves().unwrap();

        let events = planner.events();
        for pair in events.windows(2) {
            prop_assert!(pair[0].trigger_time <= pair[1].trigger_time);
        }
        for event in events {
            prop_assert!(event.trigger_time <= planner.traverse_time() + 1e-12);
        }

        let moves = planner.moves();
        for pair in moves.windows(2) {
            prop_assert!(pair[1].schedule_time >= pair[0].schedule_time);
            prop_assert!(pair[1].schedule_time <= pair[0].end_time() + 1e-12);
        }
    }
}
