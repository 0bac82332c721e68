//! Stage layout generation
//!
//! Builds the lane set for a stage from the seeded RNG. Layouts are random per
//! call, not a function of the stage number; only the speed range scales with
//! stage.

use rand::Rng;

use super::state::{HazardObject, Lane, LaneKind, VisualTag};
use crate::consts::*;
use crate::tuning::Tuning;

/// Generate the full lane set for `stage`
///
/// Lanes are spread evenly over the band between the two safe zones. Direction
/// alternates by lane index: even lanes move right, odd lanes move left.
pub fn generate_lanes<R: Rng>(stage: u32, tuning: &Tuning, rng: &mut R) -> Vec<Lane> {
    let lane_count = rng.random_range(tuning.min_lanes..=tuning.max_lanes.max(tuning.min_lanes));
    let lane_count = lane_count.max(1);
    let band_height = HEIGHT - 2.0 * GRID;
    let spacing = band_height / lane_count as f32;
    let (speed_lo, speed_hi) = tuning.speed_range(stage);

    let lanes: Vec<Lane> = (0..lane_count)
        .map(|i| {
            let y = GRID + i as f32 * spacing + (spacing - GRID) / 2.0;
            let magnitude = if speed_hi > speed_lo {
                rng.random_range(speed_lo..speed_hi)
            } else {
                speed_lo
            };
            let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
            let kind = if rng.random_bool(tuning.water_chance.clamp(0.0, 1.0)) {
                LaneKind::Water
            } else {
                LaneKind::Road
            };

            let object_count =
                rng.random_range(tuning.min_objects..=tuning.max_objects.max(tuning.min_objects));
            let objects = (0..object_count)
                .map(|_| spawn_object(kind, tuning, rng))
                .collect();

            Lane {
                y,
                speed: magnitude * direction,
                kind,
                objects,
            }
        })
        .collect();

    log::debug!(
        "Stage {} layout: {} lanes ({} water), speed {:.2}..{:.2}",
        stage,
        lanes.len(),
        lanes.iter().filter(|l| l.kind == LaneKind::Water).count(),
        speed_lo,
        speed_hi
    );

    lanes
}

fn spawn_object<R: Rng>(kind: LaneKind, tuning: &Tuning, rng: &mut R) -> HazardObject {
    let x = rng.random_range(0.0..WIDTH);
    match kind {
        LaneKind::Water => HazardObject {
            x,
            width: tuning.log_min_width + rng.random::<f32>() * tuning.log_width_spread,
            tag: VisualTag::Log,
        },
        LaneKind::Road => HazardObject {
            x,
            width: tuning.car_min_width + rng.random::<f32>() * tuning.car_width_spread,
            tag: VisualTag::Car(rng.random_range(0..tuning.car_variants.max(1))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_lane_shape_within_bounds() {
        let tuning = Tuning::default();
        for seed in 0..200 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let lanes = generate_lanes(1, &tuning, &mut rng);
            assert!((3..=4).contains(&lanes.len()), "seed {seed}");
            for lane in &lanes {
                assert!((2..=3).contains(&lane.objects.len()));
                assert!(lane.speed != 0.0);
                for obj in &lane.objects {
                    assert!(obj.x >= 0.0 && obj.x < WIDTH);
                    match lane.kind {
                        LaneKind::Water => {
                            assert!(obj.width >= 80.0 && obj.width <= 120.0);
                            assert_eq!(obj.tag, VisualTag::Log);
                        }
                        LaneKind::Road => {
                            assert!(obj.width >= 40.0 && obj.width <= 70.0);
                            assert!(matches!(obj.tag, VisualTag::Car(c) if c < 5));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_directions_alternate_by_index() {
        let mut rng = Pcg32::seed_from_u64(42);
        let lanes = generate_lanes(3, &Tuning::default(), &mut rng);
        for (i, lane) in lanes.iter().enumerate() {
            if i % 2 == 0 {
                assert!(lane.speed > 0.0);
            } else {
                assert!(lane.speed < 0.0);
            }
        }
    }

    #[test]
    fn test_lanes_sit_between_safe_zones() {
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..50 {
            let lanes = generate_lanes(1, &Tuning::default(), &mut rng);
            let spacing = (HEIGHT - 2.0 * GRID) / lanes.len() as f32;
            for (i, lane) in lanes.iter().enumerate() {
                let expected = GRID + i as f32 * spacing + (spacing - GRID) / 2.0;
                assert!((lane.y - expected).abs() < 1e-4);
                assert!(lane.y - LANE_BAND_OFFSET >= GRID);
                assert!(lane.y + OBJECT_HEIGHT <= HEIGHT - GRID);
            }
        }
    }

    #[test]
    fn test_speed_scales_with_stage() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        for stage in [1, 10, 40] {
            let (lo, hi) = tuning.speed_range(stage);
            for lane in generate_lanes(stage, &tuning, &mut rng) {
                let magnitude = lane.speed.abs();
                assert!(magnitude >= lo && magnitude < hi, "stage {stage}: {magnitude}");
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let tuning = Tuning::default();
        let a = generate_lanes(2, &tuning, &mut Pcg32::seed_from_u64(1234));
        let b = generate_lanes(2, &tuning, &mut Pcg32::seed_from_u64(1234));
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_tuning_still_produces_lanes() {
        let tuning = Tuning {
            min_lanes: 2,
            max_lanes: 2,
            min_objects: 1,
            max_objects: 1,
            speed_spread: 0.0,
            water_chance: 1.0,
            ..Tuning::default()
        };
        let lanes = generate_lanes(1, &tuning, &mut Pcg32::seed_from_u64(5));
        assert_eq!(lanes.len(), 2);
        assert!(lanes.iter().all(|l| l.kind == LaneKind::Water && l.objects.len() == 1));
        assert!((lanes[0].speed - 1.35).abs() < 1e-5);
        assert!((lanes[1].speed + 1.35).abs() < 1e-5);
    }
}
