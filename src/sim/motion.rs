//! Hazard motion and edge wrap
//!
//! Objects are recycled at the opposite edge once fully off-screen, so a lane's
//! population never changes during a stage.

use super::state::{HazardObject, Lane};

/// Advance every object in every lane by its lane speed, wrapping at the edges
pub fn advance_lanes(lanes: &mut [Lane], field_width: f32) {
    for lane in lanes.iter_mut() {
        let speed = lane.speed;
        for obj in lane.objects.iter_mut() {
            advance_object(obj, speed, field_width);
        }
    }
}

/// Move one object and recycle it if it left the playfield
///
/// After this call `obj.x` lies in `[-obj.width, field_width]`.
#[inline]
pub fn advance_object(obj: &mut HazardObject, speed: f32, field_width: f32) {
    obj.x += speed;
    if speed > 0.0 && obj.x > field_width {
        // Left edge passed the right border: re-enter from the left
        obj.x = -obj.width;
    } else if speed < 0.0 && obj.x < -obj.width {
        // Right edge passed the left border: re-enter from the right
        obj.x = field_width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::WIDTH;
    use crate::sim::state::{LaneKind, VisualTag};
    use proptest::prelude::*;

    fn car(x: f32, width: f32) -> HazardObject {
        HazardObject {
            x,
            width,
            tag: VisualTag::Car(0),
        }
    }

    #[test]
    fn test_rightward_wraps_to_negative_width() {
        let mut obj = car(599.0, 50.0);
        advance_object(&mut obj, 2.0, WIDTH);
        assert_eq!(obj.x, -50.0);
    }

    #[test]
    fn test_rightward_at_edge_stays() {
        let mut obj = car(598.0, 50.0);
        advance_object(&mut obj, 2.0, WIDTH);
        assert_eq!(obj.x, 600.0);
    }

    #[test]
    fn test_leftward_wraps_to_field_width() {
        let mut obj = car(-49.0, 50.0);
        advance_object(&mut obj, -2.0, WIDTH);
        assert_eq!(obj.x, WIDTH);
    }

    #[test]
    fn test_leftward_partially_visible_keeps_moving() {
        let mut obj = car(-40.0, 50.0);
        advance_object(&mut obj, -2.0, WIDTH);
        assert_eq!(obj.x, -42.0);
    }

    #[test]
    fn test_advance_lanes_uses_each_lane_speed() {
        let mut lanes = vec![
            Lane {
                y: 100.0,
                speed: 1.5,
                kind: LaneKind::Road,
                objects: vec![car(10.0, 40.0), car(300.0, 40.0)],
            },
            Lane {
                y: 200.0,
                speed: -3.0,
                kind: LaneKind::Water,
                objects: vec![HazardObject {
                    x: 100.0,
                    width: 90.0,
                    tag: VisualTag::Log,
                }],
            },
        ];
        advance_lanes(&mut lanes, WIDTH);
        assert_eq!(lanes[0].objects[0].x, 11.5);
        assert_eq!(lanes[0].objects[1].x, 301.5);
        assert_eq!(lanes[1].objects[0].x, 97.0);
    }

    proptest! {
        #[test]
        fn prop_positions_stay_in_wrap_range(
            start in 0.0f32..600.0,
            width in 40.0f32..120.0,
            magnitude in 0.5f32..8.0,
            leftward in any::<bool>(),
            ticks in 1usize..2000,
        ) {
            let speed = if leftward { -magnitude } else { magnitude };
            let mut obj = car(start, width);
            for _ in 0..ticks {
                advance_object(&mut obj, speed, WIDTH);
                prop_assert!(obj.x >= -width && obj.x <= WIDTH, "x = {}", obj.x);
            }
        }

        #[test]
        fn prop_population_is_constant(
            counts in proptest::collection::vec(1usize..4, 1..5),
            ticks in 1usize..500,
        ) {
            let mut lanes: Vec<Lane> = counts
                .iter()
                .enumerate()
                .map(|(i, &n)| Lane {
                    y: 100.0 + i as f32 * 100.0,
                    speed: if i % 2 == 0 { 2.5 } else { -2.5 },
                    kind: LaneKind::Road,
                    objects: (0..n).map(|j| car(j as f32 * 150.0, 50.0)).collect(),
                })
                .collect();
            for _ in 0..ticks {
                advance_lanes(&mut lanes, WIDTH);
            }
            let after: Vec<usize> = lanes.iter().map(|l| l.objects.len()).collect();
            prop_assert_eq!(after, counts);
        }
    }
}
