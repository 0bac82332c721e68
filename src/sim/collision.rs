//! Collision and carry resolution
//!
//! Decides, once per tick, what the lanes do to the actor: nothing, carry it
//! along on a log, or end the run. Pure functions over the actor position and
//! the lane set; the tick pipeline applies the result.
//!
//! Check order is fixed so that simultaneous terminal conditions always report
//! the same cause: run over, then drowned, then carried off, then off side.

use glam::Vec2;

use super::state::{DeathCause, HazardObject, Lane, LaneKind};
use crate::consts::*;

/// Axis-aligned box, open on all sides (touching edges do not overlap)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Strict overlap test
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// The actor's bounding box at `pos`
#[inline]
pub fn actor_box(pos: Vec2) -> Aabb {
    Aabb::new(pos, Vec2::splat(ACTOR_SIZE))
}

/// Bounding box of a hazard object drawn in `lane`
#[inline]
pub fn object_box(lane: &Lane, obj: &HazardObject) -> Aabb {
    Aabb::new(Vec2::new(obj.x, lane.y), Vec2::new(obj.width, OBJECT_HEIGHT))
}

/// Whether the actor's vertical centre sits inside the lane's hit-band
///
/// The band is one grid cell tall and starts `LANE_BAND_OFFSET` above the
/// object row, matching the lane's painted strip.
#[inline]
pub fn lane_occupied(actor: Vec2, lane: &Lane) -> bool {
    let centre_y = actor.y + ACTOR_SIZE / 2.0;
    let band_top = lane.y - LANE_BAND_OFFSET;
    centre_y > band_top && centre_y < band_top + GRID
}

/// Whether a log is under the actor's horizontal centre
#[inline]
pub fn log_covers(actor: Vec2, obj: &HazardObject) -> bool {
    let centre_x = actor.x + ACTOR_SIZE / 2.0;
    centre_x > obj.x && centre_x < obj.right()
}

/// Per-tick actor status
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// On solid ground (or a lane with no effect)
    Safe,
    /// Standing on a log; commit `x` as the actor's new horizontal position
    Carried { x: f32, drift: f32 },
    /// Terminal condition
    Dead(DeathCause),
}

/// Resolve the actor against the current lane positions
///
/// Water lanes accumulate independently: the actor is in water if any
/// occupied lane is water, and on a log if any occupied water lane has a log
/// under it. When several logs qualify the highest lane index supplies the
/// drift.
pub fn resolve(actor: Vec2, lanes: &[Lane]) -> Resolution {
    let me = actor_box(actor);
    let mut in_water = false;
    let mut drift: Option<f32> = None;

    for lane in lanes {
        if !lane_occupied(actor, lane) {
            continue;
        }
        match lane.kind {
            LaneKind::Road => {
                if lane.objects.iter().any(|obj| me.overlaps(&object_box(lane, obj))) {
                    return Resolution::Dead(DeathCause::RunOver);
                }
            }
            LaneKind::Water => {
                in_water = true;
                if lane.objects.iter().any(|obj| log_covers(actor, obj)) {
                    drift = Some(lane.speed);
                }
            }
        }
    }

    match drift {
        None if in_water => Resolution::Dead(DeathCause::Drowned),
        Some(drift) => {
            let x = actor.x + drift;
            if !(CARRY_MIN_X..=CARRY_MAX_X).contains(&x) {
                Resolution::Dead(DeathCause::CarriedOff)
            } else {
                Resolution::Carried { x, drift }
            }
        }
        None => {
            // Side bounds only apply off-log; riders are bounded by the carry margin
            if !(SIDE_MIN_X..=SIDE_MAX_X).contains(&actor.x) {
                Resolution::Dead(DeathCause::OffSide)
            } else {
                Resolution::Safe
            }
        }
    }
}
