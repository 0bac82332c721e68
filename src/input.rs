//! Input normalization
//!
//! Turns raw key presses and touch gestures into at most one [`Command`] each.
//! There is no key-repeat handling here: one physical event, one hop.

use glam::Vec2;

use crate::sim::{Command, Direction, GamePhase};

/// Minimum touch travel (pixels) for a gesture to count as a swipe
pub const SWIPE_THRESHOLD: f32 = 20.0;

/// Map a key name (as reported by `KeyboardEvent.key`) to a command
pub fn from_key(key: &str, phase: GamePhase) -> Option<Command> {
    let key = key.to_lowercase();
    match phase {
        GamePhase::Playing => {
            let direction = match key.as_str() {
                "arrowup" | "w" => Direction::Up,
                "arrowdown" | "s" => Direction::Down,
                "arrowleft" | "a" => Direction::Left,
                "arrowright" | "d" => Direction::Right,
                _ => return None,
            };
            Some(Command::Step(direction))
        }
        GamePhase::Start | GamePhase::GameOver => match key.as_str() {
            " " | "enter" => Some(Command::Start),
            _ => None,
        },
    }
}

/// Map a completed gesture's displacement to a command
///
/// While playing, the dominant axis picks the direction (ties go vertical).
/// Outside of play a tap starts a session and swipes are ignored.
pub fn from_swipe(delta: Vec2, phase: GamePhase) -> Option<Command> {
    let (abs_x, abs_y) = (delta.x.abs(), delta.y.abs());
    let is_swipe = abs_x.max(abs_y) > SWIPE_THRESHOLD;

    match phase {
        GamePhase::Playing if is_swipe => {
            let direction = if abs_x > abs_y {
                if delta.x > 0.0 {
                    Direction::Right
                } else {
                    Direction::Left
                }
            } else if delta.y > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            };
            Some(Command::Step(direction))
        }
        GamePhase::Playing => None,
        GamePhase::Start | GamePhase::GameOver if !is_swipe => Some(Command::Start),
        GamePhase::Start | GamePhase::GameOver => None,
    }
}

/// Tracks a single touch from start to end
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    origin: Option<Vec2>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Touch went down at `pos`
    pub fn begin(&mut self, pos: Vec2) {
        self.origin = Some(pos);
    }

    /// Touch lifted at `pos`; yields the gesture's command, if any
    pub fn end(&mut self, pos: Vec2, phase: GamePhase) -> Option<Command> {
        let origin = self.origin.take()?;
        from_swipe(pos - origin, phase)
    }

    /// Touch cancelled by the platform
    pub fn cancel(&mut self) {
        self.origin = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.origin.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_and_wasd_keys() {
        let p = GamePhase::Playing;
        assert_eq!(from_key("ArrowUp", p), Some(Command::Step(Direction::Up)));
        assert_eq!(from_key("w", p), Some(Command::Step(Direction::Up)));
        assert_eq!(from_key("S", p), Some(Command::Step(Direction::Down)));
        assert_eq!(from_key("ArrowLeft", p), Some(Command::Step(Direction::Left)));
        assert_eq!(from_key("d", p), Some(Command::Step(Direction::Right)));
        assert_eq!(from_key("x", p), None);
    }

    #[test]
    fn test_start_keys_only_outside_play() {
        assert_eq!(from_key(" ", GamePhase::Start), Some(Command::Start));
        assert_eq!(from_key("Enter", GamePhase::GameOver), Some(Command::Start));
        assert_eq!(from_key(" ", GamePhase::Playing), None);
        assert_eq!(from_key("ArrowUp", GamePhase::GameOver), None);
    }

    #[test]
    fn test_swipe_dominant_axis() {
        let p = GamePhase::Playing;
        assert_eq!(
            from_swipe(Vec2::new(40.0, 10.0), p),
            Some(Command::Step(Direction::Right))
        );
        assert_eq!(
            from_swipe(Vec2::new(-40.0, 39.0), p),
            Some(Command::Step(Direction::Left))
        );
        assert_eq!(
            from_swipe(Vec2::new(5.0, -25.0), p),
            Some(Command::Step(Direction::Up))
        );
        assert_eq!(
            from_swipe(Vec2::new(30.0, 30.0), p),
            Some(Command::Step(Direction::Down))
        );
    }

    #[test]
    fn test_short_swipe_ignored() {
        assert_eq!(from_swipe(Vec2::new(20.0, 0.0), GamePhase::Playing), None);
        assert_eq!(from_swipe(Vec2::new(3.0, -12.0), GamePhase::Playing), None);
    }

    #[test]
    fn test_tap_starts_outside_play() {
        assert_eq!(from_swipe(Vec2::new(2.0, 1.0), GamePhase::Start), Some(Command::Start));
        assert_eq!(from_swipe(Vec2::new(80.0, 0.0), GamePhase::GameOver), None);
    }

    #[test]
    fn test_tracker_one_command_per_touch() {
        let mut tracker = SwipeTracker::new();
        assert_eq!(tracker.end(Vec2::new(50.0, 50.0), GamePhase::Playing), None);

        tracker.begin(Vec2::new(100.0, 100.0));
        assert!(tracker.is_tracking());
        assert_eq!(
            tracker.end(Vec2::new(100.0, 40.0), GamePhase::Playing),
            Some(Command::Step(Direction::Up))
        );
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.end(Vec2::new(100.0, 0.0), GamePhase::Playing), None);

        tracker.begin(Vec2::new(0.0, 0.0));
        tracker.cancel();
        assert_eq!(tracker.end(Vec2::new(90.0, 0.0), GamePhase::Playing), None);
    }
}
