//! Lane Hopper - A lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lane motion, collisions, game state)
//! - `input`: Raw key/swipe events to discrete commands
//! - `runner`: Fixed-step driver wiring the simulation to its collaborators
//! - `highscores`: Best-score persistence
//! - `audio`: Feedback cues
//! - `render`: Read-only frame consumers
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod input;
pub mod render;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{MemoryStore, ScoreStore, StorageError};
pub use runner::Runner;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one display refresh at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions (pixels)
    pub const WIDTH: f32 = 600.0;
    pub const HEIGHT: f32 = 600.0;
    /// Grid cell: one discrete move, and the height of each safe zone
    pub const GRID: f32 = 50.0;

    /// Actor bounding box is ACTOR_SIZE square, anchored at its top-left corner
    pub const ACTOR_SIZE: f32 = 30.0;
    /// Hazard objects are drawn (and collide) this tall
    pub const OBJECT_HEIGHT: f32 = 30.0;
    /// Lane hit-band starts this far above the lane's object row
    pub const LANE_BAND_OFFSET: f32 = 10.0;

    /// Left clamp for committed moves (actor may hang partly off-screen)
    pub const MOVE_MIN_X: f32 = -30.0;
    /// Drifting past either of these on a log is fatal
    pub const CARRY_MIN_X: f32 = -30.0;
    pub const CARRY_MAX_X: f32 = WIDTH;
    /// Standing past either of these on solid ground is fatal
    pub const SIDE_MIN_X: f32 = -10.0;
    pub const SIDE_MAX_X: f32 = WIDTH - 20.0;

    /// Score bonus per cleared stage
    pub const STAGE_BONUS: u64 = 10;

    /// Hop animation length (ticks, ~150ms). Presentation only.
    pub const HOP_TICKS: u32 = 9;
}

/// Fixed spawn point of the actor (bottom safe zone, horizontally centred)
#[inline]
pub fn actor_start() -> Vec2 {
    use consts::*;
    Vec2::new(WIDTH / 2.0 - ACTOR_SIZE / 2.0, HEIGHT - GRID + 10.0)
}

/// Lowest y a committed move may reach
#[inline]
pub fn actor_max_y() -> f32 {
    consts::HEIGHT - consts::GRID + 10.0
}
