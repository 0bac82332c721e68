//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display refresh, speeds in pixels per tick
//! - Seeded RNG only
//! - Stable iteration order (lane index, then object index)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod lanes;
pub mod motion;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Resolution, resolve};
pub use lanes::generate_lanes;
pub use motion::advance_lanes;
pub use state::{
    Actor, DeathCause, GameEvent, GamePhase, GameState, HazardObject, Lane, LaneKind, VisualTag,
};
pub use tick::{Command, Direction, TickInput, apply_command, game_over, start, step, tick};
