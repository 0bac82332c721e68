//! Fixed timestep simulation tick
//!
//! Owns the session state machine (START -> PLAYING -> GAMEOVER) and the
//! per-tick pipeline: commands, then motion, then resolution, then commit.

use serde::{Deserialize, Serialize};

use super::collision::{Resolution, resolve};
use super::motion::advance_lanes;
use super::state::{DeathCause, GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::actor_max_y;

/// One grid step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Pixel offset of one step in this direction
    pub fn offset(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -GRID),
            Direction::Down => (0.0, GRID),
            Direction::Left => (-GRID, 0.0),
            Direction::Right => (GRID, 0.0),
        }
    }
}

/// A normalized player command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Begin a session (only honoured outside PLAYING)
    Start,
    /// Hop one grid cell (only honoured while PLAYING)
    Step(Direction),
}

/// Commands queued since the previous tick, applied in order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    for &command in &input.commands {
        apply_command(state, command);
    }

    // Presentation timer runs in every phase so the sprite settles
    state.actor.hop_ticks = state.actor.hop_ticks.saturating_sub(1);

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    if in_top_safe_zone(state.actor.pos.y) {
        complete_stage(state);
        return;
    }

    advance_lanes(&mut state.lanes, WIDTH);

    match resolve(state.actor.pos, &state.lanes) {
        Resolution::Safe => {}
        Resolution::Carried { x, .. } => state.actor.pos.x = x,
        Resolution::Dead(cause) => game_over(state, cause),
    }
}

/// Apply a single command outside the tick pipeline
pub fn apply_command(state: &mut GameState, command: Command) {
    match command {
        Command::Start => start(state),
        Command::Step(direction) => step(state, direction),
    }
}

/// START/GAMEOVER -> PLAYING. Ignored while already playing.
pub fn start(state: &mut GameState) {
    if state.phase == GamePhase::Playing {
        return;
    }
    state.phase = GamePhase::Playing;
    state.score = 0;
    state.stage = 1;
    state.time_ticks = 0;
    state.regenerate_lanes();
    state.actor.reset();
    state.push_event(GameEvent::Started);
    log::info!("Session started (seed {}, best {})", state.seed, state.high_score);
}

/// Move the actor one grid cell. Ignored unless playing.
pub fn step(state: &mut GameState, direction: Direction) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let (dx, dy) = direction.offset();
    let pos = &mut state.actor.pos;
    pos.x = (pos.x + dx).clamp(MOVE_MIN_X, WIDTH);
    pos.y = (pos.y + dy).clamp(0.0, actor_max_y());
    state.actor.hop_ticks = HOP_TICKS;
    state.push_event(GameEvent::Moved);

    if in_top_safe_zone(state.actor.pos.y) {
        complete_stage(state);
    }
}

/// Top row, boundary included
fn in_top_safe_zone(y: f32) -> bool {
    y <= GRID
}

/// PLAYING -> PLAYING with the next stage's layout
fn complete_stage(state: &mut GameState) {
    state.stage += 1;
    state.score += STAGE_BONUS;
    state.regenerate_lanes();
    state.actor.reset();
    state.push_event(GameEvent::StageCleared {
        stage: state.stage,
        score: state.score,
    });
    log::info!("Stage cleared -> stage {} (score {})", state.stage, state.score);
}

/// PLAYING -> GAMEOVER. Fires at most once per session.
pub fn game_over(state: &mut GameState, cause: DeathCause) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.push_event(GameEvent::GameOver {
        cause,
        score: state.score,
    });
    log::info!(
        "Game over: {:?} at stage {} with score {}",
        cause,
        state.stage,
        state.score
    );

    if state.score > state.high_score {
        state.high_score = state.score;
        state.push_event(GameEvent::NewHighScore { score: state.score });
    }
}
