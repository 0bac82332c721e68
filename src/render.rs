//! Rendering collaborators
//!
//! Renderers only ever see a [`Frame`] borrowed from the simulation; nothing
//! here can mutate game state.

use glam::Vec2;

use crate::consts::*;
use crate::sim::{GamePhase, GameState, Lane, LaneKind};

/// Read-only view of everything a frame needs
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub lanes: &'a [Lane],
    pub actor: Vec2,
    pub hopping: bool,
    pub phase: GamePhase,
    pub stage: u32,
    pub score: u64,
    pub high_score: u64,
}

impl<'a> Frame<'a> {
    pub fn capture(state: &'a GameState) -> Self {
        Self {
            lanes: &state.lanes,
            actor: state.actor.pos,
            hopping: state.actor.is_hopping(),
            phase: state.phase,
            stage: state.stage,
            score: state.score,
            high_score: state.high_score,
        }
    }
}

/// Consumer of frames
pub trait Renderer {
    fn draw(&mut self, frame: &Frame<'_>);
}

/// Text renderer: one character per grid cell (native demo, logs)
#[derive(Debug, Default)]
pub struct AsciiRenderer {
    /// Last rendered frame
    pub output: String,
}

impl AsciiRenderer {
    const COLS: usize = (WIDTH / GRID) as usize;
    const ROWS: usize = (HEIGHT / GRID) as usize;

    fn row_of(y: f32) -> Option<usize> {
        let row = (y / GRID).floor();
        (row >= 0.0 && (row as usize) < Self::ROWS).then_some(row as usize)
    }

    /// Columns a horizontal span covers (clipped to the playfield)
    fn cols_of(x: f32, width: f32) -> std::ops::Range<usize> {
        let start = (x / GRID).floor().max(0.0) as usize;
        let end = ((x + width) / GRID).ceil().clamp(0.0, Self::COLS as f32) as usize;
        start.min(end)..end
    }
}

impl Renderer for AsciiRenderer {
    fn draw(&mut self, frame: &Frame<'_>) {
        let mut grid = vec![vec!['.'; Self::COLS]; Self::ROWS];
        // Safe zones
        for row in [0, Self::ROWS - 1] {
            grid[row].fill('=');
        }

        for lane in frame.lanes {
            let Some(row) = Self::row_of(lane.y + OBJECT_HEIGHT / 2.0) else {
                continue;
            };
            let (ground, object) = match lane.kind {
                LaneKind::Water => ('~', '#'),
                LaneKind::Road => ('_', 'C'),
            };
            grid[row].fill(ground);
            for obj in &lane.objects {
                for col in Self::cols_of(obj.x, obj.width) {
                    grid[row][col] = object;
                }
            }
        }

        if let Some(row) = Self::row_of(frame.actor.y + ACTOR_SIZE / 2.0) {
            let col = ((frame.actor.x + ACTOR_SIZE / 2.0) / GRID).floor();
            if col >= 0.0 && (col as usize) < Self::COLS {
                grid[row][col as usize] = if frame.hopping { 'f' } else { 'F' };
            }
        }

        let mut out = format!(
            "stage {}  score {}  best {}  {:?}\n",
            frame.stage, frame.score, frame.high_score, frame.phase
        );
        for row in grid {
            out.extend(row);
            out.push('\n');
        }
        self.output = out;
    }
}
