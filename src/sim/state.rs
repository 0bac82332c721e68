//! Game state and core simulation types
//!
//! Everything the per-tick pipeline reads or mutates lives in [`GameState`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::lanes::generate_lanes;
use crate::actor_start;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start command
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for the start command
    GameOver,
}

/// Lane surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneKind {
    /// Vehicles: touching one is fatal
    Road,
    /// Logs: standing on one carries the actor, missing them drowns it
    Water,
}

/// What the renderer should draw for a hazard object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualTag {
    Log,
    /// Vehicle colour variant
    Car(u8),
}

/// A vehicle or log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardObject {
    /// Left edge (pixels)
    pub x: f32,
    pub width: f32,
    pub tag: VisualTag,
}

impl HazardObject {
    /// Right edge (pixels)
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// One horizontal hazard strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Top of the object row (pixels)
    pub y: f32,
    /// Signed horizontal speed (pixels/tick), never zero
    pub speed: f32,
    pub kind: LaneKind,
    pub objects: Vec<HazardObject>,
}

/// The player's token
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner (pixels)
    pub pos: Vec2,
    /// Remaining hop animation ticks (presentation only)
    #[serde(default)]
    pub hop_ticks: u32,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            pos: actor_start(),
            hop_ticks: 0,
        }
    }
}

impl Actor {
    /// Back to the spawn point, no animation in flight
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the hop sprite frame should be shown
    pub fn is_hopping(&self) -> bool {
        self.hop_ticks > 0
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Overlapped a vehicle
    RunOver,
    /// In a water lane with no log underneath
    Drowned,
    /// A log drifted the actor past the playfield edge
    CarriedOff,
    /// Standing beyond the lateral bounds
    OffSide,
}

/// Discrete things that happened during a tick or command, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A session began (from Start or GameOver)
    Started,
    /// The actor made one grid step
    Moved,
    /// The actor reached the far safe zone
    StageCleared { stage: u32, score: u64 },
    /// Terminal condition; fires exactly once per session
    GameOver { cause: DeathCause, score: u64 },
    /// The finished run beat the stored best score
    NewHighScore { score: u64 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Lane generation RNG
    pub rng: Pcg32,
    /// Lane generation parameters
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Current stage (1-based)
    pub stage: u32,
    pub score: u64,
    /// Best score seen, seeded from the score store at startup
    pub high_score: u64,
    /// Simulation tick counter (PLAYING ticks only)
    pub time_ticks: u64,
    pub lanes: Vec<Lane>,
    pub actor: Actor,
    /// Events not yet drained by the host
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session in the START phase
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Start,
            stage: 1,
            score: 0,
            high_score: 0,
            time_ticks: 0,
            lanes: Vec::new(),
            actor: Actor::default(),
            events: Vec::new(),
        };
        // Lanes are visible behind the title overlay too
        state.regenerate_lanes();
        state
    }

    /// Replace the whole lane set for the current stage
    pub fn regenerate_lanes(&mut self) {
        self.lanes = generate_lanes(self.stage, &self.tuning, &mut self.rng);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events in emission order
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pending events without consuming them
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Total hazard objects across all lanes
    pub fn object_count(&self) -> usize {
        self.lanes.iter().map(|l| l.objects.len()).sum()
    }
}
