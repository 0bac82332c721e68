//! Fixed-step driver
//!
//! Owns the simulation plus its collaborators. The host feeds it raw input and
//! wall-clock deltas; it runs whole ticks, then routes the resulting events to
//! feedback and persistence. Collaborator failures are logged and dropped here
//! so they can never stall or corrupt the tick loop.

use glam::Vec2;

use crate::audio::{Cue, Feedback};
use crate::consts::*;
use crate::highscores::ScoreStore;
use crate::input::{self, SwipeTracker};
use crate::render::Frame;
use crate::sim::{Command, GameEvent, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Simulation plus collaborators
pub struct Runner<S: ScoreStore, F: Feedback> {
    pub state: GameState,
    input: TickInput,
    swipe: SwipeTracker,
    accumulator: f32,
    store: S,
    feedback: F,
    /// Events from the most recent tick, for HUD/debug consumers
    last_events: Vec<GameEvent>,
}

impl<S: ScoreStore, F: Feedback> Runner<S, F> {
    pub fn new(seed: u64, store: S, feedback: F) -> Self {
        Self::with_tuning(seed, Tuning::default(), store, feedback)
    }

    pub fn with_tuning(seed: u64, tuning: Tuning, store: S, feedback: F) -> Self {
        let mut state = GameState::with_tuning(seed, tuning);
        state.high_score = match store.load() {
            Ok(score) => score,
            Err(e) => {
                log::warn!("Best score unreadable, starting from 0: {}", e);
                0
            }
        };
        Self {
            state,
            input: TickInput::default(),
            swipe: SwipeTracker::new(),
            accumulator: 0.0,
            store,
            feedback,
            last_events: Vec::new(),
        }
    }

    /// Queue an already-normalized command for the next tick
    pub fn queue(&mut self, command: Command) {
        self.input.push(command);
    }

    /// Key press by name. Returns true if it produced a command.
    pub fn key(&mut self, key: &str) -> bool {
        match input::from_key(key, self.state.phase) {
            Some(command) => {
                self.queue(command);
                true
            }
            None => false,
        }
    }

    pub fn touch_start(&mut self, pos: Vec2) {
        self.swipe.begin(pos);
    }

    /// Touch released. Returns true if the gesture produced a command.
    pub fn touch_end(&mut self, pos: Vec2) -> bool {
        match self.swipe.end(pos, self.state.phase) {
            Some(command) => {
                self.queue(command);
                true
            }
            None => false,
        }
    }

    pub fn touch_cancel(&mut self) {
        self.swipe.cancel();
    }

    /// Run as many fixed ticks as `dt` seconds cover. Returns ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step_once();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop time we could not catch up on
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Run exactly `ticks` ticks regardless of wall clock
    pub fn advance(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.step_once();
        }
    }

    fn step_once(&mut self) {
        tick(&mut self.state, &self.input);
        self.input.clear();
        self.dispatch_events();
    }

    fn dispatch_events(&mut self) {
        let events = self.state.drain_events();
        for event in &events {
            if let Some(cue) = Cue::for_event(event) {
                if let Err(e) = self.feedback.cue(cue) {
                    log::warn!("Feedback failed: {}", e);
                }
            }
            if let GameEvent::NewHighScore { score } = event {
                if let Err(e) = self.store.save(*score) {
                    log::warn!("Could not persist best score {}: {}", score, e);
                }
            }
        }
        self.last_events = events;
    }

    /// Events produced by the most recent tick
    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame::capture(&self.state)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{FeedbackError, LogFeedback};
    use crate::highscores::{MemoryStore, StorageError};
    use crate::sim::{DeathCause, Direction, GamePhase, HazardObject, Lane, LaneKind, VisualTag};

    #[derive(Default)]
    struct Recorder {
        cues: Vec<Cue>,
    }

    impl Feedback for Recorder {
        fn cue(&mut self, cue: Cue) -> Result<(), FeedbackError> {
            self.cues.push(cue);
            Ok(())
        }
    }

    struct BrokenFeedback;

    impl Feedback for BrokenFeedback {
        fn cue(&mut self, _cue: Cue) -> Result<(), FeedbackError> {
            Err(FeedbackError::Unavailable)
        }
    }

    #[derive(Default)]
    struct BrokenStore {
        save_attempts: u32,
    }

    impl ScoreStore for BrokenStore {
        fn load(&self) -> Result<u64, StorageError> {
            Err(StorageError::Unavailable("test".to_string()))
        }

        fn save(&mut self, _score: u64) -> Result<(), StorageError> {
            self.save_attempts += 1;
            Err(StorageError::Write("disk full".to_string()))
        }
    }

    fn open_water() -> Vec<Lane> {
        vec![Lane {
            y: 495.0,
            speed: 1.0,
            kind: LaneKind::Water,
            objects: vec![HazardObject {
                x: 400.0,
                width: 80.0,
                tag: VisualTag::Log,
            }],
        }]
    }

    #[test]
    fn test_loads_best_score_on_init() {
        let runner = Runner::new(1, MemoryStore::with_raw("70"), LogFeedback::default());
        assert_eq!(runner.state.high_score, 70);
        assert_eq!(runner.state.phase, GamePhase::Start);
    }

    #[test]
    fn test_start_key_and_cues() {
        let mut runner = Runner::new(2, MemoryStore::new(), Recorder::default());
        assert!(!runner.key("ArrowUp"));
        assert!(runner.key(" "));
        runner.advance(1);
        assert_eq!(runner.state.phase, GamePhase::Playing);
        assert!(runner.key("ArrowLeft"));
        runner.advance(1);
        assert_eq!(runner.feedback().cues, vec![Cue::Start, Cue::Move]);
    }

    #[test]
    fn test_update_runs_fixed_steps() {
        let mut runner = Runner::new(3, MemoryStore::new(), LogFeedback::default());
        runner.queue(Command::Start);
        assert_eq!(runner.update(SIM_DT * 0.5), 0);
        assert_eq!(runner.state.phase, GamePhase::Start);
        assert_eq!(runner.update(SIM_DT * 0.6), 1);
        assert_eq!(runner.state.phase, GamePhase::Playing);
        // Long stalls are capped
        assert_eq!(runner.update(5.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_game_over_persists_improved_score() {
        let mut runner = Runner::new(4, MemoryStore::with_raw("5"), Recorder::default());
        runner.queue(Command::Start);
        runner.advance(1);
        runner.state.score = 30;
        runner.state.lanes = open_water();
        runner.state.actor.pos = Vec2::new(285.0, 510.0);
        runner.advance(1);

        assert_eq!(runner.state.phase, GamePhase::GameOver);
        assert_eq!(runner.store().raw(), Some("30"));
        assert_eq!(runner.feedback().cues.last(), Some(&Cue::Lose));
        assert!(runner.last_events().contains(&GameEvent::GameOver {
            cause: DeathCause::Drowned,
            score: 30
        }));
    }

    #[test]
    fn test_worse_score_not_written() {
        let mut runner = Runner::new(5, MemoryStore::with_raw("100"), LogFeedback::default());
        runner.queue(Command::Start);
        runner.advance(1);
        runner.state.score = 20;
        runner.state.lanes = open_water();
        runner.state.actor.pos = Vec2::new(285.0, 510.0);
        runner.advance(1);
        assert_eq!(runner.state.phase, GamePhase::GameOver);
        assert_eq!(runner.store().raw(), Some("100"));
        assert_eq!(runner.state.high_score, 100);
    }

    #[test]
    fn test_collaborator_failures_do_not_touch_simulation() {
        let mut runner = Runner::new(6, BrokenStore::default(), BrokenFeedback);
        assert_eq!(runner.state.high_score, 0);

        runner.queue(Command::Start);
        runner.advance(1);
        runner.queue(Command::Step(Direction::Right));
        runner.advance(1);
        assert_eq!(runner.state.actor.pos.x, 335.0);

        runner.state.score = 10;
        runner.state.lanes = open_water();
        runner.state.actor.pos = Vec2::new(285.0, 510.0);
        runner.advance(1);
        assert_eq!(runner.state.phase, GamePhase::GameOver);
        assert_eq!(runner.state.high_score, 10);
        assert_eq!(runner.store().save_attempts, 1);

        // Loop keeps going and restart still works
        runner.advance(5);
        assert!(runner.key("Enter"));
        runner.advance(1);
        assert_eq!(runner.state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_swipe_moves_actor() {
        let mut runner = Runner::new(7, MemoryStore::new(), LogFeedback::default());
        runner.touch_start(Vec2::new(10.0, 10.0));
        assert!(runner.touch_end(Vec2::new(12.0, 11.0)));
        runner.advance(1);
        assert_eq!(runner.state.phase, GamePhase::Playing);
        runner.state.lanes.clear();

        runner.touch_start(Vec2::new(200.0, 200.0));
        assert!(runner.touch_end(Vec2::new(200.0, 120.0)));
        runner.advance(1);
        assert_eq!(runner.state.actor.pos.y, 510.0);

        runner.touch_start(Vec2::new(0.0, 0.0));
        runner.touch_cancel();
        assert!(!runner.touch_end(Vec2::new(100.0, 0.0)));
    }
}
