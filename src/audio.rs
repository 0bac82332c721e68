//! Feedback cues
//!
//! The simulation only knows four cues. On the web they are procedurally
//! generated Web Audio tones - no external files needed. Natively they are
//! logged.

use crate::sim::GameEvent;

/// Feedback cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Actor hopped one cell
    Move,
    /// Stage cleared
    Win,
    /// Run ended
    Lose,
    /// Session started
    Start,
}

impl Cue {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::Started => Some(Cue::Start),
            GameEvent::Moved => Some(Cue::Move),
            GameEvent::StageCleared { .. } => Some(Cue::Win),
            GameEvent::GameOver { .. } => Some(Cue::Lose),
            GameEvent::NewHighScore { .. } => None,
        }
    }
}

/// Failures reported by a [`Feedback`] sink
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("audio backend unavailable")]
    Unavailable,

    #[error("failed to schedule {cue:?}: {details}")]
    Playback { cue: Cue, details: String },
}

/// Fire-and-forget feedback collaborator
pub trait Feedback {
    fn cue(&mut self, cue: Cue) -> Result<(), FeedbackError>;
}

/// Feedback sink that only logs (native builds)
#[derive(Debug, Default)]
pub struct LogFeedback {
    /// Number of cues received
    pub count: u64,
}

impl Feedback for LogFeedback {
    fn cue(&mut self, cue: Cue) -> Result<(), FeedbackError> {
        self.count += 1;
        log::debug!("cue: {:?}", cue);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Cue, Feedback, FeedbackError};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        settings: Settings,
        focused: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                settings: Settings::default(),
                focused: true,
            }
        }

        /// Pick up volume and mute from settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.settings = settings.clone();
        }

        /// Window focus changed
        pub fn set_focused(&mut self, focused: bool) {
            self.focused = focused;
        }

        fn effective_volume(&self) -> f32 {
            self.settings.cue_volume(self.focused)
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Move - short triangle blip falling two octaves
        fn play_move(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
            let (osc, gain) = self.create_osc(ctx, 440.0, OscillatorType::Triangle)?;
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(440.0, t).ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(110.0, t + 0.1)
                .ok()?;
            gain.gain().set_value_at_time(vol * 0.05, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.1)
                .ok()?;

            osc.start_with_when(t).ok()?;
            osc.stop_with_when(t + 0.1).ok()
        }

        /// Win - square arpeggio C5 E5 G5
        fn play_win(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
            let (osc, gain) = self.create_osc(ctx, 523.25, OscillatorType::Square)?;
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(523.25, t).ok()?;
            osc.frequency().set_value_at_time(659.25, t + 0.1).ok()?;
            osc.frequency().set_value_at_time(783.99, t + 0.2).ok()?;
            gain.gain().set_value_at_time(vol * 0.03, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.3)
                .ok()?;

            osc.start_with_when(t).ok()?;
            osc.stop_with_when(t + 0.3).ok()
        }

        /// Lose - sawtooth sliding down, linear fade
        fn play_lose(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
            let (osc, gain) = self.create_osc(ctx, 110.0, OscillatorType::Sawtooth)?;
            let t = ctx.current_time();

            osc.frequency().set_value_at_time(110.0, t).ok()?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.5)
                .ok()?;
            gain.gain().set_value_at_time(vol * 0.05, t).ok()?;
            gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.5).ok()?;

            osc.start_with_when(t).ok()?;
            osc.stop_with_when(t + 0.5).ok()
        }

        /// Start - plain A5 ping
        fn play_start(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
            let (osc, gain) = self.create_osc(ctx, 880.0, OscillatorType::Sine)?;
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.05, t).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.2)
                .ok()?;

            osc.start_with_when(t).ok()?;
            osc.stop_with_when(t + 0.2).ok()
        }
    }

    impl Feedback for AudioManager {
        fn cue(&mut self, cue: Cue) -> Result<(), FeedbackError> {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return Ok(());
            }

            let Some(ctx) = &self.ctx else {
                return Err(FeedbackError::Unavailable);
            };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let played = match cue {
                Cue::Move => self.play_move(ctx, vol),
                Cue::Win => self.play_win(ctx, vol),
                Cue::Lose => self.play_lose(ctx, vol),
                Cue::Start => self.play_start(ctx, vol),
            };

            played.ok_or_else(|| FeedbackError::Playback {
                cue,
                details: "Web Audio node setup failed".to_string(),
            })
        }
    }
}
