//! Game loop controller
//!
//! Owns the session, the obstacle generator and the input queue, and turns
//! host callbacks (animation frames, countdown timers, button presses) into
//! state transitions. The host asks [`GameLoop::next_wake`] what to schedule
//! next and must cancel anything it scheduled before.
//!
//! Every session gets a new generation number. Callbacks carry the generation
//! they were scheduled for, so a stale frame or timer from an earlier session
//! is ignored.

use std::collections::VecDeque;

use super::score::ScoreTracker;
use super::spawn::ObstacleGenerator;
use super::state::{GameEvent, GamePhase, Playfield, SessionState};
use super::tick::{InputEvent, tick};
use crate::audio::AudioCue;
use crate::consts::*;
use crate::sanitize_dt;
use crate::settings::{GameMode, SessionConfig};

/// What the host should schedule next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wake {
    /// Request an animation frame
    Frame,
    /// Set a one-shot timer for this time (ms, same clock as frame timestamps)
    Timer { at_ms: f64 },
    /// Nothing until the player acts
    Idle,
}

pub struct GameLoop {
    state: SessionState,
    spawner: ObstacleGenerator,
    inputs: VecDeque<InputEvent>,
    /// Timestamp of the previous frame; `None` makes the next frame use dt = 0
    last_frame_ms: Option<f64>,
    /// When the next countdown step is due
    countdown_due_ms: Option<f64>,
    generation: u64,
    config: SessionConfig,
}

impl GameLoop {
    /// Start a session in countdown at `now_ms`
    pub fn new(
        config: SessionConfig,
        mode: GameMode,
        playfield: Playfield,
        seed: u64,
        now_ms: f64,
    ) -> Self {
        let score = ScoreTracker::for_mode(mode);
        Self::with_score(config, mode, playfield, seed, now_ms, score)
    }

    /// Start a session with an explicit score tracker
    pub fn with_score(
        config: SessionConfig,
        mode: GameMode,
        playfield: Playfield,
        seed: u64,
        now_ms: f64,
        score: ScoreTracker,
    ) -> Self {
        let tuning = config.tuning();
        let quota = config.quota(mode);
        log::info!(
            "New {} session: gap {}, speed {}, quota {:?}, seed {}",
            mode.as_str(),
            tuning.gap,
            tuning.speed,
            quota,
            seed
        );

        Self {
            state: SessionState::new(mode, playfield, tuning, quota, score),
            spawner: ObstacleGenerator::seeded(seed, playfield, tuning.gap),
            inputs: VecDeque::new(),
            last_frame_ms: None,
            countdown_due_ms: Some(now_ms + COUNTDOWN_INTERVAL_MS),
            generation: 0,
            config,
        }
    }

    /// Throw the session away and start over from the countdown
    pub fn restart(&mut self, seed: u64, now_ms: f64) {
        let mode = self.state.mode;
        let score = ScoreTracker::for_mode(mode);
        self.restart_with_score(seed, now_ms, score);
    }

    /// Restart with an explicit score tracker
    pub fn restart_with_score(&mut self, seed: u64, now_ms: f64, score: ScoreTracker) {
        let generation = self.generation + 1;
        let config = std::mem::take(&mut self.config);
        *self = Self::with_score(
            config,
            self.state.mode,
            self.state.playfield,
            seed,
            now_ms,
            score,
        );
        self.generation = generation;
        self.state.events.push(GameEvent::PhaseChanged(self.state.phase));
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.state.score.score()
    }

    /// Best score for the session (default mode only)
    pub fn best(&self) -> Option<u32> {
        self.state.score.best(self.state.mode)
    }

    /// What the host should schedule after handling a callback
    pub fn next_wake(&self) -> Wake {
        match self.state.phase {
            GamePhase::Playing => Wake::Frame,
            GamePhase::Countdown { .. } => match self.countdown_due_ms {
                Some(at_ms) => Wake::Timer { at_ms },
                None => Wake::Idle,
            },
            GamePhase::Paused | GamePhase::GameOver | GamePhase::Win => Wake::Idle,
        }
    }

    /// Queue player input for the next frame; ignored unless playing
    pub fn push_input(&mut self, input: InputEvent) {
        if self.state.phase == GamePhase::Playing {
            self.inputs.push_back(input);
        } else {
            log::trace!("Ignoring {:?} in {:?}", input, self.state.phase);
        }
    }

    /// Countdown timer fired
    pub fn on_timer(&mut self, generation: u64, now_ms: f64) {
        if generation != self.generation {
            log::debug!("Ignoring stale timer from session {}", generation);
            return;
        }
        let GamePhase::Countdown { remaining } = self.state.phase else {
            return;
        };
        if self.countdown_due_ms.is_none() {
            return;
        }

        if remaining > 0 {
            self.state.cue(AudioCue::CountdownTick { remaining });
            let remaining = remaining - 1;
            self.state.set_phase(GamePhase::Countdown { remaining });
            let delay = if remaining > 0 {
                COUNTDOWN_INTERVAL_MS
            } else {
                COUNTDOWN_GO_DELAY_MS
            };
            self.countdown_due_ms = Some(now_ms + delay);
        } else {
            self.countdown_due_ms = None;
            self.last_frame_ms = None;
            self.inputs.clear();
            self.state.enter_playing();
        }
    }

    /// Animation frame fired; runs one tick while playing
    pub fn frame(&mut self, generation: u64, now_ms: f64) {
        if generation != self.generation {
            log::debug!("Ignoring stale frame from session {}", generation);
            return;
        }
        if self.state.phase != GamePhase::Playing {
            return;
        }

        let dt = match self.last_frame_ms {
            Some(last) => sanitize_dt(((now_ms - last) / 1000.0) as f32),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);

        let inputs: Vec<InputEvent> = self.inputs.drain(..).collect();
        tick(&mut self.state, &mut self.spawner, inputs, dt);
    }

    /// Pause immediately (e.g. tab hidden); only valid while playing
    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.inputs.clear();
            self.state.set_phase(GamePhase::Paused);
        }
    }

    /// Resume a paused session; the next frame measures time from `now_ms`
    pub fn resume(&mut self, now_ms: f64) {
        if self.state.phase == GamePhase::Paused {
            self.inputs.clear();
            self.last_frame_ms = Some(now_ms);
            self.state.set_phase(GamePhase::Playing);
        }
    }

    /// Take pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }
}
