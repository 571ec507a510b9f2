//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`SessionState`]; it is owned by the
//! game loop and handed to each component by reference.

use glam::Vec2;

use super::score::ScoreTracker;
use crate::audio::AudioCue;
use crate::consts::*;
use crate::settings::{GameMode, Tuning};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Counting down before play; `remaining` is the number on screen (0 = "GO!")
    Countdown { remaining: u32 },
    /// Active gameplay
    Playing,
    /// Halted until an explicit resume
    Paused,
    /// Hit an obstacle or left the playfield
    GameOver,
    /// Every obstacle of a bounded session cleared
    Win,
}

impl GamePhase {
    /// Returns true for `GameOver` and `Win`
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Win)
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    GameOver,
    Win,
}

/// Notifications produced by the engine, drained by the host after each callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Play an audio cue
    Cue(AudioCue),
    /// Score changed
    Scored { score: u32 },
    /// Phase transition
    PhaseChanged(GamePhase),
    /// Session reached a terminal state
    Ended { outcome: Outcome, score: u32 },
}

/// Canvas dimensions in pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player-controlled bird
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Center position; x never changes after creation
    pub pos: Vec2,
    /// Vertical velocity (positive = down)
    pub vel: f32,
    pub radius: f32,
    pub gravity: f32,
    pub lift: f32,
}

impl Actor {
    /// Spawn at a quarter of the width, vertically centered, at rest
    pub fn new(playfield: Playfield) -> Self {
        Self {
            pos: Vec2::new(playfield.width / 4.0, playfield.height / 2.0),
            vel: 0.0,
            radius: ACTOR_RADIUS,
            gravity: GRAVITY,
            lift: LIFT,
        }
    }

    /// Semi-implicit Euler step (velocity first, then position)
    pub fn integrate(&mut self, dt: f32) {
        self.vel += self.gravity * dt;
        self.pos.y += self.vel * dt;
    }

    /// Jump: replace the current velocity with lift
    pub fn apply_impulse(&mut self) {
        self.vel = self.lift;
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.radius
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.radius
    }
}

/// A top/bottom pipe pair
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Height of the top segment
    pub top: f32,
    /// Height of the bottom segment
    pub bottom: f32,
    pub width: f32,
    /// Set once the actor has cleared this pipe
    pub passed: bool,
}

impl Obstacle {
    /// Right (trailing) edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Fully scrolled past the left edge of the playfield
    pub fn is_offscreen(&self) -> bool {
        self.right() < 0.0
    }

    /// Y coordinate where the bottom segment starts
    pub fn bottom_edge(&self, playfield_height: f32) -> f32 {
        playfield_height - self.bottom
    }
}

/// All mutable state for one play session
#[derive(Debug, Clone)]
pub struct SessionState {
    pub mode: GameMode,
    pub playfield: Playfield,
    pub tuning: Tuning,
    /// Maximum obstacles to create (`None` = unbounded)
    pub quota: Option<u32>,
    pub phase: GamePhase,
    /// Created on first entry into `Playing`
    pub actor: Option<Actor>,
    /// Active obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    /// Obstacles created so far (including ones already scrolled away)
    pub created_count: u32,
    pub score: ScoreTracker,
    /// Pending notifications for the host
    pub events: Vec<GameEvent>,
}

impl SessionState {
    /// Create a fresh session in countdown
    pub fn new(
        mode: GameMode,
        playfield: Playfield,
        tuning: Tuning,
        quota: Option<u32>,
        score: ScoreTracker,
    ) -> Self {
        Self {
            mode,
            playfield,
            tuning,
            quota,
            phase: GamePhase::Countdown {
                remaining: COUNTDOWN_START,
            },
            actor: None,
            obstacles: Vec::new(),
            created_count: 0,
            score,
            events: Vec::new(),
        }
    }

    /// Change phase and notify
    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::debug!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged(phase));
        }
    }

    /// True once the quota is used up (never for unbounded sessions)
    pub fn quota_exhausted(&self) -> bool {
        self.quota.is_some_and(|q| self.created_count >= q)
    }

    /// Enter `Playing`, creating the actor on first entry
    pub fn enter_playing(&mut self) {
        if self.actor.is_none() {
            self.actor = Some(Actor::new(self.playfield));
        }
        self.set_phase(GamePhase::Playing);
    }

    /// Enter a terminal phase and report the final score
    pub fn finish(&mut self, outcome: Outcome) {
        let phase = match outcome {
            Outcome::GameOver => GamePhase::GameOver,
            Outcome::Win => GamePhase::Win,
        };
        self.set_phase(phase);
        let score = self.score.score();
        log::info!("Session ended: {:?} with score {}", outcome, score);
        self.events.push(GameEvent::Ended { outcome, score });
    }

    pub fn cue(&mut self, cue: AudioCue) {
        self.events.push(GameEvent::Cue(cue));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn playfield() -> Playfield {
        Playfield::new(800.0, 600.0)
    }

    #[test]
    fn test_actor_spawn() {
        let actor = Actor::new(playfield());
        assert_eq!(actor.pos, Vec2::new(200.0, 300.0));
        assert_eq!(actor.vel, 0.0);
        assert_eq!(actor.radius, ACTOR_RADIUS);
    }

    #[test]
    fn test_impulse_overrides_velocity() {
        let mut actor = Actor::new(playfield());
        actor.vel = 900.0;
        actor.apply_impulse();
        assert_eq!(actor.vel, LIFT);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut actor = Actor::new(playfield());
        actor.vel = 123.0;
        let before = actor.clone();
        actor.integrate(0.0);
        assert_eq!(actor, before);
    }

    #[test]
    fn test_integrate_keeps_x() {
        let mut actor = Actor::new(playfield());
        for _ in 0..100 {
            actor.integrate(1.0 / 60.0);
        }
        assert_eq!(actor.pos.x, 200.0);
        assert!(actor.pos.y > 300.0);
    }

    #[test]
    fn test_session_starts_in_countdown() {
        let state = SessionState::new(
            GameMode::Default,
            playfield(),
            Tuning::default(),
            None,
            ScoreTracker::new(None),
        );
        assert_eq!(state.phase, GamePhase::Countdown { remaining: 3 });
        assert!(state.actor.is_none());
        assert!(!state.quota_exhausted());
    }

    #[test]
    fn test_finish_reports_once() {
        let mut state = SessionState::new(
            GameMode::Custom,
            playfield(),
            Tuning::default(),
            Some(1),
            ScoreTracker::new(None),
        );
        state.enter_playing();
        state.events.clear();
        state.finish(Outcome::Win);
        assert_eq!(state.phase, GamePhase::Win);
        assert!(state.phase.is_terminal());
        assert_eq!(
            state.events,
            vec![
                GameEvent::PhaseChanged(GamePhase::Win),
                GameEvent::Ended {
                    outcome: Outcome::Win,
                    score: 0
                },
            ]
        );
    }

    proptest! {
        #[test]
        fn integrate_is_linear_step(
            y in -1000.0f32..1000.0,
            v in -1000.0f32..1000.0,
            dt in 0.0f32..0.1,
        ) {
            let mut actor = Actor::new(playfield());
            actor.pos.y = y;
            actor.vel = v;
            actor.integrate(dt);

            let expected_v = v + GRAVITY * dt;
            let expected_y = y + expected_v * dt;
            prop_assert!((actor.vel - expected_v).abs() < 1e-3);
            prop_assert!((actor.pos.y - expected_y).abs() < 1e-2);
        }
    }
}
