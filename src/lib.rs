//! Flappy Arcade - A Flappy-style browser arcade game
//!
//! Core modules:
//! - `sim`: Game engine (physics, spawning, collisions, scoring, state machine)
//! - `audio`: Cue dispatch to user samples or synthesized tones
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction (storage)
//! - `settings`: Session configuration record
//! - `highscores`: Best-score scalar

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use audio::{AudioCue, AudioCueDispatcher};
pub use highscores::BestScore;
pub use settings::{ConfigError, Difficulty, GameMode, PipeCount, SessionConfig};

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the integrator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Actor defaults
    pub const ACTOR_RADIUS: f32 = 18.0;
    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 1200.0;
    /// Velocity set on jump (negative = up, pixels/s)
    pub const LIFT: f32 = -420.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 70.0;
    /// A new obstacle spawns once the last one is this far in from the right edge
    pub const SPAWN_THRESHOLD: f32 = 250.0;
    /// Minimum top/bottom segment height when placing a gap
    pub const MIN_MARGIN: f32 = 100.0;

    /// Countdown starts at this number
    pub const COUNTDOWN_START: u32 = 3;
    /// Delay between countdown numbers (ms)
    pub const COUNTDOWN_INTERVAL_MS: f64 = 1000.0;
    /// Delay between the last number and play ("GO!") (ms)
    pub const COUNTDOWN_GO_DELAY_MS: f64 = 400.0;
}

/// Sanitize a wall-clock frame delta (seconds) before integration.
///
/// Non-finite and negative values become 0; large gaps (backgrounded tab)
/// are clamped to [`consts::MAX_FRAME_DT`].
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if !dt.is_finite() || dt < 0.0 {
        0.0
    } else {
        dt.min(consts::MAX_FRAME_DT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_dt() {
        assert_eq!(sanitize_dt(0.016), 0.016);
        assert_eq!(sanitize_dt(-1.0), 0.0);
        assert_eq!(sanitize_dt(f32::NAN), 0.0);
        assert_eq!(sanitize_dt(f32::INFINITY), 0.0);
        assert_eq!(sanitize_dt(5.0), consts::MAX_FRAME_DT);
    }
}
