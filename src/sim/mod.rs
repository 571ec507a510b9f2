//! Game engine
//!
//! All gameplay logic lives here. This module has no rendering or platform
//! dependencies:
//! - Frame deltas come from the host, sanitized before integration
//! - Seeded RNG only, injected into the obstacle generator
//! - Input is queued and applied at the start of the next tick

pub mod collision;
pub mod controller;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, check};
pub use controller::{GameLoop, Wake};
pub use score::ScoreTracker;
pub use spawn::ObstacleGenerator;
pub use state::{Actor, GameEvent, GamePhase, Obstacle, Outcome, Playfield, SessionState};
pub use tick::{InputEvent, Key, tick};
