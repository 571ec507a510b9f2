//! Collision detection
//!
//! Axis-aligned checks between the actor's bounding box and the playfield
//! edges or pipe segments. Any collision ends the session.

use super::state::{Actor, Obstacle};

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionResult {
    None,
    /// Actor crossed the top or bottom edge
    OutOfBounds,
    /// Actor is inside a pipe's horizontal extent but outside its gap
    ObstacleHit,
}

impl CollisionResult {
    pub fn is_hit(&self) -> bool {
        *self != CollisionResult::None
    }
}

/// Actor's top edge above 0 or bottom edge below the playfield
pub fn out_of_bounds(actor: &Actor, playfield_height: f32) -> bool {
    actor.top() < 0.0 || actor.bottom() > playfield_height
}

/// Actor overlaps one of the obstacle's two segments
pub fn hits_obstacle(actor: &Actor, obstacle: &Obstacle, playfield_height: f32) -> bool {
    let overlaps_x = actor.right() > obstacle.x && actor.left() < obstacle.right();
    if !overlaps_x {
        return false;
    }
    actor.top() < obstacle.top || actor.bottom() > obstacle.bottom_edge(playfield_height)
}

/// Check the actor against all obstacles and the playfield bounds
pub fn check(actor: &Actor, obstacles: &[Obstacle], playfield_height: f32) -> CollisionResult {
    if obstacles
        .iter()
        .any(|o| hits_obstacle(actor, o, playfield_height))
    {
        return CollisionResult::ObstacleHit;
    }
    if out_of_bounds(actor, playfield_height) {
        return CollisionResult::OutOfBounds;
    }
    CollisionResult::None
}
