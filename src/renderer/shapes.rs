//! Shape generation for 2D primitives
//!
//! All coordinates are playfield pixels (origin top-left, y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{SpriteVertex, Vertex, colors};
use crate::sim::{Obstacle, SessionState};

/// Segments used for the actor disc
const ACTOR_SEGMENTS: u32 = 32;
/// Height of the lip drawn at the open end of each pipe segment
const PIPE_LIP_HEIGHT: f32 = 12.0;

/// Geometry for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Flat-colored triangles
    pub shapes: Vec<Vertex>,
    /// Textured quad for the bird image (empty when drawing the disc)
    pub sprite: Vec<SpriteVertex>,
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for an axis-aligned rectangle (empty if degenerate)
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    if max.x <= min.x || max.y <= min.y {
        return Vec::new();
    }

    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for both segments of a pipe
pub fn pipe(obstacle: &Obstacle, playfield_height: f32) -> Vec<Vertex> {
    let left = obstacle.x;
    let right = obstacle.right();
    let bottom_edge = obstacle.bottom_edge(playfield_height);

    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(
        Vec2::new(left, 0.0),
        Vec2::new(right, obstacle.top),
        colors::PIPE,
    ));
    vertices.extend(rect(
        Vec2::new(left, bottom_edge),
        Vec2::new(right, playfield_height),
        colors::PIPE,
    ));

    // Lips are drawn over the segment ends, so the pipe on screen is exactly its hitbox
    let top_lip = (obstacle.top - PIPE_LIP_HEIGHT).max(0.0);
    let bottom_lip = (bottom_edge + PIPE_LIP_HEIGHT).min(playfield_height);
    vertices.extend(rect(
        Vec2::new(left, top_lip),
        Vec2::new(right, obstacle.top),
        colors::PIPE_LIP,
    ));
    vertices.extend(rect(
        Vec2::new(left, bottom_edge),
        Vec2::new(right, bottom_lip),
        colors::PIPE_LIP,
    ));

    vertices
}

/// Square textured quad covering the actor's bounding box
pub fn sprite_quad(center: Vec2, radius: f32) -> Vec<SpriteVertex> {
    let (l, r) = (center.x - radius, center.x + radius);
    let (t, b) = (center.y - radius, center.y + radius);
    vec![
        SpriteVertex::new(l, t, 0.0, 0.0),
        SpriteVertex::new(r, t, 1.0, 0.0),
        SpriteVertex::new(l, b, 0.0, 1.0),
        SpriteVertex::new(l, b, 0.0, 1.0),
        SpriteVertex::new(r, t, 1.0, 0.0),
        SpriteVertex::new(r, b, 1.0, 1.0),
    ]
}

/// Build the full frame for a session
///
/// With `bird_sprite` the actor becomes a textured quad, otherwise a disc.
pub fn scene(state: &SessionState, bird_sprite: bool) -> Scene {
    let height = state.playfield.height;
    let mut scene = Scene::default();

    for obstacle in &state.obstacles {
        scene.shapes.extend(pipe(obstacle, height));
    }
    if let Some(actor) = &state.actor {
        if bird_sprite {
            scene.sprite = sprite_quad(actor.pos, actor.radius);
        } else {
            scene
                .shapes
                .extend(circle(actor.pos, actor.radius, colors::ACTOR, ACTOR_SEGMENTS));
        }
    }

    scene
}
