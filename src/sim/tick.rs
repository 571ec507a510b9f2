//! Per-frame simulation tick
//!
//! Advances a playing session by one display refresh: input, physics,
//! spawning, scrolling, scoring, collisions and the win check, in that order.

use super::collision;
use super::spawn::ObstacleGenerator;
use super::state::{GameEvent, GamePhase, Outcome, SessionState};
use crate::audio::AudioCue;
use rand::Rng;

/// Raw key identity, reduced to what the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// Queued player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    PointerDown,
}

/// Advance a playing session by `dt` seconds (already sanitized)
///
/// Inputs are applied first. A jump that lands in the same frame as a fatal
/// collision still moves the actor, but its cue is dropped in favor of the hit.
pub fn tick<R: Rng>(
    state: &mut SessionState,
    spawner: &mut ObstacleGenerator<R>,
    inputs: impl IntoIterator<Item = InputEvent>,
    dt: f32,
) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let Some(mut actor) = state.actor.take() else {
        log::warn!("Playing without an actor");
        return;
    };

    let mut jumps = 0;
    let mut paused = false;
    for input in inputs {
        match input {
            InputEvent::KeyDown(Key::Escape) => {
                paused = true;
                break;
            }
            InputEvent::KeyDown(Key::Other) | InputEvent::PointerDown => {
                actor.apply_impulse();
                jumps += 1;
            }
        }
    }

    let jump_cues = std::iter::repeat_n(GameEvent::Cue(AudioCue::Jump), jumps);
    if paused {
        state.events.extend(jump_cues);
        state.actor = Some(actor);
        state.set_phase(GamePhase::Paused);
        return;
    }

    actor.integrate(dt);

    if let Some(obstacle) =
        spawner.maybe_spawn(&state.obstacles, state.created_count, state.quota)
    {
        state.obstacles.push(obstacle);
        state.created_count += 1;
        log::trace!("Spawned obstacle #{}", state.created_count);
    }

    let shift = state.tuning.speed * dt;
    for obstacle in &mut state.obstacles {
        obstacle.x -= shift;
    }

    // Edge-triggered: each pipe scores once when its trailing edge clears the actor
    for i in 0..state.obstacles.len() {
        let obstacle = &mut state.obstacles[i];
        if obstacle.passed || obstacle.right() >= actor.pos.x {
            continue;
        }
        obstacle.passed = true;
        let score = state.score.on_obstacle_passed();
        state.events.push(GameEvent::Scored { score });
        state.cue(AudioCue::ObstaclePassed);
    }

    let hit = collision::check(&actor, &state.obstacles, state.playfield.height);
    state.actor = Some(actor);
    if hit.is_hit() {
        log::debug!("Collision: {:?}", hit);
        state.cue(AudioCue::Hit);
        state.finish(Outcome::GameOver);
        return;
    }

    state.obstacles.retain(|o| !o.is_offscreen());

    if state.quota_exhausted() && state.obstacles.is_empty() {
        state.cue(AudioCue::Win);
        state.finish(Outcome::Win);
        return;
    }

    state.events.extend(jump_cues);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::{GameMode, Tuning};
    use crate::sim::score::ScoreTracker;
    use crate::sim::state::{Obstacle, Playfield};

    const DT: f32 = 1.0 / 60.0;

    fn playing(quota: Option<u32>) -> (SessionState, ObstacleGenerator) {
        let field = Playfield::new(800.0, 600.0);
        let tuning = Tuning::default();
        let mut state = SessionState::new(
            GameMode::Custom,
            field,
            tuning,
            quota,
            ScoreTracker::new(None),
        );
        state.enter_playing();
        state.events.clear();
        (state, ObstacleGenerator::seeded(5, field, tuning.gap))
    }

    /// Keep the actor parked mid-gap so only scrolling matters
    fn hover(state: &mut SessionState) {
        let actor = state.actor.as_mut().unwrap();
        actor.vel = 0.0;
        actor.gravity = 0.0;
    }

    fn centre_gap(o: &mut Obstacle, height: f32) {
        o.top = height / 2.0 - 130.0;
        o.bottom = height - o.top - 260.0;
    }

    #[test]
    fn test_not_playing_is_noop() {
        let (mut state, mut spawner) = playing(None);
        state.set_phase(GamePhase::Paused);
        let before = state.actor.clone();
        tick(&mut state, &mut spawner, [InputEvent::PointerDown], DT);
        assert_eq!(state.actor, before);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_first_tick_spawns() {
        let (mut state, mut spawner) = playing(None);
        tick(&mut state, &mut spawner, [], DT);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.created_count, 1);
        let expected_x = 800.0 - state.tuning.speed * DT;
        assert!((state.obstacles[0].x - expected_x).abs() < 1e-3);
    }

    #[test]
    fn test_jump_applies_lift_then_integrates() {
        let (mut state, mut spawner) = playing(None);
        tick(&mut state, &mut spawner, [InputEvent::KeyDown(Key::Other)], DT);
        let actor = state.actor.as_ref().unwrap();
        assert!((actor.vel - (LIFT + GRAVITY * DT)).abs() < 1e-3);
        assert!(state.events.contains(&GameEvent::Cue(AudioCue::Jump)));
    }

    #[test]
    fn test_escape_pauses_without_impulse() {
        let (mut state, mut spawner) = playing(None);
        let before = state.actor.clone();
        tick(&mut state, &mut spawner, [InputEvent::KeyDown(Key::Escape)], DT);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.actor, before);
        assert!(state.obstacles.is_empty());
        assert!(!state.events.contains(&GameEvent::Cue(AudioCue::Jump)));
    }

    #[test]
    fn test_score_once_per_obstacle() {
        let (mut state, mut spawner) = playing(Some(1));
        hover(&mut state);
        let height = state.playfield.height;

        for _ in 0..2000 {
            if let Some(o) = state.obstacles.first_mut() {
                centre_gap(o, height);
            }
            tick(&mut state, &mut spawner, [], DT);
            if state.phase != GamePhase::Playing {
                break;
            }
        }

        assert_eq!(state.score.score(), 1);
        let scored = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Scored { .. }))
            .count();
        assert_eq!(scored, 1);
    }

    #[test]
    fn test_win_after_last_obstacle_leaves() {
        let (mut state, mut spawner) = playing(Some(1));
        hover(&mut state);
        let height = state.playfield.height;

        let mut ticks = 0;
        while state.phase == GamePhase::Playing && ticks < 5000 {
            if let Some(o) = state.obstacles.first_mut() {
                centre_gap(o, height);
            }
            tick(&mut state, &mut spawner, [], DT);
            ticks += 1;
        }
        assert_eq!(state.phase, GamePhase::Win);

        // Further ticks do nothing
        for _ in 0..10 {
            tick(&mut state, &mut spawner, [], DT);
        }
        let wins = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Ended { outcome: Outcome::Win, .. }))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(
            state.events.iter().filter(|e| **e == GameEvent::Cue(AudioCue::Win)).count(),
            1
        );
    }

    #[test]
    fn test_unbounded_never_wins() {
        let (mut state, mut spawner) = playing(None);
        hover(&mut state);
        let height = state.playfield.height;
        for _ in 0..3000 {
            for o in &mut state.obstacles {
                centre_gap(o, height);
            }
            tick(&mut state, &mut spawner, [], DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.score.score() > 5);
    }

    #[test]
    fn test_falling_out_is_gameover() {
        let (mut state, mut spawner) = playing(None);
        let mut ticks = 0;
        while state.phase == GamePhase::Playing && ticks < 600 {
            tick(&mut state, &mut spawner, [], DT);
            ticks += 1;
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::Cue(AudioCue::Hit)));
        assert!(state.events.contains(&GameEvent::Ended {
            outcome: Outcome::GameOver,
            score: 0
        }));
    }

    #[test]
    fn test_collision_beats_same_frame_jump() {
        let (mut state, mut spawner) = playing(None);
        let actor = state.actor.as_mut().unwrap();
        // Pinned to the ceiling: even after a jump this frame it is out of bounds
        actor.pos.y = 0.0;

        tick(&mut state, &mut spawner, [InputEvent::PointerDown], DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.events.contains(&GameEvent::Cue(AudioCue::Jump)));
        assert!(state.events.contains(&GameEvent::Cue(AudioCue::Hit)));
    }

    #[test]
    fn test_offscreen_obstacles_removed() {
        let (mut state, mut spawner) = playing(None);
        hover(&mut state);
        state.obstacles.push(Obstacle {
            x: -OBSTACLE_WIDTH + 0.5,
            top: 100.0,
            bottom: 240.0,
            width: OBSTACLE_WIDTH,
            passed: true,
        });
        state.created_count = 1;
        tick(&mut state, &mut spawner, [], DT);
        assert!(state.obstacles.iter().all(|o| !o.is_offscreen()));
        assert!(state.obstacles.iter().all(|o| o.x > 0.0));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_dom("Escape"), Key::Escape);
        assert_eq!(Key::from_dom(" "), Key::Other);
        assert_eq!(Key::from_dom("ArrowUp"), Key::Other);
    }
}
