//! Obstacle generation
//!
//! Pipes spawn at the right edge once the previous one has scrolled far enough
//! in. The gap height is drawn per pipe from an injected RNG.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Obstacle, Playfield};
use crate::consts::*;

pub struct ObstacleGenerator<R: Rng = Pcg32> {
    rng: R,
    playfield: Playfield,
    gap: f32,
}

impl ObstacleGenerator<Pcg32> {
    /// Seeded generator
    pub fn seeded(seed: u64, playfield: Playfield, gap: f32) -> Self {
        Self::new(Pcg32::seed_from_u64(seed), playfield, gap)
    }
}

impl<R: Rng> ObstacleGenerator<R> {
    pub fn new(rng: R, playfield: Playfield, gap: f32) -> Self {
        Self {
            rng,
            playfield,
            gap,
        }
    }

    /// Whether the spawn rule fires for the current obstacle list
    pub fn should_spawn(&self, existing: &[Obstacle]) -> bool {
        match existing.last() {
            None => true,
            Some(last) => last.x < self.playfield.width - SPAWN_THRESHOLD,
        }
    }

    /// Create the next obstacle if the spacing rule fires and quota allows
    pub fn maybe_spawn(
        &mut self,
        existing: &[Obstacle],
        created_count: u32,
        quota: Option<u32>,
    ) -> Option<Obstacle> {
        if quota.is_some_and(|q| created_count >= q) {
            return None;
        }
        if !self.should_spawn(existing) {
            return None;
        }
        Some(self.spawn())
    }

    /// Build an obstacle at the right edge with a random gap position
    fn spawn(&mut self) -> Obstacle {
        let height = self.playfield.height;
        let low = MIN_MARGIN;
        let high = height - self.gap - MIN_MARGIN;

        // Whole pixels keep top + gap + bottom exact
        let top = if high > low {
            self.rng.random_range(low..high).floor()
        } else {
            ((height - self.gap) / 2.0).max(0.0).floor()
        };

        Obstacle {
            x: self.playfield.width,
            top,
            bottom: height - top - self.gap,
            width: OBSTACLE_WIDTH,
            passed: false,
        }
    }
}
