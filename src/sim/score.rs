//! Score tracking
//!
//! Counts cleared obstacles. The best score is read once at session start and
//! only compared against; writing a new best is up to the host.

use crate::highscores::BestScore;
use crate::settings::GameMode;

#[derive(Debug, Clone, Default)]
pub struct ScoreTracker {
    score: u32,
    /// Best score at session start (default mode only)
    best: Option<BestScore>,
}

impl ScoreTracker {
    pub fn new(best: Option<BestScore>) -> Self {
        Self { score: 0, best }
    }

    /// Tracker for a new session, reading the stored best in default mode
    pub fn for_mode(mode: GameMode) -> Self {
        Self::new(BestScore::load(mode))
    }

    /// Count one cleared obstacle; returns the new score
    pub fn on_obstacle_passed(&mut self) -> u32 {
        self.score = self.score.saturating_add(1);
        self.score
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Best score, only tracked in default mode
    pub fn best(&self, mode: GameMode) -> Option<u32> {
        match mode {
            GameMode::Default => self.best.map(|b| b.value),
            GameMode::Custom => None,
        }
    }

    /// Current score beats the best read at session start
    pub fn is_new_best(&self) -> bool {
        self.best.is_some_and(|b| b.beaten_by(self.score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_passes() {
        let mut tracker = ScoreTracker::new(None);
        assert_eq!(tracker.on_obstacle_passed(), 1);
        assert_eq!(tracker.on_obstacle_passed(), 2);
        assert_eq!(tracker.score(), 2);
    }

    #[test]
    fn test_best_only_in_default_mode() {
        let tracker = ScoreTracker::new(Some(BestScore::new(9)));
        assert_eq!(tracker.best(GameMode::Default), Some(9));
        assert_eq!(tracker.best(GameMode::Custom), None);
        assert_eq!(ScoreTracker::for_mode(GameMode::Custom).best(GameMode::Custom), None);
    }

    #[test]
    fn test_new_best() {
        let mut tracker = ScoreTracker::new(Some(BestScore::new(1)));
        tracker.on_obstacle_passed();
        assert!(!tracker.is_new_best());
        tracker.on_obstacle_passed();
        assert!(tracker.is_new_best());

        let mut untracked = ScoreTracker::new(None);
        untracked.on_obstacle_passed();
        assert!(!untracked.is_new_best());
    }
}
