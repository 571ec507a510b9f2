//! Best score
//!
//! A single scalar persisted to LocalStorage. Only default-mode sessions
//! read it; the engine never writes it back on its own.

use crate::platform::storage;
use crate::settings::GameMode;

/// Best score for default-mode sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore {
    pub value: u32,
}

impl BestScore {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "flappyTopScore";

    pub fn new(value: u32) -> Self {
        Self { value }
    }

    /// Parse a stored value; anything unreadable counts as no best score
    pub fn parse(raw: &str) -> Self {
        let value = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(|v| v.floor().min(u32::MAX as f64) as u32)
            .unwrap_or(0);
        Self { value }
    }

    /// Load the best score for a session (`None` outside default mode)
    pub fn load(mode: GameMode) -> Option<Self> {
        if mode != GameMode::Default {
            return None;
        }

        let best = storage::get_item(Self::STORAGE_KEY)
            .map(|raw| Self::parse(&raw))
            .unwrap_or_default();
        log::info!("Best score: {}", best.value);
        Some(best)
    }

    /// Check if a final score beats this one
    pub fn beaten_by(&self, score: u32) -> bool {
        score > self.value
    }

    /// Record a final score if it is a new best; returns whether it was stored
    pub fn record(&mut self, score: u32) -> bool {
        if !self.beaten_by(score) {
            return false;
        }
        self.value = score;
        storage::set_item(Self::STORAGE_KEY, &score.to_string());
        log::info!("New best score saved: {}", score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(BestScore::parse("12").value, 12);
        assert_eq!(BestScore::parse(" 7 ").value, 7);
        assert_eq!(BestScore::parse("3.8").value, 3);
        assert_eq!(BestScore::parse("abc").value, 0);
        assert_eq!(BestScore::parse("-5").value, 0);
        assert_eq!(BestScore::parse("").value, 0);
    }

    #[test]
    fn test_load_only_in_default_mode() {
        assert_eq!(BestScore::load(GameMode::Custom), None);
        assert_eq!(BestScore::load(GameMode::Default), Some(BestScore::new(0)));
    }

    #[test]
    fn test_record_only_strictly_better() {
        let mut best = BestScore::new(10);
        assert!(!best.record(10));
        assert!(!best.record(4));
        assert_eq!(best.value, 10);
        assert!(best.record(11));
        assert_eq!(best.value, 11);
    }
}
