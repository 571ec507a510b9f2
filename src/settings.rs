//! Session configuration
//!
//! The customization page stores one JSON record in LocalStorage. The engine
//! reads it once per session and never writes it. Malformed values are coerced
//! to safe defaults instead of failing the session.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::platform::storage;

/// Errors raised while reading the settings record.
///
/// These never reach gameplay: the public loaders log them and fall back.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("settings record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pipe count is not a number: {0}")]
    PipeCountNotNumeric(String),
    #[error("pipe count must be positive, got {0}")]
    PipeCountNotPositive(f64),
    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),
}

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Obstacle gap and scroll speed for this preset
    pub fn tuning(&self) -> Tuning {
        match self {
            Difficulty::Easy => Tuning { gap: 380.0, speed: 150.0 },
            Difficulty::Medium => Tuning { gap: 260.0, speed: 210.0 },
            Difficulty::Hard => Tuning { gap: 180.0, speed: 270.0 },
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Per-session obstacle parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Vertical opening between top and bottom segments (pixels)
    pub gap: f32,
    /// Horizontal scroll speed (pixels/s)
    pub speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self { gap: 260.0, speed: 180.0 }
    }
}

/// Which ruleset the session runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Endless pipes, default tuning, best score tracked
    #[default]
    Default,
    /// Configured difficulty and pipe quota, no best score
    Custom,
}

impl GameMode {
    /// Parse the `mode` query parameter; anything unrecognized is `Default`
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("custom") => GameMode::Custom,
            _ => GameMode::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Default => "default",
            GameMode::Custom => "custom",
        }
    }
}

/// Number of obstacles a custom session creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipeCount {
    #[default]
    Unlimited,
    Limited(u32),
}

impl PipeCount {
    /// Strictly parse a stored pipe count (JSON number or numeric string)
    pub fn parse(raw: &Value) -> Result<Self, ConfigError> {
        let n = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        let Some(n) = n.filter(|n| n.is_finite()) else {
            return Err(ConfigError::PipeCountNotNumeric(raw.to_string()));
        };
        if n < 1.0 {
            return Err(ConfigError::PipeCountNotPositive(n));
        }
        Ok(PipeCount::Limited(n.floor().min(u32::MAX as f64) as u32))
    }

    /// Coerce a stored pipe count, falling back instead of failing
    ///
    /// Missing or non-numeric values mean unlimited; non-positive values are
    /// raised to a single pipe.
    pub fn coerce(raw: Option<&Value>) -> Self {
        let Some(raw) = raw.filter(|v| !v.is_null()) else {
            return PipeCount::Unlimited;
        };
        match Self::parse(raw) {
            Ok(count) => count,
            Err(e @ ConfigError::PipeCountNotPositive(_)) => {
                log::warn!("{}, using 1", e);
                PipeCount::Limited(1)
            }
            Err(e) => {
                log::warn!("{}, using unlimited", e);
                PipeCount::Unlimited
            }
        }
    }

    /// Maximum obstacles to create (`None` = unbounded)
    pub fn quota(&self) -> Option<u32> {
        match self {
            PipeCount::Unlimited => None,
            PipeCount::Limited(n) => Some(*n),
        }
    }
}

/// User-recorded sounds (data URLs or any playable source)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomAudio {
    pub jump: Option<String>,
    pub hit: Option<String>,
    pub win: Option<String>,
}

/// Stored layout of the customization record
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    pipe_count: Option<Value>,
    #[serde(default)]
    jump_sound: Option<String>,
    #[serde(default)]
    hit_sound: Option<String>,
    #[serde(default)]
    win_sound: Option<String>,
}

/// Read-only session configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionConfig {
    /// Display name for the bird
    pub bird_name: Option<String>,
    /// Bird image source
    pub bird_sprite: Option<String>,
    /// `None` when unset or unrecognized
    pub difficulty: Option<Difficulty>,
    pub pipe_count: PipeCount,
    pub custom_audio: CustomAudio,
}

/// Empty strings count as "not set"
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl SessionConfig {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "flappyCustom";

    /// Parse a stored record; only invalid JSON is an error
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let record: StoredRecord = serde_json::from_str(json)?;

        let difficulty = record.difficulty.as_deref().and_then(|d| {
            d.parse::<Difficulty>()
                .inspect_err(|e| log::warn!("{}, using default tuning", e))
                .ok()
        });

        Ok(Self {
            bird_name: non_empty(record.name),
            bird_sprite: non_empty(record.image),
            difficulty,
            pipe_count: PipeCount::coerce(record.pipe_count.as_ref()),
            custom_audio: CustomAudio {
                jump: non_empty(record.jump_sound),
                hit: non_empty(record.hit_sound),
                win: non_empty(record.win_sound),
            },
        })
    }

    /// Load the record from storage, falling back to defaults
    pub fn load() -> Self {
        let Some(json) = storage::get_item(Self::STORAGE_KEY) else {
            log::info!("No customization found, using defaults");
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(config) => {
                log::info!(
                    "Loaded customization (difficulty: {}, pipes: {:?})",
                    config.difficulty.map(|d| d.as_str()).unwrap_or("unset"),
                    config.pipe_count
                );
                config
            }
            Err(e) => {
                log::warn!("Ignoring customization: {}", e);
                Self::default()
            }
        }
    }

    /// Gap/speed for a session; the chosen preset applies in either mode
    pub fn tuning(&self) -> Tuning {
        self.difficulty.map(|d| d.tuning()).unwrap_or_default()
    }

    /// Obstacle quota for a session in the given mode (`None` = unbounded)
    pub fn quota(&self, mode: GameMode) -> Option<u32> {
        match mode {
            GameMode::Default => None,
            GameMode::Custom => self.pipe_count.quota(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_difficulty_presets() {
        assert_eq!(Difficulty::Easy.tuning(), Tuning { gap: 380.0, speed: 150.0 });
        assert_eq!(Difficulty::Medium.tuning(), Tuning { gap: 260.0, speed: 210.0 });
        assert_eq!(Difficulty::Hard.tuning(), Tuning { gap: 180.0, speed: 270.0 });
        assert_eq!(Tuning::default(), Tuning { gap: 260.0, speed: 180.0 });
    }

    #[test]
    fn test_stored_difficulty_sets_tuning() {
        let config = SessionConfig::from_json(r#"{"difficulty":"hard"}"#).unwrap();
        assert_eq!(config.tuning(), Difficulty::Hard.tuning());
        assert_eq!(config.tuning(), Tuning { gap: 180.0, speed: 270.0 });

        let unset = SessionConfig::default();
        assert_eq!(unset.tuning(), Tuning { gap: 260.0, speed: 180.0 });
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" Easy ".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert!(matches!(
            "nightmare".parse::<Difficulty>(),
            Err(ConfigError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_parse_full_record() {
        let json = r#"{
            "name": "Tweety",
            "image": "data:image/png;base64,AAAA",
            "difficulty": "hard",
            "pipeCount": 3,
            "jumpSound": "data:audio/webm;base64,BBBB",
            "hitSound": null,
            "winSound": ""
        }"#;
        let config = SessionConfig::from_json(json).unwrap();
        assert_eq!(config.bird_name.as_deref(), Some("Tweety"));
        assert!(config.bird_sprite.is_some());
        assert_eq!(config.difficulty, Some(Difficulty::Hard));
        assert_eq!(config.pipe_count, PipeCount::Limited(3));
        assert!(config.custom_audio.jump.is_some());
        assert_eq!(config.custom_audio.hit, None);
        assert_eq!(config.custom_audio.win, None);
        assert_eq!(config.quota(GameMode::Custom), Some(3));
        assert_eq!(config.quota(GameMode::Default), None);
    }

    #[test]
    fn test_unknown_difficulty_is_unset() {
        let config = SessionConfig::from_json(r#"{"difficulty": "nightmare"}"#).unwrap();
        assert_eq!(config.difficulty, None);
        assert_eq!(config.tuning(), Tuning::default());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            SessionConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_pipe_count_coercion() {
        assert_eq!(PipeCount::coerce(None), PipeCount::Unlimited);
        assert_eq!(PipeCount::coerce(Some(&Value::Null)), PipeCount::Unlimited);
        assert_eq!(PipeCount::coerce(Some(&json!(5))), PipeCount::Limited(5));
        assert_eq!(PipeCount::coerce(Some(&json!("7"))), PipeCount::Limited(7));
        assert_eq!(PipeCount::coerce(Some(&json!(2.9))), PipeCount::Limited(2));
        assert_eq!(PipeCount::coerce(Some(&json!(0))), PipeCount::Limited(1));
        assert_eq!(PipeCount::coerce(Some(&json!(-4))), PipeCount::Limited(1));
        assert_eq!(PipeCount::coerce(Some(&json!("lots"))), PipeCount::Unlimited);
        assert_eq!(PipeCount::coerce(Some(&json!(true))), PipeCount::Unlimited);
    }

    #[test]
    fn test_pipe_count_parse_errors() {
        assert!(matches!(
            PipeCount::parse(&json!("abc")),
            Err(ConfigError::PipeCountNotNumeric(_))
        ));
        assert!(matches!(
            PipeCount::parse(&json!(0)),
            Err(ConfigError::PipeCountNotPositive(_))
        ));
    }

    #[test]
    fn test_mode_from_query() {
        assert_eq!(GameMode::from_query(Some("custom")), GameMode::Custom);
        assert_eq!(GameMode::from_query(Some("default")), GameMode::Default);
        assert_eq!(GameMode::from_query(Some("weird")), GameMode::Default);
        assert_eq!(GameMode::from_query(None), GameMode::Default);
    }

    #[test]
    fn test_load_without_storage_uses_defaults() {
        assert_eq!(SessionConfig::load(), SessionConfig::default());
    }
}
