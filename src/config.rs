use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Tunables shared by the bot, the hint analyzer and the execution host.
/// Every field has a default, so a config file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chance of playing a book move when the position is in the book.
    pub book_probability: f64,
    /// Wall-clock budget before the host substitutes a random legal move.
    pub watchdog_ms: u64,
    /// Hint scores within this many centipawns are treated as tied.
    pub hint_tie_delta: i32,
    /// Chance of shuffling the runners-up behind the top hint.
    pub hint_shuffle_probability: f64,
    /// Upper bound of the jitter added to every hint bonus.
    pub hint_jitter: i32,
    /// Half-width of the per-call variety offset applied to hint scores.
    pub hint_variety: i32,
    /// Centipawns per legal move for the side to move.
    pub mobility_weight: i32,
    /// Non-pawn material (minor 3, rook 5, queen 9) at or below which the
    /// king switches to its endgame table.
    pub endgame_material_threshold: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            book_probability: 0.85,
            watchdog_ms: 1200,
            hint_tie_delta: 15,
            hint_shuffle_probability: 0.15,
            hint_jitter: 8,
            hint_variety: 6,
            mobility_weight: 2,
            endgame_material_threshold: 13,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: EngineConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, p) in [
            ("book_probability", self.book_probability),
            ("hint_shuffle_probability", self.hint_shuffle_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(EngineError::InvalidConfig(format!("{name} must be within [0, 1], got {p}")));
            }
        }
        if self.hint_jitter < 0 || self.hint_variety < 0 || self.hint_tie_delta < 0 {
            return Err(EngineError::InvalidConfig("hint jitter, variety and tie delta must be non-negative".into()));
        }
        if self.watchdog_ms == 0 {
            return Err(EngineError::InvalidConfig("watchdog_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn watchdog(&self) -> Duration { Duration::from_millis(self.watchdog_ms) }
}
