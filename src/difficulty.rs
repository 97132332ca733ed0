use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Bot strength tiers, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Easy,
    Medium,
    Hard,
    Expert,
}

/// Search settings for one tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub name: &'static str,
    pub depth: u32,
    /// Root scores get a uniform perturbation in `[-noise_cp, noise_cp]`.
    pub noise_cp: i32,
    pub mistake_probability: f64,
    /// How many of the top moves a deliberate mistake is drawn from.
    pub mistake_pool: usize,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] =
        [Difficulty::Beginner, Difficulty::Easy, Difficulty::Medium, Difficulty::Hard, Difficulty::Expert];

    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Beginner => DifficultyProfile { name: "beginner", depth: 1, noise_cp: 500, mistake_probability: 0.35, mistake_pool: 6 },
            Difficulty::Easy => DifficultyProfile { name: "easy", depth: 1, noise_cp: 150, mistake_probability: 0.20, mistake_pool: 4 },
            Difficulty::Medium => DifficultyProfile { name: "medium", depth: 2, noise_cp: 60, mistake_probability: 0.10, mistake_pool: 3 },
            Difficulty::Hard => DifficultyProfile { name: "hard", depth: 3, noise_cp: 20, mistake_probability: 0.03, mistake_pool: 2 },
            Difficulty::Expert => DifficultyProfile { name: "expert", depth: 4, noise_cp: 5, mistake_probability: 0.0, mistake_pool: 1 },
        }
    }

    pub fn name(self) -> &'static str { self.profile().name }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Difficulty {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name() == wanted)
            .ok_or_else(|| EngineError::UnknownDifficulty(s.to_string()))
    }
}
