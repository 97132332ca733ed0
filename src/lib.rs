// Bot move selection and coaching hints on top of a cozy-chess backend
pub mod board;
pub mod config;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod hints;
pub mod host;
pub mod openings;
pub mod search;

pub use board::{ChessMove, ChessRules, Position};
pub use config::EngineConfig;
pub use difficulty::{Difficulty, DifficultyProfile};
pub use engine::Engine;
pub use error::EngineError;
pub use hints::{HintCategory, Suggestion};
pub use host::{EngineHost, HostPoll, Outcome, Pending};
