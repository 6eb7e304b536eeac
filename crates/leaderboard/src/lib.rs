// In crates/leaderboard/src/lib.rs

pub mod aggregator;
pub mod engine;
pub mod error;
pub mod league;
pub mod scorer;
pub mod streak;
pub mod types;

// Re-export the most important types for easy access.
pub use engine::LeaderboardEngine;
pub use error::{Error, Result};
pub use league::{League, LeaguePlacement};
pub use types::{LeaderboardPage, LeaderboardQuery, SortKey, UserPerformance};
