// In crates/store/src/lib.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Trade, UserId};

pub mod error;
pub mod memory;
pub mod postgres;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use postgres::{PgStore, connect};
pub use types::DisplayProfile;

/// Read access to the trade journal.
///
/// The leaderboard core treats this as an external collaborator: a failed
/// candidate query is fatal to the whole request, while a failed per-user
/// fetch only drops that user's row.
#[async_trait]
pub trait TradeStore: Send + Sync {
    /// Distinct ids of users with at least one trade at or after `cutoff`.
    async fn active_user_ids(&self, cutoff: DateTime<Utc>) -> Result<Vec<UserId>>;

    /// A user's full trade history, unbounded in time.
    async fn trades_for_user(&self, user_id: &UserId) -> Result<Vec<Trade>>;
}

/// Display metadata from the identity directory.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the user's display profile. A lookup failure must only
    /// degrade that user's row, never abort the leaderboard.
    async fn display_profile(&self, user_id: &UserId) -> Result<DisplayProfile>;
}

/// Per-user weekly activity streak records.
#[async_trait]
pub trait StreakStore: Send + Sync {
    /// Consecutive weeks with at least one trade. 0 when no record exists.
    async fn weekly_streak(&self, user_id: &UserId) -> Result<u32>;
}
