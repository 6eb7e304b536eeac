// In crates/web-server/src/types.rs

use leaderboard::{LeaderboardQuery, SortKey};
use serde::Deserialize;

use crate::error::Result;

/// Represents the leaderboard query parameters from the URL
/// (e.g., ?page=2&limit=50&sortBy=winRate).
#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    // `serde(default = ...)` provides a default value if the param is missing.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Absent means "use the configured page size", so the settings default is
    /// filled in at validation time rather than baked in here.
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(rename = "sortBy", default)]
    pub sort_by: SortKey,
}

impl LeaderboardParams {
    /// Range-checks the pagination parameters before the core runs, filling a
    /// missing limit with the configured default page size.
    pub fn validate(self, default_limit: u32) -> Result<LeaderboardQuery> {
        let limit = self.limit.unwrap_or(default_limit);
        Ok(LeaderboardQuery::new(self.page, limit, self.sort_by)?)
    }
}

// Helper function for serde defaults.
fn default_page() -> u32 {
    1
}
