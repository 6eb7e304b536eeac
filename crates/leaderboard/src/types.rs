// In crates/leaderboard/src/types.rs

use core_types::UserId;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::league::League;

/// The field a leaderboard request sorts by. Always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    WinRate,
    Consistency,
    RiskManagement,
    TotalTrades,
    ProfitFactor,
    Streak,
    #[default]
    Composite,
}

impl SortKey {
    /// The value this key extracts from a row for ordering.
    pub fn value(&self, user: &UserPerformance) -> f64 {
        match self {
            Self::WinRate => user.win_rate as f64,
            Self::Consistency => user.consistency as f64,
            Self::RiskManagement => user.risk_management as f64,
            Self::TotalTrades => user.total_trades as f64,
            Self::ProfitFactor => user.profit_factor,
            Self::Streak => user.current_week_streak as f64,
            Self::Composite => user.composite_score,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WinRate => "winRate",
            Self::Consistency => "consistency",
            Self::RiskManagement => "riskManagement",
            Self::TotalTrades => "totalTrades",
            Self::ProfitFactor => "profitFactor",
            Self::Streak => "streak",
            Self::Composite => "composite",
        }
    }
}

/// A validated leaderboard request. Construction is the pagination boundary:
/// out-of-range values are rejected here, before the engine runs.
#[derive(Debug, Clone, Copy)]
pub struct LeaderboardQuery {
    pub page: u32,
    pub limit: u32,
    pub sort_by: SortKey,
}

impl LeaderboardQuery {
    pub const MIN_LIMIT: u32 = 1;
    pub const MAX_LIMIT: u32 = 100;

    pub fn new(page: u32, limit: u32, sort_by: SortKey) -> Result<Self> {
        if page < 1 {
            return Err(Error::InvalidPagination(format!(
                "page must be >= 1, got {page}"
            )));
        }
        if !(Self::MIN_LIMIT..=Self::MAX_LIMIT).contains(&limit) {
            return Err(Error::InvalidPagination(format!(
                "limit must be between {} and {}, got {limit}",
                Self::MIN_LIMIT,
                Self::MAX_LIMIT
            )));
        }
        Ok(Self {
            page,
            limit,
            sort_by,
        })
    }
}

/// One fully-enriched leaderboard row. Ephemeral: built fresh per request,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPerformance {
    pub user_id: UserId,
    pub username: String,
    pub image_url: String,
    pub win_rate: u32,
    pub consistency: u32,
    pub risk_management: u32,
    pub total_trades: u64,
    pub profit_factor: f64,
    pub monthly_pnl: i64,
    pub current_week_streak: u32,
    pub weekly_active: bool,
    pub composite_score: f64,
    pub league: League,
    pub league_sub_level: u8,
    pub league_progress: f64,
    pub league_icon: &'static str,
    pub league_color: &'static str,
    pub weekly_streak_rank: &'static str,
}

/// One page of the computed leaderboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardPage {
    pub users: Vec<UserPerformance>,
    pub total_users: u64,
    pub current_page: u32,
    pub total_pages: u32,
    pub sort_by: SortKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_rejects_out_of_range_pagination() {
        assert!(LeaderboardQuery::new(0, 50, SortKey::Composite).is_err());
        assert!(LeaderboardQuery::new(1, 0, SortKey::Composite).is_err());
        assert!(LeaderboardQuery::new(1, 101, SortKey::Composite).is_err());
        assert!(LeaderboardQuery::new(1, 1, SortKey::Composite).is_ok());
        assert!(LeaderboardQuery::new(1, 100, SortKey::Composite).is_ok());
    }

    #[test]
    fn sort_key_uses_camel_case_wire_names() {
        let key: SortKey = serde_json::from_str("\"winRate\"").unwrap();
        assert_eq!(key, SortKey::WinRate);
        let key: SortKey = serde_json::from_str("\"riskManagement\"").unwrap();
        assert_eq!(key, SortKey::RiskManagement);
        assert!(serde_json::from_str::<SortKey>("\"bogus\"").is_err());
    }

    #[test]
    fn default_sort_key_is_composite() {
        assert_eq!(SortKey::default(), SortKey::Composite);
    }
}
