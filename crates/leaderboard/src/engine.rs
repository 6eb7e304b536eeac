// In crates/leaderboard/src/engine.rs

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use core_types::UserId;
use futures::StreamExt;
use futures::stream;
use store::{DisplayProfile, ProfileStore, StreakStore, TradeStore};

use crate::aggregator::{ACTIVE_WINDOW_DAYS, aggregate};
use crate::error::Result;
use crate::league::League;
use crate::scorer::composite_score;
use crate::streak::streak_rank;
use crate::types::{LeaderboardPage, LeaderboardQuery, UserPerformance};

/// The leaderboard computation pipeline.
///
/// Candidate selection -> per-user aggregation (bounded fan-out) -> composite
/// scoring -> league/streak classification -> stable sort -> pagination.
/// Recomputed from scratch on every request; nothing is cached.
pub struct LeaderboardEngine {
    trades: Arc<dyn TradeStore>,
    profiles: Arc<dyn ProfileStore>,
    streaks: Arc<dyn StreakStore>,
    fan_out_concurrency: usize,
}

impl LeaderboardEngine {
    pub fn new(
        trades: Arc<dyn TradeStore>,
        profiles: Arc<dyn ProfileStore>,
        streaks: Arc<dyn StreakStore>,
        fan_out_concurrency: usize,
    ) -> Self {
        Self {
            trades,
            profiles,
            streaks,
            fan_out_concurrency: fan_out_concurrency.max(1),
        }
    }

    /// Computes one page of the leaderboard as of now.
    pub async fn compute(&self, query: &LeaderboardQuery) -> Result<LeaderboardPage> {
        self.compute_at(query, Utc::now()).await
    }

    /// Computes one page of the leaderboard as of `now`.
    ///
    /// A failed candidate query is fatal. A failed per-user aggregation is
    /// logged and that user dropped; no retries.
    pub async fn compute_at(
        &self,
        query: &LeaderboardQuery,
        now: DateTime<Utc>,
    ) -> Result<LeaderboardPage> {
        let cutoff = now - Duration::days(ACTIVE_WINDOW_DAYS);
        let candidates = self.trades.active_user_ids(cutoff).await?;
        tracing::debug!(candidates = candidates.len(), "Selected active users");

        // Fan out per-user row building; each task carries its candidate
        // index so input order can be restored after the unordered await.
        let mut rows: Vec<(usize, UserPerformance)> = stream::iter(candidates.into_iter().enumerate())
            .map(|(idx, user_id)| async move {
                match self.build_row(&user_id, now).await {
                    Ok(Some(row)) => Some((idx, row)),
                    Ok(None) => None,
                    Err(err) => {
                        tracing::warn!(user_id = %user_id, error = %err, "Dropping user from leaderboard");
                        None
                    }
                }
            })
            .buffer_unordered(self.fan_out_concurrency)
            .filter_map(|row| async move { row })
            .collect()
            .await;

        // Candidate order is the tie-break for the stable sort below.
        rows.sort_by_key(|(idx, _)| *idx);
        let mut users: Vec<UserPerformance> = rows.into_iter().map(|(_, row)| row).collect();

        let sort_by = query.sort_by;
        users.sort_by(|a, b| {
            sort_by
                .value(b)
                .partial_cmp(&sort_by.value(a))
                .unwrap_or(Ordering::Equal)
        });

        let total_users = users.len() as u64;
        let limit = query.limit as u64;
        let total_pages = (total_users.div_ceil(limit)) as u32;
        let start = ((query.page - 1) as usize).saturating_mul(query.limit as usize);
        let page_users: Vec<UserPerformance> = users
            .into_iter()
            .skip(start)
            .take(query.limit as usize)
            .collect();

        Ok(LeaderboardPage {
            users: page_users,
            total_users,
            current_page: query.page,
            total_pages,
            sort_by,
        })
    }

    /// Builds one fully-enriched row, or `None` for a user below the minimum
    /// trade count.
    async fn build_row(&self, user_id: &UserId, now: DateTime<Utc>) -> Result<Option<UserPerformance>> {
        let trades = self.trades.trades_for_user(user_id).await?;
        let Some(metrics) = aggregate(&trades, now) else {
            return Ok(None);
        };

        // An identity lookup failure only degrades this row to the
        // synthesized placeholder; it never drops the user.
        let profile = match self.profiles.display_profile(user_id).await {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "Profile lookup failed, using placeholder");
                DisplayProfile {
                    username: format!("Trader {}", user_id.last4()),
                    image_url: String::new(),
                }
            }
        };

        let current_week_streak = match self.streaks.weekly_streak(user_id).await {
            Ok(weeks) => weeks,
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "Streak lookup failed, defaulting to 0");
                0
            }
        };

        let composite = composite_score(&metrics);
        let placement = League::classify(composite);

        Ok(Some(UserPerformance {
            user_id: user_id.clone(),
            username: profile.username,
            image_url: profile.image_url,
            win_rate: metrics.win_rate,
            consistency: metrics.consistency,
            risk_management: metrics.risk_management,
            total_trades: metrics.total_trades,
            profit_factor: metrics.profit_factor,
            monthly_pnl: metrics.monthly_pnl,
            current_week_streak,
            weekly_active: metrics.weekly_active,
            composite_score: composite,
            league: placement.league,
            league_sub_level: placement.sub_level,
            league_progress: placement.progress,
            league_icon: placement.league.icon(),
            league_color: placement.league.color(),
            weekly_streak_rank: streak_rank(current_week_streak),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SortKey;
    use async_trait::async_trait;
    use core_types::Trade;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use store::MemoryStore;

    fn trade(user: &str, pnl: Decimal, days_ago: i64) -> Trade {
        Trade::new(
            UserId(user.into()),
            pnl,
            Utc::now() - Duration::days(days_ago),
        )
    }

    fn engine_over(store: Arc<MemoryStore>) -> LeaderboardEngine {
        LeaderboardEngine::new(store.clone(), store.clone(), store, 4)
    }

    fn query(page: u32, limit: u32, sort_by: SortKey) -> LeaderboardQuery {
        LeaderboardQuery::new(page, limit, sort_by).unwrap()
    }

    /// Adds `wins` winning and `losses` losing recent trades for `user`.
    fn seed_user(store: &MemoryStore, user: &str, wins: usize, losses: usize) {
        for i in 0..wins {
            store.add_trade(trade(user, dec!(100), i as i64 + 1));
        }
        for i in 0..losses {
            store.add_trade(trade(user, dec!(-50), i as i64 + 1));
        }
    }

    #[tokio::test]
    async fn includes_only_users_with_enough_recent_trades() {
        let store = Arc::new(MemoryStore::new());
        // Qualifies: 6 recent trades.
        seed_user(&store, "alice", 6, 0);
        // Excluded: only 4 trades ever.
        seed_user(&store, "bob", 4, 0);
        // Excluded: plenty of trades, none inside the 90-day window.
        for i in 0..10 {
            store.add_trade(trade("carol", dec!(10), 100 + i));
        }
        // Qualifies: 5 total, one inside the window.
        store.add_trade(trade("dave", dec!(10), 5));
        for i in 0..4 {
            store.add_trade(trade("dave", dec!(10), 200 + i));
        }

        let engine = engine_over(store);
        let page = engine.compute(&query(1, 50, SortKey::Composite)).await.unwrap();

        let ids: Vec<&str> = page.users.iter().map(|u| u.user_id.0.as_str()).collect();
        assert!(ids.contains(&"alice"));
        assert!(ids.contains(&"dave"));
        assert!(!ids.contains(&"bob"));
        assert!(!ids.contains(&"carol"));
        assert_eq!(page.total_users, 2);
    }

    #[tokio::test]
    async fn missing_profile_degrades_to_placeholder() {
        let store = Arc::new(MemoryStore::new());
        seed_user(&store, "user_2xyzw", 6, 0);

        let engine = engine_over(store);
        let page = engine.compute(&query(1, 50, SortKey::Composite)).await.unwrap();

        assert_eq!(page.users[0].username, "Trader xyzw");
        assert_eq!(page.users[0].image_url, "");
    }

    #[tokio::test]
    async fn placeholder_name_survives_multibyte_user_ids() {
        let store = Arc::new(MemoryStore::new());
        seed_user(&store, "aéaaa", 6, 0);

        let engine = engine_over(store);
        let page = engine.compute(&query(1, 50, SortKey::Composite)).await.unwrap();

        assert_eq!(page.users[0].username, "Trader éaaa");
    }

    #[tokio::test]
    async fn known_profile_and_streak_are_used() {
        let store = Arc::new(MemoryStore::new());
        seed_user(&store, "alice", 6, 0);
        store.set_profile(
            UserId("alice".into()),
            DisplayProfile {
                username: "Alice".into(),
                image_url: "https://img.example/alice.png".into(),
            },
        );
        store.set_streak(UserId("alice".into()), 10);

        let engine = engine_over(store);
        let page = engine.compute(&query(1, 50, SortKey::Composite)).await.unwrap();

        let row = &page.users[0];
        assert_eq!(row.username, "Alice");
        assert_eq!(row.current_week_streak, 10);
        assert_eq!(row.weekly_streak_rank, "Streak Master");
        assert_eq!(row.league_icon, row.league.icon());
    }

    #[tokio::test]
    async fn sorts_descending_by_requested_key() {
        let store = Arc::new(MemoryStore::new());
        seed_user(&store, "low", 3, 2); // win rate 60
        seed_user(&store, "high", 4, 1); // win rate 80

        let engine = engine_over(store);
        let page = engine.compute(&query(1, 50, SortKey::WinRate)).await.unwrap();

        assert_eq!(page.users[0].user_id.0, "high");
        assert_eq!(page.users[0].win_rate, 80);
        assert_eq!(page.users[1].win_rate, 60);
    }

    #[tokio::test]
    async fn ties_keep_candidate_order_and_repeat_runs_agree() {
        let store = Arc::new(MemoryStore::new());
        // Identical histories: every sort key ties.
        for user in ["u1", "u2", "u3", "u4"] {
            seed_user(&store, user, 5, 0);
        }

        let engine = engine_over(store);
        let q = query(1, 50, SortKey::Composite);
        let first = engine.compute(&q).await.unwrap();
        let ids: Vec<String> = first.users.iter().map(|u| u.user_id.0.clone()).collect();
        assert_eq!(ids, vec!["u1", "u2", "u3", "u4"]);

        for _ in 0..5 {
            let again = engine.compute(&q).await.unwrap();
            let again_ids: Vec<String> =
                again.users.iter().map(|u| u.user_id.0.clone()).collect();
            assert_eq!(again_ids, ids);
        }
    }

    #[tokio::test]
    async fn pages_concatenate_to_the_full_list() {
        let store = Arc::new(MemoryStore::new());
        for i in 0..7 {
            seed_user(&store, &format!("user{i}"), 5 + i, 0);
        }

        let engine = engine_over(store);
        let first = engine.compute(&query(1, 3, SortKey::TotalTrades)).await.unwrap();
        assert_eq!(first.total_users, 7);
        assert_eq!(first.total_pages, 3);

        let mut seen = Vec::new();
        for page_no in 1..=first.total_pages {
            let page = engine
                .compute(&query(page_no, 3, SortKey::TotalTrades))
                .await
                .unwrap();
            seen.extend(page.users.into_iter().map(|u| u.user_id.0));
        }
        assert_eq!(seen.len(), 7);
        let full = engine.compute(&query(1, 100, SortKey::TotalTrades)).await.unwrap();
        let full_ids: Vec<String> = full.users.into_iter().map(|u| u.user_id.0).collect();
        assert_eq!(seen, full_ids);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_not_an_error() {
        let store = Arc::new(MemoryStore::new());
        seed_user(&store, "alice", 6, 0);

        let engine = engine_over(store);
        let page = engine.compute(&query(5, 50, SortKey::Composite)).await.unwrap();
        assert!(page.users.is_empty());
        assert_eq!(page.total_users, 1);
        assert_eq!(page.total_pages, 1);
    }

    /// Trade store that fails per-user fetches for one chosen user.
    struct FlakyTrades {
        inner: Arc<MemoryStore>,
        poisoned: UserId,
    }

    #[async_trait]
    impl TradeStore for FlakyTrades {
        async fn active_user_ids(&self, cutoff: DateTime<Utc>) -> store::Result<Vec<UserId>> {
            self.inner.active_user_ids(cutoff).await
        }

        async fn trades_for_user(&self, user_id: &UserId) -> store::Result<Vec<Trade>> {
            if user_id == &self.poisoned {
                return Err(store::Error::ProfileNotFound(user_id.0.clone()));
            }
            self.inner.trades_for_user(user_id).await
        }
    }

    #[tokio::test]
    async fn one_failing_user_does_not_abort_the_request() {
        let store = Arc::new(MemoryStore::new());
        seed_user(&store, "alice", 6, 0);
        seed_user(&store, "broken", 6, 0);
        seed_user(&store, "carol", 6, 0);

        let flaky = Arc::new(FlakyTrades {
            inner: store.clone(),
            poisoned: UserId("broken".into()),
        });
        let engine = LeaderboardEngine::new(flaky, store.clone(), store, 4);

        let page = engine.compute(&query(1, 50, SortKey::Composite)).await.unwrap();
        let ids: Vec<&str> = page.users.iter().map(|u| u.user_id.0.as_str()).collect();
        assert_eq!(ids, vec!["alice", "carol"]);
    }
}
