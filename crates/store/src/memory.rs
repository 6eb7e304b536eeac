// In crates/store/src/memory.rs

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Trade, UserId};

use crate::error::{Error, Result};
use crate::types::DisplayProfile;
use crate::{ProfileStore, StreakStore, TradeStore};

/// An in-memory store backing tests and demo seeding. Not used in production.
#[derive(Debug, Default)]
pub struct MemoryStore {
    trades: RwLock<Vec<Trade>>,
    profiles: RwLock<HashMap<UserId, DisplayProfile>>,
    streaks: RwLock<HashMap<UserId, u32>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_trade(&self, trade: Trade) {
        self.trades.write().unwrap().push(trade);
    }

    pub fn add_trades(&self, trades: impl IntoIterator<Item = Trade>) {
        self.trades.write().unwrap().extend(trades);
    }

    pub fn set_profile(&self, user_id: UserId, profile: DisplayProfile) {
        self.profiles.write().unwrap().insert(user_id, profile);
    }

    pub fn set_streak(&self, user_id: UserId, weeks: u32) {
        self.streaks.write().unwrap().insert(user_id, weeks);
    }
}

#[async_trait]
impl TradeStore for MemoryStore {
    async fn active_user_ids(&self, cutoff: DateTime<Utc>) -> Result<Vec<UserId>> {
        let trades = self.trades.read().unwrap();
        let mut ids = Vec::new();
        for trade in trades.iter() {
            if trade.executed_at >= cutoff && !ids.contains(&trade.user_id) {
                ids.push(trade.user_id.clone());
            }
        }
        Ok(ids)
    }

    async fn trades_for_user(&self, user_id: &UserId) -> Result<Vec<Trade>> {
        let trades = self.trades.read().unwrap();
        Ok(trades
            .iter()
            .filter(|t| &t.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn display_profile(&self, user_id: &UserId) -> Result<DisplayProfile> {
        self.profiles
            .read()
            .unwrap()
            .get(user_id)
            .cloned()
            .ok_or_else(|| Error::ProfileNotFound(user_id.0.clone()))
    }
}

#[async_trait]
impl StreakStore for MemoryStore {
    async fn weekly_streak(&self, user_id: &UserId) -> Result<u32> {
        Ok(self
            .streaks
            .read()
            .unwrap()
            .get(user_id)
            .copied()
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn trade(user: &str, days_ago: i64) -> Trade {
        Trade::new(
            UserId(user.into()),
            dec!(10),
            Utc::now() - Duration::days(days_ago),
        )
    }

    #[tokio::test]
    async fn active_user_ids_respects_cutoff_and_dedupes() {
        let store = MemoryStore::new();
        store.add_trades([trade("a", 1), trade("a", 2), trade("b", 120), trade("c", 30)]);

        let cutoff = Utc::now() - Duration::days(90);
        let ids = store.active_user_ids(cutoff).await.unwrap();
        assert_eq!(ids, vec![UserId("a".into()), UserId("c".into())]);
    }

    #[tokio::test]
    async fn trades_for_user_returns_full_history() {
        let store = MemoryStore::new();
        store.add_trades([trade("a", 1), trade("a", 500), trade("b", 2)]);

        let trades = store.trades_for_user(&UserId("a".into())).await.unwrap();
        assert_eq!(trades.len(), 2);
    }

    #[tokio::test]
    async fn missing_streak_defaults_to_zero() {
        let store = MemoryStore::new();
        store.set_streak(UserId("a".into()), 4);

        assert_eq!(store.weekly_streak(&UserId("a".into())).await.unwrap(), 4);
        assert_eq!(store.weekly_streak(&UserId("b".into())).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_profile_is_an_error() {
        let store = MemoryStore::new();
        let err = store.display_profile(&UserId("ghost".into())).await;
        assert!(matches!(err, Err(Error::ProfileNotFound(_))));
    }
}
