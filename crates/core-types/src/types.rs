// In crates/core-types/src/types.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An opaque external user identifier (the identity provider owns its format).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Parses a user id, rejecting the empty string.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(Error::EmptyUserId);
        }
        Ok(Self(raw))
    }

    /// The last four characters of the id, used for the anonymous
    /// "Trader XXXX" display fallback. Ids come from an external identity
    /// provider, so the slice must land on a char boundary, not a byte offset.
    pub fn last4(&self) -> &str {
        let start = self.0.char_indices().rev().nth(3).map_or(0, |(i, _)| i);
        &self.0[start..]
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A single journaled trade. Immutable once recorded.
///
/// Journal entries arrive with many optional self-reported fields; each is an
/// explicit `Option` here. A missing field excludes the trade from any metric
/// that requires it, and is never treated as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub user_id: UserId,
    /// Signed realized profit/loss.
    pub pnl: Decimal,
    pub executed_at: DateTime<Utc>,
    /// Instrument traded (e.g. "EURUSD").
    pub symbol: Option<String>,
    /// Percent of account risked on the trade.
    pub risk: Option<f64>,
    /// Realized reward measured in multiples of risk taken.
    pub r_factor: Option<f64>,
    /// Whether the user's own trading rules were followed; absent when the
    /// user skipped the question.
    pub rules_followed: Option<bool>,
    /// Self-rated fear/greed state, 0-10.
    pub fear_to_greed: Option<f64>,
    /// Self-rated FOMO level, 0-10.
    pub fomo_rating: Option<f64>,
    /// Self-rated execution quality, 0-10.
    pub execution_rating: Option<f64>,
}

impl Trade {
    /// Creates a trade with all optional journal fields left unset.
    pub fn new(user_id: UserId, pnl: Decimal, executed_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            pnl,
            executed_at,
            symbol: None,
            risk: None,
            r_factor: None,
            rules_followed: None,
            fear_to_greed: None,
            fomo_rating: None,
            execution_rating: None,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    pub fn is_loser(&self) -> bool {
        self.pnl < Decimal::ZERO
    }

    /// The (fear/greed, FOMO, execution) self-ratings, present only when all
    /// three were journaled. A partially rated trade carries no emotion signal.
    pub fn emotion_ratings(&self) -> Option<(f64, f64, f64)> {
        match (self.fear_to_greed, self.fomo_rating, self.execution_rating) {
            (Some(ftg), Some(fomo), Some(execution)) => Some((ftg, fomo, execution)),
            _ => None,
        }
    }
}
