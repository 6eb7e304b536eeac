// In crates/store/src/postgres.rs

use app_config::types::DatabaseSettings;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Trade, UserId};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::error::{Error, Result};
use crate::types::DisplayProfile;
use crate::{ProfileStore, StreakStore, TradeStore};

/// A wrapper around the `sqlx` connection pool.
#[derive(Debug, Clone)]
pub struct PgStore(PgPool);

/// Establishes a connection pool to the PostgreSQL database and runs migrations.
///
/// # Arguments
///
/// * `settings`: The database configuration settings.
///
/// # Returns
///
/// A `Result` containing the `PgStore` wrapper on success, or an `Error` on failure.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgStore> {
    // Create a connection pool.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        // The `?` operator uses the `#[from]` attribute in our error enum
        // to automatically convert the `sqlx::Error` into a `store::Error`.
        .connect(&settings.url)
        .await?;

    // Run database migrations. This ensures the database schema is up-to-date.
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .map_err(Error::from)?;

    Ok(PgStore(pool))
}

fn trade_from_row(row: &PgRow) -> sqlx::Result<Trade> {
    Ok(Trade {
        user_id: UserId(row.try_get("user_id")?),
        pnl: row.try_get::<Decimal, _>("pnl")?,
        executed_at: row.try_get("executed_at")?,
        symbol: row.try_get("symbol")?,
        risk: row.try_get("risk")?,
        r_factor: row.try_get("r_factor")?,
        rules_followed: row.try_get("rules_followed")?,
        fear_to_greed: row.try_get("fear_to_greed")?,
        fomo_rating: row.try_get("fomo_rating")?,
        execution_rating: row.try_get("execution_rating")?,
    })
}

impl PgStore {
    /// Records one journaled trade.
    pub async fn insert_trade(&self, trade: &Trade) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO trades
                (user_id, pnl, executed_at, symbol, risk, r_factor,
                 rules_followed, fear_to_greed, fomo_rating, execution_rating)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&trade.user_id.0)
        .bind(trade.pnl)
        .bind(trade.executed_at)
        .bind(&trade.symbol)
        .bind(trade.risk)
        .bind(trade.r_factor)
        .bind(trade.rules_followed)
        .bind(trade.fear_to_greed)
        .bind(trade.fomo_rating)
        .bind(trade.execution_rating)
        .execute(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        Ok(())
    }

    /// Creates or replaces a user's display profile.
    pub async fn upsert_profile(&self, user_id: &UserId, profile: &DisplayProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, username, image_url)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET username = EXCLUDED.username, image_url = EXCLUDED.image_url
            "#,
        )
        .bind(&user_id.0)
        .bind(&profile.username)
        .bind(&profile.image_url)
        .execute(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        Ok(())
    }

    /// Sets a user's current weekly activity streak.
    pub async fn set_weekly_streak(&self, user_id: &UserId, weeks: u32) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO weekly_streaks (user_id, current_week_streak)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET current_week_streak = EXCLUDED.current_week_streak
            "#,
        )
        .bind(&user_id.0)
        .bind(weeks as i32)
        .execute(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        Ok(())
    }
}

#[async_trait]
impl TradeStore for PgStore {
    async fn active_user_ids(&self, cutoff: DateTime<Utc>) -> Result<Vec<UserId>> {
        let rows = sqlx::query("SELECT DISTINCT user_id FROM trades WHERE executed_at >= $1")
            .bind(cutoff)
            .fetch_all(&self.0)
            .await
            .map_err(Error::OperationFailed)?;

        rows.iter()
            .map(|row| Ok(UserId(row.try_get("user_id").map_err(Error::OperationFailed)?)))
            .collect()
    }

    async fn trades_for_user(&self, user_id: &UserId) -> Result<Vec<Trade>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, pnl, executed_at, symbol, risk, r_factor,
                   rules_followed, fear_to_greed, fomo_rating, execution_rating
            FROM trades
            WHERE user_id = $1
            ORDER BY executed_at
            "#,
        )
        .bind(&user_id.0)
        .fetch_all(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        rows.iter()
            .map(|row| trade_from_row(row).map_err(Error::OperationFailed))
            .collect()
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn display_profile(&self, user_id: &UserId) -> Result<DisplayProfile> {
        let row = sqlx::query("SELECT username, image_url FROM profiles WHERE user_id = $1")
            .bind(&user_id.0)
            .fetch_optional(&self.0)
            .await
            .map_err(Error::OperationFailed)?;

        match row {
            Some(row) => Ok(DisplayProfile {
                username: row.try_get("username").map_err(Error::OperationFailed)?,
                image_url: row.try_get("image_url").map_err(Error::OperationFailed)?,
            }),
            None => Err(Error::ProfileNotFound(user_id.0.clone())),
        }
    }
}

#[async_trait]
impl StreakStore for PgStore {
    async fn weekly_streak(&self, user_id: &UserId) -> Result<u32> {
        let row =
            sqlx::query("SELECT current_week_streak FROM weekly_streaks WHERE user_id = $1")
                .bind(&user_id.0)
                .fetch_optional(&self.0)
                .await
                .map_err(Error::OperationFailed)?;

        // No streak record yet simply means a streak of zero.
        match row {
            Some(row) => {
                let weeks: i32 = row
                    .try_get("current_week_streak")
                    .map_err(Error::OperationFailed)?;
                Ok(weeks.max(0) as u32)
            }
            None => Ok(0),
        }
    }
}
