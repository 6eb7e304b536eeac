// In crates/leaderboard/src/aggregator.rs

use chrono::{DateTime, Duration, Utc};
use core_types::Trade;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Users below this trade count are excluded from the leaderboard entirely.
pub const MIN_TRADES: usize = 5;
/// Candidate-selection window: a user must have traded within this window.
pub const ACTIVE_WINDOW_DAYS: i64 = 90;

const MONTHLY_WINDOW_DAYS: i64 = 30;
const WEEKLY_WINDOW_DAYS: i64 = 7;

/// Profit-factor sentinel for a history with gains and no losses.
const PROFIT_FACTOR_CAP: f64 = 99.0;
/// Score used when none of a blend's sub-factors have qualifying data.
const NEUTRAL_SCORE: u32 = 50;

/// The raw per-user metrics reduced from a full trade history.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMetrics {
    pub total_trades: u64,
    /// Percent of trades with positive pnl, rounded to an integer.
    pub win_rate: u32,
    /// Gross gains over gross losses, 2 decimal places; 99 when lossless.
    pub profit_factor: f64,
    /// Sum of pnl over the trailing 30 days, rounded to a whole unit.
    pub monthly_pnl: i64,
    pub consistency: u32,
    pub risk_management: u32,
    /// At least one trade in the trailing 7 days.
    pub weekly_active: bool,
}

/// Reduces a user's full trade history into `RawMetrics`.
///
/// Returns `None` when the user has fewer than [`MIN_TRADES`] trades; callers
/// filter those users out after this stage rather than skipping them before it.
pub fn aggregate(trades: &[Trade], now: DateTime<Utc>) -> Option<RawMetrics> {
    if trades.len() < MIN_TRADES {
        return None;
    }

    let total = trades.len();
    let wins = trades.iter().filter(|t| t.is_winner()).count();
    let win_rate = (100.0 * wins as f64 / total as f64).round() as u32;

    let monthly_cutoff = now - Duration::days(MONTHLY_WINDOW_DAYS);
    let monthly_pnl: Decimal = trades
        .iter()
        .filter(|t| t.executed_at >= monthly_cutoff)
        .map(|t| t.pnl)
        .sum();
    let monthly_pnl = monthly_pnl.round().to_i64().unwrap_or(0);

    let weekly_cutoff = now - Duration::days(WEEKLY_WINDOW_DAYS);
    let weekly_active = trades.iter().any(|t| t.executed_at >= weekly_cutoff);

    Some(RawMetrics {
        total_trades: total as u64,
        win_rate,
        profit_factor: profit_factor(trades),
        monthly_pnl,
        consistency: consistency_score(trades),
        risk_management: risk_management_score(trades),
        weekly_active,
    })
}

/// Gross gains divided by absolute gross losses, rounded to 2 decimals.
/// A lossless but profitable history gets the capped sentinel 99; a history
/// with neither gains nor losses gets 0.
pub fn profit_factor(trades: &[Trade]) -> f64 {
    let gains: Decimal = trades.iter().filter(|t| t.is_winner()).map(|t| t.pnl).sum();
    let losses: Decimal = trades
        .iter()
        .filter(|t| t.is_loser())
        .map(|t| t.pnl)
        .sum::<Decimal>()
        .abs();

    if losses > Decimal::ZERO {
        let ratio = (gains / losses).to_f64().unwrap_or(0.0);
        (ratio * 100.0).round() / 100.0
    } else if gains > Decimal::ZERO {
        PROFIT_FACTOR_CAP
    } else {
        0.0
    }
}

/// Weighted blend of rules adherence (0.4), risk sizing consistency (0.3),
/// and emotional control (0.3).
///
/// A sub-factor without qualifying data is dropped and the remaining weights
/// are deliberately NOT rescaled to sum to 1; rescaling would change every
/// observable score. With no qualifying factor at all the score is a neutral 50.
pub fn consistency_score(trades: &[Trade]) -> u32 {
    let total = trades.len() as f64;
    let mut score = 0.0;
    let mut any_factor = false;

    // Rules-followed: share of ALL trades journaled as rule-abiding. Only
    // qualifies once the user has answered the question at least once.
    if trades.iter().any(|t| t.rules_followed.is_some()) {
        let followed = trades
            .iter()
            .filter(|t| t.rules_followed == Some(true))
            .count();
        score += 0.4 * (100.0 * followed as f64 / total);
        any_factor = true;
    }

    // Risk sizing consistency: penalize spread in position risk.
    let risks: Vec<f64> = trades
        .iter()
        .filter_map(|t| t.risk)
        .filter(|r| *r > 0.0)
        .collect();
    if risks.len() >= 2 {
        let spread_penalty = 10.0 * population_std_dev(&risks);
        score += 0.3 * (100.0 - spread_penalty).max(0.0);
        any_factor = true;
    }

    // Emotional control: trades with all three self-ratings journaled.
    let emotion_scores: Vec<f64> = trades
        .iter()
        .filter_map(|t| {
            let (ftg, fomo, execution) = t.emotion_ratings()?;
            // Balanced fear/greed sits at 5.5, healthy FOMO at 3.
            let fear_greed_score = (10.0 - (ftg - 5.5).abs()).max(0.0);
            let fomo_score = (10.0 - (fomo - 3.0).abs()).max(0.0);
            Some((fear_greed_score + fomo_score + execution) / 3.0 * 10.0)
        })
        .collect();
    if !emotion_scores.is_empty() {
        score += 0.3 * mean(&emotion_scores);
        any_factor = true;
    }

    if !any_factor {
        return NEUTRAL_SCORE;
    }
    score.round() as u32
}

/// Weighted blend of average risk sizing (0.4), realized R-factor (0.3), and
/// stop-loss discipline (0.3). Same drop-missing / no-renormalize / neutral-50
/// policy as [`consistency_score`].
pub fn risk_management_score(trades: &[Trade]) -> u32 {
    let mut score = 0.0;
    let mut any_factor = false;

    // Average risk per trade, mapped through sizing bands (tightest first).
    let risks: Vec<f64> = trades
        .iter()
        .filter_map(|t| t.risk)
        .filter(|r| *r > 0.0)
        .collect();
    if !risks.is_empty() {
        let avg = mean(&risks);
        let band = if (1.0..=2.0).contains(&avg) {
            100.0
        } else if (0.5..=3.0).contains(&avg) {
            80.0
        } else if (0.1..=5.0).contains(&avg) {
            60.0
        } else {
            40.0
        };
        score += 0.4 * band;
        any_factor = true;
    }

    // Average realized reward multiple.
    let r_factors: Vec<f64> = trades
        .iter()
        .filter_map(|t| t.r_factor)
        .filter(|r| *r > 0.0)
        .collect();
    if !r_factors.is_empty() {
        let avg = mean(&r_factors);
        let band = if avg >= 2.0 {
            100.0
        } else if avg >= 1.5 {
            80.0
        } else if avg >= 1.0 {
            60.0
        } else {
            40.0
        };
        score += 0.3 * band;
        any_factor = true;
    }

    // Stop-loss discipline: losers that stayed within 20% of the planned loss.
    // Losing trades without a journaled risk cannot be judged and are excluded.
    let judged_losers: Vec<(f64, f64)> = trades
        .iter()
        .filter(|t| t.is_loser())
        .filter_map(|t| {
            let risk = t.risk?;
            Some((t.pnl.abs().to_f64().unwrap_or(0.0), risk))
        })
        .collect();
    if !judged_losers.is_empty() {
        let within = judged_losers
            .iter()
            .filter(|(loss, risk)| *loss <= risk * 100.0 * 1.2)
            .count();
        score += 0.3 * (100.0 * within as f64 / judged_losers.len() as f64);
        any_factor = true;
    }

    if !any_factor {
        return NEUTRAL_SCORE;
    }
    score.round() as u32
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std_dev(values: &[f64]) -> f64 {
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
