// In crates/leaderboard/src/scorer.rs

use crate::aggregator::RawMetrics;

/// Weighted blend of the per-user metrics into a single score in [0, 100].
///
/// Deterministic and pure: the same metrics always produce the same score.
pub fn composite_score(metrics: &RawMetrics) -> f64 {
    // Trade count saturates at 100 trades worth of experience.
    let experience_factor = (metrics.total_trades as f64 / 100.0).min(1.0) * 100.0;
    // A profit factor of 5 already maps to the full 100.
    let normalized_profit_factor = (metrics.profit_factor * 20.0).min(100.0);
    let weekly_activity_bonus = if metrics.weekly_active { 100.0 } else { 0.0 };

    let score = metrics.win_rate as f64 * 0.25
        + metrics.consistency as f64 * 0.30
        + metrics.risk_management as f64 * 0.25
        + normalized_profit_factor * 0.15
        + experience_factor * 0.05
        + weekly_activity_bonus * 0.05;

    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> RawMetrics {
        RawMetrics {
            total_trades: 0,
            win_rate: 0,
            profit_factor: 0.0,
            monthly_pnl: 0,
            consistency: 0,
            risk_management: 0,
            weekly_active: false,
        }
    }

    #[test]
    fn empty_metrics_score_zero() {
        assert_eq!(composite_score(&metrics()), 0.0);
    }

    #[test]
    fn perfect_metrics_score_one_hundred() {
        let m = RawMetrics {
            total_trades: 250,
            win_rate: 100,
            profit_factor: 99.0,
            monthly_pnl: 10_000,
            consistency: 100,
            risk_management: 100,
            weekly_active: true,
        };
        assert_eq!(composite_score(&m), 100.0);
    }

    #[test]
    fn weights_combine_as_documented() {
        let m = RawMetrics {
            total_trades: 50, // experience 50
            win_rate: 60,
            profit_factor: 2.0, // normalized 40
            monthly_pnl: 0,
            consistency: 50,
            risk_management: 50,
            weekly_active: true,
        };
        // 60*0.25 + 50*0.30 + 50*0.25 + 40*0.15 + 50*0.05 + 100*0.05
        let expected = 15.0 + 15.0 + 12.5 + 6.0 + 2.5 + 5.0;
        assert!((composite_score(&m) - expected).abs() < 1e-9);
    }

    #[test]
    fn score_stays_in_bounds_for_documented_ranges() {
        for win_rate in [0u32, 50, 100] {
            for consistency in [0u32, 50, 100] {
                for pf in [0.0, 1.0, 99.0] {
                    let m = RawMetrics {
                        total_trades: 1_000,
                        win_rate,
                        profit_factor: pf,
                        monthly_pnl: 0,
                        consistency,
                        risk_management: 100,
                        weekly_active: true,
                    };
                    let score = composite_score(&m);
                    assert!((0.0..=100.0).contains(&score));
                }
            }
        }
    }
}
