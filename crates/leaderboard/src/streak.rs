// In crates/leaderboard/src/streak.rs

/// Weekly-streak badge ladder, scanned top-down with `>=` comparisons; the
/// first matching entry wins.
///
/// The table intentionally carries two zero-threshold entries, which makes
/// "Chart Rookie" unreachable under first-match-wins.
// TODO: product to decide whether "Chart Rookie" was meant to be reachable.
const STREAK_RANKS: [(u32, &str); 10] = [
    (20, "Trader Elite"),
    (15, "Market Veteran"),
    (10, "Streak Master"),
    (6, "Consistency Pro"),
    (4, "Habit Builder"),
    (3, "Momentum Riser"),
    (2, "Routine Builder"),
    (1, "First Steps"),
    (0, "Wick Watcher"),
    (0, "Chart Rookie"),
];

/// Maps consecutive weeks of activity to a named badge. Informational only;
/// no scoring depends on it.
pub fn streak_rank(weeks: u32) -> &'static str {
    for (min_weeks, name) in STREAK_RANKS {
        if weeks >= min_weeks {
            return name;
        }
    }
    // Unreachable: the table ends with a zero threshold.
    "Chart Rookie"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_streak_hits_the_first_zero_entry() {
        assert_eq!(streak_rank(0), "Wick Watcher");
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(streak_rank(1), "First Steps");
        assert_eq!(streak_rank(2), "Routine Builder");
        assert_eq!(streak_rank(3), "Momentum Riser");
        assert_eq!(streak_rank(4), "Habit Builder");
        assert_eq!(streak_rank(5), "Habit Builder");
        assert_eq!(streak_rank(6), "Consistency Pro");
        assert_eq!(streak_rank(10), "Streak Master");
        assert_eq!(streak_rank(15), "Market Veteran");
        assert_eq!(streak_rank(20), "Trader Elite");
        assert_eq!(streak_rank(52), "Trader Elite");
    }
}
