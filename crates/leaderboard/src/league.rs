// In crates/leaderboard/src/league.rs

use serde::{Deserialize, Serialize};

/// A named tier bucketing a composite-score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum League {
    Obsidian,
    Diamond,
    Platinum,
    Gold,
    Silver,
    Bronze,
}

/// Score bands, scanned high-to-low with an inclusive lower bound. Together
/// they partition [0, 100] without gaps.
const BANDS: [(League, f64, f64); 6] = [
    (League::Obsidian, 95.0, 100.0),
    (League::Diamond, 85.0, 95.0),
    (League::Platinum, 75.0, 85.0),
    (League::Gold, 65.0, 75.0),
    (League::Silver, 45.0, 65.0),
    (League::Bronze, 0.0, 45.0),
];

impl League {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Obsidian => "Obsidian",
            Self::Diamond => "Diamond",
            Self::Platinum => "Platinum",
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Bronze => "Bronze",
        }
    }

    /// Display icon. Cosmetic only.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Obsidian => "🖤",
            Self::Diamond => "💎",
            Self::Platinum => "🏆",
            Self::Gold => "🥇",
            Self::Silver => "🥈",
            Self::Bronze => "🥉",
        }
    }

    /// Display color (hex). Cosmetic only.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Obsidian => "#3D3D3D",
            Self::Diamond => "#B9F2FF",
            Self::Platinum => "#E5E4E2",
            Self::Gold => "#FFD700",
            Self::Silver => "#C0C0C0",
            Self::Bronze => "#CD7F32",
        }
    }
}

/// Where a composite score lands within the league ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeaguePlacement {
    pub league: League,
    /// 1..=3 within the league.
    pub sub_level: u8,
    /// Linear position within the league's band, 0-100.
    pub progress: f64,
}

impl League {
    /// Maps a composite score to its league, sub-level, and in-band progress.
    pub fn classify(score: f64) -> LeaguePlacement {
        let score = score.clamp(0.0, 100.0);
        for (league, lo, hi) in BANDS {
            if score >= lo {
                let progress = 100.0 * (score - lo) / (hi - lo);
                // A score at the band floor is sub-level 1, not 0.
                let sub_level = ((progress * 3.0 / 100.0).ceil() as u8).clamp(1, 3);
                return LeaguePlacement {
                    league,
                    sub_level,
                    progress,
                };
            }
        }
        // Unreachable: the Bronze band's lower bound is 0 and the score is clamped.
        LeaguePlacement {
            league: League::Bronze,
            sub_level: 1,
            progress: 0.0,
        }
    }
}
