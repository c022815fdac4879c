//! Leaderboard settings

use serde::{Deserialize, Serialize};

/// Leaderboard behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardSettings {
    /// Number of rows kept per leaderboard window (top-N)
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Merge new local highscores into the cached top tables
    #[serde(default = "default_true")]
    pub compare_top_scores: bool,

    /// Download top tables after login (All-Time, then Week, then Today)
    #[serde(default)]
    pub load_top_scores: bool,

    /// Download the player's own scores after login
    #[serde(default)]
    pub load_my_scores: bool,

    /// Fill never-downloaded tables with placeholder rivals
    #[serde(default = "default_true")]
    pub seed_presets: bool,
}

fn default_top_n() -> usize {
    10
}

fn default_true() -> bool {
    true
}

impl Default for LeaderboardSettings {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            compare_top_scores: true,
            load_top_scores: false,
            load_my_scores: false,
            seed_presets: true,
        }
    }
}
