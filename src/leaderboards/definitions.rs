//! Leaderboard identifiers and authored definitions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::platform::PlatformIds;

/// Position of a leaderboard in the configured list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeaderboardId(pub u32);

impl LeaderboardId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LeaderboardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leaderboard#{}", self.0)
    }
}

/// One leaderboard as authored in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardDef {
    /// Stable key used in store keys, e.g. "distance"
    pub key: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Identifiers on each platform service
    #[serde(default, flatten)]
    pub ids: PlatformIds,
}

impl LeaderboardDef {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            ids: PlatformIds::default(),
        }
    }

    pub fn with_ids(mut self, game_center: &str, play_games: &str) -> Self {
        self.ids = PlatformIds {
            game_center: Some(game_center.to_string()),
            play_games: Some(play_games.to_string()),
        };
        self
    }
}
