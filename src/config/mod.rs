//! Configuration loading and management

mod io;
mod settings;

pub use settings::{AchievementSettings, LeaderboardSettings, PlatformSettings, Settings};

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::achievements::{AchievementGroupDef, AchievementTier, Reward};
use crate::leaderboards::LeaderboardDef;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub settings: Settings,

    /// Achievement groups, in id order
    #[serde(default)]
    pub achievement: Vec<AchievementGroupDef>,

    /// Leaderboards, in id order
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardDef>,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for: .laurel/config.toml (preferred) or laurel.toml
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(".laurel/config.toml");
        if path.exists() {
            return Self::from_file(&path);
        }

        let flat_path = dir.join("laurel.toml");
        if flat_path.exists() {
            return Self::from_file(&flat_path);
        }

        Ok(Self::with_defaults())
    }

    /// Create a config with a small sample game: two achievement groups and
    /// two leaderboards
    pub fn with_defaults() -> Self {
        let mut kills = AchievementGroupDef::new(
            "kills",
            true,
            vec![
                AchievementTier::new(10)
                    .with_reward(Reward::new("coins", 50))
                    .with_ids("laurel.kills.10", "CgkIkills10"),
                AchievementTier::new(50)
                    .with_reward(Reward::new("coins", 200))
                    .with_ids("laurel.kills.50", "CgkIkills50"),
                AchievementTier::new(100)
                    .with_reward(Reward::new("gems", 5))
                    .with_ids("laurel.kills.100", "CgkIkills100"),
            ],
        );
        kills.name = "Monster Hunter".to_string();
        kills.description = "Defeat enemies".to_string();

        let mut distance = AchievementGroupDef::new(
            "distance",
            false,
            vec![
                AchievementTier::new(1000)
                    .with_reward(Reward::new("coins", 100))
                    .with_ids("laurel.distance.1k", "CgkIdist1k"),
                AchievementTier::new(5000)
                    .with_reward(Reward::new("gems", 2))
                    .with_ids("laurel.distance.5k", "CgkIdist5k"),
            ],
        );
        distance.name = "Long Runner".to_string();
        distance.description = "Best distance in a single run".to_string();

        let mut high_score = LeaderboardDef::new("high_score")
            .with_ids("laurel.leaderboard.score", "CgkIscore");
        high_score.name = "High Score".to_string();
        let mut best_time = LeaderboardDef::new("best_time")
            .with_ids("laurel.leaderboard.time", "CgkItime");
        best_time.name = "Best Time".to_string();

        Self {
            settings: Settings::default(),
            achievement: vec![kills, distance],
            leaderboard: vec![high_score, best_time],
        }
    }

    /// Reject configurations the ledger cannot address unambiguously.
    ///
    /// Duplicate or empty keys are errors. Tiers out of ascending order are
    /// accepted with a warning.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for group in &self.achievement {
            if group.key.trim().is_empty() {
                bail!("Achievement group with empty key");
            }
            if !seen.insert(group.key.as_str()) {
                bail!("Duplicate achievement key: {}", group.key);
            }
            if !group.tiers_ascending() {
                tracing::warn!(
                    "Achievement '{}' tiers are not in ascending requirement order",
                    group.key
                );
            }
            if group.tiers.is_empty() {
                tracing::warn!("Achievement '{}' has no tiers", group.key);
            }
        }

        let mut seen = HashSet::new();
        for board in &self.leaderboard {
            if board.key.trim().is_empty() {
                bail!("Leaderboard with empty key");
            }
            if !seen.insert(board.key.as_str()) {
                bail!("Duplicate leaderboard key: {}", board.key);
            }
        }

        if self.settings.leaderboards.top_n == 0 {
            bail!("settings.leaderboards.top_n must be at least 1");
        }
        if self.settings.achievements.sync_slack < 0 {
            bail!("settings.achievements.sync_slack must not be negative");
        }
        Ok(())
    }

    pub fn get_achievement(&self, key: &str) -> Option<&AchievementGroupDef> {
        self.achievement.iter().find(|g| g.key == key)
    }

    pub fn get_leaderboard(&self, key: &str) -> Option<&LeaderboardDef> {
        self.leaderboard.iter().find(|l| l.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::with_defaults();
        config.validate().unwrap();
        assert!(config.get_achievement("kills").is_some());
        assert!(config.get_leaderboard("high_score").is_some());
    }

    #[test]
    fn test_defaults_roundtrip_through_toml() {
        let config = Config::with_defaults();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let mut config = Config::with_defaults();
        config.leaderboard.push(LeaderboardDef::new("high_score"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("high_score"));
    }

    #[test]
    fn test_descending_tiers_only_warn() {
        let mut config = Config::default();
        config.achievement.push(AchievementGroupDef::new(
            "odd",
            false,
            vec![AchievementTier::new(5), AchievementTier::new(1)],
        ));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_dir_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_dir(dir.path()).unwrap();
        assert_eq!(config, Config::with_defaults());

        std::fs::create_dir_all(dir.path().join(".laurel")).unwrap();
        std::fs::write(
            dir.path().join(".laurel/config.toml"),
            "[[leaderboard]]\nkey = \"laps\"\n",
        )
        .unwrap();
        let config = Config::from_dir(dir.path()).unwrap();
        assert_eq!(config.leaderboard.len(), 1);
        assert!(config.achievement.is_empty());
    }
}
