//! Achievement identifiers, rewards and authored definitions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::platform::PlatformIds;

/// Position of an achievement group in the configured list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AchievementId(pub u32);

impl AchievementId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "achievement#{}", self.0)
    }
}

/// Payload granted when a tier is claimed, e.g. 50 "coins"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reward {
    pub kind: String,
    pub amount: i64,
}

impl Reward {
    pub fn new(kind: impl Into<String>, amount: i64) -> Self {
        Self {
            kind: kind.into(),
            amount,
        }
    }
}

impl fmt::Display for Reward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.kind, self.amount)
    }
}

/// Host inventory that receives claimed rewards
pub trait RewardSink {
    /// Precheck, e.g. refuse when the inventory is full
    fn can_obtain(&self, reward: &Reward) -> bool;

    fn grant(&mut self, reward: &Reward);
}

/// One threshold step of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementTier {
    pub requirement: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<Reward>,

    #[serde(default, flatten)]
    pub ids: PlatformIds,
}

impl AchievementTier {
    pub fn new(requirement: i64) -> Self {
        Self {
            requirement,
            reward: None,
            ids: PlatformIds::default(),
        }
    }

    pub fn with_reward(mut self, reward: Reward) -> Self {
        self.reward = Some(reward);
        self
    }

    pub fn with_ids(mut self, game_center: &str, play_games: &str) -> Self {
        self.ids = PlatformIds {
            game_center: Some(game_center.to_string()),
            play_games: Some(play_games.to_string()),
        };
        self
    }
}

/// A group of tiers sharing one progress counter, e.g. kill 10 / 50 / 100 enemies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementGroupDef {
    /// Stable key used in store keys and on the command line
    pub key: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Reports add to the counter (enemies killed); otherwise they replace it
    /// (best distance in one run)
    #[serde(default)]
    pub incremental: bool,

    /// Progress is part of the game save and tiers carry in-game rewards
    #[serde(default = "default_in_game")]
    pub in_game: bool,

    /// Tiers in ascending requirement order
    #[serde(default)]
    pub tiers: Vec<AchievementTier>,
}

fn default_in_game() -> bool {
    true
}

impl AchievementGroupDef {
    pub fn new(key: impl Into<String>, incremental: bool, tiers: Vec<AchievementTier>) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            description: String::new(),
            incremental,
            in_game: true,
            tiers,
        }
    }

    /// True if requirements never decrease from one tier to the next
    pub fn tiers_ascending(&self) -> bool {
        self.tiers
            .windows(2)
            .all(|w| w[0].requirement <= w[1].requirement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_toml() {
        let def: AchievementGroupDef = toml::from_str(
            r#"
            key = "kills"
            incremental = true

            [[tiers]]
            requirement = 10
            game_center = "gc.kills.10"
            reward = { kind = "coins", amount = 50 }

            [[tiers]]
            requirement = 50
            "#,
        )
        .unwrap();

        assert!(def.in_game);
        assert!(def.incremental);
        assert_eq!(def.tiers.len(), 2);
        assert_eq!(def.tiers[0].reward, Some(Reward::new("coins", 50)));
        assert_eq!(def.tiers[0].ids.game_center.as_deref(), Some("gc.kills.10"));
        assert_eq!(def.tiers[1].reward, None);
        assert!(def.tiers_ascending());
    }

    #[test]
    fn test_descending_tiers_detected() {
        let def = AchievementGroupDef::new(
            "odd",
            false,
            vec![AchievementTier::new(50), AchievementTier::new(10)],
        );
        assert!(!def.tiers_ascending());
    }
}
