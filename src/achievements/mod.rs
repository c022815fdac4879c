//! Tiered achievement groups, reward claiming and platform sync

mod definitions;
mod group;
mod manager;

pub use definitions::{AchievementGroupDef, AchievementId, AchievementTier, Reward, RewardSink};
pub use group::{AchievementGroup, NOT_REWARDED};
pub use manager::AchievementManager;
