//! Settings configuration types

mod achievements;
mod leaderboards;
mod platform;

pub use achievements::AchievementSettings;
pub use leaderboards::LeaderboardSettings;
pub use platform::PlatformSettings;

use serde::{Deserialize, Serialize};

/// General settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Social platform settings
    #[serde(default)]
    pub platform: PlatformSettings,

    /// Achievement settings
    #[serde(default)]
    pub achievements: AchievementSettings,

    /// Leaderboard settings
    #[serde(default)]
    pub leaderboards: LeaderboardSettings,
}
