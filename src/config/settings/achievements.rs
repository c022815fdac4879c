//! Achievement settings

use serde::{Deserialize, Serialize};

/// Achievement behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementSettings {
    /// Ask the platform for achievement progress after login and adopt it
    /// when it is ahead of local progress
    #[serde(default = "default_load_on_start")]
    pub load_on_start: bool,

    /// Steps local progress may trail percent-based platform progress before
    /// it is overwritten (absorbs percent rounding)
    #[serde(default = "default_sync_slack")]
    pub sync_slack: i64,
}

fn default_load_on_start() -> bool {
    true
}

fn default_sync_slack() -> i64 {
    2
}

impl Default for AchievementSettings {
    fn default() -> Self {
        Self {
            load_on_start: default_load_on_start(),
            sync_slack: default_sync_slack(),
        }
    }
}
