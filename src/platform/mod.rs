//! Social platform capability
//!
//! The bookkeeping core never talks to a vendor SDK directly. It calls the
//! [`SocialPlatform`] trait, and the host wires in the implementation for the
//! platform it was built for. Every call is fire-and-forget: results come back
//! later through the `on_*` callbacks on [`crate::Ledger`].

mod offline;
mod session;

pub use offline::OfflinePlatform;
pub use session::PlatformSession;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::leaderboards::TimeWindow;

/// Which platform service an implementation talks to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    GameCenter,
    PlayGames,
    #[default]
    Offline,
}

impl PlatformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GameCenter => "game_center",
            Self::PlayGames => "play_games",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External identifiers of one achievement tier or leaderboard, per platform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformIds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_center: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_games: Option<String>,
}

impl PlatformIds {
    /// The identifier to use on `kind`. The offline platform accepts any.
    pub fn for_kind(&self, kind: PlatformKind) -> Option<&str> {
        match kind {
            PlatformKind::GameCenter => self.game_center.as_deref(),
            PlatformKind::PlayGames => self.play_games.as_deref(),
            PlatformKind::Offline => self
                .game_center
                .as_deref()
                .or(self.play_games.as_deref()),
        }
    }
}

/// Progress of one platform achievement as reported back by the service
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformProgress {
    /// Completion percentage (0-100)
    Percent(f64),
    /// Completed steps of an incremental achievement
    Steps(i64),
}

/// One entry of a platform achievement listing
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformAchievement {
    pub external_id: String,
    pub progress: PlatformProgress,
}

/// Capability interface implemented once per platform.
pub trait SocialPlatform: Send + Sync {
    fn kind(&self) -> PlatformKind;

    /// True if the service queues scores submitted while logged out
    fn caches_offline_scores(&self) -> bool;

    /// Start a login. `force_ui` allows the platform to show its login UI.
    fn authenticate(&self, force_ui: bool);

    fn submit_score(&self, leaderboard_id: &str, score: i64);

    fn unlock_achievement(&self, achievement_id: &str);

    fn increment_achievement(&self, achievement_id: &str, steps: i64);

    /// Request the player's achievement states
    fn load_achievements(&self);

    fn load_top_scores(&self, leaderboard_id: &str, window: TimeWindow, count: usize);

    fn load_my_score(&self, leaderboard_id: &str);

    /// Open the native leaderboard UI, all leaderboards when `leaderboard_id` is None
    fn show_leaderboard(&self, _leaderboard_id: Option<&str>, _window: TimeWindow) {}

    fn show_achievements(&self) {}

    fn player_id(&self) -> Option<String> {
        None
    }

    fn player_name(&self) -> Option<String> {
        None
    }
}

/// Build the platform implementation selected in the configuration.
///
/// Only the offline implementation ships with the crate; hosts embedding a
/// vendor SDK construct their own [`SocialPlatform`] and pass it to
/// [`crate::Ledger::new`].
pub fn platform_for(kind: PlatformKind) -> Arc<dyn SocialPlatform> {
    if kind != PlatformKind::Offline {
        tracing::warn!(
            "No built-in binding for platform '{}', falling back to offline",
            kind
        );
    }
    Arc::new(OfflinePlatform::new())
}
