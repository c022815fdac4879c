//! Platform implementation for builds without a social service

use tracing::debug;

use super::{PlatformKind, SocialPlatform};
use crate::leaderboards::TimeWindow;

/// Accepts every call and does nothing but trace it.
///
/// Login never completes, so the ledger keeps all state locally and the
/// offline score cache stays in use.
#[derive(Debug, Default, Clone)]
pub struct OfflinePlatform;

impl OfflinePlatform {
    pub fn new() -> Self {
        Self
    }
}

impl SocialPlatform for OfflinePlatform {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Offline
    }

    fn caches_offline_scores(&self) -> bool {
        false
    }

    fn authenticate(&self, force_ui: bool) {
        debug!("offline: authenticate(force_ui={}) ignored", force_ui);
    }

    fn submit_score(&self, leaderboard_id: &str, score: i64) {
        debug!("offline: submit_score({}, {}) ignored", leaderboard_id, score);
    }

    fn unlock_achievement(&self, achievement_id: &str) {
        debug!("offline: unlock_achievement({}) ignored", achievement_id);
    }

    fn increment_achievement(&self, achievement_id: &str, steps: i64) {
        debug!("offline: increment_achievement({}, {}) ignored", achievement_id, steps);
    }

    fn load_achievements(&self) {}

    fn load_top_scores(&self, leaderboard_id: &str, window: TimeWindow, count: usize) {
        debug!(
            "offline: load_top_scores({}, {}, {}) ignored",
            leaderboard_id, window, count
        );
    }

    fn load_my_score(&self, _leaderboard_id: &str) {}
}
