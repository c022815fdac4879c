//! Ledger - the composition root
//!
//! One `Ledger` owns the store handle, the platform binding, the event bus,
//! the login session and both managers. The host game builds it once at
//! launch and routes gameplay reports and platform callbacks through it.

use std::sync::Arc;

use tracing::{debug, info};

use crate::achievements::{AchievementId, AchievementManager, RewardSink};
use crate::config::{Config, Settings};
use crate::error::Result;
use crate::events::EventBus;
use crate::leaderboards::{LeaderboardEntry, LeaderboardId, LeaderboardManager, TimeWindow};
use crate::platform::{self, PlatformAchievement, PlatformSession, SocialPlatform};
use crate::store::{ProgressStore, SqliteStore};

pub struct Ledger {
    settings: Settings,
    store: Arc<dyn ProgressStore>,
    platform: Arc<dyn SocialPlatform>,
    events: Arc<EventBus>,
    session: PlatformSession,
    achievements: AchievementManager,
    leaderboards: LeaderboardManager,
}

impl Ledger {
    /// Wire every component from a configuration, a store and a platform
    pub fn new(
        config: Config,
        store: Arc<dyn ProgressStore>,
        platform: Arc<dyn SocialPlatform>,
    ) -> Result<Self> {
        let events = Arc::new(EventBus::new());
        let Config {
            settings,
            achievement,
            leaderboard,
        } = config;

        let session = PlatformSession::new(store.clone(), platform.clone(), events.clone());
        let achievements = AchievementManager::new(
            achievement,
            settings.achievements.clone(),
            store.clone(),
            platform.clone(),
            events.clone(),
        );
        let leaderboards = LeaderboardManager::new(
            leaderboard,
            settings.leaderboards.clone(),
            store.clone(),
            platform.clone(),
            events.clone(),
        )?;

        debug!(
            "Ledger ready: {} achievement groups, {} leaderboards on {}",
            achievements.groups().len(),
            leaderboards.defs().len(),
            platform.kind()
        );

        Ok(Self {
            settings,
            store,
            platform,
            events,
            session,
            achievements,
            leaderboards,
        })
    }

    /// Open the SQLite store at ~/.laurel/ledger.db with the configured platform
    pub fn open_default(config: Config) -> Result<Self> {
        let store: Arc<dyn ProgressStore> = Arc::new(SqliteStore::open_default()?);
        let platform = platform::platform_for(config.settings.platform.kind);
        Self::new(config, store, platform)
    }

    // ========================================
    // ACCESSORS
    // ========================================

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn ProgressStore> {
        &self.store
    }

    pub fn platform(&self) -> &Arc<dyn SocialPlatform> {
        &self.platform
    }

    pub fn session(&self) -> &PlatformSession {
        &self.session
    }

    pub fn achievements(&self) -> &AchievementManager {
        &self.achievements
    }

    pub fn leaderboards(&self) -> &LeaderboardManager {
        &self.leaderboards
    }

    pub fn leaderboards_mut(&mut self) -> &mut LeaderboardManager {
        &mut self.leaderboards
    }

    // ========================================
    // GAMEPLAY
    // ========================================

    /// Launch-time login according to the previous outcome. Returns true if a
    /// login request was issued.
    pub fn start(&mut self) -> Result<bool> {
        self.session.start(self.settings.platform.login_on_start)
    }

    pub fn report_progress(&self, id: AchievementId, total_or_increment: i64) -> Result<bool> {
        self.achievements
            .report(id, total_or_increment, self.session.is_authenticated())
    }

    pub fn claim_reward(&self, id: AchievementId, tier: usize, sink: &mut dyn RewardSink) -> Result<()> {
        self.achievements.claim_reward(id, tier, sink)
    }

    pub fn report_score(&mut self, id: LeaderboardId, score: i64) -> Result<bool> {
        let authenticated = self.session.is_authenticated();
        self.leaderboards.report_score(id, score, authenticated)
    }

    // ========================================
    // PLATFORM CALLBACKS
    // ========================================

    pub fn on_authentication_succeeded(&mut self, player_name: Option<String>) -> Result<()> {
        if !self.session.on_authentication_succeeded(player_name)? {
            return Ok(());
        }
        if let Some(name) = self.session.player_name().map(str::to_string) {
            self.leaderboards.set_my_name(&name)?;
        }
        self.leaderboards.on_authenticated()?;
        self.achievements.on_authenticated();
        Ok(())
    }

    pub fn on_authentication_failed(&mut self, reason: &str) -> Result<()> {
        self.session.on_authentication_failed(reason)
    }

    pub fn on_top_scores_loaded(
        &mut self,
        external_id: &str,
        window: TimeWindow,
        entries: Vec<LeaderboardEntry>,
    ) -> Result<()> {
        self.leaderboards
            .on_top_scores_loaded(external_id, window, entries)
    }

    pub fn on_my_score_loaded(&mut self, external_id: &str, score: i64) -> Result<()> {
        self.leaderboards.on_my_score_loaded(external_id, score)
    }

    pub fn on_platform_achievements_loaded(&self, achievements: &[PlatformAchievement]) -> Result<()> {
        self.achievements
            .on_platform_achievements_loaded(achievements)
    }

    // ========================================
    // PLATFORM UI
    // ========================================

    /// Open the platform leaderboard UI, logging in first if needed.
    /// `None` shows every leaderboard.
    pub fn show_platform_leaderboard(&mut self, id: Option<LeaderboardId>) {
        self.ensure_login();
        let external_id = id.and_then(|id| self.leaderboards.external_id(id));
        self.platform
            .show_leaderboard(external_id, self.leaderboards.current_window());
    }

    pub fn show_platform_achievements(&mut self) {
        self.ensure_login();
        self.achievements.show_platform_achievements();
    }

    fn ensure_login(&mut self) {
        if !self.session.is_authenticated() {
            info!("Not logged in, forcing login");
            self.session.try_authenticate(true);
        }
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("session", &self.session)
            .field("achievements", &self.achievements)
            .field("leaderboards", &self.leaderboards)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::OfflinePlatform;
    use crate::store::MemoryStore;

    fn ledger() -> Ledger {
        Ledger::new(
            Config::with_defaults(),
            Arc::new(MemoryStore::new()),
            Arc::new(OfflinePlatform::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_offline_platform_never_logs_in() {
        let mut ledger = ledger();
        assert!(ledger.start().unwrap());
        assert!(!ledger.session().is_authenticated());
    }

    #[test]
    fn test_login_renames_my_records() {
        let mut ledger = ledger();
        let board = ledger.leaderboards().id_for("high_score").unwrap();
        ledger.report_score(board, 2500).unwrap();

        ledger
            .on_authentication_succeeded(Some("Robin".to_string()))
            .unwrap();

        assert_eq!(ledger.leaderboards().my_name(), "Robin");
        assert_eq!(ledger.leaderboards().my_score(board), 2500);
        assert_eq!(ledger.leaderboards().offline_score(board).unwrap(), 0);
    }

    #[test]
    fn test_highscore_after_login_keeps_one_row() {
        let mut ledger = ledger();
        let board = ledger.leaderboards().id_for("high_score").unwrap();
        ledger.report_score(board, 2500).unwrap();

        ledger
            .on_authentication_succeeded(Some("Robin".to_string()))
            .unwrap();
        let rows = ledger.leaderboards().top_scores(board, TimeWindow::AllTime);
        assert_eq!(rows[2], LeaderboardEntry::new("Robin", 3, 2500));

        ledger.report_score(board, 2700).unwrap();

        let rows = ledger.leaderboards().top_scores(board, TimeWindow::AllTime);
        assert_eq!(rows.iter().filter(|e| e.name == "Robin").count(), 1);
        assert!(rows.iter().all(|e| e.name != "You"));
        assert_eq!(rows[1], LeaderboardEntry::new("Robin", 2, 2700));
        assert_eq!(ledger.leaderboards().my_rank(board, TimeWindow::AllTime), 2);
        assert_eq!(
            ledger.store().get_string("leaderboard.top.high_score.all_time.1").unwrap().as_deref(),
            Some("Robin|2|2700")
        );
    }

    #[test]
    fn test_report_progress_through_ledger() {
        let ledger = ledger();
        let kills = ledger.achievements().id_for("kills").unwrap();
        ledger.report_progress(kills, 10).unwrap();
        assert!(ledger.achievements().has_any_reward().unwrap());
    }
}
