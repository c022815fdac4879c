//! Shared test utilities for ledger integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use laurel::achievements::{AchievementGroupDef, AchievementTier};
use laurel::leaderboards::LeaderboardDef;
use laurel::platform::{PlatformKind, SocialPlatform};
use laurel::store::{MemoryStore, ProgressStore};
use laurel::{Config, EventBus, Ledger, LedgerEvent, Reward, RewardSink, TimeWindow};

/// One request the ledger sent to the platform
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Authenticate { force_ui: bool },
    SubmitScore(String, i64),
    Unlock(String),
    Increment(String, i64),
    LoadAchievements,
    LoadTopScores(String, TimeWindow, usize),
    LoadMyScore(String),
    ShowLeaderboard(Option<String>, TimeWindow),
    ShowAchievements,
}

/// Platform double that records every call
#[derive(Debug)]
pub struct RecordingPlatform {
    kind: PlatformKind,
    caches_offline: bool,
    calls: Mutex<Vec<Call>>,
}

impl RecordingPlatform {
    pub fn new(kind: PlatformKind) -> Self {
        Self {
            kind,
            caches_offline: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn caching_offline(mut self) -> Self {
        self.caches_offline = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl SocialPlatform for RecordingPlatform {
    fn kind(&self) -> PlatformKind {
        self.kind
    }

    fn caches_offline_scores(&self) -> bool {
        self.caches_offline
    }

    fn authenticate(&self, force_ui: bool) {
        self.record(Call::Authenticate { force_ui });
    }

    fn submit_score(&self, leaderboard_id: &str, score: i64) {
        self.record(Call::SubmitScore(leaderboard_id.to_string(), score));
    }

    fn unlock_achievement(&self, achievement_id: &str) {
        self.record(Call::Unlock(achievement_id.to_string()));
    }

    fn increment_achievement(&self, achievement_id: &str, steps: i64) {
        self.record(Call::Increment(achievement_id.to_string(), steps));
    }

    fn load_achievements(&self) {
        self.record(Call::LoadAchievements);
    }

    fn load_top_scores(&self, leaderboard_id: &str, window: TimeWindow, count: usize) {
        self.record(Call::LoadTopScores(leaderboard_id.to_string(), window, count));
    }

    fn load_my_score(&self, leaderboard_id: &str) {
        self.record(Call::LoadMyScore(leaderboard_id.to_string()));
    }

    fn show_leaderboard(&self, leaderboard_id: Option<&str>, window: TimeWindow) {
        self.record(Call::ShowLeaderboard(leaderboard_id.map(str::to_string), window));
    }

    fn show_achievements(&self) {
        self.record(Call::ShowAchievements);
    }
}

/// Reward sink that collects grants and can be marked full
#[derive(Debug, Default)]
pub struct Wallet {
    pub granted: Vec<Reward>,
    pub full: bool,
}

impl RewardSink for Wallet {
    fn can_obtain(&self, _reward: &Reward) -> bool {
        !self.full
    }

    fn grant(&mut self, reward: &Reward) {
        self.granted.push(reward.clone());
    }
}

/// Two groups ("kills" incremental 10/50/100, "distance" absolute 1000) and
/// one leaderboard ("distance"), with Play Games ids
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.achievement = vec![
        AchievementGroupDef::new(
            "kills",
            true,
            vec![
                AchievementTier::new(10)
                    .with_reward(Reward::new("coins", 50))
                    .with_ids("gc.kills.10", "pg_kills_10"),
                AchievementTier::new(50)
                    .with_reward(Reward::new("coins", 200))
                    .with_ids("gc.kills.50", "pg_kills_50"),
                AchievementTier::new(100)
                    .with_reward(Reward::new("gems", 5))
                    .with_ids("gc.kills.100", "pg_kills_100"),
            ],
        ),
        AchievementGroupDef::new(
            "distance",
            false,
            vec![AchievementTier::new(1000)
                .with_reward(Reward::new("coins", 100))
                .with_ids("gc.distance.1k", "pg_distance_1k")],
        ),
    ];
    config.leaderboard =
        vec![LeaderboardDef::new("distance").with_ids("gc.lb.distance", "pg_lb_distance")];
    config
}

/// Ledger on a fresh in-memory store with a recording platform
pub fn test_ledger(config: Config) -> (Ledger, Arc<RecordingPlatform>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let platform = Arc::new(RecordingPlatform::new(PlatformKind::PlayGames));
    let ledger = ledger_on(config, store.clone(), platform.clone());
    (ledger, platform, store)
}

pub fn ledger_on(
    config: Config,
    store: Arc<dyn ProgressStore>,
    platform: Arc<RecordingPlatform>,
) -> Ledger {
    Ledger::new(config, store, platform).expect("Failed to build ledger")
}

/// Collect every event emitted on `events` from now on
pub fn record_events(events: &EventBus) -> Arc<Mutex<Vec<LedgerEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    events.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    seen
}
