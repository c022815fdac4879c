//! Leaderboard Manager - local scores, cached top tables and platform sync
//!
//! Keeps the local player's best score per leaderboard and a ranked top-N
//! table per leaderboard and window. New highscores are merged into the cached
//! tables right away so the game can show a ranking offline; downloads from
//! the platform replace those tables when they arrive.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::definitions::{LeaderboardDef, LeaderboardId};
use super::entry::{LeaderboardEntry, PLACEHOLDER_NAME};
use super::table::RankedTable;
use super::window::TimeWindow;
use crate::config::LeaderboardSettings;
use crate::error::{LedgerError, Result};
use crate::events::{EventBus, LedgerEvent};
use crate::platform::SocialPlatform;
use crate::store::ProgressStore;

const KEY_CURRENT_WINDOW: &str = "leaderboard.window";

/// Placeholder rivals for tables that were never downloaded
pub const PRESET_SCORES: &[(&str, i64)] = &[
    ("Alex Rivera", 3000),
    ("Sam Okafor", 2600),
    ("Jordan Lee", 2200),
    ("Priya Natarajan", 2000),
    ("Mateo Silva", 1500),
    ("Hana Kobayashi", 1000),
    ("Noah Fischer", 700),
    ("Zoe Laurent", 500),
    ("Omar Haddad", 300),
    ("Mia Kowalski", 100),
];

fn my_entry_key(def: &LeaderboardDef) -> String {
    format!("leaderboard.my.{}", def.key)
}

fn top_row_key(def: &LeaderboardDef, window: TimeWindow, index: usize) -> String {
    format!("leaderboard.top.{}.{}.{}", def.key, window, index)
}

fn offline_key(def: &LeaderboardDef) -> String {
    format!("leaderboard.offline.{}", def.key)
}

pub struct LeaderboardManager {
    defs: Vec<LeaderboardDef>,
    settings: LeaderboardSettings,
    store: Arc<dyn ProgressStore>,
    platform: Arc<dyn SocialPlatform>,
    events: Arc<EventBus>,
    my_entries: Vec<LeaderboardEntry>,
    tables: HashMap<(LeaderboardId, TimeWindow), RankedTable>,
    current_window: TimeWindow,
    my_score_loaded: HashSet<LeaderboardId>,
}

impl LeaderboardManager {
    /// Build the manager and read persisted scores and tables
    pub fn new(
        defs: Vec<LeaderboardDef>,
        settings: LeaderboardSettings,
        store: Arc<dyn ProgressStore>,
        platform: Arc<dyn SocialPlatform>,
        events: Arc<EventBus>,
    ) -> Result<Self> {
        let current_window = store
            .get_int(KEY_CURRENT_WINDOW)?
            .and_then(TimeWindow::from_index)
            .unwrap_or_default();

        let mut manager = Self {
            defs,
            settings,
            store,
            platform,
            events,
            my_entries: Vec::new(),
            tables: HashMap::new(),
            current_window,
            my_score_loaded: HashSet::new(),
        };
        manager.read_my_entries()?;
        manager.read_top_scores()?;
        Ok(manager)
    }

    // ========================================
    // LOOKUPS
    // ========================================

    pub fn defs(&self) -> &[LeaderboardDef] {
        &self.defs
    }

    pub fn ids(&self) -> impl Iterator<Item = LeaderboardId> + '_ {
        (0..self.defs.len() as u32).map(LeaderboardId)
    }

    pub fn id_for(&self, key: &str) -> Option<LeaderboardId> {
        self.defs
            .iter()
            .position(|d| d.key == key)
            .map(|i| LeaderboardId(i as u32))
    }

    pub fn def(&self, id: LeaderboardId) -> Result<&LeaderboardDef> {
        self.defs.get(id.index()).ok_or_else(|| {
            warn!("Leaderboard index {} out of bounds", id.0);
            LedgerError::UnknownLeaderboard(id)
        })
    }

    /// Identifier of `id` on the active platform
    pub fn external_id(&self, id: LeaderboardId) -> Option<&str> {
        self.defs
            .get(id.index())
            .and_then(|d| d.ids.for_kind(self.platform.kind()))
    }

    fn id_for_external(&self, external_id: &str) -> Option<LeaderboardId> {
        let kind = self.platform.kind();
        self.defs
            .iter()
            .position(|d| d.ids.for_kind(kind) == Some(external_id))
            .map(|i| LeaderboardId(i as u32))
    }

    pub fn settings(&self) -> &LeaderboardSettings {
        &self.settings
    }

    // ========================================
    // MY SCORES
    // ========================================

    pub fn my_entry(&self, id: LeaderboardId) -> Option<&LeaderboardEntry> {
        self.my_entries.get(id.index())
    }

    /// Best known local score, 0 for unknown leaderboards
    pub fn my_score(&self, id: LeaderboardId) -> i64 {
        self.my_entry(id).map(|e| e.score).unwrap_or(0)
    }

    pub fn my_float_score(&self, id: LeaderboardId) -> f64 {
        self.my_entry(id).map(|e| e.float_score()).unwrap_or(0.0)
    }

    /// Local player's display name, taken from the first leaderboard record
    pub fn my_name(&self) -> &str {
        self.my_entries
            .first()
            .map(|e| e.name.as_str())
            .unwrap_or(PLACEHOLDER_NAME)
    }

    /// Highest fractional score over all leaderboards
    pub fn highest_float_score(&self) -> f64 {
        self.my_entries
            .iter()
            .map(|e| e.float_score())
            .fold(0.0, f64::max)
    }

    /// Local player's rank. All-Time uses the stored record, other windows
    /// look the player up in the cached table.
    pub fn my_rank(&self, id: LeaderboardId, window: TimeWindow) -> u32 {
        match window {
            TimeWindow::AllTime => self.my_entry(id).map(|e| e.rank).unwrap_or(0),
            _ => self
                .tables
                .get(&(id, window))
                .map(|t| t.rank_of(self.my_name()))
                .unwrap_or(1),
        }
    }

    fn read_my_entries(&mut self) -> Result<()> {
        let mut entries = Vec::with_capacity(self.defs.len());
        for def in &self.defs {
            let entry = match self.store.get_string(&my_entry_key(def))? {
                Some(row) => row.parse().unwrap_or_else(|e| {
                    warn!("Discarding stored score for '{}': {}", def.key, e);
                    LeaderboardEntry::placeholder()
                }),
                None => LeaderboardEntry::placeholder(),
            };
            entries.push(entry);
        }
        self.my_entries = entries;
        Ok(())
    }

    fn write_my_entry(&self, id: LeaderboardId) -> Result<()> {
        let def = self.def(id)?;
        if let Some(entry) = self.my_entries.get(id.index()) {
            self.store.set_string(&my_entry_key(def), &entry.to_row())?;
        }
        Ok(())
    }

    fn set_my_score(&mut self, id: LeaderboardId, score: i64) -> Result<()> {
        if let Some(entry) = self.my_entries.get_mut(id.index()) {
            entry.score = score;
        }
        self.write_my_entry(id)
    }

    fn set_my_rank(&mut self, id: LeaderboardId, rank: u32) -> Result<()> {
        if let Some(entry) = self.my_entries.get_mut(id.index()) {
            entry.rank = rank;
        }
        self.write_my_entry(id)
    }

    /// Replace the local player's name on every record (e.g. after login).
    /// Rows already merged into cached tables are renamed with them.
    pub fn set_my_name(&mut self, name: &str) -> Result<()> {
        let mut renamed = Vec::new();
        for (i, entry) in self.my_entries.iter_mut().enumerate() {
            if entry.name == name {
                continue;
            }
            let id = LeaderboardId(i as u32);
            for window in TimeWindow::ALL {
                if let Some(table) = self.tables.get_mut(&(id, window)) {
                    if table.rename(&entry.name, name) {
                        renamed.push((id, window));
                    }
                }
            }
            entry.name = name.to_string();
        }

        for id in 0..self.defs.len() as u32 {
            self.write_my_entry(LeaderboardId(id))?;
        }
        for (id, window) in renamed {
            debug!("Renamed my row in {} {}", id, window);
            self.write_top_scores(id, window)?;
        }
        Ok(())
    }

    // ========================================
    // REPORTING
    // ========================================

    /// Report a finished game's score.
    ///
    /// The score always goes to the platform. Local state only changes when it
    /// beats the stored best; returns true in that case.
    pub fn report_score(&mut self, id: LeaderboardId, score: i64, authenticated: bool) -> Result<bool> {
        debug!("report_score({}, {})", id, score);

        if self.defs.get(id.index()).is_none() {
            warn!("Score for unknown leaderboard index {}", id.0);
            return Ok(false);
        }

        self.submit(id, score, authenticated)?;

        let local = self.my_score(id);
        if local >= score {
            debug!("No new highscore: score={}, local={}", score, local);
            return Ok(false);
        }

        self.events.emit(LedgerEvent::HighscoreObtained {
            leaderboard: id,
            score,
        });
        self.set_my_score(id, score)?;

        if self.settings.compare_top_scores {
            self.compare_score_to_table(id, TimeWindow::AllTime)?;
            if authenticated {
                self.compare_score_to_table(id, TimeWindow::Week)?;
                self.compare_score_to_table(id, TimeWindow::Today)?;
            }
        }
        Ok(true)
    }

    /// Forward a score to the platform, or keep it for later when the platform
    /// cannot take it right now
    fn submit(&self, id: LeaderboardId, score: i64, authenticated: bool) -> Result<()> {
        let def = self.def(id)?;
        let Some(external_id) = def.ids.for_kind(self.platform.kind()) else {
            debug!("Leaderboard '{}' has no id on {}", def.key, self.platform.kind());
            return Ok(());
        };

        if authenticated || self.platform.caches_offline_scores() {
            self.platform.submit_score(external_id, score);
        } else {
            self.cache_offline_score(def, score)?;
        }
        Ok(())
    }

    fn cache_offline_score(&self, def: &LeaderboardDef, score: i64) -> Result<()> {
        let key = offline_key(def);
        if score > self.store.get_int_or(&key, 0)? {
            self.store.set_int(&key, score)?;
        }
        Ok(())
    }

    /// Best score reported while logged out and not yet submitted
    pub fn offline_score(&self, id: LeaderboardId) -> Result<i64> {
        let def = self.def(id)?;
        self.store.get_int_or(&offline_key(def), 0)
    }

    /// Submit and clear every cached offline score. Returns the number submitted.
    pub fn flush_offline_scores(&self) -> Result<usize> {
        let mut flushed = 0;
        for def in &self.defs {
            let key = offline_key(def);
            let cached = self.store.get_int_or(&key, 0)?;
            if cached <= 0 {
                continue;
            }
            if let Some(external_id) = def.ids.for_kind(self.platform.kind()) {
                info!("Submitting offline '{}' score: {}", def.key, cached);
                self.platform.submit_score(external_id, cached);
                flushed += 1;
            }
            self.store.delete(&key)?;
        }
        Ok(flushed)
    }

    /// Merge the local best score into one cached table.
    ///
    /// Local tables are an offline stand-in: on change a fresh download is
    /// requested so platform data replaces them. Returns whether the table changed.
    pub fn compare_score_to_table(&mut self, id: LeaderboardId, window: TimeWindow) -> Result<bool> {
        debug!("compare_score_to_table({}, {})", id, window);

        let mine = self
            .my_entry(id)
            .cloned()
            .ok_or(LedgerError::UnknownLeaderboard(id))?;
        let outcome = self.tables.entry((id, window)).or_default().merge(&mine);

        debug!("compare_score_to_table: {:?}", outcome);

        if window == TimeWindow::AllTime {
            if let Some(rank) = outcome.rank {
                if rank != mine.rank {
                    self.set_my_rank(id, rank)?;
                }
            }
        }

        if outcome.changed {
            self.write_top_scores(id, window)?;
            if window == self.current_window {
                self.events.emit(LedgerEvent::TopScoresChanged(id));
            }
            self.download_top_scores(id, window);
        }
        Ok(outcome.changed)
    }

    // ========================================
    // TOP TABLES
    // ========================================

    pub fn top_scores(&self, id: LeaderboardId, window: TimeWindow) -> &[LeaderboardEntry] {
        self.tables
            .get(&(id, window))
            .map(|t| t.entries())
            .unwrap_or(&[])
    }

    pub fn top_score(&self, id: LeaderboardId, window: TimeWindow, index: usize) -> Option<&LeaderboardEntry> {
        self.tables.get(&(id, window)).and_then(|t| t.get(index))
    }

    /// Replace a table (capped at top-N) and persist it
    pub fn set_top_scores(
        &mut self,
        id: LeaderboardId,
        window: TimeWindow,
        entries: Vec<LeaderboardEntry>,
    ) -> Result<()> {
        self.def(id)?;
        let mut table = RankedTable::from_entries(entries);
        table.truncate(self.settings.top_n);
        self.tables.insert((id, window), table);
        self.write_top_scores(id, window)
    }

    fn write_top_scores(&self, id: LeaderboardId, window: TimeWindow) -> Result<()> {
        let def = self.def(id)?;
        let rows = self.top_scores(id, window);
        for (index, entry) in rows.iter().enumerate() {
            self.store
                .set_string(&top_row_key(def, window, index), &entry.to_row())?;
        }
        self.delete_rows_from(def, window, rows.len())
    }

    /// Delete stored rows from `start` up to the first gap. Rows are stored
    /// without gaps, so this also catches rows left over from a larger top-N.
    fn delete_rows_from(&self, def: &LeaderboardDef, window: TimeWindow, start: usize) -> Result<()> {
        let mut index = start;
        loop {
            let key = top_row_key(def, window, index);
            if self.store.get_string(&key)?.is_none() {
                return Ok(());
            }
            self.store.delete(&key)?;
            index += 1;
        }
    }

    fn read_top_scores(&mut self) -> Result<()> {
        for i in 0..self.defs.len() {
            let id = LeaderboardId(i as u32);
            let def = &self.defs[i];

            let never_saved = self
                .store
                .get_string(&top_row_key(def, TimeWindow::AllTime, 0))?
                .is_none();

            if never_saved {
                if self.settings.seed_presets {
                    self.seed_presets(id)?;
                }
                continue;
            }

            for window in TimeWindow::ALL {
                let mut table = RankedTable::new();
                let mut index = 0;
                while index < self.settings.top_n {
                    let Some(row) = self.store.get_string(&top_row_key(def, window, index))? else {
                        break;
                    };
                    match row.parse() {
                        Ok(entry) => table.push(entry),
                        Err(e) => warn!("Skipping top score row: {}", e),
                    }
                    index += 1;
                }
                // Rows past a lowered top-N
                self.delete_rows_from(def, window, index)?;
                self.tables.insert((id, window), table);
            }
        }
        Ok(())
    }

    fn seed_presets(&mut self, id: LeaderboardId) -> Result<()> {
        debug!("Seeding preset top scores for {}", id);
        let entries: Vec<LeaderboardEntry> = PRESET_SCORES
            .iter()
            .enumerate()
            .map(|(i, (name, score))| LeaderboardEntry::new(*name, i as u32 + 1, *score))
            .collect();
        for window in TimeWindow::ALL {
            self.set_top_scores(id, window, entries.clone())?;
        }
        Ok(())
    }

    // ========================================
    // WINDOWS
    // ========================================

    pub fn current_window(&self) -> TimeWindow {
        self.current_window
    }

    /// Select the window the UI shows; persisted across restarts
    pub fn set_current_window(&mut self, window: TimeWindow) -> Result<()> {
        self.current_window = window;
        self.store.set_int(KEY_CURRENT_WINDOW, window.index())
    }

    // ========================================
    // PLATFORM DOWNLOADS
    // ========================================

    pub fn download_top_scores(&self, id: LeaderboardId, window: TimeWindow) {
        if let Some(external_id) = self.external_id(id) {
            debug!("download_top_scores({}, {})", id, window);
            self.platform
                .load_top_scores(external_id, window, self.settings.top_n);
        }
    }

    pub fn download_all_top_scores(&self, window: TimeWindow) {
        for id in self.ids() {
            self.download_top_scores(id, window);
        }
    }

    /// Login completed: fetch my scores, flush the offline cache, fetch tables
    pub fn on_authenticated(&mut self) -> Result<()> {
        if self.settings.load_my_scores {
            for def in &self.defs {
                if let Some(external_id) = def.ids.for_kind(self.platform.kind()) {
                    self.platform.load_my_score(external_id);
                }
            }
        }

        self.flush_offline_scores()?;

        if self.settings.load_top_scores {
            self.download_all_top_scores(TimeWindow::AllTime);
        }
        Ok(())
    }

    /// Platform callback: a top table arrived.
    ///
    /// Replaces the cached table, then requests the next window so that
    /// All-Time, Week and Today are fetched in turn.
    pub fn on_top_scores_loaded(
        &mut self,
        external_id: &str,
        window: TimeWindow,
        entries: Vec<LeaderboardEntry>,
    ) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let Some(id) = self.id_for_external(external_id) else {
            warn!("Top scores for unknown leaderboard '{}'", external_id);
            return Ok(());
        };

        debug!("on_top_scores_loaded({}, {}, {} rows)", id, window, entries.len());

        self.set_top_scores(id, window, entries)?;
        self.events.emit(LedgerEvent::TopScoresLoaded {
            leaderboard: id,
            window,
            entries: self.top_scores(id, window).to_vec(),
        });

        if self.settings.load_top_scores {
            if let Some(next) = window.next() {
                self.download_top_scores(id, next);
            }
        }
        Ok(())
    }

    /// Platform callback: the player's own score arrived.
    ///
    /// Only the first result per leaderboard is used; it replaces the local
    /// record when higher.
    pub fn on_my_score_loaded(&mut self, external_id: &str, score: i64) -> Result<()> {
        let Some(id) = self.id_for_external(external_id) else {
            warn!("Score for unknown leaderboard '{}'", external_id);
            return Ok(());
        };
        if !self.my_score_loaded.insert(id) {
            return Ok(());
        }

        if self.my_score(id) < score {
            self.set_my_score(id, score)?;
        }
        self.events.emit(LedgerEvent::MyScoreLoaded {
            leaderboard: id,
            score,
        });
        Ok(())
    }

    // ========================================
    // MAINTENANCE
    // ========================================

    /// Forget the local player's scores
    pub fn clear_my_scores(&mut self) -> Result<()> {
        for def in &self.defs {
            self.store.delete(&my_entry_key(def))?;
        }
        self.read_my_entries()
    }

    /// Forget all cached top tables
    pub fn clear_top_scores(&mut self) -> Result<()> {
        for def in &self.defs {
            for window in TimeWindow::ALL {
                self.delete_rows_from(def, window, 0)?;
            }
        }
        self.tables.clear();
        Ok(())
    }
}

impl std::fmt::Debug for LeaderboardManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardManager")
            .field("leaderboards", &self.defs.len())
            .field("current_window", &self.current_window)
            .finish()
    }
}
