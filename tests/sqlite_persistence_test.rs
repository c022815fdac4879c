//! Ledger state kept in a SQLite file survives a restart

mod common;

use std::sync::Arc;

use common::{ledger_on, test_config, RecordingPlatform, Wallet};
use laurel::leaderboards::LeaderboardEntry;
use laurel::platform::PlatformKind;
use laurel::store::{ProgressStore, SqliteStore};
use laurel::TimeWindow;
use tempfile::TempDir;

fn open(dir: &TempDir) -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open(&dir.path().join("ledger.db")).expect("Failed to open store"))
}

#[test]
fn test_progress_rewards_and_scores_survive_reopen() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let platform = Arc::new(RecordingPlatform::new(PlatformKind::PlayGames));

    {
        let mut ledger = ledger_on(test_config(), open(&dir), platform.clone());
        let kills = ledger.achievements().id_for("kills").unwrap();
        let board = ledger.leaderboards().id_for("distance").unwrap();

        ledger.report_progress(kills, 25).unwrap();
        ledger.claim_reward(kills, 0, &mut Wallet::default()).unwrap();
        ledger
            .leaderboards_mut()
            .set_current_window(TimeWindow::Week)
            .unwrap();
        ledger.report_score(board, 2400).unwrap();
    }

    let ledger = ledger_on(test_config(), open(&dir), platform);
    let kills = ledger.achievements().id_for("kills").unwrap();
    let board = ledger.leaderboards().id_for("distance").unwrap();

    let group = ledger.achievements().group(kills).unwrap();
    assert_eq!(group.progress().unwrap(), 25);
    assert_eq!(group.rewarded_cursor().unwrap(), 0);
    assert!(!group.has_unclaimed_reward().unwrap());

    let boards = ledger.leaderboards();
    assert_eq!(boards.my_entry(board), Some(&LeaderboardEntry::new("You", 3, 2400)));
    assert_eq!(boards.top_scores(board, TimeWindow::AllTime)[2].score, 2400);
    assert_eq!(boards.top_scores(board, TimeWindow::AllTime).len(), 10);
    assert_eq!(boards.current_window(), TimeWindow::Week);
    assert_eq!(boards.offline_score(board).unwrap(), 2400);
}

#[test]
fn test_rows_use_wire_format() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = open(&dir);
    let platform = Arc::new(RecordingPlatform::new(PlatformKind::PlayGames));
    let mut ledger = ledger_on(test_config(), store.clone(), platform);
    let board = ledger.leaderboards().id_for("distance").unwrap();

    ledger.report_score(board, 150).unwrap();

    assert_eq!(
        store.get_string("leaderboard.my.distance").unwrap().as_deref(),
        Some("You|10|150")
    );
    assert_eq!(
        store
            .get_string("leaderboard.top.distance.all_time.9")
            .unwrap()
            .as_deref(),
        Some("You|10|150")
    );
}

#[test]
fn test_malformed_row_falls_back_to_placeholder() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = open(&dir);
    store.set_string("leaderboard.my.distance", "garbage").unwrap();

    let platform = Arc::new(RecordingPlatform::new(PlatformKind::PlayGames));
    let ledger = ledger_on(test_config(), store, platform);
    let board = ledger.leaderboards().id_for("distance").unwrap();

    assert_eq!(ledger.leaderboards().my_entry(board), Some(&LeaderboardEntry::placeholder()));
}
