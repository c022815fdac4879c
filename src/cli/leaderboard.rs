//! Leaderboard commands: report a score and print a top table

use anyhow::{anyhow, Result};

use laurel::{LeaderboardId, Ledger, TimeWindow};

fn resolve(ledger: &Ledger, key: &str) -> Result<LeaderboardId> {
    ledger
        .leaderboards()
        .id_for(key)
        .ok_or_else(|| anyhow!("Unknown leaderboard: {}", key))
}

/// Report a finished game's score
pub fn score_command(ledger: &mut Ledger, key: &str, score: i64) -> Result<()> {
    let id = resolve(ledger, key)?;

    if ledger.report_score(id, score)? {
        let rank = ledger.leaderboards().my_rank(id, TimeWindow::AllTime);
        println!("New highscore on {}: {} (rank {})", key, score, rank);
    } else {
        println!(
            "{}: {} does not beat {}",
            key,
            score,
            ledger.leaderboards().my_score(id)
        );
    }
    Ok(())
}

/// Print the cached top table of a leaderboard
pub fn top_command(ledger: &mut Ledger, key: &str, window: Option<TimeWindow>) -> Result<()> {
    let id = resolve(ledger, key)?;

    let window = match window {
        Some(window) => {
            ledger.leaderboards_mut().set_current_window(window)?;
            window
        }
        None => ledger.leaderboards().current_window(),
    };

    let boards = ledger.leaderboards();
    let rows = boards.top_scores(id, window);
    if rows.is_empty() {
        println!("No scores for {} ({}).", key, window);
        return Ok(());
    }

    println!("{} ({}):\n", key, window);
    let me = boards.my_name();
    for entry in rows {
        let marker = if entry.name == me { "*" } else { " " };
        println!("{} {:>3}. {:<20} {:>10}", marker, entry.rank, entry.name, entry.score);
    }
    Ok(())
}
