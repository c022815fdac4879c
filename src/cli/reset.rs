//! Reset command implementation

use anyhow::{bail, Result};

use laurel::Ledger;

/// Wipe achievement progress, rewards and leaderboard records
pub fn reset_command(ledger: &mut Ledger, yes: bool) -> Result<()> {
    if !yes {
        bail!("This erases all progress. Re-run with --yes to confirm.");
    }

    ledger.achievements().reset_all()?;
    let boards = ledger.leaderboards_mut();
    boards.clear_my_scores()?;
    boards.clear_top_scores()?;

    println!("Progress reset.");
    Ok(())
}
