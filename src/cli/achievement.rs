//! Achievement commands: report progress and claim rewards

use anyhow::{anyhow, Result};

use laurel::{Ledger, Reward, RewardSink};

/// Prints granted rewards; the command line has no inventory to fill
struct ConsoleSink;

impl RewardSink for ConsoleSink {
    fn can_obtain(&self, _reward: &Reward) -> bool {
        true
    }

    fn grant(&mut self, reward: &Reward) {
        println!("  + {}", reward);
    }
}

/// Report progress for an achievement group
pub fn progress_command(ledger: &Ledger, key: &str, value: i64) -> Result<()> {
    let id = ledger
        .achievements()
        .id_for(key)
        .ok_or_else(|| anyhow!("Unknown achievement: {}", key))?;

    if !ledger.report_progress(id, value)? {
        println!("{}: unchanged", key);
        return Ok(());
    }

    let group = ledger.achievements().group(id)?;
    let progress = group.progress()?;
    println!("{}: progress {}", key, progress);

    for (index, tier) in group.tiers().iter().enumerate() {
        let mark = if group.is_rewarded(index)? {
            "rewarded"
        } else if group.is_completed(index)? {
            "completed"
        } else {
            "locked"
        };
        println!("  tier {} ({:>6}): {}", index, tier.requirement, mark);
    }
    Ok(())
}

/// Claim a tier reward; the next claimable tier when none is given
pub fn claim_command(ledger: &Ledger, key: &str, tier: Option<usize>) -> Result<()> {
    let id = ledger
        .achievements()
        .id_for(key)
        .ok_or_else(|| anyhow!("Unknown achievement: {}", key))?;
    let group = ledger.achievements().group(id)?;

    let tier = match tier {
        Some(tier) => tier,
        None => (group.rewarded_cursor()? + 1) as usize,
    };

    println!("Claiming {} tier {}", key, tier);
    ledger.claim_reward(id, tier, &mut ConsoleSink)?;
    Ok(())
}
