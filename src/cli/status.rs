//! Status command implementation

use anyhow::Result;
use serde::Serialize;

use laurel::{Ledger, TimeWindow};

#[derive(Debug, Serialize)]
struct StatusReport {
    platform: String,
    authenticated: bool,
    has_reward: bool,
    achievements: Vec<AchievementStatus>,
    leaderboards: Vec<LeaderboardStatus>,
}

#[derive(Debug, Serialize)]
struct AchievementStatus {
    key: String,
    name: String,
    progress: i64,
    rewarded_tier: i64,
    ongoing_tier: Option<usize>,
    ongoing_requirement: Option<i64>,
    tiers: usize,
}

#[derive(Debug, Serialize)]
struct LeaderboardStatus {
    key: String,
    name: String,
    score: i64,
    rank: u32,
    offline_score: i64,
}

fn collect(ledger: &Ledger) -> Result<StatusReport> {
    let mut achievements = Vec::new();
    for group in ledger.achievements().groups() {
        let ongoing = group.ongoing_tier()?;
        achievements.push(AchievementStatus {
            key: group.def().key.clone(),
            name: group.def().name.clone(),
            progress: group.progress()?,
            rewarded_tier: group.rewarded_cursor()?,
            ongoing_tier: ongoing.map(|(index, _)| index),
            ongoing_requirement: ongoing.map(|(_, tier)| tier.requirement),
            tiers: group.tiers().len(),
        });
    }

    let boards = ledger.leaderboards();
    let mut leaderboards = Vec::new();
    for id in boards.ids() {
        let def = boards.def(id)?;
        leaderboards.push(LeaderboardStatus {
            key: def.key.clone(),
            name: def.name.clone(),
            score: boards.my_score(id),
            rank: boards.my_rank(id, TimeWindow::AllTime),
            offline_score: boards.offline_score(id)?,
        });
    }

    Ok(StatusReport {
        platform: ledger.platform().kind().to_string(),
        authenticated: ledger.session().is_authenticated(),
        has_reward: ledger.achievements().has_any_reward()?,
        achievements,
        leaderboards,
    })
}

/// Show achievement progress and leaderboard records
pub fn status_command(ledger: &Ledger, json: bool) -> Result<()> {
    let report = collect(ledger)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Platform: {} ({})\n",
        report.platform,
        if report.authenticated { "logged in" } else { "offline" }
    );

    println!("Achievements ({}):", report.achievements.len());
    for a in &report.achievements {
        let next = match (a.ongoing_tier, a.ongoing_requirement) {
            (Some(tier), Some(req)) => format!("tier {} at {}", tier, req),
            _ => "no tiers".to_string(),
        };
        println!(
            "  {:<16} progress {:>8}  rewarded {:>2}/{}  {}",
            a.key,
            a.progress,
            a.rewarded_tier + 1,
            a.tiers,
            next
        );
    }
    if report.has_reward {
        println!("  Rewards waiting to be claimed.");
    }

    println!("\nLeaderboards ({}):", report.leaderboards.len());
    for l in &report.leaderboards {
        print!("  {:<16} best {:>10}  rank {:>3}", l.key, l.score, l.rank);
        if l.offline_score > 0 {
            print!("  (offline: {})", l.offline_score);
        }
        println!();
    }

    Ok(())
}
