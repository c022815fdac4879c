//! Error types for the bookkeeping core

use crate::achievements::AchievementId;
use crate::leaderboards::LeaderboardId;

/// Convenience alias used across the library
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors produced by the ledger, its managers and stores
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Malformed leaderboard row: {0:?}")]
    MalformedEntry(String),

    #[error("Unknown achievement: {0}")]
    UnknownAchievement(AchievementId),

    #[error("Unknown leaderboard: {0}")]
    UnknownLeaderboard(LeaderboardId),

    #[error("Reward claim rejected: {0}")]
    Claim(#[from] ClaimError),
}

/// Reasons a reward claim is refused. The group state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    #[error("tier {tier} is already rewarded")]
    AlreadyRewarded { tier: usize },

    #[error("tier {tier} is out of range ({tiers} tiers)")]
    InvalidTier { tier: usize, tiers: usize },

    #[error("tier {tier} claimed out of order, next claimable tier is {expected}")]
    OutOfOrder { tier: usize, expected: usize },

    #[error("tier {tier} is not completed yet")]
    NotCompleted { tier: usize },

    #[error("no reward configured for tier {tier}")]
    RewardMissing { tier: usize },

    #[error("reward for tier {tier} is not obtainable right now")]
    RewardNotObtainable { tier: usize },
}
