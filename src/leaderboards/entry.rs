//! Leaderboard rows and their persisted `name|rank|score` form

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Name shown for the local player until the platform provides one
pub const PLACEHOLDER_NAME: &str = "You";

/// Rank given to the local player before any table comparison (just below a top 10)
pub const PLACEHOLDER_RANK: u32 = 11;

/// One row of a leaderboard.
///
/// Scores of fractional leaderboards are stored ×100, e.g. 19.99 as 1999.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub rank: u32,
    pub score: i64,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, rank: u32, score: i64) -> Self {
        Self {
            name: name.into(),
            rank,
            score,
        }
    }

    /// The local player's record before anything was reported or loaded
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_NAME, PLACEHOLDER_RANK, 0)
    }

    /// Copy of this entry at another rank
    pub fn with_rank(&self, rank: u32) -> Self {
        Self {
            name: self.name.clone(),
            rank,
            score: self.score,
        }
    }

    /// Score scaled back to its fractional value, e.g. 1999 -> 19.99
    pub fn float_score(&self) -> f64 {
        if self.score <= 0 {
            return 0.0;
        }
        self.score as f64 / 100.0
    }

    /// Persisted row form
    pub fn to_row(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LeaderboardEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.name, self.rank, self.score)
    }
}

impl FromStr for LeaderboardEntry {
    type Err = LedgerError;

    /// Parse a `name|rank|score` row. Fields after the third are ignored.
    fn from_str(row: &str) -> Result<Self, Self::Err> {
        let malformed = || LedgerError::MalformedEntry(row.to_string());

        let mut fields = row.split('|');
        let (Some(name), Some(rank), Some(score)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(malformed());
        };

        Ok(Self {
            name: name.to_string(),
            rank: rank.trim().parse().map_err(|_| malformed())?,
            score: score.trim().parse().map_err(|_| malformed())?,
        })
    }
}
