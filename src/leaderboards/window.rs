//! Leaderboard time windows

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Time scope of a leaderboard table. Each window has its own table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    #[default]
    AllTime,
    Week,
    Today,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 3] = [Self::AllTime, Self::Week, Self::Today];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllTime => "all_time",
            Self::Week => "week",
            Self::Today => "today",
        }
    }

    /// Stable integer used when persisting the selected window
    pub fn index(&self) -> i64 {
        match self {
            Self::AllTime => 0,
            Self::Week => 1,
            Self::Today => 2,
        }
    }

    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::AllTime),
            1 => Some(Self::Week),
            2 => Some(Self::Today),
            _ => None,
        }
    }

    /// Window downloaded after this one when refreshing all tables
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::AllTime => Some(Self::Week),
            Self::Week => Some(Self::Today),
            Self::Today => None,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "all_time" | "alltime" | "all" => Ok(Self::AllTime),
            "week" => Ok(Self::Week),
            "today" | "day" => Ok(Self::Today),
            other => Err(format!("unknown time window: {other}")),
        }
    }
}
