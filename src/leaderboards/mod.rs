//! Leaderboards: the local player's best scores and per-window top tables

mod definitions;
mod entry;
mod manager;
mod table;
mod window;

pub use definitions::{LeaderboardDef, LeaderboardId};
pub use entry::{LeaderboardEntry, PLACEHOLDER_NAME, PLACEHOLDER_RANK};
pub use manager::{LeaderboardManager, PRESET_SCORES};
pub use table::{MergeOutcome, RankedTable};
pub use window::TimeWindow;
