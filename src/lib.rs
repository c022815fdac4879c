//! laurel - achievement and leaderboard bookkeeping
//!
//! laurel keeps a game's local progress in step with a social platform
//! service. It tracks tiered achievement groups and their rewards, keeps
//! ranked top-N leaderboard tables per time window, and merges the player's
//! best score into them so rankings work offline.
//!
//! ## Building blocks
//!
//! 1. **Store**: every counter and table row is persisted through a
//!    [`store::ProgressStore`] (SQLite or in-memory) on each mutation.
//!
//! 2. **Platform**: vendor services sit behind [`platform::SocialPlatform`].
//!    Requests are fire-and-forget; results come back through the `on_*`
//!    callbacks of [`Ledger`].
//!
//! 3. **Events**: listeners registered on [`events::EventBus`] hear about
//!    progress, highscores and table changes.

pub mod achievements;
pub mod config;
pub mod error;
pub mod events;
pub mod leaderboards;
pub mod ledger;
pub mod platform;
pub mod store;

pub use achievements::{AchievementId, Reward, RewardSink};
pub use config::Config;
pub use error::{ClaimError, LedgerError, Result};
pub use events::{EventBus, LedgerEvent};
pub use leaderboards::{LeaderboardEntry, LeaderboardId, TimeWindow};
pub use ledger::Ledger;
pub use platform::{PlatformKind, SocialPlatform};
pub use store::ProgressStore;
