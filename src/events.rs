//! Change notifications
//!
//! Hosts register listeners on the [`EventBus`] and receive every event
//! emitted after registration. Listeners are called synchronously on the
//! emitting thread, in registration order.

use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::achievements::AchievementId;
use crate::leaderboards::{LeaderboardEntry, LeaderboardId, TimeWindow};

/// Events emitted by the ledger
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    AchievementProgressChanged(AchievementId),
    MyScoreLoaded {
        leaderboard: LeaderboardId,
        score: i64,
    },
    TopScoresLoaded {
        leaderboard: LeaderboardId,
        window: TimeWindow,
        entries: Vec<LeaderboardEntry>,
    },
    /// A table of the current window changed locally
    TopScoresChanged(LeaderboardId),
    HighscoreObtained {
        leaderboard: LeaderboardId,
        score: i64,
    },
    Authenticated,
    PlayerNameLoaded(String),
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&LedgerEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

/// Observer registry shared by the managers
#[derive(Default)]
pub struct EventBus {
    registry: Mutex<Registry>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for all future events
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&LedgerEvent) + Send + Sync + 'static,
    {
        let mut registry = match self.registry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        registry.next_id += 1;
        let id = SubscriptionId(registry.next_id);
        registry.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = match self.registry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = registry.listeners.len();
        registry.listeners.retain(|(sid, _)| *sid != id);
        registry.listeners.len() != before
    }

    /// Deliver an event to every registered listener
    pub fn emit(&self, event: LedgerEvent) {
        // Snapshot so listeners may (un)subscribe while being called
        let listeners: Vec<Listener> = match self.registry.lock() {
            Ok(registry) => registry.listeners.iter().map(|(_, l)| l.clone()).collect(),
            Err(_) => {
                warn!("Event registry poisoned, dropping {:?}", event);
                return;
            }
        };
        for listener in listeners {
            listener(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry
            .lock()
            .map(|r| r.listeners.len())
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
