//! Login state for the social platform
//!
//! Tracks whether the player is authenticated and remembers a failed login so
//! silent retries stop until the player asks for one explicitly.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::SocialPlatform;
use crate::error::Result;
use crate::events::{EventBus, LedgerEvent};
use crate::store::ProgressStore;

/// Store key: 1 if the last login succeeded, 0 if it failed
pub(crate) const KEY_PREVIOUS_LOGIN: &str = "platform.previous_login";

pub struct PlatformSession {
    store: Arc<dyn ProgressStore>,
    platform: Arc<dyn SocialPlatform>,
    events: Arc<EventBus>,
    authenticated: bool,
    last_attempt_failed: bool,
    forcing: bool,
    player_name: Option<String>,
}

impl PlatformSession {
    pub fn new(
        store: Arc<dyn ProgressStore>,
        platform: Arc<dyn SocialPlatform>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            store,
            platform,
            events,
            authenticated: false,
            last_attempt_failed: false,
            forcing: false,
            player_name: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// True after a failed login until a login succeeds
    pub fn last_attempt_failed(&self) -> bool {
        self.last_attempt_failed
    }

    /// True while a login started with the platform UI is outstanding
    pub fn is_forcing(&self) -> bool {
        self.forcing
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    /// Decide whether to log in at launch.
    ///
    /// With `login_on_start`, log in unless the previous attempt failed. Without
    /// it, log in only if the previous attempt succeeded.
    pub fn should_login_on_start(&self, login_on_start: bool) -> Result<bool> {
        if login_on_start {
            let previous = self.store.get_int_or(KEY_PREVIOUS_LOGIN, 1)?;
            if previous != 1 {
                info!("Previous login failed, skipping login at start");
            }
            Ok(previous == 1)
        } else {
            Ok(self.store.get_int_or(KEY_PREVIOUS_LOGIN, 0)? == 1)
        }
    }

    /// Launch-time login, honouring the previous outcome
    pub fn start(&mut self, login_on_start: bool) -> Result<bool> {
        if self.should_login_on_start(login_on_start)? {
            Ok(self.try_authenticate(false))
        } else {
            Ok(false)
        }
    }

    /// Ask the platform to log in. Returns true if a request was issued.
    ///
    /// Does nothing when already authenticated, or when the last attempt failed
    /// and `force` is not set.
    pub fn try_authenticate(&mut self, force: bool) -> bool {
        debug!(
            "try_authenticate(force={}) authenticated={} last_failed={}",
            force, self.authenticated, self.last_attempt_failed
        );

        if self.authenticated {
            return false;
        }
        if self.last_attempt_failed && !force {
            return false;
        }

        self.forcing = force;
        self.platform.authenticate(force);
        true
    }

    /// Platform callback: login succeeded.
    ///
    /// Returns false if the session was already authenticated (duplicate callback).
    pub fn on_authentication_succeeded(&mut self, player_name: Option<String>) -> Result<bool> {
        if self.authenticated {
            debug!("Duplicate authentication callback ignored");
            return Ok(false);
        }

        self.authenticated = true;
        self.last_attempt_failed = false;
        self.forcing = false;
        self.store.set_int(KEY_PREVIOUS_LOGIN, 1)?;

        let name = player_name.or_else(|| self.platform.player_name());
        if let Some(name) = &name {
            info!("Authenticated as {}", name);
            self.events.emit(LedgerEvent::PlayerNameLoaded(name.clone()));
        }
        self.player_name = name;

        self.events.emit(LedgerEvent::Authenticated);
        Ok(true)
    }

    /// Platform callback: login failed
    pub fn on_authentication_failed(&mut self, reason: &str) -> Result<()> {
        warn!("Authentication failed: {}", reason);
        self.store.set_int(KEY_PREVIOUS_LOGIN, 0)?;
        self.last_attempt_failed = true;
        self.forcing = false;
        Ok(())
    }
}

impl std::fmt::Debug for PlatformSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformSession")
            .field("platform", &self.platform.kind())
            .field("authenticated", &self.authenticated)
            .field("last_attempt_failed", &self.last_attempt_failed)
            .finish()
    }
}
