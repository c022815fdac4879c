//! Achievement Manager - reporting, rewards and platform reconciliation
//!
//! Owns every configured [`AchievementGroup`]. Progress reports update the
//! local counter first and are pushed to the platform only while logged in;
//! achievement listings coming back from the platform are reconciled against
//! local progress so that neither side loses progress made on the other.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::definitions::{AchievementGroupDef, AchievementId, AchievementTier, RewardSink};
use super::group::AchievementGroup;
use crate::config::AchievementSettings;
use crate::error::{LedgerError, Result};
use crate::events::{EventBus, LedgerEvent};
use crate::platform::{PlatformAchievement, PlatformProgress, SocialPlatform};
use crate::store::ProgressStore;

pub struct AchievementManager {
    groups: Vec<AchievementGroup>,
    settings: AchievementSettings,
    platform: Arc<dyn SocialPlatform>,
    events: Arc<EventBus>,
}

impl AchievementManager {
    pub fn new(
        defs: Vec<AchievementGroupDef>,
        settings: AchievementSettings,
        store: Arc<dyn ProgressStore>,
        platform: Arc<dyn SocialPlatform>,
        events: Arc<EventBus>,
    ) -> Self {
        let groups = defs
            .into_iter()
            .enumerate()
            .map(|(i, def)| AchievementGroup::new(AchievementId(i as u32), def, store.clone()))
            .collect();
        Self {
            groups,
            settings,
            platform,
            events,
        }
    }

    // ========================================
    // LOOKUPS
    // ========================================

    pub fn groups(&self) -> &[AchievementGroup] {
        &self.groups
    }

    pub fn group(&self, id: AchievementId) -> Result<&AchievementGroup> {
        self.groups.get(id.index()).ok_or_else(|| {
            warn!("Invalid achievement {}", id);
            LedgerError::UnknownAchievement(id)
        })
    }

    pub fn id_for(&self, key: &str) -> Option<AchievementId> {
        self.groups
            .iter()
            .position(|g| g.def().key == key)
            .map(|i| AchievementId(i as u32))
    }

    pub fn settings(&self) -> &AchievementSettings {
        &self.settings
    }

    fn external_id<'a>(&self, tier: &'a AchievementTier) -> Option<&'a str> {
        tier.ids.for_kind(self.platform.kind())
    }

    // ========================================
    // REPORTING
    // ========================================

    /// Report progress: a delta for incremental groups, a total otherwise.
    ///
    /// Returns false when nothing changed (unknown group, or an absolute
    /// report equal to the current total).
    pub fn report(&self, id: AchievementId, total_or_increment: i64, authenticated: bool) -> Result<bool> {
        debug!("report({}, {})", id, total_or_increment);

        let Some(group) = self.groups.get(id.index()) else {
            warn!("report: invalid achievement {}", id);
            return Ok(false);
        };

        if !group.is_incremental() && group.progress()? == total_or_increment {
            return Ok(false);
        }

        let progress = group.add_or_set_progress(total_or_increment)?;
        self.events.emit(LedgerEvent::AchievementProgressChanged(id));

        if authenticated {
            self.push_progress(group, progress, total_or_increment);
        }
        Ok(true)
    }

    fn push_progress(&self, group: &AchievementGroup, progress: i64, total_or_increment: i64) {
        for tier in group.tiers() {
            let Some(external_id) = self.external_id(tier) else {
                continue;
            };
            if group.is_incremental() {
                if tier.requirement == 1 {
                    self.platform.unlock_achievement(external_id);
                } else {
                    self.platform
                        .increment_achievement(external_id, total_or_increment);
                }
            } else if progress >= tier.requirement {
                self.platform.unlock_achievement(external_id);
            }
        }
    }

    // ========================================
    // REWARDS
    // ========================================

    /// True if any group has a completed tier waiting to be claimed
    pub fn has_any_reward(&self) -> Result<bool> {
        for group in &self.groups {
            if group.has_unclaimed_reward()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn claim_reward(&self, id: AchievementId, tier: usize, sink: &mut dyn RewardSink) -> Result<()> {
        self.group(id)?.claim_reward(tier, sink)
    }

    pub fn ongoing_tier(&self, id: AchievementId) -> Result<Option<(usize, &AchievementTier)>> {
        self.group(id)?.ongoing_tier()
    }

    // ========================================
    // PLATFORM SYNC
    // ========================================

    /// Login completed: request the player's achievement states
    pub fn on_authenticated(&self) {
        if self.settings.load_on_start {
            debug!("Loading platform achievements");
            self.platform.load_achievements();
        }
    }

    /// Platform callback: reconcile an achievement listing with local progress.
    ///
    /// Percentages are converted to steps of the matching tier and adopted
    /// only when they lead local progress by more than the sync slack.
    /// Incremental step counts are pushed or adopted, whichever side is
    /// behind. Absolute groups unlock the tiers already met locally.
    pub fn on_platform_achievements_loaded(&self, achievements: &[PlatformAchievement]) -> Result<()> {
        debug!("on_platform_achievements_loaded({} entries)", achievements.len());

        for remote in achievements {
            for group in &self.groups {
                for tier in group.tiers() {
                    if self.external_id(tier) != Some(remote.external_id.as_str()) {
                        continue;
                    }
                    self.reconcile(group, tier, remote)?;
                }
            }
        }
        Ok(())
    }

    fn reconcile(&self, group: &AchievementGroup, tier: &AchievementTier, remote: &PlatformAchievement) -> Result<()> {
        let local = group.progress()?;
        let external_id = remote.external_id.as_str();

        match remote.progress {
            PlatformProgress::Percent(percent) => {
                let steps = (percent / 100.0 * tier.requirement as f64).round() as i64;
                if local < steps - self.settings.sync_slack {
                    info!(
                        "Adopting platform progress for '{}': {} -> {}",
                        group.def().key,
                        local,
                        steps
                    );
                    group.set_progress(steps)?;
                    self.events
                        .emit(LedgerEvent::AchievementProgressChanged(group.id()));
                }
            }
            PlatformProgress::Steps(steps) if group.is_incremental() => {
                if local > steps {
                    debug!("Pushing {} offline steps to '{}'", local - steps, external_id);
                    self.platform.increment_achievement(external_id, local - steps);
                } else if local < steps {
                    info!(
                        "Adopting platform steps for '{}': {} -> {}",
                        group.def().key,
                        local,
                        steps
                    );
                    group.set_progress(steps)?;
                    self.events
                        .emit(LedgerEvent::AchievementProgressChanged(group.id()));
                }
            }
            PlatformProgress::Steps(_) => {
                if local >= tier.requirement {
                    self.platform.unlock_achievement(external_id);
                }
            }
        }
        Ok(())
    }

    /// Open the platform's achievement UI
    pub fn show_platform_achievements(&self) {
        self.platform.show_achievements();
    }

    // ========================================
    // MAINTENANCE
    // ========================================

    /// Zero every group's progress and rewards
    pub fn reset_all(&self) -> Result<()> {
        for group in &self.groups {
            group.reset_progress()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for AchievementManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AchievementManager")
            .field("groups", &self.groups.len())
            .field("platform", &self.platform.kind())
            .finish()
    }
}
