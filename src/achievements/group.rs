//! Achievement group progress and rewards
//!
//! A group owns ordered tiers that share one progress counter and one
//! rewarded-tier cursor. Each tier moves Locked → Completed → Rewarded:
//! progress completes it, an explicit claim rewards it. Claims go strictly in
//! tier order, so the cursor never moves backwards.

use std::sync::Arc;

use tracing::{debug, error};

use super::definitions::{AchievementGroupDef, AchievementId, AchievementTier, Reward, RewardSink};
use crate::error::{ClaimError, Result};
use crate::store::ProgressStore;

/// Int dictionary of progress counters of in-game groups, by group id
const KEY_PROGRESS: &str = "achievement.progress";
/// Int dictionary of rewarded cursors, by group id
const KEY_REWARDED: &str = "achievement.rewarded";

/// Cursor value before the first claim
pub const NOT_REWARDED: i64 = -1;

pub struct AchievementGroup {
    id: AchievementId,
    def: AchievementGroupDef,
    store: Arc<dyn ProgressStore>,
}

impl AchievementGroup {
    pub fn new(id: AchievementId, def: AchievementGroupDef, store: Arc<dyn ProgressStore>) -> Self {
        Self { id, def, store }
    }

    pub fn id(&self) -> AchievementId {
        self.id
    }

    pub fn def(&self) -> &AchievementGroupDef {
        &self.def
    }

    pub fn tiers(&self) -> &[AchievementTier] {
        &self.def.tiers
    }

    pub fn is_incremental(&self) -> bool {
        self.def.incremental
    }

    // ========================================
    // PROGRESS
    // ========================================

    /// Current shared counter (0 if never reported)
    pub fn progress(&self) -> Result<i64> {
        if self.def.in_game {
            Ok(self
                .store
                .get_int_map_entry(KEY_PROGRESS, self.id.0)?
                .unwrap_or(0))
        } else {
            self.store.get_int_or(&self.standalone_progress_key(), 0)
        }
    }

    pub fn set_progress(&self, value: i64) -> Result<()> {
        if self.def.in_game {
            self.store.set_int_map_entry(KEY_PROGRESS, self.id.0, value)
        } else {
            self.store.set_int(&self.standalone_progress_key(), value)
        }
    }

    fn standalone_progress_key(&self) -> String {
        format!("{}.{}", KEY_PROGRESS, self.def.key)
    }

    /// Add to the counter (incremental groups) or replace it. No clamping.
    /// Returns the new progress.
    pub fn add_or_set_progress(&self, total_or_increment: i64) -> Result<i64> {
        let progress = if self.def.incremental {
            self.progress()? + total_or_increment
        } else {
            total_or_increment
        };
        self.set_progress(progress)?;
        Ok(progress)
    }

    fn completed_at(&self, progress: i64, tier: usize) -> bool {
        self.def
            .tiers
            .get(tier)
            .is_some_and(|t| progress >= t.requirement)
    }

    /// False for tiers out of range
    pub fn is_completed(&self, tier: usize) -> Result<bool> {
        Ok(self.completed_at(self.progress()?, tier))
    }

    // ========================================
    // REWARDS
    // ========================================

    /// Highest rewarded tier index, [`NOT_REWARDED`] if none
    pub fn rewarded_cursor(&self) -> Result<i64> {
        Ok(self
            .store
            .get_int_map_entry(KEY_REWARDED, self.id.0)?
            .unwrap_or(NOT_REWARDED))
    }

    fn set_rewarded_cursor(&self, cursor: i64) -> Result<()> {
        self.store.set_int_map_entry(KEY_REWARDED, self.id.0, cursor)
    }

    pub fn is_rewarded(&self, tier: usize) -> Result<bool> {
        let cursor = self.rewarded_cursor()?;
        Ok(cursor >= 0 && tier <= cursor as usize)
    }

    /// True if some completed tier has not been claimed yet.
    ///
    /// The scan stops at the first incomplete tier.
    pub fn has_unclaimed_reward(&self) -> Result<bool> {
        let progress = self.progress()?;
        let cursor = self.rewarded_cursor()?;
        for tier in 0..self.def.tiers.len() {
            if !self.completed_at(progress, tier) {
                return Ok(false);
            }
            if tier as i64 > cursor {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Claim the reward of `tier` and grant it through `sink`.
    ///
    /// Only the tier right after the cursor can be claimed, and only once it
    /// is completed. A rejected claim changes nothing.
    pub fn claim_reward(&self, tier: usize, sink: &mut dyn RewardSink) -> Result<()> {
        let cursor = self.rewarded_cursor()?;
        let progress = self.progress()?;
        let reward = match self.check_claim(tier, cursor, progress, &*sink) {
            Ok(reward) => reward.clone(),
            Err(e) => {
                error!("claim_reward({}, tier {}) rejected: {}", self.def.key, tier, e);
                return Err(e.into());
            }
        };

        sink.grant(&reward);
        self.set_rewarded_cursor(tier as i64)?;
        debug!("Claimed {} for '{}' tier {}", reward, self.def.key, tier);
        Ok(())
    }

    fn check_claim(
        &self,
        tier: usize,
        cursor: i64,
        progress: i64,
        sink: &dyn RewardSink,
    ) -> std::result::Result<&Reward, ClaimError> {
        let tiers = self.def.tiers.len();

        if cursor >= 0 && tier <= cursor as usize {
            return Err(ClaimError::AlreadyRewarded { tier });
        }
        if tier >= tiers {
            return Err(ClaimError::InvalidTier { tier, tiers });
        }
        let expected = (cursor + 1) as usize;
        if tier != expected {
            return Err(ClaimError::OutOfOrder { tier, expected });
        }
        if !self.completed_at(progress, tier) {
            return Err(ClaimError::NotCompleted { tier });
        }
        let Some(reward) = self.def.tiers[tier].reward.as_ref() else {
            return Err(ClaimError::RewardMissing { tier });
        };
        if !sink.can_obtain(reward) {
            return Err(ClaimError::RewardNotObtainable { tier });
        }
        Ok(reward)
    }

    /// First tier not both completed and rewarded, or the last tier once
    /// everything is cleared. None for a group without tiers.
    pub fn ongoing_tier(&self) -> Result<Option<(usize, &AchievementTier)>> {
        let progress = self.progress()?;
        let cursor = self.rewarded_cursor()?;
        for (index, tier) in self.def.tiers.iter().enumerate() {
            if !self.completed_at(progress, index) || index as i64 > cursor {
                return Ok(Some((index, tier)));
            }
        }
        Ok(self.def.tiers.len().checked_sub(1).map(|last| (last, &self.def.tiers[last])))
    }

    // ========================================
    // DEBUG HELPERS
    // ========================================

    /// Set progress to the requirement of the next incomplete tier.
    /// Returns false when every tier is already completed.
    pub fn complete_next(&self) -> Result<bool> {
        let progress = self.progress()?;
        let next = (0..self.def.tiers.len()).find(|&t| !self.completed_at(progress, t));
        match next {
            Some(tier) => {
                self.set_progress(self.def.tiers[tier].requirement)?;
                Ok(true)
            }
            None => {
                debug!("'{}': all tiers completed", self.def.key);
                Ok(false)
            }
        }
    }

    /// Claim the next completed, unrewarded tier. Returns the claimed tier.
    pub fn reward_next(&self, sink: &mut dyn RewardSink) -> Result<Option<usize>> {
        let progress = self.progress()?;
        let cursor = self.rewarded_cursor()?;
        let next = (0..self.def.tiers.len())
            .find(|&t| self.completed_at(progress, t) && t as i64 > cursor);
        match next {
            Some(tier) => {
                self.claim_reward(tier, sink)?;
                Ok(Some(tier))
            }
            None => {
                debug!("'{}': nothing to reward", self.def.key);
                Ok(None)
            }
        }
    }

    /// Back to zero progress and no rewards
    pub fn reset_progress(&self) -> Result<()> {
        self.set_progress(0)?;
        self.set_rewarded_cursor(NOT_REWARDED)
    }
}

impl std::fmt::Debug for AchievementGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AchievementGroup")
            .field("id", &self.id)
            .field("key", &self.def.key)
            .field("incremental", &self.def.incremental)
            .field("in_game", &self.def.in_game)
            .field("tiers", &self.def.tiers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::store::MemoryStore;

    #[derive(Default)]
    struct Wallet {
        granted: Vec<Reward>,
        full: bool,
    }

    impl RewardSink for Wallet {
        fn can_obtain(&self, _reward: &Reward) -> bool {
            !self.full
        }

        fn grant(&mut self, reward: &Reward) {
            self.granted.push(reward.clone());
        }
    }

    fn kills(store: Arc<MemoryStore>) -> AchievementGroup {
        let tiers = [10, 50, 100]
            .into_iter()
            .map(|r| AchievementTier::new(r).with_reward(Reward::new("coins", r)))
            .collect();
        AchievementGroup::new(
            AchievementId(0),
            AchievementGroupDef::new("kills", true, tiers),
            store,
        )
    }

    fn claim_err(result: Result<()>) -> ClaimError {
        match result {
            Err(LedgerError::Claim(e)) => e,
            other => panic!("expected claim error, got {other:?}"),
        }
    }

    #[test]
    fn test_first_tier_completion() {
        let group = kills(Arc::new(MemoryStore::new()));

        assert_eq!(group.add_or_set_progress(10).unwrap(), 10);

        assert!(group.is_completed(0).unwrap());
        assert!(!group.is_completed(1).unwrap());
        assert!(!group.is_completed(2).unwrap());
        let (index, tier) = group.ongoing_tier().unwrap().unwrap();
        assert_eq!(index, 0);
        assert_eq!(tier.requirement, 10);
        assert!(group.has_unclaimed_reward().unwrap());
    }

    #[test]
    fn test_out_of_range_never_completed() {
        let group = kills(Arc::new(MemoryStore::new()));
        group.add_or_set_progress(1_000_000).unwrap();
        assert!(group.is_completed(2).unwrap());
        assert!(!group.is_completed(3).unwrap());
        assert!(!group.is_completed(usize::MAX).unwrap());
    }

    #[test]
    fn test_absolute_progress_replaces() {
        let store = Arc::new(MemoryStore::new());
        let group = AchievementGroup::new(
            AchievementId(1),
            AchievementGroupDef::new("best_run", false, vec![AchievementTier::new(100)]),
            store,
        );
        group.add_or_set_progress(150).unwrap();
        group.add_or_set_progress(40).unwrap();
        assert_eq!(group.progress().unwrap(), 40);
        assert!(!group.is_completed(0).unwrap());
    }

    #[test]
    fn test_claim_then_claim_again() {
        let group = kills(Arc::new(MemoryStore::new()));
        let mut wallet = Wallet::default();
        group.add_or_set_progress(10).unwrap();

        group.claim_reward(0, &mut wallet).unwrap();
        assert_eq!(group.rewarded_cursor().unwrap(), 0);
        assert!(group.is_rewarded(0).unwrap());
        assert_eq!(wallet.granted, vec![Reward::new("coins", 10)]);

        let err = claim_err(group.claim_reward(0, &mut wallet));
        assert_eq!(err, ClaimError::AlreadyRewarded { tier: 0 });
        assert_eq!(group.rewarded_cursor().unwrap(), 0);
        assert_eq!(wallet.granted.len(), 1);
    }

    #[test]
    fn test_claims_must_be_sequential() {
        let group = kills(Arc::new(MemoryStore::new()));
        let mut wallet = Wallet::default();
        group.add_or_set_progress(100).unwrap();

        let err = claim_err(group.claim_reward(2, &mut wallet));
        assert_eq!(err, ClaimError::OutOfOrder { tier: 2, expected: 0 });
        assert_eq!(group.rewarded_cursor().unwrap(), NOT_REWARDED);

        for tier in 0..3 {
            group.claim_reward(tier, &mut wallet).unwrap();
            for earlier in 0..=tier {
                assert!(group.is_rewarded(earlier).unwrap());
            }
        }
        assert!(!group.has_unclaimed_reward().unwrap());
    }

    #[test]
    fn test_claim_rejections() {
        let store = Arc::new(MemoryStore::new());
        let group = AchievementGroup::new(
            AchievementId(2),
            AchievementGroupDef::new(
                "levels",
                true,
                vec![
                    AchievementTier::new(1),
                    AchievementTier::new(5).with_reward(Reward::new("gems", 1)),
                ],
            ),
            store,
        );
        let mut wallet = Wallet::default();

        assert_eq!(
            claim_err(group.claim_reward(0, &mut wallet)),
            ClaimError::NotCompleted { tier: 0 }
        );
        group.add_or_set_progress(5).unwrap();
        assert_eq!(
            claim_err(group.claim_reward(0, &mut wallet)),
            ClaimError::RewardMissing { tier: 0 }
        );
        assert_eq!(
            claim_err(group.claim_reward(7, &mut wallet)),
            ClaimError::InvalidTier { tier: 7, tiers: 2 }
        );

        wallet.full = true;
        assert_eq!(
            claim_err(group.claim_reward(0, &mut wallet)),
            ClaimError::RewardMissing { tier: 0 }
        );
        assert!(wallet.granted.is_empty());
        assert_eq!(group.rewarded_cursor().unwrap(), NOT_REWARDED);
    }

    #[test]
    fn test_unobtainable_reward() {
        let group = kills(Arc::new(MemoryStore::new()));
        let mut wallet = Wallet {
            full: true,
            ..Default::default()
        };
        group.add_or_set_progress(10).unwrap();
        assert_eq!(
            claim_err(group.claim_reward(0, &mut wallet)),
            ClaimError::RewardNotObtainable { tier: 0 }
        );
        assert_eq!(group.rewarded_cursor().unwrap(), NOT_REWARDED);
    }

    #[test]
    fn test_unclaimed_scan_stops_at_gap() {
        let group = kills(Arc::new(MemoryStore::new()));
        assert!(!group.has_unclaimed_reward().unwrap());
        group.add_or_set_progress(60).unwrap();
        let mut wallet = Wallet::default();
        group.claim_reward(0, &mut wallet).unwrap();
        assert!(group.has_unclaimed_reward().unwrap());
        group.claim_reward(1, &mut wallet).unwrap();
        assert!(!group.has_unclaimed_reward().unwrap());
    }

    #[test]
    fn test_ongoing_tier_when_cleared() {
        let group = kills(Arc::new(MemoryStore::new()));
        let mut wallet = Wallet::default();
        group.add_or_set_progress(500).unwrap();
        while group.reward_next(&mut wallet).unwrap().is_some() {}

        let (index, _) = group.ongoing_tier().unwrap().unwrap();
        assert_eq!(index, 2);
        assert_eq!(wallet.granted.len(), 3);
    }

    #[test]
    fn test_complete_next_and_reset() {
        let group = kills(Arc::new(MemoryStore::new()));
        assert!(group.complete_next().unwrap());
        assert_eq!(group.progress().unwrap(), 10);
        assert!(group.complete_next().unwrap());
        assert_eq!(group.progress().unwrap(), 50);

        group.reset_progress().unwrap();
        assert_eq!(group.progress().unwrap(), 0);
        assert_eq!(group.rewarded_cursor().unwrap(), NOT_REWARDED);
    }

    #[test]
    fn test_standalone_progress_key() {
        let store = Arc::new(MemoryStore::new());
        let mut def = AchievementGroupDef::new("distance", false, vec![AchievementTier::new(1000)]);
        def.in_game = false;
        let group = AchievementGroup::new(AchievementId(3), def, store.clone());

        group.add_or_set_progress(1200).unwrap();

        assert_eq!(store.get_int("achievement.progress.distance").unwrap(), Some(1200));
        assert!(store.get_int_map("achievement.progress").unwrap().is_empty());
    }

    #[test]
    fn test_progress_monotonic_completion() {
        let group = kills(Arc::new(MemoryStore::new()));
        let mut completed = vec![false; 3];
        for _ in 0..12 {
            group.add_or_set_progress(9).unwrap();
            for (tier, was) in completed.iter_mut().enumerate() {
                let now = group.is_completed(tier).unwrap();
                assert!(now || !*was, "tier {tier} regressed");
                *was = now;
            }
        }
        assert!(completed.iter().all(|c| *c));
    }
}
