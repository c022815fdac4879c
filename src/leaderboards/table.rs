//! Fixed-capacity ranked tables and the local score merge
//!
//! A table holds the best known scores of one leaderboard window, sorted by
//! descending score with `rank == position + 1`. When the local player beats
//! a row, their entry is moved up by displacement: each beaten row slides one
//! slot down and the bottom row falls off. The result only stands in for the
//! real ranking until fresh data is downloaded from the platform.

use super::entry::LeaderboardEntry;

/// Result of merging the local score into a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Whether any row was rewritten
    pub changed: bool,
    /// The local player's rank after the merge, if they are in the table
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedTable {
    entries: Vec<LeaderboardEntry>,
}

impl RankedTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&LeaderboardEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: LeaderboardEntry) {
        self.entries.push(entry);
    }

    pub fn truncate(&mut self, capacity: usize) {
        self.entries.truncate(capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Rank of the row named `name`, or `len + 1` when absent
    pub fn rank_of(&self, name: &str) -> u32 {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .unwrap_or(self.entries.len()) as u32
            + 1
    }

    /// Rename the row named `from`. If a row named `to` is already listed, the
    /// `from` row is dropped instead and the rows below it move up one rank.
    /// Returns whether the table changed.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return false;
        }
        let Some(index) = self.entries.iter().position(|e| e.name == from) else {
            return false;
        };

        if self.entries.iter().any(|e| e.name == to) {
            self.entries.remove(index);
            for (i, entry) in self.entries.iter_mut().enumerate().skip(index) {
                entry.rank = i as u32 + 1;
            }
        } else {
            self.entries[index].name = to.to_string();
        }
        true
    }

    /// Merge the local player's entry into the table.
    ///
    /// Merging the same entry twice leaves the table unchanged the second time.
    pub fn merge(&mut self, mine: &LeaderboardEntry) -> MergeOutcome {
        let len = self.entries.len();
        let my_rank = self.rank_of(&mine.name) as usize;
        let mut changed = false;
        let mut rank = None;

        // Already listed: refresh the row with the new score first
        if my_rank <= len {
            let refreshed = mine.with_rank(my_rank as u32);
            if self.entries[my_rank - 1] != refreshed {
                self.entries[my_rank - 1] = refreshed;
                changed = true;
            }
            rank = Some(my_rank as u32);
        }

        for i in (0..len.min(my_rank - 1)).rev() {
            let displaced = self.entries[i].clone();
            if mine.score <= displaced.score {
                break;
            }

            changed = true;
            let new_rank = i as u32 + 1;
            self.entries[i] = mine.with_rank(new_rank);
            rank = Some(new_rank);

            if i + 1 < len {
                self.entries[i + 1] = displaced.with_rank(new_rank + 1);
            }
        }

        MergeOutcome { changed, rank }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(scores: &[i64]) -> RankedTable {
        RankedTable::from_entries(
            scores
                .iter()
                .enumerate()
                .map(|(i, s)| LeaderboardEntry::new(format!("p{}", i + 1), i as u32 + 1, *s))
                .collect(),
        )
    }

    fn scores(t: &RankedTable) -> Vec<i64> {
        t.entries().iter().map(|e| e.score).collect()
    }

    fn assert_ranks_consistent(t: &RankedTable) {
        for (i, e) in t.entries().iter().enumerate() {
            assert_eq!(e.rank as usize, i + 1, "row {i}: {e}");
        }
    }

    #[test]
    fn test_new_score_displaces_lower_rows() {
        let mut t = table(&[100, 90, 80, 70, 60]);
        let me = LeaderboardEntry::new("You", 11, 85);

        let outcome = t.merge(&me);

        assert_eq!(outcome, MergeOutcome { changed: true, rank: Some(3) });
        assert_eq!(scores(&t), vec![100, 90, 85, 80, 70]);
        assert_eq!(t.get(2).unwrap().name, "You");
        assert_eq!(t.get(3).unwrap().name, "p3");
        assert_eq!(t.get(4).unwrap().name, "p4");
        assert_ranks_consistent(&t);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut t = table(&[100, 90, 80, 70, 60]);
        let me = LeaderboardEntry::new("You", 11, 85);
        t.merge(&me);
        let snapshot = t.clone();

        let outcome = t.merge(&me);

        assert_eq!(outcome, MergeOutcome { changed: false, rank: Some(3) });
        assert_eq!(t, snapshot);
    }

    #[test]
    fn test_score_below_table_changes_nothing() {
        let mut t = table(&[100, 90, 80]);
        let outcome = t.merge(&LeaderboardEntry::new("You", 11, 80));
        assert_eq!(outcome, MergeOutcome { changed: false, rank: None });
        assert_eq!(scores(&t), vec![100, 90, 80]);
    }

    #[test]
    fn test_listed_player_moves_up() {
        let mut t = table(&[100, 90, 85, 80, 70]);
        t.entries[2].name = "You".into();

        let outcome = t.merge(&LeaderboardEntry::new("You", 3, 95));

        assert_eq!(outcome, MergeOutcome { changed: true, rank: Some(2) });
        assert_eq!(scores(&t), vec![100, 95, 90, 80, 70]);
        assert_eq!(t.get(1).unwrap().name, "You");
        assert_eq!(t.get(2).unwrap().name, "p2");
        assert_ranks_consistent(&t);
    }

    #[test]
    fn test_listed_player_refreshes_in_place() {
        let mut t = table(&[100, 90, 85]);
        t.entries[2].name = "You".into();

        let outcome = t.merge(&LeaderboardEntry::new("You", 3, 88));

        assert_eq!(outcome, MergeOutcome { changed: true, rank: Some(3) });
        assert_eq!(scores(&t), vec![100, 90, 88]);
    }

    #[test]
    fn test_renamed_player_is_found_again() {
        let mut t = table(&[100, 90, 85, 80]);
        t.entries[2].name = "You".into();

        assert!(t.rename("You", "Robin"));
        assert!(!t.rename("You", "Robin"));
        t.merge(&LeaderboardEntry::new("Robin", 3, 95));

        assert_eq!(t.entries().iter().filter(|e| e.name == "Robin").count(), 1);
        assert_eq!(scores(&t), vec![100, 95, 90, 80]);
        assert_ranks_consistent(&t);
    }

    #[test]
    fn test_rename_onto_listed_name_drops_old_row() {
        let mut t = table(&[100, 90, 85, 80]);
        t.entries[1].name = "Robin".into();
        t.entries[2].name = "You".into();

        assert!(t.rename("You", "Robin"));

        assert_eq!(scores(&t), vec![100, 90, 80]);
        assert_eq!(t.rank_of("Robin"), 2);
        assert_ranks_consistent(&t);
    }

    #[test]
    fn test_new_top_score() {
        let mut t = table(&[100, 90]);
        let outcome = t.merge(&LeaderboardEntry::new("You", 11, 500));
        assert_eq!(outcome.rank, Some(1));
        assert_eq!(scores(&t), vec![500, 100]);
        assert_ranks_consistent(&t);
    }

    #[test]
    fn test_empty_table() {
        let mut t = RankedTable::new();
        let outcome = t.merge(&LeaderboardEntry::new("You", 11, 10));
        assert_eq!(outcome, MergeOutcome { changed: false, rank: None });
        assert!(t.is_empty());
    }

    #[test]
    fn test_ties_do_not_displace() {
        let mut t = table(&[100, 90, 80]);
        let outcome = t.merge(&LeaderboardEntry::new("You", 11, 90));
        assert_eq!(scores(&t), vec![100, 90, 90]);
        assert_eq!(outcome.rank, Some(3));
        assert_eq!(t.get(1).unwrap().name, "p2");
    }
}
