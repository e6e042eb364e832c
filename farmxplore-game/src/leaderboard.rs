//! Per-level high-score ledger.
use serde::{Deserialize, Serialize};

use crate::constants::MAX_HIGH_SCORES_PER_LEVEL;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreEntry {
    pub level_id: String,
    pub score: u32,
}

impl HighScoreEntry {
    #[must_use]
    pub fn new(level_id: impl Into<String>, score: u32) -> Self {
        Self {
            level_id: level_id.into(),
            score,
        }
    }
}

/// Top scores for every level, at most [`MAX_HIGH_SCORES_PER_LEVEL`] each.
///
/// Entries of one level are kept contiguous and sorted descending by score.
/// Deserialization restores that shape, so profiles written by older builds
/// (or edited by hand) load with the cap applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<HighScoreEntry>", into = "Vec<HighScoreEntry>")]
pub struct HighScoreLedger {
    entries: Vec<HighScoreEntry>,
}

impl HighScoreLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from arbitrary entries, sorting and truncating per level.
    #[must_use]
    pub fn from_entries(entries: Vec<HighScoreEntry>) -> Self {
        let mut ledger = Self::new();
        for entry in entries {
            ledger.add(entry.level_id, entry.score);
        }
        ledger
    }

    /// Record a score for `level_id`, keeping only that level's top entries.
    ///
    /// Other levels' entries are left untouched. Equal scores keep their
    /// insertion order.
    pub fn add(&mut self, level_id: impl Into<String>, score: u32) {
        let level_id = level_id.into();
        let (mut level_scores, others): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.level_id == level_id);
        level_scores.push(HighScoreEntry::new(level_id, score));
        level_scores.sort_by(|a, b| b.score.cmp(&a.score));
        level_scores.truncate(MAX_HIGH_SCORES_PER_LEVEL);
        self.entries = others;
        self.entries.extend(level_scores);
    }

    /// Entries for one level, best first.
    #[must_use]
    pub fn scores_for(&self, level_id: &str) -> Vec<&HighScoreEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.level_id == level_id)
            .collect()
    }

    #[must_use]
    pub fn best_for(&self, level_id: &str) -> Option<u32> {
        self.scores_for(level_id).first().map(|entry| entry.score)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HighScoreEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<HighScoreEntry>> for HighScoreLedger {
    fn from(entries: Vec<HighScoreEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<HighScoreLedger> for Vec<HighScoreEntry> {
    fn from(ledger: HighScoreLedger) -> Self {
        ledger.entries
    }
}
