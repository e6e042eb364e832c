//! Persistent player profile: badges, streak, and high scores.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::leaderboard::HighScoreLedger;
use crate::streak::{StreakUpdate, advance_streak};

/// The subset of progress that survives restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub badges: BTreeSet<String>,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub last_played_date: Option<NaiveDate>,
    #[serde(default)]
    pub high_scores: HighScoreLedger,
}

impl Profile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Award a badge. Returns `false` when it was already held.
    pub fn earn_badge(&mut self, badge_id: &str) -> bool {
        if self.badges.contains(badge_id) {
            return false;
        }
        self.badges.insert(badge_id.to_string())
    }

    #[must_use]
    pub fn has_badge(&self, badge_id: &str) -> bool {
        self.badges.contains(badge_id)
    }

    pub fn check_streak(&mut self, today: NaiveDate) -> StreakUpdate {
        advance_streak(&mut self.streak, &mut self.last_played_date, today)
    }

    pub fn add_high_score(&mut self, level_id: &str, score: u32) {
        self.high_scores.add(level_id, score);
    }

    /// Load a profile from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a profile.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badges_are_idempotent() {
        let mut profile = Profile::new();
        assert!(profile.earn_badge("drought-badge"));
        assert!(!profile.earn_badge("drought-badge"));
        assert_eq!(profile.badges.len(), 1);
        assert!(profile.has_badge("drought-badge"));
    }

    #[test]
    fn missing_fields_default_when_loading() {
        let profile = Profile::from_json(r#"{"streak": 3}"#).unwrap();
        assert_eq!(profile.streak, 3);
        assert!(profile.badges.is_empty());
        assert!(profile.last_played_date.is_none());
        assert!(profile.high_scores.is_empty());
    }

    #[test]
    fn profile_uses_stored_field_names() {
        let mut profile = Profile::new();
        profile.check_streak(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        profile.add_high_score("flood", 4);
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["lastPlayedDate"], "2025-06-01");
        assert_eq!(value["highScores"][0]["levelId"], "flood");
        assert_eq!(Profile::from_json(&value.to_string()).unwrap(), profile);
    }
}
