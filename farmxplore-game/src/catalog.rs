//! Static level catalog and reward table.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::constants::{
    BADGE_SUFFIX, DROUGHT_LEVEL_ID, FLOOD_LEVEL_ID, FOOD_SECURITY_LEVEL_ID, HEATWAVE_LEVEL_ID,
    SUSTAINABILITY_LEVEL_ID,
};
use crate::numbers::usize_to_u32;

/// One ordered step within a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubMission {
    pub title: String,
    pub objective: String,
}

/// Static entry shown in a level's data feed before live data arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFeedEntry {
    pub label: String,
    pub value: f64,
    pub unit: String,
}

/// A themed scenario with ordered missions, a quiz topic, and a reward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub cutscene_video: Option<String>,
    #[serde(default)]
    pub data: Vec<DataFeedEntry>,
    pub sub_missions: Vec<SubMission>,
    pub quiz_topic: String,
    pub reward_badge: String,
    #[serde(default)]
    pub reward_name: String,
}

impl Level {
    #[must_use]
    pub fn mission_count(&self) -> usize {
        self.sub_missions.len()
    }

    /// Progress-bar length: every mission plus the final quiz.
    #[must_use]
    pub fn total_steps(&self) -> u32 {
        usize_to_u32(self.mission_count()).saturating_add(1)
    }

    #[must_use]
    pub fn mission(&self, index: usize) -> Option<&SubMission> {
        self.sub_missions.get(index)
    }

    #[must_use]
    pub fn is_last_mission(&self, index: usize) -> bool {
        index + 1 >= self.mission_count()
    }

    #[must_use]
    pub const fn has_cutscene(&self) -> bool {
        self.cutscene_video.is_some()
    }
}

/// Errors raised when a level catalog violates its invariants.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level id '{0}' appears more than once")]
    DuplicateLevel(String),
    #[error("level '{0}' has no missions")]
    EmptyLevel(String),
    #[error("reward table lists level '{0}' more than once")]
    DuplicateReward(String),
}

/// Ordered, read-only list of level definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Level>", into = "Vec<Level>")]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Build a catalog, rejecting duplicate ids and levels without missions.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] describing the first violated invariant.
    pub fn from_levels(levels: Vec<Level>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for level in &levels {
            if !seen.insert(level.id.as_str()) {
                return Err(CatalogError::DuplicateLevel(level.id.clone()));
            }
            if level.sub_missions.is_empty() {
                return Err(CatalogError::EmptyLevel(level.id.clone()));
            }
        }
        Ok(Self { levels })
    }

    /// Load a catalog from a JSON array of levels.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the catalog is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let levels: Vec<Level> = serde_json::from_str(json)?;
        Self::from_levels(levels)
    }

    /// The five levels shipped with the game.
    #[must_use]
    pub fn builtin() -> Self {
        let levels = vec![
            builtin_level(
                DROUGHT_LEVEL_ID,
                Some("/videos/CHAP1.mp4"),
                &[
                    ("dataLabels.avgSoilMoisture", 0.0, "m³/m³"),
                    ("dataLabels.rainfallForecast", 5.0, "%"),
                    ("dataLabels.reservoirLevel", 30.0, "%"),
                ],
            ),
            builtin_level(
                FLOOD_LEVEL_ID,
                Some("/videos/CHAP2.mp4"),
                &[
                    ("dataLabels.floodRisk", 85.0, "%"),
                    ("dataLabels.riverLevel", 90.0, "% Capacity"),
                    ("dataLabels.soilSaturation", 95.0, "%"),
                ],
            ),
            builtin_level(
                HEATWAVE_LEVEL_ID,
                Some("/videos/CHAP3.mp4"),
                &[
                    ("dataLabels.temperatureAnomaly", 10.0, "°C"),
                    ("dataLabels.evaporationRate", 75.0, "% Higher"),
                    ("dataLabels.cropStressIndex", 80.0, "/100"),
                ],
            ),
            builtin_level(
                SUSTAINABILITY_LEVEL_ID,
                Some("/videos/chap4.mp4"),
                &[
                    ("dataLabels.soilOrganicMatter", 25.0, "%"),
                    ("dataLabels.cropDiversityIndex", 20.0, "/100"),
                    ("dataLabels.waterRetention", 40.0, "%"),
                ],
            ),
            builtin_level(
                FOOD_SECURITY_LEVEL_ID,
                None,
                &[
                    ("dataLabels.urgencyLevel", 85.0, "%"),
                    ("dataLabels.storageSurplus", 70.0, "%"),
                    ("dataLabels.logisticsReadiness", 60.0, "%"),
                ],
            ),
        ];
        Self { levels }
    }

    #[must_use]
    pub fn get(&self, level_id: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == level_id)
    }

    #[must_use]
    pub fn contains(&self, level_id: &str) -> bool {
        self.get(level_id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|level| level.id.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl TryFrom<Vec<Level>> for LevelCatalog {
    type Error = CatalogError;

    fn try_from(levels: Vec<Level>) -> Result<Self, Self::Error> {
        Self::from_levels(levels)
    }
}

impl From<LevelCatalog> for Vec<Level> {
    fn from(catalog: LevelCatalog) -> Self {
        catalog.levels
    }
}

fn builtin_level(id: &str, cutscene: Option<&str>, feed: &[(&str, f64, &str)]) -> Level {
    let sub_missions = (0..3)
        .map(|index| SubMission {
            title: format!("levels.{id}.subMissions.{index}.title"),
            objective: format!("levels.{id}.subMissions.{index}.objective"),
        })
        .collect();
    Level {
        id: id.to_string(),
        title: format!("levels.{id}.title"),
        description: format!("levels.{id}.description"),
        context: format!("levels.{id}.context"),
        cutscene_video: cutscene.map(str::to_string),
        data: feed
            .iter()
            .map(|(label, value, unit)| DataFeedEntry {
                label: (*label).to_string(),
                value: *value,
                unit: (*unit).to_string(),
            })
            .collect(),
        sub_missions,
        quiz_topic: format!("levels.{id}.quizTopic"),
        reward_badge: format!("{id}{BADGE_SUFFIX}"),
        reward_name: format!("levels.{id}.reward.badgeName"),
    }
}

/// Entry of the reward table, in the shape of the shipped `rewards.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardEntry {
    pub id: String,
    pub level_id: String,
}

/// Read-only mapping from level id to reward badge id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardTable {
    entries: Vec<RewardEntry>,
}

impl RewardTable {
    /// Load a reward table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a level is rewarded twice.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<RewardEntry> = serde_json::from_str(json)?;
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.level_id.as_str()) {
                return Err(CatalogError::DuplicateReward(entry.level_id.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Derive the table from the badges declared on each level.
    #[must_use]
    pub fn from_catalog(catalog: &LevelCatalog) -> Self {
        let entries = catalog
            .iter()
            .map(|level| RewardEntry {
                id: level.reward_badge.clone(),
                level_id: level.id.clone(),
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn badge_for(&self, level_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.level_id == level_id)
            .map(|entry| entry.id.as_str())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_matches_shipped_levels() {
        let catalog = LevelCatalog::builtin();
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(
            ids,
            ["drought", "flood", "heatwave", "sustainability", "food-security"]
        );
        for level in catalog.iter() {
            assert_eq!(level.mission_count(), 3);
            assert_eq!(level.total_steps(), 4);
        }
        assert!(!catalog.get("food-security").unwrap().has_cutscene());
        assert!(catalog.get("drought").unwrap().has_cutscene());
    }

    #[test]
    fn catalog_rejects_duplicates_and_empty_levels() {
        let mut levels: Vec<Level> = LevelCatalog::builtin().into();
        levels.push(levels[0].clone());
        assert!(matches!(
            LevelCatalog::from_levels(levels),
            Err(CatalogError::DuplicateLevel(id)) if id == "drought"
        ));

        let mut empty = LevelCatalog::builtin().get("flood").unwrap().clone();
        empty.sub_missions.clear();
        assert!(matches!(
            LevelCatalog::from_levels(vec![empty]),
            Err(CatalogError::EmptyLevel(id)) if id == "flood"
        ));
    }

    #[test]
    fn catalog_json_roundtrips_through_validation() {
        let json = serde_json::to_string(&LevelCatalog::builtin()).unwrap();
        let catalog = LevelCatalog::from_json(&json).unwrap();
        assert_eq!(catalog, LevelCatalog::builtin());
        assert!(LevelCatalog::from_json("[{\"id\": 3}]").is_err());
    }

    #[test]
    fn last_mission_detection() {
        let catalog = LevelCatalog::builtin();
        let level = catalog.get("heatwave").unwrap();
        assert!(!level.is_last_mission(0));
        assert!(!level.is_last_mission(1));
        assert!(level.is_last_mission(2));
        assert!(level.mission(3).is_none());
    }

    #[test]
    fn reward_table_lookup() {
        let table = RewardTable::from_json(
            r#"[{"id": "water-saver", "levelId": "drought"}, {"id": "flood-guard", "levelId": "flood"}]"#,
        )
        .unwrap();
        assert_eq!(table.badge_for("drought"), Some("water-saver"));
        assert_eq!(table.badge_for("heatwave"), None);

        let derived = RewardTable::from_catalog(&LevelCatalog::builtin());
        assert_eq!(derived.len(), 5);
        assert_eq!(derived.badge_for("food-security"), Some("food-security-badge"));

        let duplicate = RewardTable::from_json(
            r#"[{"id": "a", "levelId": "drought"}, {"id": "b", "levelId": "drought"}]"#,
        );
        assert!(matches!(duplicate, Err(CatalogError::DuplicateReward(_))));
    }
}
