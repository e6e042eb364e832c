//! Mission validation rules and the static choice tables they draw on.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::constants::{
    DROUGHT_LEVEL_ID, FLOOD_LEVEL_ID, MOST_EFFICIENT_PLAN_ID, SANDBAGS_REQUIRED,
};
use crate::dataset::LevelData;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crop {
    pub id: &'static str,
    pub name_key: &'static str,
    pub drought_resistance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrigationPlan {
    pub id: &'static str,
    pub name_key: &'static str,
    pub efficiency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloodAction {
    pub id: &'static str,
    pub name_key: &'static str,
    pub is_correct: bool,
}

pub static CROPS: [Crop; 4] = [
    Crop {
        id: "sorghum",
        name_key: "crops.sorghum.name",
        drought_resistance: 0.85,
    },
    Crop {
        id: "lentils",
        name_key: "crops.lentils.name",
        drought_resistance: 0.7,
    },
    Crop {
        id: "corn",
        name_key: "crops.corn.name",
        drought_resistance: 0.4,
    },
    Crop {
        id: "rice",
        name_key: "crops.rice.name",
        drought_resistance: 0.1,
    },
];

pub static IRRIGATION_PLANS: [IrrigationPlan; 3] = [
    IrrigationPlan {
        id: "drip",
        name_key: "irrigation.drip.name",
        efficiency: 0.95,
    },
    IrrigationPlan {
        id: "sprinkler",
        name_key: "irrigation.sprinkler.name",
        efficiency: 0.75,
    },
    IrrigationPlan {
        id: "surface",
        name_key: "irrigation.surface.name",
        efficiency: 0.5,
    },
];

pub static FLOOD_ACTIONS: [FloodAction; 4] = [
    FloodAction {
        id: "move_tractors",
        name_key: "floodActions.move_tractors",
        is_correct: true,
    },
    FloodAction {
        id: "leave_livestock",
        name_key: "floodActions.leave_livestock",
        is_correct: false,
    },
    FloodAction {
        id: "move_livestock",
        name_key: "floodActions.move_livestock",
        is_correct: true,
    },
    FloodAction {
        id: "barricade_barn",
        name_key: "floodActions.barricade_barn",
        is_correct: false,
    },
];

/// Crop with the highest drought resistance (last one wins a tie).
#[must_use]
pub fn most_resistant_crop() -> Option<&'static Crop> {
    CROPS
        .iter()
        .max_by(|a, b| a.drought_resistance.total_cmp(&b.drought_resistance))
}

#[must_use]
pub fn correct_flood_actions() -> BTreeSet<String> {
    FLOOD_ACTIONS
        .iter()
        .filter(|action| action.is_correct)
        .map(|action| action.id.to_string())
        .collect()
}

/// What the player submitted for the current mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MissionAttempt {
    Site(String),
    Crop(String),
    IrrigationPlan(String),
    FloodActions(BTreeSet<String>),
    Sandbags(u32),
    /// Missions without a check only need the player to continue.
    Proceed,
}

/// Check applied to one mission of one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionRule {
    DriestSite,
    DroughtResistantCrop,
    EfficientIrrigation,
    WettestSite,
    FloodActions,
    Sandbags,
    Open,
}

impl MissionRule {
    #[must_use]
    pub fn for_mission(level_id: &str, mission_index: usize) -> Self {
        match (level_id, mission_index) {
            (DROUGHT_LEVEL_ID, 0) => Self::DriestSite,
            (DROUGHT_LEVEL_ID, 1) => Self::DroughtResistantCrop,
            (DROUGHT_LEVEL_ID, 2) => Self::EfficientIrrigation,
            (FLOOD_LEVEL_ID, 0) => Self::WettestSite,
            (FLOOD_LEVEL_ID, 1) => Self::FloodActions,
            (FLOOD_LEVEL_ID, 2) => Self::Sandbags,
            _ => Self::Open,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DriestSite => "driest_site",
            Self::DroughtResistantCrop => "drought_resistant_crop",
            Self::EfficientIrrigation => "efficient_irrigation",
            Self::WettestSite => "wettest_site",
            Self::FloodActions => "flood_actions",
            Self::Sandbags => "sandbags",
            Self::Open => "open",
        }
    }

    /// Whether the rule compares against the level's loaded dataset.
    #[must_use]
    pub const fn needs_dataset(self) -> bool {
        matches!(self, Self::DriestSite | Self::WettestSite)
    }

    /// Judge `attempt`. Site rules fail while no dataset has been delivered;
    /// an attempt of the wrong kind is incorrect.
    #[must_use]
    pub fn validate(self, attempt: &MissionAttempt, data: Option<&LevelData>) -> Validation {
        let correct = match (self, attempt) {
            (Self::Open, _) => true,
            (Self::DriestSite, MissionAttempt::Site(site)) => data
                .and_then(LevelData::as_drought)
                .and_then(|drought| drought.driest_site())
                .is_some_and(|driest| driest == *site),
            (Self::WettestSite, MissionAttempt::Site(site)) => data
                .and_then(LevelData::as_flood)
                .and_then(|flood| flood.wettest_site())
                .is_some_and(|wettest| wettest == *site),
            (Self::DroughtResistantCrop, MissionAttempt::Crop(crop)) => {
                most_resistant_crop().is_some_and(|best| best.id == crop.as_str())
            }
            (Self::EfficientIrrigation, MissionAttempt::IrrigationPlan(plan)) => {
                plan == MOST_EFFICIENT_PLAN_ID
            }
            (Self::FloodActions, MissionAttempt::FloodActions(actions)) => {
                *actions == correct_flood_actions()
            }
            (Self::Sandbags, MissionAttempt::Sandbags(placed)) => *placed >= SANDBAGS_REQUIRED,
            _ => {
                log::debug!("attempt {attempt:?} does not answer rule {self}");
                false
            }
        };
        if correct {
            Validation::Correct
        } else {
            Validation::Incorrect
        }
    }
}

impl fmt::Display for MissionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validation {
    Correct,
    Incorrect,
}

impl Validation {
    #[must_use]
    pub const fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}
