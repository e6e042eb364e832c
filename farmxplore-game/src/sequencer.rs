//! Decides where a run goes once the current mission is done.
//!
//! The store only moves the mission index; this module owns the level-aware
//! branch at the end of a level (cutscene or straight to learning) and the
//! drought survey's detour through the data quiz.
use serde::{Deserialize, Serialize};

use crate::catalog::Level;
use crate::constants::DROUGHT_LEVEL_ID;

/// Step taken after a mission is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    NextMission,
    DataQuiz,
    Cutscene,
    Learning,
}

impl NextStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NextMission => "next_mission",
            Self::DataQuiz => "data_quiz",
            Self::Cutscene => "cutscene",
            Self::Learning => "learning",
        }
    }
}

impl std::fmt::Display for NextStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether completing `mission_index` of `level` opens the data quiz.
#[must_use]
pub fn requires_data_quiz(level: &Level, mission_index: usize) -> bool {
    level.id == DROUGHT_LEVEL_ID && mission_index == 0
}

/// The ordinary advance: next mission while one remains, then the level's
/// cutscene if it has one, otherwise learning.
#[must_use]
pub fn next_step(level: &Level, mission_index: usize) -> NextStep {
    if !level.is_last_mission(mission_index) {
        NextStep::NextMission
    } else if level.has_cutscene() {
        NextStep::Cutscene
    } else {
        NextStep::Learning
    }
}

/// Step after a successfully validated mission, including the data-quiz detour.
#[must_use]
pub fn step_after_success(level: &Level, mission_index: usize) -> NextStep {
    if requires_data_quiz(level, mission_index) {
        NextStep::DataQuiz
    } else {
        next_step(level, mission_index)
    }
}
