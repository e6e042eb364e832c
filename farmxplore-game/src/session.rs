//! Per-run session state and its transition rules.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Level;
use crate::numbers::ratio;
use crate::phase::GamePhase;

/// Caller contract violations rejected by session transitions.
///
/// A rejected transition leaves the session exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgressError {
    #[error("unknown level id '{0}'")]
    UnknownLevel(String),
    #[error("level '{level_id}' needs {expected} progress steps (got {got})")]
    StepCountMismatch {
        level_id: String,
        expected: u32,
        got: u32,
    },
    #[error("no level is active")]
    NoActiveLevel,
    #[error("{operation} is not allowed during {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: GamePhase,
    },
    #[error("mission {index} is out of range for level '{level_id}' ({count} missions)")]
    MissionOutOfRange {
        level_id: String,
        index: usize,
        count: usize,
    },
    #[error("level '{0}' has no cutscene")]
    NoCutscene(String),
    #[error("mission {index} of level '{level_id}' is not its last ({count} missions)")]
    MissionsRemaining {
        level_id: String,
        index: usize,
        count: usize,
    },
    #[error("score {score} exceeds question count {questions}")]
    ScoreExceedsQuestions { score: u32, questions: u32 },
}

/// The authoritative state of one play-through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub phase: GamePhase,
    pub current_level_id: Option<String>,
    pub current_mission_index: usize,
    pub score: u32,
    pub total_questions: u32,
    pub current_step: u32,
    pub total_steps: u32,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_initial(&self) -> bool {
        *self == Self::default()
    }

    /// Progress-bar fill, or `None` while no level is being played.
    #[must_use]
    pub fn progress_fraction(&self) -> Option<f64> {
        if !self.phase.shows_progress() {
            return None;
        }
        ratio(self.current_step, self.total_steps)
    }

    pub(crate) fn select_level(
        &mut self,
        level: &Level,
        total_steps: u32,
    ) -> Result<(), ProgressError> {
        let expected = level.total_steps();
        if total_steps != expected {
            return Err(ProgressError::StepCountMismatch {
                level_id: level.id.clone(),
                expected,
                got: total_steps,
            });
        }
        *self = Self {
            phase: GamePhase::MissionBriefing,
            current_level_id: Some(level.id.clone()),
            current_mission_index: 0,
            score: 0,
            total_questions: 0,
            current_step: 1,
            total_steps,
        };
        Ok(())
    }

    /// Move to the next mission when one remains; returns whether it moved.
    pub(crate) fn advance_mission(&mut self, max_missions: usize) -> bool {
        if self.current_mission_index + 1 < max_missions {
            self.current_mission_index += 1;
            self.current_step = self.current_step.saturating_add(1);
            true
        } else {
            false
        }
    }

    pub(crate) fn start_data_quiz(&mut self) -> Result<(), ProgressError> {
        self.require_phase("start_data_quiz", GamePhase::MissionBriefing)?;
        self.phase = GamePhase::DataQuiz;
        Ok(())
    }

    pub(crate) fn require_phase(
        &self,
        operation: &'static str,
        phase: GamePhase,
    ) -> Result<(), ProgressError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(ProgressError::InvalidPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    pub(crate) fn finish_data_quiz(&mut self, level: &Level) -> Result<(), ProgressError> {
        self.require_phase("finish_data_quiz", GamePhase::DataQuiz)?;
        let next = self.current_mission_index + 1;
        if next >= level.mission_count() {
            return Err(ProgressError::MissionOutOfRange {
                level_id: level.id.clone(),
                index: next,
                count: level.mission_count(),
            });
        }
        self.phase = GamePhase::MissionBriefing;
        self.current_mission_index = next;
        self.current_step = self.current_step.saturating_add(1);
        Ok(())
    }

    pub(crate) fn start_cutscene(&mut self, level: &Level) -> Result<(), ProgressError> {
        if !level.has_cutscene() {
            return Err(ProgressError::NoCutscene(level.id.clone()));
        }
        self.require_phase("start_cutscene", GamePhase::MissionBriefing)?;
        self.require_last_mission(level)?;
        self.phase = GamePhase::VideoCutscene;
        Ok(())
    }

    /// Learning follows the cutscene or the last mission briefing.
    pub(crate) fn start_learning(&mut self, level: &Level) -> Result<(), ProgressError> {
        match self.phase {
            GamePhase::VideoCutscene => {}
            GamePhase::MissionBriefing => self.require_last_mission(level)?,
            phase => {
                return Err(ProgressError::InvalidPhase {
                    operation: "start_learning",
                    phase,
                });
            }
        }
        self.phase = GamePhase::Learning;
        Ok(())
    }

    pub(crate) fn start_quiz(&mut self) -> Result<(), ProgressError> {
        self.require_phase("start_quiz", GamePhase::Learning)?;
        self.phase = GamePhase::Quiz;
        self.current_step = self.total_steps;
        Ok(())
    }

    fn require_last_mission(&self, level: &Level) -> Result<(), ProgressError> {
        if level.is_last_mission(self.current_mission_index) {
            Ok(())
        } else {
            Err(ProgressError::MissionsRemaining {
                level_id: level.id.clone(),
                index: self.current_mission_index,
                count: level.mission_count(),
            })
        }
    }

    pub(crate) fn finish_quiz(&mut self, final_score: u32, questions_count: u32) {
        self.phase = GamePhase::ScoreScreen;
        self.score = final_score;
        self.total_questions = questions_count;
    }

    pub(crate) fn restart(&mut self) {
        *self = Self::default();
    }

    /// Ensure the mission index still fits `level`.
    pub(crate) fn check_mission_index(&self, level: &Level) -> Result<(), ProgressError> {
        if self.current_mission_index < level.mission_count() {
            Ok(())
        } else {
            Err(ProgressError::MissionOutOfRange {
                level_id: level.id.clone(),
                index: self.current_mission_index,
                count: level.mission_count(),
            })
        }
    }
}
