use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level mode of a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    LevelSelection,
    MissionBriefing,
    DataQuiz,
    VideoCutscene,
    Learning,
    Quiz,
    ScoreScreen,
}

impl GamePhase {
    pub const ALL: [Self; 7] = [
        Self::LevelSelection,
        Self::MissionBriefing,
        Self::DataQuiz,
        Self::VideoCutscene,
        Self::Learning,
        Self::Quiz,
        Self::ScoreScreen,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LevelSelection => "level_selection",
            Self::MissionBriefing => "mission_briefing",
            Self::DataQuiz => "data_quiz",
            Self::VideoCutscene => "video_cutscene",
            Self::Learning => "learning",
            Self::Quiz => "quiz",
            Self::ScoreScreen => "score_screen",
        }
    }

    /// Whether the phase only makes sense with an active level.
    #[must_use]
    pub const fn requires_level(self) -> bool {
        !matches!(self, Self::LevelSelection)
    }

    /// Whether the progress bar is shown in this phase.
    #[must_use]
    pub const fn shows_progress(self) -> bool {
        !matches!(self, Self::LevelSelection | Self::ScoreScreen)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GamePhase {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or(())
    }
}
