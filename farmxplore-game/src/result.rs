//! Score screen grading
use serde::{Deserialize, Serialize};

use crate::constants::{GRADE_EXCELLENT_PCT, GRADE_PASS_PCT};
use crate::leaderboard::HighScoreEntry;
use crate::numbers::percentage;

/// Verdict shown on the score screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    /// At least [`GRADE_EXCELLENT_PCT`] percent correct
    Excellent,
    /// Passed but below excellent
    Good,
    NeedsImprovement,
}

impl Grade {
    #[must_use]
    pub const fn from_percentage(percentage: u32) -> Self {
        if percentage >= GRADE_EXCELLENT_PCT {
            Self::Excellent
        } else if percentage >= GRADE_PASS_PCT {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    /// Translation key of the score-screen message.
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::Excellent => "score.messageExcellent",
            Self::Good => "score.messageGood",
            Self::NeedsImprovement => "score.messageImprovement",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::NeedsImprovement => "needs_improvement",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage and verdict for one finished quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub passed: bool,
    pub grade: Grade,
}

impl ScoreSummary {
    #[must_use]
    pub fn new(score: u32, total: u32) -> Self {
        let percentage = percentage(score, total);
        Self {
            score,
            total,
            percentage,
            passed: percentage >= GRADE_PASS_PCT,
            grade: Grade::from_percentage(percentage),
        }
    }
}

/// Everything the score screen displays for the finished level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResult {
    pub level_id: String,
    pub summary: ScoreSummary,
    pub badge: Option<String>,
    /// The reward banner only shows for a passing run.
    pub reward_unlocked: bool,
    pub leaderboard: Vec<HighScoreEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grades_follow_thresholds() {
        let excellent = ScoreSummary::new(4, 5);
        assert_eq!(excellent.percentage, 80);
        assert_eq!(excellent.grade, Grade::Excellent);
        assert!(excellent.passed);

        let good = ScoreSummary::new(1, 2);
        assert_eq!(good.grade, Grade::Good);
        assert!(good.passed);

        let low = ScoreSummary::new(1, 3);
        assert_eq!(low.percentage, 33);
        assert_eq!(low.grade, Grade::NeedsImprovement);
        assert!(!low.passed);
        assert_eq!(low.grade.message_key(), "score.messageImprovement");
    }

    #[test]
    fn empty_quiz_scores_zero() {
        let summary = ScoreSummary::new(0, 0);
        assert_eq!(summary.percentage, 0);
        assert!(!summary.passed);
    }

    #[test]
    fn percentages_round_to_nearest() {
        assert_eq!(ScoreSummary::new(2, 3).percentage, 67);
        assert_eq!(ScoreSummary::new(5, 5).grade.to_string(), "excellent");
    }
}
