//! Multiple-choice questions, quiz runs, and the quiz generator contract.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::catalog::Level;
use crate::constants::DROUGHT_LEVEL_ID;
use crate::dataset::LevelData;
use crate::numbers::usize_to_u32;

/// Answer options of one question; generated quizzes rarely exceed four.
pub type QuizOptions = SmallVec<[String; 4]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: QuizOptions,
    pub correct_answer: String,
}

impl QuizQuestion {
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        options: impl IntoIterator<Item = String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options: options.into_iter().collect(),
            correct_answer: correct_answer.into(),
        }
    }

    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    /// Whether the correct answer is one of the offered options.
    #[must_use]
    pub fn is_answerable(&self) -> bool {
        self.options.iter().any(|option| *option == self.correct_answer)
    }
}

/// Quiz language. Unknown codes fall back to English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// Name used when asking the generator for a language.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Fr => "French",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Self {
        code.parse().unwrap_or_default()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            _ => Err(()),
        }
    }
}

/// Input handed to an external quiz generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    /// Quiz topic translation key of the level.
    pub topic: String,
    pub language: Language,
    /// Real-world data the generator should base a question on.
    pub data_context: Option<String>,
}

impl QuizRequest {
    /// Build the request for `level`. Only the drought level passes its
    /// dataset along as context.
    #[must_use]
    pub fn for_level(level: &Level, language: Language, data: Option<&LevelData>) -> Self {
        let data_context = if level.id == DROUGHT_LEVEL_ID {
            data.and_then(LevelData::as_drought)
                .and_then(|drought| drought.data_context())
        } else {
            None
        };
        Self {
            topic: level.quiz_topic.clone(),
            language,
            data_context,
        }
    }
}

/// External generator of topic quizzes (an LLM service in production).
///
/// Implementations promise that every correct answer is among its options;
/// callers still pass results through [`sanitize_questions`].
pub trait QuizGenerator {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate questions for the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the generator is unreachable or its answer is unusable.
    fn generate(&self, request: &QuizRequest) -> Result<Vec<QuizQuestion>, Self::Error>;
}

/// Drop questions whose correct answer is not offered as an option.
#[must_use]
pub fn sanitize_questions(questions: Vec<QuizQuestion>) -> Vec<QuizQuestion> {
    questions
        .into_iter()
        .filter(|question| {
            let keep = question.is_answerable();
            if !keep {
                log::warn!(
                    "dropping generated question without a valid answer: {}",
                    question.question
                );
            }
            keep
        })
        .collect()
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("quiz has no questions")]
    NoQuestions,
    #[error("current question has not been answered")]
    NotAnswered,
    #[error("quiz is already complete")]
    Finished,
}

/// Result of selecting an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect { correct_answer: String },
    /// The question was already answered; the selection is ignored.
    Ignored,
}

/// Result of moving past an answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    Next { index: usize },
    Completed { score: u32, total: u32 },
}

/// One pass through a list of questions, one answer per question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRun {
    questions: Vec<QuizQuestion>,
    index: usize,
    score: u32,
    selected: Option<String>,
    completed: bool,
}

impl QuizRun {
    /// Start a run.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NoQuestions`] when `questions` is empty.
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        Ok(Self {
            questions,
            index: 0,
            score: 0,
            selected: None,
            completed: false,
        })
    }

    #[must_use]
    pub fn current(&self) -> &QuizQuestion {
        &self.questions[self.index]
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        usize_to_u32(self.questions.len())
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.questions.len()
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn select(&mut self, option: &str) -> AnswerOutcome {
        if self.completed || self.selected.is_some() {
            return AnswerOutcome::Ignored;
        }
        self.selected = Some(option.to_string());
        let question = &self.questions[self.index];
        if question.is_correct(option) {
            self.score = self.score.saturating_add(1);
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect {
                correct_answer: question.correct_answer.clone(),
            }
        }
    }

    /// Move on from the answered question.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::NotAnswered`] before an option is selected and
    /// [`QuizError::Finished`] once the run has completed.
    pub fn next_question(&mut self) -> Result<QuizStep, QuizError> {
        if self.completed {
            return Err(QuizError::Finished);
        }
        if self.selected.is_none() {
            return Err(QuizError::NotAnswered);
        }
        if self.is_last() {
            self.completed = true;
            return Ok(QuizStep::Completed {
                score: self.score,
                total: self.total(),
            });
        }
        self.index += 1;
        self.selected = None;
        Ok(QuizStep::Next { index: self.index })
    }
}
