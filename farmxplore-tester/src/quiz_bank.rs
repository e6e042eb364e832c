//! Offline stand-in for the quiz-writing service.
use farmxplore_game::{Language, QuizGenerator, QuizQuestion, QuizRequest};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

const BUNDLED_QUIZ_BANK: &str = include_str!("../data/quiz_bank.json");

#[derive(Debug, Error)]
pub enum QuizBankError {
    #[error("quiz bank is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("quiz bank has no questions for {0}")]
    Empty(Language),
}

/// Questions keyed by language code. Requests in a language without questions
/// fall back to English, the way the game falls back for translations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct OfflineQuizGenerator {
    banks: HashMap<String, Vec<QuizQuestion>>,
}

impl OfflineQuizGenerator {
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, QuizBankError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns an error if the bundled bank is malformed.
    pub fn bundled() -> Result<Self, QuizBankError> {
        Self::from_json(BUNDLED_QUIZ_BANK)
    }

    fn bank(&self, language: Language) -> Option<&[QuizQuestion]> {
        let lookup = |lang: Language| {
            self.banks
                .get(lang.code())
                .map(Vec::as_slice)
                .filter(|questions| !questions.is_empty())
        };
        lookup(language).or_else(|| lookup(Language::En))
    }
}

impl QuizGenerator for OfflineQuizGenerator {
    type Error = QuizBankError;

    fn generate(&self, request: &QuizRequest) -> Result<Vec<QuizQuestion>, Self::Error> {
        let questions = self
            .bank(request.language)
            .ok_or(QuizBankError::Empty(request.language))?;
        log::debug!(
            "serving {} offline question(s) for {} ({})",
            questions.len(),
            request.topic,
            request.language
        );
        Ok(questions.to_vec())
    }
}
