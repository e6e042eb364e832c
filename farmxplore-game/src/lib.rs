//! FarmXplore Game Core
//!
//! Platform-agnostic progression logic for the FarmXplore farm disaster
//! response game: the mission state machine, data-quiz generation, streaks,
//! and high scores. Rendering, speech, translations and the quiz-writing
//! service stay with the host application and are reached through traits.

pub mod catalog;
pub mod constants;
pub mod data_quiz;
pub mod dataset;
pub mod fetch;
pub mod leaderboard;
pub mod missions;
pub mod numbers;
pub mod phase;
pub mod profile;
pub mod quiz;
pub mod result;
pub mod rng;
pub mod sequencer;
pub mod session;
pub mod storage;
pub mod store;
pub mod streak;

// Re-export commonly used types
pub use catalog::{CatalogError, DataFeedEntry, Level, LevelCatalog, RewardTable, SubMission};
pub use data_quiz::generate_data_questions;
pub use dataset::{
    DatasetError, DatasetKind, DroughtData, FloodData, LevelData, Measured, MeasurementSummary,
    RainfallRecord, SoilMoistureRecord, parse_drought, parse_flood_table,
};
pub use fetch::{Delivery, FetchTicket};
pub use leaderboard::{HighScoreEntry, HighScoreLedger};
pub use missions::{MissionAttempt, MissionRule, Validation};
pub use phase::GamePhase;
pub use profile::Profile;
pub use quiz::{
    AnswerOutcome, Language, QuizError, QuizGenerator, QuizQuestion, QuizRequest, QuizRun,
    QuizStep, sanitize_questions,
};
pub use result::{Grade, LevelResult, ScoreSummary};
pub use sequencer::{NextStep, next_step, requires_data_quiz, step_after_success};
pub use session::{ProgressError, Session};
pub use storage::MemoryStorage;
pub use store::{DataState, MissionOutcome, ProgressStore};
pub use streak::{StreakUpdate, advance_streak};

/// Trait for abstracting dataset loading
/// Platform-specific implementations should provide this
pub trait DatasetLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the soil-moisture survey used by the drought level
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be fetched or parsed.
    fn load_drought(&self) -> Result<DroughtData, Self::Error>;

    /// Load the rainfall table used by the flood level
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be fetched or parsed.
    fn load_flood(&self) -> Result<FloodData, Self::Error>;

    /// Load whichever dataset `kind` names
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be fetched or parsed.
    fn load(&self, kind: DatasetKind) -> Result<LevelData, Self::Error> {
        match kind {
            DatasetKind::Drought => self.load_drought().map(LevelData::Drought),
            DatasetKind::Flood => self.load_flood().map(LevelData::Flood),
        }
    }
}

/// Trait for abstracting profile persistence\
/// Platform-specific implementations should provide this
pub trait ProfileStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the profile stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the stored profile cannot be read or parsed.
    fn load_profile(&self, key: &str) -> Result<Option<Profile>, Self::Error>;

    /// Save the profile under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be written.
    fn save_profile(&self, key: &str, profile: &Profile) -> Result<(), Self::Error>;
}
