//! The progress store: one session, one persistent profile, and the named
//! operations that are the only way to change either.
//!
//! Session transitions are validated before anything is mutated, so a
//! rejected call leaves the store exactly as it was. Every change to the
//! profile is followed by an explicit save; a failing backend is logged and
//! play continues.
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Level, LevelCatalog, RewardTable};
use crate::constants::PROFILE_STORAGE_KEY;
use crate::data_quiz::generate_data_questions;
use crate::dataset::{DatasetKind, LevelData};
use crate::fetch::{Delivery, FetchGeneration, FetchTicket};
use crate::missions::{MissionAttempt, MissionRule, Validation};
use crate::phase::GamePhase;
use crate::profile::Profile;
use crate::quiz::{Language, QuizQuestion, QuizRequest, sanitize_questions};
use crate::result::{LevelResult, ScoreSummary};
use crate::sequencer::{NextStep, next_step, step_after_success};
use crate::session::{ProgressError, Session};
use crate::streak::StreakUpdate;
use crate::{DatasetLoader, ProfileStorage};

/// Where the active level's dataset stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DataState {
    /// Nothing requested for the active level.
    #[default]
    Idle,
    Loading(FetchTicket),
    Ready(LevelData),
    /// The loader failed; the message is kept for a retry prompt.
    Unavailable(String),
}

impl DataState {
    #[must_use]
    pub const fn level_data(&self) -> Option<&LevelData> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }
}

/// Result of submitting a mission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionOutcome {
    pub rule: MissionRule,
    pub validation: Validation,
    /// The transition applied when the attempt was correct.
    pub step: Option<NextStep>,
}

fn active_level<'a>(
    catalog: &'a LevelCatalog,
    session: &Session,
) -> Result<&'a Level, ProgressError> {
    let level_id = session
        .current_level_id
        .as_deref()
        .ok_or(ProgressError::NoActiveLevel)?;
    catalog
        .get(level_id)
        .ok_or_else(|| ProgressError::UnknownLevel(level_id.to_string()))
}

/// Authoritative game state owned by the host application.
#[derive(Debug)]
pub struct ProgressStore<S: ProfileStorage> {
    catalog: LevelCatalog,
    rewards: RewardTable,
    storage: S,
    session: Session,
    profile: Profile,
    generation: FetchGeneration,
    data: DataState,
}

impl<S: ProfileStorage> ProgressStore<S> {
    /// Create a store, loading the saved profile. An unreadable profile is
    /// replaced by a fresh one.
    pub fn open(catalog: LevelCatalog, rewards: RewardTable, storage: S) -> Self {
        let profile = match storage.load_profile(PROFILE_STORAGE_KEY) {
            Ok(Some(profile)) => profile,
            Ok(None) => Profile::default(),
            Err(err) => {
                log::warn!("could not load profile, starting fresh: {err}");
                Profile::default()
            }
        };
        Self {
            catalog,
            rewards,
            storage,
            session: Session::default(),
            profile,
            generation: FetchGeneration::default(),
            data: DataState::Idle,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    #[must_use]
    pub const fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.session.phase
    }

    #[must_use]
    pub const fn data_state(&self) -> &DataState {
        &self.data
    }

    #[must_use]
    pub const fn level_data(&self) -> Option<&LevelData> {
        self.data.level_data()
    }

    /// The level being played, if any.
    #[must_use]
    pub fn current_level(&self) -> Option<&Level> {
        active_level(&self.catalog, &self.session).ok()
    }

    /// Start `level_id` from its first mission, replacing any run in progress.
    ///
    /// # Errors
    ///
    /// Fails when the level is unknown or `total_steps` is not its mission
    /// count plus one.
    pub fn select_level(&mut self, level_id: &str, total_steps: u32) -> Result<(), ProgressError> {
        let level = self
            .catalog
            .get(level_id)
            .ok_or_else(|| ProgressError::UnknownLevel(level_id.to_string()))?;
        self.session.select_level(level, total_steps)?;
        self.generation.bump();
        self.data = DataState::Idle;
        log::debug!("selected level {level_id} ({total_steps} steps)");
        Ok(())
    }

    /// [`Self::select_level`] with the step count taken from the catalog.
    ///
    /// # Errors
    ///
    /// Fails when the level is unknown.
    pub fn select_level_by_id(&mut self, level_id: &str) -> Result<(), ProgressError> {
        let total_steps = self
            .catalog
            .get(level_id)
            .map(Level::total_steps)
            .ok_or_else(|| ProgressError::UnknownLevel(level_id.to_string()))?;
        self.select_level(level_id, total_steps)
    }

    /// Move to the next mission if `max_missions` allows it. Returns whether
    /// the index moved.
    ///
    /// # Errors
    ///
    /// Fails without an active level, outside a mission briefing, or when
    /// moving would pass the level's own last mission.
    pub fn advance_mission(&mut self, max_missions: usize) -> Result<bool, ProgressError> {
        let level = active_level(&self.catalog, &self.session)?;
        self.session
            .require_phase("advance_mission", GamePhase::MissionBriefing)?;
        let next = self.session.current_mission_index + 1;
        if next < max_missions && next >= level.mission_count() {
            return Err(ProgressError::MissionOutOfRange {
                level_id: level.id.clone(),
                index: next,
                count: level.mission_count(),
            });
        }
        let moved = self.session.advance_mission(max_missions);
        if moved {
            log::debug!("mission {} of {}", next + 1, level.id);
        }
        Ok(moved)
    }

    /// # Errors
    ///
    /// Fails outside a mission briefing.
    pub fn start_data_quiz(&mut self) -> Result<(), ProgressError> {
        active_level(&self.catalog, &self.session)?;
        self.session.start_data_quiz()?;
        log::debug!("data quiz started");
        Ok(())
    }

    /// Return from the data quiz to the following mission.
    ///
    /// # Errors
    ///
    /// Fails outside the data quiz, or when no mission follows.
    pub fn finish_data_quiz(&mut self) -> Result<(), ProgressError> {
        let level = active_level(&self.catalog, &self.session)?;
        self.session.finish_data_quiz(level)?;
        log::debug!("data quiz finished, mission {}", self.session.current_mission_index + 1);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails without an active level, when the level has no cutscene, or
    /// unless the last mission briefing is showing.
    pub fn start_cutscene(&mut self) -> Result<(), ProgressError> {
        let level = active_level(&self.catalog, &self.session)?;
        self.session.start_cutscene(level)?;
        log::debug!("cutscene for {}", level.id);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails without an active level, or outside the cutscene and the last
    /// mission briefing.
    pub fn start_learning(&mut self) -> Result<(), ProgressError> {
        let level = active_level(&self.catalog, &self.session)?;
        self.session.check_mission_index(level)?;
        self.session.start_learning(level)?;
        log::debug!("learning for {}", level.id);
        Ok(())
    }

    /// # Errors
    ///
    /// Fails without an active level or outside the learning phase.
    pub fn start_quiz(&mut self) -> Result<(), ProgressError> {
        let level = active_level(&self.catalog, &self.session)?;
        self.session.check_mission_index(level)?;
        self.session.start_quiz()?;
        log::debug!("quiz for {}", level.id);
        Ok(())
    }

    /// Close the level: record the score, award the reward badge, show the
    /// score screen, and save the profile.
    ///
    /// # Errors
    ///
    /// Fails without an active level or when `final_score` exceeds
    /// `questions_count`.
    pub fn finish_quiz(&mut self, final_score: u32, questions_count: u32) -> Result<(), ProgressError> {
        let level = active_level(&self.catalog, &self.session)?;
        if final_score > questions_count {
            return Err(ProgressError::ScoreExceedsQuestions {
                score: final_score,
                questions: questions_count,
            });
        }
        let badge = self
            .rewards
            .badge_for(&level.id)
            .unwrap_or(level.reward_badge.as_str());
        self.profile.add_high_score(&level.id, final_score);
        let newly_earned = self.profile.earn_badge(badge);
        log::info!(
            "quiz finished for {}: {final_score}/{questions_count}{}",
            level.id,
            if newly_earned { ", badge earned" } else { "" }
        );
        self.session.finish_quiz(final_score, questions_count);
        self.persist();
        Ok(())
    }

    /// Back to level selection. The profile is untouched and outstanding
    /// fetches become stale.
    pub fn restart_game(&mut self) {
        self.session.restart();
        self.generation.bump();
        self.data = DataState::Idle;
        log::debug!("game restarted");
    }

    /// Apply the ordinary end-of-mission advance for the active level.
    ///
    /// # Errors
    ///
    /// Fails outside a mission briefing.
    pub fn complete_mission(&mut self) -> Result<NextStep, ProgressError> {
        let level = active_level(&self.catalog, &self.session)?;
        self.session
            .require_phase("complete_mission", GamePhase::MissionBriefing)?;
        let index = self.session.current_mission_index;
        let step = next_step(level, index);
        self.apply_step(step)?;
        Ok(step)
    }

    /// Validate `attempt` against the current mission and, when correct, move
    /// on (through the data quiz where the mission calls for it).
    ///
    /// # Errors
    ///
    /// Fails outside a mission briefing.
    pub fn submit_mission(&mut self, attempt: &MissionAttempt) -> Result<MissionOutcome, ProgressError> {
        let level = active_level(&self.catalog, &self.session)?;
        self.session
            .require_phase("submit_mission", GamePhase::MissionBriefing)?;
        let index = self.session.current_mission_index;
        let rule = MissionRule::for_mission(&level.id, index);
        let validation = rule.validate(attempt, self.data.level_data());
        if !validation.is_correct() {
            log::debug!("mission {} of {} rejected ({rule})", index + 1, level.id);
            return Ok(MissionOutcome {
                rule,
                validation,
                step: None,
            });
        }
        let step = step_after_success(level, index);
        self.apply_step(step)?;
        Ok(MissionOutcome {
            rule,
            validation,
            step: Some(step),
        })
    }

    fn apply_step(&mut self, step: NextStep) -> Result<(), ProgressError> {
        match step {
            NextStep::NextMission => {
                let count = active_level(&self.catalog, &self.session)?.mission_count();
                self.advance_mission(count).map(|_| ())
            }
            NextStep::DataQuiz => self.start_data_quiz(),
            NextStep::Cutscene => self.start_cutscene(),
            NextStep::Learning => self.start_learning(),
        }
    }

    /// Award a badge outside of quiz completion. Returns `true` when new.
    pub fn earn_badge(&mut self, badge_id: &str) -> bool {
        let earned = self.profile.earn_badge(badge_id);
        if earned {
            self.persist();
        }
        earned
    }

    pub fn add_high_score(&mut self, level_id: &str, score: u32) {
        self.profile.add_high_score(level_id, score);
        self.persist();
    }

    /// Run the daily streak check for `today`, saving when it changed.
    pub fn check_streak(&mut self, today: NaiveDate) -> StreakUpdate {
        let update = self.profile.check_streak(today);
        if update.changed() {
            log::info!("streak {update:?}: {} day(s)", self.profile.streak);
            self.persist();
        }
        update
    }

    /// Ticket for an async fetch tied to the active level.
    ///
    /// # Errors
    ///
    /// Fails without an active level.
    pub fn issue_ticket(&self) -> Result<FetchTicket, ProgressError> {
        let level = active_level(&self.catalog, &self.session)?;
        Ok(self.generation.issue(&level.id))
    }

    /// Mark the active level's dataset as loading. Returns the ticket and the
    /// dataset to fetch, or `None` when the level uses no dataset.
    pub fn begin_fetch(&mut self) -> Option<(FetchTicket, DatasetKind)> {
        let level = active_level(&self.catalog, &self.session).ok()?;
        let kind = DatasetKind::for_level(&level.id)?;
        let ticket = self.generation.issue(&level.id);
        self.data = DataState::Loading(ticket.clone());
        log::debug!("fetching {kind:?} data for {}", level.id);
        Some((ticket, kind))
    }

    /// Hand in a finished dataset fetch. Results for a replaced run are
    /// dropped; a failed load leaves the session alone.
    pub fn deliver_dataset<E: std::fmt::Display>(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<LevelData, E>,
    ) -> Delivery<()> {
        if !self.is_current(ticket) {
            log::warn!(
                "dropping stale dataset for {} (generation {})",
                ticket.level_id,
                ticket.generation
            );
            return Delivery::Stale;
        }
        self.data = match outcome {
            Ok(data) => DataState::Ready(data),
            Err(err) => {
                log::warn!("dataset for {} unavailable: {err}", ticket.level_id);
                DataState::Unavailable(err.to_string())
            }
        };
        Delivery::Accepted(())
    }

    /// Fetch the active level's dataset synchronously through `loader`.
    pub fn load_dataset<L: DatasetLoader>(&mut self, loader: &L) -> Option<Delivery<()>> {
        let (ticket, kind) = self.begin_fetch()?;
        let outcome = loader.load(kind);
        Some(self.deliver_dataset(&ticket, outcome))
    }

    /// Hand in generated quiz questions. Stale results are dropped and the
    /// rest are sanitized.
    pub fn deliver_quiz(
        &self,
        ticket: &FetchTicket,
        questions: Vec<QuizQuestion>,
    ) -> Delivery<Vec<QuizQuestion>> {
        if !self.is_current(ticket) {
            log::warn!("dropping stale quiz for {}", ticket.level_id);
            return Delivery::Stale;
        }
        Delivery::Accepted(sanitize_questions(questions))
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.generation
            .is_current(ticket, self.session.current_level_id.as_deref())
    }

    /// Data-quiz questions from the loaded drought survey, empty otherwise.
    pub fn data_questions<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<QuizQuestion> {
        self.level_data()
            .and_then(LevelData::as_drought)
            .map(|drought| generate_data_questions(&drought.records, rng))
            .unwrap_or_default()
    }

    /// Request for the external quiz generator.
    ///
    /// # Errors
    ///
    /// Fails without an active level.
    pub fn quiz_request(&self, language: Language) -> Result<QuizRequest, ProgressError> {
        let level = active_level(&self.catalog, &self.session)?;
        Ok(QuizRequest::for_level(level, language, self.level_data()))
    }

    /// Score-screen contents, available once the quiz has finished.
    #[must_use]
    pub fn result_summary(&self) -> Option<LevelResult> {
        if self.session.phase != GamePhase::ScoreScreen {
            return None;
        }
        let level = self.current_level()?;
        let summary = ScoreSummary::new(self.session.score, self.session.total_questions);
        let badge = self
            .rewards
            .badge_for(&level.id)
            .map_or_else(|| level.reward_badge.clone(), str::to_string);
        Some(LevelResult {
            level_id: level.id.clone(),
            reward_unlocked: summary.passed,
            badge: Some(badge),
            summary,
            leaderboard: self
                .profile
                .high_scores
                .scores_for(&level.id)
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    fn persist(&self) {
        if let Err(err) = self.storage.save_profile(PROFILE_STORAGE_KEY, &self.profile) {
            log::warn!("could not save profile: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetMetadata, DroughtData, FloodData, SoilMoistureRecord};
    use crate::storage::MemoryStorage;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::cell::Cell;
    use std::rc::Rc;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("disk full")]
    struct DiskFull;

    #[derive(Clone, Default)]
    struct FailingStorage {
        saves: Rc<Cell<u32>>,
    }

    impl ProfileStorage for FailingStorage {
        type Error = DiskFull;

        fn load_profile(&self, _key: &str) -> Result<Option<Profile>, Self::Error> {
            Err(DiskFull)
        }

        fn save_profile(&self, _key: &str, _profile: &Profile) -> Result<(), Self::Error> {
            self.saves.set(self.saves.get() + 1);
            Err(DiskFull)
        }
    }

    fn store() -> ProgressStore<MemoryStorage> {
        let catalog = LevelCatalog::builtin();
        let rewards = RewardTable::from_catalog(&catalog);
        ProgressStore::open(catalog, rewards, MemoryStorage::new())
    }

    /// Clear every mission of the active level and open its quiz.
    fn play_to_quiz<S: ProfileStorage>(store: &mut ProgressStore<S>) {
        while store.phase() == GamePhase::MissionBriefing {
            store.complete_mission().unwrap();
        }
        if store.phase() == GamePhase::VideoCutscene {
            store.start_learning().unwrap();
        }
        store.start_quiz().unwrap();
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn drought_data(values: &[(&str, f64)]) -> LevelData {
        LevelData::Drought(DroughtData {
            metadata: DatasetMetadata {
                west: -103.5,
                east: -94.4,
                north: 40.0,
                south: 37.0,
                start_date: "2023-06-01".into(),
                end_date: "2023-08-31".into(),
            },
            records: values
                .iter()
                .map(|(site, moisture)| SoilMoistureRecord {
                    site_id: (*site).to_string(),
                    date: "2023-06-01".into(),
                    moisture: *moisture,
                })
                .collect(),
        })
    }

    #[test]
    fn unknown_level_leaves_session_untouched() {
        let mut store = store();
        assert_eq!(
            store.select_level("volcano", 4),
            Err(ProgressError::UnknownLevel("volcano".into()))
        );
        assert!(store.session().is_initial());
        assert!(matches!(
            store.select_level("flood", 9),
            Err(ProgressError::StepCountMismatch { .. })
        ));
        assert!(store.session().is_initial());
    }

    #[test]
    fn operations_need_an_active_level() {
        let mut store = store();
        assert_eq!(store.advance_mission(3), Err(ProgressError::NoActiveLevel));
        assert_eq!(store.start_learning(), Err(ProgressError::NoActiveLevel));
        assert_eq!(store.start_quiz(), Err(ProgressError::NoActiveLevel));
        assert_eq!(store.finish_quiz(1, 2), Err(ProgressError::NoActiveLevel));
        assert!(store.issue_ticket().is_err());
        assert!(store.begin_fetch().is_none());
        assert!(store.profile().high_scores.is_empty());
    }

    #[test]
    fn advance_refuses_to_pass_the_last_mission() {
        let mut store = store();
        store.select_level_by_id("heatwave").unwrap();
        assert_eq!(store.advance_mission(3), Ok(true));
        assert_eq!(store.advance_mission(3), Ok(true));
        assert_eq!(store.advance_mission(3), Ok(false));
        assert!(matches!(
            store.advance_mission(10),
            Err(ProgressError::MissionOutOfRange { index: 3, count: 3, .. })
        ));
        assert_eq!(store.session().current_mission_index, 2);
        assert_eq!(store.session().current_step, 3);
    }

    #[test]
    fn complete_mission_follows_sequencer() {
        let mut store = store();
        store.select_level_by_id("food-security").unwrap();
        assert_eq!(store.complete_mission(), Ok(NextStep::NextMission));
        assert_eq!(store.complete_mission(), Ok(NextStep::NextMission));
        assert_eq!(store.complete_mission(), Ok(NextStep::Learning));
        assert_eq!(store.phase(), GamePhase::Learning);
        assert!(matches!(
            store.complete_mission(),
            Err(ProgressError::InvalidPhase { .. })
        ));
        assert_eq!(store.start_cutscene(), Err(ProgressError::NoCutscene("food-security".into())));
    }

    #[test]
    fn level_cannot_be_closed_before_its_last_mission() {
        let mut store = store();
        store.select_level_by_id("drought").unwrap();
        let snapshot = store.session().clone();
        assert!(matches!(
            store.start_cutscene(),
            Err(ProgressError::MissionsRemaining { index: 0, count: 3, .. })
        ));
        assert!(matches!(
            store.start_learning(),
            Err(ProgressError::MissionsRemaining { .. })
        ));
        assert_eq!(
            store.start_quiz(),
            Err(ProgressError::InvalidPhase {
                operation: "start_quiz",
                phase: GamePhase::MissionBriefing
            })
        );
        assert_eq!(store.session(), &snapshot);

        store.start_data_quiz().unwrap();
        assert!(matches!(
            store.start_learning(),
            Err(ProgressError::InvalidPhase { phase: GamePhase::DataQuiz, .. })
        ));
        assert!(store.profile().badges.is_empty());
        assert!(store.profile().high_scores.is_empty());
    }

    #[test]
    fn score_screen_needs_a_new_run_before_another_quiz() {
        let mut store = store();
        store.select_level_by_id("heatwave").unwrap();
        play_to_quiz(&mut store);
        assert!(matches!(
            store.start_learning(),
            Err(ProgressError::InvalidPhase { phase: GamePhase::Quiz, .. })
        ));
        store.finish_quiz(3, 3).unwrap();
        let snapshot = store.session().clone();

        assert_eq!(
            store.start_quiz(),
            Err(ProgressError::InvalidPhase {
                operation: "start_quiz",
                phase: GamePhase::ScoreScreen
            })
        );
        assert!(store.start_cutscene().is_err());
        assert!(store.start_learning().is_err());
        assert_eq!(store.session(), &snapshot);
        assert_eq!(store.profile().high_scores.scores_for("heatwave").len(), 1);

        store.select_level_by_id("heatwave").unwrap();
        play_to_quiz(&mut store);
        store.finish_quiz(2, 3).unwrap();
        assert_eq!(store.profile().high_scores.scores_for("heatwave").len(), 2);
    }

    #[test]
    fn tied_driest_sites_resolve_to_the_first() {
        let mut store = store();
        store.select_level_by_id("drought").unwrap();
        let (ticket, _) = store.begin_fetch().unwrap();
        let data = drought_data(&[("A", 0.2), ("B", 0.1), ("C", 0.1)]);
        assert!(store.deliver_dataset::<String>(&ticket, Ok(data)).is_accepted());

        let later = store
            .submit_mission(&MissionAttempt::Site("C".into()))
            .unwrap();
        assert_eq!(later.validation, Validation::Incorrect);
        let first = store
            .submit_mission(&MissionAttempt::Site("B".into()))
            .unwrap();
        assert_eq!(first.step, Some(NextStep::DataQuiz));

        let mut rng = ChaCha20Rng::seed_from_u64(5);
        assert_eq!(store.data_questions(&mut rng)[0].correct_answer, "B");
    }

    #[test]
    fn drought_survey_detours_through_data_quiz() {
        let mut store = store();
        store.select_level_by_id("drought").unwrap();
        let (ticket, kind) = store.begin_fetch().unwrap();
        assert_eq!(kind, DatasetKind::Drought);
        assert!(store.data_state().is_loading());
        let data = drought_data(&[("A", 0.3), ("B", 0.1), ("C", 0.2)]);
        assert!(store.deliver_dataset::<String>(&ticket, Ok(data)).is_accepted());

        let wrong = store
            .submit_mission(&MissionAttempt::Site("A".into()))
            .unwrap();
        assert_eq!(wrong.validation, Validation::Incorrect);
        assert_eq!(store.phase(), GamePhase::MissionBriefing);

        let right = store
            .submit_mission(&MissionAttempt::Site("B".into()))
            .unwrap();
        assert_eq!(right.step, Some(NextStep::DataQuiz));
        assert_eq!(store.phase(), GamePhase::DataQuiz);

        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let questions = store.data_questions(&mut rng);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct_answer, "B");

        store.finish_data_quiz().unwrap();
        assert_eq!(store.session().current_mission_index, 1);
        assert_eq!(store.session().current_step, 2);
        assert!(store.quiz_request(Language::En).unwrap().data_context.is_some());
    }

    #[test]
    fn stale_deliveries_are_dropped() {
        let mut store = store();
        store.select_level_by_id("flood").unwrap();
        let (ticket, _) = store.begin_fetch().unwrap();
        let quiz_ticket = store.issue_ticket().unwrap();
        store.select_level_by_id("drought").unwrap();

        let delivery = store.deliver_dataset::<String>(&ticket, Ok(LevelData::Flood(FloodData::default())));
        assert_eq!(delivery, Delivery::Stale);
        assert_eq!(store.data_state(), &DataState::Idle);
        assert_eq!(store.deliver_quiz(&quiz_ticket, Vec::new()), Delivery::Stale);

        let (ticket, _) = store.begin_fetch().unwrap();
        store.restart_game();
        assert_eq!(
            store.deliver_dataset::<String>(&ticket, Err("timeout".into())),
            Delivery::Stale
        );
    }

    #[test]
    fn failed_load_marks_data_unavailable() {
        let mut store = store();
        store.select_level_by_id("flood").unwrap();
        let (ticket, _) = store.begin_fetch().unwrap();
        let delivery = store.deliver_dataset(&ticket, Err::<LevelData, _>("offline"));
        assert!(delivery.is_accepted());
        assert_eq!(store.data_state(), &DataState::Unavailable("offline".into()));
        assert_eq!(store.phase(), GamePhase::MissionBriefing);
        assert!(store.level_data().is_none());
    }

    #[test]
    fn finish_quiz_records_score_badge_and_saves() {
        let mut store = store();
        store.select_level_by_id("flood").unwrap();
        play_to_quiz(&mut store);
        assert_eq!(
            store.finish_quiz(6, 5),
            Err(ProgressError::ScoreExceedsQuestions { score: 6, questions: 5 })
        );
        assert_eq!(store.phase(), GamePhase::Quiz);

        store.finish_quiz(4, 5).unwrap();
        assert_eq!(store.phase(), GamePhase::ScoreScreen);
        assert!(store.profile().has_badge("flood-badge"));
        let saved = store.storage().document(PROFILE_STORAGE_KEY).unwrap();
        assert!(saved.contains("flood-badge"));

        let result = store.result_summary().unwrap();
        assert_eq!(result.summary.percentage, 80);
        assert!(result.reward_unlocked);
        assert_eq!(result.leaderboard.len(), 1);
    }

    #[test]
    fn failing_storage_never_blocks_play() {
        let storage = FailingStorage::default();
        let catalog = LevelCatalog::builtin();
        let rewards = RewardTable::from_catalog(&catalog);
        let mut store = ProgressStore::open(catalog, rewards, storage.clone());
        assert_eq!(store.profile(), &Profile::default());

        assert_eq!(store.check_streak(date(1)), StreakUpdate::Reset);
        assert_eq!(store.check_streak(date(1)), StreakUpdate::Unchanged);
        assert!(store.earn_badge("explorer"));
        assert!(!store.earn_badge("explorer"));
        store.select_level_by_id("heatwave").unwrap();
        play_to_quiz(&mut store);
        store.finish_quiz(1, 3).unwrap();
        assert_eq!(storage.saves.get(), 3);
        assert_eq!(store.profile().streak, 1);
    }

    #[test]
    fn restart_keeps_profile() {
        let mut store = store();
        store.check_streak(date(4));
        store.select_level_by_id("sustainability").unwrap();
        play_to_quiz(&mut store);
        store.finish_quiz(2, 2).unwrap();
        let profile = store.profile().clone();
        store.restart_game();
        assert!(store.session().is_initial());
        assert_eq!(store.profile(), &profile);
        assert!(store.result_summary().is_none());
    }

    #[test]
    fn rewards_table_overrides_level_badge() {
        let catalog = LevelCatalog::builtin();
        let rewards =
            RewardTable::from_json(r#"[{"id": "rain-ranger", "levelId": "flood"}]"#).unwrap();
        let mut store = ProgressStore::open(catalog, rewards, MemoryStorage::new());
        store.select_level_by_id("flood").unwrap();
        play_to_quiz(&mut store);
        store.finish_quiz(0, 3).unwrap();
        assert!(store.profile().has_badge("rain-ranger"));
        let result = store.result_summary().unwrap();
        assert!(!result.reward_unlocked);
        assert_eq!(result.badge.as_deref(), Some("rain-ranger"));
    }
}
