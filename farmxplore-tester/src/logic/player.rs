//! Scripted players that drive a level from selection to the score screen.
use anyhow::{Context, Result, bail};
use farmxplore_game::constants::{MOST_EFFICIENT_PLAN_ID, SANDBAGS_REQUIRED};
use farmxplore_game::missions::{
    CROPS, FLOOD_ACTIONS, IRRIGATION_PLANS, correct_flood_actions, most_resistant_crop,
};
use farmxplore_game::rng::{CountingRng, DATA_QUIZ_STREAM, PLAYER_STREAM, seeded_stream};
use farmxplore_game::{
    Delivery, GamePhase, Language, LevelData, LevelResult, MissionAttempt, MissionRule,
    ProfileStorage, ProgressStore, QuizGenerator, QuizQuestion, QuizRun, QuizStep, ScoreSummary,
};
use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use std::fmt;

use super::assets::TesterAssets;
use crate::loader::fetch_dataset;

/// Phase changes allowed in one level before the run is declared stuck.
const MAX_TRANSITIONS: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStrategy {
    /// Always submits the right answer.
    Expert,
    /// Guesses first and falls back to the right answer after a miss.
    Guesser,
}

impl PlayerStrategy {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Expert => "Expert",
            Self::Guesser => "Guesser",
        }
    }
}

impl fmt::Display for PlayerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What happened while one level was played.
#[derive(Debug, Clone, Serialize)]
pub struct PlayReport {
    pub level_id: String,
    pub strategy: PlayerStrategy,
    pub mission_attempts: u32,
    pub wrong_attempts: u32,
    pub data_quiz: Option<ScoreSummary>,
    pub result: LevelResult,
    pub draws: u64,
}

/// The correct attempt for `rule`, or `None` when the dataset it needs is missing.
#[must_use]
pub fn expert_attempt(rule: MissionRule, data: Option<&LevelData>) -> Option<MissionAttempt> {
    let attempt = match rule {
        MissionRule::DriestSite => MissionAttempt::Site(
            data.and_then(LevelData::as_drought)
                .and_then(|drought| drought.driest_site())?,
        ),
        MissionRule::WettestSite => MissionAttempt::Site(
            data.and_then(LevelData::as_flood)
                .and_then(|flood| flood.wettest_site())?,
        ),
        MissionRule::DroughtResistantCrop => {
            MissionAttempt::Crop(most_resistant_crop()?.id.to_string())
        }
        MissionRule::EfficientIrrigation => {
            MissionAttempt::IrrigationPlan(MOST_EFFICIENT_PLAN_ID.to_string())
        }
        MissionRule::FloodActions => MissionAttempt::FloodActions(correct_flood_actions()),
        MissionRule::Sandbags => MissionAttempt::Sandbags(SANDBAGS_REQUIRED),
        MissionRule::Open => MissionAttempt::Proceed,
    };
    Some(attempt)
}

fn site_ids(data: Option<&LevelData>) -> Vec<String> {
    match data {
        Some(LevelData::Drought(drought)) => drought
            .records
            .iter()
            .map(|record| record.site_id.clone())
            .collect(),
        Some(LevelData::Flood(flood)) => flood.records.iter().map(|record| record.id.clone()).collect(),
        None => Vec::new(),
    }
}

pub struct ScriptedPlayer {
    strategy: PlayerStrategy,
    language: Language,
    rng: CountingRng<ChaCha20Rng>,
    data_quiz_rng: CountingRng<ChaCha20Rng>,
}

impl ScriptedPlayer {
    #[must_use]
    pub fn new(strategy: PlayerStrategy, language: Language, seed: u64) -> Self {
        Self {
            strategy,
            language,
            rng: seeded_stream(seed, PLAYER_STREAM),
            data_quiz_rng: seeded_stream(seed, DATA_QUIZ_STREAM),
        }
    }

    #[must_use]
    pub fn draws(&self) -> u64 {
        self.rng.draws() + self.data_quiz_rng.draws()
    }

    fn guess_attempt(&mut self, rule: MissionRule, data: Option<&LevelData>) -> MissionAttempt {
        let rng = &mut self.rng;
        match rule {
            MissionRule::DriestSite | MissionRule::WettestSite => {
                let sites = site_ids(data);
                MissionAttempt::Site(sites.choose(rng).cloned().unwrap_or_default())
            }
            MissionRule::DroughtResistantCrop => MissionAttempt::Crop(
                CROPS
                    .choose(rng)
                    .map(|crop| crop.id.to_string())
                    .unwrap_or_default(),
            ),
            MissionRule::EfficientIrrigation => MissionAttempt::IrrigationPlan(
                IRRIGATION_PLANS
                    .choose(rng)
                    .map(|plan| plan.id.to_string())
                    .unwrap_or_default(),
            ),
            MissionRule::FloodActions => MissionAttempt::FloodActions(
                FLOOD_ACTIONS
                    .iter()
                    .filter(|_| rng.gen_bool(0.5))
                    .map(|action| action.id.to_string())
                    .collect(),
            ),
            MissionRule::Sandbags => {
                MissionAttempt::Sandbags(rng.gen_range(0..=SANDBAGS_REQUIRED * 2))
            }
            MissionRule::Open => MissionAttempt::Proceed,
        }
    }

    /// Pick an option for `question`.
    pub fn answer(&mut self, question: &QuizQuestion) -> String {
        match self.strategy {
            PlayerStrategy::Expert => question.correct_answer.clone(),
            PlayerStrategy::Guesser => question
                .options
                .choose(&mut self.rng)
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn play_quiz(&mut self, questions: Vec<QuizQuestion>) -> Result<ScoreSummary> {
        let mut run = QuizRun::new(questions)?;
        loop {
            let choice = self.answer(run.current());
            let _ = run.select(&choice);
            if let QuizStep::Completed { score, total } = run.next_question()? {
                return Ok(ScoreSummary::new(score, total));
            }
        }
    }

    /// Play the active mission until it is solved.
    fn solve_mission<S: ProfileStorage>(
        &mut self,
        store: &mut ProgressStore<S>,
        report: &mut PlayReport,
    ) -> Result<()> {
        let rule = MissionRule::for_mission(&report.level_id, store.session().current_mission_index);
        let data = store.level_data().cloned();

        if self.strategy == PlayerStrategy::Guesser {
            let guess = self.guess_attempt(rule, data.as_ref());
            report.mission_attempts += 1;
            if store.submit_mission(&guess)?.validation.is_correct() {
                return Ok(());
            }
            report.wrong_attempts += 1;
        }

        let Some(attempt) = expert_attempt(rule, data.as_ref()) else {
            bail!("mission {rule} of {} has no dataset to answer from", report.level_id);
        };
        report.mission_attempts += 1;
        if !store.submit_mission(&attempt)?.validation.is_correct() {
            bail!("expert attempt {attempt:?} was rejected by {rule}");
        }
        Ok(())
    }

    /// Select `level_id` and play it through to the score screen.
    pub async fn play_level<S: ProfileStorage>(
        &mut self,
        store: &mut ProgressStore<S>,
        assets: &TesterAssets,
        level_id: &str,
    ) -> Result<PlayReport> {
        store
            .select_level_by_id(level_id)
            .with_context(|| format!("selecting {level_id}"))?;

        if let Some((ticket, kind)) = store.begin_fetch() {
            let outcome = fetch_dataset(assets.loader.clone(), kind).await;
            if let Delivery::Stale = store.deliver_dataset(&ticket, outcome) {
                bail!("dataset for {level_id} arrived stale");
            }
        }

        let mut report = PlayReport {
            level_id: level_id.to_string(),
            strategy: self.strategy,
            mission_attempts: 0,
            wrong_attempts: 0,
            data_quiz: None,
            result: LevelResult {
                level_id: level_id.to_string(),
                summary: ScoreSummary::new(0, 0),
                badge: None,
                reward_unlocked: false,
                leaderboard: Vec::new(),
            },
            draws: 0,
        };

        for _ in 0..MAX_TRANSITIONS {
            match store.phase() {
                GamePhase::MissionBriefing => self.solve_mission(store, &mut report)?,
                GamePhase::DataQuiz => {
                    let questions = store.data_questions(&mut self.data_quiz_rng);
                    if !questions.is_empty() {
                        report.data_quiz = Some(self.play_quiz(questions)?);
                    }
                    store.finish_data_quiz()?;
                }
                GamePhase::VideoCutscene => store.start_learning()?,
                GamePhase::Learning => store.start_quiz()?,
                GamePhase::Quiz => {
                    let ticket = store.issue_ticket()?;
                    let request = store.quiz_request(self.language)?;
                    let generated = assets
                        .quiz_bank
                        .generate(&request)
                        .with_context(|| format!("quiz for {level_id}"))?;
                    let Delivery::Accepted(questions) = store.deliver_quiz(&ticket, generated)
                    else {
                        bail!("quiz for {level_id} arrived stale");
                    };
                    let summary = self.play_quiz(questions)?;
                    store.finish_quiz(summary.score, summary.total)?;
                }
                GamePhase::ScoreScreen => {
                    report.result = store
                        .result_summary()
                        .context("score screen without a result")?;
                    report.draws = self.draws();
                    return Ok(report);
                }
                GamePhase::LevelSelection => bail!("{level_id} was left unexpectedly"),
            }
        }
        bail!("{level_id} did not finish within {MAX_TRANSITIONS} transitions")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmxplore_game::{DatasetKind, DatasetLoader, Grade, MemoryStorage, Validation};

    fn new_store(assets: &TesterAssets) -> ProgressStore<MemoryStorage> {
        ProgressStore::open(
            assets.catalog.clone(),
            assets.rewards.clone(),
            MemoryStorage::new(),
        )
    }

    #[test]
    fn expert_attempts_pass_every_rule() {
        let assets = TesterAssets::load_default().unwrap();
        let drought = assets.loader.load(DatasetKind::Drought).unwrap();
        for rule in [
            MissionRule::DriestSite,
            MissionRule::DroughtResistantCrop,
            MissionRule::EfficientIrrigation,
            MissionRule::Open,
        ] {
            let attempt = expert_attempt(rule, Some(&drought)).unwrap();
            assert_eq!(rule.validate(&attempt, Some(&drought)), Validation::Correct);
        }
        assert!(expert_attempt(MissionRule::WettestSite, None).is_none());
    }

    #[tokio::test]
    async fn expert_clears_the_drought_level() {
        let assets = TesterAssets::load_default().unwrap();
        let mut store = new_store(&assets);
        let mut player = ScriptedPlayer::new(PlayerStrategy::Expert, Language::En, 7);
        let report = player.play_level(&mut store, &assets, "drought").await.unwrap();

        assert_eq!(report.wrong_attempts, 0);
        assert_eq!(report.mission_attempts, 3);
        assert_eq!(report.data_quiz.map(|quiz| quiz.score), Some(2));
        assert_eq!(report.result.summary.grade, Grade::Excellent);
        assert!(store.profile().has_badge("drought-badge"));
    }

    #[tokio::test]
    async fn guesser_runs_are_reproducible() {
        let assets = TesterAssets::load_default().unwrap();
        let mut first = Vec::new();
        for _ in 0..2 {
            let mut store = new_store(&assets);
            let mut player = ScriptedPlayer::new(PlayerStrategy::Guesser, Language::Fr, 99);
            let report = player.play_level(&mut store, &assets, "flood").await.unwrap();
            first.push((report.wrong_attempts, report.result.summary, report.draws));
        }
        assert_eq!(first[0], first[1]);
    }
}
