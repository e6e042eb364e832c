use anyhow::Result;
use chrono::NaiveDate;
use farmxplore_game::{Language, ProgressStore};
use std::fmt;
use std::path::PathBuf;

use crate::logic::TesterAssets;
use crate::storage::JsonFileStorage;

pub mod campaign;
pub mod leaderboard;
pub mod persistence;
pub mod smoke;
pub mod stale_fetch;
pub mod streak;

/// Everything one scenario run needs.
#[derive(Debug, Clone)]
pub struct ScenarioCtx<'a> {
    pub assets: &'a TesterAssets,
    pub seed: u64,
    pub profile_dir: PathBuf,
    pub today: NaiveDate,
    pub language: Language,
    pub verbose: bool,
}

impl ScenarioCtx<'_> {
    /// Open a store on this run's profile directory.
    pub fn open_store(&self) -> ProgressStore<JsonFileStorage> {
        ProgressStore::open(
            self.assets.catalog.clone(),
            self.assets.rewards.clone(),
            JsonFileStorage::new(&self.profile_dir),
        )
    }

    pub fn note(&self, message: impl fmt::Display) {
        if self.verbose {
            println!("     {message}");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    Smoke,
    FullCampaign,
    Persistence,
    StaleFetch,
    Streak,
    Leaderboard,
}

impl Scenario {
    pub const ALL: [Self; 6] = [
        Self::Smoke,
        Self::FullCampaign,
        Self::Persistence,
        Self::StaleFetch,
        Self::Streak,
        Self::Leaderboard,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Smoke => "smoke",
            Self::FullCampaign => "full-campaign",
            Self::Persistence => "persistence",
            Self::StaleFetch => "stale-fetch",
            Self::Streak => "streak",
            Self::Leaderboard => "leaderboard",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Smoke => "Smoke Test - expert run of the drought level",
            Self::FullCampaign => "Full Campaign - every level with seeded guesses",
            Self::Persistence => "Profile Persistence - reopen from the saved file",
            Self::StaleFetch => "Stale Fetch - late results after a restart are dropped",
            Self::Streak => "Daily Streak - consecutive days, repeats and gaps",
            Self::Leaderboard => "High-Score Ledger - per-level cap and ordering",
        }
    }

    pub async fn run(self, ctx: &ScenarioCtx<'_>) -> Result<()> {
        match self {
            Self::Smoke => smoke::run(ctx).await,
            Self::FullCampaign => campaign::run(ctx).await,
            Self::Persistence => persistence::run(ctx).await,
            Self::StaleFetch => stale_fetch::run(ctx).await,
            Self::Streak => streak::run(ctx),
            Self::Leaderboard => leaderboard::run(ctx).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

pub fn get_scenario(name: &str) -> Option<Scenario> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(Scenario::Smoke),
        "full-campaign" | "campaign" => Some(Scenario::FullCampaign),
        "persistence" | "profile" => Some(Scenario::Persistence),
        "stale-fetch" | "stale" => Some(Scenario::StaleFetch),
        "streak" => Some(Scenario::Streak),
        "leaderboard" | "high-scores" => Some(Scenario::Leaderboard),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    Scenario::ALL
        .iter()
        .map(|scenario| (scenario.key(), scenario.description()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Context writing into a fresh temporary profile directory.
    pub fn test_ctx<'a>(assets: &'a TesterAssets, label: &str, seed: u64) -> ScenarioCtx<'a> {
        let profile_dir = std::env::temp_dir().join(format!(
            "farmxplore-scenario-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        ScenarioCtx {
            assets,
            seed,
            profile_dir,
            today: NaiveDate::from_ymd_opt(2025, 4, 22).unwrap(),
            language: Language::En,
            verbose: false,
        }
    }

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, description) in list_scenarios() {
            assert_eq!(get_scenario(key).map(Scenario::key), Some(key));
            assert!(!description.is_empty());
        }
        assert_eq!(get_scenario("STALE"), Some(Scenario::StaleFetch));
        assert!(get_scenario("unknown").is_none());
    }
}
