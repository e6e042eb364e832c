use chrono::NaiveDate;
use colored::Colorize;
use farmxplore_game::Language;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::TesterAssets;
use crate::common::profile_dir;
use crate::common::scenario::{Scenario, ScenarioCtx};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

/// Settings shared by every seed of a run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub profile_root: PathBuf,
    pub today: NaiveDate,
    pub language: Language,
}

pub struct LogicTester {
    verbose: bool,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Run `scenario` once per seed, each on a freshly cleared profile directory.
    pub async fn run_scenario(
        &self,
        assets: &TesterAssets,
        scenario: Scenario,
        seeds: &[u64],
        settings: &RunSettings,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (seed: {seed})",
                    scenario.description().bright_white()
                );
            }

            let dir = profile_dir(&settings.profile_root, scenario.key(), seed);
            if let Err(err) = clear_dir(&dir) {
                failures.push(format!("Seed {seed}: cannot reset {}: {err}", dir.display()));
                continue;
            }
            let ctx = ScenarioCtx {
                assets,
                seed,
                profile_dir: dir,
                today: settings.today,
                language: settings.language,
                verbose: self.verbose,
            };

            let start_time = Instant::now();
            let outcome = scenario.run(&ctx).await;
            performance_data.push(start_time.elapsed());

            match outcome {
                Ok(()) => successes += 1,
                Err(err) => {
                    log::error!("{scenario} failed for seed {seed}: {err:#}");
                    failures.push(format!("Seed {seed}: {err:#}"));
                }
            }
        }

        let avg_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.description().to_string(),
            passed: failures.is_empty(),
            iterations_run: seeds.len(),
            successful_iterations: successes,
            failures,
            average_duration: avg_duration,
            performance_data,
        }
    }
}

fn clear_dir(dir: &std::path::Path) -> std::io::Result<()> {
    match fs::remove_dir_all(dir) {
        Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
