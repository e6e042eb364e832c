use anyhow::{Context, Result};
use farmxplore_game::{LevelCatalog, RewardTable};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::loader::FileDatasetLoader;
use crate::quiz_bank::OfflineQuizGenerator;

const REWARDS_FILE: &str = "rewards.json";
const QUIZ_BANK_FILE: &str = "quiz_bank.json";

/// Read-only content shared by every scenario run.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    pub catalog: LevelCatalog,
    pub rewards: RewardTable,
    pub loader: Arc<FileDatasetLoader>,
    pub quiz_bank: OfflineQuizGenerator,
}

impl TesterAssets {
    /// Built-in catalog, bundled datasets and quiz bank.
    pub fn load_default() -> Result<Self> {
        let catalog = LevelCatalog::builtin();
        Ok(Self {
            rewards: RewardTable::from_catalog(&catalog),
            catalog,
            loader: Arc::new(FileDatasetLoader::bundled()),
            quiz_bank: OfflineQuizGenerator::bundled().context("bundled quiz bank")?,
        })
    }

    /// Assets with an optional catalog file and data directory overriding
    /// the bundled copies. Rewards and the quiz bank are read from the data
    /// directory when it has them.
    pub fn load(catalog_path: Option<&Path>, data_dir: Option<&Path>) -> Result<Self> {
        let mut assets = Self::load_default()?;

        if let Some(path) = catalog_path {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog {}", path.display()))?;
            assets.catalog = LevelCatalog::from_json(&json)
                .with_context(|| format!("invalid catalog {}", path.display()))?;
            assets.rewards = RewardTable::from_catalog(&assets.catalog);
        }

        if let Some(dir) = data_dir {
            assets.loader = Arc::new(FileDatasetLoader::from_dir(dir));
            let rewards_path = dir.join(REWARDS_FILE);
            if rewards_path.is_file() {
                let json = fs::read_to_string(&rewards_path)
                    .with_context(|| format!("failed to read {}", rewards_path.display()))?;
                assets.rewards = RewardTable::from_json(&json)
                    .with_context(|| format!("invalid rewards {}", rewards_path.display()))?;
            }
            let bank_path = dir.join(QUIZ_BANK_FILE);
            if bank_path.is_file() {
                let json = fs::read_to_string(&bank_path)
                    .with_context(|| format!("failed to read {}", bank_path.display()))?;
                assets.quiz_bank = OfflineQuizGenerator::from_json(&json)
                    .with_context(|| format!("invalid quiz bank {}", bank_path.display()))?;
            }
        }

        log::debug!(
            "loaded {} level(s), {} reward(s), datasets from {:?}",
            assets.catalog.len(),
            assets.rewards.len(),
            assets.loader.data_dir()
        );
        Ok(assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_assets_cover_every_level() {
        let assets = TesterAssets::load_default().unwrap();
        assert_eq!(assets.catalog.len(), 5);
        for id in assets.catalog.ids() {
            assert!(assets.rewards.badge_for(id).is_some(), "{id}");
        }
        assert!(assets.loader.data_dir().is_none());
    }

    #[test]
    fn shipped_data_dir_loads() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let assets = TesterAssets::load(Some(&dir.join("levels.json")), Some(&dir)).unwrap();
        assert_eq!(assets.catalog, LevelCatalog::builtin());
        assert_eq!(assets.rewards.badge_for("flood"), Some("flood-badge"));
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let err = TesterAssets::load(Some(Path::new("/nonexistent/levels.json")), None)
            .unwrap_err();
        assert!(format!("{err:#}").contains("levels.json"));
    }
}
