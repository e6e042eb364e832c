//! Dataset files for the drought and flood levels.
//!
//! Files are read from `--data-dir` when given; otherwise the copies bundled
//! into the binary are used.
use farmxplore_game::{
    DatasetError, DatasetKind, DatasetLoader, DroughtData, FloodData, LevelData, parse_drought,
    parse_flood_table,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub const DROUGHT_METADATA_FILE: &str = "drought_metadata.xml";
pub const DROUGHT_DATA_FILE: &str = "drought_data.csv";
pub const FLOOD_DATA_FILE: &str = "flood_data.txt";

const BUNDLED: [(&str, &str); 3] = [
    (
        DROUGHT_METADATA_FILE,
        include_str!("../data/drought_metadata.xml"),
    ),
    (DROUGHT_DATA_FILE, include_str!("../data/drought_data.csv")),
    (FLOOD_DATA_FILE, include_str!("../data/flood_data.txt")),
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no bundled copy of {0}")]
    NotBundled(String),
    #[error(transparent)]
    Parse(#[from] DatasetError),
    #[error("dataset task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Default)]
pub struct FileDatasetLoader {
    data_dir: Option<PathBuf>,
}

impl FileDatasetLoader {
    /// Loader reading only the bundled datasets.
    #[must_use]
    pub const fn bundled() -> Self {
        Self { data_dir: None }
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    fn read_text(&self, file_name: &str) -> Result<String, LoadError> {
        if let Some(dir) = &self.data_dir {
            let path = dir.join(file_name);
            return fs::read_to_string(&path).map_err(|source| LoadError::Io { path, source });
        }
        BUNDLED
            .iter()
            .find(|(name, _)| *name == file_name)
            .map(|(_, text)| (*text).to_string())
            .ok_or_else(|| LoadError::NotBundled(file_name.to_string()))
    }
}

impl DatasetLoader for FileDatasetLoader {
    type Error = LoadError;

    fn load_drought(&self) -> Result<DroughtData, Self::Error> {
        let metadata = self.read_text(DROUGHT_METADATA_FILE)?;
        let soil = self.read_text(DROUGHT_DATA_FILE)?;
        Ok(parse_drought(&metadata, &soil)?)
    }

    fn load_flood(&self) -> Result<FloodData, Self::Error> {
        Ok(parse_flood_table(&self.read_text(FLOOD_DATA_FILE)?))
    }
}

/// Load `kind` on the blocking pool so file reads never stall the runtime.
pub async fn fetch_dataset(
    loader: Arc<FileDatasetLoader>,
    kind: DatasetKind,
) -> Result<LevelData, LoadError> {
    tokio::task::spawn_blocking(move || loader.load(kind))
        .await
        .map_err(|err| LoadError::Task(err.to_string()))?
}
