//! Scientific datasets consumed by the drought and flood levels.
//!
//! The drought level reads a soil-moisture CSV plus an XML metadata record;
//! the flood level reads a whitespace-separated rainfall table. Parsing is
//! tolerant of blank and malformed rows, which are skipped.
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::constants::{DROUGHT_LEVEL_ID, FLOOD_LEVEL_ID, MOISTURE_UNIT};
use crate::numbers::usize_to_f64;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset unavailable: {0}")]
    Unavailable(String),
    #[error("metadata is missing <{0}>")]
    MissingTag(&'static str),
    #[error("metadata <{tag}> is not a number: '{value}'")]
    InvalidNumber { tag: &'static str, value: String },
    #[error("metadata pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}

/// A record carrying a site identifier and one scalar measurement.
pub trait Measured {
    fn site_id(&self) -> &str;
    fn measurement(&self) -> f64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilMoistureRecord {
    pub site_id: String,
    pub date: String,
    pub moisture: f64,
}

impl Measured for SoilMoistureRecord {
    fn site_id(&self) -> &str {
        &self.site_id
    }

    fn measurement(&self) -> f64 {
        self.moisture
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallRecord {
    pub id: String,
    pub lat: f64,
    pub long: f64,
    pub rainfall: f64,
}

impl Measured for RainfallRecord {
    fn site_id(&self) -> &str {
        &self.id
    }

    fn measurement(&self) -> f64 {
        self.rainfall
    }
}

/// Bounding box and time range of the drought dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    pub west: f64,
    pub east: f64,
    pub north: f64,
    pub south: f64,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroughtData {
    pub metadata: DatasetMetadata,
    pub records: Vec<SoilMoistureRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloodData {
    pub records: Vec<RainfallRecord>,
}

/// Data attached to the active level once its fetch completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LevelData {
    Drought(DroughtData),
    Flood(FloodData),
}

impl LevelData {
    #[must_use]
    pub const fn kind(&self) -> DatasetKind {
        match self {
            Self::Drought(_) => DatasetKind::Drought,
            Self::Flood(_) => DatasetKind::Flood,
        }
    }

    #[must_use]
    pub const fn as_drought(&self) -> Option<&DroughtData> {
        match self {
            Self::Drought(data) => Some(data),
            Self::Flood(_) => None,
        }
    }

    #[must_use]
    pub const fn as_flood(&self) -> Option<&FloodData> {
        match self {
            Self::Flood(data) => Some(data),
            Self::Drought(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Drought,
    Flood,
}

impl DatasetKind {
    /// Which dataset, if any, a level loads when selected.
    #[must_use]
    pub fn for_level(level_id: &str) -> Option<Self> {
        match level_id {
            DROUGHT_LEVEL_ID => Some(Self::Drought),
            FLOOD_LEVEL_ID => Some(Self::Flood),
            _ => None,
        }
    }
}

/// Min, max, and mean of one measurement plus the site at the interesting end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSummary {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    /// Driest site for moisture data, wettest site for rainfall data.
    pub target_site: String,
}

fn summarize<M: Measured>(records: &[M], target_is_min: bool) -> Option<MeasurementSummary> {
    let first = records.first()?;
    let mut min = first.measurement();
    let mut max = first.measurement();
    let mut total = 0.0;
    for record in records {
        let value = record.measurement();
        min = min.min(value);
        max = max.max(value);
        total += value;
    }
    let compare = |a: &&M, b: &&M| a.measurement().total_cmp(&b.measurement());
    let target = if target_is_min {
        records.iter().min_by(compare)?
    } else {
        records.iter().max_by(compare)?
    };
    Some(MeasurementSummary {
        min,
        max,
        average: total / usize_to_f64(records.len()),
        target_site: target.site_id().to_string(),
    })
}

impl DroughtData {
    /// Moisture range and the first driest site.
    #[must_use]
    pub fn summary(&self) -> Option<MeasurementSummary> {
        summarize(&self.records, true)
    }

    #[must_use]
    pub fn driest_site(&self) -> Option<String> {
        self.summary().map(|summary| summary.target_site)
    }

    /// Sentence describing the dataset, handed to the quiz generator.
    #[must_use]
    pub fn data_context(&self) -> Option<String> {
        let summary = self.summary()?;
        Some(format!(
            "The mission used real soil moisture data. The values ranged from {:.3} to {:.3} {MOISTURE_UNIT}. \
             The average was {:.3} {MOISTURE_UNIT}. The driest site was {}.",
            summary.min, summary.max, summary.average, summary.target_site
        ))
    }
}

impl FloodData {
    /// Rainfall range and the last wettest site.
    #[must_use]
    pub fn summary(&self) -> Option<MeasurementSummary> {
        summarize(&self.records, false)
    }

    #[must_use]
    pub fn wettest_site(&self) -> Option<String> {
        self.summary().map(|summary| summary.target_site)
    }
}

/// Parse the soil-moisture CSV, averaging sites measured more than once.
///
/// Columns are `_, date, site_id, moisture`; the header row is skipped. Sites
/// keep the order and date of their first appearance.
#[must_use]
pub fn parse_soil_csv(text: &str) -> Vec<SoilMoistureRecord> {
    struct SiteTotals {
        date: String,
        total: f64,
        count: usize,
    }

    let mut order: Vec<String> = Vec::new();
    let mut sites: HashMap<String, SiteTotals> = HashMap::new();

    for (line_no, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        let (Some(date), Some(site_id), Some(raw_moisture)) =
            (parts.get(1), parts.get(2), parts.get(3))
        else {
            log::warn!("skipping soil row {}: expected 4 columns", line_no + 1);
            continue;
        };
        let Ok(moisture) = raw_moisture.parse::<f64>() else {
            log::warn!(
                "skipping soil row {}: moisture '{raw_moisture}' is not a number",
                line_no + 1
            );
            continue;
        };
        let totals = sites.entry((*site_id).to_string()).or_insert_with(|| {
            order.push((*site_id).to_string());
            SiteTotals {
                date: (*date).to_string(),
                total: 0.0,
                count: 0,
            }
        });
        totals.total += moisture;
        totals.count += 1;
    }

    order
        .into_iter()
        .filter_map(|site_id| {
            let totals = sites.remove(&site_id)?;
            Some(SoilMoistureRecord {
                moisture: totals.total / usize_to_f64(totals.count),
                date: totals.date,
                site_id,
            })
        })
        .collect()
}

/// Parse the dataset metadata XML.
///
/// # Errors
///
/// Returns an error when a bounding coordinate or date tag is missing, or a
/// coordinate is not numeric.
pub fn parse_metadata(xml: &str) -> Result<DatasetMetadata, DatasetError> {
    let tag_pattern = Regex::new(r"<(\w+)>\s*([^<]*?)\s*</\w+>")?;
    let values: HashMap<&str, &str> = tag_pattern
        .captures_iter(xml)
        .filter_map(|caps| {
            let tag = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str();
            Some((tag, value))
        })
        .collect();

    let text = |tag: &'static str| -> Result<String, DatasetError> {
        values
            .get(tag)
            .map(|value| (*value).to_string())
            .ok_or(DatasetError::MissingTag(tag))
    };
    let number = |tag: &'static str| -> Result<f64, DatasetError> {
        let raw = text(tag)?;
        raw.parse::<f64>()
            .map_err(|_| DatasetError::InvalidNumber { tag, value: raw })
    };

    Ok(DatasetMetadata {
        west: number("WestBoundingCoordinate")?,
        east: number("EastBoundingCoordinate")?,
        north: number("NorthBoundingCoordinate")?,
        south: number("SouthBoundingCoordinate")?,
        start_date: text("RangeBeginningDate")?,
        end_date: text("RangeEndingDate")?,
    })
}

/// Parse the rainfall table. Rows are `_ lat long rainfall`; ids follow the
/// row position after the header, and rows without a numeric rainfall are
/// dropped.
#[must_use]
pub fn parse_flood_table(text: &str) -> FloodData {
    let records = text
        .lines()
        .skip(1)
        .enumerate()
        .filter_map(|(index, line)| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            let rainfall = parts.get(3)?.parse::<f64>().ok()?;
            let coordinate =
                |i: usize| parts.get(i).and_then(|v| v.parse::<f64>().ok()).unwrap_or(f64::NAN);
            Some(RainfallRecord {
                id: format!("flood-site-{index}"),
                lat: coordinate(1),
                long: coordinate(2),
                rainfall,
            })
        })
        .collect();
    FloodData { records }
}

/// Assemble drought data from its two source documents.
///
/// # Errors
///
/// Returns an error when the metadata cannot be parsed.
pub fn parse_drought(metadata_xml: &str, soil_csv: &str) -> Result<DroughtData, DatasetError> {
    Ok(DroughtData {
        metadata: parse_metadata(metadata_xml)?,
        records: parse_soil_csv(soil_csv),
    })
}
