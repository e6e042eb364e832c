use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Per-run profile directory so scenarios never share a saved profile.
pub fn profile_dir(base: &Path, scenario: &str, seed: u64) -> PathBuf {
    base.join(scenario).join(format!("seed-{seed}"))
}

/// Parse a `YYYY-MM-DD` calendar day.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" smoke, ,streak,  leaderboard ");
        assert_eq!(parts, vec!["smoke", "streak", "leaderboard"]);
    }

    #[test]
    fn profile_dir_includes_scenario_and_seed() {
        let dir = profile_dir(Path::new("target/profiles"), "smoke", 42);
        assert_eq!(dir, Path::new("target/profiles/smoke/seed-42"));
    }

    #[test]
    fn parse_day_accepts_iso_dates_only() {
        assert_eq!(
            parse_day(" 2025-03-01 ").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(parse_day("03/01/2025").is_err());
    }
}
