//! Daily engagement streak.
//!
//! Days are compared as local calendar dates, never as timestamps. The caller
//! decides what "today" is; [`local_today`] reads it from the system clock.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What a streak check did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakUpdate {
    /// Already counted today.
    Unchanged,
    /// Played yesterday as well; the streak grew by one.
    Extended,
    /// First play, or at least one day was skipped; the streak restarted at 1.
    Reset,
}

impl StreakUpdate {
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Apply the once-per-start streak rule for `today`.
pub fn advance_streak(
    streak: &mut u32,
    last_played: &mut Option<NaiveDate>,
    today: NaiveDate,
) -> StreakUpdate {
    if *last_played == Some(today) {
        return StreakUpdate::Unchanged;
    }

    let played_yesterday = today
        .pred_opt()
        .is_some_and(|yesterday| *last_played == Some(yesterday));
    *last_played = Some(today);

    if played_yesterday {
        *streak = streak.saturating_add(1);
        StreakUpdate::Extended
    } else {
        *streak = 1;
        StreakUpdate::Reset
    }
}

/// Today's date in the local timezone.
#[must_use]
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
