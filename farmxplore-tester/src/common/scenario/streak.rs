use anyhow::{Context, Result, ensure};
use chrono::Days;
use farmxplore_game::StreakUpdate;

use super::ScenarioCtx;

/// Play on consecutive days, twice on one day, then skip a day.
pub fn run(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let day = |offset: u64| {
        ctx.today
            .checked_add_days(Days::new(offset))
            .with_context(|| format!("{} + {offset} days overflows", ctx.today))
    };
    let plan = [
        (0, StreakUpdate::Reset, 1),
        (1, StreakUpdate::Extended, 2),
        (1, StreakUpdate::Unchanged, 2),
        (2, StreakUpdate::Extended, 3),
        (4, StreakUpdate::Reset, 1),
    ];

    for (offset, expected, streak) in plan {
        // Each day is a fresh app start reading the saved profile.
        let mut store = ctx.open_store();
        let today = day(offset)?;
        let update = store.check_streak(today);
        ctx.note(format_args!("{today}: {update:?} -> {}", store.profile().streak));
        ensure!(update == expected, "{today}: expected {expected:?}, got {update:?}");
        ensure!(
            store.profile().streak == streak,
            "{today}: streak {} instead of {streak}",
            store.profile().streak
        );
        ensure!(store.profile().last_played_date == Some(today));
    }
    Ok(())
}
