use anyhow::{Result, ensure};
use farmxplore_game::constants::MAX_HIGH_SCORES_PER_LEVEL;

use super::ScenarioCtx;
use crate::logic::{PlayerStrategy, ScriptedPlayer};

const REPLAYS: u64 = 8;
const LEVEL_ID: &str = "heatwave";

/// Replaying one level keeps only its best scores, highest first, and
/// awards its badge once.
pub async fn run(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let mut store = ctx.open_store();
    let mut achieved = Vec::new();
    for replay in 0..REPLAYS {
        let mut player = ScriptedPlayer::new(
            PlayerStrategy::Guesser,
            ctx.language,
            ctx.seed.wrapping_add(replay),
        );
        let report = player.play_level(&mut store, ctx.assets, LEVEL_ID).await?;
        achieved.push(report.result.summary.score);
        store.restart_game();
    }

    let kept: Vec<u32> = store
        .profile()
        .high_scores
        .scores_for(LEVEL_ID)
        .iter()
        .map(|entry| entry.score)
        .collect();
    achieved.sort_unstable_by(|a, b| b.cmp(a));
    achieved.truncate(MAX_HIGH_SCORES_PER_LEVEL);
    ctx.note(format_args!("kept {kept:?}"));

    ensure!(kept == achieved, "ledger {kept:?} should hold the best {achieved:?}");
    ensure!(store.profile().badges.len() == 1, "badge awarded more than once");
    ensure!(
        store.profile().high_scores.len() == kept.len(),
        "other levels gained scores"
    );
    Ok(())
}
