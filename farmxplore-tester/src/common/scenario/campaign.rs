use anyhow::{Result, ensure};
use farmxplore_game::constants::MAX_HIGH_SCORES_PER_LEVEL;

use super::ScenarioCtx;
use crate::logic::{PlayerStrategy, ScriptedPlayer};

/// A guessing player works through every level in catalog order.
pub async fn run(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let mut store = ctx.open_store();
    let mut player = ScriptedPlayer::new(PlayerStrategy::Guesser, ctx.language, ctx.seed);
    let level_ids: Vec<String> = ctx.assets.catalog.ids().map(str::to_string).collect();

    for level_id in &level_ids {
        let report = player.play_level(&mut store, ctx.assets, level_id).await?;
        let summary = report.result.summary;
        ctx.note(format_args!(
            "{level_id}: {}/{} {} after {} wrong attempt(s)",
            summary.score, summary.total, summary.grade, report.wrong_attempts
        ));

        ensure!(summary.score <= summary.total, "{level_id}: score above total");
        ensure!(
            report.result.reward_unlocked == summary.passed,
            "{level_id}: reward banner disagrees with pass mark"
        );
        ensure!(
            report.mission_attempts >= report.wrong_attempts,
            "{level_id}: more misses than attempts"
        );
        store.restart_game();
        ensure!(store.session().is_initial(), "{level_id}: restart left state behind");
    }

    for level_id in &level_ids {
        let badge = ctx.assets.rewards.badge_for(level_id).unwrap_or_default();
        ensure!(store.profile().has_badge(badge), "missing badge {badge}");
        let scores = store.profile().high_scores.scores_for(level_id);
        ensure!(
            !scores.is_empty() && scores.len() <= MAX_HIGH_SCORES_PER_LEVEL,
            "{level_id}: {} high score(s)",
            scores.len()
        );
    }
    ensure!(store.profile().badges.len() == level_ids.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::scenario::tests::test_ctx;
    use crate::logic::TesterAssets;

    #[tokio::test]
    async fn campaign_passes_for_several_seeds() {
        let assets = TesterAssets::load_default().unwrap();
        for seed in [1, 42, 1337] {
            run(&test_ctx(&assets, "campaign", seed)).await.unwrap();
        }
    }
}
