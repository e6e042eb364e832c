use anyhow::{Result, ensure};
use farmxplore_game::{GamePhase, Grade};

use super::ScenarioCtx;
use crate::logic::{PlayerStrategy, ScriptedPlayer};

/// An expert clears the drought level, including its data quiz, and the
/// profile file is written.
pub async fn run(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let mut store = ctx.open_store();
    let mut player = ScriptedPlayer::new(PlayerStrategy::Expert, ctx.language, ctx.seed);
    let report = player.play_level(&mut store, ctx.assets, "drought").await?;
    ctx.note(format_args!(
        "drought: {}/{} ({})",
        report.result.summary.score, report.result.summary.total, report.result.summary.grade
    ));

    ensure!(report.wrong_attempts == 0, "expert made {} wrong attempts", report.wrong_attempts);
    let data_quiz = report.data_quiz.map(|quiz| (quiz.score, quiz.total));
    ensure!(data_quiz == Some((2, 2)), "data quiz scored {data_quiz:?}");
    ensure!(
        report.result.summary.grade == Grade::Excellent,
        "expected an excellent grade, got {}",
        report.result.summary.grade
    );
    ensure!(report.result.reward_unlocked, "reward should be unlocked");
    ensure!(store.profile().has_badge("drought-badge"), "badge not earned");
    ensure!(store.session().current_step == store.session().total_steps);

    store.restart_game();
    ensure!(store.phase() == GamePhase::LevelSelection);
    let saved = store.storage().path_for(farmxplore_game::constants::PROFILE_STORAGE_KEY);
    ensure!(saved.is_file(), "profile was not saved to {}", saved.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::scenario::tests::test_ctx;
    use crate::logic::TesterAssets;

    #[tokio::test]
    async fn smoke_passes_with_bundled_assets() {
        let assets = TesterAssets::load_default().unwrap();
        run(&test_ctx(&assets, "smoke", 1337)).await.unwrap();
    }
}
