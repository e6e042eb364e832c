use anyhow::{Context, Result, ensure};
use farmxplore_game::constants::PROFILE_STORAGE_KEY;
use farmxplore_game::{Profile, StreakUpdate};
use std::fs;

use super::ScenarioCtx;
use crate::logic::{PlayerStrategy, ScriptedPlayer};

/// Progress survives reopening the store, and a corrupt save falls back to a
/// fresh profile instead of failing.
pub async fn run(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let saved = {
        let mut store = ctx.open_store();
        ensure!(store.check_streak(ctx.today) == StreakUpdate::Reset);
        let mut player = ScriptedPlayer::new(PlayerStrategy::Expert, ctx.language, ctx.seed);
        player.play_level(&mut store, ctx.assets, "flood").await?;
        store.restart_game();
        store.profile().clone()
    };

    let reopened = ctx.open_store();
    ensure!(
        reopened.profile() == &saved,
        "reopened profile differs: {:?}",
        reopened.profile()
    );
    ensure!(reopened.session().is_initial(), "session must not be persisted");
    ensure!(reopened.profile().last_played_date == Some(ctx.today));
    ctx.note(format_args!(
        "reopened with {} badge(s), streak {}",
        saved.badges.len(),
        saved.streak
    ));

    let path = reopened.storage().path_for(PROFILE_STORAGE_KEY);
    fs::write(&path, "{\"badges\": [")
        .with_context(|| format!("failed to corrupt {}", path.display()))?;
    let recovered = ctx.open_store();
    ensure!(
        recovered.profile() == &Profile::default(),
        "corrupt save should load the default profile"
    );
    Ok(())
}
