use anyhow::{Context, Result, bail, ensure};
use farmxplore_game::{DataState, Delivery, QuizGenerator};

use super::ScenarioCtx;
use crate::loader::fetch_dataset;

/// Results requested for one run must not land in the run that replaced it.
pub async fn run(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let mut store = ctx.open_store();
    store.select_level_by_id("drought")?;
    let Some((ticket, kind)) = store.begin_fetch() else {
        bail!("drought level did not request a dataset");
    };
    let pending = tokio::spawn(fetch_dataset(ctx.assets.loader.clone(), kind));

    store.restart_game();
    store.select_level_by_id("flood")?;
    ensure!(matches!(store.data_state(), DataState::Idle));

    let outcome = pending.await.context("dataset task panicked")?;
    ensure!(
        store.deliver_dataset(&ticket, outcome) == Delivery::Stale,
        "drought data was accepted into the flood run"
    );
    ensure!(store.level_data().is_none(), "stale data leaked into the session");

    // Re-selecting the same level also invalidates older tickets.
    let quiz_ticket = store.issue_ticket()?;
    let request = store.quiz_request(ctx.language)?;
    store.select_level_by_id("flood")?;
    let questions = ctx.assets.quiz_bank.generate(&request)?;
    ensure!(
        !store.deliver_quiz(&quiz_ticket, questions).is_accepted(),
        "quiz for a replaced run was accepted"
    );

    let fresh = store.issue_ticket()?;
    let questions = ctx.assets.quiz_bank.generate(&request)?;
    let Delivery::Accepted(accepted) = store.deliver_quiz(&fresh, questions) else {
        bail!("current quiz was rejected");
    };
    ctx.note(format_args!("current run accepted {} question(s)", accepted.len()));
    Ok(())
}
