pub mod assets;
pub mod player;
pub mod reports;
pub mod tester;

pub use assets::TesterAssets;
pub use player::{PlayerStrategy, ScriptedPlayer};
pub use tester::{LogicTester, RunSettings, ScenarioResult};
