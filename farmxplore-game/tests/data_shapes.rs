use farmxplore_game::{
    HighScoreEntry, HighScoreLedger, LevelCatalog, Profile, QuizQuestion, RewardTable,
    parse_drought, parse_flood_table,
};
use serde_json::{Value, json};

const LEVELS_JSON: &str = include_str!("../../farmxplore-tester/data/levels.json");
const REWARDS_JSON: &str = include_str!("../../farmxplore-tester/data/rewards.json");

#[test]
fn shipped_catalog_matches_builtin_levels() {
    let catalog = LevelCatalog::from_json(LEVELS_JSON).unwrap();
    assert_eq!(catalog, LevelCatalog::builtin());
}

#[test]
fn shipped_rewards_match_level_badges() {
    let rewards = RewardTable::from_json(REWARDS_JSON).unwrap();
    let derived = RewardTable::from_catalog(&LevelCatalog::builtin());
    assert_eq!(rewards, derived);
    for level in LevelCatalog::builtin().iter() {
        assert_eq!(rewards.badge_for(&level.id), Some(level.reward_badge.as_str()));
    }
}

#[test]
fn level_json_uses_camel_case_keys() {
    let value = serde_json::to_value(LevelCatalog::builtin()).unwrap();
    let drought = &value[0];
    for key in ["subMissions", "quizTopic", "rewardBadge", "cutsceneVideo"] {
        assert!(drought.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value[4]["cutsceneVideo"], Value::Null);
}

#[test]
fn stored_profile_shape_is_stable() {
    let stored = json!({
        "badges": ["flood-badge", "drought-badge", "flood-badge"],
        "streak": 4,
        "lastPlayedDate": "2025-02-28",
        "highScores": [
            {"levelId": "flood", "score": 2},
            {"levelId": "flood", "score": 5},
            {"levelId": "drought", "score": 1}
        ]
    });
    let profile: Profile = serde_json::from_value(stored).unwrap();
    assert_eq!(profile.badges.len(), 2);
    assert_eq!(profile.streak, 4);
    assert_eq!(profile.high_scores.best_for("flood"), Some(5));

    let written = serde_json::to_value(&profile).unwrap();
    assert_eq!(written["lastPlayedDate"], "2025-02-28");
    assert_eq!(written["highScores"].as_array().map(Vec::len), Some(3));
}

#[test]
fn oversized_ledgers_are_trimmed_on_load() {
    let entries: Vec<HighScoreEntry> = (0..8).map(|score| HighScoreEntry::new("heatwave", score)).collect();
    let json = serde_json::to_string(&entries).unwrap();
    let ledger: HighScoreLedger = serde_json::from_str(&json).unwrap();
    let scores: Vec<u32> = ledger
        .scores_for("heatwave")
        .iter()
        .map(|entry| entry.score)
        .collect();
    assert_eq!(scores, [7, 6, 5, 4, 3]);
}

#[test]
fn generated_questions_read_correct_answer_key() {
    let question: QuizQuestion = serde_json::from_value(json!({
        "question": "levels.heatwave.quizTopic",
        "options": ["a", "b"],
        "correctAnswer": "b"
    }))
    .unwrap();
    assert!(question.is_answerable());
    assert_eq!(serde_json::to_value(&question).unwrap()["correctAnswer"], "b");
}

#[test]
fn sample_datasets_parse() {
    let drought = parse_drought(
        include_str!("../../farmxplore-tester/data/drought_metadata.xml"),
        include_str!("../../farmxplore-tester/data/drought_data.csv"),
    )
    .unwrap();
    assert_eq!(drought.records.len(), 5);
    assert_eq!(drought.metadata.start_date, "2023-07-01");
    assert!((drought.metadata.west + 102.05).abs() < 1e-9);

    let flood = parse_flood_table(include_str!("../../farmxplore-tester/data/flood_data.txt"));
    assert_eq!(flood.records.len(), 4);
    assert_eq!(flood.wettest_site().as_deref(), Some("flood-site-2"));
}
