//! Centralized balance and content constants for FarmXplore game logic.
//!
//! Values that decide progression, scoring, and validation live here so that
//! gameplay can only be adjusted through reviewed code changes.

// Persistence ---------------------------------------------------------------
/// Key under which the persistent profile is stored.
pub const PROFILE_STORAGE_KEY: &str = "farmxplore-progress-storage";

// High-score ledger -----------------------------------------------------------
/// Number of entries retained per level.
pub const MAX_HIGH_SCORES_PER_LEVEL: usize = 5;

// Data quiz -----------------------------------------------------------------
/// Minimum dataset size before a data quiz can be built.
pub const DATA_QUIZ_MIN_RECORDS: usize = 3;
/// Decimal places used when a measurement is shown as an answer option.
pub const DATA_QUIZ_VALUE_DECIMALS: usize = 3;
pub const DATA_QUIZ_DRIEST_SITE_KEY: &str = "dataQuiz.q_driest_site";
pub const DATA_QUIZ_LOWEST_VALUE_KEY: &str = "dataQuiz.q_lowest_value";

// Levels --------------------------------------------------------------------
pub const DROUGHT_LEVEL_ID: &str = "drought";
pub const FLOOD_LEVEL_ID: &str = "flood";
pub const HEATWAVE_LEVEL_ID: &str = "heatwave";
pub const SUSTAINABILITY_LEVEL_ID: &str = "sustainability";
pub const FOOD_SECURITY_LEVEL_ID: &str = "food-security";
/// Suffix appended to a level id to form its reward badge id.
pub const BADGE_SUFFIX: &str = "-badge";

// Missions ------------------------------------------------------------------
pub const SANDBAGS_REQUIRED: u32 = 5;
pub const MOST_EFFICIENT_PLAN_ID: &str = "drip";

// Result grading ------------------------------------------------------------
pub const GRADE_EXCELLENT_PCT: u32 = 80;
pub const GRADE_PASS_PCT: u32 = 50;

// Units ---------------------------------------------------------------------
pub const MOISTURE_UNIT: &str = "m³/m³";
pub const RAINFALL_UNIT: &str = "mm";
