pub mod scenario;
pub mod util;

pub use util::{parse_day, profile_dir, split_csv};
