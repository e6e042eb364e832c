//! Questions derived from a measured dataset after the drought site survey.
use rand::Rng;
use rand::seq::SliceRandom;

use crate::constants::{
    DATA_QUIZ_DRIEST_SITE_KEY, DATA_QUIZ_LOWEST_VALUE_KEY, DATA_QUIZ_MIN_RECORDS,
    DATA_QUIZ_VALUE_DECIMALS,
};
use crate::dataset::Measured;
use crate::quiz::{QuizOptions, QuizQuestion};

/// Build the two data-quiz questions for `records`.
///
/// Records are ordered by measurement and the lowest, middle and highest are
/// offered as options. Both questions ask for the lowest record: once by
/// site, once by its value. Option order comes from `rng`; colliding values
/// may produce duplicate option strings, which are kept.
///
/// Fewer than [`DATA_QUIZ_MIN_RECORDS`] records yield no questions.
pub fn generate_data_questions<M, R>(records: &[M], rng: &mut R) -> Vec<QuizQuestion>
where
    M: Measured,
    R: Rng + ?Sized,
{
    if records.len() < DATA_QUIZ_MIN_RECORDS {
        log::debug!(
            "data quiz skipped: {} records (need {DATA_QUIZ_MIN_RECORDS})",
            records.len()
        );
        return Vec::new();
    }

    let mut sorted: Vec<&M> = records.iter().collect();
    sorted.sort_by(|a, b| a.measurement().total_cmp(&b.measurement()));
    let picks = [sorted[0], sorted[sorted.len() / 2], sorted[sorted.len() - 1]];
    let lowest = picks[0];

    let format_value = |record: &M| format!("{:.*}", DATA_QUIZ_VALUE_DECIMALS, record.measurement());

    let mut site_options: QuizOptions = picks
        .iter()
        .map(|record| record.site_id().to_string())
        .collect();
    site_options.shuffle(rng);

    let mut value_options: QuizOptions = picks.iter().map(|&record| format_value(record)).collect();
    value_options.shuffle(rng);

    vec![
        QuizQuestion {
            question: DATA_QUIZ_DRIEST_SITE_KEY.to_string(),
            options: site_options,
            correct_answer: lowest.site_id().to_string(),
        },
        QuizQuestion {
            question: DATA_QUIZ_LOWEST_VALUE_KEY.to_string(),
            options: value_options,
            correct_answer: format_value(lowest),
        },
    ]
}
