use crate::parser::PreferenceRecord;

/// Weight applied per weekly occurrence of a class when comparing
/// candidates, so no single class dominates the week. Tunable between
/// 0.1 and 0.2.
pub const FREQUENCY_PENALTY_WEIGHT: f64 = 0.15;

/// Score floor for slots no record has an opinion on, so classes with
/// no survey signal still compete for leftover slots.
const NO_SIGNAL_SCORE: f64 = 0.5;

/// Desirability of placing a class at (day, time), averaged over the
/// records that had an opinion about any part of the triple.
///
/// A record that marked the day or the block unavailable contributes
/// only its -5 penalty; its preferred-time, preferred-day and favorite
/// bonuses are withheld for that slot, since the student cannot attend.
pub fn slot_score(class_name: &str, day: &str, time: &str, records: &[PreferenceRecord]) -> f64 {
    let mut score = 0.0;
    let mut match_count = 0u32;

    for record in records {
        let day_unavailable = record.unavailable_days.iter().any(|d| d == day);
        let time_unavailable = record.unavailable_time_blocks.iter().any(|t| t == time);

        if day_unavailable {
            score -= 5.0;
            match_count += 1;
        }
        if time_unavailable {
            score -= 5.0;
            match_count += 1;
        }
        if day_unavailable || time_unavailable {
            continue;
        }

        if record.time_blocks.iter().any(|t| t == time) {
            score += 2.0;
            match_count += 1;
        }
        if record.preferred_days.iter().any(|d| d == day) {
            score += 2.0;
            match_count += 1;
        }
        if let Some(rank) = record.rank_of(class_name) {
            score += (6 - rank) as f64 * 2.0;
            match_count += 1;
        }
    }

    if match_count == 0 {
        NO_SIGNAL_SCORE
    } else {
        score / match_count as f64
    }
}

/// Discourages clustering one class on one day: -1 per time the class
/// already appears on that day.
pub fn distribution_penalty(count_on_day: u32) -> f64 {
    -(count_on_day as f64)
}

/// Discourages over-representing one class across the whole week.
pub fn frequency_penalty(global_count: u32, weight: f64) -> f64 {
    global_count as f64 * weight
}
