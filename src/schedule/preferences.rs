use std::collections::HashMap;

use serde::Serialize;

use crate::parser::PreferenceRecord;

/// Aggregated popularity counters derived from the raw survey records.
/// Drives the allocator's day/time ordering and the stats endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreferenceSummary {
    /// Class -> summed rank weight (rank 1 is worth 5, rank 5 worth 1).
    pub class_popularity: HashMap<String, u32>,
    /// Time block -> number of records that marked it preferred.
    pub time_popularity: HashMap<String, u32>,
    /// Day -> number of records that marked it preferred.
    pub day_popularity: HashMap<String, u32>,
    /// Day -> number of records that marked it unavailable.
    pub day_unavailability: HashMap<String, u32>,
}

/// Reduces the record list into per-class, per-day and per-time-block
/// counters. Pure; records with missing fields contribute nothing for
/// those fields.
pub fn aggregate(records: &[PreferenceRecord]) -> PreferenceSummary {
    let mut summary = PreferenceSummary::default();

    for record in records {
        for (rank, class_name) in record.favorites() {
            *summary
                .class_popularity
                .entry(class_name.to_string())
                .or_insert(0) += 6 - rank;
        }
        for block in &record.time_blocks {
            *summary.time_popularity.entry(block.clone()).or_insert(0) += 1;
        }
        for day in &record.preferred_days {
            *summary.day_popularity.entry(day.clone()).or_insert(0) += 1;
        }
        for day in &record.unavailable_days {
            *summary.day_unavailability.entry(day.clone()).or_insert(0) += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(favorites: &[&str], blocks: &[&str], preferred: &[&str], unavailable: &[&str]) -> PreferenceRecord {
        let fav = |i: usize| favorites.get(i).map(|s| s.to_string());
        PreferenceRecord {
            favorite_class_1: fav(0),
            favorite_class_2: fav(1),
            favorite_class_3: fav(2),
            favorite_class_4: fav(3),
            favorite_class_5: fav(4),
            time_blocks: blocks.iter().map(|s| s.to_string()).collect(),
            preferred_days: preferred.iter().map(|s| s.to_string()).collect(),
            unavailable_days: unavailable.iter().map(|s| s.to_string()).collect(),
            unavailable_time_blocks: Vec::new(),
        }
    }

    #[test]
    fn test_rank_weights() {
        let records = vec![record(
            &["Pilates", "Zumba", "Hiit", "GAP", "Fullbody"],
            &[],
            &[],
            &[],
        )];
        let summary = aggregate(&records);
        assert_eq!(summary.class_popularity["Pilates"], 5);
        assert_eq!(summary.class_popularity["Zumba"], 4);
        assert_eq!(summary.class_popularity["Fullbody"], 1);
    }

    #[test]
    fn test_weights_accumulate_across_records() {
        let records = vec![
            record(&["Pilates"], &[], &[], &[]),
            record(&["Zumba", "Pilates"], &[], &[], &[]),
        ];
        let summary = aggregate(&records);
        // 5 as rank 1 plus 4 as rank 2.
        assert_eq!(summary.class_popularity["Pilates"], 9);
        assert_eq!(summary.class_popularity["Zumba"], 5);
    }

    #[test]
    fn test_day_and_time_counters() {
        let records = vec![
            record(&[], &["10:00 - 11:00"], &["Segunda"], &["Sexta"]),
            record(&[], &["10:00 - 11:00", "18:00 - 19:00"], &["Segunda", "Terça"], &[]),
        ];
        let summary = aggregate(&records);
        assert_eq!(summary.time_popularity["10:00 - 11:00"], 2);
        assert_eq!(summary.time_popularity["18:00 - 19:00"], 1);
        assert_eq!(summary.day_popularity["Segunda"], 2);
        assert_eq!(summary.day_popularity["Terça"], 1);
        assert_eq!(summary.day_unavailability["Sexta"], 1);
    }

    #[test]
    fn test_empty_input_yields_empty_summary() {
        let summary = aggregate(&[]);
        assert!(summary.class_popularity.is_empty());
        assert!(summary.time_popularity.is_empty());
        assert!(summary.day_popularity.is_empty());
        assert!(summary.day_unavailability.is_empty());
    }

    #[test]
    fn test_degraded_record_contributes_nothing() {
        let summary = aggregate(&[PreferenceRecord::default()]);
        assert!(summary.class_popularity.is_empty());
    }
}
