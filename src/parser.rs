use csv::Reader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// One student's submitted survey: five ranked favorite classes plus
/// preferred/unavailable days and time blocks. Every field may be
/// missing in degraded records; scoring treats absent data as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferenceRecord {
    #[serde(default)]
    pub favorite_class_1: Option<String>,
    #[serde(default)]
    pub favorite_class_2: Option<String>,
    #[serde(default)]
    pub favorite_class_3: Option<String>,
    #[serde(default)]
    pub favorite_class_4: Option<String>,
    #[serde(default)]
    pub favorite_class_5: Option<String>,
    #[serde(default)]
    pub time_blocks: Vec<String>,
    #[serde(default)]
    pub preferred_days: Vec<String>,
    #[serde(default)]
    pub unavailable_days: Vec<String>,
    #[serde(default)]
    pub unavailable_time_blocks: Vec<String>,
}

impl PreferenceRecord {
    /// Favorites as (rank, class name) pairs, rank 1 = most preferred.
    /// Empty entries are skipped, keeping the rank of the remaining ones.
    pub fn favorites(&self) -> impl Iterator<Item = (u32, &str)> {
        [
            &self.favorite_class_1,
            &self.favorite_class_2,
            &self.favorite_class_3,
            &self.favorite_class_4,
            &self.favorite_class_5,
        ]
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            entry
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| (i as u32 + 1, name))
        })
    }

    /// Rank of a class in this record, if listed. Only the first
    /// matching rank counts.
    pub fn rank_of(&self, class_name: &str) -> Option<u32> {
        self.favorites()
            .find(|(_, name)| *name == class_name)
            .map(|(rank, _)| rank)
    }

    fn is_empty(&self) -> bool {
        self.favorites().next().is_none()
            && self.time_blocks.is_empty()
            && self.preferred_days.is_empty()
            && self.unavailable_days.is_empty()
            && self.unavailable_time_blocks.is_empty()
    }
}

/// Splits a comma-separated cell into trimmed, non-empty entries.
/// Time blocks ("10:00 - 11:00") contain no commas, so a plain split
/// is safe for every list column.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Loads preference records from a survey-export CSV.
///
/// Columns are located by header name so the export column order does
/// not matter. Rows missing fields are kept with those fields empty;
/// rows with no usable data at all are skipped.
pub fn load_preferences<P: AsRef<Path>>(csv_path: P) -> Result<Vec<PreferenceRecord>, ScheduleError> {
    let reader = Reader::from_path(csv_path)?;
    read_preferences(reader)
}

/// Same as [`load_preferences`] but from an in-memory CSV body, used by
/// the upload endpoint.
pub fn parse_preferences_csv(data: &[u8]) -> Result<Vec<PreferenceRecord>, ScheduleError> {
    let reader = Reader::from_reader(data);
    read_preferences(reader)
}

fn read_preferences<R: std::io::Read>(
    mut reader: Reader<R>,
) -> Result<Vec<PreferenceRecord>, ScheduleError> {
    let headers = reader.headers()?.clone();

    // Exact match only: "time_blocks" is a substring of
    // "unavailable_time_blocks", so anything looser mis-binds columns
    // in a reordered export.
    let find_col = |needle: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(needle))
    };

    let favorite_cols: Vec<Option<usize>> = (1..=5)
        .map(|i| find_col(&format!("favorite_class_{}", i)))
        .collect();
    let time_blocks_col = find_col("time_blocks");
    let preferred_days_col = find_col("preferred_days");
    let unavailable_days_col = find_col("unavailable_days");
    let unavailable_blocks_col = find_col("unavailable_time_blocks");

    if favorite_cols.iter().all(Option::is_none)
        && time_blocks_col.is_none()
        && preferred_days_col.is_none()
    {
        return Err(ScheduleError::InvalidInput(
            "no preference columns found in CSV header".to_string(),
        ));
    }

    let get = |record: &csv::StringRecord, col: Option<usize>| {
        col.and_then(|i| record.get(i)).unwrap_or("").to_string()
    };

    let mut entries = Vec::new();
    for result in reader.records() {
        let record = result?;

        let favorites: Vec<Option<String>> = favorite_cols
            .iter()
            .map(|col| parse_optional(&get(&record, *col)))
            .collect();

        let entry = PreferenceRecord {
            favorite_class_1: favorites[0].clone(),
            favorite_class_2: favorites[1].clone(),
            favorite_class_3: favorites[2].clone(),
            favorite_class_4: favorites[3].clone(),
            favorite_class_5: favorites[4].clone(),
            time_blocks: parse_list(&get(&record, time_blocks_col)),
            preferred_days: parse_list(&get(&record, preferred_days_col)),
            unavailable_days: parse_list(&get(&record, unavailable_days_col)),
            unavailable_time_blocks: parse_list(&get(&record, unavailable_blocks_col)),
        };

        if entry.is_empty() {
            continue;
        }
        entries.push(entry);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
favorite_class_1,favorite_class_2,favorite_class_3,favorite_class_4,favorite_class_5,time_blocks,preferred_days,unavailable_days,unavailable_time_blocks
Pilates,Zumba,Hiit,GAP,Fullbody,\"10:00 - 11:00, 18:00 - 19:00\",\"Segunda, Quarta\",Sexta,
Zumba,,,,,19:00 - 20:00,Terça,,18:00 - 19:00
,,,,,,,,
";

    #[test]
    fn test_parses_complete_record() {
        let entries = parse_preferences_csv(SAMPLE_CSV.as_bytes()).unwrap();
        let first = &entries[0];
        assert_eq!(first.favorite_class_1.as_deref(), Some("Pilates"));
        assert_eq!(first.favorite_class_5.as_deref(), Some("Fullbody"));
        assert_eq!(
            first.time_blocks,
            vec!["10:00 - 11:00".to_string(), "18:00 - 19:00".to_string()]
        );
        assert_eq!(first.preferred_days, vec!["Segunda", "Quarta"]);
        assert_eq!(first.unavailable_days, vec!["Sexta"]);
        assert!(first.unavailable_time_blocks.is_empty());
    }

    #[test]
    fn test_degraded_record_keeps_partial_fields() {
        let entries = parse_preferences_csv(SAMPLE_CSV.as_bytes()).unwrap();
        let second = &entries[1];
        assert_eq!(second.favorite_class_1.as_deref(), Some("Zumba"));
        assert!(second.favorite_class_2.is_none());
        assert_eq!(second.unavailable_time_blocks, vec!["18:00 - 19:00"]);
        assert!(second.unavailable_days.is_empty());
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let entries = parse_preferences_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_reordered_columns_bind_exactly() {
        // unavailable_time_blocks first must not be mistaken for
        // time_blocks.
        let csv = "\
unavailable_time_blocks,unavailable_days,preferred_days,time_blocks,favorite_class_1
18:00 - 19:00,Sexta,Segunda,10:00 - 11:00,Pilates
";
        let entries = parse_preferences_csv(csv.as_bytes()).unwrap();
        let record = &entries[0];
        assert_eq!(record.time_blocks, vec!["10:00 - 11:00"]);
        assert_eq!(record.unavailable_time_blocks, vec!["18:00 - 19:00"]);
        assert_eq!(record.preferred_days, vec!["Segunda"]);
        assert_eq!(record.unavailable_days, vec!["Sexta"]);
        assert_eq!(record.favorite_class_1.as_deref(), Some("Pilates"));
    }

    #[test]
    fn test_missing_columns_rejected() {
        let csv = "name,age\nana,30\n";
        assert!(matches!(
            parse_preferences_csv(csv.as_bytes()),
            Err(ScheduleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_favorites_keep_rank_over_gaps() {
        let record = PreferenceRecord {
            favorite_class_1: Some("Pilates".to_string()),
            favorite_class_3: Some("Hiit".to_string()),
            ..Default::default()
        };
        let favorites: Vec<(u32, &str)> = record.favorites().collect();
        assert_eq!(favorites, vec![(1, "Pilates"), (3, "Hiit")]);
        assert_eq!(record.rank_of("Hiit"), Some(3));
        assert_eq!(record.rank_of("Zumba"), None);
    }

    #[test]
    fn test_json_record_with_missing_fields() {
        let record: PreferenceRecord =
            serde_json::from_str(r#"{"favorite_class_1": "Yoga Flow"}"#).unwrap();
        assert_eq!(record.rank_of("Yoga Flow"), Some(1));
        assert!(record.time_blocks.is_empty());
    }
}
