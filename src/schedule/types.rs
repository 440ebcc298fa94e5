use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ScheduleConfig;

/// One class placed in a room at a (day, time-block). Scores stay
/// numeric here; formatting happens at the presentation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassAssignment {
    pub class: String,
    pub room: u8,
    pub teacher: String,
    pub score: f64,
}

/// The generated week: day -> time-block -> assignments (at most one
/// per room). Built fresh for every generation run and returned as the
/// sole artifact; nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleDocument {
    pub days: HashMap<String, HashMap<String, Vec<ClassAssignment>>>,
}

impl ScheduleDocument {
    /// An empty document with every (day, time-block) of the catalog
    /// mapped to an empty assignment list.
    pub fn empty(config: &ScheduleConfig) -> Self {
        let mut days = HashMap::new();
        for day in &config.days {
            let mut blocks = HashMap::new();
            for time in &config.time_blocks {
                blocks.insert(time.clone(), Vec::new());
            }
            days.insert(day.clone(), blocks);
        }
        ScheduleDocument { days }
    }

    pub fn assignments(&self, day: &str, time: &str) -> &[ClassAssignment] {
        self.days
            .get(day)
            .and_then(|blocks| blocks.get(time))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn assignments_mut(&mut self, day: &str, time: &str) -> Option<&mut Vec<ClassAssignment>> {
        self.days.get_mut(day).and_then(|blocks| blocks.get_mut(time))
    }

    pub fn push(&mut self, day: &str, time: &str, assignment: ClassAssignment) {
        if let Some(list) = self.assignments_mut(day, time) {
            list.push(assignment);
        }
    }

    /// True if a room already holds an assignment at this exact block.
    pub fn room_taken(&self, day: &str, time: &str, room: u8) -> bool {
        self.assignments(day, time).iter().any(|a| a.room == room)
    }

    pub fn total_assignments(&self) -> usize {
        self.days
            .values()
            .flat_map(|blocks| blocks.values())
            .map(Vec::len)
            .sum()
    }

    /// Number of times a class appears across the whole week.
    pub fn occurrences_of(&self, class_name: &str) -> usize {
        self.days
            .values()
            .flat_map(|blocks| blocks.values())
            .flatten()
            .filter(|a| a.class == class_name)
            .count()
    }
}

/// Final result of a generation run: the document plus diagnostic
/// counters for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleOutcome {
    pub schedule: ScheduleDocument,
    /// Weekly allocation count per class, after the conflict sweep.
    pub class_counts: HashMap<String, u32>,
    /// Fraction of (day, time-block, room) triples that got a class.
    pub coverage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(class: &str, room: u8) -> ClassAssignment {
        ClassAssignment {
            class: class.to_string(),
            room,
            teacher: "Professor 2".to_string(),
            score: 1.5,
        }
    }

    #[test]
    fn test_empty_document_covers_catalog() {
        let config = ScheduleConfig::default();
        let doc = ScheduleDocument::empty(&config);
        assert_eq!(doc.days.len(), 5);
        for blocks in doc.days.values() {
            assert_eq!(blocks.len(), 10);
        }
        assert_eq!(doc.total_assignments(), 0);
    }

    #[test]
    fn test_push_and_room_taken() {
        let config = ScheduleConfig::default();
        let mut doc = ScheduleDocument::empty(&config);
        doc.push("Segunda", "10:00 - 11:00", assignment("Hiit", 1));
        assert!(doc.room_taken("Segunda", "10:00 - 11:00", 1));
        assert!(!doc.room_taken("Segunda", "10:00 - 11:00", 2));
        assert_eq!(doc.assignments("Segunda", "10:00 - 11:00").len(), 1);
        assert_eq!(doc.occurrences_of("Hiit"), 1);
    }

    #[test]
    fn test_serializes_to_day_time_map() {
        let config = ScheduleConfig::default();
        let mut doc = ScheduleDocument::empty(&config);
        doc.push("Segunda", "10:00 - 11:00", assignment("GAP", 2));
        let json = serde_json::to_value(&doc).unwrap();
        let slot = &json["Segunda"]["10:00 - 11:00"][0];
        assert_eq!(slot["class"], "GAP");
        assert_eq!(slot["room"], 2);
        assert_eq!(slot["teacher"], "Professor 2");
    }
}
