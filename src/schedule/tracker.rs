use std::collections::HashMap;

use crate::config::ScheduleConfig;

use super::slot_utils::{block_start_minutes, overlaps};
use super::types::ScheduleDocument;

/// Per-day ledgers of which teacher and which room are busy at which
/// time ranges. Appended to on every allocation and queried before one;
/// the forward passes never remove entries. All times are minutes since
/// midnight, all durations the classes' registered durations.
#[derive(Debug, Clone, Default)]
pub struct ConstraintTracker {
    teacher_allocations: HashMap<String, Vec<(u32, u32, String)>>,
    room_allocations: HashMap<String, Vec<(u32, u32, u8)>>,
}

impl ConstraintTracker {
    pub fn new() -> Self {
        ConstraintTracker::default()
    }

    /// A tracker rebuilt from an existing document, so a later pass can
    /// query availability without trusting stale ledgers.
    pub fn rebuild(document: &ScheduleDocument, config: &ScheduleConfig) -> Self {
        let mut tracker = ConstraintTracker::new();
        for (day, blocks) in &document.days {
            for (time, assignments) in blocks {
                let Some(start) = block_start_minutes(time) else {
                    continue;
                };
                for assignment in assignments {
                    let duration = config.duration_of(&assignment.class);
                    tracker.allocate(day, start, duration, &assignment.teacher, assignment.room);
                }
            }
        }
        tracker
    }

    /// True iff no existing allocation for this teacher on this day
    /// overlaps [start, start + duration).
    pub fn is_teacher_free(&self, day: &str, start: u32, duration: u32, teacher: &str) -> bool {
        self.teacher_allocations
            .get(day)
            .map(|entries| {
                !entries.iter().any(|(s, d, t)| {
                    t == teacher && overlaps(start, duration, *s, *d)
                })
            })
            .unwrap_or(true)
    }

    /// True iff no existing allocation in this room on this day
    /// overlaps [start, start + duration).
    pub fn is_room_free(&self, day: &str, start: u32, duration: u32, room: u8) -> bool {
        self.room_allocations
            .get(day)
            .map(|entries| {
                !entries.iter().any(|(s, d, r)| {
                    *r == room && overlaps(start, duration, *s, *d)
                })
            })
            .unwrap_or(true)
    }

    /// Records an allocation in both ledgers.
    pub fn allocate(&mut self, day: &str, start: u32, duration: u32, teacher: &str, room: u8) {
        self.teacher_allocations
            .entry(day.to_string())
            .or_default()
            .push((start, duration, teacher.to_string()));
        self.room_allocations
            .entry(day.to_string())
            .or_default()
            .push((start, duration, room));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::ClassAssignment;

    #[test]
    fn test_everything_free_initially() {
        let tracker = ConstraintTracker::new();
        assert!(tracker.is_teacher_free("Segunda", 600, 60, "Professor 2"));
        assert!(tracker.is_room_free("Segunda", 600, 60, 1));
    }

    #[test]
    fn test_allocation_blocks_teacher_and_room() {
        let mut tracker = ConstraintTracker::new();
        tracker.allocate("Segunda", 600, 60, "Professor 2", 1);

        assert!(!tracker.is_teacher_free("Segunda", 600, 60, "Professor 2"));
        assert!(!tracker.is_room_free("Segunda", 600, 60, 1));
        // Other teacher, other room, same range.
        assert!(tracker.is_teacher_free("Segunda", 600, 60, "Professor 3"));
        assert!(tracker.is_room_free("Segunda", 600, 60, 2));
        // Same teacher, other day.
        assert!(tracker.is_teacher_free("Terça", 600, 60, "Professor 2"));
    }

    #[test]
    fn test_partial_overlap_blocks() {
        let mut tracker = ConstraintTracker::new();
        // 10:00 for 60 minutes.
        tracker.allocate("Quarta", 600, 60, "Professor 3", 2);

        // 10:30 start collides in the same room.
        assert!(!tracker.is_room_free("Quarta", 630, 60, 2));
        // 11:00 start does not (half-open intervals).
        assert!(tracker.is_room_free("Quarta", 660, 60, 2));
    }

    #[test]
    fn test_short_durations_respected() {
        let mut tracker = ConstraintTracker::new();
        // 30 minute class at 10:00 leaves 10:30 free.
        tracker.allocate("Sexta", 600, 30, "Professor 2", 1);
        assert!(tracker.is_room_free("Sexta", 630, 60, 1));
        assert!(tracker.is_teacher_free("Sexta", 630, 60, "Professor 2"));
    }

    #[test]
    fn test_rebuild_from_document() {
        let config = crate::config::ScheduleConfig::default();
        let mut doc = ScheduleDocument::empty(&config);
        doc.push(
            "Segunda",
            "10:00 - 11:00",
            ClassAssignment {
                class: "Pilates".to_string(),
                room: 1,
                teacher: "Professor 3".to_string(),
                score: 2.0,
            },
        );

        let tracker = ConstraintTracker::rebuild(&doc, &config);
        assert!(!tracker.is_room_free("Segunda", 600, 60, 1));
        assert!(!tracker.is_teacher_free("Segunda", 630, 60, "Professor 3"));
        assert!(tracker.is_room_free("Segunda", 600, 60, 2));
    }
}
