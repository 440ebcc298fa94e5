use std::collections::HashMap;

use log::{debug, info};

use crate::config::ScheduleConfig;
use crate::parser::PreferenceRecord;

use super::preferences::{aggregate, PreferenceSummary};
use super::scorer::{distribution_penalty, frequency_penalty, slot_score, FREQUENCY_PENALTY_WEIGHT};
use super::slot_utils::{block_start_minutes, overlaps};
use super::tracker::ConstraintTracker;
use super::types::{ClassAssignment, ScheduleDocument, ScheduleOutcome};

/// Score recorded on fixed-schedule assignments.
pub const FIXED_SLOT_SCORE: f64 = 1.0;

/// Toggles for the allocation pipeline. The reference behavior is the
/// default; tests switch passes and penalties off individually.
#[derive(Debug, Clone)]
pub struct AllocatorOptions {
    /// Weekly occurrence cap per class.
    pub occurrence_cap: u32,
    /// Minimum composite score the primary pass accepts.
    pub acceptance_threshold: f64,
    pub use_distribution_penalty: bool,
    pub frequency_penalty_weight: f64,
    /// Visit days and time blocks in descending aggregated popularity
    /// instead of catalog order.
    pub order_by_popularity: bool,
    pub run_fill_pass: bool,
    pub run_conflict_sweep: bool,
}

impl Default for AllocatorOptions {
    fn default() -> Self {
        AllocatorOptions {
            occurrence_cap: 4,
            acceptance_threshold: -1.0,
            use_distribution_penalty: true,
            frequency_penalty_weight: FREQUENCY_PENALTY_WEIGHT,
            order_by_popularity: true,
            run_fill_pass: true,
            run_conflict_sweep: true,
        }
    }
}

struct Candidate {
    class: String,
    teacher: String,
    duration: u32,
    score: f64,
}

struct Allocator<'a> {
    config: &'a ScheduleConfig,
    records: &'a [PreferenceRecord],
    options: &'a AllocatorOptions,
    summary: PreferenceSummary,
    document: ScheduleDocument,
    tracker: ConstraintTracker,
    /// (day, class) -> allocations of that class on that day.
    day_counts: HashMap<(String, String), u32>,
    /// class -> allocations across the week.
    global_counts: HashMap<String, u32>,
    /// teacher -> allocations across the week, for the fill pass.
    teacher_counts: HashMap<String, u32>,
}

/// Runs the full allocation pipeline: fixed slots first, then the
/// popularity-driven primary pass, then the relaxed fill pass, then the
/// conflict sweep. Deterministic for identical input: ties are broken
/// by class name ascending, never randomly.
pub fn generate_schedule(
    config: &ScheduleConfig,
    records: &[PreferenceRecord],
    options: &AllocatorOptions,
) -> ScheduleOutcome {
    let mut allocator = Allocator {
        config,
        records,
        options,
        summary: aggregate(records),
        document: ScheduleDocument::empty(config),
        tracker: ConstraintTracker::new(),
        day_counts: HashMap::new(),
        global_counts: HashMap::new(),
        teacher_counts: HashMap::new(),
    };

    allocator.fixed_allocation();

    // With no survey signal there is nothing to optimize: the schedule
    // is the fixed slots only, never a week of guesses.
    if records.is_empty() {
        info!("no preference records; returning fixed slots only");
    } else {
        allocator.primary_pass();
        if options.run_fill_pass {
            allocator.fill_pass();
        }
    }

    if options.run_conflict_sweep {
        conflict_sweep(&mut allocator.document, config);
    }

    allocator.finish()
}

/// Removes overlapping assignments sharing a room, day by day, using
/// registered class durations. A fixed-schedule entry always survives;
/// otherwise the higher-scored entry does. Afterwards every fixed slot
/// is re-verified and re-inserted if it went missing.
pub fn conflict_sweep(document: &mut ScheduleDocument, config: &ScheduleConfig) {
    for day in &config.days {
        for room in 1..=config.rooms {
            sweep_room(document, config, day, room);
        }
    }
    // A restored fixed slot can itself collide with a surviving entry
    // in its room; one more sweep resolves that in the fixed entry's
    // favor.
    if restore_fixed_slots(document, config) {
        for day in &config.days {
            for room in 1..=config.rooms {
                sweep_room(document, config, day, room);
            }
        }
    }
}

struct SweepEntry {
    time: String,
    index: usize,
    start: u32,
    duration: u32,
    score: f64,
    fixed: bool,
}

fn sweep_room(document: &mut ScheduleDocument, config: &ScheduleConfig, day: &str, room: u8) {
    loop {
        let mut entries: Vec<SweepEntry> = Vec::new();
        for time in &config.time_blocks {
            let Some(start) = block_start_minutes(time) else {
                continue;
            };
            for (index, assignment) in document.assignments(day, time).iter().enumerate() {
                if assignment.room != room {
                    continue;
                }
                entries.push(SweepEntry {
                    time: time.clone(),
                    index,
                    start,
                    duration: config.duration_of(&assignment.class),
                    score: assignment.score,
                    fixed: config.is_fixed_assignment(day, time, &assignment.class),
                });
            }
        }
        entries.sort_by(|a, b| a.start.cmp(&b.start).then(a.time.cmp(&b.time)));

        let mut removal: Option<(String, usize)> = None;
        'scan: for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                let (a, b) = (&entries[i], &entries[j]);
                if b.start >= a.start + a.duration {
                    break; // sorted by start; nothing later can reach back
                }
                if !overlaps(a.start, a.duration, b.start, b.duration) {
                    continue;
                }
                if a.fixed && b.fixed {
                    continue; // configured overlap between fixed slots; leave both
                }
                let loser = if a.fixed {
                    b
                } else if b.fixed {
                    a
                } else if a.score >= b.score {
                    b
                } else {
                    a
                };
                debug!(
                    "conflict sweep: dropping room {} assignment at {} {}",
                    room, day, loser.time
                );
                removal = Some((loser.time.clone(), loser.index));
                break 'scan;
            }
        }

        match removal {
            Some((time, index)) => {
                if let Some(list) = document.assignments_mut(day, &time) {
                    list.remove(index);
                }
            }
            None => break,
        }
    }
}

fn restore_fixed_slots(document: &mut ScheduleDocument, config: &ScheduleConfig) -> bool {
    // The passes' ledgers are gone by now; rebuild one from the swept
    // document so the room choice sees cross-block occupancy too.
    let mut tracker = ConstraintTracker::rebuild(document, config);
    let mut restored = false;
    for teacher in &config.teachers {
        let Some(class) = teacher.classes.first() else {
            continue;
        };
        for fixed in &teacher.fixed_slots {
            let present = document
                .assignments(&fixed.day, &fixed.time)
                .iter()
                .any(|a| a.class == class.name && a.teacher == teacher.name);
            if present {
                continue;
            }
            let Some(start) = block_start_minutes(&fixed.time) else {
                continue;
            };
            let room = (1..=config.rooms)
                .find(|r| {
                    tracker.is_room_free(&fixed.day, start, class.duration_minutes, *r)
                })
                .unwrap_or(1);
            debug!(
                "conflict sweep: restoring fixed slot {} at {} {}",
                class.name, fixed.day, fixed.time
            );
            tracker.allocate(&fixed.day, start, class.duration_minutes, &teacher.name, room);
            document.push(
                &fixed.day,
                &fixed.time,
                ClassAssignment {
                    class: class.name.clone(),
                    room,
                    teacher: teacher.name.clone(),
                    score: FIXED_SLOT_SCORE,
                },
            );
            restored = true;
        }
    }
    restored
}

impl<'a> Allocator<'a> {
    /// Places every teacher's fixed slots before any heuristic logic
    /// touches the document. Idempotent: an already-present fixed
    /// assignment is left alone.
    fn fixed_allocation(&mut self) {
        for teacher in self.config.teachers.clone() {
            let Some(class) = teacher.classes.first() else {
                continue;
            };
            for fixed in &teacher.fixed_slots {
                let already_placed = self
                    .document
                    .assignments(&fixed.day, &fixed.time)
                    .iter()
                    .any(|a| a.class == class.name && a.teacher == teacher.name);
                if already_placed {
                    continue;
                }
                let Some(start) = block_start_minutes(&fixed.time) else {
                    continue;
                };
                let duration = class.duration_minutes;
                let room = (1..=self.config.rooms)
                    .find(|r| self.tracker.is_room_free(&fixed.day, start, duration, *r))
                    .unwrap_or(1);
                info!(
                    "fixed allocation: {} ({}) at {} {}, room {}",
                    class.name, teacher.name, fixed.day, fixed.time, room
                );
                self.commit(
                    &fixed.day,
                    &fixed.time,
                    start,
                    room,
                    Candidate {
                        class: class.name.clone(),
                        teacher: teacher.name.clone(),
                        duration,
                        score: FIXED_SLOT_SCORE,
                    },
                );
            }
        }
    }

    /// For each free (day, time, room) in popularity order, allocates
    /// the best-scoring candidate class above the acceptance threshold.
    fn primary_pass(&mut self) {
        info!(
            "primary pass over {} records, threshold {}",
            self.records.len(),
            self.options.acceptance_threshold
        );
        let days = self.ordered_days();
        let times = self.ordered_times();

        for day in &days {
            for time in &times {
                let Some(start) = block_start_minutes(time) else {
                    continue;
                };
                for room in 1..=self.config.rooms {
                    if self.document.room_taken(day, time, room) {
                        continue;
                    }
                    match self.best_candidate(day, time, start, room) {
                        Some(candidate)
                            if candidate.score > self.options.acceptance_threshold =>
                        {
                            self.commit(day, time, start, room, candidate);
                        }
                        Some(candidate) => {
                            debug!(
                                "coverage gap: best candidate {} at {} {} room {} scored {:.2}, below threshold",
                                candidate.class, day, time, room, candidate.score
                            );
                        }
                        None => {
                            debug!("coverage gap: no viable class at {} {} room {}", day, time, room);
                        }
                    }
                }
            }
        }
    }

    /// Relaxed second pass: fills still-empty rooms with the
    /// least-utilized free teacher's least-allocated class, accepting
    /// scores the primary pass would refuse. Only adds assignments.
    fn fill_pass(&mut self) {
        info!("fill pass over remaining empty slots");
        let days = self.config.days.clone();
        let times = self.config.time_blocks.clone();

        for day in &days {
            for time in &times {
                let Some(start) = block_start_minutes(time) else {
                    continue;
                };
                for room in 1..=self.config.rooms {
                    if self.document.room_taken(day, time, room) {
                        continue;
                    }
                    if let Some(candidate) = self.fill_candidate(day, time, start, room) {
                        self.commit(day, time, start, room, candidate);
                    }
                }
            }
        }
    }

    /// Days in descending preferred-day popularity, catalog order on
    /// ties, or plain catalog order when popularity ordering is off.
    fn ordered_days(&self) -> Vec<String> {
        let mut days = self.config.days.clone();
        if self.options.order_by_popularity {
            let popularity = |day: &str| {
                self.summary.day_popularity.get(day).copied().unwrap_or(0)
            };
            days.sort_by_key(|day| std::cmp::Reverse(popularity(day)));
        }
        days
    }

    fn ordered_times(&self) -> Vec<String> {
        let mut times = self.config.time_blocks.clone();
        if self.options.order_by_popularity {
            let popularity = |time: &str| {
                self.summary.time_popularity.get(time).copied().unwrap_or(0)
            };
            times.sort_by_key(|time| std::cmp::Reverse(popularity(time)));
        }
        times
    }

    /// Evaluates every class not yet at its weekly cap whose teacher
    /// and room are free for its registered duration, and returns the
    /// best composite score. Ties go to the lexicographically smaller
    /// class name so reruns pick the same candidate.
    fn best_candidate(&self, day: &str, time: &str, start: u32, room: u8) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for teacher in &self.config.teachers {
            for class in &teacher.classes {
                if self.global_count(&class.name) >= self.options.occurrence_cap {
                    continue;
                }
                if !self
                    .tracker
                    .is_teacher_free(day, start, class.duration_minutes, &teacher.name)
                {
                    continue;
                }
                if !self
                    .tracker
                    .is_room_free(day, start, class.duration_minutes, room)
                {
                    continue;
                }

                let score = self.composite_score(&class.name, day, time);
                let better = match &best {
                    None => true,
                    Some(current) => {
                        score > current.score
                            || (score == current.score && class.name < current.class)
                    }
                };
                if better {
                    best = Some(Candidate {
                        class: class.name.clone(),
                        teacher: teacher.name.clone(),
                        duration: class.duration_minutes,
                        score,
                    });
                }
            }
        }

        best
    }

    /// Fill-pass selection: teachers by ascending weekly utilization
    /// (roster order on ties), then that teacher's least-allocated
    /// class that still fits the slot and the cap.
    fn fill_candidate(&self, day: &str, time: &str, start: u32, room: u8) -> Option<Candidate> {
        let mut teacher_order: Vec<usize> = (0..self.config.teachers.len()).collect();
        teacher_order.sort_by_key(|&i| {
            self.teacher_counts
                .get(&self.config.teachers[i].name)
                .copied()
                .unwrap_or(0)
        });

        for teacher_idx in teacher_order {
            let teacher = &self.config.teachers[teacher_idx];
            let mut classes: Vec<_> = teacher
                .classes
                .iter()
                .filter(|c| self.global_count(&c.name) < self.options.occurrence_cap)
                .collect();
            classes.sort_by_key(|c| self.global_count(&c.name));

            for class in classes {
                if !self
                    .tracker
                    .is_teacher_free(day, start, class.duration_minutes, &teacher.name)
                {
                    continue;
                }
                if !self
                    .tracker
                    .is_room_free(day, start, class.duration_minutes, room)
                {
                    continue;
                }
                return Some(Candidate {
                    class: class.name.clone(),
                    teacher: teacher.name.clone(),
                    duration: class.duration_minutes,
                    score: self.composite_score(&class.name, day, time),
                });
            }
        }

        None
    }

    fn composite_score(&self, class_name: &str, day: &str, time: &str) -> f64 {
        let mut score = slot_score(class_name, day, time, self.records);
        if self.options.use_distribution_penalty {
            let on_day = self
                .day_counts
                .get(&(day.to_string(), class_name.to_string()))
                .copied()
                .unwrap_or(0);
            score += distribution_penalty(on_day);
        }
        score -= frequency_penalty(
            self.global_count(class_name),
            self.options.frequency_penalty_weight,
        );
        score
    }

    fn global_count(&self, class_name: &str) -> u32 {
        self.global_counts.get(class_name).copied().unwrap_or(0)
    }

    fn commit(&mut self, day: &str, time: &str, start: u32, room: u8, candidate: Candidate) {
        self.tracker
            .allocate(day, start, candidate.duration, &candidate.teacher, room);
        *self
            .day_counts
            .entry((day.to_string(), candidate.class.clone()))
            .or_insert(0) += 1;
        *self.global_counts.entry(candidate.class.clone()).or_insert(0) += 1;
        *self
            .teacher_counts
            .entry(candidate.teacher.clone())
            .or_insert(0) += 1;
        self.document.push(
            day,
            time,
            ClassAssignment {
                class: candidate.class,
                room,
                teacher: candidate.teacher,
                score: candidate.score,
            },
        );
    }

    /// Recounts from the surviving document (the sweep may have dropped
    /// entries) and packages the outcome.
    fn finish(self) -> ScheduleOutcome {
        let mut class_counts: HashMap<String, u32> = HashMap::new();
        for blocks in self.document.days.values() {
            for assignments in blocks.values() {
                for assignment in assignments {
                    *class_counts.entry(assignment.class.clone()).or_insert(0) += 1;
                }
            }
        }
        let coverage =
            self.document.total_assignments() as f64 / self.config.total_slots() as f64;
        info!(
            "generation done: {} assignments, coverage {:.0}%",
            self.document.total_assignments(),
            coverage * 100.0
        );
        ScheduleOutcome {
            schedule: self.document,
            class_counts,
            coverage,
        }
    }
}
