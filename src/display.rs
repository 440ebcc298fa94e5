use std::fs::File;
use std::io::Write;

use crate::config::ScheduleConfig;
use crate::schedule::ScheduleOutcome;

/// Prints the generated week to the terminal, one day per section,
/// every catalog block listed. Scores are formatted here and nowhere
/// else.
pub fn print_schedule(outcome: &ScheduleOutcome, config: &ScheduleConfig) {
    println!("\n=== Weekly Class Schedule ===");
    println!(
        "Assignments: {}  Coverage: {:.0}%",
        outcome.schedule.total_assignments(),
        outcome.coverage * 100.0
    );

    for day in &config.days {
        println!("\n--- {} ---", day);
        for time in &config.time_blocks {
            let assignments = outcome.schedule.assignments(day, time);
            if assignments.is_empty() {
                println!("  {} [EMPTY]", time);
            } else {
                for a in assignments {
                    println!(
                        "  {} room {} -> {} ({}, score {:.2})",
                        time, a.room, a.class, a.teacher, a.score
                    );
                }
            }
        }
    }

    println!("\nAllocations per class:");
    let mut counts: Vec<(&String, &u32)> = outcome.class_counts.iter().collect();
    counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    for (class, count) in counts {
        println!("  {} x{}", class, count);
    }
}

/// Writes the schedule to a file in the format: DAY HH:MM - HH:MM room N class
pub fn write_schedule_to_file(
    outcome: &ScheduleOutcome,
    config: &ScheduleConfig,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;

    writeln!(file, "** Weekly Class Schedule **")?;
    for day in &config.days {
        writeln!(file, "\n{}", day)?;
        for time in &config.time_blocks {
            let assignments = outcome.schedule.assignments(day, time);
            if assignments.is_empty() {
                writeln!(file, "{} [EMPTY]", time)?;
            } else {
                for a in assignments {
                    writeln!(file, "{} room {} {} ({})", time, a.room, a.class, a.teacher)?;
                }
            }
        }
    }

    Ok(())
}
