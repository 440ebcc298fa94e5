/// Parses a time string (HH:MM) to minutes since midnight
pub fn parse_time_to_minutes(time_str: &str) -> Option<u32> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hours: u32 = parts[0].trim().parse().ok()?;
    let minutes: u32 = parts[1].trim().parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Start of a catalog time block ("18:00 - 19:00") in minutes since
/// midnight.
pub fn block_start_minutes(time_block: &str) -> Option<u32> {
    let start = time_block.split('-').next()?;
    parse_time_to_minutes(start)
}

/// The single authoritative conflict test: two half-open intervals
/// [start, start + duration) sharing a room or teacher overlap iff each
/// one starts before the other ends. Durations are in minutes and must
/// be the classes' registered durations.
pub fn overlaps(start_a: u32, duration_a: u32, start_b: u32, duration_b: u32) -> bool {
    start_a < start_b + duration_b && start_b < start_a + duration_a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_to_minutes() {
        assert_eq!(parse_time_to_minutes("10:00"), Some(600));
        assert_eq!(parse_time_to_minutes("19:30"), Some(1170));
        assert_eq!(parse_time_to_minutes("00:00"), Some(0));
        assert_eq!(parse_time_to_minutes("24:00"), None);
        assert_eq!(parse_time_to_minutes("10:60"), None);
        assert_eq!(parse_time_to_minutes("abc"), None);
    }

    #[test]
    fn test_block_parsing() {
        assert_eq!(block_start_minutes("18:00 - 19:00"), Some(1080));
        assert_eq!(block_start_minutes("10:30 - 11:30"), Some(630));
        assert_eq!(block_start_minutes("nonsense"), None);
    }

    #[test]
    fn test_overlapping_intervals() {
        // 18:00-19:00 against 18:30-19:30
        assert!(overlaps(1080, 60, 1110, 60));
        // Containment
        assert!(overlaps(1080, 120, 1110, 30));
        // Identical
        assert!(overlaps(600, 60, 600, 60));
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        // 18:00-19:00 against 19:00-20:00, half-open
        assert!(!overlaps(1080, 60, 1140, 60));
        assert!(!overlaps(1140, 60, 1080, 60));
    }

    #[test]
    fn test_short_class_clears_a_later_start() {
        // A 30 minute class at 18:00 ends before 18:30 starts.
        assert!(!overlaps(1080, 30, 1110, 60));
        // A 45 minute class at 18:00 does not.
        assert!(overlaps(1080, 45, 1110, 60));
    }
}
