pub mod allocator;
pub mod preferences;
pub mod scorer;
pub mod slot_utils;
pub mod tracker;
pub mod types;

pub use allocator::{generate_schedule, AllocatorOptions};
pub use preferences::aggregate;
pub use types::ScheduleOutcome;
