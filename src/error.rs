use thiserror::Error;

/// Errors that abort a generation run. Coverage gaps and repaired
/// conflicts are not errors and never surface here.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The preference input was missing or not a list of records.
    #[error("invalid preference input: {0}")]
    InvalidInput(String),

    /// The preference source could not be read at all.
    #[error("failed to fetch preference records: {0}")]
    UpstreamFetch(String),
}

impl From<csv::Error> for ScheduleError {
    fn from(err: csv::Error) -> Self {
        ScheduleError::UpstreamFetch(err.to_string())
    }
}

impl From<std::io::Error> for ScheduleError {
    fn from(err: std::io::Error) -> Self {
        ScheduleError::UpstreamFetch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converts_into_boxed_dyn_error() {
        // The binary entry point bubbles these up as Box<dyn Error>.
        let err: Box<dyn std::error::Error> =
            ScheduleError::InvalidInput("empty survey".to_string()).into();
        assert!(err.to_string().contains("invalid preference input"));
    }

    #[test]
    fn test_io_error_maps_to_upstream_fetch() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.csv");
        assert!(matches!(
            ScheduleError::from(io),
            ScheduleError::UpstreamFetch(_)
        ));
    }
}
