// File: ./src/error.rs
//! Error taxonomy shared by every command.
//!
//! Nothing in the library terminates the process. Errors travel up to the binary
//! entry point, which prints them and exits with [`AlmanacError::exit_code`].
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlmanacError {
    /// A user supplied date that matches neither the short nor the long date format.
    #[error("Invalid date: '{0}'")]
    InvalidDate(String),

    #[error("Cannot parse event: {0}")]
    EventParse(String),

    #[error("Unknown calendar {0}")]
    UnknownCalendar(String),

    #[error("Cannot modify calendar \"{0}\" as it is read-only")]
    ReadOnlyCalendar(String),

    /// Two mutually exclusive arguments were supplied by internal callers.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No command given and no default command configured. Holds the usage line.
    #[error("{0}")]
    Usage(String),

    #[error("No calendars configured")]
    NoCalendars,

    #[error("Configuration error: {0:#}")]
    Config(anyhow::Error),

    #[error("Storage error: {0:#}")]
    Storage(anyhow::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AlmanacError {
    /// Process exit status for this error. Unknown calendars are argument
    /// validation failures and share the usage-error status.
    pub fn exit_code(&self) -> i32 {
        match self {
            AlmanacError::UnknownCalendar(_) => 2,
            _ => 1,
        }
    }
}

pub type Result<T, E = AlmanacError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_calendar_is_a_usage_error() {
        let err = AlmanacError::UnknownCalendar("two".to_string());
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Unknown calendar two");
    }

    #[test]
    fn read_only_names_the_calendar() {
        let err = AlmanacError::ReadOnlyCalendar("work".to_string());
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "Cannot modify calendar \"work\" as it is read-only"
        );
    }
}
