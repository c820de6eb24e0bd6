use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while populating or resolving a calendar.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalendarError {
    /// A record slot outside the format's limits was requested.
    #[error("maximum number of {record} records exceeded (limit {limit})")]
    MaximumRecordsExceeded { record: &'static str, limit: usize },

    /// A time literal could not be parsed.
    #[error("invalid time '{value}': {reason}")]
    InvalidTimeFormat { value: String, reason: String },

    /// A derived calendar references a base calendar that is not registered.
    #[error("base calendar '{0}' not found")]
    BaseCalendarNotFound(String),

    /// The chain of base-calendar references loops back on itself.
    #[error("base calendar cycle: {}", .chain.join(" -> "))]
    CalendarCycle { chain: Vec<String> },

    /// A record line could not be interpreted.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// No date in the stepping direction can ever be a working date.
    #[error("calendar has no working days after {0}")]
    NoWorkingDays(NaiveDate),

    /// Day stepping left the representable date range.
    #[error("date out of range stepping from {0}")]
    DateOutOfRange(NaiveDate),
}

pub type CalendarResult<T> = Result<T, CalendarError>;
