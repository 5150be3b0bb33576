//! Error types for dates, periods, calendars and day counts.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The error type for core date and convention operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A period string could not be parsed or a period is unusable.
    #[error("Invalid period '{value}': {reason}")]
    InvalidPeriod {
        /// The offending input.
        value: String,
        /// Reason for invalidity.
        reason: String,
    },

    /// Calendar data could not be loaded or a calendar is unknown.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the failure.
        reason: String,
    },

    /// Unknown convention name (day count, business day convention, frequency).
    #[error("Unknown {kind}: '{value}'")]
    UnknownConvention {
        /// Which kind of convention was being parsed.
        kind: &'static str,
        /// The unrecognized input.
        value: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid period error.
    #[must_use]
    pub fn invalid_period(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPeriod {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates a calendar error.
    #[must_use]
    pub fn calendar(reason: impl Into<String>) -> Self {
        Self::CalendarError {
            reason: reason.into(),
        }
    }

    /// Creates an unknown convention error.
    #[must_use]
    pub fn unknown_convention(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownConvention {
            kind,
            value: value.into(),
        }
    }
}
