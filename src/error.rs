//! Error types for the ponto engine.
//!
//! The day-summary core never fails; these errors exist at its boundaries:
//! configuration loading, schedule lookup, time parsing, and request
//! validation.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the ponto engine.
///
/// # Example
///
/// ```
/// use ponto_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No schedule is configured for the employee.
    #[error("Schedule not found for employee '{employee_id}' on date {date}")]
    ScheduleNotFound {
        /// The employee that was looked up.
        employee_id: String,
        /// The date that was requested.
        date: NaiveDate,
    },

    /// A punch or schedule value could not be read as a time.
    #[error("Invalid time value: '{value}'")]
    InvalidTimeValue {
        /// The rejected input.
        value: String,
    },

    /// A request was structurally valid JSON but semantically incomplete.
    #[error("Invalid request field '{field}': {message}")]
    InvalidRequest {
        /// The offending field.
        field: String,
        /// A description of the problem.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
