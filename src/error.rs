//! Error types for attendance operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("Title must not be empty")]
    EmptyTitle,

    #[error("Invalid time '{0}', expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    #[error("Invalid date '{0}', expected YYYY/MM/DD")]
    InvalidDate(String),

    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Already clocked in on {date} (record {id})")]
    AlreadyClockedIn { id: String, date: String },

    #[error("No open record to clock out of")]
    NoOpenRecord,

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Record {0} is closed and cannot be reopened")]
    CannotReopen(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Remote API error: {0}")]
    Remote(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Calendar API error: {0}")]
    Calendar(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AttendanceResult<T> = Result<T, AttendanceError>;
