//! Unified error type for the crate.
//!
//! Core functions return [`Result`] and propagate database errors unchanged;
//! validation failures get their own variants so callers can map them to
//! user-visible responses.

use thiserror::Error;

/// All errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or validation failed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// Underlying SeaORM/database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (config file access etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No filming session with the given id
    #[error("Forgatas not found: {id}")]
    ForgatasNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// No assignment with the given id
    #[error("Beosztas not found: {id}")]
    BeosztasNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// No role relation with the given id
    #[error("Szerepkor relation not found: {id}")]
    RelacioNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// No absence record with the given id
    #[error("Absence not found: {id}")]
    AbsenceNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// An absence decision would set both excused and unexcused
    #[error("An absence cannot be both excused and unexcused")]
    InvalidDecision,

    /// A session's time range has `time_from` after `time_to`
    #[error("Invalid time range: {time_from} is after {time_to}")]
    InvalidTimeRange {
        /// Start of the rejected range
        time_from: chrono::NaiveTime,
        /// End of the rejected range
        time_to: chrono::NaiveTime,
    },

    /// Unrecognized filming session type string
    #[error("Unknown forgatas type: {value}")]
    UnknownForgatasType {
        /// The rejected type value
        value: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
