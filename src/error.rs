//! Error types for the plants tracker.
//!
//! Every fallible operation in the crate returns [`Result`]. Statistics are
//! pure computations, so the only errors they raise are about their input
//! (a malformed date or too few gaps); everything else comes from storage
//! or configuration.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for plants operations.
#[derive(Error, Debug)]
pub enum PlantsError {
    /// I/O errors from the garden document or config files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// A date that is not a calendar date in `YYYY-MM-DD` form.
    #[error("malformed date: {value:?} (expected YYYY-MM-DD)")]
    MalformedDate { value: String },

    /// A statistic that needs at least one gap was asked of an empty history.
    #[error("not enough watering history to compute {statistic}")]
    InsufficientData { statistic: String },

    /// No place with this id.
    #[error("place not found: {id}")]
    PlaceNotFound { id: u64 },

    /// No plant with this id.
    #[error("plant not found: {id}")]
    PlantNotFound { id: u64 },

    /// Rejected user input (empty names and the like).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

/// A specialized Result type for plants operations.
pub type Result<T> = std::result::Result<T, PlantsError>;

impl PlantsError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a malformed date error.
    pub fn malformed_date(value: impl Into<String>) -> Self {
        Self::MalformedDate {
            value: value.into(),
        }
    }

    /// Create an insufficient data error for the named statistic.
    pub fn insufficient_data(statistic: impl Into<String>) -> Self {
        Self::InsufficientData {
            statistic: statistic.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether the error is caused by what the user typed rather than by the
    /// environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedDate { .. }
                | Self::InsufficientData { .. }
                | Self::PlaceNotFound { .. }
                | Self::PlantNotFound { .. }
                | Self::InvalidInput { .. }
        )
    }
}

impl From<io::Error> for PlantsError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for PlantsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Exit codes for the plants CLI.
pub mod exit_codes {
    /// The command completed.
    pub const SUCCESS: i32 = 0;

    /// The command ran but failed (unknown plant, bad date, I/O error).
    pub const ERROR: i32 = 1;

    /// The process panicked.
    pub const CRASH: i32 = 3;
}
