//! Error types
//!
//! Configuration integrity and re-entrancy errors surface to callers; storage
//! errors are caught by the persistence layer and only ever logged.

use thiserror::Error;

/// Errors raised by the wheel (catalog integrity and spin sequencing)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WheelError {
    #[error("prize catalog is empty")]
    EmptyCatalog,
    #[error("prize catalog has no losing entry for the first spin")]
    NoLosingPrize,
    #[error("prize catalog has no winning entry for the second spin")]
    NoWinningPrize,
    #[error("prize `{id}` has no segment on the wheel")]
    UnknownPrize { id: String },
    #[error("prize id `{id}` appears more than once")]
    DuplicatePrize { id: String },
    #[error("a spin is already in progress")]
    SpinInProgress,
    #[error("no spins left (spin {attempted} requested)")]
    SpinsExhausted { attempted: u8 },
    #[error("no spin is in progress")]
    NotSpinning,
    #[error("promotion is disabled")]
    Disabled,
}

impl WheelError {
    /// Configuration integrity errors disable the promotion for this instance
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            WheelError::EmptyCatalog
                | WheelError::NoLosingPrize
                | WheelError::NoWinningPrize
                | WheelError::UnknownPrize { .. }
                | WheelError::DuplicatePrize { .. }
        )
    }
}

/// Errors from a single persistence backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend `{0}` is unavailable")]
    Unavailable(&'static str),
    #[error("storage backend `{backend}` failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
    #[error("malformed cookie: {0}")]
    Cookie(#[from] cookie::ParseError),
    #[error("malformed stored value: {0}")]
    Value(#[from] serde_json::Error),
}

/// Errors loading a promotion configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid prize catalog: {0}")]
    Catalog(#[from] WheelError),
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
