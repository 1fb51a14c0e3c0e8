use std::result::Result as StdResult;

use thiserror::Error;

/// Rejections raised by cost derivations and ledger mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Duplicate name: {0}")]
    DuplicateName(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type LedgerResult<T> = StdResult<T, LedgerError>;

/// Unified error type for the ledger, storage, and configuration layers.
#[derive(Debug, Error)]
pub enum CostingError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, CostingError>;

impl From<std::io::Error> for CostingError {
    fn from(err: std::io::Error) -> Self {
        CostingError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CostingError {
    fn from(err: serde_json::Error) -> Self {
        CostingError::Storage(err.to_string())
    }
}
