use crate::feasibility::Capacity;
use thiserror::Error;
use voucher_core::{CoreError, StoreError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that abort a generation run.
///
/// Duplicates are not errors: they are counted per round and resampled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(
        "cannot safely generate {quantity} codes: only {capacity} distinct codes of length {size} exist"
    )]
    InfeasibleRequest {
        quantity: u64,
        size: usize,
        capacity: Capacity,
    },
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("secure random source exhausted: {0}")]
    RandomSourceExhausted(String),
    #[error("round {round} accepted no codes while {shortfall} were still needed")]
    NoProgress { round: u32, shortfall: u64 },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("generation worker failed: {0}")]
    WorkerFailed(String),
}

impl From<CoreError> for Error {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidAlphabet(message) => Self::InvalidAlphabet(message),
        }
    }
}
