use cosmwasm_std::{OverflowError, StdError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("{address} is not a registered consumer")]
    UnknownConsumer { address: String },

    #[error("randomness request {request_id} not found")]
    RequestNotFound { request_id: u64 },

    #[error("randomness request {request_id} already fulfilled")]
    RequestAlreadyFulfilled { request_id: u64 },

    #[error("request {request_id} must be fulfilled with drand round {expected}, got {got}")]
    WrongRound {
        request_id: u64,
        expected: u64,
        got: u64,
    },

    #[error("request {request_id} needs confirmations until height {ready_height} (current {height})")]
    ConfirmationsPending {
        request_id: u64,
        ready_height: u64,
        height: u64,
    },

    #[error("invalid num_words {got}: must be between 1 and {max}")]
    InvalidNumWords { got: u32, max: u32 },

    #[error("invalid request_confirmations {got}: must be at most {max}")]
    InvalidRequestConfirmations { got: u64, max: u64 },

    #[error("BLS verification failed: {reason}")]
    VerificationFailed { reason: String },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("invalid pubkey length: expected 96 bytes, got {got}")]
    InvalidPubkeyLength { got: usize },

    #[error("invalid period: period_seconds must be greater than zero")]
    InvalidPeriod,
}
