use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

use crate::state::UpkeepDiagnostic;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("insufficient entrance fee: sent {sent}, required {required}")]
    InsufficientFee { sent: Uint128, required: Uint128 },

    #[error("must send the lottery denom, got {denom}")]
    WrongDenom { denom: String },

    #[error("lottery is not open")]
    NotOpen,

    #[error("upkeep not needed: {diagnostic}")]
    UpkeepNotNeeded { diagnostic: UpkeepDiagnostic },

    #[error("unrecognized randomness request {request_id}")]
    UnrecognizedRequest { request_id: u64 },

    #[error("expected {expected} random words, got {got}")]
    InvalidRandomWords { expected: u32, got: usize },

    #[error("payout of {needed} could not be delivered: contract holds {available}")]
    TransferFailed { needed: Uint128, available: Uint128 },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid hex: {field}")]
    InvalidHex { field: String },
}
