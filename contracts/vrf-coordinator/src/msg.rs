use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::state::{CoordinatorConfig, RandomnessRequest, StoredBeacon};

#[cw_serde]
pub struct InstantiateMsg {
    pub operators: Vec<String>,
    /// Contracts allowed to request randomness
    pub consumers: Vec<String>,
    /// Hex-encoded quicknet public key (96 bytes = 192 hex chars)
    pub quicknet_pubkey_hex: String,
    pub chain_hash: String,
    pub genesis_time: u64,
    pub period_seconds: u64,
    /// Upper bound on words per request
    pub max_num_words: u32,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Request random words. Registered consumers only.
    /// The assigned request id is returned as response data.
    RequestRandomWords {
        key_hash: String,
        request_confirmations: u64,
        callback_gas_limit: u64,
        num_words: u32,
    },
    /// Fulfil a pending request with the drand beacon for its target round.
    /// Operators only.
    FulfillRandomWords {
        request_id: u64,
        round: u64,
        /// Hex-encoded BLS signature (48 bytes = 96 hex chars)
        signature_hex: String,
    },
    /// Update operator list (admin only).
    UpdateOperators {
        add: Vec<String>,
        remove: Vec<String>,
    },
    /// Update consumer list (admin only).
    UpdateConsumers {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(CoordinatorConfig)]
    Config {},

    #[returns(Option<RandomnessRequest>)]
    Request { request_id: u64 },

    #[returns(u64)]
    NextRequestId {},

    #[returns(Option<StoredBeacon>)]
    Beacon { round: u64 },

    #[returns(u64)]
    LatestRound {},
}

/// Grouped parameters for a randomness request.
pub struct RequestParams {
    pub key_hash: String,
    pub request_confirmations: u64,
    pub callback_gas_limit: u64,
    pub num_words: u32,
}
