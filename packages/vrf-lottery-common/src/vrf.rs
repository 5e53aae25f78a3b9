use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint256;
use sha2::{Digest, Sha256};

/// Upper bound on `request_confirmations` for any request.
pub const MAX_REQUEST_CONFIRMATIONS: u64 = 200;

/// Request message a consumer sends to the VRF coordinator.
///
/// Mirrors the `RequestRandomWords` variant of the coordinator's own
/// `ExecuteMsg`, so consumers do not need to depend on the coordinator crate.
#[cw_serde]
pub enum VrfCoordinatorMsg {
    RequestRandomWords {
        /// Gas lane, hex-encoded 32 bytes. Opaque to the consumer.
        key_hash: String,
        /// Blocks the coordinator must wait before it may fulfil.
        request_confirmations: u64,
        /// Gas limit applied to the consumer callback.
        callback_gas_limit: u64,
        num_words: u32,
    },
}

/// Queries a consumer may send to the VRF coordinator.
#[cw_serde]
pub enum VrfCoordinatorQueryMsg {
    /// Id the coordinator will assign to the next request.
    NextRequestId {},
}

/// Callback the coordinator delivers to the requesting consumer.
#[cw_serde]
pub enum VrfConsumerMsg {
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
}

/// Expand a 32-byte beacon output into `num_words` independent words.
///
/// `word_i = sha256( 0x02 || randomness || i_u32_be )`, read as a
/// big-endian 256-bit integer.
pub fn expand_random_words(randomness: &[u8; 32], num_words: u32) -> Vec<Uint256> {
    (0..num_words)
        .map(|i| {
            let mut hasher = Sha256::new();
            hasher.update([0x02]);
            hasher.update(randomness);
            hasher.update(i.to_be_bytes());
            let digest: [u8; 32] = hasher.finalize().into();
            Uint256::from_be_bytes(digest)
        })
        .collect()
}
