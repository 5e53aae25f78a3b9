use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint256};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<CoordinatorConfig> = Item::new("config");
pub const NEXT_REQUEST_ID: Item<u64> = Item::new("next_request_id");
pub const REQUESTS: Map<u64, RandomnessRequest> = Map::new("requests");
pub const BEACONS: Map<u64, StoredBeacon> = Map::new("beacons");
pub const LATEST_ROUND: Item<u64> = Item::new("latest_round");

#[cw_serde]
pub struct CoordinatorConfig {
    pub admin: Addr,
    /// Addresses allowed to deliver beacons for pending requests
    pub operators: Vec<Addr>,
    /// Contracts allowed to request randomness
    pub consumers: Vec<Addr>,
    /// Quicknet public key, 96 bytes (G2 point)
    pub quicknet_pubkey: Vec<u8>,
    /// Chain hash identifying the drand network
    pub chain_hash: String,
    /// Genesis time of the drand network (unix seconds)
    pub genesis_time: u64,
    /// Period between rounds in seconds (3 for quicknet)
    pub period_seconds: u64,
    pub max_num_words: u32,
}

impl CoordinatorConfig {
    /// Latest drand round published at `time`. Round 1 is published at genesis.
    pub fn round_at(&self, time: Timestamp) -> u64 {
        let now = time.seconds();
        if now < self.genesis_time {
            return 0;
        }
        (now - self.genesis_time) / self.period_seconds + 1
    }

    /// First round published strictly after `time`. Its signature cannot be
    /// known to anyone when a request is made at `time`.
    pub fn target_round(&self, time: Timestamp) -> u64 {
        self.round_at(time) + 1
    }
}

#[cw_serde]
#[derive(Copy)]
pub enum RequestStatus {
    Pending,
    Fulfilled,
}

#[cw_serde]
pub struct RandomnessRequest {
    pub id: u64,
    pub consumer: Addr,
    pub key_hash: String,
    pub request_confirmations: u64,
    pub callback_gas_limit: u64,
    pub num_words: u32,
    pub requested_at: Timestamp,
    pub requested_at_height: u64,
    pub target_round: u64,
    pub status: RequestStatus,
    pub fulfilled_at: Option<Timestamp>,
    pub random_words: Option<Vec<Uint256>>,
}

#[cw_serde]
pub struct StoredBeacon {
    pub round: u64,
    /// sha256(signature), 32 bytes
    pub randomness: Vec<u8>,
    /// BLS signature on G1, 48 bytes
    pub signature: Vec<u8>,
    pub verified: bool,
    pub submitted_at: Timestamp,
    pub submitted_by: Addr,
}
