use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Coin, Timestamp, Uint128, Uint256};
use vrf_lottery_common::types::LotteryState;

use crate::state::{LotteryConfig, RoundState, UpkeepDiagnostic};

#[cw_serde]
pub struct InstantiateMsg {
    pub vrf_coordinator: String,
    pub entrance_fee: Uint128,
    pub denom: String,
    pub interval_seconds: u64,
    /// Coordinator gas lane, hex-encoded 32 bytes
    pub key_hash: String,
    pub callback_gas_limit: u64,
    pub request_confirmations: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Buy one slot in the current round. Send at least the entrance fee
    /// in the lottery denom; any excess stays in the pool.
    EnterLottery {},
    /// Close the round and request randomness. Anyone can call; the upkeep
    /// conditions are re-checked on chain.
    PerformUpkeep { perform_data: Binary },
    /// Randomness callback. VRF coordinator only.
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(LotteryConfig)]
    Config {},
    #[returns(CheckUpkeepResponse)]
    CheckUpkeep { check_data: Binary },
    #[returns(Coin)]
    EntranceFee {},
    #[returns(u64)]
    NumberOfPlayers {},
    #[returns(Addr)]
    Player { index: u64 },
    #[returns(Option<Addr>)]
    RecentWinner {},
    #[returns(LotteryState)]
    LotteryState {},
    #[returns(Timestamp)]
    LatestTimestamp {},
    #[returns(u64)]
    Interval {},
    #[returns(RoundState)]
    RoundState {},
}

#[cw_serde]
pub struct CheckUpkeepResponse {
    pub upkeep_needed: bool,
    /// Echo of `check_data`, for the automation layer to pass back
    pub perform_data: Binary,
    pub diagnostic: UpkeepDiagnostic,
}
