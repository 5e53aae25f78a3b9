use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Timestamp, Uint128, Uint256, Uint64};
use cw_storage_plus::{Item, Map};
use vrf_lottery_common::types::LotteryState;

/// Words requested per draw. Only the first word picks the winner.
pub const NUM_WORDS: u32 = 1;

pub const CONFIG: Item<LotteryConfig> = Item::new("config");
pub const ROUND_STATE: Item<RoundState> = Item::new("round_state");
/// (round, slot) -> entrant. Only slots `0..entrant_count` of the current
/// round are live; moving to the next round clears the list without
/// touching old keys.
pub const ENTRANTS: Map<(u64, u64), Addr> = Map::new("entrants");
pub const RECENT_WINNER: Item<Addr> = Item::new("recent_winner");

#[cw_serde]
pub struct LotteryConfig {
    pub vrf_coordinator: Addr,
    pub entrance_fee: Uint128,
    pub denom: String,
    /// Minimum seconds between draws
    pub interval_seconds: u64,
    /// Coordinator gas lane, hex-encoded 32 bytes
    pub key_hash: String,
    pub callback_gas_limit: u64,
    pub request_confirmations: u64,
    pub num_words: u32,
}

#[cw_serde]
pub struct RoundState {
    /// Number of settled rounds; also keys the current entrant list
    pub round: u64,
    pub state: LotteryState,
    pub entrant_count: u64,
    pub pool_balance: Uint128,
    pub last_draw_timestamp: Timestamp,
    pub pending_request_id: Option<u64>,
}

/// Which upkeep sub-conditions currently hold.
#[cw_serde]
#[derive(Copy)]
pub struct UpkeepDiagnostic {
    pub is_open: bool,
    pub time_passed: bool,
    pub has_balance: bool,
    pub has_players: bool,
}

impl UpkeepDiagnostic {
    pub fn upkeep_needed(&self) -> bool {
        self.is_open && self.time_passed && self.has_balance && self.has_players
    }
}

impl std::fmt::Display for UpkeepDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "is_open={} time_passed={} has_balance={} has_players={}",
            self.is_open, self.time_passed, self.has_balance, self.has_players
        )
    }
}

impl RoundState {
    pub fn new(now: Timestamp) -> Self {
        RoundState {
            round: 0,
            state: LotteryState::Open,
            entrant_count: 0,
            pool_balance: Uint128::zero(),
            last_draw_timestamp: now,
            pending_request_id: None,
        }
    }

    pub fn diagnose(&self, interval_seconds: u64, now: Timestamp) -> UpkeepDiagnostic {
        let elapsed = now
            .seconds()
            .saturating_sub(self.last_draw_timestamp.seconds());
        UpkeepDiagnostic {
            is_open: self.state == LotteryState::Open,
            time_passed: elapsed >= interval_seconds,
            has_balance: !self.pool_balance.is_zero(),
            has_players: self.entrant_count > 0,
        }
    }

    /// Take one slot for `amount`. Returns the slot index to store the entrant under.
    pub fn record_entry(&mut self, amount: Uint128) -> StdResult<u64> {
        let slot = self.entrant_count;
        self.pool_balance = self.pool_balance.checked_add(amount)?;
        self.entrant_count += 1;
        Ok(slot)
    }

    pub fn begin_drawing(&mut self, request_id: u64) {
        self.state = LotteryState::Drawing;
        self.pending_request_id = Some(request_id);
    }

    pub fn is_pending(&self, request_id: u64) -> bool {
        self.state == LotteryState::Drawing && self.pending_request_id == Some(request_id)
    }

    /// `word mod entrant_count`.
    pub fn winner_slot(&self, word: Uint256) -> StdResult<u64> {
        let slot = word.checked_rem(Uint256::from(self.entrant_count))?;
        Ok(Uint64::try_from(slot)?.u64())
    }

    /// Reset for the next round and return the prize that was in the pool.
    pub fn settle(&mut self, now: Timestamp) -> Uint128 {
        let prize = self.pool_balance;
        self.round += 1;
        self.state = LotteryState::Open;
        self.entrant_count = 0;
        self.pool_balance = Uint128::zero();
        self.last_draw_timestamp = now;
        self.pending_request_id = None;
        prize
    }
}
