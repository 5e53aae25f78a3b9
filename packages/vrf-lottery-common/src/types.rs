use cosmwasm_schema::cw_serde;

/// Lifecycle of a lottery round.
///
/// `Open` accepts entries. `Drawing` means a randomness request is in
/// flight and the entrant list is frozen until it is fulfilled.
#[cw_serde]
#[derive(Copy)]
pub enum LotteryState {
    Open,
    Drawing,
}

impl LotteryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotteryState::Open => "open",
            LotteryState::Drawing => "drawing",
        }
    }
}

impl std::fmt::Display for LotteryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
