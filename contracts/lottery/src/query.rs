use cosmwasm_std::{to_json_binary, Binary, Coin, Deps, Env, StdResult};

use crate::msg::CheckUpkeepResponse;
use crate::state::{CONFIG, ENTRANTS, RECENT_WINNER, ROUND_STATE};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_check_upkeep(deps: Deps, env: Env, check_data: Binary) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let state = ROUND_STATE.load(deps.storage)?;
    let diagnostic = state.diagnose(config.interval_seconds, env.block.time);
    to_json_binary(&CheckUpkeepResponse {
        upkeep_needed: diagnostic.upkeep_needed(),
        perform_data: check_data,
        diagnostic,
    })
}

pub fn query_entrance_fee(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&Coin {
        denom: config.denom,
        amount: config.entrance_fee,
    })
}

pub fn query_number_of_players(deps: Deps) -> StdResult<Binary> {
    let state = ROUND_STATE.load(deps.storage)?;
    to_json_binary(&state.entrant_count)
}

/// Entrant in slot `index` of the current round. Errors when out of range.
pub fn query_player(deps: Deps, index: u64) -> StdResult<Binary> {
    let state = ROUND_STATE.load(deps.storage)?;
    let player = ENTRANTS.load(deps.storage, (state.round, index))?;
    to_json_binary(&player)
}

pub fn query_recent_winner(deps: Deps) -> StdResult<Binary> {
    let winner = RECENT_WINNER.may_load(deps.storage)?;
    to_json_binary(&winner)
}

pub fn query_lottery_state(deps: Deps) -> StdResult<Binary> {
    let state = ROUND_STATE.load(deps.storage)?;
    to_json_binary(&state.state)
}

pub fn query_latest_timestamp(deps: Deps) -> StdResult<Binary> {
    let state = ROUND_STATE.load(deps.storage)?;
    to_json_binary(&state.last_draw_timestamp)
}

pub fn query_interval(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.interval_seconds)
}

pub fn query_round_state(deps: Deps) -> StdResult<Binary> {
    let state = ROUND_STATE.load(deps.storage)?;
    to_json_binary(&state)
}
