use cosmwasm_std::{
    coins, to_json_binary, BankMsg, Binary, Coin, DepsMut, Env, Event, MessageInfo, Response,
    Uint128, Uint256, WasmMsg,
};
use vrf_lottery_common::types::LotteryState;
use vrf_lottery_common::vrf::{VrfCoordinatorMsg, VrfCoordinatorQueryMsg};

use crate::error::ContractError;
use crate::state::{CONFIG, ENTRANTS, RECENT_WINNER, ROUND_STATE};

/// Amount of `denom` attached to the call. Any other denom is rejected so it
/// cannot end up stranded in the contract.
fn attached_amount(funds: &[Coin], denom: &str) -> Result<Uint128, ContractError> {
    if let Some(other) = funds.iter().find(|c| c.denom != denom) {
        return Err(ContractError::WrongDenom {
            denom: other.denom.clone(),
        });
    }
    Ok(funds
        .iter()
        .find(|c| c.denom == denom)
        .map(|c| c.amount)
        .unwrap_or(Uint128::zero()))
}

/// Enter the current round. One call takes one slot, so entering twice
/// doubles the chance to win.
pub fn enter_lottery(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let amount = attached_amount(&info.funds, &config.denom)?;
    if amount < config.entrance_fee {
        return Err(ContractError::InsufficientFee {
            sent: amount,
            required: config.entrance_fee,
        });
    }

    let mut state = ROUND_STATE.load(deps.storage)?;
    if state.state != LotteryState::Open {
        return Err(ContractError::NotOpen);
    }

    let slot = state.record_entry(amount)?;
    ENTRANTS.save(deps.storage, (state.round, slot), &info.sender)?;
    ROUND_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "enter_lottery")
        .add_attribute("player", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("lottery_entered")
                .add_attribute("who", info.sender.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("round", state.round.to_string())
                .add_attribute("slot", slot.to_string())
                .add_attribute("pool_balance", state.pool_balance.to_string()),
        ))
}

/// Close the round and request randomness from the coordinator.
///
/// Upkeep conditions are evaluated again here; `perform_data` is opaque and
/// never treated as proof that the round is ready.
pub fn perform_upkeep(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    _perform_data: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut state = ROUND_STATE.load(deps.storage)?;

    if state.state != LotteryState::Open {
        return Err(ContractError::NotOpen);
    }

    let diagnostic = state.diagnose(config.interval_seconds, env.block.time);
    if !diagnostic.upkeep_needed() {
        return Err(ContractError::UpkeepNotNeeded { diagnostic });
    }

    // The coordinator hands out ids sequentially and the request below runs
    // right after this call, so the next id is the one it will assign.
    let request_id: u64 = deps.querier.query_wasm_smart(
        config.vrf_coordinator.to_string(),
        &VrfCoordinatorQueryMsg::NextRequestId {},
    )?;

    state.begin_drawing(request_id);
    ROUND_STATE.save(deps.storage, &state)?;

    let request_msg = WasmMsg::Execute {
        contract_addr: config.vrf_coordinator.to_string(),
        msg: to_json_binary(&VrfCoordinatorMsg::RequestRandomWords {
            key_hash: config.key_hash.clone(),
            request_confirmations: config.request_confirmations,
            callback_gas_limit: config.callback_gas_limit,
            num_words: config.num_words,
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_message(request_msg)
        .add_attribute("action", "perform_upkeep")
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("lottery_round_advancing")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("round", state.round.to_string())
                .add_attribute("players", state.entrant_count.to_string())
                .add_attribute("pool_balance", state.pool_balance.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Randomness callback. VRF coordinator only.
///
/// Picks `entrants[random_words[0] mod N]`, pays out the whole pool and opens
/// the next round. Every check runs before the first write, and the payout
/// is only sent if the contract can cover it; a failed bank send aborts the
/// transaction, so the round stays in Drawing and the same request can be
/// fulfilled again.
pub fn fulfill_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    random_words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.vrf_coordinator {
        return Err(ContractError::Unauthorized {
            reason: "only the vrf coordinator can fulfill randomness".to_string(),
        });
    }

    let mut state = ROUND_STATE.load(deps.storage)?;
    if !state.is_pending(request_id) {
        return Err(ContractError::UnrecognizedRequest { request_id });
    }

    if random_words.len() != config.num_words as usize {
        return Err(ContractError::InvalidRandomWords {
            expected: config.num_words,
            got: random_words.len(),
        });
    }

    let slot = state.winner_slot(random_words[0])?;
    let winner = ENTRANTS.load(deps.storage, (state.round, slot))?;

    let available = deps
        .querier
        .query_balance(&env.contract.address, &config.denom)?
        .amount;
    if available < state.pool_balance {
        return Err(ContractError::TransferFailed {
            needed: state.pool_balance,
            available,
        });
    }

    let settled_round = state.round;
    let prize = state.settle(env.block.time);
    ROUND_STATE.save(deps.storage, &state)?;
    RECENT_WINNER.save(deps.storage, &winner)?;

    let payout = BankMsg::Send {
        to_address: winner.to_string(),
        amount: coins(prize.u128(), &config.denom),
    };

    Ok(Response::new()
        .add_message(payout)
        .add_attribute("action", "fulfill_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("winner", winner.to_string())
        .add_attribute("prize", prize.to_string())
        .add_event(
            Event::new("lottery_winner_settled")
                .add_attribute("who", winner.to_string())
                .add_attribute("amount", prize.to_string())
                .add_attribute("denom", config.denom)
                .add_attribute("round", settled_round.to_string())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("winning_slot", slot.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}
