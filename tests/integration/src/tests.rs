//! End-to-end tests for the VRF lottery.
//!
//! The lottery and the coordinator each get their own mock dependencies and
//! are driven through their entry points. Messages one contract emits for the
//! other are decoded and replayed by hand, with the sender set to the
//! emitting contract's address.
//!
//! Run:
//! ```bash
//! cargo test -p vrf-lottery-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coins, from_json, to_json_binary, Addr, BankMsg, Binary, Coin, ContractResult, CosmosMsg,
    Env, MemoryStorage, OwnedDeps, Response, SystemResult, Timestamp, Uint128, Uint256, WasmMsg,
    WasmQuery,
};
use vrf_lottery_common::types::LotteryState;
use vrf_lottery_common::vrf::expand_random_words;

type TestDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Constants ───

/// Real drand quicknet public key
const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";
const GENESIS_TIME: u64 = 1692803367;

/// Real quicknet test vector: round 1000
const TEST_ROUND: u64 = 1000;
const TEST_SIG_HEX: &str = "b44679b9a59af2ec876b1a6b1ad52ea9b1615fc3982b19576350f93447cb1125e342b73a8dd2bacbe47e4b6b63ed5e39";
const TEST_RANDOMNESS_HEX: &str =
    "fe290beca10872ef2fb164d2aa4442de4566183ec51c56ff3cd603d930e54fdd";

const KEY_HASH: &str = "79d3d8832d904592c0bf9818b621522c988bb8b0c05cdc3b15aea1b6e8db0c15";
const FEE: u128 = 1_000;
const DENOM: &str = "inj";
const INTERVAL: u64 = 30;

/// Draw time: round 999 is the latest, so the request targets round 1000.
const DRAW_TIME: u64 = GENESIS_TIME + 2994;

// ─── Environment helpers ───

fn lottery_env(seconds: u64) -> Env {
    let mut env = mock_env();
    env.block.time = Timestamp::from_seconds(seconds);
    env
}

fn coordinator_env(seconds: u64, extra_blocks: u64) -> Env {
    let mut env = lottery_env(seconds);
    env.contract.address = MockApi::default().addr_make("vrf_coordinator");
    env.block.height += extra_blocks;
    env
}

fn lottery_addr() -> Addr {
    mock_env().contract.address
}

// ─── Coordinator helpers ───

fn setup_coordinator(deps: &mut TestDeps) {
    let admin = deps.api.addr_make("admin");
    let operator = deps.api.addr_make("operator");
    let msg = vrf_coordinator::msg::InstantiateMsg {
        operators: vec![operator.to_string()],
        consumers: vec![lottery_addr().to_string()],
        quicknet_pubkey_hex: QUICKNET_PK_HEX.to_string(),
        chain_hash: "52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971".to_string(),
        genesis_time: GENESIS_TIME,
        period_seconds: 3,
        max_num_words: 10,
    };
    vrf_coordinator::contract::instantiate(
        deps.as_mut(),
        coordinator_env(GENESIS_TIME, 0),
        message_info(&admin, &[]),
        msg,
    )
    .unwrap();
}

fn coordinator_next_request_id(deps: &TestDeps) -> u64 {
    from_json(
        vrf_coordinator::contract::query(
            deps.as_ref(),
            coordinator_env(DRAW_TIME, 0),
            vrf_coordinator::msg::QueryMsg::NextRequestId {},
        )
        .unwrap(),
    )
    .unwrap()
}

/// Operator submits the round 1000 beacon for `request_id`.
fn coordinator_fulfill(deps: &mut TestDeps, request_id: u64) -> Response {
    let operator = deps.api.addr_make("operator");
    vrf_coordinator::contract::execute(
        deps.as_mut(),
        coordinator_env(DRAW_TIME + 3, 3),
        message_info(&operator, &[]),
        vrf_coordinator::msg::ExecuteMsg::FulfillRandomWords {
            request_id,
            round: TEST_ROUND,
            signature_hex: TEST_SIG_HEX.to_string(),
        },
    )
    .unwrap()
}

// ─── Lottery helpers ───

fn setup_lottery(deps: &mut TestDeps) {
    let creator = deps.api.addr_make("creator");
    let msg = vrf_lottery::msg::InstantiateMsg {
        vrf_coordinator: deps.api.addr_make("vrf_coordinator").to_string(),
        entrance_fee: Uint128::new(FEE),
        denom: DENOM.to_string(),
        interval_seconds: INTERVAL,
        key_hash: KEY_HASH.to_string(),
        callback_gas_limit: 500_000,
        request_confirmations: 3,
    };
    vrf_lottery::contract::instantiate(
        deps.as_mut(),
        lottery_env(DRAW_TIME - INTERVAL - 1),
        message_info(&creator, &[]),
        msg,
    )
    .unwrap();
}

fn lottery_enter(deps: &mut TestDeps, who: &Addr) {
    vrf_lottery::contract::execute(
        deps.as_mut(),
        lottery_env(DRAW_TIME - INTERVAL),
        message_info(who, &coins(FEE, DENOM)),
        vrf_lottery::msg::ExecuteMsg::EnterLottery {},
    )
    .unwrap();
}

/// Let the lottery's `NextRequestId` query see what the coordinator would answer.
fn mirror_next_request_id(lottery: &mut TestDeps, next_id: u64) {
    lottery.querier.update_wasm(move |query| match query {
        WasmQuery::Smart { .. } => {
            SystemResult::Ok(ContractResult::Ok(to_json_binary(&next_id).unwrap()))
        }
        _ => panic!("unexpected query"),
    });
}

fn set_lottery_balance(lottery: &mut TestDeps, amount: u128) {
    lottery
        .querier
        .bank
        .update_balance(lottery_addr(), vec![Coin::new(amount, DENOM)]);
}

fn lottery_round_state(deps: &TestDeps) -> vrf_lottery::state::RoundState {
    from_json(
        vrf_lottery::contract::query(
            deps.as_ref(),
            mock_env(),
            vrf_lottery::msg::QueryMsg::RoundState {},
        )
        .unwrap(),
    )
    .unwrap()
}

/// Decode the single Wasm execute in `res`, returning its target and payload.
fn single_wasm_execute(res: &Response) -> (String, Binary) {
    assert_eq!(res.messages.len(), 1);
    match &res.messages[0].msg {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr, msg, ..
        }) => (contract_addr.clone(), msg.clone()),
        other => panic!("unexpected message: {:?}", other),
    }
}

/// Keeper triggers the draw and the lottery's request is forwarded to the
/// coordinator. Returns the request id the coordinator assigned.
fn draw(lottery: &mut TestDeps, coordinator: &mut TestDeps) -> u64 {
    mirror_next_request_id(lottery, coordinator_next_request_id(coordinator));

    let check: vrf_lottery::msg::CheckUpkeepResponse = from_json(
        vrf_lottery::contract::query(
            lottery.as_ref(),
            lottery_env(DRAW_TIME),
            vrf_lottery::msg::QueryMsg::CheckUpkeep {
                check_data: Binary::default(),
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert!(check.upkeep_needed);

    let keeper = lottery.api.addr_make("keeper");
    let res = vrf_lottery::contract::execute(
        lottery.as_mut(),
        lottery_env(DRAW_TIME),
        message_info(&keeper, &[]),
        vrf_lottery::msg::ExecuteMsg::PerformUpkeep {
            perform_data: check.perform_data,
        },
    )
    .unwrap();

    let (target, request) = single_wasm_execute(&res);
    assert_eq!(target, coordinator.api.addr_make("vrf_coordinator").to_string());

    let res = vrf_coordinator::contract::execute(
        coordinator.as_mut(),
        coordinator_env(DRAW_TIME, 0),
        message_info(&lottery_addr(), &[]),
        from_json(&request).unwrap(),
    )
    .unwrap();
    let assigned: u64 = from_json(res.data.unwrap()).unwrap();

    let state = lottery_round_state(lottery);
    assert_eq!(state.state, LotteryState::Drawing);
    assert_eq!(state.pending_request_id, Some(assigned));
    assigned
}

/// Replay the coordinator's callback into the lottery.
fn deliver_callback(
    lottery: &mut TestDeps,
    coordinator_res: &Response,
) -> Result<Response, vrf_lottery::ContractError> {
    let (target, callback) = single_wasm_execute(coordinator_res);
    assert_eq!(target, lottery_addr().to_string());
    assert_eq!(coordinator_res.messages[0].gas_limit, Some(500_000));

    let coordinator = lottery.api.addr_make("vrf_coordinator");
    vrf_lottery::contract::execute(
        lottery.as_mut(),
        lottery_env(DRAW_TIME + 3),
        message_info(&coordinator, &[]),
        from_json(&callback).unwrap(),
    )
}

/// Word the coordinator derives for `request_id` from the round 1000 beacon.
fn expected_word(request_id: u64) -> Uint256 {
    let randomness: [u8; 32] = hex::decode(TEST_RANDOMNESS_HEX)
        .unwrap()
        .try_into()
        .unwrap();
    let seed = vrf_coordinator::execute::request_seed(&randomness, request_id);
    expand_random_words(&seed, 1)[0]
}

fn expected_winner(entrants: &[Addr], request_id: u64) -> Addr {
    let slot = expected_word(request_id) % Uint256::from(entrants.len() as u64);
    let index = (0..entrants.len())
        .find(|i| Uint256::from(*i as u64) == slot)
        .unwrap();
    entrants[index].clone()
}

fn payout(res: &Response) -> (String, Vec<Coin>) {
    match &res.messages[0].msg {
        CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => {
            (to_address.clone(), amount.clone())
        }
        other => panic!("unexpected message: {:?}", other),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_draw_with_verified_beacon() {
    let mut lottery = mock_dependencies();
    let mut coordinator = mock_dependencies();
    setup_coordinator(&mut coordinator);
    setup_lottery(&mut lottery);

    let entrants = vec![
        lottery.api.addr_make("alice"),
        lottery.api.addr_make("bob"),
        lottery.api.addr_make("carol"),
    ];
    for who in &entrants {
        lottery_enter(&mut lottery, who);
    }
    set_lottery_balance(&mut lottery, 3 * FEE);

    let request_id = draw(&mut lottery, &mut coordinator);
    assert_eq!(request_id, 1);

    let coordinator_res = coordinator_fulfill(&mut coordinator, request_id);
    let res = deliver_callback(&mut lottery, &coordinator_res).unwrap();

    let (to, amount) = payout(&res);
    let winner = expected_winner(&entrants, request_id);
    assert_eq!(to, winner.to_string());
    assert_eq!(amount, coins(3 * FEE, DENOM));

    let recent: Option<Addr> = from_json(
        vrf_lottery::contract::query(
            lottery.as_ref(),
            mock_env(),
            vrf_lottery::msg::QueryMsg::RecentWinner {},
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(recent, Some(winner));

    let state = lottery_round_state(&lottery);
    assert_eq!(state.state, LotteryState::Open);
    assert_eq!(state.entrant_count, 0);
    assert!(state.pool_balance.is_zero());
    assert_eq!(state.last_draw_timestamp, Timestamp::from_seconds(DRAW_TIME + 3));
}

#[test]
fn test_payout_failure_rolls_back_both_sides() {
    let mut lottery = mock_dependencies();
    let mut coordinator = mock_dependencies();
    setup_coordinator(&mut coordinator);
    setup_lottery(&mut lottery);

    let entrants = vec![lottery.api.addr_make("alice"), lottery.api.addr_make("bob")];
    for who in &entrants {
        lottery_enter(&mut lottery, who);
    }
    // Contract holds nothing, so the prize cannot be paid out
    set_lottery_balance(&mut lottery, 0);

    let request_id = draw(&mut lottery, &mut coordinator);
    let before = lottery_round_state(&lottery);

    // On chain the failed callback reverts the coordinator's fulfil too.
    // Mocks don't roll back, so the same callback is simply replayed.
    let coordinator_res = coordinator_fulfill(&mut coordinator, request_id);
    let err = deliver_callback(&mut lottery, &coordinator_res).unwrap_err();
    assert!(matches!(
        err,
        vrf_lottery::ContractError::TransferFailed { .. }
    ));
    assert_eq!(lottery_round_state(&lottery), before);

    // Once funded, the same verified words settle the round
    set_lottery_balance(&mut lottery, 2 * FEE);
    let res = deliver_callback(&mut lottery, &coordinator_res).unwrap();
    let (to, amount) = payout(&res);
    assert_eq!(to, expected_winner(&entrants, request_id).to_string());
    assert_eq!(amount, coins(2 * FEE, DENOM));
    assert_eq!(lottery_round_state(&lottery).state, LotteryState::Open);
}

#[test]
fn test_stale_callback_rejected_after_settlement() {
    let mut lottery = mock_dependencies();
    let mut coordinator = mock_dependencies();
    setup_coordinator(&mut coordinator);
    setup_lottery(&mut lottery);

    let alice = lottery.api.addr_make("alice");
    lottery_enter(&mut lottery, &alice);
    set_lottery_balance(&mut lottery, FEE);

    let request_id = draw(&mut lottery, &mut coordinator);
    let coordinator_res = coordinator_fulfill(&mut coordinator, request_id);
    deliver_callback(&mut lottery, &coordinator_res).unwrap();

    let err = deliver_callback(&mut lottery, &coordinator_res).unwrap_err();
    assert!(matches!(
        err,
        vrf_lottery::ContractError::UnrecognizedRequest { request_id: 1 }
    ));
}
