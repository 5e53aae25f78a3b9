use cosmwasm_std::{
    to_json_binary, Addr, Api, DepsMut, Env, Event, MessageInfo, Response, SubMsg, Uint64,
    WasmMsg,
};
use sha2::{Digest, Sha256};
use vrf_lottery_common::vrf::{expand_random_words, VrfConsumerMsg, MAX_REQUEST_CONFIRMATIONS};

use crate::error::ContractError;
use crate::msg::RequestParams;
use crate::state::{
    RandomnessRequest, RequestStatus, StoredBeacon, BEACONS, CONFIG, LATEST_ROUND,
    NEXT_REQUEST_ID, REQUESTS,
};
use crate::verify::verify_quicknet_beacon;

/// Register a randomness request. Only consumers can call this.
///
/// The request is pinned to the first drand round published after the
/// current block time, and the assigned id is returned as response data.
pub fn request_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: RequestParams,
) -> Result<Response, ContractError> {
    let RequestParams {
        key_hash,
        request_confirmations,
        callback_gas_limit,
        num_words,
    } = params;

    let config = CONFIG.load(deps.storage)?;

    if !config.consumers.contains(&info.sender) {
        return Err(ContractError::UnknownConsumer {
            address: info.sender.to_string(),
        });
    }

    if num_words == 0 || num_words > config.max_num_words {
        return Err(ContractError::InvalidNumWords {
            got: num_words,
            max: config.max_num_words,
        });
    }

    if request_confirmations > MAX_REQUEST_CONFIRMATIONS {
        return Err(ContractError::InvalidRequestConfirmations {
            got: request_confirmations,
            max: MAX_REQUEST_CONFIRMATIONS,
        });
    }

    let key_hash_bytes = hex::decode(&key_hash).map_err(|_| ContractError::InvalidHex {
        field: "key_hash".to_string(),
    })?;
    if key_hash_bytes.len() != 32 {
        return Err(ContractError::InvalidHex {
            field: "key_hash".to_string(),
        });
    }

    let request_id = NEXT_REQUEST_ID.load(deps.storage)?;
    NEXT_REQUEST_ID.save(deps.storage, &(request_id + 1))?;

    let target_round = config.target_round(env.block.time);
    let request = RandomnessRequest {
        id: request_id,
        consumer: info.sender.clone(),
        key_hash: key_hash.clone(),
        request_confirmations,
        callback_gas_limit,
        num_words,
        requested_at: env.block.time,
        requested_at_height: env.block.height,
        target_round,
        status: RequestStatus::Pending,
        fulfilled_at: None,
        random_words: None,
    };
    REQUESTS.save(deps.storage, request_id, &request)?;

    Ok(Response::new()
        .set_data(to_json_binary(&request_id)?)
        .add_attribute("action", "request_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("consumer", info.sender.to_string())
        .add_event(
            Event::new("vrf_randomness_requested")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("consumer", info.sender.to_string())
                .add_attribute("key_hash", key_hash)
                .add_attribute("num_words", num_words.to_string())
                .add_attribute("target_round", target_round.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Fulfil a pending request. Only operators can call this.
///
/// The beacon for the request's target round is BLS-verified, random words are
/// derived from it, and the consumer is called back in the same transaction.
/// A failing callback reverts the whole fulfilment, leaving the request
/// pending so it can be delivered again.
pub fn fulfill_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    round: u64,
    signature_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if !config.operators.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only operators can fulfill requests".to_string(),
        });
    }

    let mut request = REQUESTS
        .may_load(deps.storage, request_id)?
        .ok_or(ContractError::RequestNotFound { request_id })?;

    if request.status == RequestStatus::Fulfilled {
        return Err(ContractError::RequestAlreadyFulfilled { request_id });
    }

    if round != request.target_round {
        return Err(ContractError::WrongRound {
            request_id,
            expected: request.target_round,
            got: round,
        });
    }

    let ready_height = Uint64::new(request.requested_at_height)
        .checked_add(Uint64::new(request.request_confirmations))?
        .u64();
    if env.block.height < ready_height {
        return Err(ContractError::ConfirmationsPending {
            request_id,
            ready_height,
            height: env.block.height,
        });
    }

    let signature = hex::decode(&signature_hex).map_err(|_| ContractError::InvalidHex {
        field: "signature_hex".to_string(),
    })?;

    let randomness = verify_quicknet_beacon(&config.quicknet_pubkey, round, &signature)
        .map_err(|e| ContractError::VerificationFailed {
            reason: e.to_string(),
        })?;

    // Several requests can share a target round; keep the first verified copy
    if !BEACONS.has(deps.storage, round) {
        let beacon = StoredBeacon {
            round,
            randomness: randomness.to_vec(),
            signature,
            verified: true,
            submitted_at: env.block.time,
            submitted_by: info.sender.clone(),
        };
        BEACONS.save(deps.storage, round, &beacon)?;
    }

    let current_latest = LATEST_ROUND.may_load(deps.storage)?.unwrap_or(0);
    if round > current_latest {
        LATEST_ROUND.save(deps.storage, &round)?;
    }

    let seed = request_seed(&randomness, request_id);
    let random_words = expand_random_words(&seed, request.num_words);

    request.status = RequestStatus::Fulfilled;
    request.fulfilled_at = Some(env.block.time);
    request.random_words = Some(random_words.clone());
    REQUESTS.save(deps.storage, request_id, &request)?;

    let callback = WasmMsg::Execute {
        contract_addr: request.consumer.to_string(),
        msg: to_json_binary(&VrfConsumerMsg::FulfillRandomWords {
            request_id,
            random_words,
        })?,
        funds: vec![],
    };
    let callback = SubMsg::new(callback).with_gas_limit(request.callback_gas_limit);

    Ok(Response::new()
        .add_submessage(callback)
        .add_attribute("action", "fulfill_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("round", round.to_string())
        .add_event(
            Event::new("vrf_randomness_fulfilled")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("consumer", request.consumer.to_string())
                .add_attribute("round", round.to_string())
                .add_attribute("seed", hex::encode(seed))
                .add_attribute("submitted_by", info.sender.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Per-request seed: sha256(beacon_randomness || request_id_u64_be).
pub fn request_seed(randomness: &[u8; 32], request_id: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(randomness);
    hasher.update(request_id.to_be_bytes());
    hasher.finalize().into()
}

/// Update the operator list. Admin only.
pub fn update_operators(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update operators".to_string(),
        });
    }

    apply_address_changes(deps.api, &mut config.operators, &add, &remove)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_operators")
        .add_attribute("added", add.join(","))
        .add_attribute("removed", remove.join(",")))
}

/// Update the consumer list. Admin only.
pub fn update_consumers(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update consumers".to_string(),
        });
    }

    apply_address_changes(deps.api, &mut config.consumers, &add, &remove)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_consumers")
        .add_attribute("added", add.join(","))
        .add_attribute("removed", remove.join(",")))
}

fn apply_address_changes(
    api: &dyn Api,
    list: &mut Vec<Addr>,
    add: &[String],
    remove: &[String],
) -> Result<(), ContractError> {
    for addr_str in remove {
        let addr = api.addr_validate(addr_str)?;
        list.retain(|a| *a != addr);
    }

    for addr_str in add {
        let addr = api.addr_validate(addr_str)?;
        if !list.contains(&addr) {
            list.push(addr);
        }
    }

    Ok(())
}
