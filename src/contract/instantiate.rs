#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{DepsMut, Env, MessageInfo, Response};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::msg::InstantiateMsg;
use crate::state::{StoredBetting, StoredPlaying, BETTING, PLAYING};
use crate::strategy_logic::{betting_strategy, playing_chart, validate_name};

const CONTRACT_NAME: &str = "crates.io:strategy-library";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    for seed in &msg.playing {
        let name = validate_name(&seed.name)?;
        let chart = playing_chart(&seed.strategy)?;
        PLAYING.save(deps.storage, &name, &StoredPlaying { builtin: true, chart })?;
    }
    for seed in &msg.betting {
        let name = validate_name(&seed.name)?;
        let strategy = betting_strategy(&name, seed)?;
        BETTING.save(deps.storage, &name, &StoredBetting { builtin: true, strategy })?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("playing_builtins", msg.playing.len().to_string())
        .add_attribute("betting_builtins", msg.betting.len().to_string()))
}
