#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{DepsMut, Env, MessageInfo, Response, Storage};
use cw_storage_plus::Map;

use crate::error::ContractError;
use crate::msg::{BettingStrategyMsg, ExecuteMsg, PlayingTable, StrategyKind};
use crate::state::{CatalogEntry, StoredBetting, StoredPlaying, BETTING, PLAYING};
use crate::strategy_logic::{betting_strategy, playing_chart, validate_name};

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SavePlaying { name, strategy } => execute_save_playing(deps, info, name, strategy),
        ExecuteMsg::SaveBetting { name, strategy } => execute_save_betting(deps, info, name, strategy),
        ExecuteMsg::DeleteStrategy { kind, name } => execute_delete_strategy(deps, info, kind, name),
    }
}

pub fn execute_save_playing(
    deps: DepsMut,
    info: MessageInfo,
    name: String,
    strategy: PlayingTable,
) -> Result<Response, ContractError> {
    let kind = StrategyKind::Playing;
    let name = validate_name(&name)?;
    let existed = ensure_writable(deps.storage, &PLAYING, kind, &name)?;

    let chart = playing_chart(&strategy)?;
    PLAYING.save(deps.storage, &name, &StoredPlaying { builtin: false, chart })?;

    Ok(save_response(kind, &name, existed, &info))
}

pub fn execute_save_betting(
    deps: DepsMut,
    info: MessageInfo,
    name: String,
    strategy: BettingStrategyMsg,
) -> Result<Response, ContractError> {
    let kind = StrategyKind::Betting;
    let name = validate_name(&name)?;
    let existed = ensure_writable(deps.storage, &BETTING, kind, &name)?;

    let strategy = betting_strategy(&name, &strategy)?;
    BETTING.save(deps.storage, &name, &StoredBetting { builtin: false, strategy })?;

    Ok(save_response(kind, &name, existed, &info))
}

pub fn execute_delete_strategy(
    deps: DepsMut,
    info: MessageInfo,
    kind: StrategyKind,
    name: String,
) -> Result<Response, ContractError> {
    let name = validate_name(&name)?;
    match kind {
        StrategyKind::Playing => remove_custom(deps.storage, &PLAYING, kind, &name)?,
        StrategyKind::Betting => remove_custom(deps.storage, &BETTING, kind, &name)?,
    }

    Ok(Response::new()
        .add_attribute("action", "delete_strategy")
        .add_attribute("kind", kind.to_string())
        .add_attribute("name", name.as_str())
        .add_attribute("sender", info.sender.as_str())
        .add_attribute("status", "success")
        .add_attribute(
            "message",
            format!("{} strategy '{name}' deleted successfully.", kind.title()),
        ))
}

/// Returns whether a custom entry is being overwritten. Built-ins are never
/// writable.
fn ensure_writable<T: CatalogEntry>(
    storage: &dyn Storage,
    map: &Map<&str, T>,
    kind: StrategyKind,
    name: &str,
) -> Result<bool, ContractError> {
    match map.may_load(storage, name)? {
        Some(entry) if entry.builtin() => Err(ContractError::ImmutableEntry {
            kind,
            name: name.to_string(),
        }),
        Some(_) => Ok(true),
        None => Ok(false),
    }
}

fn remove_custom<T: CatalogEntry>(
    storage: &mut dyn Storage,
    map: &Map<&str, T>,
    kind: StrategyKind,
    name: &str,
) -> Result<(), ContractError> {
    let entry = map.may_load(storage, name)?.ok_or_else(|| ContractError::NotFound {
        kind,
        name: name.to_string(),
    })?;
    if entry.builtin() {
        return Err(ContractError::ImmutableEntry {
            kind,
            name: name.to_string(),
        });
    }
    map.remove(storage, name);
    Ok(())
}

fn save_response(kind: StrategyKind, name: &str, existed: bool, info: &MessageInfo) -> Response {
    Response::new()
        .add_attribute("action", "save_strategy")
        .add_attribute("kind", kind.to_string())
        .add_attribute("name", name)
        .add_attribute("sender", info.sender.as_str())
        .add_attribute("status", "success")
        .add_attribute("result", if existed { "updated" } else { "created" })
        .add_attribute(
            "message",
            format!("{} strategy '{name}' saved successfully.", kind.title()),
        )
}
