#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{to_json_binary, Binary, Deps, Env, StdResult};

use crate::msg::{BettingStrategyMsg, LibraryEntry, PlayingTable, QueryMsg, StrategyKind};
use crate::state::{list_entries, BETTING, PLAYING};
use crate::strategy_logic::canonical_name;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::ListStrategies { kind } => to_json_binary(&query_list_strategies(deps, kind)?),
        QueryMsg::GetPlaying { name } => to_json_binary(&query_playing(deps, name)?),
        QueryMsg::GetBetting { name } => to_json_binary(&query_betting(deps, name)?),
    }
}

fn query_list_strategies(deps: Deps, kind: StrategyKind) -> StdResult<Vec<LibraryEntry>> {
    match kind {
        StrategyKind::Playing => list_entries(deps.storage, &PLAYING, kind),
        StrategyKind::Betting => list_entries(deps.storage, &BETTING, kind),
    }
}

/// Flat table expanded from the stored chart, `None` when absent.
fn query_playing(deps: Deps, name: String) -> StdResult<Option<PlayingTable>> {
    let stored = PLAYING.may_load(deps.storage, canonical_name(&name))?;
    Ok(stored.map(|entry| entry.chart.to_table()))
}

fn query_betting(deps: Deps, name: String) -> StdResult<Option<BettingStrategyMsg>> {
    let stored = BETTING.may_load(deps.storage, canonical_name(&name))?;
    Ok(stored.map(|entry| entry.strategy))
}
