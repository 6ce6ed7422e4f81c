use blackjack_strategy::EngineChart;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Order, StdResult, Storage};
use cw_storage_plus::Map;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::msg::{BettingStrategyMsg, LibraryEntry, StrategyKind};

/// Playing strategies are kept in the engine's range-compressed chart form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StoredPlaying {
    pub builtin: bool,
    pub chart: EngineChart,
}

#[cw_serde]
pub struct StoredBetting {
    pub builtin: bool,
    pub strategy: BettingStrategyMsg,
}

pub trait CatalogEntry: Serialize + DeserializeOwned {
    fn builtin(&self) -> bool;
}

impl CatalogEntry for StoredPlaying {
    fn builtin(&self) -> bool {
        self.builtin
    }
}

impl CatalogEntry for StoredBetting {
    fn builtin(&self) -> bool {
        self.builtin
    }
}

pub const PLAYING: Map<&str, StoredPlaying> = Map::new("playing");
pub const BETTING: Map<&str, StoredBetting> = Map::new("betting");

pub fn list_entries<T: CatalogEntry>(
    storage: &dyn Storage,
    map: &Map<&str, T>,
    kind: StrategyKind,
) -> StdResult<Vec<LibraryEntry>> {
    map.range(storage, None, None, Order::Ascending)
        .map(|item| {
            let (name, entry) = item?;
            Ok(LibraryEntry {
                name,
                is_custom: !entry.builtin(),
                kind,
            })
        })
        .collect()
}
