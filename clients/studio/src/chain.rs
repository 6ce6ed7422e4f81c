//! In-process chain hosting the strategy library contract.
//!
//! The studio runs the contract inside a `cw-multi-test` app instead of a
//! remote node. Custom entries can be mirrored into a JSON snapshot so they
//! survive restarts; built-ins are always re-seeded from `InstantiateMsg`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use cosmwasm_std::Addr;
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strategy_library::msg::{
    BettingStrategyMsg, ExecuteMsg, InstantiateMsg, LibraryEntry, PlayingTable, QueryMsg,
    StrategyKind,
};

use crate::error::LibraryError;

struct ChainState {
    app: App,
    contract: Addr,
    operator: Addr,
    snapshot: Option<PathBuf>,
}

/// Custom entries only; built-ins come from instantiation.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    playing: BTreeMap<String, PlayingTable>,
    #[serde(default)]
    betting: BTreeMap<String, BettingStrategyMsg>,
}

#[derive(Clone)]
pub struct LocalChain {
    inner: Rc<RefCell<ChainState>>,
}

fn unavailable(err: impl ToString) -> LibraryError {
    LibraryError::Unavailable(err.to_string())
}

impl LocalChain {
    /// Fresh chain with the library instantiated from `seeds`. Nothing is
    /// persisted.
    pub fn boot(seeds: &InstantiateMsg) -> Result<Self, LibraryError> {
        let mut app = App::default();
        let operator = app.api().addr_make("studio");

        let contract_code = ContractWrapper::new(
            strategy_library::contract::execute,
            strategy_library::contract::instantiate,
            strategy_library::contract::query,
        );
        let code_id = app.store_code(Box::new(contract_code));
        let contract = app
            .instantiate_contract(code_id, operator.clone(), seeds, &[], "strategy-library", None)
            .map_err(unavailable)?;
        log::debug!("Strategy library instantiated at {contract}");

        Ok(Self {
            inner: Rc::new(RefCell::new(ChainState {
                app,
                contract,
                operator,
                snapshot: None,
            })),
        })
    }

    /// Boots with the standard built-ins, replays the custom entries stored in
    /// `snapshot` and keeps that file in sync after every change.
    pub fn open(snapshot: &Path) -> Result<Self, LibraryError> {
        let chain = Self::boot(&InstantiateMsg::with_defaults())?;

        if snapshot.exists() {
            let raw = fs::read_to_string(snapshot).map_err(unavailable)?;
            let stored: Snapshot = serde_json::from_str(&raw).map_err(unavailable)?;
            let (playing, betting) = (stored.playing.len(), stored.betting.len());

            for (name, strategy) in stored.playing {
                let msg = ExecuteMsg::SavePlaying { name: name.clone(), strategy };
                if let Err(e) = chain.execute(&msg) {
                    log::warn!("Skipping stored playing strategy '{name}': {e}");
                }
            }
            for (name, strategy) in stored.betting {
                let msg = ExecuteMsg::SaveBetting { name: name.clone(), strategy };
                if let Err(e) = chain.execute(&msg) {
                    log::warn!("Skipping stored betting strategy '{name}': {e}");
                }
            }
            log::info!(
                "Restored {playing} playing and {betting} betting strategies from {}",
                snapshot.display()
            );
        } else {
            log::info!("No library snapshot at {}, starting with built-ins", snapshot.display());
        }

        chain.inner.borrow_mut().snapshot = Some(snapshot.to_path_buf());
        Ok(chain)
    }

    pub fn query<T: DeserializeOwned>(&self, msg: &QueryMsg) -> Result<T, LibraryError> {
        let state = self.inner.borrow();
        state
            .app
            .wrap()
            .query_wasm_smart(state.contract.clone(), msg)
            .map_err(unavailable)
    }

    /// Runs `msg` and, when a snapshot is kept, writes it. A failed write
    /// rolls the change back and reports the library unavailable.
    pub fn execute(&self, msg: &ExecuteMsg) -> Result<AppResponse, LibraryError> {
        let persisting = self.inner.borrow().snapshot.is_some();
        let undo = if persisting { Some(self.undo_for(msg)?) } else { None };

        let response = self.apply(msg)?;
        if let Err(e) = self.persist() {
            if let Some(undo) = undo {
                if let Err(revert) = self.apply(&undo) {
                    log::error!("Could not roll back after a failed snapshot write: {revert}");
                }
            }
            return Err(e);
        }
        Ok(response)
    }

    fn apply(&self, msg: &ExecuteMsg) -> Result<AppResponse, LibraryError> {
        let result = {
            let mut state = self.inner.borrow_mut();
            let (sender, contract) = (state.operator.clone(), state.contract.clone());
            state.app.execute_contract(sender, contract, msg, &[])
        };
        result.map_err(|e| LibraryError::from_contract(&e.to_string()))
    }

    /// Message that puts back the entry `msg` is about to touch.
    fn undo_for(&self, msg: &ExecuteMsg) -> Result<ExecuteMsg, LibraryError> {
        let (kind, name) = match msg {
            ExecuteMsg::SavePlaying { name, .. } => (StrategyKind::Playing, name.clone()),
            ExecuteMsg::SaveBetting { name, .. } => (StrategyKind::Betting, name.clone()),
            ExecuteMsg::DeleteStrategy { kind, name } => (*kind, name.clone()),
        };
        let previous = match kind {
            StrategyKind::Playing => self
                .query::<Option<PlayingTable>>(&QueryMsg::GetPlaying { name: name.clone() })?
                .map(|strategy| ExecuteMsg::SavePlaying { name: name.clone(), strategy }),
            StrategyKind::Betting => self
                .query::<Option<BettingStrategyMsg>>(&QueryMsg::GetBetting { name: name.clone() })?
                .map(|strategy| ExecuteMsg::SaveBetting { name: name.clone(), strategy }),
        };
        Ok(previous.unwrap_or(ExecuteMsg::DeleteStrategy { kind, name }))
    }

    fn persist(&self) -> Result<(), LibraryError> {
        let Some(path) = self.inner.borrow().snapshot.clone() else {
            return Ok(());
        };
        match self.write_snapshot(&path) {
            Ok(()) => {
                log::debug!("Library snapshot written to {}", path.display());
                Ok(())
            }
            Err(e) => {
                log::warn!("Could not write library snapshot {}: {e}", path.display());
                Err(e)
            }
        }
    }

    fn write_snapshot(&self, path: &Path) -> Result<(), LibraryError> {
        let mut snapshot = Snapshot::default();
        for name in self.custom_names(StrategyKind::Playing)? {
            let table: Option<PlayingTable> = self.query(&QueryMsg::GetPlaying { name: name.clone() })?;
            if let Some(table) = table {
                snapshot.playing.insert(name, table);
            }
        }
        for name in self.custom_names(StrategyKind::Betting)? {
            let strategy: Option<BettingStrategyMsg> =
                self.query(&QueryMsg::GetBetting { name: name.clone() })?;
            if let Some(strategy) = strategy {
                snapshot.betting.insert(name, strategy);
            }
        }

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(unavailable)?;
        }
        let json = serde_json::to_string_pretty(&snapshot).map_err(unavailable)?;
        fs::write(path, json).map_err(unavailable)
    }

    fn custom_names(&self, kind: StrategyKind) -> Result<Vec<String>, LibraryError> {
        let entries: Vec<LibraryEntry> = self.query(&QueryMsg::ListStrategies { kind })?;
        Ok(entries
            .into_iter()
            .filter(|entry| entry.is_custom)
            .map(|entry| entry.name)
            .collect())
    }
}

/// Value of a `wasm` event attribute emitted by the contract.
pub fn wasm_attribute(response: &AppResponse, key: &str) -> Option<String> {
    response
        .events
        .iter()
        .filter(|event| event.ty == "wasm")
        .flat_map(|event| event.attributes.iter())
        .find(|attr| attr.key == key)
        .map(|attr| attr.value.clone())
}
