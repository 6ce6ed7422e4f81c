use std::future::Future;

use strategy_library::msg::{
    BettingStrategyMsg, ExecuteMsg, LibraryEntry, PlayingTable, QueryMsg, StrategyKind,
};

use crate::chain::{wasm_attribute, LocalChain};
use crate::error::LibraryError;

/// Strategy content as the library transports it.
#[derive(Debug, Clone, PartialEq)]
pub enum WireContent {
    Playing(PlayingTable),
    Betting(BettingStrategyMsg),
}

impl WireContent {
    pub fn kind(&self) -> StrategyKind {
        match self {
            WireContent::Playing(_) => StrategyKind::Playing,
            WireContent::Betting(_) => StrategyKind::Betting,
        }
    }
}

/// One strategy kind's view of the library.
pub trait LibraryClient: Clone + 'static {
    fn list(&self) -> impl Future<Output = Result<Vec<LibraryEntry>, LibraryError>>;

    /// `NotFound` when no entry has this name.
    fn fetch(&self, name: &str) -> impl Future<Output = Result<WireContent, LibraryError>>;

    /// Creates or overwrites a custom entry. Built-in names fail with
    /// `ImmutableEntry`.
    fn save(
        &self,
        name: &str,
        content: WireContent,
    ) -> impl Future<Output = Result<LibraryEntry, LibraryError>>;

    fn delete(&self, name: &str) -> impl Future<Output = Result<(), LibraryError>>;
}

/// Talks to the library contract on a [`LocalChain`].
#[derive(Clone)]
pub struct ContractLibrary {
    chain: LocalChain,
    kind: StrategyKind,
}

impl ContractLibrary {
    pub fn new(chain: LocalChain, kind: StrategyKind) -> Self {
        Self { chain, kind }
    }
}

impl LibraryClient for ContractLibrary {
    async fn list(&self) -> Result<Vec<LibraryEntry>, LibraryError> {
        self.chain.query(&QueryMsg::ListStrategies { kind: self.kind })
    }

    async fn fetch(&self, name: &str) -> Result<WireContent, LibraryError> {
        let missing = || LibraryError::NotFound(format!("{} strategy '{name}' not found", self.kind));
        let name = name.to_string();
        match self.kind {
            StrategyKind::Playing => self
                .chain
                .query::<Option<PlayingTable>>(&QueryMsg::GetPlaying { name })?
                .map(WireContent::Playing)
                .ok_or_else(missing),
            StrategyKind::Betting => self
                .chain
                .query::<Option<BettingStrategyMsg>>(&QueryMsg::GetBetting { name })?
                .map(WireContent::Betting)
                .ok_or_else(missing),
        }
    }

    async fn save(&self, name: &str, content: WireContent) -> Result<LibraryEntry, LibraryError> {
        if content.kind() != self.kind {
            return Err(LibraryError::Rejected(format!(
                "cannot store {} content in the {} library",
                content.kind(),
                self.kind
            )));
        }
        let name = name.to_string();
        let msg = match content {
            WireContent::Playing(strategy) => ExecuteMsg::SavePlaying { name: name.clone(), strategy },
            WireContent::Betting(strategy) => ExecuteMsg::SaveBetting { name: name.clone(), strategy },
        };

        let response = self.chain.execute(&msg)?;
        if let Some(message) = wasm_attribute(&response, "message") {
            log::info!("{message}");
        }
        Ok(LibraryEntry {
            name: wasm_attribute(&response, "name").unwrap_or(name),
            is_custom: true,
            kind: self.kind,
        })
    }

    async fn delete(&self, name: &str) -> Result<(), LibraryError> {
        let response = self.chain.execute(&ExecuteMsg::DeleteStrategy {
            kind: self.kind,
            name: name.to_string(),
        })?;
        if let Some(message) = wasm_attribute(&response, "message") {
            log::info!("{message}");
        }
        Ok(())
    }
}
