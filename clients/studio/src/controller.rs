use std::fmt;
use std::future::Future;

use blackjack_strategy::{BettingStrategy, PlayingStrategy, DEFAULT_BETTING, DEFAULT_PLAYING};
use strategy_library::msg::{LibraryEntry, StrategyKind};
use strategy_library::strategy_logic::{to_betting_msg, to_betting_wire, validate_name};

use crate::client::{LibraryClient, WireContent};
use crate::error::{EditorError, LibraryError};
use crate::session::{EditorSession, Operation, Ticket};

/// User-facing outcome of a controller action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: StrategyKind,
    pub message: String,
}

impl Feedback {
    fn new(kind: StrategyKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Moves strategies between the session models and the library.
pub struct EditorController<C: LibraryClient> {
    playing: C,
    betting: C,
    default_playing: String,
    default_betting: String,
}

impl<C: LibraryClient> EditorController<C> {
    pub fn new(playing: C, betting: C) -> Self {
        Self {
            playing,
            betting,
            default_playing: DEFAULT_PLAYING.to_string(),
            default_betting: DEFAULT_BETTING.to_string(),
        }
    }

    /// Entries selected on start-up when listed.
    pub fn with_defaults(mut self, playing: impl Into<String>, betting: impl Into<String>) -> Self {
        self.default_playing = playing.into();
        self.default_betting = betting.into();
        self
    }

    pub fn client(&self, kind: StrategyKind) -> &C {
        match kind {
            StrategyKind::Playing => &self.playing,
            StrategyKind::Betting => &self.betting,
        }
    }

    fn default_name(&self, kind: StrategyKind) -> &str {
        match kind {
            StrategyKind::Playing => &self.default_playing,
            StrategyKind::Betting => &self.default_betting,
        }
    }

    /// Lists both kinds and loads each default entry. Both kinds are
    /// attempted; the first failure is returned.
    pub async fn initialize(&self, session: &mut EditorSession) -> Result<(), EditorError> {
        let playing = self.initialize_kind(session, StrategyKind::Playing).await;
        let betting = self.initialize_kind(session, StrategyKind::Betting).await;
        playing.and(betting)
    }

    async fn initialize_kind(&self, session: &mut EditorSession, kind: StrategyKind) -> Result<(), EditorError> {
        self.refresh(session, kind).await?;

        let pane = session.pane(kind);
        let preferred = self.default_name(kind);
        let start = match pane.entry(preferred) {
            Some(entry) => entry.name.clone(),
            None => match pane.entries.first() {
                Some(entry) => {
                    log::warn!("Default {kind} strategy '{preferred}' not listed, using '{}'", entry.name);
                    entry.name.clone()
                }
                None => {
                    log::warn!("The {kind} library is empty");
                    return Ok(());
                }
            },
        };

        session.select(kind, &start)?;
        let feedback = self.load_selected(session, kind).await?;
        log::info!("{feedback}");
        Ok(())
    }

    /// Replaces the pane listing with the library's. Listings are applied
    /// whichever response arrives last.
    pub async fn refresh(&self, session: &mut EditorSession, kind: StrategyKind) -> Result<usize, EditorError> {
        let ticket = session.begin(kind, Operation::List, "")?;
        let result = self.client(kind).list().await;
        session.settle(&ticket);

        let entries = result?;
        let count = entries.len();
        log::info!("Listed {count} {kind} strategies");
        session.set_entries(kind, entries);
        Ok(count)
    }

    /// First half of a load: issues the fetch for the selected entry. The
    /// returned future owns everything it needs, so the caller decides when
    /// to drive it.
    pub fn start_fetch(
        &self,
        session: &mut EditorSession,
        kind: StrategyKind,
    ) -> Result<(Ticket, impl Future<Output = Result<WireContent, LibraryError>> + 'static), EditorError> {
        let name = session
            .pane(kind)
            .selected
            .clone()
            .ok_or_else(|| EditorError::Validation("Please select a strategy to load.".to_string()))?;
        let ticket = session.begin(kind, Operation::Fetch, &name)?;

        let client = self.client(kind).clone();
        Ok((ticket, async move { client.fetch(&name).await }))
    }

    /// Second half of a load. A response whose ticket is no longer current
    /// is dropped and the model is left alone.
    pub fn finish_fetch(
        &self,
        session: &mut EditorSession,
        ticket: Ticket,
        result: Result<WireContent, LibraryError>,
    ) -> Result<Feedback, EditorError> {
        let kind = ticket.kind;
        if !session.settle(&ticket) {
            log::warn!("Dropping outdated {kind} response for '{}'", ticket.name);
            return Err(EditorError::Stale { kind });
        }

        let content = match result {
            Ok(content) => content,
            Err(err) => {
                if matches!(err, LibraryError::NotFound(_)) {
                    session.revert_selection(kind);
                }
                return Err(err.into());
            }
        };

        let name = ticket.name.as_str();
        match content {
            WireContent::Playing(table) if kind == StrategyKind::Playing => {
                let (strategy, report) = PlayingStrategy::from_table(&table);
                for (hand, upcard) in &report.unknown {
                    log::warn!("'{name}': ignoring unknown cell {hand}/{upcard}");
                }
                for (hand, upcard, symbol) in &report.invalid {
                    log::warn!("'{name}': ignoring illegal action '{symbol}' at {hand}/{upcard}");
                }
                self.warn_discarded(session, kind);
                session.replace_playing(strategy, name);
            }
            WireContent::Betting(msg) if kind == StrategyKind::Betting => {
                let strategy = BettingStrategy::from_wire(&to_betting_wire(&msg))?;
                self.warn_discarded(session, kind);
                session.replace_betting(strategy, name);
            }
            other => {
                return Err(LibraryError::Rejected(format!(
                    "expected {kind} content, received {}",
                    other.kind()
                ))
                .into())
            }
        }

        Ok(Feedback::new(kind, format!("Loaded {kind} strategy '{name}'.")))
    }

    fn warn_discarded(&self, session: &EditorSession, kind: StrategyKind) {
        let pane = session.pane(kind);
        if pane.unsaved {
            log::warn!(
                "Discarding unsaved {kind} edits to '{}'",
                pane.loaded.as_deref().unwrap_or("new strategy")
            );
        }
    }

    /// Re-fetches the selected entry and replaces the model with it. An entry
    /// that has gone missing is dropped from the listing.
    pub async fn load_selected(&self, session: &mut EditorSession, kind: StrategyKind) -> Result<Feedback, EditorError> {
        let (ticket, response) = self.start_fetch(session, kind)?;
        let result = response.await;
        let outcome = self.finish_fetch(session, ticket, result);

        if matches!(outcome, Err(EditorError::Library(LibraryError::NotFound(_)))) {
            if let Err(e) = self.refresh(session, kind).await {
                log::warn!("Could not refresh the {kind} listing: {e}");
            }
        }
        outcome
    }

    /// Stores the current model under `name`, then refreshes the listing and
    /// selects the saved entry.
    pub async fn save(
        &self,
        session: &mut EditorSession,
        kind: StrategyKind,
        name: &str,
    ) -> Result<Feedback, EditorError> {
        if name.trim().is_empty() {
            return Err(EditorError::Validation(
                "Please enter a name for the strategy.".to_string(),
            ));
        }
        let name = validate_name(name).map_err(|e| EditorError::Validation(e.to_string()))?;

        let content = match kind {
            StrategyKind::Playing => {
                if !session.playing.is_complete() {
                    return Err(EditorError::Validation(
                        "Every hand needs an action before saving.".to_string(),
                    ));
                }
                WireContent::Playing(session.playing.to_table())
            }
            StrategyKind::Betting => {
                let mut msg = to_betting_msg(&session.betting);
                msg.name = name.clone();
                WireContent::Betting(msg)
            }
        };

        let ticket = session.begin(kind, Operation::Save, &name)?;
        let result = self.client(kind).save(&name, content).await;
        session.settle(&ticket);
        let entry = result?;

        session.mark_saved(kind, &entry.name);
        if let Err(e) = self.refresh(session, kind).await {
            log::warn!("Saved '{}' but could not refresh the listing: {e}", entry.name);
        }
        session.focus(kind, Some(entry.name.clone()));

        Ok(Feedback::new(
            kind,
            format!("{} strategy '{}' saved successfully.", kind.title(), entry.name),
        ))
    }

    /// Deletes the selected custom entry once `confirm` approves it.
    pub async fn delete(
        &self,
        session: &mut EditorSession,
        kind: StrategyKind,
        confirm: impl FnOnce(&LibraryEntry) -> bool,
    ) -> Result<Feedback, EditorError> {
        let entry = session
            .pane(kind)
            .selected_entry()
            .filter(|entry| entry.is_custom)
            .cloned()
            .ok_or_else(|| {
                EditorError::Validation("Please select a custom strategy to delete.".to_string())
            })?;

        if !confirm(&entry) {
            return Ok(Feedback::new(kind, format!("Delete of '{}' cancelled.", entry.name)));
        }

        let ticket = session.begin(kind, Operation::Delete, &entry.name)?;
        let result = self.client(kind).delete(&entry.name).await;
        session.settle(&ticket);
        result?;

        session.mark_deleted(kind, &entry.name);
        if let Err(e) = self.refresh(session, kind).await {
            log::warn!("Deleted '{}' but could not refresh the listing: {e}", entry.name);
        }

        Ok(Feedback::new(
            kind,
            format!("{} strategy '{}' deleted successfully.", kind.title(), entry.name),
        ))
    }
}
