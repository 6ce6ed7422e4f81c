use std::collections::HashSet;
use std::fmt;

use blackjack_strategy::{BettingStrategy, PlayingStrategy};
use strategy_library::msg::{LibraryEntry, StrategyKind};

use crate::error::EditorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Fetch,
    Save,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Fetch => "load",
            Operation::Save => "save",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Issued when a library request starts. `generation` is the pane generation
/// at that moment; the response only applies while it is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub kind: StrategyKind,
    pub op: Operation,
    pub generation: u64,
    /// Entry the request concerns, empty for listings
    pub name: String,
}

/// Library listing and selection state for one strategy kind.
#[derive(Debug, Clone, Default)]
pub struct LibraryPane {
    pub entries: Vec<LibraryEntry>,
    pub selected: Option<String>,
    /// Entry the model was last loaded from or saved to
    pub loaded: Option<String>,
    /// Suggested name for the next save
    pub draft_name: String,
    pub unsaved: bool,
    generation: u64,
    in_flight: HashSet<Operation>,
}

impl LibraryPane {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn entry(&self, name: &str) -> Option<&LibraryEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn selected_entry(&self) -> Option<&LibraryEntry> {
        self.selected.as_deref().and_then(|name| self.entry(name))
    }

    pub fn is_in_flight(&self, op: Operation) -> bool {
        self.in_flight.contains(&op)
    }

    fn bump(&mut self) {
        self.generation += 1;
    }
}

/// Everything one editing session owns: both models and a pane per kind.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    pub playing: PlayingStrategy,
    pub betting: BettingStrategy,
    playing_pane: LibraryPane,
    betting_pane: LibraryPane,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pane(&self, kind: StrategyKind) -> &LibraryPane {
        match kind {
            StrategyKind::Playing => &self.playing_pane,
            StrategyKind::Betting => &self.betting_pane,
        }
    }

    fn pane_mut(&mut self, kind: StrategyKind) -> &mut LibraryPane {
        match kind {
            StrategyKind::Playing => &mut self.playing_pane,
            StrategyKind::Betting => &mut self.betting_pane,
        }
    }

    /// Points the pane at a listed entry. Responses to requests issued
    /// before the change become stale.
    pub fn select(&mut self, kind: StrategyKind, name: &str) -> Result<(), EditorError> {
        if self.pane(kind).entry(name).is_none() {
            return Err(EditorError::Validation(format!(
                "No {kind} strategy named '{name}' in the library."
            )));
        }
        self.focus(kind, Some(name.to_string()));
        Ok(())
    }

    pub(crate) fn focus(&mut self, kind: StrategyKind, name: Option<String>) {
        let pane = self.pane_mut(kind);
        if pane.selected != name {
            pane.selected = name;
            pane.bump();
        }
    }

    /// Selection goes back to whatever the model was loaded from.
    pub(crate) fn revert_selection(&mut self, kind: StrategyKind) {
        let loaded = self.pane(kind).loaded.clone();
        self.focus(kind, loaded);
    }

    pub fn begin(&mut self, kind: StrategyKind, op: Operation, name: &str) -> Result<Ticket, EditorError> {
        let pane = self.pane_mut(kind);
        if !pane.in_flight.insert(op) {
            return Err(EditorError::Busy { kind, op });
        }
        let ticket = Ticket {
            kind,
            op,
            generation: pane.generation,
            name: name.to_string(),
        };
        log::debug!("{kind} {op} '{name}' started at generation {}", ticket.generation);
        Ok(ticket)
    }

    /// Closes the request and reports whether its result may still be applied.
    pub fn settle(&mut self, ticket: &Ticket) -> bool {
        let pane = self.pane_mut(ticket.kind);
        pane.in_flight.remove(&ticket.op);
        pane.generation == ticket.generation
    }

    pub(crate) fn set_entries(&mut self, kind: StrategyKind, entries: Vec<LibraryEntry>) {
        let pane = self.pane_mut(kind);
        pane.entries = entries;
        let still_listed = pane
            .selected
            .as_deref()
            .is_some_and(|name| pane.entries.iter().any(|entry| entry.name == name));
        if !still_listed {
            let fallback = pane
                .loaded
                .clone()
                .filter(|name| pane.entries.iter().any(|entry| &entry.name == name));
            self.focus(kind, fallback);
        }
    }

    pub(crate) fn replace_playing(&mut self, strategy: PlayingStrategy, name: &str) {
        self.playing = strategy;
        self.mark_loaded(StrategyKind::Playing, name);
    }

    pub(crate) fn replace_betting(&mut self, mut strategy: BettingStrategy, name: &str) {
        strategy.name = name.to_string();
        self.betting = strategy;
        self.mark_loaded(StrategyKind::Betting, name);
    }

    fn mark_loaded(&mut self, kind: StrategyKind, name: &str) {
        let pane = self.pane_mut(kind);
        pane.selected = Some(name.to_string());
        pane.loaded = Some(name.to_string());
        pane.draft_name = format!("{name}_v2");
        pane.unsaved = false;
        pane.bump();
    }

    pub(crate) fn mark_saved(&mut self, kind: StrategyKind, name: &str) {
        if kind == StrategyKind::Betting {
            self.betting.name = name.to_string();
        }
        let pane = self.pane_mut(kind);
        pane.loaded = Some(name.to_string());
        pane.unsaved = false;
    }

    /// The model outlives its deleted library entry, so it counts as unsaved.
    pub(crate) fn mark_deleted(&mut self, kind: StrategyKind, name: &str) {
        let pane = self.pane_mut(kind);
        pane.entries.retain(|entry| entry.name != name);
        if pane.loaded.as_deref() == Some(name) {
            pane.loaded = None;
            pane.unsaved = true;
        }
        if pane.selected.as_deref() == Some(name) {
            self.focus(kind, None);
        }
    }

    pub fn set_cell(&mut self, hand: &str, upcard: &str, action: &str) -> Result<(), EditorError> {
        self.playing.set(hand, upcard, action)?;
        self.playing_pane.unsaved = true;
        Ok(())
    }

    pub fn add_rule(&mut self, op: &str, threshold: i32, bet_units: i64) -> Result<(), EditorError> {
        self.betting.add_rule(op, threshold, bet_units)?;
        self.betting_pane.unsaved = true;
        Ok(())
    }

    pub fn remove_rule(&mut self, index: usize) -> Result<(), EditorError> {
        self.betting.remove_rule(index)?;
        self.betting_pane.unsaved = true;
        Ok(())
    }

    pub fn move_rule(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        self.betting.move_rule(from, to)?;
        self.betting_pane.unsaved = true;
        Ok(())
    }

    pub fn describe(&mut self, description: &str) {
        self.betting.description = description.to_string();
        self.betting_pane.unsaved = true;
    }
}
