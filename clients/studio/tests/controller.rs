//! Controller behaviour against an in-memory library that records every call.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use blackjack_strategy::{basic_strategy, flat_bet, Action, PlayingStrategy};
use strategy_library::msg::{LibraryEntry, PlayingTable, StrategyKind};
use strategy_library::strategy_logic::to_betting_msg;
use strategy_studio::{
    EditorController, EditorError, EditorSession, LibraryClient, LibraryError, Operation,
    WireContent,
};

#[derive(Default)]
struct Store {
    entries: BTreeMap<String, (bool, WireContent)>,
    calls: Vec<String>,
    offline: bool,
}

#[derive(Clone)]
struct RecordingLibrary {
    kind: StrategyKind,
    store: Rc<RefCell<Store>>,
}

impl RecordingLibrary {
    fn new(kind: StrategyKind) -> Self {
        Self {
            kind,
            store: Rc::new(RefCell::new(Store::default())),
        }
    }

    fn with_builtin(self, name: &str, content: WireContent) -> Self {
        self.store
            .borrow_mut()
            .entries
            .insert(name.to_string(), (false, content));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.store.borrow().calls.clone()
    }

    fn set_offline(&self, offline: bool) {
        self.store.borrow_mut().offline = offline;
    }

    /// Records the call and fails it when the library is offline.
    fn record(&self, call: String) -> Result<(), LibraryError> {
        let mut store = self.store.borrow_mut();
        store.calls.push(call);
        if store.offline {
            return Err(LibraryError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

impl LibraryClient for RecordingLibrary {
    async fn list(&self) -> Result<Vec<LibraryEntry>, LibraryError> {
        self.record("list".to_string())?;
        Ok(self
            .store
            .borrow()
            .entries
            .iter()
            .map(|(name, (is_custom, _))| LibraryEntry {
                name: name.clone(),
                is_custom: *is_custom,
                kind: self.kind,
            })
            .collect())
    }

    async fn fetch(&self, name: &str) -> Result<WireContent, LibraryError> {
        self.record(format!("fetch {name}"))?;
        self.store
            .borrow()
            .entries
            .get(name)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| LibraryError::NotFound(format!("{name} not found")))
    }

    async fn save(&self, name: &str, content: WireContent) -> Result<LibraryEntry, LibraryError> {
        self.record(format!("save {name}"))?;
        let mut store = self.store.borrow_mut();
        if matches!(store.entries.get(name), Some((false, _))) {
            return Err(LibraryError::ImmutableEntry(format!("{name} is built-in")));
        }
        store.entries.insert(name.to_string(), (true, content));
        Ok(LibraryEntry {
            name: name.to_string(),
            is_custom: true,
            kind: self.kind,
        })
    }

    async fn delete(&self, name: &str) -> Result<(), LibraryError> {
        self.record(format!("delete {name}"))?;
        let mut store = self.store.borrow_mut();
        match store.entries.get(name) {
            Some((false, _)) => Err(LibraryError::ImmutableEntry(format!("{name} is built-in"))),
            Some((true, _)) => {
                store.entries.remove(name);
                Ok(())
            }
            None => Err(LibraryError::NotFound(format!("{name} not found"))),
        }
    }
}

fn all_stand() -> PlayingTable {
    PlayingStrategy::filled(Action::Stand).to_table()
}

struct Harness {
    playing: RecordingLibrary,
    betting: RecordingLibrary,
    controller: EditorController<RecordingLibrary>,
}

fn harness() -> Harness {
    let playing = RecordingLibrary::new(StrategyKind::Playing)
        .with_builtin("basic", WireContent::Playing(basic_strategy().to_table()))
        .with_builtin("stand_all", WireContent::Playing(all_stand()));
    let betting = RecordingLibrary::new(StrategyKind::Betting)
        .with_builtin("flat", WireContent::Betting(to_betting_msg(&flat_bet())));
    let controller =
        EditorController::new(playing.clone(), betting.clone()).with_defaults("basic", "flat");
    Harness {
        playing,
        betting,
        controller,
    }
}

async fn started() -> (Harness, EditorSession) {
    let h = harness();
    let mut session = EditorSession::new();
    h.controller.initialize(&mut session).await.unwrap();
    (h, session)
}

#[tokio::test]
async fn test_initialize_loads_defaults() {
    let (h, session) = started().await;

    assert_eq!(session.playing, basic_strategy());
    assert_eq!(session.betting.name, "flat");

    let pane = session.pane(StrategyKind::Playing);
    assert_eq!(pane.entries.len(), 2);
    assert_eq!(pane.selected.as_deref(), Some("basic"));
    assert_eq!(pane.draft_name, "basic_v2");
    assert!(!pane.unsaved);

    assert_eq!(h.playing.calls(), vec!["list", "fetch basic"]);
    assert_eq!(h.betting.calls(), vec!["list", "fetch flat"]);
}

#[tokio::test]
async fn test_initialize_falls_back_to_first_entry() {
    let h = harness();
    let controller = EditorController::new(h.playing.clone(), h.betting.clone())
        .with_defaults("gone", "flat");
    let mut session = EditorSession::new();

    controller.initialize(&mut session).await.unwrap();

    assert_eq!(session.pane(StrategyKind::Playing).loaded.as_deref(), Some("basic"));
}

#[tokio::test]
async fn test_save_with_empty_name_makes_no_call() {
    let (h, mut session) = started().await;
    let before = h.playing.calls().len();

    for name in ["", "   "] {
        let err = h
            .controller
            .save(&mut session, StrategyKind::Playing, name)
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::Validation(_)));
    }
    let err = h
        .controller
        .save(&mut session, StrategyKind::Playing, "../escape")
        .await
        .unwrap_err();
    assert!(matches!(err, EditorError::Validation(_)));

    assert_eq!(h.playing.calls().len(), before);
}

#[tokio::test]
async fn test_save_creates_and_selects_custom_entry() {
    let (h, mut session) = started().await;
    session.set_cell("16", "T", "S").unwrap();

    let draft = session.pane(StrategyKind::Playing).draft_name.clone();
    let feedback = h
        .controller
        .save(&mut session, StrategyKind::Playing, &draft)
        .await
        .unwrap();

    assert_eq!(feedback.message, "Playing strategy 'basic_v2' saved successfully.");
    let pane = session.pane(StrategyKind::Playing);
    assert_eq!(pane.selected.as_deref(), Some("basic_v2"));
    assert_eq!(pane.loaded.as_deref(), Some("basic_v2"));
    assert!(!pane.unsaved);
    assert!(pane.entry("basic_v2").unwrap().is_custom);
    assert_eq!(pane.entries.len(), 3);

    let calls = h.playing.calls();
    assert_eq!(&calls[calls.len() - 2..], ["save basic_v2", "list"]);
}

#[tokio::test]
async fn test_save_over_builtin_keeps_model() {
    let (h, mut session) = started().await;
    session.set_cell("12", "2", "S").unwrap();
    let edited = session.playing.clone();

    let err = h
        .controller
        .save(&mut session, StrategyKind::Playing, "stand_all")
        .await
        .unwrap_err();

    assert!(matches!(err, EditorError::Library(LibraryError::ImmutableEntry(_))));
    assert_eq!(session.playing, edited);
    assert!(session.pane(StrategyKind::Playing).unsaved);
    assert_eq!(h.playing.calls().last().unwrap(), "save stand_all");
}

#[tokio::test]
async fn test_betting_save_uses_given_name() {
    let (h, mut session) = started().await;
    session.add_rule(">=", 2, 4).unwrap();

    h.controller
        .save(&mut session, StrategyKind::Betting, "ramp.json")
        .await
        .unwrap();

    assert_eq!(session.betting.name, "ramp");
    let store = h.betting.store.borrow();
    let Some((true, WireContent::Betting(msg))) = store.entries.get("ramp") else {
        panic!("ramp not stored as custom betting strategy");
    };
    assert_eq!(msg.name, "ramp");
    assert_eq!(msg.rules[0].condition, "true_count >= 2");
}

#[tokio::test]
async fn test_second_fetch_is_busy() {
    let (h, mut session) = started().await;

    let (ticket, response) = h
        .controller
        .start_fetch(&mut session, StrategyKind::Playing)
        .unwrap();
    let busy = h.controller.start_fetch(&mut session, StrategyKind::Playing);
    assert!(matches!(
        busy,
        Err(EditorError::Busy {
            kind: StrategyKind::Playing,
            op: Operation::Fetch
        })
    ));

    let result = response.await;
    h.controller.finish_fetch(&mut session, ticket, result).unwrap();
    assert!(h.controller.start_fetch(&mut session, StrategyKind::Playing).is_ok());
}

#[tokio::test]
async fn test_stale_response_is_ignored() {
    let (h, mut session) = started().await;
    session.select(StrategyKind::Playing, "stand_all").unwrap();

    let (ticket, response) = h
        .controller
        .start_fetch(&mut session, StrategyKind::Playing)
        .unwrap();
    // user moves on before the response arrives
    session.select(StrategyKind::Playing, "basic").unwrap();

    let result = response.await;
    let err = h.controller.finish_fetch(&mut session, ticket, result).unwrap_err();

    assert_eq!(err, EditorError::Stale { kind: StrategyKind::Playing });
    assert_eq!(session.playing, basic_strategy());
    assert_eq!(session.pane(StrategyKind::Playing).loaded.as_deref(), Some("basic"));
}

#[tokio::test]
async fn test_missing_entry_reverts_selection() {
    let (h, mut session) = started().await;
    session.select(StrategyKind::Playing, "stand_all").unwrap();
    h.playing.store.borrow_mut().entries.remove("stand_all");

    let err = h
        .controller
        .load_selected(&mut session, StrategyKind::Playing)
        .await
        .unwrap_err();

    assert!(matches!(err, EditorError::Library(LibraryError::NotFound(_))));
    assert_eq!(session.playing, basic_strategy());
    let pane = session.pane(StrategyKind::Playing);
    assert_eq!(pane.selected.as_deref(), Some("basic"));
    assert!(pane.entry("stand_all").is_none());
    assert_eq!(h.playing.calls().last().unwrap(), "list");
    assert!(session.select(StrategyKind::Playing, "stand_all").is_err());
}

#[tokio::test]
async fn test_load_replaces_unsaved_edits() {
    let (h, mut session) = started().await;
    session.set_cell("20", "A", "H").unwrap();
    session.select(StrategyKind::Playing, "stand_all").unwrap();

    h.controller
        .load_selected(&mut session, StrategyKind::Playing)
        .await
        .unwrap();

    assert_eq!(session.playing, PlayingStrategy::filled(Action::Stand));
    let pane = session.pane(StrategyKind::Playing);
    assert!(!pane.unsaved);
    assert_eq!(pane.draft_name, "stand_all_v2");
}

#[tokio::test]
async fn test_partial_table_loads_with_defaults() {
    let mut partial = PlayingTable::new();
    partial.insert("11".to_string(), [("6".to_string(), "D".to_string())].into());
    let playing = RecordingLibrary::new(StrategyKind::Playing)
        .with_builtin("sparse", WireContent::Playing(partial));
    let betting = RecordingLibrary::new(StrategyKind::Betting);
    let controller = EditorController::new(playing, betting).with_defaults("sparse", "none");
    let mut session = EditorSession::new();

    controller.initialize(&mut session).await.unwrap();

    assert!(session.playing.is_complete());
    assert_eq!(session.playing.get("11", "6"), Ok(Action::Double));
    assert_eq!(session.playing.get("11", "5"), Ok(Action::Hit));
}

#[tokio::test]
async fn test_delete_builtin_makes_no_call() {
    let (h, mut session) = started().await;

    let err = h
        .controller
        .delete(&mut session, StrategyKind::Playing, |_| true)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EditorError::Validation("Please select a custom strategy to delete.".to_string())
    );
    assert!(!h.playing.calls().iter().any(|c| c.starts_with("delete")));
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let (h, mut session) = started().await;
    h.controller
        .save(&mut session, StrategyKind::Playing, "mine")
        .await
        .unwrap();

    let feedback = h
        .controller
        .delete(&mut session, StrategyKind::Playing, |entry| {
            assert_eq!(entry.name, "mine");
            false
        })
        .await
        .unwrap();
    assert_eq!(feedback.message, "Delete of 'mine' cancelled.");
    assert!(session.pane(StrategyKind::Playing).entry("mine").is_some());

    h.controller
        .delete(&mut session, StrategyKind::Playing, |_| true)
        .await
        .unwrap();

    let pane = session.pane(StrategyKind::Playing);
    assert!(pane.entry("mine").is_none());
    assert_eq!(pane.selected, None);
    assert_eq!(h.playing.calls().iter().filter(|c| *c == "delete mine").count(), 1);
}

/// What an unavailable library must leave untouched.
fn pane_state(session: &EditorSession, kind: StrategyKind) -> (Vec<String>, Option<String>, Option<String>, bool) {
    let pane = session.pane(kind);
    (
        pane.entries.iter().map(|entry| entry.name.clone()).collect(),
        pane.selected.clone(),
        pane.loaded.clone(),
        pane.unsaved,
    )
}

#[tokio::test]
async fn test_unavailable_library_leaves_session_unchanged() {
    let (h, mut session) = started().await;
    session.set_cell("16", "T", "S").unwrap();
    session.select(StrategyKind::Playing, "stand_all").unwrap();
    session.add_rule(">=", 3, 4).unwrap();

    let playing = session.playing.clone();
    let betting = session.betting.clone();
    let playing_pane = pane_state(&session, StrategyKind::Playing);
    let betting_pane = pane_state(&session, StrategyKind::Betting);

    h.playing.set_offline(true);
    h.betting.set_offline(true);

    let unavailable = |err: EditorError| matches!(err, EditorError::Library(LibraryError::Unavailable(_)));
    assert!(unavailable(
        h.controller
            .refresh(&mut session, StrategyKind::Playing)
            .await
            .unwrap_err()
    ));
    assert!(unavailable(
        h.controller
            .load_selected(&mut session, StrategyKind::Playing)
            .await
            .unwrap_err()
    ));
    assert!(unavailable(
        h.controller
            .save(&mut session, StrategyKind::Playing, "mine")
            .await
            .unwrap_err()
    ));
    assert!(unavailable(
        h.controller
            .save(&mut session, StrategyKind::Betting, "ramp")
            .await
            .unwrap_err()
    ));

    assert_eq!(session.playing, playing);
    assert_eq!(session.betting, betting);
    assert_eq!(pane_state(&session, StrategyKind::Playing), playing_pane);
    assert_eq!(pane_state(&session, StrategyKind::Betting), betting_pane);

    // nothing is left in flight once the library is back
    h.playing.set_offline(false);
    h.controller
        .load_selected(&mut session, StrategyKind::Playing)
        .await
        .unwrap();
    assert_eq!(session.playing, PlayingStrategy::filled(Action::Stand));
}
