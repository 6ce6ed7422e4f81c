//! Line-oriented command front end for the editor.

use std::fmt::Write as _;

use blackjack_strategy::{BettingStrategy, HandCategory, PlayingStrategy, UpCard};
use clap::{Parser, Subcommand, ValueEnum};
use strategy_library::msg::{LibraryEntry, StrategyKind};

use crate::client::LibraryClient;
use crate::controller::EditorController;
use crate::error::EditorError;
use crate::session::{EditorSession, LibraryPane};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Playing,
    Betting,
}

impl From<KindArg> for StrategyKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Playing => StrategyKind::Playing,
            KindArg::Betting => StrategyKind::Betting,
        }
    }
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the library entries of one kind
    List { kind: KindArg },
    /// Pick a library entry to load or delete
    Select {
        kind: KindArg,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        name: Vec<String>,
    },
    /// Replace the model with the selected entry
    Load { kind: KindArg },
    /// Print the current model
    Show { kind: KindArg },
    /// Set one playing cell, e.g. `set 16 T Sr`
    Set {
        hand: String,
        upcard: String,
        action: String,
    },
    /// Append a betting rule, e.g. `add-rule >= 2 4`
    AddRule {
        op: String,
        #[arg(allow_negative_numbers = true)]
        threshold: i32,
        #[arg(allow_negative_numbers = true)]
        units: i64,
    },
    /// Remove a betting rule by its 1-based position
    RemoveRule { position: usize },
    /// Move a betting rule between 1-based positions
    MoveRule { from: usize, to: usize },
    /// Set the betting strategy description
    Describe {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Bet the current betting strategy places at a true count
    Eval {
        #[arg(allow_negative_numbers = true)]
        count: i32,
    },
    /// Save the model; defaults to the suggested draft name
    Save {
        kind: KindArg,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        name: Vec<String>,
    },
    /// Delete the selected custom entry
    Delete {
        kind: KindArg,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    Quit,
}

/// Words are split on whitespace, so a multi-word name is rejoined with
/// single spaces.
pub fn parse_line(line: &str) -> Result<Command, clap::Error> {
    Line::try_parse_from(line.split_whitespace()).map(|line| line.command)
}

fn position(position: usize) -> Result<usize, EditorError> {
    position
        .checked_sub(1)
        .ok_or_else(|| EditorError::Validation("Rule positions start at 1.".to_string()))
}

/// Runs one command and returns the text to show. `Quit` is handled by the
/// caller.
pub async fn run_command<C: LibraryClient>(
    controller: &EditorController<C>,
    session: &mut EditorSession,
    command: Command,
    confirm: impl FnOnce(&LibraryEntry) -> bool,
) -> Result<String, EditorError> {
    let output = match command {
        Command::List { kind } => {
            let kind = kind.into();
            controller.refresh(session, kind).await?;
            render_pane(session.pane(kind))
        }
        Command::Select { kind, name } => {
            let name = name.join(" ");
            session.select(kind.into(), &name)?;
            format!("Selected '{name}'.")
        }
        Command::Load { kind } => controller.load_selected(session, kind.into()).await?.message,
        Command::Show { kind: KindArg::Playing } => render_playing(&session.playing),
        Command::Show { kind: KindArg::Betting } => render_betting(&session.betting),
        Command::Set { hand, upcard, action } => {
            session.set_cell(&hand, &upcard, &action)?;
            format!("{hand} vs {upcard}: {action}")
        }
        Command::AddRule { op, threshold, units } => {
            session.add_rule(&op, threshold, units)?;
            render_betting(&session.betting)
        }
        Command::RemoveRule { position: at } => {
            session.remove_rule(position(at)?)?;
            render_betting(&session.betting)
        }
        Command::MoveRule { from, to } => {
            session.move_rule(position(from)?, position(to)?)?;
            render_betting(&session.betting)
        }
        Command::Describe { text } => {
            session.describe(&text.join(" "));
            "Description updated.".to_string()
        }
        Command::Eval { count } => {
            format!("True count {count}: bet {} units", session.betting.evaluate(count))
        }
        Command::Save { kind, name } => {
            let kind = kind.into();
            let name = if name.is_empty() {
                session.pane(kind).draft_name.clone()
            } else {
                name.join(" ")
            };
            controller.save(session, kind, &name).await?.message
        }
        Command::Delete { kind, .. } => controller.delete(session, kind.into(), confirm).await?.message,
        Command::Quit => String::new(),
    };
    Ok(output)
}

pub fn render_pane(pane: &LibraryPane) -> String {
    let mut out = String::new();
    for entry in &pane.entries {
        let marker = if pane.selected.as_deref() == Some(entry.name.as_str()) { '>' } else { ' ' };
        let origin = if entry.is_custom { "custom" } else { "built-in" };
        let _ = writeln!(out, "{marker} {:<32} {origin}", entry.name);
    }
    if pane.entries.is_empty() {
        out.push_str("(no strategies)\n");
    }
    if pane.unsaved {
        out.push_str("* model has unsaved edits\n");
    }
    out
}

pub fn render_playing(strategy: &PlayingStrategy) -> String {
    let mut out = String::new();
    for category in HandCategory::ALL {
        let _ = writeln!(out, "{}", category.title());
        let _ = write!(out, "{:>4}", "");
        for upcard in UpCard::ALL {
            let _ = write!(out, "{:>3}", upcard.symbol());
        }
        out.push('\n');
        for hand in category.hands() {
            let _ = write!(out, "{:>4}", hand.label());
            for action in strategy.row(hand) {
                let _ = write!(out, "{:>3}", action.symbol());
            }
            out.push('\n');
        }
    }
    out
}

pub fn render_betting(strategy: &BettingStrategy) -> String {
    let mut out = String::new();
    let title = if strategy.name.is_empty() { "(unnamed)" } else { strategy.name.as_str() };
    let _ = writeln!(out, "{title}");
    if !strategy.description.is_empty() {
        let _ = writeln!(out, "  {}", strategy.description);
    }
    for (i, rule) in strategy.rules().iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {rule}", i + 1);
    }
    let _ = writeln!(out, "  otherwise bet {} unit", blackjack_strategy::DEFAULT_BET_UNITS);
    out
}

#[cfg(test)]
mod tests {
    use strategy_library::msg::InstantiateMsg;

    use super::*;
    use crate::{ContractLibrary, LocalChain};

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line("set 16 T Sr").unwrap(),
            Command::Set {
                hand: "16".to_string(),
                upcard: "T".to_string(),
                action: "Sr".to_string()
            }
        );
        assert_eq!(
            parse_line("add-rule <= -1 1").unwrap(),
            Command::AddRule {
                op: "<=".to_string(),
                threshold: -1,
                units: 1
            }
        );
        assert_eq!(
            parse_line("save betting").unwrap(),
            Command::Save {
                kind: KindArg::Betting,
                name: vec![]
            }
        );
        assert_eq!(
            parse_line("save playing  aggressive   v2").unwrap(),
            Command::Save {
                kind: KindArg::Playing,
                name: vec!["aggressive".to_string(), "v2".to_string()]
            }
        );
        assert_eq!(
            parse_line("select betting hi lo").unwrap(),
            Command::Select {
                kind: KindArg::Betting,
                name: vec!["hi".to_string(), "lo".to_string()]
            }
        );
        assert_eq!(
            parse_line("delete playing --yes").unwrap(),
            Command::Delete {
                kind: KindArg::Playing,
                yes: true
            }
        );
        assert_eq!(
            parse_line("describe ramp after -1").unwrap(),
            Command::Describe {
                text: vec!["ramp".to_string(), "after".to_string(), "-1".to_string()]
            }
        );
        assert_eq!(parse_line("eval -3").unwrap(), Command::Eval { count: -3 });
        assert_eq!(parse_line("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(parse_line("list tables").is_err());
        assert!(parse_line("fly").is_err());
        assert!(parse_line("select playing").is_err());
    }

    #[test]
    fn test_render_playing_grid() {
        let text = render_playing(&blackjack_strategy::basic_strategy());
        assert!(text.starts_with("Hard Totals\n"));
        assert!(text.contains("  16  S  S  S  S  S  H  H Sr Sr Sr"));
        assert!(text.contains("  AA  P  P  P  P  P  P  P  P  P  P"));
    }

    #[test]
    fn test_render_betting() {
        let text = render_betting(&blackjack_strategy::hi_lo_spread());
        assert!(text.contains("  1. if true count >= 5 bet 8 units"));
        assert!(text.ends_with("otherwise bet 1 unit\n"));
    }

    #[tokio::test]
    async fn test_multi_word_name_is_saved_and_selected() {
        let chain = LocalChain::boot(&InstantiateMsg::with_defaults()).unwrap();
        let controller = EditorController::new(
            ContractLibrary::new(chain.clone(), StrategyKind::Playing),
            ContractLibrary::new(chain, StrategyKind::Betting),
        );
        let mut session = EditorSession::new();
        controller.initialize(&mut session).await.unwrap();

        let run = |line: &str| parse_line(line).unwrap();
        let output = run_command(&controller, &mut session, run("save playing aggressive v2"), |_| false)
            .await
            .unwrap();
        assert_eq!(output, "Playing strategy 'aggressive v2' saved successfully.");

        let output = run_command(&controller, &mut session, run("select playing aggressive v2"), |_| false)
            .await
            .unwrap();
        assert_eq!(output, "Selected 'aggressive v2'.");
        assert!(session.pane(StrategyKind::Playing).entry("aggressive v2").unwrap().is_custom);
    }
}
