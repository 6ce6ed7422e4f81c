use std::io::Write as _;

use clap::Parser;
use strategy_library::msg::{InstantiateMsg, StrategyKind};
use strategy_studio::config::StudioArgs;
use strategy_studio::repl::{parse_line, run_command, Command};
use strategy_studio::{ContractLibrary, EditorController, EditorSession, LocalChain};
use tokio::io::{AsyncBufReadExt, BufReader};

fn prompt() {
    print!("studio> ");
    std::io::stdout().flush().ok();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    let args = StudioArgs::parse();

    let chain = if args.ephemeral {
        LocalChain::boot(&InstantiateMsg::with_defaults())
    } else {
        LocalChain::open(&args.snapshot)
    };
    let chain = match chain {
        Ok(chain) => chain,
        Err(e) => {
            log::error!("Cannot start the strategy library: {e}");
            std::process::exit(1);
        }
    };

    let controller = EditorController::new(
        ContractLibrary::new(chain.clone(), StrategyKind::Playing),
        ContractLibrary::new(chain, StrategyKind::Betting),
    )
    .with_defaults(args.default_playing, args.default_betting);
    let mut session = EditorSession::new();

    if let Err(e) = controller.initialize(&mut session).await {
        log::warn!("Start-up load incomplete: {e}");
    }

    println!("Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            prompt();
            continue;
        }
        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                prompt();
                continue;
            }
        };

        let confirmed = match &command {
            Command::Quit => break,
            Command::Delete { kind, yes } => {
                let kind = StrategyKind::from(*kind);
                match session.pane(kind).selected_entry() {
                    Some(entry) if entry.is_custom && !*yes => {
                        print!("Delete {kind} strategy '{}'? [y/N] ", entry.name);
                        std::io::stdout().flush().ok();
                        matches!(
                            lines.next_line().await,
                            Ok(Some(answer)) if answer.trim().eq_ignore_ascii_case("y")
                        )
                    }
                    _ => *yes,
                }
            }
            _ => false,
        };

        match run_command(&controller, &mut session, command, |_| confirmed).await {
            Ok(output) => println!("{}", output.trim_end()),
            Err(e) => println!("Error: {e}"),
        }
        prompt();
    }
}
