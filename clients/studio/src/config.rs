use std::path::PathBuf;

use blackjack_strategy::{DEFAULT_BETTING, DEFAULT_PLAYING};
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "strategy-studio",
    about = "Author blackjack playing and betting strategies against a local strategy library"
)]
pub struct StudioArgs {
    /// JSON file mirroring the custom library entries between sessions
    #[arg(long, env = "STUDIO_SNAPSHOT", default_value = "data/strategy_library.json")]
    pub snapshot: PathBuf,

    /// Playing strategy loaded on start-up
    #[arg(long, env = "DEFAULT_PLAYING_STRATEGY", default_value = DEFAULT_PLAYING)]
    pub default_playing: String,

    /// Betting strategy loaded on start-up
    #[arg(long, env = "DEFAULT_BETTING_STRATEGY", default_value = DEFAULT_BETTING)]
    pub default_betting: String,

    /// Keep the library in memory only
    #[arg(long, default_value_t = false)]
    pub ephemeral: bool,
}
