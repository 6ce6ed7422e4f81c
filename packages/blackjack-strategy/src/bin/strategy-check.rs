use std::path::PathBuf;

use blackjack_strategy::{
    basic_strategy, BettingStrategy, BettingWire, EngineChart, HandCategory, PlayingStrategy,
    PlayingTable, UpCard,
};
use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Flat table: hand label -> upcard -> action
    Table,
    /// Engine chart: hard_totals / soft_totals / pairs with dealer ranges
    Chart,
    /// Betting strategy with true count rules
    Betting,
}

#[derive(Parser)]
#[command(
    name = "strategy-check",
    about = "Validate a strategy file and compare it against basic strategy"
)]
struct Args {
    /// JSON file to check
    file: PathBuf,

    #[arg(long, value_enum, default_value = "table")]
    format: Format,

    /// True counts to evaluate a betting strategy at
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, default_value = "-2,0,1,2,3,4,5")]
    counts: Vec<i32>,

    /// Print the full grid after the summary
    #[arg(long, default_value_t = false)]
    grid: bool,
}

fn main() {
    let args = Args::parse();

    let raw = std::fs::read_to_string(&args.file).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {e}", args.file.display());
        std::process::exit(1);
    });

    match args.format {
        Format::Table => {
            let table: PlayingTable = parse_json(&raw);
            check_playing(&table, args.grid);
        }
        Format::Chart => {
            let chart: EngineChart = parse_json(&raw);
            check_playing(&chart.to_table(), args.grid);
        }
        Format::Betting => {
            let wire: BettingWire = parse_json(&raw);
            let strategy = BettingStrategy::from_wire(&wire).unwrap_or_else(|e| {
                eprintln!("Invalid betting strategy: {e}");
                std::process::exit(1);
            });
            println!("Strategy:  {}", strategy.name);
            if !strategy.description.is_empty() {
                println!("About:     {}", strategy.description);
            }
            for (i, rule) in strategy.rules().iter().enumerate() {
                println!("  {}. {rule}", i + 1);
            }
            for count in &args.counts {
                println!("TC {count:+3}: bet {} units", strategy.evaluate(*count));
            }
        }
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(raw: &str) -> T {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        eprintln!("Invalid JSON: {e}");
        std::process::exit(1);
    })
}

fn check_playing(table: &PlayingTable, grid: bool) {
    let missing = PlayingStrategy::missing_cells(table);
    let (strategy, report) = PlayingStrategy::from_table(table);

    println!("Cells applied:   {}", report.applied);
    println!("Cells missing:   {}", missing.len());
    for (hand, upcard) in &report.unknown {
        eprintln!("  unknown cell {hand}/{upcard}");
    }
    for (hand, upcard, symbol) in &report.invalid {
        eprintln!("  illegal action '{symbol}' at {hand}/{upcard}");
    }
    println!(
        "Differs from basic strategy in {} cells",
        strategy.diff_count(&basic_strategy())
    );

    if grid {
        for category in HandCategory::ALL {
            println!("\n{}", category.title());
            let header: Vec<&str> = UpCard::ALL.iter().map(UpCard::symbol).collect();
            println!("{:>4} {}", "", header.iter().map(|s| format!("{s:>3}")).collect::<String>());
            for hand in category.hands() {
                let row: String = strategy
                    .row(hand)
                    .iter()
                    .map(|action| format!("{:>3}", action.symbol()))
                    .collect();
                println!("{:>4} {row}", hand.label());
            }
        }
    }

    if !missing.is_empty() || !report.is_clean() {
        std::process::exit(2);
    }
}
