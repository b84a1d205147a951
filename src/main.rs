//! ODDSYSSEE — betting system simulator
//!
//! Entry point. Loads configuration, applies command-line overrides,
//! initialises structured logging, then plays the configured number of
//! independent sessions and prints a per-system summary.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use tracing::info;

use oddsyssee::config::{self, OutcomeMode};
use oddsyssee::engine::events::{JsonLinesSink, TracingSink};
use oddsyssee::engine::Simulator;
use oddsyssee::strategy::StrategyKind;

/// Simulate betting systems against a binary-outcome game.
#[derive(Debug, Parser)]
#[command(name = "oddsyssee", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Number of independent runs.
    #[arg(short, long)]
    runs: Option<usize>,

    /// Seed for the random outcome source.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop a run after this many rounds.
    #[arg(long)]
    max_rounds: Option<u64>,

    /// Betting systems to play, comma separated.
    #[arg(long, value_delimiter = ',')]
    strategies: Option<Vec<StrategyKind>>,

    /// Write every round as a JSON line to stdout.
    #[arg(long)]
    events: bool,

    /// Print the final summary as JSON.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply(&self, cfg: &mut config::AppConfig) {
        if let Some(runs) = self.runs {
            cfg.simulation.runs = runs;
        }
        if let Some(seed) = self.seed {
            cfg.game.seed = Some(seed);
        }
        if let Some(max_rounds) = self.max_rounds {
            cfg.simulation.max_rounds = Some(max_rounds);
        }
        if let Some(strategies) = &self.strategies {
            cfg.player.strategies = strategies.clone();
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    init_logging();

    let mut cfg = config::AppConfig::load_or_default(&cli.config)?;
    cli.apply(&mut cfg);

    let plan = cfg.plan().context("Invalid simulation configuration")?;
    let mut source = cfg.outcome_source().context("Invalid game configuration")?;

    if !cli.events && !cli.json {
        print_properties(&cfg);
    }
    info!(
        runs = plan.runs,
        strategies = plan.strategies.len(),
        bankroll = %plan.props.bankroll(),
        win_target = %plan.props.win_target(),
        "Starting simulation"
    );

    let simulator = Simulator::new(plan);
    let summary = if cli.events {
        let mut sink = JsonLinesSink::new(io::stdout().lock());
        let summary = simulator.run_all(&mut source, &mut sink);
        let stdout = sink.finish().context("Failed to write events")?;
        drop(stdout);
        summary
    } else {
        simulator.run_all(&mut source, &mut TracingSink)
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.events {
        println!("\n{summary}");
    }

    Ok(())
}

/// Print the game, player and simulation properties.
fn print_properties(cfg: &config::AppConfig) {
    let outcomes = match cfg.game.outcomes {
        OutcomeMode::Random => format!(
            "random, {:.2}% to win one round{}",
            cfg.game.win_probability * 100.0,
            cfg.game.seed.map(|s| format!(" (seed {s})")).unwrap_or_default()
        ),
        OutcomeMode::AlwaysWin => "always win".to_string(),
        OutcomeMode::AlwaysLose => "always lose".to_string(),
        OutcomeMode::Alternating => format!("alternating, starting with {}", cfg.game.first_outcome),
    };
    let strategies: Vec<_> = cfg.player.strategies.iter().map(ToString::to_string).collect();

    println!(
        "Game properties:\n\
         \x20 Outcomes: {outcomes}\n\
         \x20 Payout multiplier: {}\n\
         Player properties:\n\
         \x20 Bankroll: €{:.2}\n\
         \x20 Win target: €{:.2}\n\
         \x20 Betting systems: {}\n\
         Simulation properties:\n\
         \x20 Runs: {}\n\
         \x20 Round cap: {}",
        cfg.game.payout_multiplier,
        cfg.player.bankroll,
        cfg.player.win_target,
        strategies.join(", "),
        cfg.simulation.runs,
        cfg.simulation
            .max_rounds
            .map(|n| n.to_string())
            .unwrap_or_else(|| "none".to_string()),
    );
}

/// Initialise the `tracing` subscriber.
///
/// Logs go to stderr so stdout stays clean for `--events` / `--json`.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("oddsyssee=info"));

    let json_logging = std::env::var("ODDSYSSEE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(io::stderr)
            .init();
    }
}
