//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every field has a default, so a partial (or missing) file is fine.
//! Monetary values are exact decimals and may be written as TOML numbers
//! or strings.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::engine::SimulationPlan;
use crate::game::{AlternatingGame, FixedProbabilityGame, LosingGame, OutcomeSource, WinningGame};
use crate::strategy::StrategyKind;
use crate::types::{BettingError, PlayerProps, RoundResult};

/// Single-zero roulette, betting on a colour.
pub const DEFAULT_WIN_PROBABILITY: f64 = 18.0 / 37.0;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub player: PlayerConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub win_probability: f64,
    pub payout_multiplier: Decimal,
    pub outcomes: OutcomeMode,
    /// First result of the `alternating` mode.
    pub first_outcome: RoundResult,
    /// Seed for the `random` mode; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            win_probability: DEFAULT_WIN_PROBABILITY,
            payout_multiplier: dec!(2),
            outcomes: OutcomeMode::Random,
            first_outcome: RoundResult::Win,
            seed: None,
        }
    }
}

/// Which outcome source drives the rounds.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeMode {
    #[default]
    Random,
    AlwaysWin,
    AlwaysLose,
    Alternating,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlayerConfig {
    pub bankroll: Decimal,
    pub win_target: Decimal,
    pub strategies: Vec<StrategyKind>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            bankroll: dec!(1000),
            win_target: dec!(1100),
            strategies: StrategyKind::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulationConfig {
    pub runs: usize,
    pub max_rounds: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            runs: 10,
            max_rounds: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!(path, "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn player_props(&self) -> Result<PlayerProps, BettingError> {
        PlayerProps::new(self.player.bankroll, self.player.win_target)
    }

    /// Validate everything the simulator needs.
    pub fn plan(&self) -> Result<SimulationPlan, BettingError> {
        Ok(SimulationPlan::new(
            self.player_props()?,
            self.player.strategies.clone(),
            self.game.payout_multiplier,
            self.simulation.runs,
        )?
        .with_max_rounds(self.simulation.max_rounds))
    }

    /// Build the configured outcome source.
    pub fn outcome_source(&self) -> Result<Box<dyn OutcomeSource>, BettingError> {
        let source: Box<dyn OutcomeSource> = match self.game.outcomes {
            OutcomeMode::Random => match self.game.seed {
                Some(seed) => Box::new(FixedProbabilityGame::seeded(self.game.win_probability, seed)?),
                None => Box::new(FixedProbabilityGame::new(self.game.win_probability)?),
            },
            OutcomeMode::AlwaysWin => Box::new(WinningGame),
            OutcomeMode::AlwaysLose => Box::new(LosingGame),
            OutcomeMode::Alternating => Box::new(AlternatingGame::new(self.game.first_outcome)),
        };
        Ok(source)
    }
}
