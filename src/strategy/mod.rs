//! Betting systems — the staking policies a player follows.
//!
//! Each system is a small policy object owned by exactly one player. It
//! is asked for the next stake once per round, given the player's
//! current bankroll, and may carry its own history between calls.

pub mod martingale;
pub mod oscars_grind;
pub mod single;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{Bet, BettingError, PlayerProps};
use martingale::MartingaleStrategy;
use oscars_grind::OscarsGrindStrategy;
use single::SingleBetStrategy;

/// Abstraction over staking policies.
///
/// `next_bet` must return a non-negative stake no larger than
/// `current_bankroll`. The [`Player`](crate::player::Player) treats any
/// other answer as a fatal contract violation; clamping is the system's
/// own job.
#[cfg_attr(test, mockall::automock)]
pub trait BettingSystem {
    /// Display label.
    fn name(&self) -> &'static str;

    /// Stake for the coming round.
    fn next_bet(&mut self, current_bankroll: Decimal) -> Bet;
}

/// Clamp a policy stake to what the player can actually cover.
pub(crate) fn clamp_to_bankroll(stake: Decimal, current_bankroll: Decimal) -> Decimal {
    if stake > current_bankroll {
        current_bankroll
    } else {
        stake
    }
}

// ---------------------------------------------------------------------------
// Strategy selection
// ---------------------------------------------------------------------------

/// Configurable betting system. One fresh instance is built per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[serde(alias = "single")]
    SingleBet,
    Martingale,
    #[serde(alias = "oscar", alias = "oscars")]
    OscarsGrind,
}

impl StrategyKind {
    /// All known systems, in cohort order.
    pub const ALL: &'static [StrategyKind] = &[
        StrategyKind::SingleBet,
        StrategyKind::Martingale,
        StrategyKind::OscarsGrind,
    ];

    /// Build a new, exclusively owned instance for one player.
    pub fn build(&self, props: PlayerProps) -> Box<dyn BettingSystem> {
        match self {
            StrategyKind::SingleBet => Box::new(SingleBetStrategy::new(props)),
            StrategyKind::Martingale => Box::new(MartingaleStrategy::new(props)),
            StrategyKind::OscarsGrind => Box::new(OscarsGrindStrategy::new(props)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::SingleBet => write!(f, "{}", single::NAME),
            StrategyKind::Martingale => write!(f, "{}", martingale::NAME),
            StrategyKind::OscarsGrind => write!(f, "{}", oscars_grind::NAME),
        }
    }
}

/// Parse a system name (case-insensitive, a few spellings accepted).
impl FromStr for StrategyKind {
    type Err = BettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "single-bet" | "single" => Ok(StrategyKind::SingleBet),
            "martingale" => Ok(StrategyKind::Martingale),
            "oscars-grind" | "oscar's-grind" | "oscars" | "oscar" => Ok(StrategyKind::OscarsGrind),
            _ => Err(BettingError::UnknownStrategy(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
