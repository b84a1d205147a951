//! Shared types for the simulator.
//!
//! These types form the data model used across all modules: the
//! immutable player configuration, the short-lived bet and outcome
//! records exchanged during a round, and the domain error taxonomy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Player configuration
// ---------------------------------------------------------------------------

/// Properties of a player at the start of a gambling session.
///
/// Shared read-only by every strategy and player built from one
/// configuration. Construct through [`PlayerProps::new`], which rejects
/// non-positive bankrolls and targets that do not exceed the bankroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerProps {
    bankroll: Decimal,
    win_target: Decimal,
}

impl PlayerProps {
    pub fn new(bankroll: Decimal, win_target: Decimal) -> Result<Self, BettingError> {
        if bankroll <= Decimal::ZERO {
            return Err(BettingError::InvalidBankroll(bankroll));
        }
        if win_target <= bankroll {
            return Err(BettingError::WinTargetNotAboveBankroll {
                bankroll,
                win_target,
            });
        }
        Ok(Self {
            bankroll,
            win_target,
        })
    }

    /// Initial stake.
    pub fn bankroll(&self) -> Decimal {
        self.bankroll
    }

    /// Absolute bankroll value that ends the session as a win.
    pub fn win_target(&self) -> Decimal {
        self.win_target
    }

    /// Amount the player sets out to win: `win_target - bankroll`.
    pub fn target_winnings(&self) -> Decimal {
        self.win_target - self.bankroll
    }
}

impl fmt::Display for PlayerProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bankroll €{:.2} → target €{:.2}",
            self.bankroll, self.win_target
        )
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Stable identifier of a player within one session.
pub type PlayerId = usize;

/// Result of one shared round draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundResult {
    Win,
    Lose,
}

impl RoundResult {
    pub fn is_win(&self) -> bool {
        matches!(self, RoundResult::Win)
    }

    /// The other result.
    pub fn opposite(&self) -> Self {
        match self {
            RoundResult::Win => RoundResult::Lose,
            RoundResult::Lose => RoundResult::Win,
        }
    }
}

impl From<bool> for RoundResult {
    fn from(won: bool) -> Self {
        if won {
            RoundResult::Win
        } else {
            RoundResult::Lose
        }
    }
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundResult::Win => write!(f, "WIN"),
            RoundResult::Lose => write!(f, "LOSE"),
        }
    }
}

/// A player's session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayingCondition {
    Playing,
    Won,
    Lost,
}

impl PlayingCondition {
    /// Derive the condition from a bankroll and the player's target.
    ///
    /// Reaching the target takes precedence over ruin; with a positive
    /// target both can never hold at once.
    pub fn from_bankroll(bankroll: Decimal, win_target: Decimal) -> Self {
        if bankroll >= win_target {
            PlayingCondition::Won
        } else if bankroll <= Decimal::ZERO {
            PlayingCondition::Lost
        } else {
            PlayingCondition::Playing
        }
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self, PlayingCondition::Playing)
    }
}

impl fmt::Display for PlayingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayingCondition::Playing => write!(f, "PLAYING"),
            PlayingCondition::Won => write!(f, "WON"),
            PlayingCondition::Lost => write!(f, "LOST"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bets & outcomes
// ---------------------------------------------------------------------------

/// A stake. Immutable once placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bet {
    size: Decimal,
}

impl Bet {
    pub fn new(size: Decimal) -> Self {
        Self { size }
    }

    pub fn size(&self) -> Decimal {
        self.size
    }
}

/// A bet tagged with the player who placed it.
///
/// The player is referenced by id only; the session owns the players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerBet {
    player: PlayerId,
    bet: Bet,
}

impl PlayerBet {
    pub fn new(player: PlayerId, bet: Bet) -> Self {
        Self { player, bet }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn bet(&self) -> Bet {
        self.bet
    }

    pub fn size(&self) -> Decimal {
        self.bet.size
    }
}

/// A resolved bet: the originating stake and what it paid back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    bet: PlayerBet,
    payout: Decimal,
}

impl Outcome {
    pub fn new(bet: PlayerBet, payout: Decimal) -> Self {
        Self { bet, payout }
    }

    /// Resolve a bet against the round result: `stake × multiplier` on a
    /// win, nothing on a loss.
    pub fn resolve(
        bet: PlayerBet,
        result: RoundResult,
        payout_multiplier: Decimal,
    ) -> Result<Self, BettingError> {
        let payout = if result.is_win() {
            bet.size()
                .checked_mul(payout_multiplier)
                .ok_or(BettingError::PayoutOverflow {
                    stake: bet.size(),
                    multiplier: payout_multiplier,
                })?
        } else {
            Decimal::ZERO
        };
        Ok(Self::new(bet, payout))
    }

    pub fn bet(&self) -> PlayerBet {
        self.bet
    }

    pub fn payout(&self) -> Decimal {
        self.payout
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "player {} staked €{:.2}, paid €{:.2}",
            self.bet.player, self.bet.bet.size, self.payout
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BettingError {
    #[error("Betting system '{strategy}' proposes illegal bet of €{stake} for {player} holding €{bankroll}")]
    PolicyViolation {
        player: String,
        strategy: String,
        stake: Decimal,
        bankroll: Decimal,
    },

    #[error("Bankroll must be positive, got €{0}")]
    InvalidBankroll(Decimal),

    #[error("Win target €{win_target} must exceed bankroll €{bankroll}")]
    WinTargetNotAboveBankroll { bankroll: Decimal, win_target: Decimal },

    #[error("Win probability must lie strictly between 0 and 1, got {0}")]
    InvalidProbability(f64),

    #[error("Payout multiplier must be positive, got {0}")]
    InvalidMultiplier(Decimal),

    #[error("Number of runs must be at least 1")]
    InvalidRuns,

    #[error("At least one betting system must be configured")]
    EmptyCohort,

    #[error("Unknown betting system: {0}")]
    UnknownStrategy(String),

    #[error("Payout of €{stake} at {multiplier}x exceeds the representable range")]
    PayoutOverflow { stake: Decimal, multiplier: Decimal },

    #[error("Bankroll of {player} (€{bankroll}) overflows when credited €{payout}")]
    BankrollOverflow {
        player: String,
        bankroll: Decimal,
        payout: Decimal,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
