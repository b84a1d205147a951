//! Player — bankroll state machine bound to one betting system.
//!
//! A player starts `Playing` with the configured bankroll, debits each
//! stake as the bet is placed and credits the payout once the round is
//! resolved. The playing condition is always derived from the bankroll,
//! never stored.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error};

use crate::strategy::BettingSystem;
use crate::types::{Bet, BettingError, Outcome, PlayerBet, PlayerId, PlayerProps, PlayingCondition};

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Running totals kept alongside the bankroll.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerStats {
    pub rounds_played: u64,
    pub total_staked: Decimal,
    pub total_payout: Decimal,
    pub peak_bankroll: Decimal,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

pub struct Player {
    id: PlayerId,
    name: String,
    props: PlayerProps,
    bankroll: Decimal,
    system: Box<dyn BettingSystem>,
    stats: PlayerStats,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, props: PlayerProps, system: Box<dyn BettingSystem>) -> Self {
        Self {
            id,
            name: name.into(),
            props,
            bankroll: props.bankroll(),
            system,
            stats: PlayerStats {
                peak_bankroll: props.bankroll(),
                ..PlayerStats::default()
            },
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy_name(&self) -> &'static str {
        self.system.name()
    }

    pub fn props(&self) -> PlayerProps {
        self.props
    }

    pub fn bankroll(&self) -> Decimal {
        self.bankroll
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn playing_condition(&self) -> PlayingCondition {
        PlayingCondition::from_bankroll(self.bankroll, self.props.win_target())
    }

    /// Ask the betting system for a stake and commit it.
    ///
    /// Returns `Ok(None)` when the player has nothing left to bet with.
    /// A stake that is negative or exceeds the bankroll is a bug in the
    /// betting system and comes back as [`BettingError::PolicyViolation`];
    /// the bankroll is left untouched in that case.
    pub fn place_next_bet(&mut self) -> Result<Option<PlayerBet>, BettingError> {
        if self.bankroll <= Decimal::ZERO {
            debug!(player = %self.name, strategy = self.strategy_name(), "Out of money, no bet");
            return Ok(None);
        }

        let stake = self.system.next_bet(self.bankroll).size();
        if stake > self.bankroll || stake < Decimal::ZERO {
            error!(
                player = %self.name,
                strategy = self.strategy_name(),
                stake = %stake,
                bankroll = %self.bankroll,
                "Betting system proposed an illegal bet"
            );
            return Err(BettingError::PolicyViolation {
                player: self.name.clone(),
                strategy: self.strategy_name().to_string(),
                stake,
                bankroll: self.bankroll,
            });
        }

        self.bankroll -= stake;
        self.stats.rounds_played += 1;
        self.stats.total_staked = self.stats.total_staked.saturating_add(stake);

        Ok(Some(PlayerBet::new(self.id, Bet::new(stake))))
    }

    /// Credit the payout of a resolved bet. The new condition shows up on
    /// the next [`playing_condition`](Self::playing_condition) call.
    ///
    /// A credit the bankroll cannot represent leaves the player untouched
    /// and comes back as [`BettingError::BankrollOverflow`].
    pub fn handle_outcome(&mut self, outcome: &Outcome) -> Result<(), BettingError> {
        debug_assert_eq!(outcome.bet().player(), self.id, "outcome routed to the wrong player");

        let payout = outcome.payout();
        self.bankroll = self
            .bankroll
            .checked_add(payout)
            .ok_or_else(|| BettingError::BankrollOverflow {
                player: self.name.clone(),
                bankroll: self.bankroll,
                payout,
            })?;
        self.stats.total_payout = self.stats.total_payout.saturating_add(payout);
        if self.bankroll > self.stats.peak_bankroll {
            self.stats.peak_bankroll = self.bankroll;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("strategy", &self.strategy_name())
            .field("bankroll", &self.bankroll)
            .field("condition", &self.playing_condition())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
