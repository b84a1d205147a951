//! Oscar's Grind.
//!
//! Keeps a running stake (the "rung"), raised after every winning round
//! and held after a loss, never aiming past the win target.

use rust_decimal::Decimal;
use tracing::trace;

use super::{clamp_to_bankroll, BettingSystem};
use crate::types::{Bet, PlayerProps};

pub const NAME: &str = "Oscar's Grind";

#[derive(Debug, Clone)]
pub struct OscarsGrindStrategy {
    props: PlayerProps,
    current_bet_size: Decimal,
    previous_bankroll: Decimal,
}

impl OscarsGrindStrategy {
    pub fn new(props: PlayerProps) -> Self {
        Self {
            props,
            current_bet_size: props.target_winnings(),
            previous_bankroll: props.bankroll(),
        }
    }

    /// Current rung, before clamping to the bankroll.
    pub fn current_bet_size(&self) -> Decimal {
        self.current_bet_size
    }
}

impl BettingSystem for OscarsGrindStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn next_bet(&mut self, current_bankroll: Decimal) -> Bet {
        let previous_bet_won = current_bankroll > self.previous_bankroll;
        self.previous_bankroll = current_bankroll;

        if previous_bet_won {
            self.current_bet_size += self.props.target_winnings();
            if current_bankroll + self.current_bet_size > self.props.win_target() {
                self.current_bet_size = self.props.win_target() - current_bankroll;
            }
            trace!(rung = %self.current_bet_size, "Rung raised after win");
        }

        Bet::new(clamp_to_bankroll(self.current_bet_size, current_bankroll))
    }
}
