//! Single bet: stake the full target winnings every round.

use rust_decimal::Decimal;

use super::{clamp_to_bankroll, BettingSystem};
use crate::types::{Bet, PlayerProps};

pub const NAME: &str = "Single Bet";

/// Flat staking of `win_target - bankroll`, i.e. the amount that reaches
/// the target in one even-money win from the starting bankroll.
#[derive(Debug, Clone)]
pub struct SingleBetStrategy {
    bet_size: Decimal,
}

impl SingleBetStrategy {
    pub fn new(props: PlayerProps) -> Self {
        Self {
            bet_size: props.target_winnings(),
        }
    }
}

impl BettingSystem for SingleBetStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn next_bet(&mut self, current_bankroll: Decimal) -> Bet {
        Bet::new(clamp_to_bankroll(self.bet_size, current_bankroll))
    }
}
