//! Martingale-style recovery.
//!
//! Note this is not classic doubling: every round stakes whatever would
//! bring the bankroll to the target on a win, going all-in when that is
//! more than the player holds. It ignores minimum-bet floors and never
//! breaks the target into smaller sub-targets.

use rust_decimal::Decimal;

use super::{clamp_to_bankroll, BettingSystem};
use crate::types::{Bet, PlayerProps};

pub const NAME: &str = "Martingale";

/// Stateless across rounds; recomputed from the current bankroll only.
#[derive(Debug, Clone)]
pub struct MartingaleStrategy {
    win_target: Decimal,
}

impl MartingaleStrategy {
    pub fn new(props: PlayerProps) -> Self {
        Self {
            win_target: props.win_target(),
        }
    }
}

impl BettingSystem for MartingaleStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn next_bet(&mut self, current_bankroll: Decimal) -> Bet {
        let bet_size = self.win_target - current_bankroll;
        Bet::new(clamp_to_bankroll(bet_size, current_bankroll))
    }
}
