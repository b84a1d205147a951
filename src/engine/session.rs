//! One simulation run: a cohort of players sharing one outcome per round.
//!
//! Each round every active player places a bet, a single result is
//! drawn for the whole table, every bet is resolved against it, and
//! players who reached their target or went broke leave the cohort.
//! The session ends when nobody is left (or the optional round cap hits).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::events::{EventSink, FinishEvent, RoundEvent, SimulationEvent};
use crate::game::OutcomeSource;
use crate::player::{Player, PlayerStats};
use crate::strategy::StrategyKind;
use crate::types::{BettingError, Outcome, PlayerBet, PlayerId, PlayerProps, PlayingCondition};

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// End state of one player.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub strategy: &'static str,
    pub condition: PlayingCondition,
    pub final_bankroll: Decimal,
    pub stats: PlayerStats,
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id(),
            name: player.name().to_string(),
            strategy: player.strategy_name(),
            condition: player.playing_condition(),
            final_bankroll: player.bankroll(),
            stats: player.stats().clone(),
        }
    }
}

/// Summary of a complete session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub run: usize,
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Rounds actually played.
    pub rounds: u64,
    /// Whether the round cap stopped the session with players still playing.
    pub capped: bool,
    /// Players in id order.
    pub players: Vec<PlayerSummary>,
}

impl SessionReport {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerSummary> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Players the cap left unfinished.
    pub fn unfinished(&self) -> impl Iterator<Item = &PlayerSummary> {
        self.players
            .iter()
            .filter(|p| p.condition == PlayingCondition::Playing)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session {
    run: usize,
    players: Vec<Player>,
    payout_multiplier: Decimal,
    max_rounds: Option<u64>,
}

impl Session {
    pub fn new(run: usize, players: Vec<Player>, payout_multiplier: Decimal) -> Self {
        Self {
            run,
            players,
            payout_multiplier,
            max_rounds: None,
        }
    }

    /// One player per strategy, each with a fresh betting system.
    pub fn for_strategies(
        run: usize,
        props: PlayerProps,
        strategies: &[StrategyKind],
        payout_multiplier: Decimal,
    ) -> Self {
        Self::new(run, cohort(props, strategies), payout_multiplier)
    }

    /// Stop after this many rounds even if players are still going.
    pub fn with_max_rounds(mut self, max_rounds: Option<u64>) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Play rounds until the cohort is empty.
    ///
    /// A betting system proposing an illegal stake aborts the session
    /// with [`BettingError::PolicyViolation`]; a payout too large for the
    /// bankroll to hold aborts it with the matching overflow error.
    pub fn run(
        self,
        source: &mut dyn OutcomeSource,
        sink: &mut dyn EventSink,
    ) -> Result<SessionReport, BettingError> {
        let run = self.run;
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut active = self.players;
        let mut retired: Vec<Player> = Vec::with_capacity(active.len());
        let mut round: u64 = 0;
        let mut capped = false;

        debug!(run, %run_id, players = active.len(), "Session started");

        while !active.is_empty() {
            if self.max_rounds.is_some_and(|cap| round >= cap) {
                capped = true;
                warn!(
                    run,
                    rounds = round,
                    still_playing = active.len(),
                    "Round cap reached, stopping session"
                );
                break;
            }
            round += 1;

            // 1. Collect bets from everyone still playing.
            let mut seated: Vec<Player> = Vec::with_capacity(active.len());
            let mut bets: Vec<(PlayerBet, Decimal)> = Vec::with_capacity(active.len());
            for mut player in active.drain(..) {
                if player.playing_condition() != PlayingCondition::Playing {
                    retire(run, round, player, &mut retired, sink);
                    continue;
                }
                let bankroll_before = player.bankroll();
                match player.place_next_bet()? {
                    Some(bet) => {
                        bets.push((bet, bankroll_before));
                        seated.push(player);
                    }
                    None => retire(run, round, player, &mut retired, sink),
                }
            }

            // 2. Nobody bet, nothing to draw.
            if bets.is_empty() {
                round -= 1;
                break;
            }

            // 3. One draw for the whole table.
            let result = source.next_outcome();

            // 4. Resolve every bet against it.
            for (player, (bet, bankroll_before)) in seated.iter_mut().zip(bets) {
                let outcome = Outcome::resolve(bet, result, self.payout_multiplier)?;
                player.handle_outcome(&outcome)?;
                sink.record(&SimulationEvent::Round(RoundEvent {
                    run,
                    round,
                    player: player.id(),
                    player_name: player.name().to_string(),
                    strategy: player.strategy_name(),
                    bankroll_before,
                    stake: bet.size(),
                    result,
                    payout: outcome.payout(),
                    bankroll_after: player.bankroll(),
                    condition: player.playing_condition(),
                }));
            }

            // 5. Finished players leave the cohort.
            for player in seated {
                if player.playing_condition().is_finished() {
                    retire(run, round, player, &mut retired, sink);
                } else {
                    active.push(player);
                }
            }
        }

        retired.extend(active);
        retired.sort_by_key(Player::id);

        let report = SessionReport {
            run,
            run_id,
            started_at,
            rounds: round,
            capped,
            players: retired.iter().map(PlayerSummary::from).collect(),
        };

        info!(
            run,
            rounds = report.rounds,
            won = report.players.iter().filter(|p| p.condition == PlayingCondition::Won).count(),
            lost = report.players.iter().filter(|p| p.condition == PlayingCondition::Lost).count(),
            capped,
            "Session complete"
        );

        Ok(report)
    }
}

/// Fresh players named `player-{id}`, one per strategy, in the given order.
pub fn cohort(props: PlayerProps, strategies: &[StrategyKind]) -> Vec<Player> {
    strategies
        .iter()
        .enumerate()
        .map(|(id, kind)| Player::new(id, format!("player-{id}"), props, kind.build(props)))
        .collect()
}

fn retire(
    run: usize,
    round: u64,
    player: Player,
    retired: &mut Vec<Player>,
    sink: &mut dyn EventSink,
) {
    sink.record(&SimulationEvent::Finished(FinishEvent {
        run,
        round,
        player: player.id(),
        player_name: player.name().to_string(),
        strategy: player.strategy_name(),
        condition: player.playing_condition(),
        bankroll: player.bankroll(),
    }));
    retired.push(player);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
