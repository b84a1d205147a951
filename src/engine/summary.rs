//! Aggregation across repeated runs.
//!
//! Tallies how each betting system fared over many independent sessions:
//! how often it reached the target, went broke or was left unfinished,
//! how long sessions lasted, and where the bankroll ended up.

use rust_decimal::prelude::*;
use serde::Serialize;
use std::fmt;

use crate::engine::session::SessionReport;
use crate::types::{BettingError, PlayingCondition};

/// Per-strategy results over all completed runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrategyTally {
    pub strategy: String,
    pub sessions: u64,
    pub won: u64,
    pub lost: u64,
    pub unfinished: u64,
    pub total_rounds: u64,
    pub total_final_bankroll: Decimal,
}

impl StrategyTally {
    fn new(strategy: &str) -> Self {
        Self {
            strategy: strategy.to_string(),
            ..Self::default()
        }
    }

    /// Share of sessions that reached the target.
    pub fn win_rate(&self) -> f64 {
        if self.sessions == 0 {
            0.0
        } else {
            self.won as f64 / self.sessions as f64
        }
    }

    pub fn mean_rounds(&self) -> f64 {
        if self.sessions == 0 {
            0.0
        } else {
            self.total_rounds as f64 / self.sessions as f64
        }
    }

    pub fn mean_final_bankroll(&self) -> Decimal {
        if self.sessions == 0 {
            Decimal::ZERO
        } else {
            self.total_final_bankroll / Decimal::from(self.sessions)
        }
    }
}

/// A run aborted by a policy violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedRun {
    pub run: usize,
    pub error: String,
}

/// Results of a full multi-run simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub runs_completed: usize,
    pub runs_capped: usize,
    /// In order of first appearance.
    pub tallies: Vec<StrategyTally>,
    pub failed_runs: Vec<FailedRun>,
}

impl SimulationSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_session(&mut self, report: &SessionReport) {
        self.runs_completed += 1;
        if report.capped {
            self.runs_capped += 1;
        }

        for player in &report.players {
            let tally = match self.tallies.iter().position(|t| t.strategy == player.strategy) {
                Some(idx) => &mut self.tallies[idx],
                None => {
                    self.tallies.push(StrategyTally::new(player.strategy));
                    let last = self.tallies.len() - 1;
                    &mut self.tallies[last]
                }
            };
            tally.sessions += 1;
            tally.total_rounds += player.stats.rounds_played;
            tally.total_final_bankroll = tally.total_final_bankroll.saturating_add(player.final_bankroll);
            match player.condition {
                PlayingCondition::Won => tally.won += 1,
                PlayingCondition::Lost => tally.lost += 1,
                PlayingCondition::Playing => tally.unfinished += 1,
            }
        }
    }

    pub fn record_failure(&mut self, run: usize, error: &BettingError) {
        self.failed_runs.push(FailedRun {
            run,
            error: error.to_string(),
        });
    }

    pub fn tally(&self, strategy: &str) -> Option<&StrategyTally> {
        self.tallies.iter().find(|t| t.strategy == strategy)
    }
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<16} {:>8} {:>6} {:>6} {:>10} {:>9} {:>12} {:>14}",
            "System", "Sessions", "Won", "Lost", "Unfinished", "Win rate", "Avg rounds", "Avg bankroll"
        )?;
        for t in &self.tallies {
            writeln!(
                f,
                "{:<16} {:>8} {:>6} {:>6} {:>10} {:>8.2}% {:>12.1} {:>14}",
                t.strategy,
                t.sessions,
                t.won,
                t.lost,
                t.unfinished,
                t.win_rate() * 100.0,
                t.mean_rounds(),
                format!("€{:.2}", t.mean_final_bankroll()),
            )?;
        }
        write!(
            f,
            "Runs completed: {} (capped: {}), failed: {}",
            self.runs_completed,
            self.runs_capped,
            self.failed_runs.len()
        )?;
        for failed in &self.failed_runs {
            write!(f, "\n  run {}: {}", failed.run, failed.error)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::session::PlayerSummary;
    use crate::player::PlayerStats;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn summary(strategy: &'static str, condition: PlayingCondition, bankroll: Decimal, rounds: u64) -> PlayerSummary {
        PlayerSummary {
            id: 0,
            name: "player-0".into(),
            strategy,
            condition,
            final_bankroll: bankroll,
            stats: PlayerStats {
                rounds_played: rounds,
                ..PlayerStats::default()
            },
        }
    }

    fn report(players: Vec<PlayerSummary>, capped: bool) -> SessionReport {
        SessionReport {
            run: 0,
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            rounds: players.iter().map(|p| p.stats.rounds_played).max().unwrap_or(0),
            capped,
            players,
        }
    }

    #[test]
    fn test_tallies_accumulate_per_strategy() {
        let mut s = SimulationSummary::new();
        s.record_session(&report(
            vec![
                summary("Single Bet", PlayingCondition::Won, dec!(1100), 3),
                summary("Martingale", PlayingCondition::Lost, Decimal::ZERO, 4),
            ],
            false,
        ));
        s.record_session(&report(
            vec![
                summary("Single Bet", PlayingCondition::Lost, Decimal::ZERO, 9),
                summary("Martingale", PlayingCondition::Won, dec!(1100), 1),
            ],
            false,
        ));

        assert_eq!(s.runs_completed, 2);
        let single = s.tally("Single Bet").unwrap();
        assert_eq!(single.sessions, 2);
        assert_eq!(single.won, 1);
        assert_eq!(single.lost, 1);
        assert_eq!(single.win_rate(), 0.5);
        assert_eq!(single.mean_rounds(), 6.0);
        assert_eq!(single.mean_final_bankroll(), dec!(550));
        assert_eq!(s.tallies[1].strategy, "Martingale");
    }

    #[test]
    fn test_unfinished_and_capped_counted() {
        let mut s = SimulationSummary::new();
        s.record_session(&report(
            vec![summary("Oscar's Grind", PlayingCondition::Playing, dec!(1000), 50)],
            true,
        ));
        assert_eq!(s.runs_capped, 1);
        assert_eq!(s.tally("Oscar's Grind").unwrap().unfinished, 1);
    }

    #[test]
    fn test_failures_recorded() {
        let mut s = SimulationSummary::new();
        s.record_failure(
            4,
            &BettingError::PolicyViolation {
                player: "player-1".into(),
                strategy: "Rogue".into(),
                stake: dec!(2),
                bankroll: dec!(1),
            },
        );
        assert_eq!(s.failed_runs.len(), 1);
        assert_eq!(s.failed_runs[0].run, 4);
        assert!(s.to_string().contains("failed: 1"));
    }

    #[test]
    fn test_empty_tally_rates() {
        let t = StrategyTally::new("Nobody");
        assert_eq!(t.win_rate(), 0.0);
        assert_eq!(t.mean_rounds(), 0.0);
        assert_eq!(t.mean_final_bankroll(), Decimal::ZERO);
    }

    #[test]
    fn test_display_lists_strategies() {
        let mut s = SimulationSummary::new();
        s.record_session(&report(
            vec![summary("Single Bet", PlayingCondition::Won, dec!(1100), 1)],
            false,
        ));
        let text = s.to_string();
        assert!(text.contains("Single Bet"));
        assert!(text.contains("100.00%"));
        assert!(text.contains("€1100.00"));
    }
}
