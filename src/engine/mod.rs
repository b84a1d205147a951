//! Simulation engine — sessions, events, and multi-run aggregation.

pub mod events;
pub mod session;
pub mod summary;

use rust_decimal::Decimal;
use tracing::{error, info};

use crate::game::OutcomeSource;
use crate::player::Player;
use crate::strategy::StrategyKind;
use crate::types::{BettingError, PlayerProps};
use events::EventSink;
use session::{Session, SessionReport};
use summary::SimulationSummary;

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Validated parameters for a full simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationPlan {
    pub props: PlayerProps,
    pub strategies: Vec<StrategyKind>,
    pub payout_multiplier: Decimal,
    pub runs: usize,
    pub max_rounds: Option<u64>,
}

impl SimulationPlan {
    pub fn new(
        props: PlayerProps,
        strategies: Vec<StrategyKind>,
        payout_multiplier: Decimal,
        runs: usize,
    ) -> Result<Self, BettingError> {
        if payout_multiplier <= Decimal::ZERO {
            return Err(BettingError::InvalidMultiplier(payout_multiplier));
        }
        if runs == 0 {
            return Err(BettingError::InvalidRuns);
        }
        if strategies.is_empty() {
            return Err(BettingError::EmptyCohort);
        }
        Ok(Self {
            props,
            strategies,
            payout_multiplier,
            runs,
            max_rounds: None,
        })
    }

    pub fn with_max_rounds(mut self, max_rounds: Option<u64>) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Runs independent sessions back to back.
///
/// Every run gets fresh players and fresh betting systems; the outcome
/// source is threaded through all runs in order, so a seeded source
/// makes the whole simulation reproducible.
pub struct Simulator {
    plan: SimulationPlan,
}

impl Simulator {
    pub fn new(plan: SimulationPlan) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> &SimulationPlan {
        &self.plan
    }

    /// Fresh players for one run, one per configured strategy.
    pub fn cohort(&self) -> Vec<Player> {
        session::cohort(self.plan.props, &self.plan.strategies)
    }

    /// Play a single run to completion.
    pub fn run_session(
        &self,
        run: usize,
        source: &mut dyn OutcomeSource,
        sink: &mut dyn EventSink,
    ) -> Result<SessionReport, BettingError> {
        self.play(run, self.cohort(), source, sink)
    }

    fn play(
        &self,
        run: usize,
        players: Vec<Player>,
        source: &mut dyn OutcomeSource,
        sink: &mut dyn EventSink,
    ) -> Result<SessionReport, BettingError> {
        Session::new(run, players, self.plan.payout_multiplier)
            .with_max_rounds(self.plan.max_rounds)
            .run(source, sink)
    }

    /// Play every configured run with the configured strategies.
    pub fn run_all(
        &self,
        source: &mut dyn OutcomeSource,
        sink: &mut dyn EventSink,
    ) -> SimulationSummary {
        self.run_all_with(source, sink, |_| self.cohort())
    }

    /// Play every configured run, seating the players `cohort` builds for
    /// each run. A run that fails (policy violation, overflowing payout)
    /// is aborted on its own; it is logged and listed in the summary.
    pub fn run_all_with<F>(
        &self,
        source: &mut dyn OutcomeSource,
        sink: &mut dyn EventSink,
        mut cohort: F,
    ) -> SimulationSummary
    where
        F: FnMut(usize) -> Vec<Player>,
    {
        let mut summary = SimulationSummary::new();

        for run in 0..self.plan.runs {
            info!(run, of = self.plan.runs, "Starting run");
            match self.play(run, cohort(run), source, sink) {
                Ok(report) => summary.record_session(&report),
                Err(e) => {
                    error!(run, error = %e, "Run aborted");
                    summary.record_failure(run, &e);
                }
            }
        }

        info!(
            completed = summary.runs_completed,
            capped = summary.runs_capped,
            failed = summary.failed_runs.len(),
            "Simulation complete"
        );

        summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
