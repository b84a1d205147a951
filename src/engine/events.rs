//! Structured per-round events and the sinks that consume them.
//!
//! The session emits one [`SimulationEvent::Round`] per resolved bet and
//! one [`SimulationEvent::Finished`] when a player leaves the cohort.
//! Formatting is left to the sink.

use rust_decimal::Decimal;
use serde::Serialize;
use std::io::{self, Write};
use tracing::{debug, info, warn};

use crate::types::{PlayerId, PlayingCondition, RoundResult};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A resolved bet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundEvent {
    pub run: usize,
    pub round: u64,
    pub player: PlayerId,
    pub player_name: String,
    pub strategy: &'static str,
    pub bankroll_before: Decimal,
    pub stake: Decimal,
    pub result: RoundResult,
    pub payout: Decimal,
    pub bankroll_after: Decimal,
    pub condition: PlayingCondition,
}

/// A player leaving the cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinishEvent {
    pub run: usize,
    pub round: u64,
    pub player: PlayerId,
    pub player_name: String,
    pub strategy: &'static str,
    pub condition: PlayingCondition,
    pub bankroll: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimulationEvent {
    Round(RoundEvent),
    Finished(FinishEvent),
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Receiver of simulation events.
pub trait EventSink {
    fn record(&mut self, event: &SimulationEvent);
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: &SimulationEvent) {}
}

/// Logs events through `tracing`: rounds at debug, finishes at info.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: &SimulationEvent) {
        match event {
            SimulationEvent::Round(e) => debug!(
                run = e.run,
                round = e.round,
                player = %e.player_name,
                strategy = e.strategy,
                before = format!("€{:.2}", e.bankroll_before),
                stake = format!("€{:.2}", e.stake),
                result = %e.result,
                payout = format!("€{:.2}", e.payout),
                after = format!("€{:.2}", e.bankroll_after),
                "Round resolved"
            ),
            SimulationEvent::Finished(e) => info!(
                run = e.run,
                round = e.round,
                player = %e.player_name,
                strategy = e.strategy,
                condition = %e.condition,
                bankroll = format!("€{:.2}", e.bankroll),
                "Player finished"
            ),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimulationEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SimulationEvent] {
        &self.events
    }

    pub fn rounds(&self) -> impl Iterator<Item = &RoundEvent> {
        self.events.iter().filter_map(|e| match e {
            SimulationEvent::Round(r) => Some(r),
            SimulationEvent::Finished(_) => None,
        })
    }

    pub fn finishes(&self) -> impl Iterator<Item = &FinishEvent> {
        self.events.iter().filter_map(|e| match e {
            SimulationEvent::Finished(f) => Some(f),
            SimulationEvent::Round(_) => None,
        })
    }
}

impl EventSink for EventLog {
    fn record(&mut self, event: &SimulationEvent) {
        self.events.push(event.clone());
    }
}

/// Writes one JSON object per line.
///
/// The first write error is kept and reported by [`finish`](Self::finish);
/// later events are dropped.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// Flush and hand back the writer, or the first error hit.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_event(&mut self, event: &SimulationEvent) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn record(&mut self, event: &SimulationEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_event(event) {
            warn!(error = %e, "Failed to write event, dropping the rest");
            self.error = Some(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
