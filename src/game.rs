//! Outcome sources — the game side of the simulation.
//!
//! An outcome source is an infinite, pull-based stream of round results.
//! The session draws exactly one result per round and shares it with
//! every bet placed in that round.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{BettingError, RoundResult};

/// Abstraction over an infinite stream of game outcomes.
pub trait OutcomeSource {
    /// Draw the result of the next round.
    fn next_outcome(&mut self) -> RoundResult;

    /// Adapt the source into an (endless) iterator.
    fn outcomes(&mut self) -> Outcomes<'_, Self>
    where
        Self: Sized,
    {
        Outcomes { source: self }
    }
}

impl<S: OutcomeSource + ?Sized> OutcomeSource for Box<S> {
    fn next_outcome(&mut self) -> RoundResult {
        (**self).next_outcome()
    }
}

/// Iterator view over an [`OutcomeSource`]. Never returns `None`.
pub struct Outcomes<'a, S> {
    source: &'a mut S,
}

impl<S: OutcomeSource> Iterator for Outcomes<'_, S> {
    type Item = RoundResult;

    fn next(&mut self) -> Option<RoundResult> {
        Some(self.source.next_outcome())
    }
}

// ---------------------------------------------------------------------------
// Random
// ---------------------------------------------------------------------------

/// Independent Bernoulli draw per round.
#[derive(Debug, Clone)]
pub struct FixedProbabilityGame {
    probability: f64,
    rng: StdRng,
}

impl FixedProbabilityGame {
    /// Source seeded from OS entropy.
    pub fn new(probability: f64) -> Result<Self, BettingError> {
        Self::with_rng(probability, StdRng::from_entropy())
    }

    /// Reproducible source.
    pub fn seeded(probability: f64, seed: u64) -> Result<Self, BettingError> {
        Self::with_rng(probability, StdRng::seed_from_u64(seed))
    }

    fn with_rng(probability: f64, rng: StdRng) -> Result<Self, BettingError> {
        // Also rejects NaN.
        if !(probability > 0.0 && probability < 1.0) {
            return Err(BettingError::InvalidProbability(probability));
        }
        Ok(Self { probability, rng })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl OutcomeSource for FixedProbabilityGame {
    fn next_outcome(&mut self) -> RoundResult {
        self.rng.gen_bool(self.probability).into()
    }
}

// ---------------------------------------------------------------------------
// Deterministic
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct WinningGame;

impl OutcomeSource for WinningGame {
    fn next_outcome(&mut self) -> RoundResult {
        RoundResult::Win
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LosingGame;

impl OutcomeSource for LosingGame {
    fn next_outcome(&mut self) -> RoundResult {
        RoundResult::Lose
    }
}

/// Win, lose, win, lose, ... (or the other way round).
#[derive(Debug, Clone)]
pub struct AlternatingGame {
    next: RoundResult,
}

impl AlternatingGame {
    pub fn new(first: RoundResult) -> Self {
        Self { next: first }
    }
}

impl OutcomeSource for AlternatingGame {
    fn next_outcome(&mut self) -> RoundResult {
        let outcome = self.next;
        self.next = outcome.opposite();
        outcome
    }
}

/// Replays a fixed list of results, starting over when it runs out.
#[derive(Debug, Clone)]
pub struct ScriptedGame {
    script: Vec<RoundResult>,
    position: usize,
}

impl ScriptedGame {
    /// An empty script behaves like [`LosingGame`].
    pub fn new(script: impl IntoIterator<Item = RoundResult>) -> Self {
        Self {
            script: script.into_iter().collect(),
            position: 0,
        }
    }
}

impl OutcomeSource for ScriptedGame {
    fn next_outcome(&mut self) -> RoundResult {
        if self.script.is_empty() {
            return RoundResult::Lose;
        }
        let outcome = self.script[self.position];
        self.position = (self.position + 1) % self.script.len();
        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
