//! End-to-end scenarios against the public API.

mod scenarios;
mod simulation;
