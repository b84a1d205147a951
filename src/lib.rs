//! ODDSYSSEE — betting system simulator
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod strategy;
pub mod player;
pub mod game;
pub mod engine;
