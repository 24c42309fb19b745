//! Ski Jump - five-round timing game library
//!
//! Exposes the jump physics, round state machine, persistence and the balance
//! simulator for the binaries and for testing. The terminal UI lives in the
//! `skijump` binary.

pub mod config;
pub mod constants;
pub mod jump;
pub mod persistence;
pub mod session;
pub mod simulator;
