//! Round and game state machine.
//!
//! `GameSession` owns everything a game needs: config, wind RNG, the live
//! flight, round results and the best total. Callers drive it with
//! [`GameSession::advance`] once per frame and [`GameSession::tap`] per input,
//! then read state or drain [`SessionEvent`]s for display.

pub mod logic;
pub mod types;

pub use types::{ActiveFlight, GameSession, Phase, PhaseToken, SessionEvent, TapOutcome};
