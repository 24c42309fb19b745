//! Jump core: timing grades, take-off, flight, landing and scoring.
//!
//! Everything in here is pure and deterministic; the round state machine in
//! [`crate::session`] drives it.

pub mod flight;
pub mod hill;
pub mod landing;
pub mod launch;
pub mod scoring;
pub mod timing;
pub mod wind;

pub use flight::{FlightState, PathSample, PhysicsConfig};
pub use hill::{HillConfig, HillGeometry, HillMarker, MarkerKind, ScenePoint};
pub use landing::{compute_landing, LandingResult, LandingStyleGrade, LandingTable};
pub use launch::{compute_launch, LaunchParams, LaunchProfile, LaunchResult, LaunchTable};
pub use scoring::{finalize, resolve_tier, GameResult, GradeTier, RoundResult};
pub use timing::{grade, TimingGrade, TimingThresholds};
pub use wind::{sample_wind, WindRange, WindSample};
