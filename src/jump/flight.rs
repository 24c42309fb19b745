//! Flight simulator: gravity, asymmetric drag and landing against a sloped hill.
//!
//! Positions and velocities are in scene pixels (y downward). Conversion to
//! metres only happens through [`HillGeometry`].

use super::hill::{HillGeometry, ScenePoint};
use super::launch::LaunchResult;
use crate::constants::{MAX_FLIGHT_SECS, MAX_STEP_SECS, PATH_STEP_SECS, RUNAWAY_BOUND_FACTOR};
use serde::{Deserialize, Serialize};

/// Physics tuning for the flight integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Effective gravity in m/s² (already arcade-scaled).
    pub gravity_mps2: f64,
    /// Per-reference-frame horizontal velocity loss.
    pub horizontal_drag: f64,
    /// Vertical drag as a fraction of horizontal drag. Below 1 for taller arcs.
    pub vertical_drag_scale: f64,
    pub reference_frame_rate: f64,
    /// Share of wind speed added to horizontal take-off velocity.
    pub wind_influence: f64,
}

/// Live state of one flight. Airborne until `landed`, then frozen.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightState {
    pub position: ScenePoint,
    /// Pixels per second.
    pub vx: f64,
    /// Pixels per second, positive downward.
    pub vy: f64,
    pub elapsed_secs: f64,
    pub landed: bool,
    /// Distance from the lip in metres, clamped to the hill's range.
    pub distance_m: f64,
    /// Set when the runaway fallback ended the flight instead of the hill.
    pub forced_landing: bool,
}

impl FlightState {
    /// Start a flight at the lip with the take-off velocity.
    pub fn launch(launch: &LaunchResult, hill: &HillGeometry) -> Self {
        Self {
            position: hill.origin,
            vx: hill.metres_to_px(launch.vx_mps),
            vy: hill.metres_to_px(launch.vy_mps),
            elapsed_secs: 0.0,
            landed: false,
            distance_m: 0.0,
            forced_landing: false,
        }
    }

    pub fn is_airborne(&self) -> bool {
        !self.landed
    }

    /// Upward kick of `lift_mps`. Ignored once landed.
    pub fn apply_lift(&mut self, lift_mps: f64, hill: &HillGeometry) {
        if self.landed {
            return;
        }
        self.vy -= hill.metres_to_px(lift_mps);
    }

    /// Current speed in m/s.
    pub fn speed_mps(&self, hill: &HillGeometry) -> f64 {
        hill.px_to_metres((self.vx * self.vx + self.vy * self.vy).sqrt())
    }

    /// Height above the landing surface in metres.
    pub fn height_above_hill_m(&self, hill: &HillGeometry) -> f64 {
        hill.px_to_metres(hill.hill_y(self.position.x) - self.position.y)
            .max(0.0)
    }
}

/// One point of a precomputed trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub t: f64,
    pub position: ScenePoint,
}

/// Advance the flight by `dt` seconds. Returns true if this call landed it.
///
/// Large `dt` values are split into sub-steps no longer than
/// [`MAX_STEP_SECS`] so a stalled frame can't tunnel through the hill.
pub fn step(state: &mut FlightState, hill: &HillGeometry, physics: &PhysicsConfig, dt: f64) -> bool {
    if state.landed || !(dt > 0.0) {
        return false;
    }

    let mut remaining = dt;
    while remaining > 0.0 && !state.landed {
        let h = remaining.min(MAX_STEP_SECS);
        integrate(state, hill, physics, h);
        remaining -= h;
    }
    state.landed
}

fn integrate(state: &mut FlightState, hill: &HillGeometry, physics: &PhysicsConfig, dt: f64) {
    let frames = dt * physics.reference_frame_rate;
    let vertical_drag = physics.horizontal_drag * physics.vertical_drag_scale;

    state.vy += hill.metres_to_px(physics.gravity_mps2) * dt;
    state.vx *= (1.0 - physics.horizontal_drag).powf(frames);
    state.vy *= (1.0 - vertical_drag).powf(frames);

    state.position.x += state.vx * dt;
    state.position.y += state.vy * dt;
    state.elapsed_secs += dt;
    state.distance_m = hill.distance_at(state.position.x);

    if hill.touches_surface(state.position.x, state.position.y) {
        state.position.y = hill.hill_y(state.position.x);
        state.landed = true;
        return;
    }

    let bounds = hill.scene_bounds(RUNAWAY_BOUND_FACTOR);
    if !bounds.contains(state.position.x, state.position.y) || state.elapsed_secs > MAX_FLIGHT_SECS {
        log::warn!(
            "flight left the scene at ({:.1}, {:.1}) after {:.2}s; forcing landing",
            state.position.x,
            state.position.y,
            state.elapsed_secs
        );
        state.landed = true;
        state.forced_landing = true;
    }
}

/// Run a whole flight at the fixed path step and return every sample,
/// starting at the lip and ending at the landing point.
pub fn simulate_path(
    launch: &LaunchResult,
    hill: &HillGeometry,
    physics: &PhysicsConfig,
) -> Vec<PathSample> {
    simulate_path_with_step(launch, hill, physics, PATH_STEP_SECS)
}

/// [`simulate_path`] with an explicit step size.
pub fn simulate_path_with_step(
    launch: &LaunchResult,
    hill: &HillGeometry,
    physics: &PhysicsConfig,
    dt: f64,
) -> Vec<PathSample> {
    let mut state = FlightState::launch(launch, hill);
    let mut samples = vec![PathSample {
        t: 0.0,
        position: state.position,
    }];

    while !state.landed {
        step(&mut state, hill, physics, dt);
        samples.push(PathSample {
            t: state.elapsed_secs,
            position: state.position,
        });
    }
    samples
}

/// Airtime of an unassisted flight, used to normalise flight progress.
pub fn estimate_flight_duration(
    launch: &LaunchResult,
    hill: &HillGeometry,
    physics: &PhysicsConfig,
) -> f64 {
    simulate_path(launch, hill, physics)
        .last()
        .map(|s| s.t)
        .unwrap_or(0.0)
}

/// Distance an unassisted flight lands at, in metres.
pub fn landing_distance(
    launch: &LaunchResult,
    hill: &HillGeometry,
    physics: &PhysicsConfig,
    dt: f64,
) -> f64 {
    let mut state = FlightState::launch(launch, hill);
    while !state.landed {
        step(&mut state, hill, physics, dt);
    }
    state.distance_m
}
