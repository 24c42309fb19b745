//! Launch model: take-off grade plus wind to an exit velocity.

use super::timing::TimingGrade;
use super::wind::WindSample;
use serde::{Deserialize, Serialize};

/// Take-off angle and speed factor for one grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchProfile {
    pub angle_degrees: f64,
    pub speed_multiplier: f64,
}

/// Fixed per-grade take-off profiles. No randomness: the same grade always
/// produces the same flight shape, so challenge comparisons stay fair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchTable {
    pub perfect: LaunchProfile,
    pub good: LaunchProfile,
    pub ok: LaunchProfile,
    pub miss: LaunchProfile,
}

impl LaunchTable {
    pub fn profile(&self, grade: TimingGrade) -> LaunchProfile {
        match grade {
            TimingGrade::Perfect => self.perfect,
            TimingGrade::Good => self.good,
            TimingGrade::Ok => self.ok,
            TimingGrade::Miss => self.miss,
        }
    }

    /// The Perfect angle is the optimum the other grades fall away from.
    pub fn optimal_angle(&self) -> f64 {
        self.perfect.angle_degrees
    }
}

impl Default for LaunchTable {
    fn default() -> Self {
        Self {
            perfect: LaunchProfile {
                angle_degrees: 38.0,
                speed_multiplier: 1.30,
            },
            good: LaunchProfile {
                angle_degrees: 34.0,
                speed_multiplier: 1.05,
            },
            ok: LaunchProfile {
                angle_degrees: 28.0,
                speed_multiplier: 0.80,
            },
            miss: LaunchProfile {
                angle_degrees: 20.0,
                speed_multiplier: 0.55,
            },
        }
    }
}

/// Everything the launch computation needs besides the grade and wind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchParams {
    pub table: LaunchTable,
    pub ramp_height_m: f64,
    pub gravity_mps2: f64,
    pub wind_influence: f64,
}

/// Result of the take-off. Velocity is in m/s in screen orientation:
/// positive `vx` travels down the hill, negative `vy` is upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchResult {
    pub grade: TimingGrade,
    pub angle_degrees: f64,
    pub speed_multiplier: f64,
    pub exit_speed_mps: f64,
    pub vx_mps: f64,
    pub vy_mps: f64,
}

/// Exit speed at the lip for a frictionless in-run of the given drop.
pub fn base_speed(ramp_height_m: f64, gravity_mps2: f64) -> f64 {
    (2.0 * gravity_mps2 * ramp_height_m).sqrt()
}

/// Compute the take-off for a grade and the round's wind.
///
/// Wind only nudges the horizontal component; it never touches `vy`.
pub fn compute_launch(grade: TimingGrade, wind: WindSample, params: &LaunchParams) -> LaunchResult {
    let profile = params.table.profile(grade);
    let exit_speed = base_speed(params.ramp_height_m, params.gravity_mps2) * profile.speed_multiplier;
    let angle = profile.angle_degrees.to_radians();

    LaunchResult {
        grade,
        angle_degrees: profile.angle_degrees,
        speed_multiplier: profile.speed_multiplier,
        exit_speed_mps: exit_speed,
        vx_mps: exit_speed * angle.cos() + wind.speed() * params.wind_influence,
        vy_mps: -exit_speed * angle.sin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{GRAVITY_SCALE, RAMP_HEIGHT_M, STANDARD_GRAVITY_MPS2, WIND_INFLUENCE};

    fn params() -> LaunchParams {
        LaunchParams {
            table: LaunchTable::default(),
            ramp_height_m: RAMP_HEIGHT_M,
            gravity_mps2: STANDARD_GRAVITY_MPS2 * GRAVITY_SCALE,
            wind_influence: WIND_INFLUENCE,
        }
    }

    #[test]
    fn test_perfect_profile() {
        let launch = compute_launch(TimingGrade::Perfect, WindSample::CALM, &params());
        assert_eq!(launch.grade, TimingGrade::Perfect);
        assert!((launch.angle_degrees - 38.0).abs() < f64::EPSILON);
        assert!((launch.speed_multiplier - 1.30).abs() < f64::EPSILON);
    }

    #[test]
    fn test_base_speed_from_energy() {
        let v = base_speed(20.0, 10.0);
        assert!((v - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_components_match_angle_and_speed() {
        let p = params();
        let launch = compute_launch(TimingGrade::Good, WindSample::CALM, &p);
        let speed = (launch.vx_mps.powi(2) + launch.vy_mps.powi(2)).sqrt();
        assert!((speed - launch.exit_speed_mps).abs() < 1e-9);
        assert!(launch.vy_mps < 0.0, "take-off should be upward");
        let angle = (-launch.vy_mps).atan2(launch.vx_mps).to_degrees();
        assert!((angle - 34.0).abs() < 1e-9);
    }

    #[test]
    fn test_wind_only_changes_horizontal() {
        let p = params();
        let calm = compute_launch(TimingGrade::Ok, WindSample::CALM, &p);
        let tail = compute_launch(TimingGrade::Ok, WindSample(2.0), &p);
        let head = compute_launch(TimingGrade::Ok, WindSample(-2.0), &p);
        assert!((tail.vy_mps - calm.vy_mps).abs() < f64::EPSILON);
        assert!((head.vy_mps - calm.vy_mps).abs() < f64::EPSILON);
        assert!((tail.vx_mps - calm.vx_mps - 0.6).abs() < 1e-9);
        assert!((calm.vx_mps - head.vx_mps - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_launch_is_deterministic() {
        let p = params();
        for grade in TimingGrade::ALL {
            let a = compute_launch(grade, WindSample(1.7), &p);
            let b = compute_launch(grade, WindSample(1.7), &p);
            assert_eq!(a.vx_mps.to_bits(), b.vx_mps.to_bits());
            assert_eq!(a.vy_mps.to_bits(), b.vy_mps.to_bits());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_default_table_is_monotonic() {
        let table = LaunchTable::default();
        let optimum = table.optimal_angle();
        for pair in TimingGrade::ALL.windows(2) {
            let better = table.profile(pair[0]);
            let worse = table.profile(pair[1]);
            assert!(better.speed_multiplier >= worse.speed_multiplier);
            assert!(
                (better.angle_degrees - optimum).abs() <= (worse.angle_degrees - optimum).abs()
            );
        }
    }
}
