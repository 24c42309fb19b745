//! Game configuration: every tunable the round loop reads, plus eager validation.
//!
//! A config is fixed for the lifetime of a session. Invalid values are
//! rejected before a game can start; nothing is re-checked mid-round.

use crate::constants::*;
use crate::jump::flight::PhysicsConfig;
use crate::jump::hill::{HillConfig, HillGeometry};
use crate::jump::landing::{LandingStyleGrade, LandingTable};
use crate::jump::launch::{LaunchParams, LaunchTable};
use crate::jump::scoring::GradeTier;
use crate::jump::timing::{TimingGrade, TimingThresholds};
use crate::jump::wind::WindRange;
use crate::persistence;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Durations of the timed phases, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimings {
    /// Intro before round one; longer to orient new players.
    pub first_intro_ms: u64,
    pub intro_ms: u64,
    /// Ideal take-off moment, measured from the start of the approach.
    pub approach_target_ms: u64,
    /// How long past the target the approach waits before forcing a Miss.
    pub approach_grace_ms: u64,
    pub landing_hold_ms: u64,
    pub score_display_ms: u64,
}

/// Flight-progress gates for taps during flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightGates {
    /// Taps before this progress are absorbed.
    pub boost_start: f64,
    /// Taps from here on resolve the landing; earlier ones boost.
    pub landing_min: f64,
    /// Progress at which a missing landing tap becomes a Crash.
    pub auto_crash: f64,
    pub boost_lift_mps: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Take-off error limits in milliseconds.
    pub launch_thresholds_ms: TimingThresholds,
    /// Landing error limits as a fraction of the estimated flight duration.
    pub landing_thresholds: TimingThresholds,
    pub optimal_landing_progress: f64,
    pub launch_table: LaunchTable,
    pub landing_table: LandingTable,
    pub wind: WindRange,
    pub hill: HillConfig,
    pub physics: PhysicsConfig,
    pub timings: PhaseTimings,
    pub flight_gates: FlightGates,
    /// Descending by minimum score; the last entry must cover a score of 0.
    pub grade_tiers: Vec<GradeTier>,
    /// One jumper per round, cycled if shorter than the game.
    pub jumpers: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            launch_thresholds_ms: TimingThresholds::new(
                LAUNCH_PERFECT_MS,
                LAUNCH_GOOD_MS,
                LAUNCH_OK_MS,
            ),
            landing_thresholds: TimingThresholds::new(
                LANDING_PERFECT_PROGRESS,
                LANDING_GOOD_PROGRESS,
                LANDING_OK_PROGRESS,
            ),
            optimal_landing_progress: OPTIMAL_LANDING_PROGRESS,
            launch_table: LaunchTable::default(),
            landing_table: LandingTable::default(),
            wind: WindRange {
                min_mps: WIND_MIN_MPS,
                max_mps: WIND_MAX_MPS,
            },
            hill: HillConfig {
                origin_x_px: LAUNCH_ORIGIN_X_PX,
                origin_y_px: LAUNCH_ORIGIN_Y_PX,
                ramp_height_m: RAMP_HEIGHT_M,
                slope: HILL_SLOPE,
                max_distance_m: MAX_DISTANCE_M,
                k_point_m: K_POINT_M,
                hill_size_m: HILL_SIZE_M,
            },
            physics: PhysicsConfig {
                gravity_mps2: STANDARD_GRAVITY_MPS2 * GRAVITY_SCALE,
                horizontal_drag: HORIZONTAL_DRAG,
                vertical_drag_scale: VERTICAL_DRAG_SCALE,
                reference_frame_rate: REFERENCE_FRAME_RATE,
                wind_influence: WIND_INFLUENCE,
            },
            timings: PhaseTimings {
                first_intro_ms: FIRST_INTRO_MS,
                intro_ms: INTRO_MS,
                approach_target_ms: APPROACH_TARGET_MS,
                approach_grace_ms: APPROACH_GRACE_MS,
                landing_hold_ms: LANDING_HOLD_MS,
                score_display_ms: SCORE_DISPLAY_MS,
            },
            flight_gates: FlightGates {
                boost_start: BOOST_WINDOW_START,
                landing_min: LANDING_WINDOW_START,
                auto_crash: AUTO_CRASH_PROGRESS,
                boost_lift_mps: BOOST_LIFT_MPS,
            },
            grade_tiers: vec![
                GradeTier::new(400.0, "Olympic Champion"),
                GradeTier::new(330.0, "World Cup Podium"),
                GradeTier::new(260.0, "National Team"),
                GradeTier::new(190.0, "Club Jumper"),
                GradeTier::new(110.0, "Weekend Warrior"),
                GradeTier::new(0.0, "Bunny Hill Rookie"),
            ],
            jumpers: vec![
                "Aino Lahti".to_string(),
                "Tomas Berger".to_string(),
                "Yuki Sato".to_string(),
                "Kari Dahl".to_string(),
                "Mika Rautio".to_string(),
            ],
        }
    }
}

/// Why a configuration was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Thresholds not finite, negative or not ascending.
    InvalidThresholds(&'static str),
    /// A better take-off grade is slower, or further from the optimal angle.
    LaunchTableNotMonotonic(TimingGrade),
    /// A better landing style pays less than a worse one.
    LandingTableNotMonotonic(LandingStyleGrade),
    NoGradeTiers,
    TiersNotDescending(usize),
    /// The lowest tier must cover a total of 0.
    LowestTierAboveZero(f64),
    InvalidWindRange { min_mps: f64, max_mps: f64 },
    InvalidValue { field: &'static str, value: f64 },
    InvalidFlightGates,
    OptimalProgressOutsideWindow(f64),
    ZeroDuration(&'static str),
    NoJumpers,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidThresholds(which) => {
                write!(f, "{which} thresholds must be non-negative and ascending")
            }
            ConfigError::LaunchTableNotMonotonic(grade) => {
                write!(f, "launch table entry for {} breaks grade ordering", grade.name())
            }
            ConfigError::LandingTableNotMonotonic(grade) => {
                write!(f, "landing multiplier for {} breaks grade ordering", grade.name())
            }
            ConfigError::NoGradeTiers => write!(f, "grade tier table is empty"),
            ConfigError::TiersNotDescending(index) => {
                write!(f, "grade tier {index} is not below the tier before it")
            }
            ConfigError::LowestTierAboveZero(min) => {
                write!(f, "lowest grade tier starts at {min}, must be 0 or less")
            }
            ConfigError::InvalidWindRange { min_mps, max_mps } => {
                write!(f, "wind range [{min_mps}, {max_mps}] is inverted or not finite")
            }
            ConfigError::InvalidValue { field, value } => {
                write!(f, "{field} has invalid value {value}")
            }
            ConfigError::InvalidFlightGates => write!(
                f,
                "flight gates must satisfy 0 <= boost_start < landing_min < auto_crash <= 1"
            ),
            ConfigError::OptimalProgressOutsideWindow(p) => {
                write!(f, "optimal landing progress {p} is outside the landing window")
            }
            ConfigError::ZeroDuration(which) => write!(f, "{which} must be longer than 0 ms"),
            ConfigError::NoJumpers => write!(f, "jumper roster is empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for io::Error {
    fn from(e: ConfigError) -> Self {
        io::Error::new(io::ErrorKind::InvalidInput, e)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

impl GameConfig {
    /// Check every invariant the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.launch_thresholds_ms.is_valid() {
            return Err(ConfigError::InvalidThresholds("launch"));
        }
        if !self.landing_thresholds.is_valid() {
            return Err(ConfigError::InvalidThresholds("landing"));
        }

        self.validate_launch_table()?;
        self.validate_landing_table()?;
        self.validate_tiers()?;

        let wind = self.wind;
        if !(wind.min_mps.is_finite() && wind.max_mps.is_finite()) || wind.min_mps > wind.max_mps {
            return Err(ConfigError::InvalidWindRange {
                min_mps: wind.min_mps,
                max_mps: wind.max_mps,
            });
        }

        positive("hill.ramp_height_m", self.hill.ramp_height_m)?;
        positive("hill.slope", self.hill.slope)?;
        positive("hill.max_distance_m", self.hill.max_distance_m)?;
        positive("hill.k_point_m", self.hill.k_point_m)?;
        positive("hill.hill_size_m", self.hill.hill_size_m)?;
        positive("physics.gravity_mps2", self.physics.gravity_mps2)?;
        positive("physics.reference_frame_rate", self.physics.reference_frame_rate)?;
        if !(0.0..1.0).contains(&self.physics.horizontal_drag) {
            return Err(ConfigError::InvalidValue {
                field: "physics.horizontal_drag",
                value: self.physics.horizontal_drag,
            });
        }
        if !(0.0..=1.0).contains(&self.physics.vertical_drag_scale) {
            return Err(ConfigError::InvalidValue {
                field: "physics.vertical_drag_scale",
                value: self.physics.vertical_drag_scale,
            });
        }
        if !(self.physics.wind_influence.is_finite() && self.physics.wind_influence >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "physics.wind_influence",
                value: self.physics.wind_influence,
            });
        }

        let gates = self.flight_gates;
        let ordered = 0.0 <= gates.boost_start
            && gates.boost_start < gates.landing_min
            && gates.landing_min < gates.auto_crash
            && gates.auto_crash <= 1.0;
        if !ordered || !(gates.boost_lift_mps.is_finite() && gates.boost_lift_mps >= 0.0) {
            return Err(ConfigError::InvalidFlightGates);
        }
        let optimal = self.optimal_landing_progress;
        if !(optimal > gates.landing_min && optimal < gates.auto_crash) {
            return Err(ConfigError::OptimalProgressOutsideWindow(optimal));
        }

        let t = self.timings;
        for (name, ms) in [
            ("first_intro_ms", t.first_intro_ms),
            ("intro_ms", t.intro_ms),
            ("approach_target_ms", t.approach_target_ms),
            ("approach_grace_ms", t.approach_grace_ms),
            ("landing_hold_ms", t.landing_hold_ms),
            ("score_display_ms", t.score_display_ms),
        ] {
            if ms == 0 {
                return Err(ConfigError::ZeroDuration(name));
            }
        }

        if self.jumpers.is_empty() {
            return Err(ConfigError::NoJumpers);
        }
        Ok(())
    }

    fn validate_launch_table(&self) -> Result<(), ConfigError> {
        let table = &self.launch_table;
        let optimum = table.optimal_angle();
        for grade in TimingGrade::ALL {
            let p = table.profile(grade);
            let angle_ok = p.angle_degrees.is_finite() && p.angle_degrees > 0.0 && p.angle_degrees < 90.0;
            if !angle_ok || !(p.speed_multiplier.is_finite() && p.speed_multiplier > 0.0) {
                return Err(ConfigError::LaunchTableNotMonotonic(grade));
            }
        }
        for pair in TimingGrade::ALL.windows(2) {
            let better = table.profile(pair[0]);
            let worse = table.profile(pair[1]);
            if better.speed_multiplier < worse.speed_multiplier
                || (better.angle_degrees - optimum).abs() > (worse.angle_degrees - optimum).abs()
            {
                return Err(ConfigError::LaunchTableNotMonotonic(pair[1]));
            }
        }
        Ok(())
    }

    fn validate_landing_table(&self) -> Result<(), ConfigError> {
        let table = &self.landing_table;
        for grade in LandingStyleGrade::ALL {
            let m = table.multiplier(grade);
            if !(m.is_finite() && m > 0.0) {
                return Err(ConfigError::LandingTableNotMonotonic(grade));
            }
        }
        for pair in LandingStyleGrade::ALL.windows(2) {
            if table.multiplier(pair[0]) < table.multiplier(pair[1]) {
                return Err(ConfigError::LandingTableNotMonotonic(pair[1]));
            }
        }
        Ok(())
    }

    fn validate_tiers(&self) -> Result<(), ConfigError> {
        let tiers = &self.grade_tiers;
        let last = tiers.last().ok_or(ConfigError::NoGradeTiers)?;
        for (i, pair) in tiers.windows(2).enumerate() {
            if !(pair[1].min_score < pair[0].min_score) {
                return Err(ConfigError::TiersNotDescending(i + 1));
            }
        }
        if !(last.min_score <= 0.0) {
            return Err(ConfigError::LowestTierAboveZero(last.min_score));
        }
        Ok(())
    }

    pub fn launch_params(&self) -> LaunchParams {
        LaunchParams {
            table: self.launch_table,
            ramp_height_m: self.hill.ramp_height_m,
            gravity_mps2: self.physics.gravity_mps2,
            wind_influence: self.physics.wind_influence,
        }
    }

    pub fn hill_geometry(&self) -> HillGeometry {
        HillGeometry::from_config(&self.hill)
    }

    /// Jumper for a round, cycling through the roster.
    pub fn jumper_for_round(&self, round_index: usize) -> &str {
        if self.jumpers.is_empty() {
            return "";
        }
        &self.jumpers[round_index % self.jumpers.len()]
    }

    pub fn intro_duration_ms(&self, round_index: usize) -> u64 {
        if round_index == 0 {
            self.timings.first_intro_ms
        } else {
            self.timings.intro_ms
        }
    }

    /// Parse and validate a config file. Missing fields take default values.
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `~/.skijump/config.json`, or the defaults if there is none.
    pub fn load() -> io::Result<Self> {
        let path = persistence::save_path(CONFIG_FILE)?;
        if !path.exists() {
            let config = GameConfig::default();
            config.validate()?;
            return Ok(config);
        }
        log::info!("loading config from {}", path.display());
        Self::load_from(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jump::launch::LaunchProfile;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_non_ascending_thresholds() {
        let mut config = GameConfig::default();
        config.launch_thresholds_ms = TimingThresholds::new(220.0, 100.0, 400.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidThresholds("launch"))
        );

        let mut config = GameConfig::default();
        config.landing_thresholds.ok = -0.1;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidThresholds("landing"))
        );
    }

    #[test]
    fn test_rejects_empty_tiers() {
        let mut config = GameConfig::default();
        config.grade_tiers.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoGradeTiers));
    }

    #[test]
    fn test_rejects_unsorted_tiers() {
        let mut config = GameConfig::default();
        config.grade_tiers.swap(0, 1);
        assert_eq!(config.validate(), Err(ConfigError::TiersNotDescending(1)));
    }

    #[test]
    fn test_rejects_tiers_not_covering_zero() {
        let mut config = GameConfig::default();
        config.grade_tiers.pop();
        assert_eq!(
            config.validate(),
            Err(ConfigError::LowestTierAboveZero(110.0))
        );
    }

    #[test]
    fn test_rejects_faster_worse_launch() {
        let mut config = GameConfig::default();
        config.launch_table.miss = LaunchProfile {
            angle_degrees: 20.0,
            speed_multiplier: 0.9,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::LaunchTableNotMonotonic(TimingGrade::Miss))
        );
    }

    #[test]
    fn test_rejects_better_grade_further_from_optimum() {
        let mut config = GameConfig::default();
        config.launch_table.good.angle_degrees = 26.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::LaunchTableNotMonotonic(TimingGrade::Ok))
        );
    }

    #[test]
    fn test_rejects_non_monotonic_landing_table() {
        let mut config = GameConfig::default();
        config.landing_table.crash = 1.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::LandingTableNotMonotonic(LandingStyleGrade::Crash))
        );
    }

    #[test]
    fn test_rejects_inverted_wind() {
        let mut config = GameConfig::default();
        config.wind = WindRange {
            min_mps: 2.0,
            max_mps: -2.0,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWindRange { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_gates() {
        let mut config = GameConfig::default();
        config.flight_gates.landing_min = 0.99;
        assert_eq!(config.validate(), Err(ConfigError::InvalidFlightGates));

        let mut config = GameConfig::default();
        config.optimal_landing_progress = 0.3;
        assert_eq!(
            config.validate(),
            Err(ConfigError::OptimalProgressOutsideWindow(0.3))
        );
    }

    #[test]
    fn test_rejects_bad_geometry_and_durations() {
        let mut config = GameConfig::default();
        config.hill.slope = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "hill.slope", .. })
        ));

        let mut config = GameConfig::default();
        config.timings.score_display_ms = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroDuration("score_display_ms"))
        );

        let mut config = GameConfig::default();
        config.jumpers.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoJumpers));
    }

    #[test]
    fn test_jumper_cycles_and_intro_pacing() {
        let config = GameConfig::default();
        assert_eq!(config.jumper_for_round(0), config.jumper_for_round(5));
        assert!(config.intro_duration_ms(0) > config.intro_duration_ms(1));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "optimal_landing_progress": 0.8 }"#).unwrap();
        assert!((config.optimal_landing_progress - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.grade_tiers, GameConfig::default().grade_tiers);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_load_from_rejects_invalid_file() {
        let path = std::env::temp_dir().join("skijump_config_invalid_test.json");
        fs::write(&path, r#"{ "grade_tiers": [] }"#).unwrap();
        let err = GameConfig::load_from(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_from_rejects_malformed_json() {
        let path = std::env::temp_dir().join("skijump_config_malformed_test.json");
        fs::write(&path, "{ not json").unwrap();
        let err = GameConfig::load_from(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::NoGradeTiers.to_string(),
            "grade tier table is empty"
        );
        assert_eq!(
            ConfigError::InvalidThresholds("launch").to_string(),
            "launch thresholds must be non-negative and ascending"
        );
    }
}
