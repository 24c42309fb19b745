// Scene scale. The only pixel/metre conversion in the crate: hill markers and
// scored distances both go through `HillGeometry`, which reads this value.
pub const PIXELS_PER_METRE: f64 = 5.0;

// Game shape
pub const ROUNDS_PER_GAME: usize = 5;
pub const COUNTED_ROUNDS: usize = 3;

// Physics (arcade tuning, not real aerodynamics)
pub const STANDARD_GRAVITY_MPS2: f64 = 9.81;
pub const GRAVITY_SCALE: f64 = 2.25;
pub const HORIZONTAL_DRAG: f64 = 0.0025;
pub const VERTICAL_DRAG_SCALE: f64 = 0.45;
pub const REFERENCE_FRAME_RATE: f64 = 60.0;
pub const WIND_INFLUENCE: f64 = 0.30;

// Simulation stepping
pub const PATH_STEP_SECS: f64 = 1.0 / 60.0;
pub const MAX_FRAME_MS: u64 = 100;
pub const MAX_STEP_SECS: f64 = 0.05;
pub const MAX_FLIGHT_SECS: f64 = 20.0;
pub const RUNAWAY_BOUND_FACTOR: f64 = 2.0;

// Hill geometry
pub const LAUNCH_ORIGIN_X_PX: f64 = 120.0;
pub const LAUNCH_ORIGIN_Y_PX: f64 = 60.0;
pub const RAMP_HEIGHT_M: f64 = 32.0;
pub const HILL_SLOPE: f64 = 0.70;
pub const MAX_DISTANCE_M: f64 = 180.0;
pub const K_POINT_M: f64 = 120.0;
pub const HILL_SIZE_M: f64 = 140.0;

// Launch timing (milliseconds from the ideal take-off moment)
pub const LAUNCH_PERFECT_MS: f64 = 100.0;
pub const LAUNCH_GOOD_MS: f64 = 220.0;
pub const LAUNCH_OK_MS: f64 = 400.0;

// Landing timing (fraction of estimated flight duration)
pub const LANDING_PERFECT_PROGRESS: f64 = 0.04;
pub const LANDING_GOOD_PROGRESS: f64 = 0.09;
pub const LANDING_OK_PROGRESS: f64 = 0.16;
pub const OPTIMAL_LANDING_PROGRESS: f64 = 0.78;

// Flight input gates (fraction of estimated flight duration)
pub const BOOST_WINDOW_START: f64 = 0.10;
pub const LANDING_WINDOW_START: f64 = 0.50;
pub const AUTO_CRASH_PROGRESS: f64 = 0.98;
pub const BOOST_LIFT_MPS: f64 = 1.5;

// Phase durations
pub const FIRST_INTRO_MS: u64 = 2500;
pub const INTRO_MS: u64 = 1500;
pub const APPROACH_TARGET_MS: u64 = 2000;
pub const APPROACH_GRACE_MS: u64 = 600;
pub const LANDING_HOLD_MS: u64 = 700;
pub const SCORE_DISPLAY_MS: u64 = 2000;

// Wind (m/s, negative = headwind)
pub const WIND_MIN_MPS: f64 = -3.0;
pub const WIND_MAX_MPS: f64 = 3.0;

// Persistence
pub const SAVE_DIR_NAME: &str = ".skijump";
pub const CONFIG_FILE: &str = "config.json";
pub const SCORES_FILE: &str = "scores.json";
pub const LOG_FILE: &str = "skijump.log";
