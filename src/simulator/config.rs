//! Simulation configuration.

/// Configuration for a batch of simulated games.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of games to play
    pub num_games: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Take-off taps land uniformly within ± this many ms of the target
    pub launch_spread_ms: f64,

    /// Landing taps land uniformly within ± this much flight progress of the optimum
    pub landing_spread: f64,

    /// Chance that the player misses an input entirely and lets it time out
    pub skip_chance: f64,

    /// Chance of tapping the mid-flight boost
    pub boost_chance: f64,

    /// Frame length fed to the session
    pub frame_ms: u64,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per game)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_games: 1000,
            seed: None,
            launch_spread_ms: 250.0,
            landing_spread: 0.10,
            skip_chance: 0.02,
            boost_chance: 0.5,
            frame_ms: 16,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// A first-time player: loose timing, frequent misses.
    pub fn novice() -> Self {
        Self {
            launch_spread_ms: 500.0,
            landing_spread: 0.20,
            skip_chance: 0.08,
            boost_chance: 0.2,
            ..Default::default()
        }
    }

    /// A practised player: tight timing, always boosts.
    pub fn expert() -> Self {
        Self {
            launch_spread_ms: 120.0,
            landing_spread: 0.05,
            skip_chance: 0.0,
            boost_chance: 1.0,
            ..Default::default()
        }
    }
}
