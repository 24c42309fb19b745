//! Per-round wind.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Wind speed in m/s for one round. Negative is a headwind, positive a tailwind.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindSample(pub f64);

impl WindSample {
    pub const CALM: WindSample = WindSample(0.0);

    pub fn speed(&self) -> f64 {
        self.0
    }

    pub fn is_headwind(&self) -> bool {
        self.0 < 0.0
    }

    /// Short label for HUDs, e.g. "+1.4 m/s tail".
    pub fn label(&self) -> String {
        let kind = if self.0 < 0.0 {
            "head"
        } else if self.0 > 0.0 {
            "tail"
        } else {
            "calm"
        };
        format!("{:+.1} m/s {}", self.0, kind)
    }
}

/// Inclusive range winds are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindRange {
    pub min_mps: f64,
    pub max_mps: f64,
}

impl WindRange {
    pub fn contains(&self, wind: WindSample) -> bool {
        (self.min_mps..=self.max_mps).contains(&wind.0)
    }
}

/// Draw one wind sample uniformly from `range`.
pub fn sample_wind<R: Rng>(range: &WindRange, rng: &mut R) -> WindSample {
    if range.max_mps <= range.min_mps {
        return WindSample(range.min_mps);
    }
    WindSample(rng.gen_range(range.min_mps..=range.max_mps))
}
