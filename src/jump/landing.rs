//! Landing model: timing grade at touchdown to a style multiplier.

use super::timing::TimingGrade;
use serde::{Deserialize, Serialize};

/// Landing style, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LandingStyleGrade {
    Telemark,
    Clean,
    Shaky,
    Crash,
}

impl LandingStyleGrade {
    pub const ALL: [LandingStyleGrade; 4] = [
        LandingStyleGrade::Telemark,
        LandingStyleGrade::Clean,
        LandingStyleGrade::Shaky,
        LandingStyleGrade::Crash,
    ];

    /// Each timing grade maps to exactly one style.
    pub fn from_timing(grade: TimingGrade) -> Self {
        match grade {
            TimingGrade::Perfect => Self::Telemark,
            TimingGrade::Good => Self::Clean,
            TimingGrade::Ok => Self::Shaky,
            TimingGrade::Miss => Self::Crash,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Telemark => "Telemark",
            Self::Clean => "Clean",
            Self::Shaky => "Shaky",
            Self::Crash => "Crash",
        }
    }
}

/// Distance multipliers per landing style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingTable {
    pub telemark: f64,
    pub clean: f64,
    pub shaky: f64,
    pub crash: f64,
}

impl LandingTable {
    pub fn multiplier(&self, grade: LandingStyleGrade) -> f64 {
        match grade {
            LandingStyleGrade::Telemark => self.telemark,
            LandingStyleGrade::Clean => self.clean,
            LandingStyleGrade::Shaky => self.shaky,
            LandingStyleGrade::Crash => self.crash,
        }
    }
}

impl Default for LandingTable {
    fn default() -> Self {
        Self {
            telemark: 1.30,
            clean: 1.10,
            shaky: 0.95,
            crash: 0.70,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingResult {
    pub grade: LandingStyleGrade,
    pub distance_multiplier: f64,
}

pub fn compute_landing(grade: LandingStyleGrade, table: &LandingTable) -> LandingResult {
    LandingResult {
        grade,
        distance_multiplier: table.multiplier(grade),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crash_penalty_applies() {
        let landing = compute_landing(LandingStyleGrade::Crash, &LandingTable::default());
        assert!((landing.distance_multiplier - 0.7).abs() < f64::EPSILON);
        assert!((100.0 * landing.distance_multiplier - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_telemark_is_a_reward() {
        let landing = compute_landing(LandingStyleGrade::Telemark, &LandingTable::default());
        assert!(landing.distance_multiplier > 1.0);
    }

    #[test]
    fn test_default_table_is_monotonic() {
        let table = LandingTable::default();
        for pair in LandingStyleGrade::ALL.windows(2) {
            assert!(
                table.multiplier(pair[0]) > table.multiplier(pair[1]),
                "{:?} should beat {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_timing_maps_to_style() {
        assert_eq!(
            LandingStyleGrade::from_timing(TimingGrade::Perfect),
            LandingStyleGrade::Telemark
        );
        assert_eq!(
            LandingStyleGrade::from_timing(TimingGrade::Good),
            LandingStyleGrade::Clean
        );
        assert_eq!(
            LandingStyleGrade::from_timing(TimingGrade::Ok),
            LandingStyleGrade::Shaky
        );
        assert_eq!(
            LandingStyleGrade::from_timing(TimingGrade::Miss),
            LandingStyleGrade::Crash
        );
    }
}
