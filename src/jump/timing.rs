//! Timing grader shared by take-off and landing.
//!
//! Both inputs are judged the same way: an absolute error is compared against
//! three ascending thresholds and the tightest one it fits into wins.

use serde::{Deserialize, Serialize};

/// Quality bucket for a timed input, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimingGrade {
    Perfect,
    Good,
    Ok,
    Miss,
}

impl TimingGrade {
    /// All grades ordered best to worst.
    pub const ALL: [TimingGrade; 4] = [
        TimingGrade::Perfect,
        TimingGrade::Good,
        TimingGrade::Ok,
        TimingGrade::Miss,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Perfect => "Perfect",
            Self::Good => "Good",
            Self::Ok => "OK",
            Self::Miss => "Miss",
        }
    }

    /// True if `self` is a strictly better grade than `other`.
    pub fn beats(&self, other: TimingGrade) -> bool {
        *self < other
    }
}

/// Ascending error limits for Perfect, Good and Ok. Anything above `ok` is a Miss.
///
/// Units are up to the caller: milliseconds for take-off, a fraction of the
/// estimated flight duration for landing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingThresholds {
    pub perfect: f64,
    pub good: f64,
    pub ok: f64,
}

impl TimingThresholds {
    pub fn new(perfect: f64, good: f64, ok: f64) -> Self {
        Self { perfect, good, ok }
    }

    /// True when all limits are finite, non-negative and ascending.
    pub fn is_valid(&self) -> bool {
        let limits = [self.perfect, self.good, self.ok];
        limits.iter().all(|l| l.is_finite() && *l >= 0.0)
            && self.perfect <= self.good
            && self.good <= self.ok
    }
}

/// Grade an absolute timing error. Ties go to the tighter grade.
///
/// `error` must be finite and non-negative; callers take `abs()` first.
pub fn grade(error: f64, thresholds: &TimingThresholds) -> TimingGrade {
    debug_assert!(error.is_finite() && error >= 0.0, "bad timing error {error}");

    if error <= thresholds.perfect {
        TimingGrade::Perfect
    } else if error <= thresholds.good {
        TimingGrade::Good
    } else if error <= thresholds.ok {
        TimingGrade::Ok
    } else {
        TimingGrade::Miss
    }
}
