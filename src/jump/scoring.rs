//! Round results, best-three aggregation and grade tiers.

use super::landing::LandingStyleGrade;
use super::timing::TimingGrade;
use super::wind::WindSample;
use crate::constants::COUNTED_ROUNDS;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Outcome of one resolved round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round_index: usize,
    pub jumper: String,
    pub launch_grade: TimingGrade,
    pub raw_distance_m: f64,
    pub landing_grade: LandingStyleGrade,
    pub final_distance_m: f64,
    pub wind: WindSample,
    /// Only filled in by [`finalize`], once every round is in.
    pub counted: bool,
}

/// Named band of total score, e.g. "Olympic Champion".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeTier {
    pub min_score: f64,
    pub label: String,
}

impl GradeTier {
    pub fn new(min_score: f64, label: &str) -> Self {
        Self {
            min_score,
            label: label.to_string(),
        }
    }
}

/// Final result of a five-round game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub rounds: Vec<RoundResult>,
    pub total_score: f64,
    pub grade_tier: GradeTier,
}

impl GameResult {
    pub fn counted_rounds(&self) -> impl Iterator<Item = &RoundResult> {
        self.rounds.iter().filter(|r| r.counted)
    }

    pub fn best_round(&self) -> Option<&RoundResult> {
        self.rounds
            .iter()
            .min_by(|a, b| compare_for_selection(a, b))
    }
}

/// Round a distance to the 0.1 m shown on the scoreboard.
pub fn round_distance(metres: f64) -> f64 {
    (metres * 10.0).round() / 10.0
}

/// Final distance for a round: raw flight distance times the landing multiplier.
pub fn final_distance(raw_distance_m: f64, multiplier: f64) -> f64 {
    round_distance(raw_distance_m * multiplier)
}

/// Longer jumps first; on an exact tie the earlier round wins.
fn compare_for_selection(a: &RoundResult, b: &RoundResult) -> Ordering {
    b.final_distance_m
        .total_cmp(&a.final_distance_m)
        .then(a.round_index.cmp(&b.round_index))
}

/// Indices (into `rounds`) of the rounds that count toward the total.
pub fn select_counted(rounds: &[RoundResult]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rounds.len()).collect();
    order.sort_by(|&a, &b| compare_for_selection(&rounds[a], &rounds[b]));
    order.truncate(COUNTED_ROUNDS);
    order.sort_unstable();
    order
}

/// First tier whose minimum is at or below `score`. Falls back to the lowest
/// tier for scores under every minimum.
pub fn resolve_tier(tiers: &[GradeTier], score: f64) -> Option<&GradeTier> {
    tiers
        .iter()
        .find(|t| t.min_score <= score)
        .or_else(|| tiers.last())
}

/// Mark the counted rounds, total them and pick the tier.
pub fn finalize(mut rounds: Vec<RoundResult>, tiers: &[GradeTier]) -> GameResult {
    let counted = select_counted(&rounds);
    for (i, round) in rounds.iter_mut().enumerate() {
        round.counted = counted.contains(&i);
    }

    let total_score = round_distance(
        rounds
            .iter()
            .filter(|r| r.counted)
            .map(|r| r.final_distance_m)
            .sum(),
    );

    let grade_tier = resolve_tier(tiers, total_score)
        .cloned()
        .unwrap_or_else(|| GradeTier::new(0.0, "Unranked"));

    GameResult {
        rounds,
        total_score,
        grade_tier,
    }
}
