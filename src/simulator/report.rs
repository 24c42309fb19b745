//! Simulation report generation.

use super::runner::GameStats;
use crate::jump::landing::LandingStyleGrade;
use crate::jump::scoring::GradeTier;
use crate::jump::timing::TimingGrade;
use serde::Serialize;

/// How often one label came up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u32,
}

/// Aggregated results from many simulated games.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    pub num_games: u32,
    pub games_completed: u32,

    // Totals
    pub avg_total: f64,
    pub min_total: f64,
    pub median_total: f64,
    pub max_total: f64,

    // Rounds
    pub avg_round_distance: f64,
    pub longest_round: f64,
    pub forced_launch_rate: f64,
    pub forced_landing_rate: f64,
    pub avg_boosts_per_game: f64,

    // Distributions, in table order
    pub tier_distribution: Vec<LabelCount>,
    pub launch_grades: Vec<LabelCount>,
    pub landing_grades: Vec<LabelCount>,
}

impl SimReport {
    /// Create a report from finished games. `tiers` fixes the tier order.
    pub fn from_games(games: &[GameStats], tiers: &[GradeTier]) -> Self {
        let num_games = games.len() as u32;
        let finished: Vec<&GameStats> = games.iter().filter(|g| g.completed).collect();
        let games_completed = finished.len() as u32;
        let divisor = games_completed.max(1) as f64;

        let mut totals: Vec<f64> = finished.iter().map(|g| g.total_score).collect();
        totals.sort_by(|a, b| a.total_cmp(b));
        let avg_total = totals.iter().sum::<f64>() / divisor;
        let min_total = totals.first().copied().unwrap_or(0.0);
        let max_total = totals.last().copied().unwrap_or(0.0);
        let median_total = totals.get(totals.len() / 2).copied().unwrap_or(0.0);

        let distances: Vec<f64> = finished.iter().flat_map(|g| g.distances.iter().copied()).collect();
        let rounds = distances.len().max(1) as f64;
        let avg_round_distance = distances.iter().sum::<f64>() / rounds;
        let longest_round = distances.iter().copied().fold(0.0, f64::max);

        let forced_launches: u32 = finished.iter().map(|g| g.forced_launches).sum();
        let forced_landings: u32 = finished.iter().map(|g| g.forced_landings).sum();
        let boosts: u32 = finished.iter().map(|g| g.boosts).sum();

        let tier_distribution = tiers
            .iter()
            .map(|t| LabelCount {
                label: t.label.clone(),
                count: finished.iter().filter(|g| g.tier == t.label).count() as u32,
            })
            .collect();

        let launch_grades = TimingGrade::ALL
            .iter()
            .map(|grade| LabelCount {
                label: grade.name().to_string(),
                count: finished
                    .iter()
                    .flat_map(|g| g.launch_grades.iter())
                    .filter(|g| *g == grade)
                    .count() as u32,
            })
            .collect();

        let landing_grades = LandingStyleGrade::ALL
            .iter()
            .map(|grade| LabelCount {
                label: grade.name().to_string(),
                count: finished
                    .iter()
                    .flat_map(|g| g.landing_grades.iter())
                    .filter(|g| *g == grade)
                    .count() as u32,
            })
            .collect();

        Self {
            num_games,
            games_completed,
            avg_total,
            min_total,
            median_total,
            max_total,
            avg_round_distance,
            longest_round,
            forced_launch_rate: forced_launches as f64 / rounds,
            forced_landing_rate: forced_landings as f64 / rounds,
            avg_boosts_per_game: boosts as f64 / divisor,
            tier_distribution,
            launch_grades,
            landing_grades,
        }
    }

    /// Generate a human-readable text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Games: {} total, {} completed\n\n",
            self.num_games, self.games_completed
        ));

        report.push_str("── TOTAL SCORE (best 3 of 5) ────────────────────────────────────\n");
        report.push_str(&format!("  Average:   {:.1}\n", self.avg_total));
        report.push_str(&format!("  Min:       {:.1}\n", self.min_total));
        report.push_str(&format!("  Median:    {:.1}\n", self.median_total));
        report.push_str(&format!("  Max:       {:.1}\n\n", self.max_total));

        report.push_str("── ROUNDS ───────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Distance:        {:.1} m\n",
            self.avg_round_distance
        ));
        report.push_str(&format!("  Longest Jump:        {:.1} m\n", self.longest_round));
        report.push_str(&format!(
            "  Forced Take-offs:    {:.1}%\n",
            self.forced_launch_rate * 100.0
        ));
        report.push_str(&format!(
            "  Forced Landings:     {:.1}%\n",
            self.forced_landing_rate * 100.0
        ));
        report.push_str(&format!(
            "  Boosts per Game:     {:.2}\n\n",
            self.avg_boosts_per_game
        ));

        let sections = [
            ("── GRADE TIERS ──────────────────────────────────────────────────\n", &self.tier_distribution, self.games_completed),
            ("── TAKE-OFF GRADES ──────────────────────────────────────────────\n", &self.launch_grades, total_count(&self.launch_grades)),
            ("── LANDING STYLES ───────────────────────────────────────────────\n", &self.landing_grades, total_count(&self.landing_grades)),
        ];
        for (title, counts, total) in sections {
            report.push_str(title);
            for entry in counts {
                let pct = entry.count as f64 / total.max(1) as f64 * 100.0;
                let bar: String = "█".repeat((pct / 5.0) as usize);
                report.push_str(&format!("  {:<18} {:>5.1}% {}\n", entry.label, pct, bar));
            }
            report.push('\n');
        }

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn total_count(counts: &[LabelCount]) -> u32 {
    counts.iter().map(|c| c.count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(total: f64, tier: &str, forced_landings: u32) -> GameStats {
        GameStats {
            total_score: total,
            tier: tier.to_string(),
            distances: vec![total / 3.0; 5],
            launch_grades: vec![TimingGrade::Good; 5],
            landing_grades: vec![LandingStyleGrade::Clean; 5],
            forced_launches: 0,
            forced_landings,
            boosts: 1,
            completed: true,
        }
    }

    fn tiers() -> Vec<GradeTier> {
        vec![GradeTier::new(300.0, "Gold"), GradeTier::new(0.0, "Bronze")]
    }

    #[test]
    fn test_report_generation() {
        let games = vec![game(330.0, "Gold", 0), game(150.0, "Bronze", 5)];
        let report = SimReport::from_games(&games, &tiers());

        assert_eq!(report.num_games, 2);
        assert_eq!(report.games_completed, 2);
        assert!((report.avg_total - 240.0).abs() < 1e-9);
        assert!((report.min_total - 150.0).abs() < 1e-9);
        assert!((report.max_total - 330.0).abs() < 1e-9);
        assert!((report.forced_landing_rate - 0.5).abs() < 1e-9);
        assert_eq!(
            report.tier_distribution,
            vec![
                LabelCount { label: "Gold".to_string(), count: 1 },
                LabelCount { label: "Bronze".to_string(), count: 1 },
            ]
        );
        assert_eq!(report.launch_grades[1].label, "Good");
        assert_eq!(report.launch_grades[1].count, 10);
    }

    #[test]
    fn test_incomplete_games_excluded() {
        let mut stuck = game(0.0, "", 0);
        stuck.completed = false;
        let report = SimReport::from_games(&[game(200.0, "Bronze", 0), stuck], &tiers());
        assert_eq!(report.num_games, 2);
        assert_eq!(report.games_completed, 1);
        assert!((report.avg_total - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_report() {
        let report = SimReport::from_games(&[], &tiers());
        assert_eq!(report.games_completed, 0);
        assert!(report.avg_total.abs() < f64::EPSILON);
        assert!(report.to_text().contains("SIMULATION REPORT"));
    }

    #[test]
    fn test_json_has_fields() {
        let report = SimReport::from_games(&[game(250.0, "Bronze", 0)], &tiers());
        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["games_completed"], 1);
        assert_eq!(json["tier_distribution"][1]["label"], "Bronze");
    }
}
