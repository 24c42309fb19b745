//! Integration test: balance simulator and config files
//!
//! Runs small seeded batches of synthetic games and loads config files from
//! disk the way the binaries do.

use skijump::config::{ConfigError, GameConfig};
use skijump::simulator::{run_simulation, SimConfig};
use std::fs;
use std::io;
use std::path::PathBuf;

fn small_batch(sim: SimConfig, seed: u64) -> SimConfig {
    SimConfig {
        num_games: 20,
        seed: Some(seed),
        verbosity: 0,
        ..sim
    }
}

fn temp_config(name: &str, json: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    fs::write(&path, json).unwrap();
    path
}

// =============================================================================
// Simulator
// =============================================================================

#[test]
fn test_seeded_runs_are_reproducible() {
    let sim = small_batch(SimConfig::default(), 1234);
    let config = GameConfig::default();
    assert_eq!(run_simulation(&sim, &config), run_simulation(&sim, &config));
}

#[test]
fn test_every_game_finishes() {
    let report = run_simulation(&small_batch(SimConfig::novice(), 7), &GameConfig::default());
    assert_eq!(report.num_games, 20);
    assert_eq!(report.games_completed, 20);
    assert!(report.min_total <= report.median_total);
    assert!(report.median_total <= report.max_total);
    assert!(report.longest_round <= GameConfig::default().hill.max_distance_m);

    let tier_games: u32 = report.tier_distribution.iter().map(|t| t.count).sum();
    assert_eq!(tier_games, 20);
    let launches: u32 = report.launch_grades.iter().map(|t| t.count).sum();
    assert_eq!(launches, 100);
}

#[test]
fn test_experts_outscore_novices() {
    let config = GameConfig::default();
    let novice = run_simulation(&small_batch(SimConfig::novice(), 99), &config);
    let expert = run_simulation(&small_batch(SimConfig::expert(), 99), &config);
    assert!(
        expert.avg_total > novice.avg_total,
        "expert {:.1} vs novice {:.1}",
        expert.avg_total,
        novice.avg_total
    );
}

#[test]
fn test_player_who_never_taps_is_always_forced() {
    let sim = SimConfig {
        skip_chance: 1.0,
        ..small_batch(SimConfig::default(), 5)
    };
    let report = run_simulation(&sim, &GameConfig::default());
    assert!((report.forced_launch_rate - 1.0).abs() < 1e-9);
    assert!((report.forced_landing_rate - 1.0).abs() < 1e-9);
}

#[test]
fn test_report_renders_text_and_json() {
    let report = run_simulation(&small_batch(SimConfig::default(), 3), &GameConfig::default());
    assert!(report.to_text().contains("Games"));

    let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
    assert_eq!(json["num_games"], 20);
    assert!(json["tier_distribution"].is_array());
}

// =============================================================================
// Config files
// =============================================================================

#[test]
fn test_partial_config_file_keeps_defaults() {
    let path = temp_config(
        "skijump_partial_config.json",
        r#"{ "optimal_landing_progress": 0.8, "jumpers": ["Solo"] }"#,
    );
    let config = GameConfig::load_from(&path).unwrap();
    fs::remove_file(&path).ok();

    assert!((config.optimal_landing_progress - 0.8).abs() < f64::EPSILON);
    assert_eq!(config.jumper_for_round(3), "Solo");
    assert_eq!(config.grade_tiers, GameConfig::default().grade_tiers);
}

#[test]
fn test_malformed_config_file_is_invalid_data() {
    let path = temp_config("skijump_malformed_config.json", "{ not json");
    let err = GameConfig::load_from(&path).unwrap_err();
    fs::remove_file(&path).ok();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn test_inconsistent_config_file_is_rejected() {
    let path = temp_config(
        "skijump_inconsistent_config.json",
        r#"{ "grade_tiers": [] }"#,
    );
    let err = GameConfig::load_from(&path).unwrap_err();
    fs::remove_file(&path).ok();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    assert!(err.to_string().contains(&ConfigError::NoGradeTiers.to_string()));
}
