//! Game balance simulator CLI.
//!
//! Plays simulated games with synthetic players to check scoring balance.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                    # Default: 1000 games, average player
//!   cargo run --bin simulate -- -n 100 --expert # 100 games, tight timing
//!   cargo run --bin simulate -- --seed 42       # Reproducible run

use skijump::config::GameConfig;
use skijump::simulator::{run_simulation, SimConfig};
use std::env;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let sim = parse_args(&args);

    let game_config = match GameConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid game config: {}", e);
            std::process::exit(1);
        }
    };

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              SKI JUMP BALANCE SIMULATOR                       ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Games:          {}", sim.num_games);
    println!("  Launch Spread:  ±{:.0} ms", sim.launch_spread_ms);
    println!("  Landing Spread: ±{:.2} progress", sim.landing_spread);
    println!("  Skip Chance:    {:.0}%", sim.skip_chance * 100.0);
    println!("  Boost Chance:   {:.0}%", sim.boost_chance * 100.0);
    if let Some(seed) = sim.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&sim, &game_config);

    println!("{}", report.to_text());

    // Optionally save JSON report
    if args.iter().any(|a| a == "--json") {
        let json = report.to_json();
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, json) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => {
                eprintln!("Failed to write JSON report: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn parse_args(args: &[String]) -> SimConfig {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--games" => {
                if i + 1 < args.len() {
                    config.num_games = args[i + 1].parse().unwrap_or(1000);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if i + 1 < args.len() {
                    config.seed = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--launch-spread" => {
                if i + 1 < args.len() {
                    if let Ok(ms) = args[i + 1].parse::<f64>() {
                        config.launch_spread_ms = ms.max(0.0);
                        i += 1;
                    }
                }
            }
            "--landing-spread" => {
                if i + 1 < args.len() {
                    if let Ok(p) = args[i + 1].parse::<f64>() {
                        config.landing_spread = p.max(0.0);
                        i += 1;
                    }
                }
            }
            "--skip" => {
                if i + 1 < args.len() {
                    if let Ok(p) = args[i + 1].parse::<f64>() {
                        config.skip_chance = p.clamp(0.0, 1.0);
                        i += 1;
                    }
                }
            }
            "--novice" => {
                config = SimConfig {
                    num_games: config.num_games,
                    seed: config.seed,
                    ..SimConfig::novice()
                };
            }
            "--expert" => {
                config = SimConfig {
                    num_games: config.num_games,
                    seed: config.seed,
                    ..SimConfig::expert()
                };
            }
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn print_help() {
    println!("Ski Jump Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --games <N>         Number of games (default: 1000)");
    println!("    -s, --seed <S>          Random seed for reproducibility");
    println!("    --launch-spread <MS>    Take-off tap spread around the target (default: 250)");
    println!("    --landing-spread <P>    Landing tap spread around the optimum (default: 0.10)");
    println!("    --skip <P>              Chance of missing an input entirely (default: 0.02)");
    println!("    --novice                Loose timing preset");
    println!("    --expert                Tight timing preset");
    println!("    -v, --verbose           Print every game");
    println!("    --json                  Save JSON report");
    println!("    -h, --help              Show this help");
    println!();
    println!("The game config is read from ~/.skijump/config.json when present.");
    println!("Set RUST_LOG=debug to trace phase transitions on stderr.");
}
