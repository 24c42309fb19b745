//! Simulation runner: plays whole games through `GameSession` with a
//! synthetic player and collects per-game statistics.

use super::config::SimConfig;
use super::report::SimReport;
use crate::config::GameConfig;
use crate::jump::landing::LandingStyleGrade;
use crate::jump::timing::TimingGrade;
use crate::session::{GameSession, Phase, PhaseToken, SessionEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Frames after which a game is abandoned. Far beyond any real game length.
const MAX_FRAMES_PER_GAME: u32 = 200_000;

/// Statistics from one simulated game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStats {
    pub total_score: f64,
    pub tier: String,
    pub distances: Vec<f64>,
    pub launch_grades: Vec<TimingGrade>,
    pub landing_grades: Vec<LandingStyleGrade>,
    pub forced_launches: u32,
    pub forced_landings: u32,
    pub boosts: u32,
    pub completed: bool,
}

/// When the synthetic player intends to tap in the current phase.
#[derive(Debug, Clone, Copy)]
enum TapPlan {
    None,
    /// Take-off tap at this many ms into the approach
    LaunchAt(u64),
    /// Optional boost progress, then landing progress
    Flight { boost_at: Option<f64>, land_at: Option<f64> },
}

/// Run every game and return a report.
pub fn run_simulation(sim: &SimConfig, game_config: &GameConfig) -> SimReport {
    let mut games = Vec::with_capacity(sim.num_games as usize);

    for game_idx in 0..sim.num_games {
        let mut rng = match sim.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(game_idx as u64)),
            None => StdRng::from_entropy(),
        };

        let stats = simulate_game(sim, game_config, &mut rng);

        if sim.verbosity >= 2 {
            println!(
                "Game {}/{} - {:.1} points ({}), {} forced launches, {} forced landings",
                game_idx + 1,
                sim.num_games,
                stats.total_score,
                stats.tier,
                stats.forced_launches,
                stats.forced_landings
            );
        }
        games.push(stats);
    }

    SimReport::from_games(&games, &game_config.grade_tiers)
}

/// Play one game with the synthetic player.
pub fn simulate_game<R: Rng>(sim: &SimConfig, game_config: &GameConfig, rng: &mut R) -> GameStats {
    let mut stats = GameStats {
        total_score: 0.0,
        tier: String::new(),
        distances: Vec::new(),
        launch_grades: Vec::new(),
        landing_grades: Vec::new(),
        forced_launches: 0,
        forced_landings: 0,
        boosts: 0,
        completed: false,
    };

    let mut session = match GameSession::new(game_config.clone(), 0.0, rng.gen()) {
        Ok(session) => session,
        Err(e) => {
            log::warn!("simulation skipped: {e}");
            return stats;
        }
    };

    let mut planned_for: Option<PhaseToken> = None;
    let mut plan = TapPlan::None;

    for _ in 0..MAX_FRAMES_PER_GAME {
        if session.phase() == Phase::GameComplete {
            break;
        }

        if planned_for != Some(session.phase_token()) {
            planned_for = Some(session.phase_token());
            plan = plan_taps(&session, sim, rng);
        }

        match plan {
            TapPlan::LaunchAt(at_ms) if session.phase_elapsed_ms() >= at_ms => {
                session.tap();
                plan = TapPlan::None;
            }
            TapPlan::Flight { boost_at, land_at } => {
                let progress = session.flight_progress();
                let landing_min = session.config().flight_gates.landing_min;
                if boost_at.is_some_and(|p| progress >= p) {
                    // A late frame can carry progress into the landing window,
                    // where the same tap would land the jumper instead
                    if progress <= landing_min {
                        session.tap();
                    }
                    plan = TapPlan::Flight { boost_at: None, land_at };
                } else if land_at.is_some_and(|p| progress >= p) {
                    session.tap();
                    plan = TapPlan::None;
                }
            }
            _ => {}
        }

        session.advance(sim.frame_ms);
        collect_events(&mut session, &mut stats);
    }
    collect_events(&mut session, &mut stats);

    if let Some(result) = session.game_result() {
        stats.total_score = result.total_score;
        stats.tier = result.grade_tier.label.clone();
        stats.completed = true;
    } else {
        log::warn!("simulated game did not finish in {MAX_FRAMES_PER_GAME} frames");
    }
    stats
}

fn plan_taps<R: Rng>(session: &GameSession, sim: &SimConfig, rng: &mut R) -> TapPlan {
    let config = session.config();
    match session.phase() {
        Phase::Approach => {
            if rng.gen_bool(sim.skip_chance) {
                return TapPlan::None;
            }
            let offset = spread(rng, sim.launch_spread_ms);
            let at = (config.timings.approach_target_ms as f64 + offset).max(0.0);
            TapPlan::LaunchAt(at.round() as u64)
        }
        Phase::Flight => {
            let gates = config.flight_gates;
            let boost_at = rng
                .gen_bool(sim.boost_chance)
                .then(|| rng.gen_range(gates.boost_start..gates.landing_min));
            let land_at = (!rng.gen_bool(sim.skip_chance)).then(|| {
                let offset = spread(rng, sim.landing_spread);
                (config.optimal_landing_progress + offset).clamp(gates.landing_min, 1.0)
            });
            TapPlan::Flight { boost_at, land_at }
        }
        _ => TapPlan::None,
    }
}

/// Uniform offset in [-width, width].
fn spread<R: Rng>(rng: &mut R, width: f64) -> f64 {
    if width <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-width..=width)
}

fn collect_events(session: &mut GameSession, stats: &mut GameStats) {
    for event in session.drain_events() {
        match event {
            SessionEvent::Launched { launch, forced, .. } => {
                stats.launch_grades.push(launch.grade);
                if forced {
                    stats.forced_launches += 1;
                }
            }
            SessionEvent::Boosted { .. } => stats.boosts += 1,
            SessionEvent::RoundResolved { result, forced } => {
                stats.distances.push(result.final_distance_m);
                stats.landing_grades.push(result.landing_grade);
                if forced {
                    stats.forced_landings += 1;
                }
            }
            _ => {}
        }
    }
}
