//! Round state machine: phase timers, tap handling, forced resolutions and
//! game finalization.

use super::types::*;
use crate::config::{ConfigError, GameConfig};
use crate::constants::{MAX_FRAME_MS, ROUNDS_PER_GAME};
use crate::jump::flight::{self, estimate_flight_duration, FlightState};
use crate::jump::landing::{compute_landing, LandingStyleGrade};
use crate::jump::launch::compute_launch;
use crate::jump::scoring::{final_distance, finalize, RoundResult};
use crate::jump::timing::{grade, TimingGrade};
use crate::jump::wind::{sample_wind, WindSample};
use rand::rngs::StdRng;
use rand::SeedableRng;

impl GameSession {
    /// Build a session and enter round one's intro.
    ///
    /// `previous_best` is the stored best total; `seed` drives wind sampling.
    pub fn new(config: GameConfig, previous_best: f64, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let hill = config.hill_geometry();
        let launch_params = config.launch_params();
        let mut session = Self {
            config,
            hill,
            launch_params,
            rng: StdRng::seed_from_u64(seed),
            phase: Phase::Intro,
            token: PhaseToken(0),
            phase_elapsed_ms: 0,
            round_index: 0,
            wind: WindSample::CALM,
            launch: None,
            flight: None,
            touchdown: None,
            rounds: Vec::with_capacity(ROUNDS_PER_GAME),
            game_result: None,
            best_total: previous_best.max(0.0),
            events: Vec::new(),
        };
        session.enter_intro(0);
        Ok(session)
    }

    /// Advance the session by `dt_ms` of wall time. Called once per frame.
    ///
    /// Steps the live flight, ends timed phases and applies forced
    /// resolutions. At most one phase transition happens per call. Returns
    /// false when nothing moved: the game is over or `dt_ms` is zero.
    pub fn advance(&mut self, dt_ms: u64) -> bool {
        if self.phase == Phase::GameComplete || dt_ms == 0 {
            return false;
        }

        // Clamp to keep a stalled frame from skipping a whole phase
        let dt_ms = dt_ms.min(MAX_FRAME_MS);
        self.phase_elapsed_ms += dt_ms;

        match self.phase {
            Phase::Intro => {
                if self.phase_elapsed_ms >= self.config.intro_duration_ms(self.round_index) {
                    self.enter_phase(Phase::Approach);
                }
            }
            Phase::Approach => {
                let t = self.config.timings;
                if self.phase_elapsed_ms >= t.approach_target_ms + t.approach_grace_ms {
                    log::debug!("round {}: no take-off tap, forcing Miss", self.round_index + 1);
                    self.resolve_launch(TimingGrade::Miss, true);
                }
            }
            Phase::Flight => self.step_flight(dt_ms),
            Phase::Landing => {
                if self.phase_elapsed_ms >= self.config.timings.landing_hold_ms {
                    self.enter_phase(Phase::ScoreDisplay);
                }
            }
            Phase::ScoreDisplay => {
                if self.phase_elapsed_ms >= self.config.timings.score_display_ms {
                    if self.rounds.len() >= ROUNDS_PER_GAME {
                        self.finalize_game();
                    } else {
                        self.enter_intro(self.round_index + 1);
                    }
                }
            }
            Phase::GameComplete => {}
        }
        true
    }

    /// The single player input. Meaning depends on the phase.
    pub fn tap(&mut self) -> TapOutcome {
        match self.phase {
            Phase::Approach => {
                let target = self.config.timings.approach_target_ms as f64;
                let error = (self.phase_elapsed_ms as f64 - target).abs();
                let launch_grade = grade(error, &self.config.launch_thresholds_ms);
                self.resolve_launch(launch_grade, false);
                TapOutcome::Launched(launch_grade)
            }
            Phase::Flight => self.flight_tap(),
            _ => TapOutcome::Ignored,
        }
    }

    /// Play again: abandon whatever is in progress and start at round one.
    pub fn restart(&mut self) {
        log::debug!("restarting from {} in round {}", self.phase.name(), self.round_index + 1);
        self.flight = None;
        self.launch = None;
        self.touchdown = None;
        self.rounds.clear();
        self.game_result = None;
        self.enter_intro(0);
    }

    /// Mint a new token, then switch phase. The old token is stale from here on.
    fn enter_phase(&mut self, phase: Phase) {
        self.token = PhaseToken(self.token.0 + 1);
        self.phase = phase;
        self.phase_elapsed_ms = 0;
        if phase != Phase::Flight {
            self.flight = None;
        }

        log::debug!(
            "round {}: -> {} (token {})",
            self.round_index + 1,
            phase.name(),
            self.token.0
        );
        self.events.push(SessionEvent::PhaseChanged {
            phase,
            round_index: self.round_index,
            token: self.token,
        });
    }

    fn enter_intro(&mut self, round_index: usize) {
        self.round_index = round_index;
        self.launch = None;
        self.touchdown = None;
        self.enter_phase(Phase::Intro);

        self.wind = sample_wind(&self.config.wind, &mut self.rng);
        log::debug!(
            "round {}: {} on the bar, wind {}",
            round_index + 1,
            self.jumper(),
            self.wind.label()
        );
        self.events.push(SessionEvent::WindSampled {
            round_index,
            wind: self.wind,
        });
    }

    fn resolve_launch(&mut self, launch_grade: TimingGrade, forced: bool) {
        let launch = compute_launch(launch_grade, self.wind, &self.launch_params);
        let estimated_secs = estimate_flight_duration(&launch, &self.hill, &self.config.physics);
        log::debug!(
            "round {}: take-off {} at {:.0}° / {:.1} m/s, estimated airtime {:.2}s",
            self.round_index + 1,
            launch_grade.name(),
            launch.angle_degrees,
            launch.exit_speed_mps,
            estimated_secs
        );

        self.launch = Some(launch);
        self.events.push(SessionEvent::Launched {
            round_index: self.round_index,
            launch,
            forced,
        });
        self.enter_phase(Phase::Flight);
        self.flight = Some(ActiveFlight {
            state: FlightState::launch(&launch, &self.hill),
            estimated_secs,
            boosted: false,
        });
    }

    fn step_flight(&mut self, dt_ms: u64) {
        let Some(active) = self.flight.as_mut() else {
            return;
        };
        flight::step(
            &mut active.state,
            &self.hill,
            &self.config.physics,
            dt_ms as f64 / 1000.0,
        );

        if active.state.landed || active.progress() >= self.config.flight_gates.auto_crash {
            log::debug!(
                "round {}: no landing tap (progress {:.2}), forcing Crash",
                self.round_index + 1,
                active.progress()
            );
            self.resolve_landing(LandingStyleGrade::Crash, true);
        }
    }

    fn flight_tap(&mut self) -> TapOutcome {
        let gates = self.config.flight_gates;
        let Some(active) = self.flight.as_mut() else {
            return TapOutcome::Ignored;
        };
        let progress = active.progress();

        if progress < gates.boost_start {
            return TapOutcome::Ignored;
        }
        if progress <= gates.landing_min {
            if active.boosted {
                return TapOutcome::Ignored;
            }
            active.state.apply_lift(gates.boost_lift_mps, &self.hill);
            active.boosted = true;
            log::debug!("round {}: boost at progress {:.2}", self.round_index + 1, progress);
            self.events.push(SessionEvent::Boosted {
                round_index: self.round_index,
                progress,
            });
            return TapOutcome::Boosted;
        }

        let error = (progress - self.config.optimal_landing_progress).abs();
        let style = LandingStyleGrade::from_timing(grade(error, &self.config.landing_thresholds));
        self.resolve_landing(style, false);
        TapOutcome::Landed(style)
    }

    /// Score the round from where the jumper is right now and leave flight.
    fn resolve_landing(&mut self, style: LandingStyleGrade, forced: bool) {
        let Some(active) = self.flight.take() else {
            return;
        };
        let Some(launch) = self.launch else {
            return;
        };

        let landing = compute_landing(style, &self.config.landing_table);
        let raw_distance_m = active.state.distance_m;
        let result = RoundResult {
            round_index: self.round_index,
            jumper: self.jumper().to_string(),
            launch_grade: launch.grade,
            raw_distance_m,
            landing_grade: landing.grade,
            final_distance_m: final_distance(raw_distance_m, landing.distance_multiplier),
            wind: self.wind,
            counted: false,
        };
        log::debug!(
            "round {}: {} landing, {:.1} m raw, {:.1} m scored",
            self.round_index + 1,
            style.name(),
            result.raw_distance_m,
            result.final_distance_m
        );

        self.touchdown = Some(active.state.position);
        self.rounds.push(result.clone());
        self.events.push(SessionEvent::RoundResolved { result, forced });
        self.enter_phase(Phase::Landing);
    }

    fn finalize_game(&mut self) {
        let result = finalize(std::mem::take(&mut self.rounds), &self.config.grade_tiers);
        self.rounds = result.rounds.clone();
        log::info!(
            "game complete: {:.1} points, {}",
            result.total_score,
            result.grade_tier.label
        );

        if result.total_score > self.best_total {
            let previous = self.best_total;
            self.best_total = result.total_score;
            log::info!("new best total {:.1} (was {:.1})", result.total_score, previous);
            self.events.push(SessionEvent::NewBest {
                previous,
                total: result.total_score,
            });
        }

        self.events.push(SessionEvent::GameCompleted(result.clone()));
        self.game_result = Some(result);
        self.enter_phase(Phase::GameComplete);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FIRST_INTRO_MS;

    const FRAME_MS: u64 = 16;

    fn session() -> GameSession {
        GameSession::new(GameConfig::default(), 0.0, 7).unwrap()
    }

    fn advance_ms(session: &mut GameSession, total_ms: u64) {
        let mut left = total_ms;
        while left > 0 {
            let dt = left.min(FRAME_MS);
            session.advance(dt);
            left -= dt;
        }
    }

    fn advance_until(session: &mut GameSession, phase: Phase) {
        for _ in 0..10_000 {
            if session.phase() == phase {
                return;
            }
            session.advance(FRAME_MS);
        }
        panic!("never reached {:?}, stuck in {:?}", phase, session.phase());
    }

    fn advance_to_progress(session: &mut GameSession, progress: f64) {
        while session.phase() == Phase::Flight && session.flight_progress() < progress {
            session.advance(1);
        }
    }

    #[test]
    fn test_new_session_starts_in_intro() {
        let mut s = session();
        assert_eq!(s.phase(), Phase::Intro);
        assert_eq!(s.round_index(), 0);
        assert!(s.rounds().is_empty());
        let events = s.drain_events();
        assert!(matches!(events[0], SessionEvent::PhaseChanged { phase: Phase::Intro, .. }));
        assert!(matches!(events[1], SessionEvent::WindSampled { round_index: 0, .. }));
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GameConfig::default();
        config.grade_tiers.clear();
        assert!(matches!(
            GameSession::new(config, 0.0, 1),
            Err(ConfigError::NoGradeTiers)
        ));
    }

    #[test]
    fn test_first_intro_is_longer() {
        let mut s = session();
        advance_ms(&mut s, FIRST_INTRO_MS - FRAME_MS);
        assert_eq!(s.phase(), Phase::Intro);
        advance_ms(&mut s, FRAME_MS);
        assert_eq!(s.phase(), Phase::Approach);
    }

    #[test]
    fn test_taps_ignored_outside_input_phases() {
        let mut s = session();
        assert_eq!(s.tap(), TapOutcome::Ignored);
        assert_eq!(s.phase(), Phase::Intro);
    }

    #[test]
    fn test_on_target_tap_is_perfect() {
        let mut s = session();
        advance_until(&mut s, Phase::Approach);
        advance_ms(&mut s, 2000);
        assert_eq!(s.tap(), TapOutcome::Launched(TimingGrade::Perfect));
        assert_eq!(s.phase(), Phase::Flight);
        let launch = s.launch().unwrap();
        assert!((launch.angle_degrees - 38.0).abs() < f64::EPSILON);
        assert!((launch.speed_multiplier - 1.30).abs() < f64::EPSILON);
    }

    #[test]
    fn test_early_tap_grades_by_distance_from_target() {
        let mut s = session();
        advance_until(&mut s, Phase::Approach);
        advance_ms(&mut s, 1700);
        assert_eq!(s.tap(), TapOutcome::Launched(TimingGrade::Ok));
    }

    #[test]
    fn test_second_tap_does_not_relaunch() {
        let mut s = session();
        advance_until(&mut s, Phase::Approach);
        advance_ms(&mut s, 2000);
        assert_eq!(s.tap(), TapOutcome::Launched(TimingGrade::Perfect));
        let first = *s.launch().unwrap();
        assert_eq!(s.tap(), TapOutcome::Ignored);
        assert_eq!(*s.launch().unwrap(), first);
        let launches = s
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::Launched { .. }))
            .count();
        assert_eq!(launches, 1);
    }

    #[test]
    fn test_approach_times_out_as_miss() {
        let mut s = session();
        advance_until(&mut s, Phase::Approach);
        s.drain_events();
        advance_ms(&mut s, 2600);
        assert_eq!(s.phase(), Phase::Flight);
        assert_eq!(s.launch().map(|l| l.grade), Some(TimingGrade::Miss));
        assert!(s
            .drain_events()
            .iter()
            .any(|e| matches!(e, SessionEvent::Launched { forced: true, .. })));
    }

    #[test]
    fn test_boost_once_then_ignored() {
        let mut s = session();
        advance_until(&mut s, Phase::Approach);
        advance_ms(&mut s, 2000);
        s.tap();

        advance_to_progress(&mut s, 0.2);
        let vy_before = s.flight().unwrap().state.vy;
        assert_eq!(s.tap(), TapOutcome::Boosted);
        assert!(s.flight().unwrap().state.vy < vy_before);
        assert!(s.flight().unwrap().boosted);
        assert_eq!(s.tap(), TapOutcome::Ignored);
        assert_eq!(s.phase(), Phase::Flight);
    }

    #[test]
    fn test_landing_tap_at_optimum_is_telemark() {
        let mut s = session();
        advance_until(&mut s, Phase::Approach);
        advance_ms(&mut s, 2000);
        s.tap();

        advance_to_progress(&mut s, 0.78);
        assert_eq!(s.tap(), TapOutcome::Landed(LandingStyleGrade::Telemark));
        assert_eq!(s.phase(), Phase::Landing);
        assert!(s.flight().is_none());

        let round = s.last_round().unwrap();
        assert!(round.raw_distance_m > 0.0);
        assert!((round.final_distance_m - final_distance(round.raw_distance_m, 1.30)).abs() < 1e-9);
        assert_eq!(s.tap(), TapOutcome::Ignored);
    }

    #[test]
    fn test_no_landing_tap_crashes() {
        let mut s = session();
        advance_until(&mut s, Phase::Approach);
        advance_ms(&mut s, 2000);
        s.tap();
        s.drain_events();

        advance_until(&mut s, Phase::Landing);
        let round = s.last_round().unwrap();
        assert_eq!(round.landing_grade, LandingStyleGrade::Crash);
        assert!(s
            .drain_events()
            .iter()
            .any(|e| matches!(e, SessionEvent::RoundResolved { forced: true, .. })));
    }

    #[test]
    fn test_phase_tokens_go_stale() {
        let mut s = session();
        let intro = s.phase_token();
        assert!(s.is_current(intro));
        advance_until(&mut s, Phase::Approach);
        assert!(!s.is_current(intro));
        assert!(s.phase_token().generation() > intro.generation());
    }

    #[test]
    fn test_restart_clears_progress() {
        let mut s = session();
        advance_until(&mut s, Phase::Approach);
        advance_ms(&mut s, 2000);
        s.tap();
        let in_flight = s.phase_token();

        s.restart();
        assert_eq!(s.phase(), Phase::Intro);
        assert_eq!(s.round_index(), 0);
        assert!(s.flight().is_none());
        assert!(s.launch().is_none());
        assert!(s.rounds().is_empty());
        assert!(!s.is_current(in_flight));
    }

    #[test]
    fn test_full_game_without_input_completes() {
        let mut s = session();
        advance_until(&mut s, Phase::GameComplete);
        let result = s.game_result().unwrap();
        assert_eq!(result.rounds.len(), ROUNDS_PER_GAME);
        assert_eq!(result.counted_rounds().count(), 3);
        assert!(result
            .rounds
            .iter()
            .all(|r| r.launch_grade == TimingGrade::Miss && r.landing_grade == LandingStyleGrade::Crash));
        assert!(!s.advance(FRAME_MS));
        assert_eq!(s.tap(), TapOutcome::Ignored);
    }

    #[test]
    fn test_new_best_only_when_beaten() {
        let mut s = GameSession::new(GameConfig::default(), 10_000.0, 3).unwrap();
        advance_until(&mut s, Phase::GameComplete);
        assert!(!s
            .drain_events()
            .iter()
            .any(|e| matches!(e, SessionEvent::NewBest { .. })));
        assert!((s.best_total() - 10_000.0).abs() < f64::EPSILON);

        let mut s = session();
        advance_until(&mut s, Phase::GameComplete);
        let total = s.game_result().unwrap().total_score;
        assert!(s
            .drain_events()
            .iter()
            .any(|e| matches!(e, SessionEvent::NewBest { previous, .. } if *previous == 0.0)));
        assert!((s.best_total() - total).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wind_within_range_each_round() {
        let mut s = session();
        let range = s.config().wind;
        advance_until(&mut s, Phase::GameComplete);
        let winds: Vec<f64> = s
            .drain_events()
            .iter()
            .filter_map(|e| match e {
                SessionEvent::WindSampled { wind, .. } => Some(wind.speed()),
                _ => None,
            })
            .collect();
        assert_eq!(winds.len(), ROUNDS_PER_GAME);
        assert!(winds.iter().all(|w| *w >= range.min_mps && *w <= range.max_mps));
    }

    #[test]
    fn test_zero_dt_changes_nothing() {
        let mut s = session();
        advance_ms(&mut s, 500);
        let token = s.phase_token();
        assert!(!s.advance(0));
        assert_eq!(s.phase_elapsed_ms(), 500);
        assert!(s.is_current(token));
        assert!(s.advance(1));
        assert_eq!(s.phase_elapsed_ms(), 501);
    }

    #[test]
    fn test_landing_gate_needs_progress_past_minimum() {
        let mut s = session();
        advance_until(&mut s, Phase::Approach);
        advance_ms(&mut s, 2000);
        s.tap();

        let landing_min = s.config().flight_gates.landing_min;
        let active = s.flight.as_mut().unwrap();
        active.state.elapsed_secs = active.estimated_secs * landing_min;
        assert_eq!(s.flight_progress(), landing_min);
        assert_eq!(s.tap(), TapOutcome::Boosted);
        assert_eq!(s.tap(), TapOutcome::Ignored);
        assert_eq!(s.phase(), Phase::Flight);

        let active = s.flight.as_mut().unwrap();
        active.state.elapsed_secs = active.estimated_secs * (landing_min + 0.01);
        assert!(matches!(s.tap(), TapOutcome::Landed(_)));
    }

    #[test]
    fn test_dt_clamped() {
        let mut s = session();
        s.advance(10_000);
        assert_eq!(s.phase_elapsed_ms(), MAX_FRAME_MS);
    }
}
