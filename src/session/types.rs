//! Session data: phases, phase tokens, events and the session record itself.

use crate::config::GameConfig;
use crate::jump::flight::FlightState;
use crate::jump::hill::{HillGeometry, ScenePoint};
use crate::jump::landing::LandingStyleGrade;
use crate::jump::launch::{LaunchParams, LaunchResult};
use crate::jump::scoring::{GameResult, RoundResult};
use crate::jump::timing::TimingGrade;
use crate::jump::wind::WindSample;
use rand::rngs::StdRng;

/// Round phases, in the order a round passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Intro,
    Approach,
    Flight,
    Landing,
    ScoreDisplay,
    GameComplete,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Intro => "Intro",
            Phase::Approach => "Approach",
            Phase::Flight => "Flight",
            Phase::Landing => "Landing",
            Phase::ScoreDisplay => "Score",
            Phase::GameComplete => "Game Complete",
        }
    }

    /// Phases that end on their own after a fixed delay.
    pub fn is_timed(&self) -> bool {
        matches!(self, Phase::Intro | Phase::Landing | Phase::ScoreDisplay)
    }
}

/// Identifies one entry into a phase.
///
/// A fresh token is minted on every transition, so anything holding an older
/// token can tell its phase is gone and must not act on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseToken(pub(super) u64);

impl PhaseToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// What a tap did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    /// Out of phase, too early in flight, or a repeat.
    Ignored,
    Launched(TimingGrade),
    Boosted,
    Landed(LandingStyleGrade),
}

/// Notifications for the presentation layer, collected in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PhaseChanged {
        phase: Phase,
        round_index: usize,
        token: PhaseToken,
    },
    WindSampled {
        round_index: usize,
        wind: WindSample,
    },
    Launched {
        round_index: usize,
        launch: LaunchResult,
        /// No tap arrived before the approach grace ran out.
        forced: bool,
    },
    Boosted {
        round_index: usize,
        progress: f64,
    },
    RoundResolved {
        result: RoundResult,
        forced: bool,
    },
    GameCompleted(GameResult),
    NewBest {
        previous: f64,
        total: f64,
    },
}

/// The flight of the current round. Exists only while in [`Phase::Flight`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFlight {
    pub state: FlightState,
    /// Airtime of the unassisted flight, for normalising progress.
    pub estimated_secs: f64,
    pub boosted: bool,
}

impl ActiveFlight {
    /// Elapsed airtime over the estimate, clamped to 1.
    pub fn progress(&self) -> f64 {
        if self.estimated_secs <= 0.0 {
            return 1.0;
        }
        (self.state.elapsed_secs / self.estimated_secs).clamp(0.0, 1.0)
    }
}

/// One player's run through a five-round game, and any games after it.
pub struct GameSession {
    pub(super) config: GameConfig,
    pub(super) hill: HillGeometry,
    pub(super) launch_params: LaunchParams,
    pub(super) rng: StdRng,

    pub(super) phase: Phase,
    pub(super) token: PhaseToken,
    pub(super) phase_elapsed_ms: u64,

    pub(super) round_index: usize,
    pub(super) wind: WindSample,
    pub(super) launch: Option<LaunchResult>,
    pub(super) flight: Option<ActiveFlight>,
    /// Where the jumper was when the round's landing resolved.
    pub(super) touchdown: Option<ScenePoint>,
    pub(super) rounds: Vec<RoundResult>,
    pub(super) game_result: Option<GameResult>,
    pub(super) best_total: f64,

    pub(super) events: Vec<SessionEvent>,
}

impl GameSession {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn phase_token(&self) -> PhaseToken {
        self.token
    }

    /// True while `token` still names the phase the session is in.
    pub fn is_current(&self, token: PhaseToken) -> bool {
        self.token == token
    }

    pub fn phase_elapsed_ms(&self) -> u64 {
        self.phase_elapsed_ms
    }

    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn wind(&self) -> WindSample {
        self.wind
    }

    pub fn jumper(&self) -> &str {
        self.config.jumper_for_round(self.round_index)
    }

    /// Take-off of the current round, once it has happened.
    pub fn launch(&self) -> Option<&LaunchResult> {
        self.launch.as_ref()
    }

    pub fn flight(&self) -> Option<&ActiveFlight> {
        self.flight.as_ref()
    }

    /// Normalised flight progress; 0 outside of flight.
    pub fn flight_progress(&self) -> f64 {
        self.flight.as_ref().map(|f| f.progress()).unwrap_or(0.0)
    }

    pub fn touchdown(&self) -> Option<ScenePoint> {
        self.touchdown
    }

    pub fn rounds(&self) -> &[RoundResult] {
        &self.rounds
    }

    pub fn last_round(&self) -> Option<&RoundResult> {
        self.rounds.last()
    }

    pub fn game_result(&self) -> Option<&GameResult> {
        self.game_result.as_ref()
    }

    pub fn best_total(&self) -> f64 {
        self.best_total
    }

    pub fn hill(&self) -> &HillGeometry {
        &self.hill
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Hand over every event since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
