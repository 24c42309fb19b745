mod ui;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::{backend::CrosstermBackend, Terminal};
use skijump::config::GameConfig;
use skijump::constants::LOG_FILE;
use skijump::persistence::{self, JsonScoreStore, ScoreStore};
use skijump::session::{GameSession, Phase, SessionEvent, TapOutcome};
use std::fs::OpenOptions;
use std::io;
use std::time::{Duration, Instant};
use ui::ViewState;

/// Poll interval for input; also the frame pacing.
const FRAME_POLL_MS: u64 = 16;

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!("skijump {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!("Ski Jump - five-round timing game\n");
                println!("Usage: skijump [command]\n");
                println!("Commands:");
                println!("  --version  Show version information");
                println!("  --help     Show this help message\n");
                println!("Controls:");
                println!("  Space/Enter/Up  Take off, boost, land");
                println!("  r               Play again after the results");
                println!("  q/Esc           Quit\n");
                println!("Config: ~/.skijump/config.json (optional)");
                println!("Log:    ~/.skijump/{} (level via RUST_LOG)", LOG_FILE);
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown command: {}", other);
                eprintln!("Run 'skijump --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    init_logging();

    let config = match GameConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };
    let mut store = JsonScoreStore::open()?;
    let mut session = GameSession::new(config, store.best_total(), rand::random())?;
    log::info!("starting game, best total {:.1}", store.best_total());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut session, &mut store);

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

/// Log to ~/.skijump/skijump.log; the terminal belongs to the game.
fn init_logging() {
    let file = persistence::save_path(LOG_FILE).and_then(|path| {
        OpenOptions::new().create(true).append(true).open(path)
    });
    if let Ok(file) = file {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
}

/// Wall time between `advance` calls.
struct FrameClock {
    last: Instant,
}

impl FrameClock {
    fn new(now: Instant) -> Self {
        Self { last: now }
    }

    /// Milliseconds since the previous lap.
    fn lap_ms(&mut self, now: Instant) -> u64 {
        let dt_ms = now.saturating_duration_since(self.last).as_millis() as u64;
        self.last = now;
        dt_ms
    }
}

/// Catch the session up to `now` before tapping, so the tap is graded
/// against the clock at the moment the key arrived.
fn tap_at(session: &mut GameSession, clock: &mut FrameClock, now: Instant) -> TapOutcome {
    session.advance(clock.lap_ms(now));
    session.tap()
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut GameSession,
    store: &mut impl ScoreStore,
) -> io::Result<()> {
    let mut view = ViewState::default();
    let mut clock = FrameClock::new(Instant::now());

    loop {
        terminal.draw(|frame| ui::draw_ui(frame, session, &view))?;

        if event::poll(Duration::from_millis(FRAME_POLL_MS))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    match key_event.code {
                        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Up => {
                            tap_at(session, &mut clock, Instant::now());
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if session.phase() == Phase::GameComplete =>
                        {
                            session.restart();
                        }
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break,
                        _ => {}
                    }
                }
            }
        }

        session.advance(clock.lap_ms(Instant::now()));

        for game_event in session.drain_events() {
            match game_event {
                SessionEvent::PhaseChanged {
                    phase: Phase::Intro,
                    round_index: 0,
                    ..
                } => {
                    view = ViewState::default();
                }
                SessionEvent::NewBest { .. } => view.new_best = true,
                SessionEvent::GameCompleted(result) => {
                    if let Err(e) = store.submit_total(result.total_score, &result.grade_tier.label) {
                        log::warn!("could not save score: {}", e);
                        view.save_error = Some(e.to_string());
                    }
                }
                _ => {}
            }
        }
    }

    Ok(())
}
