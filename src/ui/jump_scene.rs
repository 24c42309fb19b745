//! Ski jump scene: in-run, landing hill with markers, jumper, HUD bars,
//! info panel and the end-of-game results overlay.

use super::game_common::{
    create_game_layout, render_info_panel_frame, render_status_bar, render_too_small, CellBuffer,
};
use super::ViewState;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use skijump::constants::ROUNDS_PER_GAME;
use skijump::jump::{HillGeometry, LandingStyleGrade, MarkerKind, ScenePoint, TimingGrade};
use skijump::session::{GameSession, Phase};

const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 18;
const INFO_PANEL_WIDTH: u16 = 26;
const MARKER_STEP_M: f64 = 20.0;
const BAR_WIDTH: usize = 20;
/// Rise of the in-run per pixel, drawn left of the lip.
const INRUN_SLOPE: f64 = 0.5;
/// Sky kept above the lip, in metres.
const SKY_HEADROOM_M: f64 = 30.0;

const SNOW: Color = Color::Rgb(200, 210, 225);
const SNOW_SHADE: Color = Color::Rgb(60, 70, 90);

/// Render the whole game screen.
pub fn render_jump_scene(frame: &mut Frame, area: Rect, session: &GameSession, view: &ViewState) {
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_too_small(frame, area, MIN_WIDTH, MIN_HEIGHT);
        return;
    }

    let layout = create_game_layout(
        frame,
        area,
        " Ski Jump ",
        Color::LightCyan,
        12,
        INFO_PANEL_WIDTH,
    );

    render_hill(frame, layout.content, session);
    render_status(frame, layout.status_bar, session);
    render_info_panel(frame, layout.info_panel, session);

    if session.phase() == Phase::GameComplete {
        render_results(frame, layout.content, session, view);
    }
}

/// Maps scene pixels onto the content area's character grid.
struct SceneView {
    min_x: f64,
    min_y: f64,
    x_scale: f64,
    y_scale: f64,
}

impl SceneView {
    fn fit(hill: &HillGeometry, cols: usize, rows: usize) -> Self {
        let far = hill.point_at_distance(hill.max_distance_m);
        let min_x = 0.0;
        let min_y = hill.origin.y - hill.metres_to_px(SKY_HEADROOM_M);
        Self {
            min_x,
            min_y,
            x_scale: cols as f64 / (far.x - min_x).max(1.0),
            y_scale: rows as f64 / (far.y - min_y).max(1.0),
        }
    }

    fn cell(&self, p: ScenePoint) -> (i32, i32) {
        (
            ((p.x - self.min_x) * self.x_scale).round() as i32,
            ((p.y - self.min_y) * self.y_scale).round() as i32,
        )
    }

    fn scene_x(&self, col: usize) -> f64 {
        self.min_x + col as f64 / self.x_scale
    }

    fn row_of(&self, y: f64) -> i32 {
        ((y - self.min_y) * self.y_scale).round() as i32
    }
}

fn render_hill(frame: &mut Frame, area: Rect, session: &GameSession) {
    let mut buffer = CellBuffer::new(area.width, area.height);
    let hill = session.hill();
    let view = SceneView::fit(hill, buffer.width(), buffer.height());
    let bottom = buffer.height() as i32;

    // -- In-run and landing surface, snow below --
    for col in 0..buffer.width() {
        let x = view.scene_x(col);
        let (surface_y, ch) = if x <= hill.origin.x {
            (hill.origin.y - (hill.origin.x - x) * INRUN_SLOPE, '▄')
        } else {
            (hill.hill_y(x), '▀')
        };
        let row = view.row_of(surface_y);
        buffer.put(col as i32, row, ch, SNOW);
        for below in (row + 1)..bottom {
            buffer.fill_bg(col as i32, below, ' ', SNOW_SHADE, SNOW_SHADE);
        }
    }

    // -- Distance markers, K-point and hill size --
    for marker in hill.markers(MARKER_STEP_M) {
        let (col, row) = view.cell(marker.position);
        let (label, color) = match marker.kind {
            MarkerKind::KPoint => ("K".to_string(), Color::Red),
            MarkerKind::HillSize => ("HS".to_string(), Color::Magenta),
            MarkerKind::Regular => (format!("{:.0}", marker.metres), Color::Gray),
        };
        buffer.put(col, row - 1, '¦', color);
        buffer.put_str(col, row + 1, &label, color);
    }

    // -- Jumper --
    if let Some((point, glyph, color)) = jumper_sprite(session) {
        let (col, row) = view.cell(point);
        buffer.put(col, row - 1, glyph, color);
    }

    // -- HUD --
    render_hud(&mut buffer, session);

    buffer.render(frame, area);
}

/// Where to draw the jumper for the current phase.
fn jumper_sprite(session: &GameSession) -> Option<(ScenePoint, char, Color)> {
    let hill = session.hill();
    match session.phase() {
        Phase::Intro => Some((inrun_point(hill, 0.0), 'o', Color::Yellow)),
        Phase::Approach => {
            let target = session.config().timings.approach_target_ms.max(1) as f64;
            let t = (session.phase_elapsed_ms() as f64 / target).min(1.0);
            Some((inrun_point(hill, t), 'o', Color::Yellow))
        }
        Phase::Flight => session
            .flight()
            .map(|f| (f.state.position, '>', Color::LightYellow)),
        Phase::Landing | Phase::ScoreDisplay => {
            let crashed = session
                .last_round()
                .is_some_and(|r| r.landing_grade == LandingStyleGrade::Crash);
            let (glyph, color) = if crashed {
                ('*', Color::LightRed)
            } else {
                ('Y', Color::LightGreen)
            };
            session.touchdown().map(|p| (p, glyph, color))
        }
        Phase::GameComplete => None,
    }
}

/// Point on the in-run, `t` of the way from the top (0) to the lip (1).
fn inrun_point(hill: &HillGeometry, t: f64) -> ScenePoint {
    let x = hill.origin.x * t;
    ScenePoint {
        x,
        y: hill.origin.y - (hill.origin.x - x) * INRUN_SLOPE,
    }
}

/// Timing bar and wind read-out along the top rows.
fn render_hud(buffer: &mut CellBuffer, session: &GameSession) {
    let config = session.config();

    match session.phase() {
        Phase::Approach => {
            let t = config.timings;
            let span = (t.approach_target_ms + t.approach_grace_ms) as f64;
            let filled = session.phase_elapsed_ms() as f64 / span;
            let target = t.approach_target_ms as f64 / span;
            draw_bar(buffer, "TAKE-OFF", filled, &[(target, '|')], Color::LightBlue);
        }
        Phase::Flight => {
            let gates = config.flight_gates;
            draw_bar(
                buffer,
                "FLIGHT  ",
                session.flight_progress(),
                &[(gates.landing_min, ':'), (config.optimal_landing_progress, '|')],
                Color::LightCyan,
            );
        }
        _ => {}
    }

    let wind = session.wind();
    let arrow = if wind.speed().abs() < 0.05 {
        '·'
    } else if wind.is_headwind() {
        '←'
    } else {
        '→'
    };
    let wind_color = if wind.is_headwind() {
        Color::LightRed
    } else {
        Color::LightGreen
    };
    let text = format!("WIND {} {:.1}", arrow, wind.speed().abs());
    let col = buffer.width().saturating_sub(text.chars().count() + 1) as i32;
    buffer.put_str(col, 0, &text, wind_color);
}

fn draw_bar(
    buffer: &mut CellBuffer,
    label: &str,
    filled: f64,
    marks: &[(f64, char)],
    color: Color,
) {
    buffer.put_str(0, 0, label, Color::DarkGray);
    let start = label.chars().count() as i32 + 1;
    buffer.put(start, 0, '[', Color::DarkGray);
    let filled_cells = (filled.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    for i in 0..BAR_WIDTH {
        let ch = if i < filled_cells { '=' } else { ' ' };
        buffer.put(start + 1 + i as i32, 0, ch, color);
    }
    for (at, ch) in marks {
        let i = (at.clamp(0.0, 1.0) * (BAR_WIDTH - 1) as f64).round() as i32;
        buffer.put(start + 1 + i, 0, *ch, Color::White);
    }
    buffer.put(start + 1 + BAR_WIDTH as i32, 0, ']', Color::DarkGray);
}

fn launch_color(grade: TimingGrade) -> Color {
    match grade {
        TimingGrade::Perfect => Color::LightGreen,
        TimingGrade::Good => Color::Green,
        TimingGrade::Ok => Color::Yellow,
        TimingGrade::Miss => Color::Red,
    }
}

fn landing_color(grade: LandingStyleGrade) -> Color {
    match grade {
        LandingStyleGrade::Telemark => Color::LightGreen,
        LandingStyleGrade::Clean => Color::Green,
        LandingStyleGrade::Shaky => Color::Yellow,
        LandingStyleGrade::Crash => Color::Red,
    }
}

fn render_status(frame: &mut Frame, area: Rect, session: &GameSession) {
    let tap = [("[Space/Enter]", "Tap"), ("[q]", "Quit")];
    match session.phase() {
        Phase::Intro => {
            let text = format!(
                "Round {} of {} - {} - wind {}",
                session.round_index() + 1,
                ROUNDS_PER_GAME,
                session.jumper(),
                session.wind().label()
            );
            render_status_bar(frame, area, &text, Color::White, &tap);
        }
        Phase::Approach => {
            render_status_bar(frame, area, "Tap at the lip to take off!", Color::LightBlue, &tap);
        }
        Phase::Flight => {
            let (text, color) = match session.launch() {
                Some(l) => (
                    format!("{} take-off! Tap to land", l.grade.name()),
                    launch_color(l.grade),
                ),
                None => ("Tap to land".to_string(), Color::White),
            };
            render_status_bar(frame, area, &text, color, &tap);
        }
        Phase::Landing | Phase::ScoreDisplay => {
            let (text, color) = match session.last_round() {
                Some(r) => (
                    format!(
                        "{} landing - {:.1} m (raw {:.1} m)",
                        r.landing_grade.name(),
                        r.final_distance_m,
                        r.raw_distance_m
                    ),
                    landing_color(r.landing_grade),
                ),
                None => (String::new(), Color::White),
            };
            render_status_bar(frame, area, &text, color, &tap);
        }
        Phase::GameComplete => {
            render_status_bar(
                frame,
                area,
                "Game over",
                Color::Yellow,
                &[("[r]", "Play again"), ("[q]", "Quit")],
            );
        }
    }
}

fn render_info_panel(frame: &mut Frame, area: Rect, session: &GameSession) {
    if area.width < 2 {
        return;
    }
    let inner = render_info_panel_frame(frame, area);
    let label = Style::default().fg(Color::DarkGray);

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("Round:  ", label),
            Span::styled(
                format!("{}/{}", session.round_index() + 1, ROUNDS_PER_GAME),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Jumper: ", label),
            Span::styled(session.jumper().to_string(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Wind:   ", label),
            Span::styled(session.wind().label(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("Best:   ", label),
            Span::styled(
                format!("{:.1}", session.best_total()),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(""),
    ];

    if let Some(flight) = session.flight() {
        let hill = session.hill();
        lines.push(Line::from(vec![
            Span::styled("Dist:   ", label),
            Span::raw(format!("{:.1} m", flight.state.distance_m)),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Height: ", label),
            Span::raw(format!("{:.1} m", flight.state.height_above_hill_m(hill))),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Speed:  ", label),
            Span::raw(format!("{:.1} m/s", flight.state.speed_mps(hill))),
        ]));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Jumps",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    for round in session.rounds() {
        let mark = if round.counted { "*" } else { " " };
        lines.push(Line::from(vec![
            Span::styled(format!("{}{} ", mark, round.round_index + 1), label),
            Span::styled(
                format!("{:>6.1} m ", round.final_distance_m),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                round.landing_grade.name(),
                Style::default().fg(landing_color(round.landing_grade)),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Final standings drawn over the scene.
fn render_results(frame: &mut Frame, area: Rect, session: &GameSession, view: &ViewState) {
    let Some(result) = session.game_result() else {
        return;
    };

    let width = area.width.min(44);
    let height = area.height.min(14);
    let overlay = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .title(" Results ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{:.1} points", result.total_score),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            result.grade_tier.label.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for round in &result.rounds {
        let style = if round.counted {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{} {:<12} {:>6.1} m {}",
                if round.counted { "*" } else { " " },
                round.jumper,
                round.final_distance_m,
                round.landing_grade.name()
            ),
            style,
        )));
    }
    lines.push(Line::from(""));
    if view.new_best {
        lines.push(Line::from(Span::styled(
            "NEW BEST!",
            Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!("Best: {:.1}", session.best_total()),
            Style::default().fg(Color::Yellow),
        )));
    }
    if let Some(err) = &view.save_error {
        lines.push(Line::from(Span::styled(
            format!("Save failed: {}", err),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}
