pub mod game_common;
pub mod jump_scene;

use ratatui::Frame;
use skijump::session::GameSession;

/// Front-end state that isn't part of the game itself.
#[derive(Debug, Default)]
pub struct ViewState {
    /// The finished game set a new best total.
    pub new_best: bool,
    /// Last failure writing the score file, shown on the results screen.
    pub save_error: Option<String>,
}

pub fn draw_ui(frame: &mut Frame, session: &GameSession, view: &ViewState) {
    let area = frame.size();
    jump_scene::render_jump_scene(frame, area, session, view);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use skijump::config::GameConfig;
    use skijump::session::Phase;

    #[test]
    fn test_draws_every_phase() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut session = GameSession::new(GameConfig::default(), 0.0, 4).unwrap();
        let view = ViewState::default();

        let mut frames = 0;
        while session.phase() != Phase::GameComplete && frames < 20_000 {
            terminal.draw(|frame| draw_ui(frame, &session, &view)).unwrap();
            session.advance(16);
            frames += 1;
        }
        assert_eq!(session.phase(), Phase::GameComplete);
        terminal.draw(|frame| draw_ui(frame, &session, &view)).unwrap();
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        let session = GameSession::new(GameConfig::default(), 0.0, 4).unwrap();
        terminal
            .draw(|frame| draw_ui(frame, &session, &ViewState::default()))
            .unwrap();
    }
}
