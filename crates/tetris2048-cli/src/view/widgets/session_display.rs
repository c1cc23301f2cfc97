use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Clear, Padding, Widget},
};
use tetris2048_engine::{GameSession, SessionState};

use crate::view::widgets::{
    BoardDisplay, KeyBinding, KeyBindingDisplay, NextPieceDisplay, SessionStatsDisplay, color,
    style,
};

/// Board, next piece and statistics of a session, with a banner over the
/// board while it is paused, won or over.
#[derive(Debug)]
pub(crate) struct SessionDisplay<'a> {
    session: &'a GameSession,
    result_bindings: &'a [KeyBinding<'a>],
}

impl<'a> SessionDisplay<'a> {
    pub(crate) fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            result_bindings: &[],
        }
    }

    /// Keys listed in the win and game-over banners.
    pub(crate) fn result_bindings(self, result_bindings: &'a [KeyBinding<'a>]) -> Self {
        Self {
            result_bindings,
            ..self
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let state = self.session.session_state();
        let block_padding = Padding::symmetric(1, 0);
        let border_style = match state {
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::Won => color::GREEN,
            SessionState::GameOver => color::RED,
        };

        let game_board = {
            let widget = BoardDisplay::new(self.session.board())
                .falling_piece(self.session.falling_piece())
                .block(
                    Block::bordered()
                        .border_style(border_style)
                        .style(style::BOARD),
                );
            if state.is_playing() {
                widget.ghost(self.session.simulate_drop_position())
            } else {
                widget
            }
        };
        let next_panel = NextPieceDisplay::new()
            .piece(self.session.next_piece_kind())
            .block(
                Block::bordered()
                    .title(Line::from("NEXT").centered())
                    .padding(block_padding)
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let session_stats = SessionStatsDisplay::new(self.session).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        let banner = match state {
            SessionState::Playing => None,
            SessionState::Paused => Some((
                "PAUSED",
                Style::new().fg(color::BLACK).bg(color::YELLOW),
                &[][..],
            )),
            SessionState::Won => Some((
                "YOU WIN!",
                Style::new().fg(color::BLACK).bg(color::GREEN),
                self.result_bindings,
            )),
            SessionState::GameOver => Some((
                "GAME OVER!!",
                Style::new().fg(color::WHITE).bg(color::RED),
                self.result_bindings,
            )),
        };

        if let Some((title, style, bindings)) = banner {
            let height = if bindings.is_empty() { 3 } else { 5 };
            let block = Block::new().style(style).padding(block_padding);
            let area = board_area.centered(
                Constraint::Length(game_board_width),
                Constraint::Length(height),
            );
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            if bindings.is_empty() {
                let title_area = inner.centered_vertically(Constraint::Length(1));
                Line::styled(title, style).centered().render(title_area, buf);
            } else {
                let [title_area, _, hints_area] =
                    Layout::vertical([Constraint::Length(1); 3])
                        .flex(Flex::Center)
                        .areas(inner);
                Line::styled(title, style).centered().render(title_area, buf);
                KeyBindingDisplay::new(bindings).render(hints_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tetris2048_engine::SessionConfig;

    use super::*;

    fn screen_text(session: &GameSession) -> String {
        let area = Rect::new(0, 0, 120, 30);
        let mut buf = Buffer::empty(area);
        SessionDisplay::new(session)
            .result_bindings(&[(&["q"], "Quit")])
            .render(area, &mut buf);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_panels_are_drawn() {
        let session = GameSession::new(SessionConfig::default()).unwrap();
        let text = screen_text(&session);
        assert!(text.contains("STATS"));
        assert!(text.contains("NEXT"));
        assert!(!text.contains("PAUSED"));
    }

    #[test]
    fn test_pause_banner() {
        let mut session = GameSession::new(SessionConfig::default()).unwrap();
        session.toggle_pause();
        let text = screen_text(&session);
        assert!(text.contains("PAUSED"));
        assert!(!text.contains("Quit"));
    }
}
