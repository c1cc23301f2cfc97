use crossterm::event::{KeyCode, KeyEvent};
use tetris2048_engine::{Difficulty, GameInput, SessionOutcome, SessionState};

use crate::view::widgets::KeyBinding;

/// Key commands while a session is running or paused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PlayAction {
    Game(GameInput),
    Quit,
}

impl PlayAction {
    pub(crate) fn from_key_event(event: &KeyEvent) -> Option<Self> {
        let input = match event.code {
            KeyCode::Left => GameInput::Left,
            KeyCode::Right => GameInput::Right,
            KeyCode::Down => GameInput::SoftDrop,
            KeyCode::Up => GameInput::Rotate,
            KeyCode::Char('s') => GameInput::HardDrop,
            KeyCode::Char('p') => GameInput::TogglePause,
            KeyCode::Char('q') | KeyCode::Esc => return Some(Self::Quit),
            _ => return None,
        };
        Some(Self::Game(input))
    }

    pub(crate) fn bindings() -> &'static [KeyBinding<'static>] {
        &[
            (&["←", "→"], "Move"),
            (&["↓"], "Soft Drop"),
            (&["↑"], "Rotate"),
            (&["s"], "Hard Drop"),
            (&["p"], "Pause"),
            (&["q", "Esc"], "Quit"),
        ]
    }
}

/// Key commands once a session is won or over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ResultAction {
    /// Keep playing after reaching 2048.
    Continue,
    Finish(SessionOutcome),
}

impl ResultAction {
    /// Maps a key for a session in `state`; "play again" keeps `difficulty`.
    pub(crate) fn from_key_event(
        state: SessionState,
        difficulty: Difficulty,
        event: &KeyEvent,
    ) -> Option<Self> {
        match (state, event.code) {
            (SessionState::Won, KeyCode::Char('c')) => Some(Self::Continue),
            (SessionState::GameOver, KeyCode::Enter) => {
                Some(Self::Finish(SessionOutcome::Continue(difficulty)))
            }
            (SessionState::Won | SessionState::GameOver, KeyCode::Char('r')) => {
                Some(Self::Finish(SessionOutcome::Restart))
            }
            (SessionState::Won | SessionState::GameOver, KeyCode::Char('q') | KeyCode::Esc) => {
                Some(Self::Finish(SessionOutcome::Exit))
            }
            _ => None,
        }
    }

    pub(crate) fn bindings(state: SessionState) -> &'static [KeyBinding<'static>] {
        match state {
            SessionState::Won => &[(&["c"], "Continue"), (&["r"], "Menu"), (&["q"], "Quit")],
            SessionState::GameOver => {
                &[(&["Enter"], "Play Again"), (&["r"], "Menu"), (&["q"], "Quit")]
            }
            SessionState::Playing | SessionState::Paused => &[],
        }
    }
}
