use crossterm::event::{Event, KeyEvent};
use log::info;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use tetris2048_engine::{
    Difficulty, GameSession, InvalidBoardSizeError, SessionConfig, SessionOutcome,
};
use tetris2048_runtime::{RenderMode, Runtime, Screen, ScreenTransition};

use super::{MenuScreen, ScreenContext};
use crate::{
    command::play::{
        FPS,
        input::{PlayAction, ResultAction},
        summary::SessionSummary,
    },
    view::widgets::{KeyBindingDisplay, SessionDisplay},
};

/// The playfield of one running session.
#[derive(Debug)]
pub(crate) struct PlayScreen {
    context: ScreenContext,
    session: GameSession,
}

impl PlayScreen {
    pub(crate) fn new(
        context: ScreenContext,
        difficulty: Difficulty,
    ) -> Result<Self, InvalidBoardSizeError> {
        let config = SessionConfig {
            difficulty,
            ..context.config.clone()
        };
        let session = GameSession::new(config)?;
        info!(
            "new session: {difficulty}, {}x{}, seed {}",
            session.board().width(),
            session.board().height(),
            session.seed()
        );
        Ok(Self { context, session })
    }

    fn record_summary(&self) {
        self.context.record(SessionSummary::from_session(&self.session));
    }

    /// Applies a key press and returns where the screen stack goes next.
    fn handle_key(&mut self, event: &KeyEvent) -> ScreenTransition {
        let state = self.session.session_state();
        if state.is_playing() || state.is_paused() {
            match PlayAction::from_key_event(event) {
                Some(PlayAction::Game(input)) => self.session.handle_input(input),
                Some(PlayAction::Quit) => return ScreenTransition::Exit,
                None => {}
            }
            return ScreenTransition::Stay;
        }

        match ResultAction::from_key_event(state, self.session.difficulty(), event) {
            Some(ResultAction::Continue) => self.session.continue_after_win(),
            Some(ResultAction::Finish(outcome)) => return self.finish(outcome),
            None => {}
        }
        ScreenTransition::Stay
    }

    fn finish(&mut self, outcome: SessionOutcome) -> ScreenTransition {
        match outcome {
            SessionOutcome::Continue(_) => {
                self.record_summary();
                self.session.restart();
                ScreenTransition::Stay
            }
            SessionOutcome::Restart => {
                ScreenTransition::Replace(Box::new(MenuScreen::difficulty(self.context.clone())))
            }
            SessionOutcome::Exit => ScreenTransition::Exit,
        }
    }
}

impl Screen for PlayScreen {
    #[expect(clippy::cast_precision_loss)]
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(FPS as f64));
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS as f64));
    }

    fn on_close(&mut self, _runtime: &mut Runtime) {
        self.record_summary();
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        match event.as_key_press_event() {
            Some(key) => self.handle_key(&key),
            None => ScreenTransition::Stay,
        }
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        self.session.increment_frame();
    }

    fn draw(&self, frame: &mut Frame) {
        let state = self.session.session_state();
        let result_bindings = ResultAction::bindings(state);
        let help_bindings = if result_bindings.is_empty() {
            PlayAction::bindings()
        } else {
            result_bindings
        };

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(
            SessionDisplay::new(&self.session).result_bindings(result_bindings),
            main_area,
        );
        frame.render_widget(KeyBindingDisplay::new(help_bindings), help_area);
    }
}
