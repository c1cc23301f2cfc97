use std::fmt;

use crossterm::event::Event;
use log::debug;
use ratatui::Frame;

use crate::{App, Runtime};

/// One screen of the application: a menu, the playfield, a result dialog.
///
/// Only the screen on top of a [`ScreenStack`] receives events, ticks and
/// draw calls.
///
/// # Lifecycle
///
/// ```text
/// on_active()  <-------------+
///   |                        |
/// (foreground)               | screen above pops
///   |                        |
/// on_inactive() -> (background)
///   |
/// on_close()   only when removed by Pop, Replace or Exit
/// ```
///
/// A screen applies its [`Runtime`] settings (tick rate, render mode, mouse
/// capture) in [`on_active`](Self::on_active), so they are restored whenever
/// it returns to the foreground.
///
/// ```rust
/// use crossterm::event::{Event, KeyCode};
/// use ratatui::Frame;
/// use tetris2048_runtime::{RenderMode, Runtime, Screen, ScreenTransition};
///
/// #[derive(Debug)]
/// struct Title;
///
/// impl Screen for Title {
///     fn on_active(&mut self, runtime: &mut Runtime) {
///         runtime.set_tick_rate(None);
///         runtime.set_render_mode(RenderMode::OnDirty);
///     }
///
///     fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
///         match event.as_key_press_event().map(|key| key.code) {
///             Some(KeyCode::Char('q')) => ScreenTransition::Exit,
///             _ => ScreenTransition::Stay,
///         }
///     }
///
///     fn draw(&self, frame: &mut Frame) {
///         frame.render_widget("TETRIS 2048", frame.area());
///     }
/// }
/// ```
pub trait Screen: fmt::Debug {
    /// Called when the screen comes to the foreground: at startup, when it is
    /// pushed, and when the screen above it pops.
    fn on_active(&mut self, runtime: &mut Runtime);

    /// Called when the screen leaves the foreground, whether it is covered by
    /// a pushed screen or about to be closed.
    fn on_inactive(&mut self, _runtime: &mut Runtime) {}

    /// Called after [`on_inactive`](Self::on_inactive) when the screen is
    /// removed from the stack for good.
    fn on_close(&mut self, _runtime: &mut Runtime) {}

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition;

    /// Called on every tick.
    fn update(&mut self, _runtime: &mut Runtime) {}

    fn draw(&self, frame: &mut Frame);
}

/// What the stack does after a screen handled an event.
#[derive(Debug)]
pub enum ScreenTransition {
    Stay,
    /// Cover the current screen with a new one.
    Push(Box<dyn Screen>),
    /// Close the current screen and reactivate the one below.
    Pop,
    /// Close the current screen and put a new one in its place.
    Replace(Box<dyn Screen>),
    /// Close every screen and end the application.
    Exit,
}

/// A stack of [`Screen`]s run as an [`App`].
///
/// The application exits once the stack is empty.
#[derive(Debug)]
pub struct ScreenStack<'a> {
    screens: Vec<Box<dyn Screen + 'a>>,
    should_exit: bool,
}

impl<'a> ScreenStack<'a> {
    #[must_use]
    pub fn new(initial: Box<dyn Screen + 'a>) -> Self {
        Self {
            screens: vec![initial],
            should_exit: false,
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.screens.len()
    }

    fn close_top(&mut self, runtime: &mut Runtime) {
        if let Some(mut screen) = self.screens.pop() {
            screen.on_inactive(runtime);
            screen.on_close(runtime);
        }
    }

    fn apply_transition(&mut self, runtime: &mut Runtime, transition: ScreenTransition) {
        match transition {
            ScreenTransition::Stay => return,
            ScreenTransition::Push(mut screen) => {
                if let Some(current) = self.screens.last_mut() {
                    current.on_inactive(runtime);
                }
                screen.on_active(runtime);
                self.screens.push(screen);
            }
            ScreenTransition::Pop => {
                self.close_top(runtime);
                if let Some(previous) = self.screens.last_mut() {
                    previous.on_active(runtime);
                }
            }
            ScreenTransition::Replace(mut screen) => {
                self.close_top(runtime);
                screen.on_active(runtime);
                self.screens.push(screen);
            }
            ScreenTransition::Exit => {
                while !self.screens.is_empty() {
                    self.close_top(runtime);
                }
                self.should_exit = true;
            }
        }
        debug!("screen stack depth: {}", self.screens.len());
    }
}

impl App for ScreenStack<'_> {
    fn init(&mut self, runtime: &mut Runtime) {
        if let Some(screen) = self.screens.last_mut() {
            screen.on_active(runtime);
        }
    }

    fn should_exit(&self) -> bool {
        self.should_exit || self.screens.is_empty()
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        if let Some(current) = self.screens.last_mut() {
            let transition = current.handle_event(runtime, &event);
            self.apply_transition(runtime, transition);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        if let Some(current) = self.screens.last() {
            current.draw(frame);
        }
    }

    fn update(&mut self, runtime: &mut Runtime) {
        if let Some(current) = self.screens.last_mut() {
            current.update(runtime);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, mem, rc::Rc};

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;

    /// Shared record of lifecycle calls.
    #[derive(Debug, Clone, Default)]
    struct CallLog(Rc<RefCell<Vec<String>>>);

    impl CallLog {
        fn push(&self, call: String) {
            self.0.borrow_mut().push(call);
        }

        fn take(&self) -> Vec<String> {
            mem::take(&mut self.0.borrow_mut())
        }
    }

    #[derive(Debug)]
    struct LoggingScreen {
        name: &'static str,
        log: CallLog,
        on_event: Option<ScreenTransition>,
    }

    impl LoggingScreen {
        fn boxed(name: &'static str, log: &CallLog) -> Box<Self> {
            Self::with_transition(name, log, ScreenTransition::Stay)
        }

        fn with_transition(
            name: &'static str,
            log: &CallLog,
            transition: ScreenTransition,
        ) -> Box<Self> {
            Box::new(Self {
                name,
                log: log.clone(),
                on_event: Some(transition),
            })
        }
    }

    impl Screen for LoggingScreen {
        fn on_active(&mut self, _runtime: &mut Runtime) {
            self.log.push(format!("{} active", self.name));
        }

        fn on_inactive(&mut self, _runtime: &mut Runtime) {
            self.log.push(format!("{} inactive", self.name));
        }

        fn on_close(&mut self, _runtime: &mut Runtime) {
            self.log.push(format!("{} close", self.name));
        }

        fn handle_event(&mut self, _runtime: &mut Runtime, _event: &Event) -> ScreenTransition {
            self.log.push(format!("{} event", self.name));
            self.on_event.take().unwrap_or(ScreenTransition::Stay)
        }

        fn update(&mut self, _runtime: &mut Runtime) {
            self.log.push(format!("{} update", self.name));
        }

        fn draw(&self, _frame: &mut Frame) {}
    }

    #[derive(Debug)]
    struct QuietScreen;

    impl Screen for QuietScreen {
        fn on_active(&mut self, _runtime: &mut Runtime) {}

        fn handle_event(&mut self, _runtime: &mut Runtime, _event: &Event) -> ScreenTransition {
            ScreenTransition::Pop
        }

        fn draw(&self, _frame: &mut Frame) {}
    }

    fn key() -> Event {
        Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
    }

    fn started(initial: Box<dyn Screen>) -> (ScreenStack<'static>, Runtime) {
        let mut stack = ScreenStack::new(initial);
        let mut runtime = Runtime::new();
        stack.init(&mut runtime);
        (stack, runtime)
    }

    #[test]
    fn test_init_activates_initial_screen() {
        let log = CallLog::default();
        let (stack, _) = started(LoggingScreen::boxed("menu", &log));
        assert_eq!(log.take(), ["menu active"]);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_push_keeps_covered_screen_open() {
        let log = CallLog::default();
        let (mut stack, mut runtime) = started(LoggingScreen::boxed("menu", &log));
        log.take();

        stack.apply_transition(
            &mut runtime,
            ScreenTransition::Push(LoggingScreen::boxed("play", &log)),
        );
        assert_eq!(log.take(), ["menu inactive", "play active"]);
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_pop_from_event_reactivates_screen_below() {
        let log = CallLog::default();
        let (mut stack, mut runtime) = started(LoggingScreen::boxed("play", &log));
        stack.apply_transition(
            &mut runtime,
            ScreenTransition::Push(LoggingScreen::with_transition(
                "game over",
                &log,
                ScreenTransition::Pop,
            )),
        );
        log.take();

        stack.handle_event(&mut runtime, key());
        assert_eq!(
            log.take(),
            [
                "game over event",
                "game over inactive",
                "game over close",
                "play active"
            ]
        );
    }

    #[test]
    fn test_replace_closes_current_screen() {
        let log = CallLog::default();
        let (mut stack, mut runtime) = started(LoggingScreen::boxed("menu", &log));
        log.take();

        stack.apply_transition(
            &mut runtime,
            ScreenTransition::Replace(LoggingScreen::boxed("play", &log)),
        );
        assert_eq!(log.take(), ["menu inactive", "menu close", "play active"]);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_exit_closes_every_screen_top_first() {
        let log = CallLog::default();
        let (mut stack, mut runtime) = started(LoggingScreen::boxed("play", &log));
        stack.apply_transition(
            &mut runtime,
            ScreenTransition::Push(LoggingScreen::boxed("won", &log)),
        );
        log.take();

        stack.apply_transition(&mut runtime, ScreenTransition::Exit);
        assert_eq!(
            log.take(),
            ["won inactive", "won close", "play inactive", "play close"]
        );
        assert!(stack.should_exit());
    }

    #[test]
    fn test_popping_last_screen_exits() {
        let (mut stack, mut runtime) = started(Box::new(QuietScreen));
        assert!(!stack.should_exit());
        stack.handle_event(&mut runtime, key());
        assert!(stack.should_exit());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_only_top_screen_receives_calls() {
        let log = CallLog::default();
        let (mut stack, mut runtime) = started(LoggingScreen::boxed("play", &log));
        stack.apply_transition(
            &mut runtime,
            ScreenTransition::Push(LoggingScreen::boxed("paused", &log)),
        );
        log.take();

        stack.update(&mut runtime);
        stack.handle_event(&mut runtime, key());
        assert_eq!(log.take(), ["paused update", "paused event"]);
    }

    #[test]
    fn test_stay_has_no_effect() {
        let log = CallLog::default();
        let (mut stack, mut runtime) = started(LoggingScreen::boxed("menu", &log));
        log.take();
        stack.apply_transition(&mut runtime, ScreenTransition::Stay);
        assert!(log.take().is_empty());
        assert!(!stack.should_exit());
    }
}
