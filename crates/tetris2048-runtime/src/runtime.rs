use std::{io, time::Duration};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
};
use log::{debug, warn};
use ratatui::Frame;

use crate::event_loop::{EventLoop, RenderMode, TuiEvent};

/// An application driven by [`Runtime::run`].
pub trait App {
    /// Called once before the first event. Configure the tick rate and
    /// render mode here.
    fn init(&mut self, runtime: &mut Runtime);

    /// Checked before every event; `true` ends [`Runtime::run`].
    fn should_exit(&self) -> bool;

    /// Handles a key press, mouse or resize event.
    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances the application by one tick.
    fn update(&mut self, runtime: &mut Runtime);
}

/// Owner of the terminal and the event loop.
///
/// # Example
///
/// ```no_run
/// use crossterm::event::Event;
/// use ratatui::Frame;
/// use tetris2048_runtime::{App, RenderMode, Runtime};
///
/// struct Counter {
///     ticks: u64,
/// }
///
/// impl App for Counter {
///     fn init(&mut self, runtime: &mut Runtime) {
///         runtime.set_tick_rate(Some(60.0));
///         runtime.set_render_mode(RenderMode::throttled_from_rate(30.0));
///     }
///     fn should_exit(&self) -> bool {
///         self.ticks >= 120
///     }
///     fn handle_event(&mut self, _runtime: &mut Runtime, _event: Event) {}
///     fn draw(&self, frame: &mut Frame) {
///         frame.render_widget(format!("{} ticks", self.ticks), frame.area());
///     }
///     fn update(&mut self, _runtime: &mut Runtime) {
///         self.ticks += 1;
///     }
/// }
///
/// Runtime::new().run(&mut Counter { ticks: 0 }).unwrap();
/// ```
#[derive(Debug)]
pub struct Runtime {
    events: EventLoop,
    mouse_capture: bool,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns mouse reporting off again when the run ends, including on error.
struct MouseCapture;

impl MouseCapture {
    fn enable() -> io::Result<Self> {
        execute!(io::stdout(), EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for MouseCapture {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), DisableMouseCapture) {
            warn!("failed to disable mouse capture: {e}");
        }
    }
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: EventLoop::new(),
            mouse_capture: false,
        }
    }

    /// Sets the tick rate in ticks per second. `None` disables ticks.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.set_tick_interval(rate.map(|rate| Duration::from_secs_f64(1.0 / rate)));
    }

    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Requests mouse events from the terminal while running.
    ///
    /// Takes effect when [`Self::run`] starts.
    pub fn set_mouse_capture(&mut self, enabled: bool) {
        self.mouse_capture = enabled;
    }

    /// Takes over the terminal and runs `app` until it asks to exit.
    ///
    /// Ticks go to [`App::update`], renders to [`App::draw`] and terminal
    /// events to [`App::handle_event`]. The terminal is restored on return.
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            let _mouse = self.mouse_capture.then(MouseCapture::enable).transpose()?;
            debug!("event loop started");
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => app.update(&mut self),
                    TuiEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, event),
                }
            }
            debug!("event loop finished");
            Ok(())
        })
    }
}
