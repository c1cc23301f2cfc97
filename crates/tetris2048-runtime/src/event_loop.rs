use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyEventKind};

/// Events produced by the [`EventLoop`].
#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(crate) enum TuiEvent {
    /// Time to advance the game by one frame.
    Tick,
    /// Time to redraw.
    Render,
    /// Key press, mouse or resize event from the terminal.
    Crossterm(Event),
}

/// When the screen is redrawn.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Redraw after every tick or terminal event.
    #[default]
    OnDirty,
    /// Redraw after a tick or terminal event, at most once per interval.
    ///
    /// Changes arriving faster than the interval are drawn together.
    Throttled(Duration),
}

impl RenderMode {
    /// Creates `Throttled` mode from a frame rate (frames per second).
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Source of [`TuiEvent`]s.
///
/// Ticks have priority over renders, and renders over terminal input. While
/// nothing is due, the loop waits on the terminal with a timeout that ends at
/// the next tick or render.
#[derive(Debug)]
pub(crate) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl EventLoop {
    pub(crate) fn new() -> Self {
        let now = Instant::now();
        let long_ago = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: long_ago,
            last_render: long_ago,
            // The first frame is drawn right away.
            dirty: true,
        }
    }

    pub(crate) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    pub(crate) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Returns the next tick or render that is due at `now`, if any.
    fn due(&mut self, now: Instant) -> Option<TuiEvent> {
        if let Some(tick_interval) = self.tick_interval
            && now.duration_since(self.last_tick) >= tick_interval
        {
            self.last_tick = now;
            self.dirty = true;
            return Some(TuiEvent::Tick);
        }

        let render = match self.render_mode {
            RenderMode::OnDirty => self.dirty,
            RenderMode::Throttled(interval) => {
                self.dirty && now.duration_since(self.last_render) >= interval
            }
        };
        if render {
            self.last_render = now;
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    /// Blocks until the next event.
    ///
    /// Key release events are dropped; terminals that report them would
    /// otherwise trigger every binding twice.
    pub(crate) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due(now) {
                return Ok(event);
            }

            if let Some(timeout) = self.timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            let event = event::read()?;
            if let Event::Key(key) = &event
                && key.kind == KeyEventKind::Release
            {
                continue;
            }
            self.dirty = true;
            return Ok(event.into());
        }
    }

    /// Time left until the next tick or render, or `None` if only terminal
    /// input can wake the loop.
    fn timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = match self.render_mode {
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
        };
        let wake_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(wake_at.saturating_duration_since(now))
    }
}
