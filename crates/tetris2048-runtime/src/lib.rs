//! Terminal event loop and screen management for the game.
//!
//! [`Runtime`] owns the terminal for the duration of [`Runtime::run`] and
//! drives an [`App`]: it delivers ticks at a fixed rate, renders according to
//! a [`RenderMode`], and forwards key, mouse and resize events in between.
//! [`ScreenStack`] is an [`App`] made of stacked [`Screen`]s.

pub use self::{
    event_loop::RenderMode,
    runtime::{App, Runtime},
    screen::{Screen, ScreenStack, ScreenTransition},
};

mod event_loop;
mod runtime;
mod screen;
