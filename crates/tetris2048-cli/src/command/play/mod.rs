use std::{cell::RefCell, io, rc::Rc};

use anyhow::Context as _;
use log::info;
use tetris2048_engine::{Board, Difficulty, PieceSeed, SessionConfig};
use tetris2048_runtime::{Runtime, Screen, ScreenStack};

use self::{
    screens::{MenuScreen, PlayScreen, ScreenContext},
    summary::SessionSummary,
};

mod input;
mod screens;
mod summary;

const FPS: u64 = 60;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Start right away at this speed instead of showing the menu
    #[clap(long)]
    difficulty: Option<Difficulty>,
    /// Seed for the piece sequence (32 hex characters)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Board width in cells
    #[clap(long, default_value_t = 12)]
    width: usize,
    /// Board height in cells
    #[clap(long, default_value_t = 20)]
    height: usize,
    /// Remove tiles without support below them after each lock
    #[clap(long)]
    sweep_free_tiles: bool,
    /// Print a JSON summary of every finished session when the game exits
    #[clap(long)]
    summary: bool,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            difficulty: None,
            seed: None,
            width: 12,
            height: 20,
            sweep_free_tiles: false,
            summary: false,
        }
    }
}

impl PlayArg {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            board_width: self.width,
            board_height: self.height,
            difficulty: self.difficulty.unwrap_or_default(),
            fps: FPS,
            seed: self.seed,
            sweep_free_tiles: self.sweep_free_tiles,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    // Reject a bad board size before the terminal is taken over.
    Board::new(arg.height, arg.width).context("Invalid board size")?;

    let summaries = Rc::new(RefCell::new(vec![]));
    let context = ScreenContext::new(arg.session_config(), Rc::clone(&summaries));
    let initial: Box<dyn Screen> = match arg.difficulty {
        Some(difficulty) => Box::new(
            PlayScreen::new(context, difficulty).context("Failed to start the game session")?,
        ),
        None => Box::new(MenuScreen::new(context)),
    };

    let mut runtime = Runtime::new();
    runtime.set_mouse_capture(true);
    runtime
        .run(&mut ScreenStack::new(initial))
        .context("Terminal I/O failed")?;

    let summaries = summaries.take();
    info!("played {} sessions", summaries.len());
    if arg.summary {
        summary::write_json(io::stdout().lock(), &summaries)?;
    }
    Ok(())
}
