use std::{cell::RefCell, rc::Rc};

use log::info;
use tetris2048_engine::SessionConfig;

pub(crate) use self::{menu::MenuScreen, play::PlayScreen};
use crate::command::play::summary::SessionSummary;

mod menu;
mod play;

/// State shared by every screen of one `play` run.
#[derive(Debug, Clone)]
pub(crate) struct ScreenContext {
    /// Configuration for new sessions; the difficulty is picked per session.
    config: SessionConfig,
    summaries: Rc<RefCell<Vec<SessionSummary>>>,
}

impl ScreenContext {
    pub(crate) fn new(config: SessionConfig, summaries: Rc<RefCell<Vec<SessionSummary>>>) -> Self {
        Self { config, summaries }
    }

    fn record(&self, summary: SessionSummary) {
        info!(
            "session finished: score {}, {} pieces",
            summary.score,
            summary.stats.completed_pieces()
        );
        self.summaries.borrow_mut().push(summary);
    }
}
