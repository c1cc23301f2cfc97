use std::io::Write;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tetris2048_engine::{Difficulty, GameSession, GameStats, PieceSeed, SessionState};

/// Result of one played session, as printed by `--summary`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SessionSummary {
    /// When the session ended
    pub finished_at: DateTime<Utc>,
    pub difficulty: Difficulty,
    pub seed: PieceSeed,
    pub score: u64,
    /// Whether a 2048 tile was reached
    pub won: bool,
    /// Whether the session ended by topping out
    pub game_over: bool,
    /// Time spent playing, in seconds
    pub play_time: f64,
    pub stats: GameStats,
}

impl SessionSummary {
    pub(crate) fn from_session(session: &GameSession) -> Self {
        Self {
            finished_at: Utc::now(),
            difficulty: session.difficulty(),
            seed: session.seed(),
            score: session.score(),
            won: session.board().is_game_won(),
            game_over: session.session_state() == SessionState::GameOver,
            play_time: session.duration().as_secs_f64(),
            stats: session.stats().clone(),
        }
    }
}

pub(crate) fn write_json<W>(mut writer: W, summaries: &[SessionSummary]) -> anyhow::Result<()>
where
    W: Write,
{
    serde_json::to_writer_pretty(&mut writer, summaries)
        .context("Failed to write session summary")?;
    writeln!(writer).context("Failed to write session summary")?;
    writer.flush().context("Failed to flush session summary")?;
    Ok(())
}
