//! Game flow on top of the core data structures.
//!
//! - [`GameSession`] - A running game: board, falling piece, timing and state
//! - [`GameStats`] - Counters kept while a session is played
//! - [`PieceGenerator`] - Seeded source of new pieces
//! - [`PieceSeed`] - Seed for deterministic piece generation
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] from a [`SessionConfig`]
//! 2. Feed player input through [`GameSession::handle_input`]
//! 3. Call [`GameSession::increment_frame`] once per frame; at the
//!    difficulty's fall interval the piece drops one row, stacked equal
//!    tiles merge, and a piece that cannot drop is locked
//! 4. Full rows are cleared, the score may double every tile, and the next
//!    piece spawns
//! 5. The session is won when a 2048 tile appears and over when a piece tops
//!    out or cannot spawn
//!
//! # Example
//!
//! ```
//! use tetris2048_engine::{Difficulty, GameInput, GameSession, SessionConfig};
//!
//! let config = SessionConfig {
//!     difficulty: Difficulty::Hard,
//!     ..SessionConfig::default()
//! };
//! let mut session = GameSession::new(config).unwrap();
//!
//! session.handle_input(GameInput::Left);
//! session.handle_input(GameInput::HardDrop);
//! for _ in 0..session.frames_per_fall() {
//!     session.increment_frame();
//! }
//!
//! assert_eq!(session.stats().completed_pieces(), 1);
//! ```

pub use self::{game_session::*, game_stats::*, piece_generator::*};

mod game_session;
mod game_stats;
mod piece_generator;
