use std::time::Duration;

use log::{info, trace};
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::{
    Board, Direction, InvalidBoardSizeError, Piece, PieceCollisionError, PieceKind, RotateError,
};

use super::{GameStats, PieceGenerator, PieceSeed};

/// Fall speed of the falling piece.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::FromStr,
    Serialize,
    Deserialize,
)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Time between two gravity steps.
    #[must_use]
    pub const fn fall_interval(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(1000),
            Difficulty::Medium => Duration::from_millis(500),
            Difficulty::Hard => Duration::from_millis(250),
        }
    }
}

/// Parameters of a [`GameSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub board_width: usize,
    pub board_height: usize,
    pub difficulty: Difficulty,
    /// Frames per second at which [`GameSession::increment_frame`] is called.
    pub fps: u64,
    /// Seed for the piece sequence; a random one is drawn when `None`.
    pub seed: Option<PieceSeed>,
    /// Also remove tiles left hanging after each lock.
    pub sweep_free_tiles: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board_width: 12,
            board_height: 20,
            difficulty: Difficulty::default(),
            fps: 60,
            seed: None,
            sweep_free_tiles: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    /// A 2048 tile has appeared. Play can continue.
    Won,
    GameOver,
}

/// Player commands understood by [`GameSession::handle_input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    Left,
    Right,
    SoftDrop,
    Rotate,
    HardDrop,
    TogglePause,
}

/// What a finished session asks its caller to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Start a new session at the same difficulty.
    Continue(Difficulty),
    /// Go back to difficulty selection.
    Restart,
    Exit,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    seed: PieceSeed,
    board: Board,
    generator: PieceGenerator,
    falling_piece: Piece,
    stats: GameStats,
    session_state: SessionState,
    total_frames: u64,
    drop_frames: u64,
}

fn frames_per_fall(difficulty: Difficulty, fps: u64) -> u64 {
    let millis = u64::try_from(difficulty.fall_interval().as_millis()).unwrap_or(u64::MAX);
    (millis * fps / 1000).max(1)
}

impl GameSession {
    /// Starts a session with an empty board and a freshly spawned piece.
    pub fn new(config: SessionConfig) -> Result<Self, InvalidBoardSizeError> {
        let board = Board::new(config.board_height, config.board_width)?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut generator = PieceGenerator::with_seed(seed);
        let falling_piece = generator.spawn_next(&board);
        info!(
            "session started: difficulty {}, seed {seed}, board {}x{}",
            config.difficulty, config.board_width, config.board_height
        );
        Ok(Self {
            drop_frames: frames_per_fall(config.difficulty, config.fps),
            config,
            seed,
            board,
            generator,
            falling_piece,
            stats: GameStats::new(),
            session_state: SessionState::Playing,
            total_frames: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// Seed of the current piece sequence.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access to the board, for setting up positions.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.board.score()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    /// Replaces the falling piece, unless it overlaps a locked tile.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if piece.is_colliding(&self.board) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    #[must_use]
    pub fn next_piece_kind(&self) -> PieceKind {
        self.generator.peek_next()
    }

    /// Where the falling piece would land if hard dropped now.
    #[must_use]
    pub fn simulate_drop_position(&self) -> Piece {
        self.falling_piece.drop_position(&self.board)
    }

    /// Number of frames between two gravity steps.
    #[must_use]
    pub fn frames_per_fall(&self) -> u64 {
        frames_per_fall(self.config.difficulty, self.config.fps)
    }

    /// Time spent playing, derived from the frames counted while not paused.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.total_frames * 1000 / self.config.fps.max(1))
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            state @ (SessionState::Won | SessionState::GameOver) => state,
        };
        info!("session state: {:?}", self.session_state);
    }

    /// Applies a player command.
    ///
    /// Movement only happens while playing. Afterwards every floating group
    /// of locked tiles settles one row.
    pub fn handle_input(&mut self, input: GameInput) {
        trace!("input: {input:?}");
        match input {
            GameInput::TogglePause => {
                self.toggle_pause();
                return;
            }
            _ if !self.session_state.is_playing() => return,
            GameInput::Left => {
                _ = self.try_move_left();
            }
            GameInput::Right => {
                _ = self.try_move_right();
            }
            GameInput::SoftDrop => {
                _ = self.try_soft_drop();
            }
            GameInput::Rotate => {
                _ = self.try_rotate();
            }
            GameInput::HardDrop => self.hard_drop(),
        }
        self.settle_components();
    }

    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.falling_piece.try_move(Direction::Left, &self.board)
    }

    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.falling_piece.try_move(Direction::Right, &self.board)
    }

    pub fn try_soft_drop(&mut self) -> Result<(), PieceCollisionError> {
        self.falling_piece.try_move(Direction::Down, &self.board)
    }

    pub fn try_rotate(&mut self) -> Result<(), RotateError> {
        self.falling_piece.try_rotate(&self.board)
    }

    /// Drops the piece as far as it goes. It locks on the next gravity step.
    pub fn hard_drop(&mut self) {
        self.falling_piece.hard_drop(&self.board);
    }

    /// Counts one frame, running a gravity step when the fall interval ends.
    ///
    /// Nothing happens unless the session is playing.
    pub fn increment_frame(&mut self) {
        if !self.session_state.is_playing() {
            return;
        }
        self.total_frames += 1;
        self.drop_frames = self.drop_frames.saturating_sub(1);
        if self.drop_frames == 0 {
            self.drop_frames = self.frames_per_fall();
            self.gravity_tick();
        }
    }

    /// Resumes play after a win.
    pub fn continue_after_win(&mut self) {
        if self.session_state.is_won() {
            self.session_state = SessionState::Playing;
            info!("continuing after win");
        }
    }

    /// Starts over on an empty board with the same configuration.
    ///
    /// A configured seed replays the same pieces; otherwise a new seed is drawn.
    pub fn restart(&mut self) {
        self.seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        self.generator = PieceGenerator::with_seed(self.seed);
        self.board.reset();
        self.stats = GameStats::new();
        self.total_frames = 0;
        self.drop_frames = self.frames_per_fall();
        self.session_state = SessionState::Playing;
        info!("session restarted: seed {}", self.seed);
        self.spawn_piece();
    }

    fn gravity_tick(&mut self) {
        let moved = self.falling_piece.try_move(Direction::Down, &self.board);
        let merges = self.board.merge_tiles();
        self.stats.record_merges(merges);
        if moved.is_err() {
            self.lock_falling_piece();
        }
        if self.session_state.is_playing() && !self.board.is_game_won() && self.board.check_win()
        {
            self.board.mark_won();
            self.session_state = SessionState::Won;
            info!("2048 reached with score {}", self.board.score());
        }
    }

    fn lock_falling_piece(&mut self) {
        let (tiles, position) = self.falling_piece.min_bounded_tiles_with_position();
        let (cleared_rows, result) = self.board.lock_piece(&tiles, position);
        self.stats.complete_piece_lock(cleared_rows);
        if self.config.sweep_free_tiles {
            let removed = self.board.delete_free_tiles();
            self.stats.record_free_tiles(removed);
        }
        self.stats.observe_tile(self.board.highest_tile());
        if result.is_err() {
            self.end_game();
            return;
        }
        self.spawn_piece();
    }

    fn spawn_piece(&mut self) {
        self.falling_piece = self.generator.spawn_next(&self.board);
        if self.falling_piece.is_colliding(&self.board) {
            self.end_game();
        }
    }

    fn end_game(&mut self) {
        self.session_state = SessionState::GameOver;
        info!(
            "game over: score {}, {} pieces",
            self.board.score(),
            self.stats.completed_pieces()
        );
    }

    /// Moves floating groups of locked tiles down one row, unless that would
    /// push them into the falling piece.
    fn settle_components(&mut self) {
        let labels = self.board.label_components();
        let mut settled = self.board.clone();
        if settled.move_down_components(&labels) > 0 && !self.falling_piece.is_colliding(&settled)
        {
            self.board = settled;
        }
    }
}
