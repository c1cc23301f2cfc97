use serde::{Deserialize, Serialize};

use crate::Tile;

/// Counters kept while a session is played.
///
/// The score itself belongs to the [`Board`](crate::Board), which applies the
/// threshold doubling; these are the numbers around it.
///
/// # Example
///
/// ```
/// use tetris2048_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_lock(2);
/// stats.record_merges(3);
///
/// assert_eq!(stats.completed_pieces(), 1);
/// assert_eq!(stats.total_cleared_rows(), 2);
/// assert_eq!(stats.merges(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    completed_pieces: usize,
    total_cleared_rows: usize,
    merges: usize,
    free_tiles_removed: usize,
    highest_tile: u32,
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            completed_pieces: 0,
            total_cleared_rows: 0,
            merges: 0,
            free_tiles_removed: 0,
            highest_tile: 0,
        }
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_rows(&self) -> usize {
        self.total_cleared_rows
    }

    #[must_use]
    pub const fn merges(&self) -> usize {
        self.merges
    }

    #[must_use]
    pub const fn free_tiles_removed(&self) -> usize {
        self.free_tiles_removed
    }

    /// Highest tile value seen on the board after a lock, 0 before the first.
    #[must_use]
    pub const fn highest_tile(&self) -> u32 {
        self.highest_tile
    }

    /// Updates statistics after a piece is locked into the board.
    pub const fn complete_piece_lock(&mut self, cleared_rows: usize) {
        self.completed_pieces += 1;
        self.total_cleared_rows += cleared_rows;
    }

    pub const fn record_merges(&mut self, merges: usize) {
        self.merges += merges;
    }

    pub const fn record_free_tiles(&mut self, removed: usize) {
        self.free_tiles_removed += removed;
    }

    pub fn observe_tile(&mut self, tile: Option<Tile>) {
        if let Some(tile) = tile {
            self.highest_tile = self.highest_tile.max(tile.value());
        }
    }
}
