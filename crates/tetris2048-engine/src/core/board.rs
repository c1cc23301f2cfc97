use arrayvec::ArrayVec;
use log::debug;

use crate::TopOutError;

use super::{matrix::TileMatrix, point::Point, tile::Tile};

/// Score values at which every tile on the board doubles, in ascending order.
pub const SCORE_THRESHOLDS: [u64; 2] = [200, 16000];

/// Tile value that wins the game.
pub const WINNING_VALUE: u32 = 2048;

/// Points awarded for each cleared row.
pub const ROW_CLEAR_POINTS: u64 = 100;

/// Converts a board or matrix extent to a signed coordinate.
///
/// Boards are at most [`Board::MAX_SIZE`] cells on a side and piece matrices
/// at most 4, so the value always fits.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub(crate) const fn coord(n: usize) -> i32 {
    n as i32
}

/// A single row of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    cells: Vec<Option<Tile>>,
}

impl BoardRow {
    fn empty(width: usize) -> Self {
        Self {
            cells: vec![None; width],
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Option<Tile>] {
        &self.cells
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// The grid of locked tiles, together with the score it has produced.
///
/// Rows are indexed bottom-up: row 0 is the floor. Columns run left to right.
/// Every mutation that awards points goes through [`Board::update_score`], so
/// the score-threshold doubling is applied uniformly.
///
/// # Example
///
/// ```
/// use tetris2048_engine::{Board, Tile};
///
/// let mut board = Board::new(20, 12).unwrap();
/// board.place_tile(0, 3, Some(Tile::FOUR));
/// board.place_tile(1, 3, Some(Tile::FOUR));
///
/// assert_eq!(board.merge_tiles(), 1);
/// assert_eq!(board.tile_at(0, 3).map(Tile::value), Some(8));
/// assert_eq!(board.score(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    height: usize,
    width: usize,
    rows: Vec<BoardRow>,
    score: u64,
    game_over: bool,
    game_won: bool,
    thresholds_crossed: usize,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display(
    "board size {height}x{width} is out of range ({}..={} cells per side)",
    Board::MIN_SIZE,
    Board::MAX_SIZE
)]
pub struct InvalidBoardSizeError {
    height: usize,
    width: usize,
}

/// Connected-component labelling of the occupied cells of a [`Board`].
///
/// Labels run from 1 to [`count`](Self::count); empty cells carry no label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentLabels {
    height: usize,
    width: usize,
    labels: Vec<u32>,
    count: u32,
}

impl ComponentLabels {
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[must_use]
    pub fn label_at(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.labels[row * self.width + col]).filter(|&label| label != 0)
    }

    /// Iterates over the `(row, col)` cells carrying `label`, bottom row first.
    pub fn cells(&self, label: u32) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(move |&(_, &l)| label != 0 && l == label)
            .map(|(i, _)| (i / self.width, i % self.width))
    }
}

impl Board {
    pub const MIN_SIZE: usize = 4;
    pub const MAX_SIZE: usize = 64;

    /// Creates an empty board.
    pub fn new(height: usize, width: usize) -> Result<Self, InvalidBoardSizeError> {
        let range = Self::MIN_SIZE..=Self::MAX_SIZE;
        if !range.contains(&height) || !range.contains(&width) {
            return Err(InvalidBoardSizeError { height, width });
        }
        Ok(Self {
            height,
            width,
            rows: (0..height).map(|_| BoardRow::empty(width)).collect(),
            score: 0,
            game_over: false,
            game_won: false,
            thresholds_crossed: 0,
        })
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub fn is_game_won(&self) -> bool {
        self.game_won
    }

    /// Number of entries of [`SCORE_THRESHOLDS`] the score has reached.
    #[must_use]
    pub fn thresholds_crossed(&self) -> usize {
        self.thresholds_crossed
    }

    #[must_use]
    pub fn tile_at(&self, row: usize, col: usize) -> Option<Tile> {
        self.rows.get(row)?.cells.get(col).copied().flatten()
    }

    /// Sets or clears a single cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside the board.
    pub fn place_tile(&mut self, row: usize, col: usize, tile: Option<Tile>) {
        assert!(row < self.height && col < self.width, "cell outside board");
        self.rows[row].cells[col] = tile;
    }

    /// Iterates over the rows, bottom row first.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &BoardRow> + ExactSizeIterator {
        self.rows.iter()
    }

    /// Iterates over the occupied cells as `(row, col, tile)`.
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .cells
                .iter()
                .enumerate()
                .filter_map(move |(col, tile)| tile.map(|tile| (row, col, tile)))
        })
    }

    #[must_use]
    pub fn highest_tile(&self) -> Option<Tile> {
        self.tiles().map(|(_, _, tile)| tile).max()
    }

    #[must_use]
    pub fn is_inside(&self, row: i32, col: i32) -> bool {
        self.index(row, col).is_some()
    }

    /// Returns whether a tile is present; cells outside the board are empty.
    #[must_use]
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        self.index(row, col)
            .is_some_and(|(row, col)| self.rows[row].cells[col].is_some())
    }

    fn index(&self, row: i32, col: i32) -> Option<(usize, usize)> {
        let row = usize::try_from(row).ok().filter(|&row| row < self.height)?;
        let col = usize::try_from(col).ok().filter(|&col| col < self.width)?;
        Some((row, col))
    }

    /// Writes a trimmed piece matrix onto the board and clears full rows.
    ///
    /// `bottom_left` is the board position of the matrix's bottom-left cell.
    /// Tiles landing outside the board are lost and end the game; the tiles
    /// that fit are still written.
    ///
    /// Returns the number of cleared rows, and an error if the board is over.
    pub fn lock_piece(
        &mut self,
        tiles: &TileMatrix,
        bottom_left: Point,
    ) -> (usize, Result<(), TopOutError>) {
        let last_row = tiles.rows().saturating_sub(1);
        for (r, c, tile) in tiles.occupied() {
            let position = bottom_left.translated(coord(c), coord(last_row - r));
            match self.index(position.y, position.x) {
                Some((row, col)) => self.rows[row].cells[col] = Some(tile),
                None => self.game_over = true,
            }
        }
        debug!(
            "locked {} tiles at ({}, {})",
            tiles.occupied_count(),
            bottom_left.x,
            bottom_left.y
        );

        let cleared = self.clear_full_rows();
        let result = if self.game_over {
            debug!("topped out");
            Err(TopOutError)
        } else {
            Ok(())
        };
        (cleared, result)
    }

    /// Removes every full row, shifting the rows above it down.
    ///
    /// Awards [`ROW_CLEAR_POINTS`] per cleared row and returns the count.
    pub fn clear_full_rows(&mut self) -> usize {
        self.rows.retain(|row| !row.is_full());
        let cleared = self.height - self.rows.len();
        if cleared == 0 {
            return 0;
        }
        let width = self.width;
        self.rows.resize_with(self.height, || BoardRow::empty(width));
        debug!("cleared {cleared} rows");
        self.update_score(ROW_CLEAR_POINTS * cleared as u64);
        cleared
    }

    /// Merges vertically stacked equal tiles in one upward sweep.
    ///
    /// The lower tile doubles, the upper one disappears and the column above
    /// it drops by one cell. The merged cell is not compared again in the same
    /// sweep, so chains resolve over successive calls. Each merge scores the
    /// new tile value.
    pub fn merge_tiles(&mut self) -> usize {
        let mut merges = 0;
        for col in 0..self.width {
            for row in 0..self.height - 1 {
                let (Some(lower), Some(upper)) = (
                    self.rows[row].cells[col],
                    self.rows[row + 1].cells[col],
                ) else {
                    continue;
                };
                if lower != upper {
                    continue;
                }
                let merged = lower.doubled();
                self.rows[row].cells[col] = Some(merged);
                for above in row + 1..self.height - 1 {
                    self.rows[above].cells[col] = self.rows[above + 1].cells[col];
                }
                self.rows[self.height - 1].cells[col] = None;
                merges += 1;
                debug!("merged into {merged} at ({col}, {row})");
                self.update_score(u64::from(merged.value()));
            }
        }
        merges
    }

    /// Labels 4-connected groups of occupied cells.
    ///
    /// Seeds are taken column by column from the left, bottom row first, so
    /// label numbers are stable for a given board.
    #[must_use]
    pub fn label_components(&self) -> ComponentLabels {
        let mut labels = vec![0; self.height * self.width];
        let mut count = 0;
        let mut stack = vec![];
        for col in 0..self.width {
            for row in 0..self.height {
                if labels[row * self.width + col] != 0 || self.rows[row].cells[col].is_none() {
                    continue;
                }
                count += 1;
                labels[row * self.width + col] = count;
                stack.push((row, col));
                while let Some((row, col)) = stack.pop() {
                    for (nr, nc) in self.neighbours(row, col) {
                        let label = &mut labels[nr * self.width + nc];
                        if *label == 0 && self.rows[nr].cells[nc].is_some() {
                            *label = count;
                            stack.push((nr, nc));
                        }
                    }
                }
            }
        }
        ComponentLabels {
            height: self.height,
            width: self.width,
            labels,
            count,
        }
    }

    fn neighbours(&self, row: usize, col: usize) -> ArrayVec<(usize, usize), 4> {
        let mut neighbours = ArrayVec::new();
        if row > 0 {
            neighbours.push((row - 1, col));
        }
        if row + 1 < self.height {
            neighbours.push((row + 1, col));
        }
        if col > 0 {
            neighbours.push((row, col - 1));
        }
        if col + 1 < self.width {
            neighbours.push((row, col + 1));
        }
        neighbours
    }

    /// Drops every component that does not touch the floor by one row.
    ///
    /// A component without a cell in row 0 has nothing beneath it: any
    /// occupied cell directly below one of its cells would belong to the same
    /// component. Returns the number of components moved.
    ///
    /// # Panics
    ///
    /// Panics if `labels` was computed for a board of another size.
    pub fn move_down_components(&mut self, labels: &ComponentLabels) -> usize {
        assert_eq!((labels.height, labels.width), (self.height, self.width));
        let mut falling = vec![true; labels.count as usize + 1];
        falling[0] = false;
        for col in 0..self.width {
            if let Some(label) = labels.label_at(0, col) {
                falling[label as usize] = false;
            }
        }
        let moved = falling.iter().filter(|&&f| f).count();
        if moved == 0 {
            return 0;
        }

        for row in 1..self.height {
            for col in 0..self.width {
                let label = labels.labels[row * self.width + col] as usize;
                if falling[label] {
                    self.rows[row - 1].cells[col] = self.rows[row].cells[col].take();
                }
            }
        }
        debug!("settled {moved} floating components");
        moved
    }

    /// Removes tiles without a continuous column of tiles down to the floor.
    ///
    /// Each removed tile scores its value. Returns the number removed.
    pub fn delete_free_tiles(&mut self) -> usize {
        let mut removed = 0;
        let mut points = 0;
        for col in 0..self.width {
            let mut grounded = true;
            for row in &mut self.rows {
                match row.cells[col] {
                    None => grounded = false,
                    Some(_) if grounded => {}
                    Some(tile) => {
                        row.cells[col] = None;
                        removed += 1;
                        points += u64::from(tile.value());
                    }
                }
            }
        }
        if removed > 0 {
            debug!("removed {removed} free tiles");
            self.update_score(points);
        }
        removed
    }

    /// Adds points and applies any score-threshold doubling not yet applied.
    pub fn update_score(&mut self, points: u64) {
        self.score += points;
        while let Some(&threshold) = SCORE_THRESHOLDS.get(self.thresholds_crossed) {
            if self.score < threshold {
                break;
            }
            self.thresholds_crossed += 1;
            debug!("score {} reached {threshold}, doubling tiles", self.score);
            self.double_tile_values();
        }
    }

    pub fn double_tile_values(&mut self) {
        for tile in self.rows.iter_mut().flat_map(|row| &mut row.cells).flatten() {
            *tile = tile.doubled();
        }
    }

    /// Returns whether any tile has reached [`WINNING_VALUE`].
    #[must_use]
    pub fn check_win(&self) -> bool {
        self.tiles().any(|(_, _, tile)| tile.value() == WINNING_VALUE)
    }

    pub fn mark_won(&mut self) {
        self.game_won = true;
    }

    pub fn reset(&mut self) {
        for row in &mut self.rows {
            *row = BoardRow::empty(self.width);
        }
        self.score = 0;
        self.game_over = false;
        self.game_won = false;
        self.thresholds_crossed = 0;
    }
}

#[cfg(test)]
mod tests {
    use crate::{Direction, Piece, PieceKind};

    use super::*;

    fn board() -> Board {
        Board::new(20, 12).unwrap()
    }

    fn tile(value: u32) -> Option<Tile> {
        Some(Tile::new(value).unwrap())
    }

    fn column(board: &Board, col: usize) -> Vec<Option<u32>> {
        (0..board.height())
            .map(|row| board.tile_at(row, col).map(Tile::value))
            .take_while(Option::is_some)
            .collect()
    }

    #[test]
    fn test_new_validates_size() {
        assert!(Board::new(20, 12).is_ok());
        assert!(Board::new(4, 4).is_ok());
        assert!(Board::new(3, 12).is_err());
        assert!(Board::new(20, 0).is_err());
        assert!(Board::new(20, 65).is_err());
    }

    #[test]
    fn test_occupancy_queries() {
        let mut board = board();
        board.place_tile(0, 0, tile(2));
        assert!(board.is_occupied(0, 0));
        assert!(!board.is_occupied(0, 1));
        assert!(!board.is_occupied(-1, 0));
        assert!(!board.is_occupied(20, 0));
        assert!(board.is_inside(19, 11));
        assert!(!board.is_inside(20, 11));
        assert!(!board.is_inside(0, 12));
        assert!(!board.is_inside(0, -1));
        assert_eq!(board.tile_at(99, 99), None);
    }

    #[test]
    fn test_lock_piece_writes_bottom_up() {
        let mut board = board();
        // Two rows: the top matrix row lands one board row higher.
        let tiles = TileMatrix::from_rows(vec![vec![tile(2), None], vec![tile(4), tile(8)]]);
        let (cleared, result) = board.lock_piece(&tiles, Point::new(3, 0));
        assert_eq!(cleared, 0);
        assert!(result.is_ok());
        assert_eq!(board.tile_at(1, 3), tile(2));
        assert_eq!(board.tile_at(0, 3), tile(4));
        assert_eq!(board.tile_at(0, 4), tile(8));
        assert_eq!(board.tile_at(1, 4), None);
    }

    #[test]
    fn test_lock_piece_above_top_is_game_over() {
        let mut board = board();
        let tiles = TileMatrix::from_rows(vec![vec![tile(2)], vec![tile(4)]]);
        let (_, result) = board.lock_piece(&tiles, Point::new(5, 19));
        assert!(result.is_err());
        assert!(board.is_game_over());
        // The cell that fits is still written.
        assert_eq!(board.tile_at(19, 5), tile(4));
    }

    #[test]
    fn test_clear_full_rows_shifts_down() {
        let mut board = board();
        for col in 0..12 {
            board.place_tile(0, col, tile(2));
            board.place_tile(2, col, tile(4));
        }
        board.place_tile(1, 5, tile(8));
        board.place_tile(3, 7, tile(16));

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.score(), 200);
        assert_eq!(board.tile_at(0, 5).map(Tile::value), Some(16));
        assert_eq!(board.tile_at(1, 7).map(Tile::value), Some(32));
        assert_eq!(board.tiles().count(), 2);
        assert!(board.rows().skip(2).all(BoardRow::is_empty));
    }

    #[test]
    fn test_merge_two_stacked_fours() {
        let mut board = board();
        board.place_tile(0, 3, tile(4));
        board.place_tile(1, 3, tile(4));
        board.place_tile(2, 3, tile(2));
        assert_eq!(board.merge_tiles(), 1);
        assert_eq!(column(&board, 3), vec![Some(8), Some(2)]);
        assert_eq!(board.score(), 8);
    }

    #[test]
    fn test_merge_is_a_single_sweep() {
        let mut board = board();
        for row in 0..3 {
            board.place_tile(row, 0, tile(2));
        }
        assert_eq!(board.merge_tiles(), 1);
        assert_eq!(column(&board, 0), vec![Some(4), Some(2)]);
        assert_eq!(board.merge_tiles(), 0);

        let mut board = self::board();
        board.place_tile(0, 0, tile(2));
        board.place_tile(1, 0, tile(2));
        board.place_tile(2, 0, tile(4));
        assert_eq!(board.merge_tiles(), 1);
        assert_eq!(column(&board, 0), vec![Some(4), Some(4)]);
        assert_eq!(board.merge_tiles(), 1);
        assert_eq!(column(&board, 0), vec![Some(8)]);
        assert_eq!(board.score(), 12);
    }

    #[test]
    fn test_merge_ignores_horizontal_neighbours() {
        let mut board = board();
        board.place_tile(0, 0, tile(2));
        board.place_tile(0, 1, tile(2));
        assert_eq!(board.merge_tiles(), 0);
    }

    #[test]
    fn test_score_thresholds_double_once() {
        let mut board = board();
        board.place_tile(0, 0, tile(2));
        board.update_score(150);
        assert_eq!(board.tile_at(0, 0), tile(2));
        board.update_score(50);
        assert_eq!(board.tile_at(0, 0), tile(4));
        board.update_score(100);
        assert_eq!(board.tile_at(0, 0), tile(4));
        board.update_score(16000);
        assert_eq!(board.tile_at(0, 0), tile(8));
        board.update_score(16000);
        assert_eq!(board.tile_at(0, 0), tile(8));
        assert_eq!(board.thresholds_crossed(), 2);
    }

    #[test]
    fn test_score_jump_crosses_both_thresholds() {
        let mut board = board();
        board.place_tile(0, 0, tile(2));
        board.update_score(20000);
        assert_eq!(board.tile_at(0, 0), tile(8));
    }

    #[test]
    fn test_check_win() {
        let mut board = board();
        assert!(!board.check_win());
        board.place_tile(4, 4, tile(1024));
        assert!(!board.check_win());
        board.place_tile(0, 0, tile(2048));
        assert!(board.check_win());
        assert!(!board.is_game_won());
        board.mark_won();
        assert!(board.is_game_won());
    }

    #[test]
    fn test_label_components() {
        let mut board = board();
        board.place_tile(0, 0, tile(2));
        board.place_tile(1, 0, tile(2));
        board.place_tile(1, 1, tile(4));
        board.place_tile(0, 3, tile(8));

        let labels = board.label_components();
        assert_eq!(labels.count(), 2);
        assert_eq!(labels.label_at(0, 0), Some(1));
        assert_eq!(labels.label_at(1, 0), Some(1));
        assert_eq!(labels.label_at(1, 1), Some(1));
        assert_eq!(labels.label_at(0, 3), Some(2));
        assert_eq!(labels.label_at(0, 2), None);
        assert_eq!(labels.cells(2).collect::<Vec<_>>(), vec![(0, 3)]);
    }

    #[test]
    fn test_move_down_components() {
        let mut board = board();
        // Grounded L-shape: the overhang stays.
        board.place_tile(0, 0, tile(2));
        board.place_tile(1, 0, tile(2));
        board.place_tile(1, 1, tile(4));
        // Floating vertical pair.
        board.place_tile(3, 5, tile(8));
        board.place_tile(4, 5, tile(16));

        let labels = board.label_components();
        assert_eq!(board.move_down_components(&labels), 1);
        assert_eq!(board.tile_at(1, 1), tile(4));
        assert_eq!(board.tile_at(2, 5), tile(8));
        assert_eq!(board.tile_at(3, 5), tile(16));
        assert_eq!(board.tile_at(4, 5), None);
        assert_eq!(board.tiles().count(), 5);

        // Nothing moves once every component rests on the floor.
        for _ in 0..2 {
            let labels = board.label_components();
            board.move_down_components(&labels);
        }
        assert_eq!(column(&board, 5), vec![Some(8), Some(16)]);
        let labels = board.label_components();
        assert_eq!(board.move_down_components(&labels), 0);
    }

    #[test]
    fn test_delete_free_tiles() {
        let mut board = board();
        board.place_tile(0, 2, tile(2));
        board.place_tile(2, 2, tile(4));
        board.place_tile(3, 2, tile(8));
        board.place_tile(5, 7, tile(16));
        assert_eq!(board.delete_free_tiles(), 3);
        assert_eq!(board.tiles().count(), 1);
        assert_eq!(board.tile_at(0, 2), tile(2));
        assert_eq!(board.score(), 28);
    }

    #[test]
    fn test_reset() {
        let mut board = board();
        board.place_tile(0, 0, tile(2));
        board.update_score(300);
        board.mark_won();
        board.reset();
        assert_eq!(board.tiles().count(), 0);
        assert_eq!(board.score(), 0);
        assert!(!board.is_game_won());
        assert!(!board.is_game_over());
        assert_eq!(board.thresholds_crossed(), 0);
    }

    #[test]
    fn test_horizontal_i_clears_bottom_row() {
        let mut board = board();
        for col in (0..4).chain(8..12) {
            board.place_tile(0, col, tile(2));
        }
        board.place_tile(1, 0, tile(8));

        let layout = PieceKind::I.layout_with(Tile::FOUR);
        let mut piece = Piece::with_tiles(PieceKind::I, layout, Point::new(4, 10)).unwrap();
        piece.try_rotate(&board).unwrap();
        piece.hard_drop(&board);
        assert!(piece.try_move(Direction::Down, &board).is_err());

        let (tiles, position) = piece.min_bounded_tiles_with_position();
        assert_eq!(position, Point::new(4, 0));
        let (cleared, result) = board.lock_piece(&tiles, position);
        assert!(result.is_ok());
        assert_eq!(cleared, 1);
        assert_eq!(board.score(), 100);
        assert_eq!(board.tile_at(0, 0), tile(8));
        assert_eq!(board.tiles().count(), 1);
    }
}
