use std::{fmt, mem, str::FromStr};

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use crate::{PieceCollisionError, RotateError};

use super::{
    board::{Board, coord},
    matrix::TileMatrix,
    point::Point,
    tile::Tile,
};

/// The falling piece: a shape of numbered tiles with a board position.
///
/// The tiles live in an `n×n` local matrix (row 0 at the top) whose
/// bottom-left cell sits at [`anchor`](Self::anchor) in board coordinates.
/// Every operation that needs the board's bounds or contents takes the
/// [`Board`] explicitly.
///
/// # Example
///
/// ```
/// use tetris2048_engine::{Board, Direction, Piece, PieceKind, Point, Tile};
///
/// let board = Board::new(20, 12).unwrap();
/// let layout = PieceKind::T.layout_with(Tile::TWO);
/// let mut piece = Piece::with_tiles(PieceKind::T, layout, Point::new(4, 10)).unwrap();
///
/// piece.try_move(Direction::Left, &board).unwrap();
/// piece.try_rotate(&board).unwrap();
/// assert_eq!(piece.anchor(), Point::new(3, 10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    tiles: TileMatrix,
    anchor: Point,
}

/// One-cell translation of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, -1),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum InvalidPieceLayoutError {
    #[display("{kind:?} piece needs a {expected}x{expected} matrix, got {rows}x{cols}")]
    Size {
        kind: PieceKind,
        expected: usize,
        rows: usize,
        cols: usize,
    },
    #[display("{kind:?} piece needs {expected} tiles, got {actual}")]
    TileCount {
        kind: PieceKind,
        expected: usize,
        actual: usize,
    },
}

impl Piece {
    /// Creates a piece of the given kind at its spawn position.
    ///
    /// Every tile is 2 or 4. The piece's bottom row starts on the board's top
    /// row, at a random column that keeps the whole matrix inside the walls.
    #[must_use]
    pub fn spawn<R>(kind: PieceKind, board: &Board, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let n = kind.size();
        let mut tiles = TileMatrix::empty(n, n);
        for &(row, col) in kind.cells() {
            tiles.set(row, col, Some(rng.random()));
        }
        let x = rng.random_range(0..=board.width() - n);
        Self {
            kind,
            tiles,
            anchor: Point::new(coord(x), coord(board.height() - 1)),
        }
    }

    /// Creates a piece from an explicit tile layout.
    ///
    /// The layout must be the kind's `n×n` matrix holding exactly as many
    /// tiles as the kind's shape.
    pub fn with_tiles(
        kind: PieceKind,
        tiles: TileMatrix,
        anchor: Point,
    ) -> Result<Self, InvalidPieceLayoutError> {
        let expected = kind.size();
        if tiles.rows() != expected || tiles.cols() != expected {
            return Err(InvalidPieceLayoutError::Size {
                kind,
                expected,
                rows: tiles.rows(),
                cols: tiles.cols(),
            });
        }
        let actual = tiles.occupied_count();
        if actual != kind.cells().len() {
            return Err(InvalidPieceLayoutError::TileCount {
                kind,
                expected: kind.cells().len(),
                actual,
            });
        }
        Ok(Self {
            kind,
            tiles,
            anchor,
        })
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn tiles(&self) -> &TileMatrix {
        &self.tiles
    }

    #[must_use]
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Board position of the local cell at `(row, col)`.
    #[must_use]
    pub fn cell_position(&self, row: usize, col: usize) -> Point {
        let n = self.tiles.rows();
        self.anchor.translated(coord(col), coord(n - 1 - row))
    }

    /// Iterates over the board positions and tiles of the occupied cells.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (Point, Tile)> + '_ {
        self.tiles
            .occupied()
            .map(|(row, col, tile)| (self.cell_position(row, col), tile))
    }

    /// Returns the tightest matrix containing the piece's tiles.
    #[must_use]
    pub fn min_bounded_tiles(&self) -> TileMatrix {
        self.tiles.trimmed()
    }

    /// Like [`Self::min_bounded_tiles`], paired with the board position of
    /// the trimmed matrix's bottom-left cell.
    #[must_use]
    pub fn min_bounded_tiles_with_position(&self) -> (TileMatrix, Point) {
        let n = self.tiles.rows();
        let Some(bounds) = self.tiles.bounding_box() else {
            return (TileMatrix::empty(0, 0), self.anchor);
        };
        let position = self
            .anchor
            .translated(coord(bounds.min_col), coord(n - 1 - bounds.max_row));
        (self.tiles.trimmed(), position)
    }

    /// Checks whether every tile can move one cell in `direction`.
    ///
    /// A move is blocked by the side walls, the floor, and occupied board
    /// cells. The space above the top row is open.
    #[must_use]
    pub fn can_be_moved(&self, direction: Direction, board: &Board) -> bool {
        let (dx, dy) = direction.offset();
        self.occupied_positions().all(|(position, _)| {
            let target = position.translated(dx, dy);
            let within_walls = (0..coord(board.width())).contains(&target.x) && target.y >= 0;
            within_walls && !board.is_occupied(target.y, target.x)
        })
    }

    /// Moves the piece one cell, leaving it untouched if the move is blocked.
    pub fn try_move(
        &mut self,
        direction: Direction,
        board: &Board,
    ) -> Result<(), PieceCollisionError> {
        if !self.can_be_moved(direction, board) {
            return Err(PieceCollisionError);
        }
        let (dx, dy) = direction.offset();
        self.anchor.translate(dx, dy);
        Ok(())
    }

    /// Rotates the piece 90° clockwise in place.
    ///
    /// The rotated footprint must lie inside the board on empty cells;
    /// otherwise the previous orientation is restored. There are no wall
    /// kicks.
    pub fn try_rotate(&mut self, board: &Board) -> Result<(), RotateError> {
        if !self.kind.is_rotatable() {
            return Err(RotateError::Unrotatable);
        }
        let rotated = self.tiles.rotated_clockwise();
        let previous = mem::replace(&mut self.tiles, rotated);
        if !self.fits_inside(board) {
            self.tiles = previous;
            return Err(RotateError::Collision(PieceCollisionError));
        }
        Ok(())
    }

    /// Moves the piece down until it is blocked, returning the rows fallen.
    pub fn hard_drop(&mut self, board: &Board) -> usize {
        let mut rows = 0;
        while self.try_move(Direction::Down, board).is_ok() {
            rows += 1;
        }
        rows
    }

    /// Returns where the piece would land if hard dropped now.
    #[must_use]
    pub fn drop_position(&self, board: &Board) -> Self {
        let mut dropped = self.clone();
        dropped.hard_drop(board);
        dropped
    }

    /// Checks whether any tile overlaps an occupied board cell.
    #[must_use]
    pub fn is_colliding(&self, board: &Board) -> bool {
        self.occupied_positions()
            .any(|(position, _)| board.is_occupied(position.y, position.x))
    }

    fn fits_inside(&self, board: &Board) -> bool {
        self.occupied_positions().all(|(position, _)| {
            board.is_inside(position.y, position.x) && !board.is_occupied(position.y, position.x)
        })
    }
}

/// Shape of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece. Never rotates.
    O = 1,
    /// Z-piece.
    Z = 2,
    /// S-piece.
    S = 3,
    /// L-piece.
    L = 4,
    /// J-piece.
    J = 5,
    /// T-piece.
    T = 6,
    /// Single tile.
    Dot = 7,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("unknown piece kind: {tag:?}")]
pub struct UnknownPieceKindError {
    tag: String,
}

// Occupied `(row, col)` cells of each kind's spawn orientation; row 0 is the top.
const SHAPE_CELLS: [&[(usize, usize)]; PieceKind::LEN] = [
    // I-piece
    &[(0, 1), (1, 1), (2, 1), (3, 1)],
    // O-piece
    &[(0, 0), (0, 1), (1, 0), (1, 1)],
    // Z-piece
    &[(1, 0), (1, 1), (2, 1), (2, 2)],
    // S-piece
    &[(0, 1), (0, 2), (1, 0), (1, 1)],
    // L-piece
    &[(0, 2), (1, 0), (1, 1), (1, 2)],
    // J-piece
    &[(0, 0), (1, 0), (1, 1), (1, 2)],
    // T-piece
    &[(0, 1), (1, 0), (1, 1), (1, 2)],
    // Dot
    &[(0, 0)],
];

impl PieceKind {
    /// Number of piece kinds (8).
    pub const LEN: usize = 8;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::L,
        PieceKind::J,
        PieceKind::T,
        PieceKind::Dot,
    ];

    /// Side length of the kind's square local matrix.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            PieceKind::I => 4,
            PieceKind::O => 2,
            PieceKind::Dot => 1,
            PieceKind::Z | PieceKind::S | PieceKind::L | PieceKind::J | PieceKind::T => 3,
        }
    }

    /// Occupied `(row, col)` cells in the spawn orientation.
    #[must_use]
    pub const fn cells(self) -> &'static [(usize, usize)] {
        SHAPE_CELLS[self as usize]
    }

    #[must_use]
    pub const fn is_rotatable(self) -> bool {
        !matches!(self, PieceKind::O)
    }

    /// Returns the spawn layout with every cell holding `tile`.
    #[must_use]
    pub fn layout_with(self, tile: Tile) -> TileMatrix {
        let n = self.size();
        let mut tiles = TileMatrix::empty(n, n);
        for &(row, col) in self.cells() {
            tiles.set(row, col, Some(tile));
        }
        tiles
    }

    /// Returns the single character tag of this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris2048_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::Dot.as_char(), '.');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::Z => 'Z',
            PieceKind::S => 'S',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
            PieceKind::T => 'T',
            PieceKind::Dot => '.',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'Z' => Some(PieceKind::Z),
            'S' => Some(PieceKind::S),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            'T' => Some(PieceKind::T),
            '.' => Some(PieceKind::Dot),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for PieceKind {
    type Err = UnknownPieceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
        .ok_or_else(|| UnknownPieceKindError { tag: s.to_owned() })
    }
}
