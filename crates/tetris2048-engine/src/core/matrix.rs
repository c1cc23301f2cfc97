use super::tile::Tile;

/// Rectangular matrix of optional tiles in local coordinates.
///
/// Row 0 is the *top* row of the matrix, which is how piece layouts are
/// written down. Pieces own a square matrix; trimming produces the tight
/// rectangle that gets locked onto the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Tile>>,
}

/// Inclusive bounds of the occupied cells of a [`TileMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
}

impl TileMatrix {
    #[must_use]
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// Builds a matrix from top-to-bottom rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows do not all have the same length.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<Option<Tile>>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|row| row.len() == cols),
            "all rows of a tile matrix must have the same length"
        );
        Self {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells[row * self.cols + col]
    }

    /// Sets or clears a cell.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, tile: Option<Tile>) {
        assert!(row < self.rows && col < self.cols);
        self.cells[row * self.cols + col] = tile;
    }

    /// Iterates over occupied cells as `(row, col, tile)`, top row first.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.map(|tile| (i / self.cols, i % self.cols, tile)))
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    /// Returns the matrix rotated 90° clockwise.
    ///
    /// The cell at `(r, c)` moves to `(c, n - 1 - r)`.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not square.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        assert!(self.is_square(), "only square matrices can be rotated");
        let n = self.rows;
        let mut rotated = Self::empty(n, n);
        for (r, c, tile) in self.occupied() {
            rotated.cells[c * n + (n - 1 - r)] = Some(tile);
        }
        rotated
    }

    /// Returns the bounds of the occupied cells, or `None` if there are none.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.occupied().fold(None, |bounds, (row, col, _)| {
            let bounds = bounds.unwrap_or(BoundingBox {
                min_row: row,
                max_row: row,
                min_col: col,
                max_col: col,
            });
            Some(BoundingBox {
                min_row: bounds.min_row.min(row),
                max_row: bounds.max_row.max(row),
                min_col: bounds.min_col.min(col),
                max_col: bounds.max_col.max(col),
            })
        })
    }

    /// Returns the tightest sub-matrix containing every occupied cell.
    ///
    /// Empty cells inside the bounds are kept. A matrix without tiles trims
    /// down to `0×0`.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        let Some(bounds) = self.bounding_box() else {
            return Self::empty(0, 0);
        };
        let mut trimmed = Self::empty(
            bounds.max_row - bounds.min_row + 1,
            bounds.max_col - bounds.min_col + 1,
        );
        for (row, col, tile) in self.occupied() {
            trimmed.set(row - bounds.min_row, col - bounds.min_col, Some(tile));
        }
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Option<Tile> = Some(Tile::TWO);
    const F: Option<Tile> = Some(Tile::FOUR);
    const E: Option<Tile> = None;

    #[test]
    fn test_rotated_clockwise() {
        // The left column becomes the top row, bottom cell first.
        let matrix = TileMatrix::from_rows(vec![vec![T, E], vec![F, E]]);
        let rotated = matrix.rotated_clockwise();
        assert_eq!(rotated, TileMatrix::from_rows(vec![vec![F, T], vec![E, E]]));
    }

    #[test]
    fn test_four_rotations_restore_matrix() {
        let matrix = TileMatrix::from_rows(vec![
            vec![E, T, E],
            vec![F, T, F],
            vec![E, E, E],
        ]);
        let mut rotated = matrix.clone();
        for _ in 0..4 {
            rotated = rotated.rotated_clockwise();
            assert_eq!(rotated.occupied_count(), 4);
        }
        assert_eq!(rotated, matrix);
    }

    #[test]
    fn test_trimmed_removes_empty_border() {
        let matrix = TileMatrix::from_rows(vec![
            vec![E, E, E, E],
            vec![E, T, E, E],
            vec![E, F, T, E],
            vec![E, E, E, E],
        ]);
        let trimmed = matrix.trimmed();
        assert_eq!(trimmed, TileMatrix::from_rows(vec![vec![T, E], vec![F, T]]));
    }

    #[test]
    fn test_trimmed_empty_matrix() {
        let trimmed = TileMatrix::empty(3, 3).trimmed();
        assert_eq!(trimmed.rows(), 0);
        assert_eq!(trimmed.cols(), 0);
        assert_eq!(TileMatrix::empty(3, 3).bounding_box(), None);
    }

    #[test]
    fn test_get_outside_is_none() {
        let matrix = TileMatrix::from_rows(vec![vec![T]]);
        assert_eq!(matrix.get(0, 0), T);
        assert_eq!(matrix.get(1, 0), None);
        assert_eq!(matrix.get(0, 1), None);
    }
}
