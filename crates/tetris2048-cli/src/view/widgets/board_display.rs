use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};
use tetris2048_engine::{Board, Piece, Tile};

use crate::view::widgets::TileDisplay;

/// The playfield with the falling piece and its landing ghost drawn over the
/// locked tiles.
#[derive(Debug)]
pub(crate) struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<Piece>,
    falling_piece: Option<&'a Piece>,
    block: Option<BlockWidget<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Board,
    Ghost,
    Piece(Tile),
}

impl<'a> BoardDisplay<'a> {
    pub(crate) fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub(crate) fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub(crate) fn falling_piece(self, piece: &'a Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub(crate) fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub(crate) fn width(&self) -> u16 {
        grid_len(self.board.width()) * TileDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub(crate) fn height(&self) -> u16 {
        grid_len(self.board.height()) * TileDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// Overlay layers indexed by `[row][col]`, bottom row first. Piece cells
    /// above the top row are not shown.
    fn layers(&self) -> Vec<Vec<Layer>> {
        let mut layers = vec![vec![Layer::Board; self.board.width()]; self.board.height()];
        let mut paint = |piece: &Piece, layer: &dyn Fn(Tile) -> Layer| {
            for (position, tile) in piece.occupied_positions() {
                if self.board.is_inside(position.y, position.x) {
                    let (Ok(row), Ok(col)) =
                        (usize::try_from(position.y), usize::try_from(position.x))
                    else {
                        continue;
                    };
                    layers[row][col] = layer(tile);
                }
            }
        };
        if let Some(ghost) = &self.ghost {
            paint(ghost, &|_| Layer::Ghost);
        }
        if let Some(piece) = self.falling_piece {
            paint(piece, &Layer::Piece);
        }
        layers
    }
}

fn grid_len(cells: usize) -> u16 {
    u16::try_from(cells).unwrap_or(u16::MAX)
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.board.width()).map(|_| Constraint::Length(TileDisplay::width()));
        let row_constraints =
            (0..self.board.height()).map(|_| Constraint::Length(TileDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        // Screen rows go top-down; board rows count up from the floor.
        let rows = iter::zip(self.board.rows(), self.layers()).rev();
        for (grid_row, (row, layers)) in iter::zip(grid_cells, rows) {
            for ((grid_cell, cell), layer) in iter::zip(grid_row, row.cells()).zip(layers) {
                let display = match layer {
                    Layer::Ghost if cell.is_none() => TileDisplay::ghost(),
                    Layer::Board | Layer::Ghost => TileDisplay::from_cell(*cell),
                    Layer::Piece(tile) => TileDisplay::tile(tile),
                };
                display.render(grid_cell, buf);
            }
        }
    }
}
