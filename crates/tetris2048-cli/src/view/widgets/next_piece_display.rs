use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use tetris2048_engine::{PieceKind, Tile};

use crate::view::widgets::TileDisplay;

/// Outline of the next piece. Its tile values are drawn only when it spawns.
#[derive(Debug)]
pub(crate) struct NextPieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> NextPieceDisplay<'a> {
    pub(crate) fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub(crate) fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
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
        3 * TileDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub(crate) fn height(&self) -> u16 {
        4 * TileDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for NextPieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &NextPieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(piece) = self.piece else {
            return;
        };
        let shape = piece.layout_with(Tile::TWO).trimmed();
        let (Ok(cols), Ok(rows)) = (u16::try_from(shape.cols()), u16::try_from(shape.rows()))
        else {
            return;
        };
        let piece_area = area.centered(
            Constraint::Length(cols * TileDisplay::width()),
            Constraint::Length(rows * TileDisplay::height()),
        );

        let col_constraints = (0..cols).map(|_| Constraint::Length(TileDisplay::width()));
        let row_constraints = (0..rows).map(|_| Constraint::Length(TileDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let occupied = TileDisplay::preview();
        for (row, grid_row) in grid_rows.enumerate() {
            for (col, grid_cell) in grid_row.into_iter().enumerate() {
                if shape.get(row, col).is_some() {
                    Widget::render(&occupied, grid_cell, buf);
                }
            }
        }
    }
}
