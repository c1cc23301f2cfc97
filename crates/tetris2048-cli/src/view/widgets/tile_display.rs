use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};
use tetris2048_engine::Tile;

use crate::view::widgets::style;

/// One board cell: an empty slot, a ghost of the landing piece, or a tile.
#[derive(Debug)]
pub(crate) struct TileDisplay {
    style: Style,
    text: String,
}

impl TileDisplay {
    pub(crate) fn new(style: Style, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    pub(crate) const fn width() -> u16 {
        5
    }

    pub(crate) const fn height() -> u16 {
        1
    }

    pub(crate) fn empty() -> Self {
        Self::new(style::EMPTY, "·")
    }

    pub(crate) fn ghost() -> Self {
        Self::new(style::GHOST, "[ ]")
    }

    pub(crate) fn tile(tile: Tile) -> Self {
        let value = tile.value();
        Self::new(super::tile_style(value), value.to_string())
    }

    /// A cell of the next-piece preview, whose values are not known yet.
    pub(crate) fn preview() -> Self {
        Self::new(style::PREVIEW, "")
    }

    pub(crate) fn from_cell(cell: Option<Tile>) -> Self {
        cell.map_or_else(Self::empty, Self::tile)
    }
}

impl Widget for TileDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &TileDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Paragraph paints the background over the whole cell, not only the digits.
        Paragraph::new(self.text.as_str())
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_line(display: &TileDisplay) -> String {
        let area = Rect::new(0, 0, TileDisplay::width(), TileDisplay::height());
        let mut buf = Buffer::empty(area);
        display.render(area, &mut buf);
        (0..area.width).map(|x| buf[(x, 0)].symbol()).collect()
    }

    #[test]
    fn test_tile_value_is_centered() {
        let tile = Tile::new(128).unwrap();
        assert_eq!(render_line(&TileDisplay::tile(tile)), " 128 ");
        assert_eq!(render_line(&TileDisplay::from_cell(Some(Tile::TWO))), "  2  ");
    }

    #[test]
    fn test_empty_and_ghost() {
        assert_eq!(render_line(&TileDisplay::from_cell(None)).trim(), "·");
        assert_eq!(render_line(&TileDisplay::ghost()).trim(), "[ ]");
    }

    #[test]
    fn test_background_fills_cell() {
        let area = Rect::new(0, 0, TileDisplay::width(), 1);
        let mut buf = Buffer::empty(area);
        TileDisplay::tile(Tile::FOUR).render(area, &mut buf);
        for x in 0..area.width {
            assert_eq!(buf[(x, 0)].bg, crate::view::widgets::tile_style(4).bg.unwrap());
        }
    }
}
