use ratatui::{layout::Rect, style::Style, widgets::Block as BlockWidget};

pub(crate) use self::{
    board_display::*, button_display::*, key_binding_display::*, next_piece_display::*,
    session_display::*, session_stats_display::*, tile_display::*,
};

mod board_display;
mod button_display;
mod key_binding_display;
mod next_piece_display;
mod session_display;
mod session_stats_display;
mod tile_display;

pub(crate) mod color {
    use ratatui::style::Color;

    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const DARK_GRAY: Color = Color::Rgb(60, 58, 50);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GREEN: Color = Color::Rgb(0, 200, 0);
    pub const CYAN: Color = Color::Rgb(0, 255, 255);

    pub const BOARD: Color = Color::Rgb(187, 173, 160);
    pub const EMPTY_CELL: Color = Color::Rgb(205, 193, 180);
    pub const DARK_TEXT: Color = Color::Rgb(119, 110, 101);
    pub const LIGHT_TEXT: Color = Color::Rgb(249, 246, 242);
}

pub(crate) mod style {
    use ratatui::style::{Color, Modifier, Style};

    use super::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const BOARD: Style = fg_bg(color::DARK_TEXT, color::BOARD);
    pub const EMPTY: Style = fg_bg(color::DARK_TEXT, color::EMPTY_CELL);
    pub const GHOST: Style = fg_bg(color::DARK_GRAY, color::EMPTY_CELL);
    pub const PREVIEW: Style = fg_bg(color::DARK_TEXT, color::DARK_TEXT);
    pub const TITLE: Style = Style::new().fg(color::YELLOW).add_modifier(Modifier::BOLD);
    pub const BUTTON: Style = fg_bg(color::WHITE, color::DARK_GRAY);
    pub const BUTTON_SELECTED: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const HINT: Style = Style::new().fg(color::GRAY);
}

/// Style of a tile holding `value`.
///
/// Backgrounds darken from a pale peach at 2 to a deep red at 2048; values
/// outside the table share the empty-cell colour. Small values use dark text.
pub(crate) fn tile_style(value: u32) -> Style {
    let (r, g, b) = match value {
        2 => (255, 224, 214),
        4 => (255, 204, 188),
        8 => (255, 174, 150),
        16 => (255, 144, 122),
        32 => (255, 114, 94),
        64 => (255, 84, 66),
        128 => (255, 64, 54),
        256 => (235, 52, 52),
        512 => (215, 42, 42),
        1024 => (195, 32, 32),
        2048 => (175, 22, 22),
        _ => (205, 193, 180),
    };
    let fg = if value > 4 {
        color::LIGHT_TEXT
    } else {
        color::DARK_TEXT
    };
    Style::new().fg(fg).bg(ratatui::style::Color::Rgb(r, g, b))
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::*;

    #[test]
    fn test_tile_palette() {
        assert_eq!(tile_style(2).bg, Some(Color::Rgb(255, 224, 214)));
        assert_eq!(tile_style(2048).bg, Some(Color::Rgb(175, 22, 22)));
        assert_eq!(tile_style(4096).bg, Some(Color::Rgb(205, 193, 180)));
        assert_eq!(tile_style(2).fg, Some(color::DARK_TEXT));
        assert_eq!(tile_style(4).fg, Some(color::DARK_TEXT));
        assert_eq!(tile_style(8).fg, Some(color::LIGHT_TEXT));
    }

    #[test]
    fn test_palette_darkens_with_value() {
        let red_green = |value| match tile_style(value).bg {
            Some(Color::Rgb(r, g, _)) => u16::from(r) + u16::from(g),
            other => panic!("unexpected colour {other:?}"),
        };
        let values: Vec<u32> = (1..=11).map(|exp| 1 << exp).collect();
        for pair in values.windows(2) {
            assert!(red_green(pair[0]) > red_green(pair[1]), "{pair:?}");
        }
    }

    #[test]
    fn test_block_margins() {
        assert_eq!(block_horizontal_margin(None), 0);
        let block = BlockWidget::bordered();
        assert_eq!(block_horizontal_margin(Some(&block)), 2);
        assert_eq!(block_vertical_margin(Some(&block)), 2);
    }
}
