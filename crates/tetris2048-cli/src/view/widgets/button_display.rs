use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::Line,
    widgets::{Block as BlockWidget, Widget},
};

use crate::view::widgets::style;

/// A clickable menu entry.
#[derive(Debug)]
pub(crate) struct ButtonDisplay<'a> {
    label: &'a str,
    selected: bool,
}

impl<'a> ButtonDisplay<'a> {
    pub(crate) fn new(label: &'a str) -> Self {
        Self {
            label,
            selected: false,
        }
    }

    pub(crate) fn selected(self, selected: bool) -> Self {
        Self { selected, ..self }
    }

    pub(crate) const fn width() -> u16 {
        20
    }

    pub(crate) const fn height() -> u16 {
        3
    }
}

impl Widget for ButtonDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = if self.selected {
            style::BUTTON_SELECTED
        } else {
            style::BUTTON
        };
        let block = BlockWidget::bordered().style(style);
        let inner = block.inner(area);
        block.render(area, buf);
        Line::styled(self.label, style)
            .centered()
            .render(inner.centered_vertically(Constraint::Length(1)), buf);
    }
}
