// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Line editor rendering.

use ratatui_core::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::Line,
    widgets::Widget,
};
use ratatui_widgets::{block::Block, borders::Borders, paragraph::Paragraph};

use crate::{editor::LineEditor, ui::theme::Theme};

impl LineEditor {
    /// Renders the prompt in a box, with the title on the border.
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Line::styled(format!(" {} ", self.title), theme.accent))
            .style(theme.base);
        Paragraph::new(Line::raw(self.value.as_str()))
            .style(theme.base)
            .block(block)
            .render(area, buf);
    }

    /// Returns where the terminal cursor should be when the prompt is rendered in `area`.
    #[must_use = "Has no effect if the result is unused"]
    pub fn cursor_position(&self, area: Rect) -> Position {
        let offset = u16::try_from(self.cursor_pos).unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(offset)
            .min(area.right().saturating_sub(2));
        Position::new(x, area.y.saturating_add(1))
    }
}
