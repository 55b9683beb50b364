// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The user interface of the editor.
//!
//! The screen is a header with the pending timeout, the boot entries in boot order, a status line and a help
//! bar. The entries are replaced with the planned commands while a write is being confirmed, and with the
//! results once it has run. Prompts open in a box at the bottom of the entries.
//!
//! The colors of the UI can be changed through the config file.

use std::io::Stdout;

use efibootdude_core::{exec::InvocationResult, system::runner::BootManager};
use ratatui_core::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    terminal::Terminal,
    text::{Line, Span, Text},
    widgets::{StatefulWidget, Widget},
};
use ratatui_crossterm::CrosstermBackend;
use ratatui_widgets::{
    block::Block,
    borders::Borders,
    list::{List, ListItem},
    paragraph::{Paragraph, Wrap},
};
use smallvec::SmallVec;

use crate::{
    MainError,
    app::{App, Mode},
    ui::theme::Theme,
};

mod widget;

pub mod entry_list;
pub mod theme;

/// Key hints shown while browsing the entries.
const BROWSE_KEYS: [(&str, &str); 12] = [
    (" ↑/↓ ", " Select "),
    (" u/d ", " Move "),
    (" * ", " Active "),
    (" n/N ", " Next Boot "),
    (" t ", " Label "),
    (" m ", " Timeout "),
    (" r ", " Remove "),
    (" w ", " Write "),
    (" ESC ", " Reload "),
    (" b ", " Reboot "),
    (" v ", " Verbose "),
    (" q ", " Quit "),
];

impl<M: BootManager> App<M> {
    /// Draw a frame to the screen.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the widgets could not be drawn to the screen.
    pub fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<(), MainError> {
        terminal.draw(|f| {
            let area = f.area();
            f.render_widget(&mut *self, area);
            if let Mode::Prompt(_, editor) = &self.mode {
                f.set_cursor_position(editor.cursor_position(widget::prompt_area(area)));
            }
        })?;
        Ok(())
    }

    /// Renders the name of the program and the version number, with the timeout and any pending edits.
    pub fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let mut line = Line::styled(concat!("efibootdude ", env!("CARGO_PKG_VERSION")), self.theme.base);

        let timeout = self.controller.draft().effective_timeout();
        let timeout_style = if timeout == self.controller.draft().snapshot().timeout() {
            self.theme.base
        } else {
            self.theme.accent
        };
        line.push_span(Span::styled("  |  Timeout: ", self.theme.base));
        line.push_span(Span::styled(
            timeout.map_or_else(|| "unset".to_owned(), |x| format!("{x}s")),
            timeout_style,
        ));

        if self.inconsistent() {
            line.push_span(Span::styled("  [reload needed]", self.theme.error));
        } else if self.controller.is_dirty() {
            line.push_span(Span::styled("  [modified]", self.theme.accent));
        }

        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).style(self.theme.base))
            .render(area, buf);
    }

    /// Renders the [`EntryList`](entry_list::EntryList).
    ///
    /// Entries with a pending active or label edit use the accent color.
    pub fn render_list(&mut self, area: Rect, buf: &mut Buffer) {
        let rows = self.entries.rows(self.verbose);
        let items = rows.into_iter().zip(&self.entries.items).map(|(row, entry)| {
            let style = if entry.modified { self.theme.accent } else { self.theme.base };
            ListItem::new(Line::styled(row, style))
        });

        let list = List::new(items)
            .style(self.theme.base)
            .highlight_style(self.theme.highlight)
            .highlight_symbol(" → ");

        StatefulWidget::render(list, area, buf, &mut self.entries.state);
    }

    /// Renders the commands that a write would run.
    pub fn render_plan(&self, area: Rect, buf: &mut Buffer) {
        let Mode::ConfirmWrite(commands) = &self.mode else {
            return;
        };

        let lines = commands.iter().enumerate().map(|(idx, command)| {
            Line::from(vec![
                Span::styled(format!("{:>3}. {command}", idx + 1), self.theme.base),
                Span::styled(format!("  ({})", command.args().join(" ")), self.theme.accent),
            ])
        });

        Paragraph::new(lines.collect::<Text>())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Line::styled(" Pending commands ", self.theme.accent))
                    .style(self.theme.base),
            )
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }

    /// Renders the result of every command from the last write.
    pub fn render_results(&self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<_> = self
            .controller
            .results()
            .iter()
            .flat_map(|result| result_lines(result, &self.theme))
            .collect();

        Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Line::styled(" Results ", self.theme.accent))
                    .style(self.theme.base),
            )
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }

    /// Renders a question to confirm, or the last status message.
    pub fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let line = match &self.mode {
            Mode::ConfirmWrite(commands) => Line::styled(
                format!("Run {} commands? (y/n)", commands.len()),
                self.theme.accent,
            ),
            Mode::ConfirmAbandon => Line::styled("Drop every pending edit? (y/n)", self.theme.accent),
            Mode::ConfirmQuit => Line::styled("Quit without writing? (y/n)", self.theme.accent),
            _ => match &self.status {
                Some(status) => Line::styled(status.as_str(), self.theme.error),
                None => Line::default(),
            },
        };

        line.alignment(Alignment::Center).render(area, buf);
    }

    /// Renders the help bar at the bottom of the screen.
    pub fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let keys: &[(&str, &str)] = match &self.mode {
            Mode::Browsing => &BROWSE_KEYS,
            Mode::Prompt(..) => &[(" Return ", " Submit "), (" ESC ", " Cancel ")],
            Mode::ConfirmWrite(_) | Mode::ConfirmAbandon | Mode::ConfirmQuit => {
                &[(" y ", " Yes "), (" Any ", " No ")]
            }
            Mode::Results => &[(" Any ", " Continue ")],
        };

        let mut spans: SmallVec<[_; 24]> = SmallVec::new();
        for (key, desc) in keys {
            spans.push(Span::styled(*key, self.theme.highlight));
            spans.push(Span::styled(*desc, self.theme.base));
        }

        Line::default()
            .spans(spans)
            .centered()
            .style(self.theme.base)
            .render(area, buf);
    }
}

/// Formats one command result: the command, its command line, and whatever it printed.
///
/// Failed commands also show their exit status, and their output in the error color.
fn result_lines(result: &InvocationResult, theme: &Theme) -> Vec<Line<'static>> {
    let (mark, style) = if result.success() {
        ("ok    ", theme.base)
    } else {
        ("failed", theme.error)
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(mark, style),
            Span::styled(format!(" {}", result.command), theme.base),
        ]),
        Line::styled(format!("       {}", result.command_line), theme.accent),
    ];
    if !result.success() {
        let status = result
            .status
            .map_or_else(|| "no status".to_owned(), |x| format!("status {x}"));
        lines.push(Line::styled(format!("       {status}"), theme.error));
    }

    let output = result.stdout.lines().chain(result.stderr.lines());
    for line in output.filter(|x| !x.trim().is_empty()) {
        lines.push(Line::styled(format!("       {line}"), style));
    }
    lines
}
