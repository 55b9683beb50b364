//! App widget implementation.

use efibootdude_core::system::runner::BootManager;
use ratatui_core::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::Widget,
};
use ratatui_widgets::clear::Clear;

use crate::app::{App, Mode};

/// The height of a prompt box.
const PROMPT_HEIGHT: u16 = 3;

/// Splits the screen into the header, the body, the status line and the help bar.
fn layout(area: Rect) -> [Rect; 4] {
    Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area)
}

/// Returns where a prompt box is drawn on the screen.
pub fn prompt_area(area: Rect) -> Rect {
    let [_, body, _, _] = layout(area);
    let [_, prompt] = Layout::vertical([Constraint::Min(0), Constraint::Length(PROMPT_HEIGHT)]).areas(body);
    prompt
}

impl<M: BootManager> Widget for &mut App<M> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [header, body, status, help] = layout(area);

        self.render_header(header, buf);
        match self.mode {
            Mode::ConfirmWrite(_) => self.render_plan(body, buf),
            Mode::Results => self.render_results(body, buf),
            _ => self.render_list(body, buf),
        }
        self.render_status(status, buf);
        self.render_help(help, buf);

        if let Mode::Prompt(_, editor) = &self.mode {
            let prompt = prompt_area(area);
            Clear.render(prompt, buf);
            editor.render(prompt, buf, &self.theme);
        }
    }
}
