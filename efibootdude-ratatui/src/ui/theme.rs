// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`Theme`], which exposes the color scheme for the UI.

use ratatui_core::style::{Color, Modifier, Style};

use crate::config::DudeConfig;

/// The color scheme of the UI.
#[derive(Clone, Copy, Debug, Default)]
pub struct Theme {
    /// The color scheme for everything except highlighted items.
    pub base: Style,

    /// The color scheme for highlighted items.
    pub highlight: Style,

    /// The color scheme for pending edits, markers and key hints.
    pub accent: Style,

    /// The color scheme for failures.
    pub error: Style,
}

impl Theme {
    /// Create a new [`Theme`] from a [`DudeConfig`].
    #[must_use = "Has no effect if the result is unused"]
    pub fn new(config: &DudeConfig) -> Self {
        let base = Style::new().fg(config.fg).bg(config.bg);
        Self {
            base,
            highlight: Style::new()
                .fg(config.highlight_fg)
                .bg(config.highlight_bg),
            accent: base.fg(config.accent).add_modifier(Modifier::BOLD),
            error: base
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        }
    }
}
