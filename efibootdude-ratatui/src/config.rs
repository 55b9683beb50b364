// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`DudeConfig`], the configuration file for the editor.
//!
//! This parses space separated key value pairs. Unknown keys and values that cannot be parsed are ignored, and
//! a missing file is the same as an empty one.
//!
//! Example configuration:
//!
//! ```text
//! # Run a different efibootmgr
//! program /usr/local/sbin/efibootmgr
//!
//! # Run efibootmgr directly instead of through sudo, such as when already root
//! sudo false
//!
//! # Show full device paths from the start
//! verbose true
//!
//! # Change the colors of the application
//! background black
//! foreground white
//! highlight_background gray
//! highlight_foreground black
//! accent yellow
//! ```

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use efibootdude_core::system::runner::DEFAULT_PROGRAM;
use log::{debug, warn};
use ratatui_core::style::Color;

/// The name of the configuration file inside the configuration directory.
const CONFIG_NAME: &str = "efibootdude.conf";

/// The configuration file for the editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DudeConfig {
    /// The `efibootmgr` program to run.
    pub program: String,

    /// Runs modifying invocations through `sudo`.
    pub sudo: bool,

    /// Shows full device paths.
    pub verbose: bool,

    /// Allows adjusting the background of the UI.
    pub bg: Color,

    /// Allows adjusting the foreground of the UI.
    pub fg: Color,

    /// Allows adjusting the background of the highlighter.
    pub highlight_bg: Color,

    /// Allows adjusting the foreground of the highlighter.
    pub highlight_fg: Color,

    /// Allows adjusting the color of pending edits and markers.
    pub accent: Color,
}

impl DudeConfig {
    /// Loads the configuration from a file, or from the default location if no file is given.
    ///
    /// A file that does not exist gives the default configuration.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the file exists, but could not be read.
    pub fn new(path: Option<&Path>) -> io::Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_path) else {
            debug!("No configuration directory, using defaults");
            return Ok(Self::default());
        };

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Self::get_dude_config(&content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Parses the contents of a [`DudeConfig`] format string.
    #[must_use = "Has no effect if the result is unused"]
    pub fn get_dude_config(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once(char::is_whitespace) else {
                continue;
            };
            let value = value.trim();
            match &*key.to_ascii_lowercase() {
                "program" => value.clone_into(&mut config.program),
                "sudo" => parse_into(key, value, &mut config.sudo),
                "verbose" => parse_into(key, value, &mut config.verbose),
                "background" => match_str_color(value, &mut config.bg),
                "foreground" => match_str_color(value, &mut config.fg),
                "highlight_background" => match_str_color(value, &mut config.highlight_bg),
                "highlight_foreground" => match_str_color(value, &mut config.highlight_fg),
                "accent" => match_str_color(value, &mut config.accent),
                _ => debug!("Ignoring unknown configuration key {key}"),
            }
        }

        config
    }
}

impl Default for DudeConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_owned(),
            sudo: true,
            verbose: false,
            bg: Color::Reset,
            fg: Color::Reset,
            highlight_bg: Color::Gray,
            highlight_fg: Color::Black,
            accent: Color::Yellow,
        }
    }
}

/// Returns where the configuration file is looked for when none is given.
///
/// This is `$XDG_CONFIG_HOME/efibootdude.conf`, falling back to `~/.config/efibootdude.conf`.
#[must_use = "Has no effect if the result is unused"]
pub fn default_path() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|x| !x.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))
        .map(|dir| dir.join(CONFIG_NAME))
}

/// Parses a boolean value, leaving the old value if it cannot be parsed.
fn parse_into(key: &str, value: &str, out: &mut bool) {
    match value.parse() {
        Ok(value) => *out = value,
        Err(e) => warn!("Ignoring {key} \"{value}\": {e}"),
    }
}

/// Sets a color given its string representation.
///
/// Any unrecognized colors leave the old color.
fn match_str_color(color: &str, out: &mut Color) {
    *out = match &*color.to_ascii_lowercase() {
        "default" | "reset" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" => Color::Gray,
        "dark_gray" => Color::DarkGray,
        "light_red" => Color::LightRed,
        "light_green" => Color::LightGreen,
        "light_yellow" => Color::LightYellow,
        "light_blue" => Color::LightBlue,
        "light_magenta" => Color::LightMagenta,
        "light_cyan" => Color::LightCyan,
        "white" => Color::White,
        _ => {
            warn!("Ignoring unknown color {color}");
            return;
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = DudeConfig::get_dude_config(
            "# comment\n\
             program /usr/local/sbin/efibootmgr\n\
             sudo false\n\
             verbose   true\n\
             background blue\n\
             foreground light_yellow\n\
             highlight_background white\n\
             highlight_foreground black\n\
             accent MAGENTA\n",
        );
        assert_eq!(config.program, "/usr/local/sbin/efibootmgr");
        assert!(!config.sudo);
        assert!(config.verbose);
        assert_eq!(config.bg, Color::Blue);
        assert_eq!(config.fg, Color::LightYellow);
        assert_eq!(config.highlight_bg, Color::White);
        assert_eq!(config.accent, Color::Magenta);
    }

    #[test]
    fn test_bad_values() {
        let config = DudeConfig::get_dude_config("sudo maybe\nbackground plaid\nunknown 1\nverbose\n");
        assert_eq!(config, DudeConfig::default());
    }

    #[test]
    fn test_missing_file() -> io::Result<()> {
        let path = env::temp_dir().join("efibootdude-test-does-not-exist.conf");
        assert_eq!(DudeConfig::new(Some(&path))?, DudeConfig::default());
        Ok(())
    }

    #[test]
    fn test_read_file() -> io::Result<()> {
        let path = env::temp_dir().join(format!("efibootdude-test-{}.conf", std::process::id()));
        fs::write(&path, "verbose true\n")?;
        let config = DudeConfig::new(Some(&path));
        fs::remove_file(&path)?;
        assert!(config?.verbose);
        Ok(())
    }
}
