//! Severity colors and the template colorizer.

use crate::config::model::Level;

/// ANSI "set foreground color" escape, 24-bit form; followed by `r;g;b` and
/// the suffix.
pub const FOREGROUND_COLOR_PREFIX: &str = "\x1b[38;2;";
pub const FOREGROUND_COLOR_SUFFIX: &str = "m";
pub const FOREGROUND_COLOR_RESET: &str = "\x1b[0m";

/// Terminal colors used by the level mapping, as `r;g;b` triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Red,
    DarkRed,
    Green,
    Orange,
    Gray,
    DarkGray,
    Yellow,
}

impl Color {
    pub fn rgb(self) -> &'static str {
        match self {
            Color::White => "255;255;255",
            Color::Red => "255;0;0",
            Color::DarkRed => "192;0;0",
            Color::Green => "0;255;0",
            Color::Orange => "255;165;0",
            Color::Gray => "192;192;192",
            Color::DarkGray => "128;128;128",
            Color::Yellow => "165;165;0",
        }
    }
}

/// The color a record of the given severity is rendered in.
pub fn level_color(level: Level) -> Color {
    match level {
        Level::Debug => Color::DarkGray,
        Level::Info => Color::White,
        Level::Success => Color::Green,
        Level::Warning => Color::Orange,
        Level::Error => Color::Red,
        Level::Critical => Color::DarkRed,
    }
}

/// Wraps a record template in the ANSI color escapes.
///
/// The inserted `${rec:color}` token resolves per record to the RGB triple
/// of its severity, so one wrapped template serves every level. Pure; the
/// caller is responsible for never colorizing the same formatter twice
/// (see the colorized-formatter registry on
/// [`Environment`][struct@crate::config::Environment]).
pub fn colorize(template: &str) -> String {
    format!(
        "{FOREGROUND_COLOR_PREFIX}${{rec:color}}{FOREGROUND_COLOR_SUFFIX}{template}{FOREGROUND_COLOR_RESET}"
    )
}
