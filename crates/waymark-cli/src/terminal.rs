//! Terminal styling and color utilities.
//!
//! ANSI escape codes used when rendering grids and routes, plus the
//! environment checks that decide whether to emit them.

use std::io::IsTerminal;

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";
    /// Bold reverse green for the start cell.
    pub const TAG_START: &str = "\x1b[1;7;32m";
    /// Bold reverse magenta for the goal cell.
    pub const TAG_GOAL: &str = "\x1b[1;7;35m";
    /// Bright bold white for emphasis (addresses, headings).
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for walls and secondary text.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for explored cells.
    pub const CYAN: &str = "\x1b[36m";
    /// Yellow for path cells.
    pub const YELLOW: &str = "\x1b[1;33m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color
/// is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub start: &'static str,
    pub goal: &'static str,
    pub path: &'static str,
    pub explored: &'static str,
    pub wall: &'static str,
    pub emphasis: &'static str,
}

impl ColorPalette {
    /// Create a palette with actual ANSI color codes.
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            start: colors::TAG_START,
            goal: colors::TAG_GOAL,
            path: colors::YELLOW,
            explored: colors::CYAN,
            wall: colors::GRAY,
            emphasis: colors::WHITE_BOLD,
        }
    }

    /// Create a palette with no colors (empty strings).
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            start: "",
            goal: "",
            path: "",
            explored: "",
            wall: "",
            emphasis: "",
        }
    }

    /// Palette for standard output: colored only when stdout is a terminal
    /// and [`supports_color`] agrees.
    #[must_use]
    pub fn for_stdout() -> Self {
        if std::io::stdout().is_terminal() && supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Wrap `text` in `code`, closing with a reset when color is enabled.
    pub fn paint(&self, code: &str, text: &str) -> String {
        if code.is_empty() {
            text.to_string()
        } else {
            format!("{code}{text}{}", self.reset)
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::plain()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// This function respects:
/// - The `NO_COLOR` environment variable (https://no-color.org/)
/// - The `TERM=dumb` convention for non-capable terminals
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Format a number with thousand separators (commas).
///
/// # Examples
///
/// ```
/// # use waymark_cli::terminal::format_with_separators;
/// assert_eq!(format_with_separators(999), "999");
/// assert_eq!(format_with_separators(1000), "1,000");
/// assert_eq!(format_with_separators(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_with_separators(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
