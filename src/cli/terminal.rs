//! Colored status lines and terminal width detection.

use owo_colors::{OwoColorize, colors::css};

/// Detects whether stdout accepts colored output.
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Whether the terminal is too narrow for column layouts (< 60 columns).
///
/// Returns `false` when stdout is not a terminal.
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < 60)
}

/// Extension trait for colorizing output.
///
/// Every method returns the text unchanged when color is unsupported.
pub trait Colorize {
    /// Green, for completed work and a usable API key.
    fn success(&self) -> String;
    /// Amber, for problems that do not stop the run.
    fn warning(&self) -> String;
    /// Blue, for identifiers.
    fn info(&self) -> String;
    /// Dimmed, for hints.
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::Orange>().to_string())
    }

    fn info(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::LightBlue>().to_string())
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), |s| s.dimmed().to_string())
    }
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}
