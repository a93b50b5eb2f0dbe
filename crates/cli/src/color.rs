// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal palette for help text and listings.

use clap::builder::styling::{Ansi256Color, Color, Style, Styles};
use std::io::IsTerminal;

/// 256-color codes of the cim palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tone {
    /// Steel blue
    Header = 74,
    /// Light grey
    Literal = 250,
    /// Medium grey
    Placeholder = 245,
}

impl Tone {
    fn style(self) -> Style {
        Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(self as u8))))
    }

    /// `text` wrapped in this tone when stdout is colored.
    pub fn paint(self, text: &str) -> String {
        if should_colorize() {
            format!("\x1b[38;5;{}m{}\x1b[0m", self as u8, text)
        } else {
            text.to_string()
        }
    }
}

/// `NO_COLOR=1` disables, `COLOR=1` forces, otherwise only on a TTY.
pub fn should_colorize() -> bool {
    if std::env::var("NO_COLOR").is_ok_and(|v| v == "1") {
        return false;
    }
    if std::env::var("COLOR").is_ok_and(|v| v == "1") {
        return true;
    }
    std::io::stdout().is_terminal()
}

pub fn styles() -> Styles {
    if !should_colorize() {
        return Styles::plain();
    }
    Styles::styled()
        .header(Tone::Header.style())
        .usage(Tone::Header.style())
        .literal(Tone::Literal.style())
        .placeholder(Tone::Placeholder.style())
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
