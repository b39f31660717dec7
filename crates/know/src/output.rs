// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal formatting shared by the subcommands.

use std::io::{self, IsTerminal, Write};

use colored::{Color, Colorize};
use serde::Serialize;

const LABEL_WIDTH: usize = 22;

/// Colors text when stdout is a terminal and `--plain` was not given.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn detect(plain: bool) -> Self {
        Self {
            color: !plain && io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// `  label          value`, padding computed before coloring.
    pub fn detail(&self, label: &str, color: Color, value: &str) -> String {
        let padded = format!("{label:<LABEL_WIDTH$}");
        format!("  {} {value}", self.paint(&padded, color))
    }

    pub fn info(&self, message: &str) -> String {
        format!("  {} {message}", self.paint("INFO", Color::Blue))
    }

    pub fn error(&self, message: &str) -> String {
        format!("  {} {message}", self.paint("ERROR", Color::Red))
    }
}

/// Pretty JSON on its own line.
pub fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> io::Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)
}
