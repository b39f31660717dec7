// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `know remember` command implementation.

use std::io::{self, Write};
use std::process::ExitCode;

use colored::Color;
use know_core::{KnowledgeStore, NewEntry};

use crate::output::{Painter, write_json};

const MAX_TITLE_CHARS: usize = 80;

/// Title derived from the first non-empty line, cut to 80 characters plus `...`.
pub fn derive_title(content: &str) -> String {
    let first = content.lines().find(|l| !l.is_empty()).unwrap_or_default();
    if first.chars().count() > MAX_TITLE_CHARS {
        let cut: String = first.chars().take(MAX_TITLE_CHARS).collect();
        format!("{cut}...")
    } else {
        first.to_string()
    }
}

/// Run `know remember`.
pub async fn run_remember(
    store: &dyn KnowledgeStore,
    content: &str,
    title: Option<String>,
    tags: Vec<String>,
    json: bool,
    painter: Painter,
    out: &mut impl Write,
) -> io::Result<ExitCode> {
    let entry = NewEntry {
        title: title.unwrap_or_else(|| derive_title(content)),
        content: content.to_string(),
        tags,
    };

    let outcome = store.store(&entry).await;
    if !outcome.success {
        let message = outcome
            .error
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or("Failed to store knowledge entry");
        writeln!(out, "{}", painter.error(message))?;
        return Ok(ExitCode::FAILURE);
    }

    if json {
        write_json(out, &outcome.raw)?;
        return Ok(ExitCode::SUCCESS);
    }

    writeln!(out)?;
    writeln!(out, "{}", painter.info("Knowledge stored"))?;
    writeln!(out, "{}", painter.detail("Title", Color::White, &entry.title))?;
    if let Some(id) = &outcome.id {
        writeln!(out, "{}", painter.detail("Id", Color::White, id))?;
    }
    if !entry.tags.is_empty() {
        writeln!(
            out,
            "{}",
            painter.detail("Tags", Color::White, &entry.tags.join(", "))
        )?;
    }
    Ok(ExitCode::SUCCESS)
}
