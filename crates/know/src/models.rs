// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `know models` command implementation.

use std::io::{self, Write};
use std::process::ExitCode;

use colored::Color;
use know_core::Tier;
use know_router::{ModelRouter, shortcut, shortcut_names};
use serde::Serialize;

use crate::output::{Painter, write_json};

/// Filters for `know models`.
#[derive(Debug, Clone, Default)]
pub struct ModelsOptions {
    pub provider: Option<String>,
    pub tier: Option<Tier>,
    /// Show only the intent routing table, without shortcuts.
    pub routes_only: bool,
    pub json: bool,
}

/// One printable routing-table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRow {
    pub intent: String,
    pub provider: String,
    pub model: String,
    pub tier: Tier,
}

/// Routing-table rows that pass the provider and tier filters, in table order.
pub fn filtered_routes(router: &ModelRouter, opts: &ModelsOptions) -> Vec<RouteRow> {
    router
        .routes()
        .into_iter()
        .filter(|(_, t)| opts.provider.as_deref().is_none_or(|p| t.provider == p))
        .filter(|(_, t)| opts.tier.is_none_or(|tier| t.tier == tier))
        .map(|(intent, t)| RouteRow {
            intent,
            provider: t.provider,
            model: t.model,
            tier: t.tier,
        })
        .collect()
}

/// Run `know models`.
pub fn run_models(
    router: &ModelRouter,
    opts: &ModelsOptions,
    painter: Painter,
    out: &mut impl Write,
) -> io::Result<ExitCode> {
    let rows = filtered_routes(router, opts);

    if opts.json {
        write_json(out, &rows)?;
        return Ok(ExitCode::SUCCESS);
    }

    writeln!(out)?;
    writeln!(out, "{}", painter.info("Model Routing Table"))?;
    writeln!(out)?;
    write_table(
        out,
        painter,
        ["Intent", "Provider", "Model", "Tier"],
        rows.iter()
            .map(|r| [r.intent.clone(), r.provider.clone(), r.model.clone(), r.tier.to_string()])
            .collect(),
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        painter.detail("Total routes", Color::Cyan, &rows.len().to_string())
    )?;

    if !opts.routes_only {
        writeln!(out)?;
        writeln!(out, "{}", painter.info("Model Shortcuts"))?;
        writeln!(out)?;
        let shortcuts = shortcut_names()
            .filter_map(|name| shortcut(name).map(|t| (name, t)))
            .map(|(name, t)| [name.to_string(), t.provider, t.model, t.tier.to_string()])
            .collect();
        write_table(out, painter, ["Shortcut", "Provider", "Model", "Tier"], shortcuts)?;
    }

    Ok(ExitCode::SUCCESS)
}

fn write_table(
    out: &mut impl Write,
    painter: Painter,
    headers: [&str; 4],
    rows: Vec<[String; 4]>,
) -> io::Result<()> {
    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = headers
        .iter()
        .zip(widths)
        .map(|(h, w)| painter.paint(&format!("{h:<w$}"), Color::Green))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "  {header}")?;
    let rule = widths.map(|w| "-".repeat(w)).join("  ");
    writeln!(out, "  {rule}")?;

    for row in rows {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "  {}", line.trim_end())?;
    }
    Ok(())
}
