// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `know query` and `know consensus` command implementations.

use std::io::{self, Write};
use std::process::ExitCode;

use colored::Color;
use know_core::{ConsensusResult, KnowError};
use know_service::KnowledgeAiService;

use crate::output::{Painter, write_json};

/// Options for `know query`.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub model: Option<String>,
    pub consensus: bool,
    pub no_context: bool,
    pub json: bool,
    pub limit: Option<usize>,
}

/// Run `know query`.
///
/// Prints the query, the chosen route and the number of knowledge entries,
/// then the answer. With `--json` only the result document is printed.
pub async fn run_query(
    service: &KnowledgeAiService,
    question: &str,
    opts: &QueryOptions,
    painter: Painter,
    out: &mut impl Write,
) -> io::Result<ExitCode> {
    if opts.consensus {
        if !opts.json {
            writeln!(out)?;
            writeln!(out, "{}", painter.info(&format!("Consensus query: {question}")))?;
            writeln!(out)?;
        }
        let result = service.consensus(question, &[]).await;
        return print_consensus(&result, opts.json, painter, out);
    }

    if !opts.json {
        writeln!(out)?;
        writeln!(out, "{}", painter.detail("Query", Color::Cyan, question))?;
    }

    let model = opts.model.as_deref();
    let outcome = if opts.no_context {
        service.query_direct(question, model).await
    } else {
        let limit = opts.limit.unwrap_or_else(|| service.context_limit());
        service.query(question, model, limit).await
    };

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            report_backend_error(&e, painter, out)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if opts.json {
        write_json(out, &result)?;
        return Ok(ExitCode::SUCCESS);
    }

    let route = &result.model;
    writeln!(
        out,
        "{}",
        painter.detail(
            "Model",
            Color::Cyan,
            &format!("{} ({}) [{}]", route.model, route.provider, route.tier)
        )
    )?;
    writeln!(
        out,
        "{}",
        painter.detail(
            "Context",
            Color::Cyan,
            &format!("{} entries loaded", result.context_entries)
        )
    )?;
    writeln!(out)?;
    writeln!(out, "{}", result.response.display_text())?;
    Ok(ExitCode::SUCCESS)
}

/// Run `know consensus`.
pub async fn run_consensus(
    service: &KnowledgeAiService,
    question: &str,
    models: &[String],
    json: bool,
    painter: Painter,
    out: &mut impl Write,
) -> io::Result<ExitCode> {
    if !json {
        writeln!(out)?;
        writeln!(out, "{}", painter.info(&format!("Consensus: {question}")))?;
        writeln!(out)?;
    }
    let result = service.consensus(question, models).await;
    print_consensus(&result, json, painter, out)
}

fn print_consensus(
    result: &ConsensusResult,
    json: bool,
    painter: Painter,
    out: &mut impl Write,
) -> io::Result<ExitCode> {
    if json {
        write_json(out, result)?;
        return Ok(ExitCode::SUCCESS);
    }

    for (label, slot) in &result.responses {
        let route = &slot.model;
        writeln!(
            out,
            "{}",
            painter.detail(
                label,
                Color::Yellow,
                &format!("{} ({})", route.model, route.provider)
            )
        )?;
        match slot.response() {
            Some(response) => writeln!(out, "{}", response.display_text())?,
            None => writeln!(
                out,
                "{}",
                painter.error(&format!("  Error: {}", slot.error().unwrap_or_default()))
            )?,
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "{}",
        painter.detail(
            "Models consulted",
            Color::Cyan,
            &result.models_consulted.to_string()
        )
    )?;
    Ok(ExitCode::SUCCESS)
}

/// Whether a backend failure looks like OpenCode is not running.
pub fn is_connection_problem(message: &str) -> bool {
    message.contains("Failed to create session") || message.contains("Connection refused")
}

fn report_backend_error(e: &KnowError, painter: Painter, out: &mut impl Write) -> io::Result<()> {
    let message = e.to_string();
    writeln!(out, "{}", painter.error(&message))?;
    if is_connection_problem(&message) {
        writeln!(
            out,
            "{}",
            painter.info("Is opencode serve running? Start it with: opencode serve")
        )?;
    }
    Ok(())
}
