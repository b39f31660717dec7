// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `know health` command implementation.
//!
//! Probes every collaborator concurrently. Each adapter applies its own short
//! probe timeout, so a hung service reports DOWN instead of stalling the command.

use std::io::{self, Write};
use std::process::ExitCode;

use colored::Color;
use futures::future::join_all;
use know_core::Adapter;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::output::{Painter, write_json};

/// Availability of each probed service, in probe order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub checks: Vec<(String, bool)>,
}

impl HealthReport {
    pub fn all_healthy(&self) -> bool {
        self.checks.iter().all(|(_, up)| *up)
    }
}

impl Serialize for HealthReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.checks.len()))?;
        for (name, up) in &self.checks {
            map.serialize_entry(name, up)?;
        }
        map.end()
    }
}

/// Probe all adapters at once.
pub async fn probe_all(adapters: &[&dyn Adapter]) -> HealthReport {
    let results = join_all(adapters.iter().map(|a| a.is_available())).await;
    HealthReport {
        checks: adapters
            .iter()
            .zip(results)
            .map(|(a, up)| (a.name().to_string(), up))
            .collect(),
    }
}

/// Run `know health`. Exits non-zero unless every service is up.
pub async fn run_health(
    adapters: &[&dyn Adapter],
    json: bool,
    painter: Painter,
    out: &mut impl Write,
) -> io::Result<ExitCode> {
    let report = probe_all(adapters).await;
    let code = if report.all_healthy() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };

    if json {
        write_json(out, &report)?;
        return Ok(code);
    }

    writeln!(out)?;
    writeln!(out, "{}", painter.info("Service Health"))?;
    writeln!(out)?;
    for (name, up) in &report.checks {
        let status = if *up {
            painter.paint("UP", Color::Green)
        } else {
            painter.paint("DOWN", Color::Red)
        };
        writeln!(out, "{}", painter.detail(name, Color::White, &status))?;
    }
    writeln!(out)?;

    if report.all_healthy() {
        writeln!(out, "{}", painter.info("All services healthy"))?;
    } else {
        writeln!(out, "{}", painter.error("Some services are down"))?;
    }
    Ok(code)
}
