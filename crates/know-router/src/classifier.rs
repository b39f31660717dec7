// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-based intent classification.
//!
//! Maps a free-text query to an intent label by evaluating an ordered list of
//! whole-word patterns. No network, no model call.

use std::sync::LazyLock;

use regex::Regex;

/// Intent returned when no rule matches.
pub const DEFAULT_INTENT: &str = "default";

/// Intent attached to routes resolved from an explicit model string.
pub const EXPLICIT_INTENT: &str = "explicit";

/// Rules in evaluation order. More specific intents come first so that
/// "what is the root cause" lands on `why` rather than `what`.
const RULES: &[(&str, &[&str])] = &[
    ("analyze", &["analyze", "compare", "evaluate", "assess", "review", "diff"]),
    ("why", &["why", "reason", "cause", "root cause", "because"]),
    (
        "code",
        &[
            "code", "implement", "write", "refactor", "fix", "debug", "function", "class",
            "method",
        ],
    ),
    ("how", &["how", "explain", "describe", "walk me through"]),
    ("search", &["search", "where", "locate", "find in"]),
    ("what", &["what", "list", "show", "find", "get", "which"]),
];

static PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|(intent, words)| {
            let alternation = words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = Regex::new(&format!(r"\b({alternation})\b"))
                .expect("intent keywords are literal and always compile");
            (*intent, pattern)
        })
        .collect()
});

/// Intent labels the classifier can produce, in evaluation order, followed by `default`.
pub fn known_intents() -> impl Iterator<Item = &'static str> {
    RULES
        .iter()
        .map(|(intent, _)| *intent)
        .chain(std::iter::once(DEFAULT_INTENT))
}

/// Stateless intent classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify `query`, returning the first matching intent or `default`.
    pub fn classify(&self, query: &str) -> &'static str {
        let lower = query.to_lowercase();
        PATTERNS
            .iter()
            .find(|(_, pattern)| pattern.is_match(&lower))
            .map(|(intent, _)| *intent)
            .unwrap_or(DEFAULT_INTENT)
    }
}
