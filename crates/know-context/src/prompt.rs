// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge-grounded prompt templates.

use std::fmt::Write as _;

use know_core::{KnowledgeContext, KnowledgeEntry};

/// Sentence present in every prompt built without knowledge entries.
pub const NO_KNOWLEDGE_MARKER: &str =
    "No relevant knowledge entries were found in the knowledge base.";

const PREAMBLE: &str =
    "You are a knowledge assistant with access to my personal knowledge base.";

const INSTRUCTIONS: &str = "## Instructions\n\
Analyze the knowledge entries above and answer the query.\n\
Reference specific entries when relevant.\n\
If the knowledge base doesn't contain relevant information, say so clearly.";

/// Builds the prompt sent to the AI backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Prompt for `query` grounded in `context`, entries rendered in input order.
    pub fn build(&self, query: &str, context: &KnowledgeContext) -> String {
        if context.is_empty() {
            return Self::build_empty(query);
        }

        let mut entries = String::new();
        for (i, entry) in context.entries.iter().enumerate() {
            Self::render_entry(&mut entries, i + 1, entry);
        }

        format!(
            "{PREAMBLE}\n\n## Relevant Knowledge Entries\n{entries}\n## Query\n{query}\n\n{INSTRUCTIONS}"
        )
    }

    fn build_empty(query: &str) -> String {
        format!(
            "You are a knowledge assistant.\n\n{NO_KNOWLEDGE_MARKER}\n\n## Query\n{query}\n\n\
             Answer based on your general knowledge. \
             Note that the knowledge base had no relevant entries."
        )
    }

    fn render_entry(out: &mut String, number: usize, entry: &KnowledgeEntry) {
        // Writing to a String cannot fail.
        let _ = write!(
            out,
            "### Entry #{number}: {}\n{}\nTags: {}\n\n",
            entry.display_title(),
            entry.text(),
            entry.tags.join(", ")
        );
    }
}
