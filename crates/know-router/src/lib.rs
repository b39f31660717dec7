// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification and model routing for the know query gateway.
//!
//! - [`IntentClassifier`]: ordered whole-word keyword rules, zero cost
//! - [`ModelRouter`]: intent route table with explicit overrides and runtime changes

pub mod classifier;
pub mod router;

pub use classifier::{DEFAULT_INTENT, EXPLICIT_INTENT, IntentClassifier, known_intents};
pub use router::{ModelRouter, parse_explicit_model, shortcut, shortcut_names};
