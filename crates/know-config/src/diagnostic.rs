// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with "did you mean" suggestions.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a suggestion (`tiemout_secs` -> `timeout_secs`).
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with enough context for miette to render a report.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(know::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(know::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    #[error("invalid value for key `{key}`: {detail}")]
    #[diagnostic(code(know::config::invalid_value))]
    InvalidValue { key: String, detail: String },

    #[error("validation error: {message}")]
    #[diagnostic(code(know::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(know::config::other))]
    Other(String),
}

impl ConfigError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
///
/// `toml_sources` pairs a file path (or `<inline>`) with its content so
/// unknown keys can be pointed at in the source.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let path = error.path.clone();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let (span, src) = locate(&error, &path, field, toml_sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: suggest_key(field, &expected[..]),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: path.join("."),
                    detail: format!("found {actual}"),
                    expected: expected.to_string(),
                },
                Kind::InvalidValue(actual, expected) => ConfigError::InvalidValue {
                    key: path.join("."),
                    detail: format!("found {actual}, expected {expected}"),
                },
                Kind::UnknownVariant(variant, expected) => ConfigError::InvalidValue {
                    key: path.join("."),
                    detail: format!(
                        "unknown variant `{variant}`, expected one of: {}",
                        expected.join(", ")
                    ),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

fn locate(
    error: &figment::Error,
    path: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .map(|s| match s {
            figment::Source::File(p) => p.display().to_string(),
            _ => "<inline>".to_string(),
        });

    let by_origin = origin
        .as_deref()
        .and_then(|origin| toml_sources.iter().find(|(p, _)| p == origin));

    // Merged tables may carry the defaults' metadata; fall back to any file
    // that actually contains the key.
    let candidates = by_origin.into_iter().chain(toml_sources.iter());
    for (name, content) in candidates {
        if let Some(offset) = find_key_offset(content, path, field) {
            return (
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(name, content.clone())),
            );
        }
    }
    (None, None)
}

/// Byte offset of `field` in TOML `content`, searching after the `[section]`
/// header named by the first path element (or from the top when `path` is empty).
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let start = match path.first() {
        None => 0,
        Some(section) => {
            let header = format!("[{section}]");
            content.find(&header)? + header.len()
        }
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(field)
            && after.trim_start().starts_with('=')
        {
            return Some(offset + (line.len() - trimmed.len()));
        }
        offset += line.len();
    }
    None
}

/// Best Jaro-Winkler match for `unknown` among `valid_keys`, if close enough.
pub fn suggest_key<S: AsRef<str>>(unknown: &str, valid_keys: &[S]) -> Option<String> {
    valid_keys
        .iter()
        .map(|k| (k.as_ref(), strsim::jaro_winkler(unknown, k.as_ref())))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(k, _)| k.to_string())
}

/// Render diagnostics to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        if handler.render_report(&mut buf, error as &dyn Diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}
