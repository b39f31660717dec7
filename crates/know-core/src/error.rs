// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the know query gateway.

use thiserror::Error;

/// The primary error type used across all know adapter traits and core operations.
#[derive(Debug, Error)]
pub enum KnowError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// AI backend errors (transport failure, non-2xx status, model-level error).
    ///
    /// Displays the bare message so consensus slots carry the backend's own wording.
    #[error("{message}")]
    Backend {
        message: String,
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Knowledge store errors (unreachable, bad status, undecodable body).
    #[error("knowledge store error: {message}")]
    Knowledge {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Cache backend errors (I/O failure, corrupt envelope).
    #[error("cache error: {message}")]
    Cache {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KnowError {
    /// Shorthand for a backend error without an HTTP status or source.
    pub fn backend(message: impl Into<String>) -> Self {
        KnowError::Backend {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Shorthand for a cache error wrapping an underlying cause.
    pub fn cache<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        KnowError::Cache {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// HTTP status attached to a backend failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            KnowError::Backend { status, .. } => *status,
            _ => None,
        }
    }
}
