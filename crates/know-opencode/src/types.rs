// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the OpenCode serve session API.

use serde::{Deserialize, Serialize};

/// Body of `POST /session/{id}/message`.
#[derive(Debug, Clone, Serialize)]
pub struct PromptRequest<'a> {
    pub parts: Vec<RequestPart<'a>>,
    pub model: ModelRef<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestPart<'a> {
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub text: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelRef<'a> {
    #[serde(rename = "providerID")]
    pub provider_id: &'a str,
    #[serde(rename = "modelID")]
    pub model_id: &'a str,
}

/// Response of `POST /session`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub id: Option<String>,
}

/// Response of `POST /session/{id}/message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub info: Option<MessageInfo>,
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageInfo {
    pub id: Option<String>,
    pub tokens: Option<serde_json::Value>,
    pub cost: Option<f64>,
    pub error: Option<ModelError>,
}

/// Provider-side failure reported inside a 2xx response.
///
/// Usually `{name, data: {message}}`, but some providers send a bare string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ModelError {
    Detailed {
        name: Option<String>,
        data: Option<ModelErrorData>,
    },
    Message(String),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelErrorData {
    pub message: Option<String>,
}

impl ModelError {
    pub fn message(&self) -> String {
        match self {
            Self::Detailed { name, data } => data
                .as_ref()
                .and_then(|d| d.message.clone())
                .or_else(|| name.clone())
                .unwrap_or_else(|| "unknown error".to_string()),
            Self::Message(message) if !message.is_empty() => message.clone(),
            Self::Message(_) => "unknown error".to_string(),
            Self::Other(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessageResponse {
    /// All `text` parts, concatenated in order.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter(|p| p.type_ == "text")
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}
