//! Anthropic messages wire format shared by the HTTP API and Bedrock.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

use super::Provider;

/// Upper bound on generated tokens for one commit message.
pub const MAX_TOKENS: u32 = 10_000;

#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    /// Set for the HTTP API, where the model is part of the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    /// Set for Bedrock, where the model is part of the invoke call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic_version: Option<&'a str>,
    pub max_tokens: u32,
    pub messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Message<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

impl<'a> MessagesRequest<'a> {
    /// A single user turn carrying the prompt.
    pub fn user(prompt: &'a str) -> Self {
        Self {
            model: None,
            anthropic_version: None,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    #[allow(dead_code)]
    block_type: String,
    #[serde(default)]
    text: String,
}

/// Text of the first content block.
///
/// An empty content list or an empty first block is `EmptyContent`,
/// never an empty success.
pub fn first_text(provider: Provider, body: &[u8]) -> Result<String, ProviderError> {
    let response: MessagesResponse =
        serde_json::from_slice(body).map_err(|e| ProviderError::InvalidResponse {
            provider,
            reason: e.to_string(),
        })?;

    match response.content.into_iter().next() {
        Some(block) if !block.text.is_empty() => Ok(block.text),
        _ => Err(ProviderError::EmptyContent { provider }),
    }
}
