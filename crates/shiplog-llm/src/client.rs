//! [`AnthropicGenerator`] — the Anthropic Messages API implementation of
//! [`Generator`].

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use shiplog_core::generate::Generator;

use crate::{Error, Result};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
  model:      &'a str,
  max_tokens: u32,
  messages:   Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
  role:    &'static str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
  #[serde(default)]
  content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
  Text { text: String },
  #[serde(other)]
  Other,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
  #[serde(default)]
  error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
  #[serde(default)]
  message: String,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// A text-generation client for the Anthropic Messages API.
pub struct AnthropicGenerator {
  http:     Client,
  api_url:  String,
  api_key:  String,
  model:    String,
}

impl AnthropicGenerator {
  pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
    Self {
      http: Client::new(),
      api_url: ANTHROPIC_API_URL.to_owned(),
      api_key: api_key.into(),
      model: model.into(),
    }
  }

  /// Point the client at a different endpoint (e.g. a test server or a
  /// compatible proxy).
  pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
    self.api_url = url.into();
    self
  }
}

impl Generator for AnthropicGenerator {
  type Error = Error;

  async fn complete(
    &self,
    prompt: &str,
    max_output_tokens: u32,
  ) -> Result<String> {
    let request = MessagesRequest {
      model:      &self.model,
      max_tokens: max_output_tokens,
      messages:   vec![Message { role: "user", content: prompt }],
    };

    let response = self
      .http
      .post(&self.api_url)
      .header("x-api-key", &self.api_key)
      .header("anthropic-version", API_VERSION)
      .json(&request)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let message = response
        .json::<ErrorEnvelope>()
        .await
        .map(|e| e.error.message)
        .unwrap_or_default();
      return Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => Error::RateLimited(message),
        other => Error::Api { status: other.as_u16(), message },
      });
    }

    let decoded: MessagesResponse = response.json().await?;
    let text: String = decoded
      .content
      .into_iter()
      .filter_map(|block| match block {
        ContentBlock::Text { text } => Some(text),
        ContentBlock::Other => None,
      })
      .collect::<Vec<_>>()
      .join("\n");

    if text.trim().is_empty() {
      return Err(Error::EmptyResponse);
    }
    debug!(chars = text.len(), "generation complete");
    Ok(text)
  }
}
