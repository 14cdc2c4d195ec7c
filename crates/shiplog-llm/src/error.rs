//! Error type for `shiplog-llm`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("authentication failed: {0}")]
  Auth(String),

  #[error("rate limited: {0}")]
  RateLimited(String),

  #[error("api error (status {status}): {message}")]
  Api { status: u16, message: String },

  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  /// The response decoded but carried no text blocks.
  #[error("response contained no text")]
  EmptyResponse,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
