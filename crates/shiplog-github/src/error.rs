//! Error type for `shiplog-github`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The repository does not exist or the token cannot see it.
  #[error("repository not found: {0}")]
  NotFound(String),

  /// Credentials rejected (401) or forbidden without rate-limit headers.
  #[error("authentication failed: {0}")]
  Auth(String),

  /// The API rate limit is exhausted; the caller may retry later manually.
  #[error("rate limited: {0}")]
  RateLimited(String),

  /// Any other non-success status from the API.
  #[error("upstream error (status {status}): {message}")]
  Upstream { status: u16, message: String },

  /// Network or protocol failure before a status was received.
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  /// Local-path identities have no remote host to query.
  #[error("local-path identity {0:?} cannot be served by the GitHub adapter")]
  UnsupportedIdentity(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
