//! Error types for `shiplog-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid repository locator {input:?}: {reason}")]
  InvalidIdentity { input: String, reason: &'static str },

  #[error("unknown change type: {0:?}")]
  UnknownChangeType(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
