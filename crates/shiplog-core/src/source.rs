//! The `CommitSource` trait — abstraction over a repository host.
//!
//! Implemented by adapter crates (e.g. `shiplog-github`). Read-only: a
//! source never mutates anything, and errors are surfaced to the caller, not
//! retried automatically.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{commit::Commit, identity::RepoIdentity};

/// How much detail to fetch per commit.
///
/// `Files` costs one extra round-trip per commit; implementations must
/// abort the whole batch if any detail fetch fails, so a partially detailed
/// batch never reaches deduplication.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
  #[default]
  Messages,
  Files,
}

/// Abstraction over a commit host.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CommitSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch one bounded page of recent commits, most-recent-first. No
  /// pagination: a single page is the whole review window.
  fn recent_commits<'a>(
    &'a self,
    repo: &'a RepoIdentity,
    detail: DetailLevel,
  ) -> impl Future<Output = Result<Vec<Commit>, Self::Error>> + Send + 'a;
}
