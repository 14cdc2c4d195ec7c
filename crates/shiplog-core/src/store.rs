//! The `ChangelogStore` trait and submission outcome type.
//!
//! The trait is implemented by storage backends (e.g.
//! `shiplog-store-sqlite`). Higher layers depend on this abstraction, not on
//! any concrete backend.

use std::{collections::HashSet, future::Future};

use uuid::Uuid;

use crate::{
  changelog::{ChangelogView, NewChangelog},
  commit::Commit,
};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of a submission that did not fail.
///
/// "Every commit in the batch was already recorded" is an expected state,
/// not an error: the caller surfaces it as "nothing to do".
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
  /// The changelog, its entries, commits, and links were all written.
  Written(ChangelogView),
  /// The in-transaction dedup re-check left zero new commits. Nothing was
  /// written.
  NothingNew,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a changelog store backend.
///
/// Changelogs are append-only at the aggregate level: created exactly once
/// per successful submission, never updated in place, never deleted by the
/// system.
pub trait ChangelogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Which of `hashes` are already recorded against the repository
  /// partition `repo_key`.
  fn recorded_hashes<'a>(
    &'a self,
    repo_key: &'a str,
    hashes: &'a [String],
  ) -> impl Future<Output = Result<HashSet<String>, Self::Error>> + Send + 'a;

  /// Atomically write one changelog, its entries (dense zero-based
  /// positions), the new commits with their file changes, and the
  /// entry↔commit links — all or nothing. Re-runs the dedup check inside
  /// the transaction; if nothing remains, returns
  /// [`SubmitOutcome::NothingNew`] and writes nothing.
  fn submit(
    &self,
    input: NewChangelog,
  ) -> impl Future<Output = Result<SubmitOutcome, Self::Error>> + Send + '_;

  /// All changelogs newest-first, each with its entries ordered by
  /// position.
  fn list_changelogs(
    &self,
  ) -> impl Future<Output = Result<Vec<ChangelogView>, Self::Error>> + Send + '_;

  /// One changelog with its entries. `None` if unknown.
  fn get_changelog(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ChangelogView>, Self::Error>> + Send + '_;

  /// Provenance: the commits linked to an entry. With the current coarse
  /// linking policy this is the entry's whole submission batch.
  fn commits_for_entry(
    &self,
    entry_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Commit>, Self::Error>> + Send + '_;
}
