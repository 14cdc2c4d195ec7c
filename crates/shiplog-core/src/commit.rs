//! Commit and file-change types.
//!
//! Commits are fetched transiently from a [`crate::source::CommitSource`] and
//! become durable only when written as part of a changelog submission. A
//! commit hash is globally unique in storage; it is never written twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── FileChange ──────────────────────────────────────────────────────────────

/// One changed file within a commit. The stored patch is the full text;
/// truncation happens only when composing prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChange {
  pub path:      String,
  pub additions: i64,
  pub deletions: i64,
  #[serde(default)]
  pub patch:     String,
}

/// Coarse component label derived from a file path. Total — always falls
/// back to [`PathComponent::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathComponent {
  Frontend,
  Backend,
  Database,
  Docs,
  Tests,
  Build,
  Other,
}

impl PathComponent {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Frontend => "frontend",
      Self::Backend => "backend",
      Self::Database => "database",
      Self::Docs => "docs",
      Self::Tests => "tests",
      Self::Build => "build",
      Self::Other => "other",
    }
  }
}

/// Derive a coarse component label from a path. Pure and total; evaluated
/// top to bottom, first match wins.
pub fn component_for_path(path: &str) -> PathComponent {
  let p = path.to_lowercase();

  let has_segment = |seg: &str| {
    p.split('/').any(|s| s == seg)
  };
  let has_suffix = |sufs: &[&str]| sufs.iter().any(|s| p.ends_with(s));

  if has_segment("tests") || has_segment("test") || p.contains(".spec.") || p.contains("_test.") {
    PathComponent::Tests
  } else if has_segment("docs") || has_suffix(&[".md", ".rst", ".adoc"]) {
    PathComponent::Docs
  } else if has_segment("migrations") || has_suffix(&[".sql"]) {
    PathComponent::Database
  } else if has_suffix(&[".tsx", ".jsx", ".vue", ".css", ".scss", ".html", ".svelte"])
    || has_segment("components")
    || has_segment("frontend")
  {
    PathComponent::Frontend
  } else if p.starts_with(".github/")
    || has_suffix(&[".yml", ".yaml", ".toml", ".lock", "dockerfile", "makefile"])
  {
    PathComponent::Build
  } else if has_suffix(&[".rs", ".go", ".py", ".rb", ".java", ".ts", ".js"])
    || has_segment("server")
    || has_segment("api")
  {
    PathComponent::Backend
  } else {
    PathComponent::Other
  }
}

// ─── Commit ──────────────────────────────────────────────────────────────────

/// Aggregate diff stats for a commit. Derived — when file-level detail is
/// present this must equal the sum over the commit's [`FileChange`] rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStats {
  pub additions:     i64,
  pub deletions:     i64,
  pub files_changed: i64,
}

impl CommitStats {
  /// Recompute aggregates from a set of file changes.
  pub fn from_files(files: &[FileChange]) -> Self {
    Self {
      additions:     files.iter().map(|f| f.additions).sum(),
      deletions:     files.iter().map(|f| f.deletions).sum(),
      files_changed: files.len() as i64,
    }
  }
}

/// A commit as fetched from the source adapter. Content-addressed by `hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
  pub hash:        String,
  pub message:     String,
  pub authored_at: DateTime<Utc>,
  #[serde(default)]
  pub stats:       CommitStats,
  /// Present only when the source was queried with
  /// [`crate::source::DetailLevel::Files`].
  #[serde(default)]
  pub files:       Vec<FileChange>,
}

impl Commit {
  /// Build a commit without file detail.
  pub fn new(
    hash: impl Into<String>,
    message: impl Into<String>,
    authored_at: DateTime<Utc>,
  ) -> Self {
    Self {
      hash: hash.into(),
      message: message.into(),
      authored_at,
      stats: CommitStats::default(),
      files: Vec::new(),
    }
  }

  /// Attach file detail, recomputing the aggregate stats from it.
  pub fn with_files(mut self, files: Vec<FileChange>) -> Self {
    self.stats = CommitStats::from_files(&files);
    self.files = files;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn component_for_path_is_total_and_deterministic() {
    assert_eq!(component_for_path("src/ui/components/Button.tsx"), PathComponent::Frontend);
    assert_eq!(component_for_path("server/handlers.rs"), PathComponent::Backend);
    assert_eq!(component_for_path("migrations/0042_add_index.sql"), PathComponent::Database);
    assert_eq!(component_for_path("docs/INSTALL.md"), PathComponent::Docs);
    assert_eq!(component_for_path("tests/integration.rs"), PathComponent::Tests);
    assert_eq!(component_for_path(".github/workflows/ci.yml"), PathComponent::Build);
    assert_eq!(component_for_path("LICENSE"), PathComponent::Other);
    // repeated calls agree
    assert_eq!(
      component_for_path("src/lib.rs"),
      component_for_path("src/lib.rs"),
    );
  }

  #[test]
  fn tests_take_priority_over_language_suffix() {
    assert_eq!(component_for_path("tests/api_test.ts"), PathComponent::Tests);
  }

  #[test]
  fn stats_reconcile_with_files() {
    let files = vec![
      FileChange { path: "a.rs".into(), additions: 3, deletions: 1, patch: String::new() },
      FileChange { path: "b.rs".into(), additions: 7, deletions: 2, patch: String::new() },
    ];
    let commit =
      Commit::new("abc", "msg", Utc::now()).with_files(files);
    assert_eq!(commit.stats.additions, 10);
    assert_eq!(commit.stats.deletions, 3);
    assert_eq!(commit.stats.files_changed, 2);
  }
}
