//! Wire types for the subset of the GitHub REST API we consume.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One element of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Deserialize)]
pub struct ListedCommit {
  pub sha:    String,
  pub commit: CommitBody,
}

#[derive(Debug, Deserialize)]
pub struct CommitBody {
  pub message: String,
  pub author:  Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub struct CommitAuthor {
  pub date: DateTime<Utc>,
}

/// Response of `GET /repos/{owner}/{repo}/commits/{sha}`.
#[derive(Debug, Deserialize)]
pub struct CommitDetail {
  #[serde(default)]
  pub files: Vec<DiffFile>,
}

#[derive(Debug, Deserialize)]
pub struct DiffFile {
  pub filename:  String,
  pub additions: i64,
  pub deletions: i64,
  #[serde(default)]
  pub patch:     Option<String>,
}

/// Error body GitHub returns on non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ApiMessage {
  #[serde(default)]
  pub message: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_commit_listing() {
    let body = r#"[
      {
        "sha": "a1b2c3",
        "commit": {
          "message": "Fix login bug",
          "author": { "name": "Dev", "date": "2026-03-01T12:00:00Z" }
        }
      }
    ]"#;
    let listed: Vec<ListedCommit> = serde_json::from_str(body).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].sha, "a1b2c3");
    assert_eq!(listed[0].commit.message, "Fix login bug");
    assert!(listed[0].commit.author.is_some());
  }

  #[test]
  fn decodes_commit_detail_with_missing_patch() {
    // binary files come back without a "patch" field
    let body = r#"{
      "files": [
        { "filename": "src/lib.rs", "additions": 3, "deletions": 1, "patch": "+x" },
        { "filename": "logo.png", "additions": 0, "deletions": 0 }
      ]
    }"#;
    let detail: CommitDetail = serde_json::from_str(body).unwrap();
    assert_eq!(detail.files.len(), 2);
    assert_eq!(detail.files[0].patch.as_deref(), Some("+x"));
    assert!(detail.files[1].patch.is_none());
  }
}
