//! Repository identity — the canonical key that partitions commit
//! deduplication and storage lookups.
//!
//! Remote URL addressing is the primary scheme. Bare filesystem paths are a
//! legacy mode kept only so previously recorded partitions keep resolving;
//! no adapter serves them.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A parsed, canonical repository locator. Immutable once derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepoIdentity {
  /// A remote repository addressed as `owner/repo`.
  Remote { owner: String, repo: String },
  /// Legacy local-path addressing. Keeps its own dedup partition.
  LocalPath { path: String },
}

impl RepoIdentity {
  /// Parse a repository locator.
  ///
  /// Accepted remote forms:
  /// - `https://host/owner/repo[.git]` (also `http://`)
  /// - `git@host:owner/repo[.git]`
  /// - bare `owner/repo` shorthand
  ///
  /// Anything that looks like a filesystem path (`/...`, `./...`, `~/...`,
  /// or more than two slash-separated segments) parses as [`Self::LocalPath`].
  /// Pure function, no I/O.
  pub fn parse(input: &str) -> Result<Self> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
      return Err(invalid(input, "empty locator"));
    }
    if trimmed.contains(char::is_whitespace) {
      return Err(invalid(input, "locator contains whitespace"));
    }

    if let Some(rest) = trimmed
      .strip_prefix("https://")
      .or_else(|| trimmed.strip_prefix("http://"))
    {
      // rest = host/owner/repo[.git][/...]
      let mut segments = rest.split('/').filter(|s| !s.is_empty());
      let _host = segments.next().ok_or_else(|| invalid(input, "missing host"))?;
      let owner = segments.next().ok_or_else(|| invalid(input, "missing owner"))?;
      let repo = segments.next().ok_or_else(|| invalid(input, "missing repository name"))?;
      return Self::remote(input, owner, repo);
    }

    if let Some(rest) = trimmed.strip_prefix("git@") {
      // rest = host:owner/repo[.git]
      let (_host, path) = rest
        .split_once(':')
        .ok_or_else(|| invalid(input, "missing ':' in scp-style locator"))?;
      let mut segments = path.split('/').filter(|s| !s.is_empty());
      let owner = segments.next().ok_or_else(|| invalid(input, "missing owner"))?;
      let repo = segments.next().ok_or_else(|| invalid(input, "missing repository name"))?;
      return Self::remote(input, owner, repo);
    }

    if trimmed.contains("://") {
      return Err(invalid(input, "unsupported URL scheme"));
    }

    if trimmed.starts_with('/')
      || trimmed.starts_with("./")
      || trimmed.starts_with("../")
      || trimmed.starts_with("~/")
    {
      return Ok(Self::LocalPath { path: trimmed.to_owned() });
    }

    // Bare `owner/repo` shorthand; deeper paths fall back to the legacy mode.
    let segments: Vec<&str> = trimmed.split('/').collect();
    match segments.as_slice() {
      [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
        Self::remote(input, owner, repo)
      }
      [_] => Err(invalid(input, "missing repository name")),
      _ => Ok(Self::LocalPath { path: trimmed.to_owned() }),
    }
  }

  fn remote(input: &str, owner: &str, repo: &str) -> Result<Self> {
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if owner.is_empty() {
      return Err(invalid(input, "missing owner"));
    }
    if repo.is_empty() {
      return Err(invalid(input, "missing repository name"));
    }
    Ok(Self::Remote {
      owner: owner.to_owned(),
      repo:  repo.to_owned(),
    })
  }

  /// The canonical partition key used for deduplication and storage lookups.
  pub fn canonical(&self) -> String {
    match self {
      Self::Remote { owner, repo } => format!("{owner}/{repo}"),
      Self::LocalPath { path } => format!("path:{path}"),
    }
  }
}

impl std::fmt::Display for RepoIdentity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.canonical())
  }
}

fn invalid(input: &str, reason: &'static str) -> Error {
  Error::InvalidIdentity { input: input.to_owned(), reason }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn remote(owner: &str, repo: &str) -> RepoIdentity {
    RepoIdentity::Remote {
      owner: owner.to_owned(),
      repo:  repo.to_owned(),
    }
  }

  #[test]
  fn parses_https_url() {
    let id = RepoIdentity::parse("https://github.com/acme/widgets").unwrap();
    assert_eq!(id, remote("acme", "widgets"));
    assert_eq!(id.canonical(), "acme/widgets");
  }

  #[test]
  fn strips_dot_git_suffix() {
    let id = RepoIdentity::parse("https://github.com/acme/widgets.git").unwrap();
    assert_eq!(id, remote("acme", "widgets"));
  }

  #[test]
  fn parses_scp_style_url() {
    let id = RepoIdentity::parse("git@github.com:acme/widgets.git").unwrap();
    assert_eq!(id, remote("acme", "widgets"));
  }

  #[test]
  fn parses_bare_shorthand() {
    let id = RepoIdentity::parse("acme/widgets").unwrap();
    assert_eq!(id, remote("acme", "widgets"));
  }

  #[test]
  fn absolute_path_is_legacy_partition() {
    let id = RepoIdentity::parse("/srv/repos/widgets").unwrap();
    assert_eq!(id.canonical(), "path:/srv/repos/widgets");
  }

  #[test]
  fn url_missing_repo_errors() {
    let err = RepoIdentity::parse("https://github.com/acme").unwrap_err();
    assert!(matches!(err, Error::InvalidIdentity { .. }));
  }

  #[test]
  fn empty_and_whitespace_error() {
    assert!(RepoIdentity::parse("").is_err());
    assert!(RepoIdentity::parse("acme widgets").is_err());
  }

  #[test]
  fn unsupported_scheme_errors() {
    assert!(RepoIdentity::parse("ftp://github.com/acme/widgets").is_err());
  }

  #[test]
  fn trailing_url_segments_are_ignored() {
    let id =
      RepoIdentity::parse("https://github.com/acme/widgets/pull/17").unwrap();
    assert_eq!(id, remote("acme", "widgets"));
  }
}
