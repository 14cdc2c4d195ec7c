//! [`GithubCommits`] — the GitHub REST implementation of [`CommitSource`].

use futures::{StreamExt as _, TryStreamExt as _, stream};
use reqwest::{Client, StatusCode, header};
use tracing::debug;

use shiplog_core::{
  commit::{Commit, FileChange},
  identity::RepoIdentity,
  source::{CommitSource, DetailLevel},
};

use crate::{
  Error, Result,
  wire::{ApiMessage, CommitDetail, ListedCommit},
};

const GITHUB_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "shiplog";

/// Bound on concurrent per-commit detail fetches, to avoid hammering the
/// upstream API.
const DETAIL_CONCURRENCY: usize = 4;

/// A read-only commit source backed by the GitHub REST API.
pub struct GithubCommits {
  http:      Client,
  api_base:  String,
  token:     Option<String>,
  page_size: u32,
}

impl GithubCommits {
  /// Create a client against api.github.com. `token` is optional; without
  /// one, only public repositories are visible and rate limits are tight.
  pub fn new(token: Option<String>, page_size: u32) -> Self {
    Self {
      http: Client::new(),
      api_base: GITHUB_API_URL.to_owned(),
      token,
      page_size,
    }
  }

  /// Point the client at a different API base URL (e.g. a test server or a
  /// GitHub Enterprise host).
  pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
    self.api_base = base.into();
    self
  }

  fn request(&self, url: &str) -> reqwest::RequestBuilder {
    let mut req = self
      .http
      .get(url)
      .header(header::USER_AGENT, USER_AGENT)
      .header(header::ACCEPT, "application/vnd.github+json")
      .header("X-GitHub-Api-Version", API_VERSION);
    if let Some(token) = &self.token {
      req = req.bearer_auth(token);
    }
    req
  }

  async fn fetch_json<T: serde::de::DeserializeOwned>(
    &self,
    url: &str,
  ) -> Result<T> {
    let response = self.request(url).send().await?;
    let status = response.status();
    if status.is_success() {
      return Ok(response.json().await?);
    }

    let message = response
      .json::<ApiMessage>()
      .await
      .map(|m| m.message)
      .unwrap_or_default();
    Err(map_status(status, message))
  }

  async fn list_page(&self, owner: &str, repo: &str) -> Result<Vec<ListedCommit>> {
    let url = format!(
      "{}/repos/{owner}/{repo}/commits?per_page={}",
      self.api_base, self.page_size,
    );
    self.fetch_json(&url).await
  }

  async fn commit_detail(
    &self,
    owner: &str,
    repo: &str,
    sha: &str,
  ) -> Result<CommitDetail> {
    let url = format!("{}/repos/{owner}/{repo}/commits/{sha}", self.api_base);
    self.fetch_json(&url).await
  }
}

/// Map a non-success status to the adapter error taxonomy, distinguishing
/// not-found/auth from transient failures.
fn map_status(status: StatusCode, message: String) -> Error {
  match status {
    StatusCode::NOT_FOUND => Error::NotFound(message),
    StatusCode::UNAUTHORIZED => Error::Auth(message),
    StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
      Error::RateLimited(message)
    }
    other => Error::Upstream { status: other.as_u16(), message },
  }
}

impl CommitSource for GithubCommits {
  type Error = Error;

  async fn recent_commits(
    &self,
    repo: &RepoIdentity,
    detail: DetailLevel,
  ) -> Result<Vec<Commit>> {
    let (owner, name) = match repo {
      RepoIdentity::Remote { owner, repo } => (owner.as_str(), repo.as_str()),
      RepoIdentity::LocalPath { path } => {
        return Err(Error::UnsupportedIdentity(path.clone()));
      }
    };

    let listed = self.list_page(owner, name).await?;
    debug!(repo = %repo, fetched = listed.len(), "listed recent commits");

    let mut commits: Vec<Commit> = listed
      .iter()
      .map(|l| {
        // A commit with no author block gets the epoch rather than "now",
        // so re-fetches stay stable.
        let authored_at = l
          .commit
          .author
          .as_ref()
          .map_or(chrono::DateTime::UNIX_EPOCH, |a| a.date);
        Commit::new(l.sha.clone(), l.commit.message.clone(), authored_at)
      })
      .collect();

    if detail == DetailLevel::Files {
      // One extra round-trip per commit, concurrency-capped. Any single
      // failure aborts the whole batch: a partially detailed batch would
      // leave the dedup frontier silently incomplete.
      let detail_futures: Vec<_> = listed
        .iter()
        .map(|l| self.commit_detail(owner, name, &l.sha))
        .collect();
      let details: Vec<CommitDetail> = stream::iter(detail_futures)
        .buffered(DETAIL_CONCURRENCY)
        .try_collect()
        .await?;

      for (commit, detail) in std::mem::take(&mut commits)
        .into_iter()
        .zip(details)
      {
        let files = detail
          .files
          .into_iter()
          .map(|f| FileChange {
            path:      f.filename,
            additions: f.additions,
            deletions: f.deletions,
            patch:     f.patch.unwrap_or_default(),
          })
          .collect();
        commits.push(commit.with_files(files));
      }
    }

    Ok(commits)
  }
}
