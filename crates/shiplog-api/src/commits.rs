//! Handler for `GET /api/commits` — fetch a repository's recent commits and
//! strip the ones already recorded, producing the reviewable batch.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use shiplog_core::{
  commit::Commit,
  dedup,
  generate::Generator,
  identity::RepoIdentity,
  source::{CommitSource, DetailLevel},
  store::ChangelogStore,
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
  /// Repository locator: URL, `git@` form, or `owner/repo` shorthand.
  pub repo:   String,
  /// `messages` (default) or `files` for per-commit diff detail.
  #[serde(default)]
  pub detail: DetailLevel,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
  /// Canonical partition key the batch was deduplicated against.
  pub repo:        String,
  /// How many commits the source returned before deduplication.
  pub fetched:     usize,
  /// The batch: commits not yet recorded, most-recent-first.
  pub new_commits: Vec<Commit>,
}

/// `GET /api/commits?repo=<locator>[&detail=files]`
pub async fn preview<S, C, G>(
  State(state): State<AppState<S, C, G>>,
  Query(params): Query<PreviewParams>,
) -> Result<Json<PreviewResponse>, ApiError>
where
  S: ChangelogStore,
  C: CommitSource,
  G: Generator,
{
  let identity = RepoIdentity::parse(&params.repo)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let fetched = state
    .source
    .recent_commits(&identity, params.detail)
    .await
    .map_err(|e| ApiError::Source(e.to_string()))?;

  let hashes: Vec<String> = fetched.iter().map(|c| c.hash.clone()).collect();
  let stored = state
    .store
    .recorded_hashes(&identity.canonical(), &hashes)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let new_commits = dedup::filter_new(fetched, &stored);

  Ok(Json(PreviewResponse {
    repo: identity.canonical(),
    fetched: hashes.len(),
    new_commits,
  }))
}
