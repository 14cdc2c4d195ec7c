//! Handlers for `/api/changelogs` — submission and the public browse views.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/changelogs` | Body: [`SubmitBody`]; 201 + stored changelog, 409 when nothing is new |
//! | `GET`  | `/api/changelogs` | All changelogs grouped by month, newest-first |
//! | `GET`  | `/api/changelogs/:id` | One changelog with entries |
//! | `GET`  | `/api/entries/:id/commits` | Provenance: commits linked to an entry |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use shiplog_core::{
  changelog::{ChangelogView, NewChangelog},
  commit::Commit,
  entry::{ChangeType, EntryDraft},
  generate::Generator,
  identity::RepoIdentity,
  source::CommitSource,
  store::{ChangelogStore, SubmitOutcome},
};

use crate::{AppState, error::ApiError};

// ─── Submit ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /api/changelogs`: the author-approved entries
/// and the commit batch they were generated from.
#[derive(Debug, Deserialize)]
pub struct SubmitBody {
  pub repo:        String,
  #[serde(default)]
  pub change_type: ChangeType,
  pub entries:     Vec<EntryDraft>,
  pub commits:     Vec<Commit>,
}

/// `POST /api/changelogs` — returns 201 + the stored changelog, or 409 when
/// the dedup re-check finds nothing new.
pub async fn submit<S, C, G>(
  State(state): State<AppState<S, C, G>>,
  Json(body): Json<SubmitBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ChangelogStore,
  C: CommitSource,
  G: Generator,
{
  let repo = RepoIdentity::parse(&body.repo)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  if body.entries.is_empty() {
    return Err(ApiError::BadRequest("no entries to record".into()));
  }
  if body.commits.is_empty() {
    return Err(ApiError::BadRequest("commit batch is empty".into()));
  }

  let outcome = state
    .store
    .submit(NewChangelog {
      repo,
      change_type: body.change_type,
      entries:     body.entries,
      commits:     body.commits,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  match outcome {
    SubmitOutcome::Written(view) => {
      info!(
        changelog = %view.changelog.changelog_id,
        entries = view.entries.len(),
        "changelog recorded",
      );
      Ok((StatusCode::CREATED, Json(with_badges(view))))
    }
    SubmitOutcome::NothingNew => Err(ApiError::NothingNew),
  }
}

// ─── Browse ──────────────────────────────────────────────────────────────────

/// One changelog as rendered in the browse views.
#[derive(Debug, Serialize)]
pub struct ChangelogResponse {
  #[serde(flatten)]
  pub view:   ChangelogView,
  /// Distinct badge labels across entries.
  pub badges: Vec<String>,
  /// Display lines; falls back to the legacy flattened content for
  /// changelogs that predate structured entries.
  pub lines:  Vec<String>,
}

fn with_badges(view: ChangelogView) -> ChangelogResponse {
  let badges = view.badges();
  let lines = view.display_lines();
  ChangelogResponse { view, badges, lines }
}

/// Changelogs sharing a creation month, newest month first.
#[derive(Debug, Serialize)]
pub struct MonthGroup {
  pub month:      String,
  pub changelogs: Vec<ChangelogResponse>,
}

/// `GET /api/changelogs`
pub async fn list<S, C, G>(
  State(state): State<AppState<S, C, G>>,
) -> Result<Json<Vec<MonthGroup>>, ApiError>
where
  S: ChangelogStore,
  C: CommitSource,
  G: Generator,
{
  let views = state
    .store
    .list_changelogs()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  // views arrive newest-first; group consecutive months
  let mut groups: Vec<MonthGroup> = Vec::new();
  for view in views {
    let month = view.changelog.created_at.format("%B %Y").to_string();
    match groups.last_mut() {
      Some(group) if group.month == month => {
        group.changelogs.push(with_badges(view));
      }
      _ => groups.push(MonthGroup {
        month,
        changelogs: vec![with_badges(view)],
      }),
    }
  }

  Ok(Json(groups))
}

/// `GET /api/changelogs/:id`
pub async fn get_one<S, C, G>(
  State(state): State<AppState<S, C, G>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ChangelogResponse>, ApiError>
where
  S: ChangelogStore,
  C: CommitSource,
  G: Generator,
{
  let view = state
    .store
    .get_changelog(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("changelog {id} not found")))?;
  Ok(Json(with_badges(view)))
}

/// `GET /api/entries/:id/commits` — which commits substantiate an entry.
pub async fn entry_commits<S, C, G>(
  State(state): State<AppState<S, C, G>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Commit>>, ApiError>
where
  S: ChangelogStore,
  C: CommitSource,
  G: Generator,
{
  let commits = state
    .store
    .commits_for_entry(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(commits))
}
