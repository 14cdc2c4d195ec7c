//! Handler for `POST /api/generate` — compose a prompt from a reviewed
//! commit batch, call the generation capability, and extract entry drafts.
//!
//! A failing generator never fails the request: the handler logs the error
//! and answers with the fixed fallback entry set so the review workflow
//! stays usable.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::warn;

use shiplog_core::{
  commit::Commit,
  entry::{ChangeType, EntryDraft},
  extract::{extract_entries, fallback_entries},
  generate::Generator,
  identity::RepoIdentity,
  prompt::compose_prompt,
  source::CommitSource,
  store::ChangelogStore,
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
  pub repo:        String,
  #[serde(default)]
  pub change_type: ChangeType,
  /// The reviewed batch from the preview endpoint.
  pub commits:     Vec<Commit>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
  pub entries:  Vec<EntryDraft>,
  /// True when the entries came from the fixed fallback set rather than
  /// model output.
  pub fallback: bool,
}

/// `POST /api/generate` — body: [`GenerateBody`].
pub async fn handler<S, C, G>(
  State(state): State<AppState<S, C, G>>,
  Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, ApiError>
where
  S: ChangelogStore,
  C: CommitSource,
  G: Generator,
{
  RepoIdentity::parse(&body.repo)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  if body.commits.is_empty() {
    return Err(ApiError::BadRequest("commit batch is empty".into()));
  }

  let prompt = compose_prompt(&body.commits, body.change_type);

  let (entries, fallback) = match state
    .generator
    .complete(&prompt, state.config.max_output_tokens)
    .await
  {
    Ok(text) => {
      let entries = extract_entries(&text);
      if entries.is_empty() {
        warn!("generator returned no usable entries; using fallback set");
        (fallback_entries(), true)
      } else {
        (entries, false)
      }
    }
    Err(e) => {
      warn!(error = %e, "generation unavailable; using fallback set");
      (fallback_entries(), true)
    }
  };

  Ok(Json(GenerateResponse { entries, fallback }))
}
