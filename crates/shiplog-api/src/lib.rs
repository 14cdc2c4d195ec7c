//! HTTP layer for shiplog.
//!
//! Exposes an axum [`Router`] over the changelog workflow: preview new
//! commits, generate entry drafts, submit approved changelogs, and browse
//! what was published. Generic over the store, commit source, and generator
//! so tests can swap in stubs.
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | `GET`  | `/api/commits` | Fetch + dedup the reviewable batch |
//! | `POST` | `/api/generate` | Draft entries from a reviewed batch |
//! | `POST` | `/api/changelogs` | Persist an approved changelog |
//! | `GET`  | `/api/changelogs` | Browse, grouped by month |
//! | `GET`  | `/api/changelogs/{id}` | One changelog |
//! | `GET`  | `/api/entries/{id}/commits` | Provenance for an entry |

pub mod changelogs;
pub mod commits;
pub mod error;
pub mod generate;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use shiplog_core::{
  generate::Generator, source::CommitSource, store::ChangelogStore,
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `SHIPLOG_*` environment. Every field has a default so a bare config file
/// still boots.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:              String,
  #[serde(default = "default_port")]
  pub port:              u16,
  #[serde(default = "default_store_path")]
  pub store_path:        PathBuf,
  /// GitHub token for private repositories and a higher rate limit.
  #[serde(default)]
  pub github_token:      Option<String>,
  #[serde(default)]
  pub anthropic_api_key: Option<String>,
  #[serde(default = "default_model")]
  pub model:             String,
  /// Size of the single commit page fetched per preview.
  #[serde(default = "default_page_size")]
  pub page_size:         u32,
  #[serde(default = "default_max_output_tokens")]
  pub max_output_tokens: u32,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8099 }
fn default_store_path() -> PathBuf { PathBuf::from("shiplog.db") }
fn default_model() -> String { "claude-3-5-haiku-latest".to_owned() }
fn default_page_size() -> u32 { 20 }
fn default_max_output_tokens() -> u32 { 1024 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:              default_host(),
      port:              default_port(),
      store_path:        default_store_path(),
      github_token:      None,
      anthropic_api_key: None,
      model:             default_model(),
      page_size:         default_page_size(),
      max_output_tokens: default_max_output_tokens(),
    }
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, C, G> {
  pub store:     Arc<S>,
  pub source:    Arc<C>,
  pub generator: Arc<G>,
  pub config:    Arc<ServerConfig>,
}

// Manual impl so S, C, G need not be Clone themselves.
impl<S, C, G> Clone for AppState<S, C, G> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      source:    Arc::clone(&self.source),
      generator: Arc::clone(&self.generator),
      config:    Arc::clone(&self.config),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the shiplog server.
pub fn router<S, C, G>(state: AppState<S, C, G>) -> Router
where
  S: ChangelogStore + 'static,
  C: CommitSource + 'static,
  G: Generator + 'static,
{
  Router::new()
    .route("/api/commits", get(commits::preview::<S, C, G>))
    .route("/api/generate", post(generate::handler::<S, C, G>))
    .route(
      "/api/changelogs",
      get(changelogs::list::<S, C, G>).post(changelogs::submit::<S, C, G>),
    )
    .route("/api/changelogs/{id}", get(changelogs::get_one::<S, C, G>))
    .route(
      "/api/entries/{id}/commits",
      get(changelogs::entry_commits::<S, C, G>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
