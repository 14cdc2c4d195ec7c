//! shiplog server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the changelog API over HTTP.
//! Configuration keys can also be supplied as `SHIPLOG_*` environment
//! variables.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use shiplog_api::{AppState, ServerConfig};
use shiplog_github::GithubCommits;
use shiplog_llm::AnthropicGenerator;
use shiplog_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Changelog generation server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SHIPLOG"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Source and generator adapters.
  let source = GithubCommits::new(
    server_cfg.github_token.clone(),
    server_cfg.page_size,
  );
  if server_cfg.anthropic_api_key.is_none() {
    tracing::warn!(
      "no anthropic_api_key configured; generation will fall back to \
       placeholder entries"
    );
  }
  let generator = AnthropicGenerator::new(
    server_cfg.anthropic_api_key.clone().unwrap_or_default(),
    server_cfg.model.clone(),
  );

  // Build application state.
  let state = AppState {
    store:     Arc::new(store),
    source:    Arc::new(source),
    generator: Arc::new(generator),
    config:    Arc::new(server_cfg.clone()),
  };

  let app = shiplog_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
