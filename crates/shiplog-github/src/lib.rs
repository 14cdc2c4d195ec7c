//! GitHub commit source adapter for Shiplog.
//!
//! Implements [`shiplog_core::source::CommitSource`] against the GitHub REST
//! API: one bounded page of recent commits, plus an optional per-commit
//! detail fan-out with a small concurrency cap. Read-only; failures are
//! surfaced to the caller, never retried here.

mod client;
mod wire;

pub mod error;

pub use client::GithubCommits;
pub use error::{Error, Result};
