//! SQLite backend for the Shiplog changelog store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The submission path is one SQLite
//! transaction: dedup re-check, changelog, entries, commits, file changes,
//! and entry↔commit links commit together or not at all.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
