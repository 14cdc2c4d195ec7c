//! Commit deduplication — a pure set difference.
//!
//! The storage-side lookup lives on
//! [`crate::store::ChangelogStore::recorded_hashes`]; this module only strips
//! a fetched batch against that result. It runs twice per submission: once
//! before review, and again inside the submission transaction, because time
//! passes between "fetch" and "submit".

use std::collections::HashSet;

use crate::commit::Commit;

/// Return the commits whose hashes are not in `stored`, preserving fetch
/// order (most-recent-first).
pub fn filter_new(fetched: Vec<Commit>, stored: &HashSet<String>) -> Vec<Commit> {
  fetched
    .into_iter()
    .filter(|c| !stored.contains(&c.hash))
    .collect()
}
