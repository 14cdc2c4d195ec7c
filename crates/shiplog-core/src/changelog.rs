//! Changelog aggregate types.
//!
//! A changelog is a named, dated, typed container for entries, created
//! exactly once per successful submission and never updated in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  commit::Commit,
  entry::{ChangeType, Component, EntryDraft, Impact, Scope},
  identity::RepoIdentity,
};

// ─── Stored records ──────────────────────────────────────────────────────────

/// The changelog header row. `content` is the legacy flattened form — the
/// newline-joined entry contents — kept for backward display compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Changelog {
  pub changelog_id: Uuid,
  /// Derived from the creation month and year, not from content.
  pub title:        String,
  pub content:      String,
  pub change_type:  ChangeType,
  /// Server-assigned, always UTC; never changes after creation.
  pub created_at:   DateTime<Utc>,
}

/// One persisted entry. `position` is a dense, zero-based ordinal within the
/// changelog, assigned at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogEntry {
  pub entry_id:     Uuid,
  pub changelog_id: Uuid,
  pub position:     u32,
  pub content:      String,
  pub component:    Option<Component>,
  pub scope:        Option<Scope>,
  pub impact:       Impact,
  pub labels:       Vec<String>,
  pub user_facing:  bool,
  pub technical:    bool,
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Input to [`crate::store::ChangelogStore::submit`]. Identifiers, positions,
/// the title, and `created_at` are all assigned by the store.
#[derive(Debug, Clone)]
pub struct NewChangelog {
  pub repo:        RepoIdentity,
  pub change_type: ChangeType,
  /// Author-approved entries, in display order.
  pub entries:     Vec<EntryDraft>,
  /// The reviewed commit batch. The store re-filters against already
  /// recorded hashes inside the submission transaction.
  pub commits:     Vec<Commit>,
}

/// Compute the title for a changelog created at `at` — month name and year
/// in UTC, so server- and client-rendered views agree.
pub fn title_for(at: DateTime<Utc>) -> String {
  at.format("%B %Y").to_string()
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// A changelog with its ordered entries — the unit returned by reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogView {
  pub changelog: Changelog,
  pub entries:   Vec<ChangelogEntry>,
}

impl ChangelogView {
  /// Lines to display, in order. Changelogs that predate structured entries
  /// have none; fall back to splitting the flattened content.
  pub fn display_lines(&self) -> Vec<String> {
    if self.entries.is_empty() {
      return self
        .changelog
        .content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_owned)
        .collect();
    }
    self.entries.iter().map(|e| e.content.clone()).collect()
  }

  /// Distinct badge labels across entries, in first-seen order. Entries
  /// without labels fall back to their single component field.
  pub fn badges(&self) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for entry in &self.entries {
      if entry.labels.is_empty() {
        if let Some(component) = entry.component {
          push_unique(&mut out, component.as_str().to_owned());
        }
        continue;
      }
      for label in &entry.labels {
        push_unique(&mut out, label.clone());
      }
    }
    out
  }
}

fn push_unique(out: &mut Vec<String>, label: String) {
  if !out.contains(&label) {
    out.push(label);
  }
}
