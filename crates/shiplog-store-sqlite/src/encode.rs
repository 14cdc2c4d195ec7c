//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Labels are stored as
//! compact JSON arrays. UUIDs are stored as hyphenated lowercase strings.
//! Category enums are stored as their `as_str` forms.

use chrono::{DateTime, Utc};
use shiplog_core::{
  changelog::{Changelog, ChangelogEntry},
  commit::{Commit, CommitStats},
  entry::{ChangeType, Component, Impact, Scope},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ChangeType ──────────────────────────────────────────────────────────────

pub fn decode_change_type(s: &str) -> Result<ChangeType> {
  ChangeType::parse(s).map_err(|_| Error::Decode(format!("unknown change type: {s:?}")))
}

// ─── Component ───────────────────────────────────────────────────────────────

pub fn decode_component(s: &str) -> Result<Component> {
  match s {
    "authentication" => Ok(Component::Authentication),
    "security" => Ok(Component::Security),
    "search" => Ok(Component::Search),
    "performance" => Ok(Component::Performance),
    "notifications" => Ok(Component::Notifications),
    "payments" => Ok(Component::Payments),
    "ui" => Ok(Component::Ui),
    "api" => Ok(Component::Api),
    "documentation" => Ok(Component::Documentation),
    other => Err(Error::Decode(format!("unknown component: {other:?}"))),
  }
}

// ─── Scope ───────────────────────────────────────────────────────────────────

pub fn decode_scope(s: &str) -> Result<Scope> {
  match s {
    "frontend" => Ok(Scope::Frontend),
    "backend" => Ok(Scope::Backend),
    "database" => Ok(Scope::Database),
    "infrastructure" => Ok(Scope::Infrastructure),
    other => Err(Error::Decode(format!("unknown scope: {other:?}"))),
  }
}

// ─── Impact ──────────────────────────────────────────────────────────────────

pub fn decode_impact(s: &str) -> Result<Impact> {
  match s {
    "major" => Ok(Impact::Major),
    "minor" => Ok(Impact::Minor),
    "patch" => Ok(Impact::Patch),
    other => Err(Error::Decode(format!("unknown impact: {other:?}"))),
  }
}

// ─── Labels ──────────────────────────────────────────────────────────────────

pub fn encode_labels(labels: &[String]) -> Result<String> {
  Ok(serde_json::to_string(labels)?)
}

pub fn decode_labels(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `changelogs` row.
pub struct RawChangelog {
  pub changelog_id: String,
  pub title:        String,
  pub content:      String,
  pub change_type:  String,
  pub created_at:   String,
}

impl RawChangelog {
  pub fn into_changelog(self) -> Result<Changelog> {
    Ok(Changelog {
      changelog_id: decode_uuid(&self.changelog_id)?,
      title:        self.title,
      content:      self.content,
      change_type:  decode_change_type(&self.change_type)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `entries` row.
pub struct RawEntry {
  pub entry_id:     String,
  pub changelog_id: String,
  pub position:     i64,
  pub content:      String,
  pub component:    Option<String>,
  pub scope:        Option<String>,
  pub impact:       String,
  pub labels:       String,
  pub user_facing:  bool,
  pub technical:    bool,
}

impl RawEntry {
  pub fn into_entry(self) -> Result<ChangelogEntry> {
    Ok(ChangelogEntry {
      entry_id:     decode_uuid(&self.entry_id)?,
      changelog_id: decode_uuid(&self.changelog_id)?,
      position:     self.position as u32,
      content:      self.content,
      component:    self.component.as_deref().map(decode_component).transpose()?,
      scope:        self.scope.as_deref().map(decode_scope).transpose()?,
      impact:       decode_impact(&self.impact)?,
      labels:       decode_labels(&self.labels)?,
      user_facing:  self.user_facing,
      technical:    self.technical,
    })
  }
}

/// Raw strings read directly from a `commits` row. File changes are not
/// re-joined on read; the aggregates carry the stored detail.
pub struct RawCommit {
  pub hash:          String,
  pub message:       String,
  pub authored_at:   String,
  pub additions:     i64,
  pub deletions:     i64,
  pub files_changed: i64,
}

impl RawCommit {
  pub fn into_commit(self) -> Result<Commit> {
    Ok(Commit {
      hash:        self.hash,
      message:     self.message,
      authored_at: decode_dt(&self.authored_at)?,
      stats:       CommitStats {
        additions:     self.additions,
        deletions:     self.deletions,
        files_changed: self.files_changed,
      },
      files:       Vec::new(),
    })
  }
}
