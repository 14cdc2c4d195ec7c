//! Changelog entry types and their category taxonomy.
//!
//! An entry draft is produced by the extractor, possibly edited by a human,
//! and becomes a durable [`crate::changelog::ChangelogEntry`] only on
//! submission. The persisted entry is whatever the human last approved, not
//! necessarily the raw model output.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Change type ─────────────────────────────────────────────────────────────

/// The type of a changelog as a whole, chosen by the author at review time.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
  #[default]
  Feature,
  Update,
  Fix,
  Breaking,
  Security,
}

impl ChangeType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Feature => "feature",
      Self::Update => "update",
      Self::Fix => "fix",
      Self::Breaking => "breaking",
      Self::Security => "security",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "feature" => Ok(Self::Feature),
      "update" => Ok(Self::Update),
      "fix" => Ok(Self::Fix),
      "breaking" => Ok(Self::Breaking),
      "security" => Ok(Self::Security),
      other => Err(Error::UnknownChangeType(other.to_owned())),
    }
  }
}

// ─── Entry categories ────────────────────────────────────────────────────────

/// Product-area component inferred from entry text. Best-effort; a human may
/// override it before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
  Authentication,
  Security,
  Search,
  Performance,
  Notifications,
  Payments,
  Ui,
  Api,
  Documentation,
}

impl Component {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Authentication => "authentication",
      Self::Security => "security",
      Self::Search => "search",
      Self::Performance => "performance",
      Self::Notifications => "notifications",
      Self::Payments => "payments",
      Self::Ui => "ui",
      Self::Api => "api",
      Self::Documentation => "documentation",
    }
  }
}

/// Which layer of the stack an entry touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
  Frontend,
  Backend,
  Database,
  Infrastructure,
}

impl Scope {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Frontend => "frontend",
      Self::Backend => "backend",
      Self::Database => "database",
      Self::Infrastructure => "infrastructure",
    }
  }
}

/// How large a change an entry describes.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
  Major,
  #[default]
  Minor,
  Patch,
}

impl Impact {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Major => "major",
      Self::Minor => "minor",
      Self::Patch => "patch",
    }
  }
}

// ─── EntryDraft ──────────────────────────────────────────────────────────────

/// A changelog entry candidate: extractor output, edited in place by the
/// author, then submitted. Ordering in the containing `Vec` is the display
/// order and becomes the dense ordinal position on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDraft {
  pub content:     String,
  #[serde(default)]
  pub component:   Option<Component>,
  #[serde(default)]
  pub scope:       Option<Scope>,
  #[serde(default)]
  pub impact:      Impact,
  /// Free-form badge labels shown in the browse view.
  #[serde(default)]
  pub labels:      Vec<String>,
  #[serde(default = "default_true")]
  pub user_facing: bool,
  #[serde(default)]
  pub technical:   bool,
}

fn default_true() -> bool {
  true
}
