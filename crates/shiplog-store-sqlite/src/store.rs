//! [`SqliteStore`] — the SQLite implementation of [`ChangelogStore`].

use std::{collections::HashSet, path::Path};

use chrono::Utc;
use uuid::Uuid;

use shiplog_core::{
  changelog::{
    Changelog, ChangelogEntry, ChangelogView, NewChangelog, title_for,
  },
  commit::{CommitStats, component_for_path},
  store::{ChangelogStore, SubmitOutcome},
};

use crate::{
  encode::{RawChangelog, RawCommit, RawEntry, encode_dt, encode_labels, encode_uuid},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Shiplog changelog store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. The store
/// is the only shared mutable resource in the system; all writes go through
/// the one submission transaction.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read all entries grouped under the given changelogs, in position order.
  async fn views_for(
    &self,
    raw_changelogs: Vec<RawChangelog>,
  ) -> Result<Vec<ChangelogView>> {
    let ids: Vec<String> =
      raw_changelogs.iter().map(|c| c.changelog_id.clone()).collect();

    let raw_entries: Vec<RawEntry> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
          "SELECT entry_id, changelog_id, position, content, component,
                  scope, impact, labels, user_facing, technical
           FROM entries
           WHERE changelog_id IN ({placeholders})
           ORDER BY position ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
            Ok(RawEntry {
              entry_id:     row.get(0)?,
              changelog_id: row.get(1)?,
              position:     row.get(2)?,
              content:      row.get(3)?,
              component:    row.get(4)?,
              scope:        row.get(5)?,
              impact:       row.get(6)?,
              labels:       row.get(7)?,
              user_facing:  row.get(8)?,
              technical:    row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut entries: Vec<ChangelogEntry> = raw_entries
      .into_iter()
      .map(RawEntry::into_entry)
      .collect::<Result<_>>()?;

    let mut views = Vec::with_capacity(raw_changelogs.len());
    for raw in raw_changelogs {
      let changelog = raw.into_changelog()?;
      let mut own: Vec<ChangelogEntry> = Vec::new();
      entries.retain(|e| {
        if e.changelog_id == changelog.changelog_id {
          own.push(e.clone());
          false
        } else {
          true
        }
      });
      own.sort_by_key(|e| e.position);
      views.push(ChangelogView { changelog, entries: own });
    }
    Ok(views)
  }
}

// ─── Submission row types ────────────────────────────────────────────────────
//
// Everything is pre-encoded to plain strings before entering the connection
// thread, so the transaction closure does no domain work.

struct HeaderRow {
  changelog_id: String,
  repo_key:     String,
  title:        String,
  content:      String,
  change_type:  String,
  created_at:   String,
}

struct EntryRow {
  entry_id:    String,
  position:    i64,
  content:     String,
  component:   Option<String>,
  scope:       Option<String>,
  impact:      String,
  labels:      String,
  user_facing: bool,
  technical:   bool,
}

struct FileRow {
  file_change_id: String,
  path:           String,
  additions:      i64,
  deletions:      i64,
  patch:          String,
  component:      String,
}

struct CommitRow {
  hash:          String,
  message:       String,
  authored_at:   String,
  additions:     i64,
  deletions:     i64,
  files_changed: i64,
  files:         Vec<FileRow>,
}

enum TxStatus {
  Written,
  NothingNew,
  Failed(&'static str, rusqlite::Error),
}

type StageResult<T> = std::result::Result<T, (&'static str, rusqlite::Error)>;

/// Run all submission steps against one open transaction.
///
/// Returns `Ok(false)` when the in-transaction dedup re-check leaves no new
/// commits; the caller then rolls back without writing anything.
fn run_submit(
  tx: &rusqlite::Transaction<'_>,
  header: &HeaderRow,
  entries: &[EntryRow],
  commits: &[CommitRow],
) -> StageResult<bool> {
  if commits.is_empty() {
    return Ok(false);
  }

  // Step 1: dedup re-check. Time passed since the preview; another process
  // may have recorded some of these hashes.
  let stored = {
    let placeholders = vec!["?"; commits.len()].join(", ");
    let sql = format!(
      "SELECT hash FROM commits WHERE repo_key = ?1 AND hash IN ({placeholders})"
    );
    let mut params: Vec<&str> = vec![header.repo_key.as_str()];
    params.extend(commits.iter().map(|c| c.hash.as_str()));

    let mut stmt = tx.prepare(&sql).map_err(|e| ("dedup_check", e))?;
    let hashes: HashSet<String> = stmt
      .query_map(rusqlite::params_from_iter(params.iter()), |row| row.get(0))
      .and_then(|rows| rows.collect::<rusqlite::Result<HashSet<String>>>())
      .map_err(|e| ("dedup_check", e))?;
    hashes
  };

  let new_commits: Vec<&CommitRow> =
    commits.iter().filter(|c| !stored.contains(&c.hash)).collect();
  if new_commits.is_empty() {
    return Ok(false);
  }

  // Step 2: changelog header.
  tx.execute(
    "INSERT INTO changelogs (changelog_id, title, content, change_type, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![
      header.changelog_id,
      header.title,
      header.content,
      header.change_type,
      header.created_at,
    ],
  )
  .map_err(|e| ("changelog", e))?;

  // Step 3: entries with dense positions.
  for entry in entries {
    tx.execute(
      "INSERT INTO entries (
         entry_id, changelog_id, position, content, component,
         scope, impact, labels, user_facing, technical
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
      rusqlite::params![
        entry.entry_id,
        header.changelog_id,
        entry.position,
        entry.content,
        entry.component,
        entry.scope,
        entry.impact,
        entry.labels,
        entry.user_facing,
        entry.technical,
      ],
    )
    .map_err(|e| ("entries", e))?;
  }

  // Step 4: commits and their file changes. The hash PRIMARY KEY fires here
  // if a concurrent submission slipped past the re-check.
  for commit in &new_commits {
    tx.execute(
      "INSERT INTO commits (
         hash, repo_key, changelog_id, message, authored_at,
         additions, deletions, files_changed
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
      rusqlite::params![
        commit.hash,
        header.repo_key,
        header.changelog_id,
        commit.message,
        commit.authored_at,
        commit.additions,
        commit.deletions,
        commit.files_changed,
      ],
    )
    .map_err(|e| ("commits", e))?;

    for file in &commit.files {
      tx.execute(
        "INSERT INTO file_changes (
           file_change_id, commit_hash, path, additions, deletions, patch, component
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
          file.file_change_id,
          commit.hash,
          file.path,
          file.additions,
          file.deletions,
          file.patch,
          file.component,
        ],
      )
      .map_err(|e| ("file_changes", e))?;
    }
  }

  // Step 5: coarse provenance — every entry links to every new commit.
  for entry in entries {
    for commit in &new_commits {
      tx.execute(
        "INSERT INTO entry_commits (entry_id, commit_hash) VALUES (?1, ?2)",
        rusqlite::params![entry.entry_id, commit.hash],
      )
      .map_err(|e| ("entry_links", e))?;
    }
  }

  Ok(true)
}

// ─── ChangelogStore impl ─────────────────────────────────────────────────────

impl ChangelogStore for SqliteStore {
  type Error = Error;

  async fn recorded_hashes(
    &self,
    repo_key: &str,
    hashes: &[String],
  ) -> Result<HashSet<String>> {
    if hashes.is_empty() {
      return Ok(HashSet::new());
    }

    let mut params: Vec<String> = Vec::with_capacity(hashes.len() + 1);
    params.push(repo_key.to_owned());
    params.extend(hashes.iter().cloned());

    let stored: HashSet<String> = self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; params.len() - 1].join(", ");
        let sql = format!(
          "SELECT hash FROM commits WHERE repo_key = ?1 AND hash IN ({placeholders})"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), |row| row.get(0))?
          .collect::<rusqlite::Result<HashSet<String>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(stored)
  }

  async fn submit(&self, input: NewChangelog) -> Result<SubmitOutcome> {
    let now = Utc::now();
    let changelog_id = Uuid::new_v4();

    let changelog = Changelog {
      changelog_id,
      title: title_for(now),
      content: input
        .entries
        .iter()
        .map(|e| e.content.as_str())
        .collect::<Vec<_>>()
        .join("\n"),
      change_type: input.change_type,
      created_at: now,
    };

    let entries: Vec<ChangelogEntry> = input
      .entries
      .iter()
      .enumerate()
      .map(|(i, draft)| ChangelogEntry {
        entry_id:     Uuid::new_v4(),
        changelog_id,
        position:     i as u32,
        content:      draft.content.clone(),
        component:    draft.component,
        scope:        draft.scope,
        impact:       draft.impact,
        labels:       draft.labels.clone(),
        user_facing:  draft.user_facing,
        technical:    draft.technical,
      })
      .collect();

    let header = HeaderRow {
      changelog_id: encode_uuid(changelog_id),
      repo_key:     input.repo.canonical(),
      title:        changelog.title.clone(),
      content:      changelog.content.clone(),
      change_type:  changelog.change_type.as_str().to_owned(),
      created_at:   encode_dt(now),
    };

    let entry_rows: Vec<EntryRow> = entries
      .iter()
      .map(|e| {
        Ok(EntryRow {
          entry_id:    encode_uuid(e.entry_id),
          position:    i64::from(e.position),
          content:     e.content.clone(),
          component:   e.component.map(|c| c.as_str().to_owned()),
          scope:       e.scope.map(|s| s.as_str().to_owned()),
          impact:      e.impact.as_str().to_owned(),
          labels:      encode_labels(&e.labels)?,
          user_facing: e.user_facing,
          technical:   e.technical,
        })
      })
      .collect::<Result<_>>()?;

    let commit_rows: Vec<CommitRow> = input
      .commits
      .iter()
      .map(|c| {
        // Aggregates are derived: recompute from file detail when present.
        let stats = if c.files.is_empty() {
          c.stats
        } else {
          CommitStats::from_files(&c.files)
        };
        CommitRow {
          hash:          c.hash.clone(),
          message:       c.message.clone(),
          authored_at:   encode_dt(c.authored_at),
          additions:     stats.additions,
          deletions:     stats.deletions,
          files_changed: stats.files_changed,
          files:         c
            .files
            .iter()
            .map(|f| FileRow {
              file_change_id: encode_uuid(Uuid::new_v4()),
              path:           f.path.clone(),
              additions:      f.additions,
              deletions:      f.deletions,
              patch:          f.patch.clone(),
              component:      component_for_path(&f.path).as_str().to_owned(),
            })
            .collect(),
        }
      })
      .collect();

    let status = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        match run_submit(&tx, &header, &entry_rows, &commit_rows) {
          Ok(true) => {
            tx.commit()?;
            Ok(TxStatus::Written)
          }
          // Dropping the transaction rolls back; nothing was written.
          Ok(false) => Ok(TxStatus::NothingNew),
          Err((stage, e)) => Ok(TxStatus::Failed(stage, e)),
        }
      })
      .await?;

    match status {
      TxStatus::Written => {
        Ok(SubmitOutcome::Written(ChangelogView { changelog, entries }))
      }
      TxStatus::NothingNew => Ok(SubmitOutcome::NothingNew),
      TxStatus::Failed(stage, source) => Err(Error::Submit { stage, source }),
    }
  }

  async fn list_changelogs(&self) -> Result<Vec<ChangelogView>> {
    let raws: Vec<RawChangelog> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT changelog_id, title, content, change_type, created_at
           FROM changelogs
           ORDER BY created_at DESC, changelog_id",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawChangelog {
              changelog_id: row.get(0)?,
              title:        row.get(1)?,
              content:      row.get(2)?,
              change_type:  row.get(3)?,
              created_at:   row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    if raws.is_empty() {
      return Ok(Vec::new());
    }
    self.views_for(raws).await
  }

  async fn get_changelog(&self, id: Uuid) -> Result<Option<ChangelogView>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawChangelog> = self
      .conn
      .call(move |conn| {
        use rusqlite::OptionalExtension as _;
        Ok(
          conn
            .query_row(
              "SELECT changelog_id, title, content, change_type, created_at
               FROM changelogs WHERE changelog_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawChangelog {
                  changelog_id: row.get(0)?,
                  title:        row.get(1)?,
                  content:      row.get(2)?,
                  change_type:  row.get(3)?,
                  created_at:   row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    match raw {
      Some(raw) => Ok(self.views_for(vec![raw]).await?.into_iter().next()),
      None => Ok(None),
    }
  }

  async fn commits_for_entry(
    &self,
    entry_id: Uuid,
  ) -> Result<Vec<shiplog_core::commit::Commit>> {
    let id_str = encode_uuid(entry_id);

    let raws: Vec<RawCommit> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT c.hash, c.message, c.authored_at,
                  c.additions, c.deletions, c.files_changed
           FROM entry_commits ec
           JOIN commits c ON c.hash = ec.commit_hash
           WHERE ec.entry_id = ?1
           ORDER BY c.authored_at DESC, c.hash",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawCommit {
              hash:          row.get(0)?,
              message:       row.get(1)?,
              authored_at:   row.get(2)?,
              additions:     row.get(3)?,
              deletions:     row.get(4)?,
              files_changed: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCommit::into_commit).collect()
  }
}
