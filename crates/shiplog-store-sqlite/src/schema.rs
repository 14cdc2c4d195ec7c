//! SQL schema for the Shiplog SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Changelogs are append-only aggregates: created once per submission,
-- never updated in place, never deleted by the system.
CREATE TABLE IF NOT EXISTS changelogs (
    changelog_id TEXT PRIMARY KEY,
    title        TEXT NOT NULL,   -- 'Month YYYY', computed in UTC
    content      TEXT NOT NULL,   -- legacy flattened entry contents
    change_type  TEXT NOT NULL,   -- 'feature' | 'update' | 'fix' | 'breaking' | 'security'
    created_at   TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS entries (
    entry_id     TEXT PRIMARY KEY,
    changelog_id TEXT NOT NULL REFERENCES changelogs(changelog_id),
    position     INTEGER NOT NULL, -- dense, zero-based, gap-free at write time
    content      TEXT NOT NULL,
    component    TEXT,
    scope        TEXT,
    impact       TEXT NOT NULL DEFAULT 'minor',
    labels       TEXT NOT NULL DEFAULT '[]',
    user_facing  INTEGER NOT NULL DEFAULT 1,
    technical    INTEGER NOT NULL DEFAULT 0,
    UNIQUE (changelog_id, position)
);

-- The hash PRIMARY KEY is the last-resort conflict detector: dedup failure
-- makes the second write fail, never silently duplicate.
CREATE TABLE IF NOT EXISTS commits (
    hash          TEXT PRIMARY KEY,
    repo_key      TEXT NOT NULL,   -- canonical repository partition key
    changelog_id  TEXT NOT NULL REFERENCES changelogs(changelog_id),
    message       TEXT NOT NULL,
    authored_at   TEXT NOT NULL,
    additions     INTEGER NOT NULL DEFAULT 0,
    deletions     INTEGER NOT NULL DEFAULT 0,
    files_changed INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS file_changes (
    file_change_id TEXT PRIMARY KEY,
    commit_hash    TEXT NOT NULL REFERENCES commits(hash),
    path           TEXT NOT NULL,
    additions      INTEGER NOT NULL,
    deletions      INTEGER NOT NULL,
    patch          TEXT NOT NULL,   -- full patch; truncation is prompt-only
    component      TEXT NOT NULL    -- derived from path at insert
);

CREATE TABLE IF NOT EXISTS entry_commits (
    entry_id    TEXT NOT NULL REFERENCES entries(entry_id),
    commit_hash TEXT NOT NULL REFERENCES commits(hash),
    UNIQUE (entry_id, commit_hash)
);

CREATE INDEX IF NOT EXISTS commits_repo_idx       ON commits(repo_key);
CREATE INDEX IF NOT EXISTS entries_changelog_idx  ON entries(changelog_id);
CREATE INDEX IF NOT EXISTS file_changes_commit_idx ON file_changes(commit_hash);
CREATE INDEX IF NOT EXISTS entry_commits_hash_idx ON entry_commits(commit_hash);

PRAGMA user_version = 1;
";
