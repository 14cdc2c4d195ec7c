//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::Utc;
use shiplog_core::{
  changelog::NewChangelog,
  commit::{Commit, FileChange},
  entry::{ChangeType, EntryDraft, Impact},
  extract::{FALLBACK_MARKER, fallback_entries},
  identity::RepoIdentity,
  store::{ChangelogStore, SubmitOutcome},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn repo() -> RepoIdentity {
  RepoIdentity::parse("acme/widgets").unwrap()
}

fn commit(hash: &str, message: &str) -> Commit {
  Commit::new(hash, message, Utc::now())
}

fn draft(content: &str) -> EntryDraft {
  EntryDraft {
    content:     content.to_owned(),
    component:   None,
    scope:       None,
    impact:      Impact::Minor,
    labels:      vec!["minor".into()],
    user_facing: true,
    technical:   false,
  }
}

fn submission(commits: Vec<Commit>, entries: Vec<EntryDraft>) -> NewChangelog {
  NewChangelog {
    repo: repo(),
    change_type: ChangeType::Feature,
    entries,
    commits,
  }
}

fn written(outcome: SubmitOutcome) -> shiplog_core::changelog::ChangelogView {
  match outcome {
    SubmitOutcome::Written(view) => view,
    SubmitOutcome::NothingNew => panic!("expected a written changelog"),
  }
}

// ─── Submission ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_and_read_back() {
  let s = store().await;

  let outcome = s
    .submit(submission(
      vec![commit("a1", "Fix login bug")],
      vec![draft("- Fixed a login bug")],
    ))
    .await
    .unwrap();
  let view = written(outcome);

  assert_eq!(view.entries.len(), 1);
  assert_eq!(view.entries[0].position, 0);

  let all = s.list_changelogs().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].changelog.changelog_id, view.changelog.changelog_id);
  assert_eq!(all[0].entries.len(), 1);
  assert_eq!(all[0].changelog.change_type, ChangeType::Feature);
}

#[tokio::test]
async fn title_is_month_and_year() {
  let s = store().await;
  let view = written(
    s.submit(submission(vec![commit("a1", "m")], vec![draft("- x")]))
      .await
      .unwrap(),
  );
  let expected = view.changelog.created_at.format("%B %Y").to_string();
  assert_eq!(view.changelog.title, expected);
}

#[tokio::test]
async fn flattened_content_joins_entries() {
  let s = store().await;
  let view = written(
    s.submit(submission(
      vec![commit("a1", "m")],
      vec![draft("- first"), draft("- second")],
    ))
    .await
    .unwrap(),
  );
  assert_eq!(view.changelog.content, "- first\n- second");
}

// ─── Entry ordering ──────────────────────────────────────────────────────────

#[tokio::test]
async fn entry_positions_are_dense_and_stable() {
  let s = store().await;

  let drafts: Vec<EntryDraft> =
    (0..5).map(|i| draft(&format!("- entry {i}"))).collect();
  written(
    s.submit(submission(vec![commit("a1", "m")], drafts))
      .await
      .unwrap(),
  );

  let all = s.list_changelogs().await.unwrap();
  let entries = &all[0].entries;
  assert_eq!(entries.len(), 5);
  for (i, entry) in entries.iter().enumerate() {
    assert_eq!(entry.position, i as u32);
    assert_eq!(entry.content, format!("- entry {i}"));
  }
}

// ─── Deduplication ───────────────────────────────────────────────────────────

#[tokio::test]
async fn recorded_hashes_partitions_by_repo() {
  let s = store().await;
  written(
    s.submit(submission(vec![commit("a1", "m")], vec![draft("- x")]))
      .await
      .unwrap(),
  );

  let stored = s
    .recorded_hashes("acme/widgets", &["a1".into(), "a2".into()])
    .await
    .unwrap();
  assert!(stored.contains("a1"));
  assert!(!stored.contains("a2"));

  // a different partition does not see the hash
  let other = s
    .recorded_hashes("acme/gadgets", &["a1".into()])
    .await
    .unwrap();
  assert!(other.is_empty());
}

#[tokio::test]
async fn resubmitting_same_batch_writes_nothing() {
  let s = store().await;

  let batch = vec![commit("a1", "one"), commit("a2", "two")];
  written(
    s.submit(submission(batch.clone(), vec![draft("- x")]))
      .await
      .unwrap(),
  );

  let second = s
    .submit(submission(batch, vec![draft("- y")]))
    .await
    .unwrap();
  assert!(matches!(second, SubmitOutcome::NothingNew));

  // no second changelog appeared
  assert_eq!(s.list_changelogs().await.unwrap().len(), 1);
}

#[tokio::test]
async fn partially_overlapping_batch_stores_only_new_commits() {
  let s = store().await;

  written(
    s.submit(submission(vec![commit("a1", "one")], vec![draft("- x")]))
      .await
      .unwrap(),
  );
  let view = written(
    s.submit(submission(
      vec![commit("a1", "one"), commit("a3", "three")],
      vec![draft("- y")],
    ))
    .await
    .unwrap(),
  );

  // only a3 was written, and it is the one linked to the new entry
  let linked = s
    .commits_for_entry(view.entries[0].entry_id)
    .await
    .unwrap();
  assert_eq!(linked.len(), 1);
  assert_eq!(linked[0].hash, "a3");
}

// ─── Atomicity ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_hash_within_batch_rolls_back_everything() {
  let s = store().await;

  // The second insert of "dup" violates the hash primary key partway
  // through the transaction, after the changelog and entries are in.
  let err = s
    .submit(submission(
      vec![commit("c1", "one"), commit("dup", "two"), commit("dup", "three")],
      vec![draft("- x")],
    ))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::Submit { stage: "commits", .. }));

  // nothing from the failed batch is visible
  assert!(s.list_changelogs().await.unwrap().is_empty());
  let stored = s
    .recorded_hashes("acme/widgets", &["c1".into(), "dup".into()])
    .await
    .unwrap();
  assert!(stored.is_empty());
}

#[tokio::test]
async fn hash_is_unique_under_concurrent_overlapping_submissions() {
  let s = store().await;

  let first = submission(
    vec![commit("a1", "one"), commit("a2", "two")],
    vec![draft("- x")],
  );
  let second = submission(
    vec![commit("a2", "two"), commit("a3", "three")],
    vec![draft("- y")],
  );

  let (r1, r2) = tokio::join!(s.submit(first), s.submit(second));
  r1.unwrap();
  r2.unwrap();

  // all three hashes are recorded, each exactly once: the overlapping a2
  // landed in exactly one changelog's linked set
  let stored = s
    .recorded_hashes(
      "acme/widgets",
      &["a1".into(), "a2".into(), "a3".into()],
    )
    .await
    .unwrap();
  assert_eq!(stored.len(), 3);

  let all = s.list_changelogs().await.unwrap();
  let mut linked_a2 = 0;
  for view in &all {
    for entry in &view.entries {
      let linked = s.commits_for_entry(entry.entry_id).await.unwrap();
      linked_a2 += linked.iter().filter(|c| c.hash == "a2").count();
    }
  }
  assert_eq!(linked_a2, 1);
}

// ─── File changes and stats ──────────────────────────────────────────────────

#[tokio::test]
async fn aggregate_stats_are_recomputed_from_files() {
  let s = store().await;

  let mut c = commit("f1", "touch two files").with_files(vec![
    FileChange { path: "src/a.rs".into(), additions: 3, deletions: 1, patch: "+a".into() },
    FileChange { path: "src/b.rs".into(), additions: 4, deletions: 2, patch: "+b".into() },
  ]);
  // poison the provided aggregates; the store must derive from files
  c.stats.additions = 999;

  let view = written(
    s.submit(submission(vec![c], vec![draft("- x")]))
      .await
      .unwrap(),
  );

  let linked = s
    .commits_for_entry(view.entries[0].entry_id)
    .await
    .unwrap();
  assert_eq!(linked[0].stats.additions, 7);
  assert_eq!(linked[0].stats.deletions, 3);
  assert_eq!(linked[0].stats.files_changed, 2);
}

// ─── Provenance links ────────────────────────────────────────────────────────

#[tokio::test]
async fn every_entry_links_to_every_new_commit() {
  let s = store().await;

  let view = written(
    s.submit(submission(
      vec![commit("a1", "Fix login bug"), commit("a2", "Add dark mode")],
      vec![draft("- one"), draft("- two")],
    ))
    .await
    .unwrap(),
  );

  for entry in &view.entries {
    let linked = s.commits_for_entry(entry.entry_id).await.unwrap();
    let mut hashes: Vec<_> = linked.iter().map(|c| c.hash.clone()).collect();
    hashes.sort();
    assert_eq!(hashes, vec!["a1", "a2"]);
  }
}

// ─── Fallback scenario ───────────────────────────────────────────────────────

#[tokio::test]
async fn fallback_entries_submit_like_any_other() {
  let s = store().await;

  // Generation capability unavailable: the author approves the fixed
  // fallback set, and submission proceeds normally.
  let view = written(
    s.submit(submission(
      vec![commit("a1", "Fix login bug"), commit("a2", "Add dark mode")],
      fallback_entries(),
    ))
    .await
    .unwrap(),
  );

  assert_eq!(view.changelog.change_type, ChangeType::Feature);
  assert!(!view.entries.is_empty());
  assert!(view.entries.iter().all(|e| e.content.contains(FALLBACK_MARKER)));

  for entry in &view.entries {
    let linked = s.commits_for_entry(entry.entry_id).await.unwrap();
    assert_eq!(linked.len(), 2);
  }
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_changelog_by_id() {
  let s = store().await;
  let view = written(
    s.submit(submission(vec![commit("a1", "m")], vec![draft("- x")]))
      .await
      .unwrap(),
  );

  let fetched = s
    .get_changelog(view.changelog.changelog_id)
    .await
    .unwrap()
    .expect("changelog exists");
  assert_eq!(fetched.entries.len(), 1);

  let missing = s.get_changelog(uuid::Uuid::new_v4()).await.unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn list_is_newest_first() {
  let s = store().await;
  written(
    s.submit(submission(vec![commit("a1", "m")], vec![draft("- x")]))
      .await
      .unwrap(),
  );
  // created_at has sub-second precision, so even adjacent submissions sort
  tokio::time::sleep(std::time::Duration::from_millis(5)).await;
  let newer = written(
    s.submit(submission(vec![commit("a2", "m")], vec![draft("- y")]))
      .await
      .unwrap(),
  );

  let all = s.list_changelogs().await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].changelog.changelog_id, newer.changelog.changelog_id);
}
