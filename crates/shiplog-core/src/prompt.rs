//! Prompt composition — shapes a commit batch into one bounded text prompt.
//!
//! Pure with respect to its inputs; the model call itself is the caller's
//! side effect. Raw technical identifiers (paths, library names) appear only
//! in the input context section, never in the instructed output format.

use std::fmt::Write as _;

use crate::{commit::Commit, entry::ChangeType};

/// Character budget per file patch excerpt.
pub const PER_FILE_PATCH_BUDGET: usize = 1_200;
/// At most this many file excerpts per commit.
pub const MAX_FILES_PER_COMMIT: usize = 8;
/// Visible marker appended when a patch excerpt is cut short. Excerpts are
/// never dropped silently.
pub const TRUNCATION_MARKER: &str = "[... diff truncated ...]";

const INSTRUCTIONS: &str = "\
You are writing a public product changelog entry from a batch of commits.

Output format, exactly:
- A single title line (no heading markers).
- One short narrative paragraph describing what changed for users.
- A section starting with the line \"Impact:\" followed by 1-4 bullets,
  each starting with \"- \".

Rules:
- Plain language. Never mention file paths, function names, or library
  names in the output, even though they appear in the context below.
- Describe outcomes, not implementation.
- Do not invent changes that the commits do not support.";

const GOOD_EXAMPLE: &str = "\
Good example:
Faster project search
Search results now appear as you type, and large projects no longer stall
the results page.
Impact:
- Search results appear up to twice as fast.
- Filtering no longer resets your scroll position.";

const BAD_EXAMPLE: &str = "\
Bad example (do not write like this):
Refactored SearchController.ts and swapped lodash.debounce for a custom
scheduler in utils/timing.ts.";

/// Compose one bounded prompt for `commits` with the desired change type.
pub fn compose_prompt(commits: &[Commit], change_type: ChangeType) -> String {
  let mut out = String::new();

  let _ = writeln!(
    out,
    "{INSTRUCTIONS}\n\nThe changelog's type is \"{}\".\n\n{GOOD_EXAMPLE}\n\n{BAD_EXAMPLE}\n",
    change_type.as_str(),
  );

  out.push_str("\nCommit messages:\n");
  for commit in commits {
    let _ = writeln!(out, "- {}", commit.message.trim());
  }

  let detailed: Vec<&Commit> =
    commits.iter().filter(|c| !c.files.is_empty()).collect();
  if !detailed.is_empty() {
    out.push_str(
      "\nCode changes (context only — never echo identifiers from here):\n",
    );
    for commit in detailed {
      for file in commit.files.iter().take(MAX_FILES_PER_COMMIT) {
        let _ = writeln!(
          out,
          "--- {} (+{} -{})",
          file.path, file.additions, file.deletions,
        );
        out.push_str(&truncate_patch(&file.patch));
        out.push('\n');
      }
    }
  }

  out
}

/// Cut a patch to the per-file budget, marking the cut visibly.
fn truncate_patch(patch: &str) -> String {
  if patch.chars().count() <= PER_FILE_PATCH_BUDGET {
    return patch.to_owned();
  }
  let mut cut: String = patch.chars().take(PER_FILE_PATCH_BUDGET).collect();
  cut.push('\n');
  cut.push_str(TRUNCATION_MARKER);
  cut
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::commit::FileChange;

  fn commit(message: &str) -> Commit {
    Commit::new("abc123", message, Utc::now())
  }

  #[test]
  fn includes_messages_and_examples() {
    let prompt = compose_prompt(
      &[commit("Fix login bug"), commit("Add dark mode")],
      ChangeType::Feature,
    );
    assert!(prompt.contains("- Fix login bug"));
    assert!(prompt.contains("- Add dark mode"));
    assert!(prompt.contains("Good example:"));
    assert!(prompt.contains("Bad example"));
    assert!(prompt.contains("\"feature\""));
  }

  #[test]
  fn long_patches_carry_a_visible_marker() {
    let long_patch = "x".repeat(PER_FILE_PATCH_BUDGET * 3);
    let c = commit("Tune cache").with_files(vec![FileChange {
      path:      "src/cache.rs".into(),
      additions: 10,
      deletions: 2,
      patch:     long_patch,
    }]);
    let prompt = compose_prompt(&[c], ChangeType::Update);
    assert!(prompt.contains(TRUNCATION_MARKER));
    // the excerpt is bounded, not the full patch
    assert!(prompt.len() < PER_FILE_PATCH_BUDGET * 3);
  }

  #[test]
  fn short_patches_are_untouched() {
    let c = commit("Tune cache").with_files(vec![FileChange {
      path:      "src/cache.rs".into(),
      additions: 1,
      deletions: 0,
      patch:     "+let x = 1;".into(),
    }]);
    let prompt = compose_prompt(&[c], ChangeType::Update);
    assert!(prompt.contains("+let x = 1;"));
    assert!(!prompt.contains(TRUNCATION_MARKER));
  }

  #[test]
  fn no_detail_section_without_files() {
    let prompt = compose_prompt(&[commit("Fix login bug")], ChangeType::Fix);
    assert!(!prompt.contains("Code changes"));
  }
}
