//! Entry extraction — turns untrusted model output into ordered entry
//! drafts, and provides the fixed fallback set used when the generation
//! capability is down.

use crate::{
  classify::{detect_component, detect_impact, detect_scope, is_technical},
  entry::EntryDraft,
};

/// Marker embedded in fallback entry text so logs can tell placeholder
/// output from real model output.
pub const FALLBACK_MARKER: &str = "[offline draft]";

/// Parse a raw model response into ordered entry drafts.
///
/// Two shapes are recognised:
/// - A flat bullet list (every non-blank line starts with a bullet marker):
///   split per line, strip surrounding quotes, normalise to a single `- `
///   bullet.
/// - Anything else is treated as one structured block (title + narrative +
///   impact bullets) and becomes a single entry, unsplit.
///
/// An empty response yields an empty vector; the caller decides whether to
/// fall back.
pub fn extract_entries(response: &str) -> Vec<EntryDraft> {
  let trimmed = response.trim();
  if trimmed.is_empty() {
    return Vec::new();
  }

  let lines: Vec<&str> = trimmed
    .lines()
    .map(str::trim)
    .filter(|l| !l.is_empty())
    .collect();

  if lines.iter().all(|l| is_bullet_line(l)) {
    return lines
      .into_iter()
      .map(|l| draft_from(normalize_bullet(l)))
      .collect();
  }

  vec![draft_from(trimmed.to_owned())]
}

/// The fixed placeholder set used when the generator is unavailable. Always
/// non-empty, always visibly marked.
pub fn fallback_entries() -> Vec<EntryDraft> {
  vec![
    draft_from(format!(
      "- General improvements and updates across the product {FALLBACK_MARKER}"
    )),
    draft_from(format!(
      "- Reliability fixes and maintenance {FALLBACK_MARKER}"
    )),
  ]
}

/// Whether a draft came from the fallback set rather than model output.
pub fn is_fallback(draft: &EntryDraft) -> bool {
  draft.content.contains(FALLBACK_MARKER)
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn strip_quotes(line: &str) -> &str {
  line
    .trim()
    .trim_start_matches(['"', '\'', '“', '‘'])
    .trim_end_matches(['"', '\'', '”', '’'])
    .trim()
}

fn is_bullet_line(line: &str) -> bool {
  strip_quotes(line).starts_with(['-', '*', '•'])
}

fn normalize_bullet(line: &str) -> String {
  let body = strip_quotes(line)
    .trim_start_matches(['-', '*', '•'])
    .trim();
  format!("- {body}")
}

fn draft_from(content: String) -> EntryDraft {
  let component = detect_component(&content);
  let scope = detect_scope(&content);
  let impact = detect_impact(&content);
  let technical = is_technical(&content);

  let mut labels: Vec<String> = Vec::new();
  if let Some(c) = component {
    labels.push(c.as_str().to_owned());
  }
  if let Some(s) = scope {
    labels.push(s.as_str().to_owned());
  }
  labels.push(impact.as_str().to_owned());

  EntryDraft {
    content,
    component,
    scope,
    impact,
    labels,
    user_facing: !technical,
    technical,
  }
}
