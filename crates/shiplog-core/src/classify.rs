//! Keyword classification of entry text.
//!
//! Each category is an ordered table of `(keywords, category)` rules matched
//! against the lowercased text; the first rule with any matching keyword
//! wins. The tables are data, not control flow, so every rule is
//! independently testable. Best-effort heuristics only — an author may
//! override every derived field before submission.

use crate::entry::{Component, Impact, Scope};

/// One classification rule: any keyword hit selects `category`.
pub struct Rule<C> {
  pub keywords: &'static [&'static str],
  pub category: C,
}

fn first_match<C: Copy>(rules: &[Rule<C>], lower: &str) -> Option<C> {
  rules
    .iter()
    .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
    .map(|rule| rule.category)
}

// ─── Component ───────────────────────────────────────────────────────────────

/// Priority order matters: authentication outranks security, so text like
/// "enhanced security for login" classifies as authentication.
const COMPONENT_RULES: &[Rule<Component>] = &[
  Rule {
    keywords: &["login", "log in", "sign-in", "signin", "auth", "password", "session", "2fa"],
    category: Component::Authentication,
  },
  Rule {
    keywords: &["security", "vulnerab", "encrypt", "xss", "csrf", "cve"],
    category: Component::Security,
  },
  Rule {
    keywords: &["search", "filter", "autocomplete"],
    category: Component::Search,
  },
  Rule {
    keywords: &["performance", "faster", "latency", "speed", "cache", "optimi"],
    category: Component::Performance,
  },
  Rule {
    keywords: &["notification", "email", "alert", "webhook"],
    category: Component::Notifications,
  },
  Rule {
    keywords: &["payment", "billing", "invoice", "checkout", "subscription"],
    category: Component::Payments,
  },
  Rule {
    keywords: &["ui", "interface", "design", "layout", "theme", "dark mode", "style"],
    category: Component::Ui,
  },
  Rule {
    keywords: &["api", "endpoint", "integration", "sdk"],
    category: Component::Api,
  },
  Rule {
    keywords: &["doc", "readme", "guide", "tutorial"],
    category: Component::Documentation,
  },
];

pub fn detect_component(text: &str) -> Option<Component> {
  first_match(COMPONENT_RULES, &text.to_lowercase())
}

// ─── Scope ───────────────────────────────────────────────────────────────────

const SCOPE_RULES: &[Rule<Scope>] = &[
  Rule {
    keywords: &["database", "schema", "migration", "query", "sql", "index"],
    category: Scope::Database,
  },
  Rule {
    keywords: &["deploy", "docker", "kubernetes", "pipeline", "ci/cd", "infrastructure"],
    category: Scope::Infrastructure,
  },
  Rule {
    keywords: &["frontend", "ui", "page", "button", "screen", "css", "layout", "component"],
    category: Scope::Frontend,
  },
  Rule {
    keywords: &["backend", "server", "api", "endpoint", "service", "handler"],
    category: Scope::Backend,
  },
];

pub fn detect_scope(text: &str) -> Option<Scope> {
  first_match(SCOPE_RULES, &text.to_lowercase())
}

// ─── Impact ──────────────────────────────────────────────────────────────────

const IMPACT_RULES: &[Rule<Impact>] = &[
  Rule {
    keywords: &["breaking", "major", "overhaul", "redesign", "remove", "deprecat"],
    category: Impact::Major,
  },
  Rule {
    keywords: &["fix", "patch", "typo", "hotfix", "bug"],
    category: Impact::Patch,
  },
];

/// Defaults to [`Impact::Minor`] when no rule matches.
pub fn detect_impact(text: &str) -> Impact {
  first_match(IMPACT_RULES, &text.to_lowercase()).unwrap_or_default()
}

// ─── Audience flags ──────────────────────────────────────────────────────────

const TECHNICAL_KEYWORDS: &[&str] = &[
  "refactor",
  "dependency",
  "dependencies",
  "internal",
  "ci ",
  "build system",
  "tooling",
  "lint",
];

/// Whether an entry reads as a technical (developer-facing) change.
pub fn is_technical(text: &str) -> bool {
  let lower = text.to_lowercase();
  TECHNICAL_KEYWORDS.iter().any(|k| lower.contains(k))
}
