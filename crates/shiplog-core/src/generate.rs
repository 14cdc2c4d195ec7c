//! The `Generator` trait — abstraction over a text-generation capability.
//!
//! Text in, text out. The response carries no structural guarantee and must
//! be treated as untrusted free-form input by the extractor. A failing
//! generator never fails the workflow: callers fall back to
//! [`crate::extract::fallback_entries`].

use std::future::Future;

/// Abstraction over an LLM provider.
pub trait Generator: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Complete `prompt`, producing at most `max_output_tokens` of text.
  fn complete<'a>(
    &'a self,
    prompt: &'a str,
    max_output_tokens: u32,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}
