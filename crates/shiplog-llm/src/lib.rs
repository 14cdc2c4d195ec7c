//! Anthropic generation adapter for Shiplog.
//!
//! Implements [`shiplog_core::generate::Generator`] against the Anthropic
//! Messages API. Text in, text out — the caller owns prompt composition and
//! response parsing, and falls back locally when this adapter fails.

mod client;

pub mod error;

pub use client::AnthropicGenerator;
pub use error::{Error, Result};
