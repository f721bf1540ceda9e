//! # TabFlow Provider - Gemini
//!
//! Google Gemini backend for tab categorization. One `generateContent` call
//! per attempt, constrained to a JSON response schema so the result can be
//! deserialized without free-form text parsing.

mod categorizer;
mod client;
mod types;

pub use categorizer::{GeminiCategorizer, GeminiOptions};
pub use client::{GeminiClient, DEFAULT_BASE_URL};
pub use types::*;
