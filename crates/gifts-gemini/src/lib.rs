//! Gifts Gemini: narrative enrichment over the Generative Language API.
//!
//! Implements `gifts_core::narrative::NarrativeClient` by asking a Gemini
//! model for a structured JSON write-up of a single category.

pub mod client;
pub mod wire;

pub use client::{GeminiConfig, GeminiNarrativeClient};
