//! Google Gemini LLM provider implementation.
//!
//! [`GeminiProvider`] implements the `LlmProvider` trait for the
//! `generateContent` endpoint of the Generative Language API.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
