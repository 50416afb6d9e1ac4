//! Question generation for LogeekMind.
//!
//! This crate provides:
//! - The [`QuestionGenerator`] trait for pluggable question sources
//! - A Gemini-backed generator for production use
//! - A scriptable mock generator for tests
//! - Strict, fail-closed parsing of generator output
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                QuestionGenerator                     │
//! │     ┌──────────────────┐  ┌──────────────────┐      │
//! │     │ GeminiGenerator  │  │  MockGenerator   │      │
//! │     │  (reqwest/HTTP)  │  │   (scripted)     │      │
//! │     └──────────────────┘  └──────────────────┘      │
//! └─────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//!              parse_questions (strict serde)
//! ```

mod error;
mod types;

pub mod prompt;
pub mod providers;

pub use error::{GenerateError, Result};
pub use providers::{GeminiGenerator, MockGenerator, QuestionGenerator};
pub use types::{Difficulty, QuestionKind, QuizRequest, RawQuestion, parse_questions};
