//! Question generator trait and implementations.
//!
//! The [`QuestionGenerator`] trait is the seam between the assessment
//! core and whatever produces questions: a hosted LLM, a local model,
//! or a scripted mock in tests.
//!
//! # Example
//!
//! ```ignore
//! use logeek_models::{QuestionGenerator, QuizRequest};
//!
//! async fn make_quiz(generator: &dyn QuestionGenerator) {
//!     let request = QuizRequest::new("Newton's Laws of Motion", 5);
//!     let questions = generator.generate(&request).await?;
//! }
//! ```

mod gemini;
mod mock;

use async_trait::async_trait;

pub use gemini::GeminiGenerator;
pub use mock::MockGenerator;

use crate::error::GenerateError;
use crate::types::{QuizRequest, RawQuestion};

/// Trait for question sources.
///
/// Implementations must classify every failure into a
/// [`GenerateError`] kind; callers never see transport details.
/// A successful return is always a non-empty list of questions that
/// passed [`RawQuestion::validate`].
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Returns the generator name (e.g., "gemini", "mock").
    fn name(&self) -> &str;

    /// Generate a batch of questions for the given request.
    async fn generate(&self, request: &QuizRequest) -> Result<Vec<RawQuestion>, GenerateError>;
}
