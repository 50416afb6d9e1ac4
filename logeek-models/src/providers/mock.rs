//! Mock question generator for testing.
//!
//! MockGenerator allows scripting generation outcomes for unit tests,
//! enabling fast, deterministic testing of session logic without
//! network access.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::QuestionGenerator;
use crate::error::GenerateError;
use crate::types::{QuizRequest, RawQuestion};

/// Scriptable implementation of [`QuestionGenerator`].
///
/// Queue outcomes with [`queue_questions`](Self::queue_questions) or
/// [`queue_error`](Self::queue_error) before calling `generate()`.
/// Each `generate()` consumes one queued outcome; calling with an empty
/// queue returns [`GenerateError::Request`].
pub struct MockGenerator {
    outcomes: Mutex<VecDeque<Result<Vec<RawQuestion>, GenerateError>>>,
}

impl MockGenerator {
    /// Create a mock with an empty outcome queue.
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue a successful generation outcome.
    pub fn queue_questions(&self, questions: Vec<RawQuestion>) {
        self.outcomes.lock().unwrap().push_back(Ok(questions));
    }

    /// Queue a failed generation outcome.
    pub fn queue_error(&self, error: GenerateError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    /// Number of outcomes still queued.
    pub fn queued_count(&self) -> usize {
        self.outcomes.lock().unwrap().len()
    }

    /// Build a simple n-question quiz where question `i` is
    /// "Question i?" with options ["A", "B"] and answer "A".
    pub fn canned_questions(count: usize) -> Vec<RawQuestion> {
        (0..count)
            .map(|i| RawQuestion {
                question: format!("Question {i}?"),
                options: vec!["A".to_string(), "B".to_string()],
                answer: "A".to_string(),
                explanation: format!("Explanation {i}."),
            })
            .collect()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, _request: &QuizRequest) -> Result<Vec<RawQuestion>, GenerateError> {
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(GenerateError::Request(
                    "no queued outcome in MockGenerator".to_string(),
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Queue Tests ====================

    #[tokio::test]
    async fn generate_returns_queued_questions() {
        let generator = MockGenerator::new();
        generator.queue_questions(MockGenerator::canned_questions(3));

        let questions = generator
            .generate(&QuizRequest::new("anything", 3))
            .await
            .unwrap();

        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].answer, "A");
    }

    #[tokio::test]
    async fn generate_returns_queued_error() {
        let generator = MockGenerator::new();
        generator.queue_error(GenerateError::QuotaExceeded);

        let result = generator.generate(&QuizRequest::new("anything", 5)).await;
        assert!(matches!(result, Err(GenerateError::QuotaExceeded)));
    }

    #[tokio::test]
    async fn generate_consumes_outcomes_in_order() {
        let generator = MockGenerator::new();
        generator.queue_questions(MockGenerator::canned_questions(1));
        generator.queue_error(GenerateError::Unavailable("busy".to_string()));

        assert_eq!(generator.queued_count(), 2);

        let first = generator.generate(&QuizRequest::new("t", 1)).await;
        assert!(first.is_ok());

        let second = generator.generate(&QuizRequest::new("t", 1)).await;
        assert!(matches!(second, Err(GenerateError::Unavailable(_))));

        assert_eq!(generator.queued_count(), 0);
    }

    #[tokio::test]
    async fn generate_with_empty_queue_errors() {
        let generator = MockGenerator::new();
        let result = generator.generate(&QuizRequest::new("t", 1)).await;
        assert!(matches!(result, Err(GenerateError::Request(_))));
    }

    #[test]
    fn canned_questions_are_valid() {
        for q in MockGenerator::canned_questions(5) {
            q.validate().unwrap();
        }
    }
}
