//! Question items.

use serde::{Deserialize, Serialize};

use logeek_models::RawQuestion;

use crate::error::SessionError;

/// One question with its options, correct answer, and explanation.
///
/// Immutable once built; owned exclusively by the session that
/// requested it. The constructor enforces the invariants the wire
/// format cannot: at least two options, correct answer among them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionItem {
    prompt: String,
    options: Vec<String>,
    correct_option: String,
    explanation: String,
}

impl QuestionItem {
    /// Build a validated question item.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let prompt = prompt.into();
        let correct_option = correct_option.into();

        if options.len() < 2 {
            return Err(SessionError::InvalidItem {
                reason: format!("\"{prompt}\" needs at least 2 options"),
            });
        }
        if !options.iter().any(|o| o == &correct_option) {
            return Err(SessionError::InvalidItem {
                reason: format!("correct option \"{correct_option}\" is not among the options"),
            });
        }

        Ok(Self {
            prompt,
            options,
            correct_option,
            explanation: explanation.into(),
        })
    }

    /// The question text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Candidate answers in display order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The correct option (exact string match against `options`).
    pub fn correct_option(&self) -> &str {
        &self.correct_option
    }

    /// Rationale shown after grading.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Whether the given selection is this item's correct option.
    pub fn is_correct(&self, selection: &str) -> bool {
        selection == self.correct_option
    }
}

impl TryFrom<RawQuestion> for QuestionItem {
    type Error = SessionError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        Self::new(raw.question, raw.options, raw.answer, raw.explanation)
    }
}
