//! Request and wire types for question generation.

use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// Kind of question to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Four-option multiple choice
    #[default]
    MultipleChoice,
    /// True/False
    TrueFalse,
}

impl QuestionKind {
    /// Human-readable label used in prompts
    pub fn label(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "Multiple Choice",
            Self::TrueFalse => "True/False",
        }
    }
}

/// Difficulty level on a 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Introductory,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Parse from the 1-5 slider value used by the UI shell
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Introductory),
            2 => Some(Self::Beginner),
            3 => Some(Self::Intermediate),
            4 => Some(Self::Advanced),
            5 => Some(Self::Expert),
            _ => None,
        }
    }

    /// Directive word inserted into the generation prompt
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Introductory => "introductory",
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Intermediate
    }
}

/// A request for a batch of quiz questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRequest {
    /// Topic to quiz on (e.g., "Newton's Laws of Motion")
    pub topic: String,
    /// Number of questions to generate
    pub count: usize,
    /// Question format
    #[serde(default)]
    pub kind: QuestionKind,
    /// Difficulty directive
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl QuizRequest {
    /// Create a request with the default kind and difficulty
    pub fn new(topic: impl Into<String>, count: usize) -> Self {
        Self {
            topic: topic.into(),
            count,
            kind: QuestionKind::default(),
            difficulty: Difficulty::default(),
        }
    }

    /// Set the question kind
    pub fn with_kind(mut self, kind: QuestionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the difficulty
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }
}

/// One question as produced by the generator, using the wire keys the
/// prompt asks for.
///
/// Deserialization is strict: unknown or missing fields reject the whole
/// payload rather than being accessed optimistically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawQuestion {
    /// The question text
    pub question: String,
    /// Candidate answers in display order
    pub options: Vec<String>,
    /// The exact string of the correct option
    pub answer: String,
    /// Short explanation of why the answer is correct
    pub explanation: String,
}

impl RawQuestion {
    /// Validate the semantic invariants serde cannot express: at least
    /// two options, and the answer must be one of them.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.options.len() < 2 {
            return Err(GenerateError::Malformed(format!(
                "question \"{}\" has {} option(s), need at least 2",
                self.question,
                self.options.len()
            )));
        }
        if !self.options.iter().any(|o| o == &self.answer) {
            return Err(GenerateError::Malformed(format!(
                "answer \"{}\" is not among the options for \"{}\"",
                self.answer, self.question
            )));
        }
        Ok(())
    }
}

/// Parse a raw generator payload into validated questions.
///
/// Strips stray Markdown code fences first (models sometimes wrap the
/// JSON despite the prompt), then requires a non-empty list where every
/// entry passes [`RawQuestion::validate`].
pub fn parse_questions(payload: &str) -> Result<Vec<RawQuestion>, GenerateError> {
    let cleaned = payload
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string();

    let questions: Vec<RawQuestion> = serde_json::from_str(&cleaned)
        .map_err(|e| GenerateError::Malformed(format!("invalid JSON: {e}")))?;

    if questions.is_empty() {
        return Err(GenerateError::Malformed(
            "generator returned an empty question list".to_string(),
        ));
    }

    for q in &questions {
        q.validate()?;
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"[
            {
                "question": "What is 2 + 2?",
                "options": ["3", "4", "5"],
                "answer": "4",
                "explanation": "Basic addition."
            }
        ]"#
    }

    // ==================== Difficulty Tests ====================

    #[test]
    fn difficulty_from_level_maps_all_five() {
        assert_eq!(Difficulty::from_level(1), Some(Difficulty::Introductory));
        assert_eq!(Difficulty::from_level(3), Some(Difficulty::Intermediate));
        assert_eq!(Difficulty::from_level(5), Some(Difficulty::Expert));
        assert_eq!(Difficulty::from_level(0), None);
        assert_eq!(Difficulty::from_level(6), None);
    }

    #[test]
    fn difficulty_directive_matches_prompt_vocabulary() {
        assert_eq!(Difficulty::Introductory.directive(), "introductory");
        assert_eq!(Difficulty::Expert.directive(), "expert");
    }

    // ==================== QuizRequest Tests ====================

    #[test]
    fn quiz_request_builder_sets_fields() {
        let request = QuizRequest::new("Photosynthesis", 10)
            .with_kind(QuestionKind::TrueFalse)
            .with_difficulty(Difficulty::Advanced);

        assert_eq!(request.topic, "Photosynthesis");
        assert_eq!(request.count, 10);
        assert_eq!(request.kind, QuestionKind::TrueFalse);
        assert_eq!(request.difficulty, Difficulty::Advanced);
    }

    // ==================== Parsing Tests ====================

    #[test]
    fn parse_questions_accepts_valid_payload() {
        let questions = parse_questions(sample_json()).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answer, "4");
    }

    #[test]
    fn parse_questions_strips_markdown_fences() {
        let fenced = format!("```json\n{}\n```", sample_json());
        let questions = parse_questions(&fenced).unwrap();
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn parse_questions_rejects_invalid_json() {
        let result = parse_questions("not json at all");
        assert!(matches!(result, Err(GenerateError::Malformed(_))));
    }

    #[test]
    fn parse_questions_rejects_empty_list() {
        let result = parse_questions("[]");
        assert!(matches!(result, Err(GenerateError::Malformed(_))));
    }

    #[test]
    fn parse_questions_rejects_missing_field() {
        let payload = r#"[{"question": "Q?", "options": ["a", "b"], "answer": "a"}]"#;
        let result = parse_questions(payload);
        assert!(matches!(result, Err(GenerateError::Malformed(_))));
    }

    #[test]
    fn parse_questions_rejects_unknown_field() {
        let payload = r#"[{
            "question": "Q?",
            "options": ["a", "b"],
            "answer": "a",
            "explanation": "because",
            "hint": "extra"
        }]"#;
        let result = parse_questions(payload);
        assert!(matches!(result, Err(GenerateError::Malformed(_))));
    }

    #[test]
    fn validate_rejects_answer_not_in_options() {
        let q = RawQuestion {
            question: "Pick one".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            answer: "c".to_string(),
            explanation: "oops".to_string(),
        };
        assert!(matches!(q.validate(), Err(GenerateError::Malformed(_))));
    }

    #[test]
    fn validate_rejects_single_option() {
        let q = RawQuestion {
            question: "Pick one".to_string(),
            options: vec!["a".to_string()],
            answer: "a".to_string(),
            explanation: "too few".to_string(),
        };
        assert!(matches!(q.validate(), Err(GenerateError::Malformed(_))));
    }

    #[test]
    fn raw_question_serialization_roundtrip() {
        let q = RawQuestion {
            question: "What is 2 + 2?".to_string(),
            options: vec!["3".to_string(), "4".to_string()],
            answer: "4".to_string(),
            explanation: "Basic addition.".to_string(),
        };
        let json = serde_json::to_string(&q).unwrap();
        let parsed: RawQuestion = serde_json::from_str(&json).unwrap();
        assert_eq!(q, parsed);
    }
}
