//! Prompt construction for quiz generation.
//!
//! The prompt instructs the model to return a raw JSON list with the
//! exact keys [`RawQuestion`](crate::RawQuestion) deserializes, so a
//! well-behaved response parses without any post-processing beyond
//! fence stripping.

use crate::types::QuizRequest;

/// Build the generation prompt for a quiz request.
pub fn quiz_prompt(request: &QuizRequest) -> String {
    format!(
        r#"You are an expert quiz creator. Create a {kind} quiz on the topic: "{topic}".
Difficulty: {difficulty}.
Number of Questions: {count}.

OUTPUT FORMAT:
Return ONLY a raw JSON list of objects. Do NOT use Markdown code blocks (like ```json).
Each object must have exactly these keys:
- "question": The question text
- "options": A list of strings (e.g., ["Option A", "Option B", "Option C", "Option D"] or ["True", "False"])
- "answer": The exact string of the correct option
- "explanation": A short explanation of why it is correct
"#,
        kind = request.kind.label(),
        topic = request.topic,
        difficulty = request.difficulty.directive(),
        count = request.count,
    )
}
