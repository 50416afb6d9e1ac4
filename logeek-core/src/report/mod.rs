//! Downloadable assessment reports.
//!
//! A finished session is flattened into a [`SessionSummary`] and handed
//! to a [`ReportFormatter`], which produces the document bytes the UI
//! shell offers for download. The default formatter emits Markdown; the
//! trait seam lets a richer format (DOCX, PDF) slot in without touching
//! the session logic.

mod markdown;

use serde::{Deserialize, Serialize};

pub use markdown::MarkdownFormatter;

use crate::assessment::{AssessmentSession, LetterGrade};
use crate::error::ReportError;

/// One question block in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
    /// The question text
    pub question: String,
    /// What the user selected, if anything
    pub selected: Option<String>,
    /// The correct option
    pub correct_answer: String,
    /// Rationale for the correct option
    pub explanation: String,
}

/// Everything a report needs from a finished session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Topic the assessment covered
    pub topic: String,
    /// Correctly answered questions
    pub score: usize,
    /// Total questions
    pub total: usize,
    /// 100 * score / total
    pub percentage: f64,
    /// Letter classification
    pub letter: LetterGrade,
    /// Fixed remark for the letter
    pub remark: String,
    /// One block per question, in display order
    pub items: Vec<ItemSummary>,
}

impl SessionSummary {
    /// Build a summary from a session.
    ///
    /// Fails with [`ReportError::NotFinished`] until the session has
    /// been graded.
    pub fn from_session(session: &AssessmentSession) -> Result<Self, ReportError> {
        let report = session.grade_report().ok_or(ReportError::NotFinished)?;

        let items = session
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| ItemSummary {
                question: item.prompt().to_string(),
                selected: session.answers().get(&i).cloned(),
                correct_answer: item.correct_option().to_string(),
                explanation: item.explanation().to_string(),
            })
            .collect();

        Ok(Self {
            topic: session.config().topic.clone(),
            score: report.score,
            total: report.total,
            percentage: report.percentage,
            letter: report.letter,
            remark: report.remark().to_string(),
            items,
        })
    }
}

/// Trait for report document formatters.
pub trait ReportFormatter: Send + Sync {
    /// File extension for the produced document (e.g., "md").
    fn extension(&self) -> &'static str;

    /// Render the summary into document bytes.
    fn format(&self, summary: &SessionSummary) -> Result<Vec<u8>, ReportError>;
}
