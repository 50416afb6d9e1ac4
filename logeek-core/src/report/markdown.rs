//! Markdown report formatter.

use std::fmt::Write;

use super::{ReportFormatter, SessionSummary};
use crate::error::ReportError;

/// Default formatter producing a Markdown document.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Create a Markdown formatter.
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn format(&self, summary: &SessionSummary) -> Result<Vec<u8>, ReportError> {
        // Writing into a String cannot fail; map the fmt error anyway to
        // keep the trait contract honest.
        let mut doc = String::new();
        (|| -> std::fmt::Result {
            writeln!(doc, "# Quiz Results: {}\n", summary.topic)?;
            writeln!(
                doc,
                "Final Score: {}/{} ({:.0}%) - Grade {} ({})\n",
                summary.score,
                summary.total,
                summary.percentage,
                summary.letter.as_str(),
                summary.remark
            )?;

            for (i, item) in summary.items.iter().enumerate() {
                writeln!(doc, "## Q{}: {}\n", i + 1, item.question)?;
                match &item.selected {
                    Some(selected) => writeln!(doc, "Your Answer: {selected}\n")?,
                    None => writeln!(doc, "Your Answer: (unanswered)\n")?,
                }
                writeln!(doc, "Correct Answer: {}\n", item.correct_answer)?;
                writeln!(doc, "Explanation: {}\n\n---\n", item.explanation)?;
            }
            Ok(())
        })()
        .map_err(|e| ReportError::Format(e.to_string()))?;

        Ok(doc.into_bytes())
    }
}
