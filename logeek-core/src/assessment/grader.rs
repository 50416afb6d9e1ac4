//! Scoring and letter grades.
//!
//! Pure functions over a completed answer sheet. Unanswered questions
//! count as incorrect, never as a separate bucket.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::item::QuestionItem;

/// Coarse A-F classification of a percentage score.
///
/// Thresholds use inclusive lower bounds: >=70 A, [60,70) B, [50,60) C,
/// [45,50) D, [40,45) E, <40 F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl LetterGrade {
    /// Classify a percentage score.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 70.0 {
            Self::A
        } else if percentage >= 60.0 {
            Self::B
        } else if percentage >= 50.0 {
            Self::C
        } else if percentage >= 45.0 {
            Self::D
        } else if percentage >= 40.0 {
            Self::E
        } else {
            Self::F
        }
    }

    /// Fixed remark shown with the grade.
    pub fn remark(&self) -> &'static str {
        match self {
            Self::A => "Excellent",
            Self::B => "Very Good",
            Self::C => "Good",
            Self::D => "Fair",
            Self::E => "Pass",
            Self::F => "Fail",
        }
    }

    /// Single-letter display form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
        }
    }
}

/// Result of grading a completed assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    /// Number of correctly answered questions
    pub score: usize,
    /// Total number of questions
    pub total: usize,
    /// 100 * score / total
    pub percentage: f64,
    /// Letter classification of the percentage
    pub letter: LetterGrade,
}

impl GradeReport {
    /// Fixed remark for the letter grade.
    pub fn remark(&self) -> &'static str {
        self.letter.remark()
    }
}

/// Grade an answer sheet against the items' answer keys.
///
/// An index absent from `answers` never counts as correct. `items` must
/// be non-empty; the session state machine guarantees this (zero
/// generated items is treated as a generation failure upstream).
pub fn grade(items: &[QuestionItem], answers: &BTreeMap<usize, String>) -> GradeReport {
    debug_assert!(!items.is_empty(), "grading requires at least one item");

    let score = items
        .iter()
        .enumerate()
        .filter(|(i, item)| {
            answers
                .get(i)
                .is_some_and(|selected| item.is_correct(selected))
        })
        .count();

    let total = items.len();
    let percentage = 100.0 * score as f64 / total as f64;

    GradeReport {
        score,
        total,
        percentage,
        letter: LetterGrade::from_percentage(percentage),
    }
}
