//! Assessment session state machine.
//!
//! A session moves Setup -> Active -> Finished and never backward.
//! Time is passed in explicitly at every observation, so the soft
//! deadline can be tested without sleeping; the orchestrator supplies
//! wall-clock time in production.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AssessmentConfig;
use crate::error::SessionError;

use super::grader::{self, GradeReport};
use super::item::QuestionItem;

/// Lifecycle phase of an assessment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Collecting configuration; no questions committed yet
    Setup,
    /// Questions committed, timer running, answers accepted
    Active,
    /// Graded; immutable
    Finished,
}

impl Stage {
    /// Display name used in errors and events
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "Setup",
            Self::Active => "Active",
            Self::Finished => "Finished",
        }
    }
}

/// One timed assessment from configuration to grading.
///
/// Owned by a [`SessionOrchestrator`](crate::SessionOrchestrator) and
/// mutated only through it in production; every transition is a
/// run-to-completion step, so no internal locking is needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSession {
    id: String,
    config: AssessmentConfig,
    stage: Stage,
    items: Vec<QuestionItem>,
    answers: BTreeMap<usize, String>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    grade: Option<GradeReport>,
}

impl AssessmentSession {
    /// Create a fresh session in the Setup stage.
    pub fn new(config: AssessmentConfig) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            config,
            stage: Stage::Setup,
            items: Vec::new(),
            answers: BTreeMap::new(),
            started_at: None,
            finished_at: None,
            grade: None,
        }
    }

    /// Unique session identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The configuration this session was created with.
    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Current lifecycle stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Committed questions (empty until Active).
    pub fn items(&self) -> &[QuestionItem] {
        &self.items
    }

    /// Recorded answers by question index.
    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    /// When the Setup -> Active transition happened.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// The grade, available once Finished.
    pub fn grade_report(&self) -> Option<&GradeReport> {
        self.grade.as_ref()
    }

    /// Commit generated questions and start the timer (Setup -> Active).
    ///
    /// This is the single atomic step around generation: the caller
    /// only invokes it with a fully validated item set, so either the
    /// session transitions completely or not at all.
    pub fn activate(
        &mut self,
        items: Vec<QuestionItem>,
        now: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.stage != Stage::Setup {
            return Err(SessionError::InvalidStage {
                expected: Stage::Setup.as_str().to_string(),
                actual: self.stage.as_str().to_string(),
            });
        }
        if items.is_empty() {
            return Err(SessionError::NoItems);
        }

        self.items = items;
        self.started_at = Some(now);
        self.stage = Stage::Active;
        Ok(())
    }

    /// Record (or overwrite) the answer for a question.
    ///
    /// The selection must be one of the question's own options.
    pub fn select_answer(&mut self, index: usize, option: &str) -> Result<(), SessionError> {
        if self.stage != Stage::Active {
            return Err(SessionError::InvalidStage {
                expected: Stage::Active.as_str().to_string(),
                actual: self.stage.as_str().to_string(),
            });
        }

        let item = self
            .items
            .get(index)
            .ok_or(SessionError::IndexOutOfRange {
                index,
                total: self.items.len(),
            })?;

        if !item.options().iter().any(|o| o == option) {
            return Err(SessionError::UnknownOption {
                index,
                option: option.to_string(),
            });
        }

        self.answers.insert(index, option.to_string());
        Ok(())
    }

    /// Seconds left on the exam clock, clamped at zero.
    ///
    /// None while the timer is not running (Setup) or already stopped
    /// (Finished).
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> Option<i64> {
        if self.stage != Stage::Active {
            return None;
        }
        let started = self.started_at?;
        let elapsed = (now - started).num_seconds();
        Some((self.config.duration_seconds as i64 - elapsed).max(0))
    }

    /// True when the timer has run out.
    fn expired(&self, now: DateTime<Utc>) -> bool {
        match (self.stage, self.started_at) {
            (Stage::Active, Some(started)) => {
                (now - started).num_seconds() >= self.config.duration_seconds as i64
            }
            _ => false,
        }
    }

    /// (answered, total) question counts.
    pub fn progress(&self) -> (usize, usize) {
        (self.answers.len(), self.items.len())
    }

    /// Submit the assessment for grading (Active -> Finished).
    ///
    /// Grading runs exactly once; a submit on an already Finished
    /// session is a no-op that returns the existing report. Submitting
    /// from Setup is an error.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<&GradeReport, SessionError> {
        match self.stage {
            Stage::Finished => {}
            Stage::Active => {
                let report = grader::grade(&self.items, &self.answers);
                self.grade = Some(report);
                self.finished_at = Some(now);
                self.stage = Stage::Finished;
            }
            Stage::Setup => {
                return Err(SessionError::InvalidStage {
                    expected: Stage::Active.as_str().to_string(),
                    actual: Stage::Setup.as_str().to_string(),
                });
            }
        }

        // Set on every path that reaches here
        self.grade.as_ref().ok_or(SessionError::NoItems)
    }

    /// Poll the soft deadline, auto-submitting on expiry.
    ///
    /// Returns the stage after the observation. Callers must apply any
    /// pending answer-selection event from the same step before calling
    /// this, so a last-moment answer is never lost.
    pub fn observe(&mut self, now: DateTime<Utc>) -> Stage {
        if self.expired(now) {
            // Cannot fail: expiry only fires from Active
            let _ = self.submit(now);
        }
        self.stage
    }
}
