//! Core domain logic for LogeekMind assessments.
//!
//! This crate owns the timed assessment lifecycle end to end:
//!
//! - [`config`] - application limits and the per-session setup form
//! - [`quota`] - guest usage metering with authenticated bypass
//! - [`assessment`] - the session state machine, grader, and the
//!   [`SessionOrchestrator`] that drives one caller's sessions
//! - [`perflog`] - fire-and-forget performance record sinks
//! - [`report`] - downloadable result documents
//! - [`events`] - session lifecycle events for UI shells and tests
//!
//! Question generation lives in `logeek-models`; this crate consumes it
//! through the [`QuestionGenerator`](logeek_models::QuestionGenerator)
//! trait so any provider (or a scripted mock) can slot in.
//!
//! # Architecture
//!
//! ```text
//! setup form ──> SessionOrchestrator ──> QuestionGenerator
//!                      │                      (logeek-models)
//!                      ├── GuestQuota (gate before generation)
//!                      ├── AssessmentSession (Setup -> Active -> Finished)
//!                      ├── grader (score, percentage, letter)
//!                      ├── PerformanceSink (fire-and-forget append)
//!                      ├── ReportFormatter (download bytes)
//!                      └── EventBus (lifecycle events)
//! ```
//!
//! Sessions are single-owner values mutated through run-to-completion
//! steps; wall-clock time is passed in explicitly so every deadline
//! behavior is testable without sleeping.

pub mod assessment;
pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod perflog;
pub mod quota;
pub mod report;

pub use assessment::{
    AssessmentSession, GradeReport, LetterGrade, QuestionItem, SessionOrchestrator, Stage,
    spawn_expiry_poller,
};
pub use auth::CallerIdentity;
pub use config::{AssessmentConfig, AssessmentLimits};
pub use error::{LogeekError, ReportError, SessionError, SinkError, StartError};
pub use events::{EventBus, EventSeq, MemoryEventBus, MindEvent};
pub use perflog::{MemorySink, PerformanceRecord, PerformanceSink, RestSink};
pub use quota::GuestQuota;
pub use report::{MarkdownFormatter, ReportFormatter, SessionSummary};
