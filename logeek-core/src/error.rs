//! Error types for logeek-core.

use thiserror::Error;

use logeek_models::GenerateError;

/// Top-level error type for logeek-core.
#[derive(Error, Debug)]
pub enum LogeekError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Start error: {0}")]
    Start(#[from] StartError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Errors from assessment session state handling.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid stage: expected {expected}, got {actual}")]
    InvalidStage { expected: String, actual: String },

    #[error("Question index {index} out of range (session has {total} questions)")]
    IndexOutOfRange { index: usize, total: usize },

    #[error("\"{option}\" is not an option for question {index}")]
    UnknownOption { index: usize, option: String },

    #[error("Session has no questions")]
    NoItems,

    #[error("Invalid question item: {reason}")]
    InvalidItem { reason: String },
}

/// Errors surfaced when starting an assessment.
///
/// Every generator failure is already classified by the time it appears
/// here; the state machine never observes an unclassified error.
#[derive(Error, Debug)]
pub enum StartError {
    /// Guest usage limit reached. Surfaced as a sign-up call-to-action.
    #[error("You have reached the free limit for {feature} as a guest. Sign up for a free account to use this feature without limits!")]
    QuotaDenied { feature: String, limit: u32 },

    /// A generation request is already in flight for this session.
    #[error("A question generation request is already in progress")]
    GenerationInFlight,

    /// The session has already left Setup.
    #[error("Assessment already started")]
    AlreadyStarted,

    /// Configuration rejected before any collaborator was called.
    #[error("Invalid assessment configuration: {0}")]
    InvalidConfig(String),

    /// The content generator failed; the session remains in Setup.
    #[error(transparent)]
    Generation(#[from] GenerateError),
}

impl StartError {
    /// Extra guidance to show alongside the error, when the failure is
    /// generation-related and likely to recur.
    pub fn user_hint(&self) -> Option<&'static str> {
        match self {
            StartError::Generation(GenerateError::Unavailable(_))
            | StartError::Generation(GenerateError::QuotaExceeded) => Some(
                "In the meantime, you can try the non-AI features: \
                 GPA Calculator, Study Scheduler, Lecture Note-to-Audio Converter, \
                 Lecture Audio-to-Text Converter.",
            ),
            _ => None,
        }
    }
}

/// Errors from the performance log sink.
///
/// These are logged and dropped by the orchestrator; a Finished session
/// and its report never depend on the sink.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Performance log request failed: {0}")]
    Request(String),

    #[error("Performance log rejected the record: HTTP {status}")]
    Rejected { status: u16 },
}

/// Errors from report generation.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Report is only available for a finished assessment")]
    NotFinished,

    #[error("Failed to format report: {0}")]
    Format(String),
}
