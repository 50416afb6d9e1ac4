//! Timed assessment lifecycle: questions, session state, grading, and
//! the orchestrator that drives them.

mod grader;
mod item;
mod orchestrator;
mod session;

pub use grader::{GradeReport, LetterGrade, grade};
pub use item::QuestionItem;
pub use orchestrator::{SessionOrchestrator, spawn_expiry_poller};
pub use session::{AssessmentSession, Stage};
