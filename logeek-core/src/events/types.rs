//! Event type definitions.

use serde::{Deserialize, Serialize};

use crate::assessment::{LetterGrade, Stage};

/// Events emitted by the session orchestrator.
///
/// The surrounding application shell subscribes to these to drive its
/// rendering; the core never reads them back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MindEvent {
    /// The session moved to a new lifecycle stage
    StageChanged { session_id: String, stage: Stage },

    /// An answer was recorded for a question
    AnswerRecorded { session_id: String, index: usize },

    /// The session was graded
    Graded {
        session_id: String,
        score: usize,
        total: usize,
        letter: LetterGrade,
    },

    /// A generation attempt failed; the session stayed in Setup
    GenerationFailed { session_id: String, reason: String },

    /// A performance record was appended to the external log
    PerformanceLogged { session_id: String, feature: String },
}

impl MindEvent {
    /// The session this event belongs to.
    pub fn session_id(&self) -> &str {
        match self {
            Self::StageChanged { session_id, .. }
            | Self::AnswerRecorded { session_id, .. }
            | Self::Graded { session_id, .. }
            | Self::GenerationFailed { session_id, .. }
            | Self::PerformanceLogged { session_id, .. } => session_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_extracted_from_every_variant() {
        let events = vec![
            MindEvent::StageChanged {
                session_id: "s1".to_string(),
                stage: Stage::Active,
            },
            MindEvent::AnswerRecorded {
                session_id: "s1".to_string(),
                index: 2,
            },
            MindEvent::Graded {
                session_id: "s1".to_string(),
                score: 4,
                total: 5,
                letter: LetterGrade::A,
            },
            MindEvent::GenerationFailed {
                session_id: "s1".to_string(),
                reason: "busy".to_string(),
            },
            MindEvent::PerformanceLogged {
                session_id: "s1".to_string(),
                feature: "smart_quiz".to_string(),
            },
        ];

        for event in events {
            assert_eq!(event.session_id(), "s1");
        }
    }

    #[test]
    fn event_serialization_roundtrip() {
        let event = MindEvent::Graded {
            session_id: "s1".to_string(),
            score: 4,
            total: 5,
            letter: LetterGrade::A,
        };

        let json = serde_json::to_string(&event).unwrap();
        let parsed: MindEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }

    #[test]
    fn events_use_snake_case_tags() {
        let event = MindEvent::StageChanged {
            session_id: "s1".to_string(),
            stage: Stage::Finished,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"stage_changed\""));
        assert!(json.contains("\"finished\""));
    }
}
