//! Assessment configuration and limits.
//!
//! [`AssessmentLimits`] are the application-wide bounds (loadable from
//! TOML); [`AssessmentConfig`] is the per-session choice the user makes
//! on the setup form, validated against the limits before a session is
//! created.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use logeek_models::{Difficulty, QuestionKind};

/// Errors from loading limits configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application-wide assessment bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentLimits {
    /// Exam lengths the user may pick, in seconds
    #[serde(default = "default_allowed_durations")]
    pub allowed_durations: Vec<u64>,

    /// Minimum number of questions per assessment
    #[serde(default = "default_min_questions")]
    pub min_questions: usize,

    /// Maximum number of questions per assessment
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,

    /// Guest uses allowed per feature when no override is present
    #[serde(default = "default_guest_limit")]
    pub default_guest_limit: u32,

    /// Per-feature guest limit overrides
    #[serde(default)]
    pub guest_limits: HashMap<String, u32>,

    /// Timer poll interval in milliseconds (user-visible drift bound)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_allowed_durations() -> Vec<u64> {
    vec![60, 300, 600, 1800, 3600]
}

fn default_min_questions() -> usize {
    5
}

fn default_max_questions() -> usize {
    50
}

fn default_guest_limit() -> u32 {
    1
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for AssessmentLimits {
    fn default() -> Self {
        Self {
            allowed_durations: default_allowed_durations(),
            min_questions: default_min_questions(),
            max_questions: default_max_questions(),
            default_guest_limit: default_guest_limit(),
            guest_limits: HashMap::new(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl AssessmentLimits {
    /// Load limits from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Guest limit for a feature, falling back to the default.
    pub fn guest_limit(&self, feature: &str) -> u32 {
        self.guest_limits
            .get(feature)
            .copied()
            .unwrap_or(self.default_guest_limit)
    }
}

/// Per-session assessment configuration chosen on the setup form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Subject or topic to be assessed on
    pub topic: String,
    /// Fixed exam length in seconds
    pub duration_seconds: u64,
    /// Number of questions to generate
    pub question_count: usize,
    /// Question format
    #[serde(default)]
    pub kind: QuestionKind,
    /// Difficulty directive for generation
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl AssessmentConfig {
    /// Create a config with default kind and difficulty.
    pub fn new(topic: impl Into<String>, duration_seconds: u64, question_count: usize) -> Self {
        Self {
            topic: topic.into(),
            duration_seconds,
            question_count,
            kind: QuestionKind::default(),
            difficulty: Difficulty::default(),
        }
    }

    /// Validate this config against application limits.
    ///
    /// Returns a human-readable reason on rejection.
    pub fn validate(&self, limits: &AssessmentLimits) -> Result<(), String> {
        if self.topic.trim().is_empty() {
            return Err("please enter a topic".to_string());
        }
        if !limits.allowed_durations.contains(&self.duration_seconds) {
            return Err(format!(
                "duration {}s is not one of the allowed exam lengths {:?}",
                self.duration_seconds, limits.allowed_durations
            ));
        }
        if self.question_count < limits.min_questions || self.question_count > limits.max_questions
        {
            return Err(format!(
                "question count {} must be between {} and {}",
                self.question_count, limits.min_questions, limits.max_questions
            ));
        }
        Ok(())
    }
}
