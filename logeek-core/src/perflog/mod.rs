//! Performance log sink.
//!
//! The core emits one append-only [`PerformanceRecord`] per finished
//! assessment and never reads the log back; dashboards that render
//! history are out of scope. A sink failure is logged and dropped; the
//! Finished state and the report never depend on it.

mod memory;
mod rest;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use memory::MemorySink;
pub use rest::RestSink;

use crate::error::SinkError;

/// One performance entry, written exactly once by the owning session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// Opaque user ID, or "guest" for unauthenticated callers
    pub user_id: String,
    /// Feature that produced the record (e.g., "smart_quiz")
    pub feature: String,
    /// Correctly answered questions
    pub score: usize,
    /// Total questions
    pub total: usize,
    /// 100 * score / total
    pub percentage: f64,
    /// When the assessment finished
    pub created_at: DateTime<Utc>,
}

/// Trait for performance log sinks.
#[async_trait]
pub trait PerformanceSink: Send + Sync {
    /// Append a record to the log.
    async fn append(&self, record: PerformanceRecord) -> Result<(), SinkError>;
}
