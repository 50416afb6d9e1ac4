//! In-memory performance sink for tests and local runs.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PerformanceRecord, PerformanceSink};
use crate::error::SinkError;

/// Performance sink that stores records in memory.
///
/// Optionally scripted to fail, for testing that a sink failure never
/// blocks the Finished state.
#[derive(Default)]
pub struct MemorySink {
    records: RwLock<Vec<PerformanceRecord>>,
    fail_next: RwLock<bool>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next append fail with a request error.
    pub async fn fail_next_append(&self) {
        *self.fail_next.write().await = true;
    }

    /// All records appended so far.
    pub async fn records(&self) -> Vec<PerformanceRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl PerformanceSink for MemorySink {
    async fn append(&self, record: PerformanceRecord) -> Result<(), SinkError> {
        let mut fail = self.fail_next.write().await;
        if *fail {
            *fail = false;
            return Err(SinkError::Request("scripted failure".to_string()));
        }
        drop(fail);

        self.records.write().await.push(record);
        Ok(())
    }
}
