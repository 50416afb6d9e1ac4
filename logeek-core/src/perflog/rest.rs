//! REST performance sink.
//!
//! Appends records to a hosted Postgres-over-REST table (the original
//! deployment uses a Supabase `user_performance` table). The core only
//! ever inserts; the record is never updated afterwards.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::{PerformanceRecord, PerformanceSink};
use crate::error::SinkError;

/// Default table name for performance records.
const DEFAULT_TABLE: &str = "user_performance";

/// Performance sink backed by a PostgREST-style endpoint.
pub struct RestSink {
    base_url: String,
    table: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl RestSink {
    /// Create a sink for `{base_url}/rest/v1/user_performance`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            table: DEFAULT_TABLE.to_string(),
            api_key: SecretString::from(api_key.into()),
            client: reqwest::Client::new(),
        }
    }

    /// Override the target table.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table)
    }
}

#[async_trait]
impl PerformanceSink for RestSink {
    async fn append(&self, record: PerformanceRecord) -> Result<(), SinkError> {
        let key = self.api_key.expose_secret();
        let response = self
            .client
            .post(self.endpoint())
            .header("apikey", key)
            .header("Authorization", format!("Bearer {key}"))
            .header("Prefer", "return=minimal")
            .json(&record)
            .send()
            .await
            .map_err(|e| SinkError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(feature = %record.feature, user = %record.user_id, "performance record appended");
        Ok(())
    }
}
