//! Guest usage quota gate.
//!
//! Counters are scoped to one caller session and live only in memory;
//! nothing here is shared across sessions or persisted. Authenticated
//! callers bypass metering entirely.

use std::collections::HashMap;

use crate::auth::CallerIdentity;

/// Per-session guest usage counters, keyed by feature name.
#[derive(Debug, Default)]
pub struct GuestQuota {
    counts: HashMap<String, u32>,
}

impl GuestQuota {
    /// Create an empty quota gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether the caller may use a metered feature.
    ///
    /// Authenticated callers are always allowed and never counted.
    /// A guest at or over the limit is denied without mutation, so
    /// repeated denials are idempotent; otherwise the counter is
    /// incremented and the use is allowed.
    pub fn allow(&mut self, feature: &str, limit: u32, caller: &CallerIdentity) -> bool {
        if caller.is_authenticated() {
            return true;
        }

        let count = self.counts.entry(feature.to_string()).or_insert(0);
        if *count >= limit {
            return false;
        }

        *count += 1;
        true
    }

    /// Current count for a feature (0 if never used).
    pub fn count(&self, feature: &str) -> u32 {
        self.counts.get(feature).copied().unwrap_or(0)
    }
}
