//! Caller identity types.
//!
//! The core never authenticates anyone; the surrounding application
//! shell resolves the login state and hands the core an opaque
//! [`CallerIdentity`].

use serde::{Deserialize, Serialize};

/// Identity of the caller driving a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallerIdentity {
    /// Unauthenticated caller, subject to per-feature guest quotas
    Guest,
    /// Authenticated via the identity provider; unlimited feature use
    Authenticated {
        /// Opaque user ID supplied by the identity provider
        user_id: String,
    },
}

impl CallerIdentity {
    /// Create an authenticated identity
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self::Authenticated {
            user_id: user_id.into(),
        }
    }

    /// Returns true if the caller is authenticated
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Returns the user ID if authenticated, None otherwise
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Authenticated { user_id } => Some(user_id),
            Self::Guest => None,
        }
    }
}

impl Default for CallerIdentity {
    fn default() -> Self {
        Self::Guest
    }
}
