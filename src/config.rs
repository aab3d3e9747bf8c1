//! Application-wide synchronization settings.
//!
//! Deserializable from JSON so a host can ship them next to its endpoint
//! configuration. Every field has a default; `{}` is a valid config.
//!
//! ```json
//! {
//!   "endpoint": "https://api.example.com/graphql",
//!   "fetch": { "requestTimeoutMs": 15000, "abortSuperseded": true },
//!   "toast": { "limit": 3, "ttlMs": 8000 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::orchestrator::FetchConfig;
use crate::toast::ToastConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncConfig {
    /// GraphQL endpoint for the HTTP transport.
    pub endpoint: Option<String>,
    pub fetch: FetchConfig,
    pub toast: ToastConfig,
}

impl SyncConfig {
    pub fn from_json(json: &str) -> Result<Self, SyncError> {
        serde_json::from_str(json).map_err(|e| SyncError::Decode(format!("config: {}", e)))
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_request_timeout_ms(mut self, ms: u64) -> Self {
        self.fetch.request_timeout_ms = Some(ms);
        self
    }
}
