use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reconcile::FieldErrors;

/// One entry of a GraphQL response's `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLErrorMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
}

impl GraphQLErrorMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }
}

impl fmt::Display for GraphQLErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Error type shared by the client, the fetch orchestrator and the page controllers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    /// The request never produced a GraphQL response (connection, HTTP status).
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-empty `errors` array.
    #[error("graphql error: {}", join_messages(.0))]
    GraphQL(Vec<GraphQLErrorMessage>),
    /// The response did not match the operation's typed shape.
    #[error("response decode failed: {0}")]
    Decode(String),
    /// No response within the configured request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// Client-side validation failed; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    /// A route cycle lifecycle transition the server would reject.
    #[error("cannot {transition} route cycle {id}: {reason}")]
    IllegalTransition {
        id: String,
        transition: &'static str,
        reason: &'static str,
    },
    /// An intent needs a loaded or selected record and there is none.
    #[error("no {0} selected")]
    NotSelected(&'static str),
}

impl SyncError {
    /// Whether this error is reported next to the offending input rather than as a toast.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            SyncError::Validation(_) | SyncError::IllegalTransition { .. } | SyncError::NotSelected(_)
        )
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Decode(err.to_string())
    }
}

fn join_messages(errors: &[GraphQLErrorMessage]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
