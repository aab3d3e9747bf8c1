//! GraphQL client: typed operations over a pluggable transport.
//!
//! Each query or mutation is an `Operation` with typed variables and a typed
//! response. `Client::run` serializes the variables, hands a
//! `GraphQLRequest` to the transport and decodes the `{ data, errors }`
//! envelope. Any entry in `errors` rejects the whole call.
//!
//! ## Example
//!
//! ```ignore
//! use cvp_sync::client::{Client, ScriptedTransport};
//! use cvp_sync::domain::DisplayCoreColdtagAll;
//!
//! let client = Client::new(ScriptedTransport::new());
//! let cores = client.run::<DisplayCoreColdtagAll>(()).await?;
//! ```

#[cfg(feature = "http")]
mod http;
mod operation;
mod scripted;
mod session;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;

use crate::error::{GraphQLErrorMessage, SyncError};

#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use operation::{All, ById, Operation, OperationKind, Root};
pub use scripted::{Reply, ScriptedTransport};
pub use session::Session;

/// One request as handed to a transport.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub operation_name: &'static str,
    pub query: &'static str,
    pub variables: Value,
    #[serde(skip)]
    pub kind: OperationKind,
    #[serde(skip)]
    pub headers: Vec<(String, String)>,
}

/// Moves a request to the server and returns the raw response envelope.
///
/// At most one response per call. Transport-level failures are
/// `SyncError::Transport`; GraphQL-level errors come back inside the envelope.
#[async_trait]
pub trait GraphQLTransport: Send + Sync {
    async fn execute(&self, request: GraphQLRequest) -> Result<Value, SyncError>;
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQLErrorMessage>,
}

/// Decode a response envelope for operation `O`.
pub fn decode<O: Operation>(body: Value) -> Result<O::Output, SyncError> {
    let envelope: Envelope = serde_json::from_value(body)?;
    if !envelope.errors.is_empty() {
        return Err(SyncError::GraphQL(envelope.errors));
    }
    let data = envelope
        .data
        .ok_or_else(|| SyncError::Decode("response has neither data nor errors".into()))?;
    let response: O::Response = serde_json::from_value(data)
        .map_err(|e| SyncError::Decode(format!("{}: {}", O::NAME, e)))?;
    Ok(O::output(response))
}

/// Typed GraphQL client. Clone-friendly via Arc.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn GraphQLTransport>,
    session: Arc<RwLock<Session>>,
}

impl Client {
    pub fn new(transport: impl GraphQLTransport + 'static) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    pub fn from_arc(transport: Arc<dyn GraphQLTransport>) -> Self {
        Self {
            transport,
            session: Arc::new(RwLock::new(Session::new())),
        }
    }

    pub fn with_session(self, session: Session) -> Self {
        *self.session.write() = session;
        self
    }

    /// Replace the session; requests already issued keep the old headers.
    pub fn set_session(&self, session: Session) {
        *self.session.write() = session;
    }

    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    /// Build the request for `O` now and return a future that performs it.
    ///
    /// Variables and session headers are captured synchronously; nothing is
    /// sent until the returned future is polled. The future owns everything
    /// it needs, so it can be spawned.
    pub fn run<O: Operation>(
        &self,
        variables: O::Variables,
    ) -> impl Future<Output = Result<O::Output, SyncError>> + Send + 'static {
        let transport = Arc::clone(&self.transport);
        let headers = self.session.read().headers();
        let variables = serde_json::to_value(&variables).map(|value| match value {
            Value::Null => Value::Object(Default::default()),
            other => other,
        });
        let span = tracing::debug_span!("graphql", operation = O::NAME, kind = ?O::KIND);

        async move {
            let request = GraphQLRequest {
                operation_name: O::NAME,
                query: O::DOCUMENT,
                variables: variables?,
                kind: O::KIND,
                headers,
            };
            tracing::debug!("dispatching");
            let body = transport.execute(request).await?;
            let result = decode::<O>(body);
            if let Err(err) = &result {
                tracing::debug!(error = %err, "operation failed");
            }
            result
        }
        .instrument(span)
    }
}
