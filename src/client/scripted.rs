//! ScriptedTransport - in-memory GraphQL transport for tests and demos.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::{json, Value};

use super::{GraphQLRequest, GraphQLTransport, Operation};
use crate::error::{GraphQLErrorMessage, SyncError};

#[derive(Debug, Clone)]
enum ReplyBody {
    Data(Value),
    Errors(Vec<GraphQLErrorMessage>),
    Transport(String),
    Pending,
}

/// What a scripted operation answers, and after how long.
#[derive(Debug, Clone)]
pub struct Reply {
    delay: Duration,
    body: ReplyBody,
}

impl Reply {
    /// Answer with `{ "data": data }`.
    pub fn data(data: Value) -> Self {
        Self {
            delay: Duration::ZERO,
            body: ReplyBody::Data(data),
        }
    }

    /// Answer with a GraphQL `errors` array.
    pub fn errors<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            delay: Duration::ZERO,
            body: ReplyBody::Errors(
                messages
                    .into_iter()
                    .map(GraphQLErrorMessage::new)
                    .collect(),
            ),
        }
    }

    /// Fail below GraphQL, as a dropped connection would.
    pub fn transport_error(message: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            body: ReplyBody::Transport(message.into()),
        }
    }

    /// Never answer.
    pub fn pending() -> Self {
        Self {
            delay: Duration::ZERO,
            body: ReplyBody::Pending,
        }
    }

    /// Delay the answer.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Script = Arc<dyn Fn(&Value) -> Reply + Send + Sync>;

/// Transport answering from per-operation scripts and recording every call.
///
/// Clone-friendly via Arc; clones share scripts and the call log.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    scripts: Arc<RwLock<HashMap<&'static str, Script>>>,
    calls: Arc<Mutex<Vec<GraphQLRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `O` by calling `script` with the request variables.
    pub fn on<O, F>(&self, script: F) -> &Self
    where
        O: Operation,
        F: Fn(&Value) -> Reply + Send + Sync + 'static,
    {
        self.scripts.write().insert(O::NAME, Arc::new(script));
        self
    }

    /// Always answer `O` with `data`.
    pub fn respond<O: Operation>(&self, data: Value) -> &Self {
        self.on::<O, _>(move |_| Reply::data(data.clone()))
    }

    /// Always answer `O` with a GraphQL error.
    pub fn fail<O: Operation>(&self, message: &str) -> &Self {
        let message = message.to_string();
        self.on::<O, _>(move |_| Reply::errors([message.clone()]))
    }

    /// Every request received, in arrival order.
    pub fn calls(&self) -> Vec<GraphQLRequest> {
        self.calls.lock().clone()
    }

    /// Variables of every request for `O`.
    pub fn calls_to<O: Operation>(&self) -> Vec<Value> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.operation_name == O::NAME)
            .map(|call| call.variables.clone())
            .collect()
    }

    pub fn call_count<O: Operation>(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.operation_name == O::NAME)
            .count()
    }
}

#[async_trait]
impl GraphQLTransport for ScriptedTransport {
    async fn execute(&self, request: GraphQLRequest) -> Result<Value, SyncError> {
        let script = self.scripts.read().get(request.operation_name).cloned();
        let name = request.operation_name;
        let reply = script.map(|script| script(&request.variables));
        self.calls.lock().push(request);

        let Some(reply) = reply else {
            return Err(SyncError::Transport(format!("no script for operation {}", name)));
        };

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }

        match reply.body {
            ReplyBody::Data(data) => Ok(json!({ "data": data })),
            ReplyBody::Errors(errors) => Ok(json!({ "data": null, "errors": errors })),
            ReplyBody::Transport(message) => Err(SyncError::Transport(message)),
            ReplyBody::Pending => std::future::pending().await,
        }
    }
}
