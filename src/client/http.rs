//! HTTP transport - POSTs GraphQL requests with reqwest.
//!
//! Requires the `http` feature.
//!
//! The body is `{ "query", "variables", "operationName" }`; session headers
//! are copied onto the request. A non-2xx response that still carries a
//! GraphQL `errors` array is decoded like any other envelope.

use async_trait::async_trait;
use serde_json::Value;

use super::{GraphQLRequest, GraphQLTransport};
use crate::error::SyncError;

#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GraphQLTransport for HttpTransport {
    async fn execute(&self, request: GraphQLRequest) -> Result<Value, SyncError> {
        let mut builder = self.client.post(&self.endpoint).json(&request);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| SyncError::Transport(format!("HTTP {}: {}", status, e)))?;

        if !status.is_success() && body.get("errors").is_none() {
            return Err(SyncError::Transport(format!("HTTP {}", status)));
        }
        Ok(body)
    }
}
