//! Application context shared by every page controller.
//!
//! Built once at startup and cloned into controllers. Carries the GraphQL
//! client, the error toast collector and the sync configuration. Nothing in
//! the crate reaches these through globals.

use std::fmt;
use std::sync::Arc;

use crate::client::{Client, GraphQLTransport, Session};
use crate::config::SyncConfig;
use crate::orchestrator::Fetcher;
use crate::toast::Toaster;

/// The app-scoped context.
///
/// ## Example
///
/// ```ignore
/// let ctx = AppContext::new(HttpTransport::new(endpoint), SyncConfig::default());
/// ctx.client().set_session(Session::with_access_token(token));
/// let cores = DeviceListPage::<CoreColdtag>::new(&ctx);
/// cores.load().await;
/// ```
#[derive(Clone)]
pub struct AppContext {
    client: Client,
    toasts: Toaster,
    config: Arc<SyncConfig>,
}

impl AppContext {
    /// Create a context over `transport`.
    pub fn new(transport: impl GraphQLTransport + 'static, config: SyncConfig) -> Self {
        Self::from_client(Client::new(transport), config)
    }

    pub fn from_client(client: Client, config: SyncConfig) -> Self {
        tracing::debug!(?config, "initializing app context");
        Self {
            client,
            toasts: Toaster::new(config.toast.clone()),
            config: Arc::new(config),
        }
    }

    /// Create a context talking HTTP to the configured endpoint.
    #[cfg(feature = "http")]
    pub fn connect(config: SyncConfig) -> Result<Self, crate::SyncError> {
        let endpoint = config
            .endpoint
            .clone()
            .ok_or_else(|| crate::SyncError::Transport("no GraphQL endpoint configured".into()))?;
        Ok(Self::new(crate::client::HttpTransport::new(endpoint), config))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn toasts(&self) -> &Toaster {
        &self.toasts
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Replace the session used for subsequent requests.
    pub fn sign_in(&self, session: Session) {
        self.client.set_session(session);
    }

    pub fn sign_out(&self) {
        let mut session = self.client.session();
        session.clear_access_token();
        self.client.set_session(session);
    }

    /// A fresh fetch slot wired to this context's toasts and fetch settings.
    pub fn fetcher<K, T>(&self, label: &'static str) -> Fetcher<K, T>
    where
        K: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
        T: Clone + Send + 'static,
    {
        Fetcher::new(label, self.toasts.clone(), self.config.fetch.clone())
    }
}
