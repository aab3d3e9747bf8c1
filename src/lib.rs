extern crate self as cvp_sync;

pub mod client;
mod config;
mod context;
pub mod dashboard;
pub mod domain;
mod error;
mod guard;
pub mod orchestrator;
mod phase;
pub mod reconcile;
mod toast;

pub use client::{Client, GraphQLRequest, GraphQLTransport, Operation, ScriptedTransport, Session};
pub use config::SyncConfig;
pub use context::AppContext;
pub use error::{GraphQLErrorMessage, SyncError};
pub use guard::{Generation, RequestGuard};
pub use orchestrator::{FetchConfig, Fetcher, Settled};
pub use phase::{FetchState, Phase, PhaseTracker};
pub use reconcile::{ChangeSet, FieldErrors, Record, Snapshot, Validate};
pub use toast::{Toast, ToastConfig, ToastId, Toaster};

// Derive macro for `Record`
pub use cvp_sync_macros::Record;

#[cfg(feature = "http")]
pub use client::HttpTransport;
