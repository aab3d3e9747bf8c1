//! Dashboard controller integration tests, over a scripted GraphQL transport.

mod support;
mod devices;
mod stale;
mod telemetry;
mod update_sheet;

#[cfg(feature = "http")]
mod http;
