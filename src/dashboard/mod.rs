//! Page controllers for the dashboard views.
//!
//! Each controller owns its fetch slots and exposes the user's intents
//! (`load`, `select`, `submit`, ...) as methods. Views read `FetchState`
//! snapshots and never talk to the client directly.
//!
//! - `ListPage<R>`: a table of cores, nodes or route cycles, reconciled
//!   after create, update and delete.
//! - `CreateSheet<R>` / `UpdateSheet<R>`: form state for the create and edit
//!   sheets.
//! - `RouteCyclePage`: the route cycle table plus start, complete and cancel.
//! - `ReportPage`: the per-cycle report, fetched only once a cycle started.
//! - `TelemetryView`: device picker and event history.

mod list;
mod route_cycle;
mod telemetry;
mod update;

pub use list::{CreateSheet, DeviceListPage, ListPage};
pub use route_cycle::{ReportPage, RouteCyclePage};
pub use telemetry::{DeviceCatalog, DeviceRef, Telemetry, TelemetryView};
pub use update::{UpdateOutcome, UpdateSheet};
