use std::fmt;
use std::future::Future;

use crate::context::AppContext;
use crate::domain::{
    CoreColdtag, CoreColdtagTelemetry, CoreIdVariables, DisplayCoreColdtagAll,
    DisplayCoreColdtagTelemetry, DisplayNodeColdtagAll, DisplayNodeColdtagTelemetry, NodeColdtag,
    NodeColdtagTelemetry, NodeIdVariables,
};
use crate::error::SyncError;
use crate::orchestrator::{Fetcher, Settled};
use crate::phase::FetchState;

/// A device picked in the telemetry view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceRef {
    Core(String),
    Node(String),
}

impl DeviceRef {
    pub fn id(&self) -> &str {
        match self {
            DeviceRef::Core(id) | DeviceRef::Node(id) => id,
        }
    }
}

impl fmt::Display for DeviceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceRef::Core(id) => write!(f, "core:{}", id),
            DeviceRef::Node(id) => write!(f, "node:{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Telemetry {
    Core(CoreColdtagTelemetry),
    Node(NodeColdtagTelemetry),
}

/// Every core and node, for the device picker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceCatalog {
    pub cores: Vec<CoreColdtag>,
    pub nodes: Vec<NodeColdtag>,
}

impl DeviceCatalog {
    pub fn devices(&self) -> impl Iterator<Item = DeviceRef> + '_ {
        let cores = self.cores.iter().map(|c| DeviceRef::Core(c.id.clone()));
        let nodes = self.nodes.iter().map(|n| DeviceRef::Node(n.id.clone()));
        cores.chain(nodes)
    }
}

/// Telemetry page: a device picker and the event history of the pick.
#[derive(Clone)]
pub struct TelemetryView {
    ctx: AppContext,
    catalog: Fetcher<(), DeviceCatalog>,
    telemetry: Fetcher<DeviceRef, Telemetry>,
}

impl TelemetryView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            catalog: ctx.fetcher("device catalog"),
            telemetry: ctx.fetcher("telemetry"),
        }
    }

    /// Fetch cores and nodes concurrently; either failure fails the catalog.
    pub fn load_devices(&self) -> impl Future<Output = Settled> + Send + 'static {
        let client = self.ctx.client();
        let cores = client.run::<DisplayCoreColdtagAll>(());
        let nodes = client.run::<DisplayNodeColdtagAll>(());
        self.catalog.load((), async move {
            let (cores, nodes) = tokio::try_join!(cores, nodes)?;
            Ok::<_, SyncError>(DeviceCatalog { cores, nodes })
        })
    }

    /// Show `device`'s history, or nothing.
    pub fn select(&self, device: Option<DeviceRef>) -> impl Future<Output = Settled> + Send + 'static {
        let client = self.ctx.client().clone();
        self.telemetry.select(device, move |device| async move {
            match device {
                DeviceRef::Core(core_id) => client
                    .run::<DisplayCoreColdtagTelemetry>(CoreIdVariables { core_id })
                    .await
                    .map(Telemetry::Core),
                DeviceRef::Node(node_id) => client
                    .run::<DisplayNodeColdtagTelemetry>(NodeIdVariables { node_id })
                    .await
                    .map(Telemetry::Node),
            }
        })
    }

    pub fn catalog(&self) -> FetchState<DeviceCatalog> {
        self.catalog.state()
    }

    pub fn telemetry(&self) -> FetchState<Telemetry> {
        self.telemetry.state()
    }

    pub fn selected(&self) -> Option<DeviceRef> {
        self.telemetry.current_key()
    }
}
