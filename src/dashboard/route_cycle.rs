use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use super::ListPage;
use crate::client::Operation;
use crate::context::AppContext;
use crate::domain::{
    CancelRouteCycle, CompleteRouteCycle, DisplayRouteCycleReport, RouteCycle,
    RouteCycleIdVariables, RouteCycleReport, StartRouteCycle, Transition,
};
use crate::error::SyncError;
use crate::orchestrator::{Fetcher, Settled};
use crate::phase::FetchState;

/// Route cycle table with lifecycle actions.
#[derive(Clone)]
pub struct RouteCyclePage {
    list: ListPage<RouteCycle>,
}

impl RouteCyclePage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            list: ListPage::new(ctx),
        }
    }

    pub fn list(&self) -> &ListPage<RouteCycle> {
        &self.list
    }

    pub fn load(&self) -> impl Future<Output = Settled> + Send + 'static {
        self.list.load()
    }

    pub async fn start(&self, id: &str) -> Result<RouteCycle, SyncError> {
        self.transition::<StartRouteCycle>(id, Transition::Start).await
    }

    pub async fn complete(&self, id: &str) -> Result<RouteCycle, SyncError> {
        self.transition::<CompleteRouteCycle>(id, Transition::Complete)
            .await
    }

    pub async fn cancel(&self, id: &str) -> Result<RouteCycle, SyncError> {
        self.transition::<CancelRouteCycle>(id, Transition::Cancel)
            .await
    }

    async fn transition<O>(&self, id: &str, transition: Transition) -> Result<RouteCycle, SyncError>
    where
        O: Operation<Variables = RouteCycleIdVariables, Output = RouteCycle>,
    {
        let cycle = self
            .list
            .get(id)
            .ok_or(SyncError::NotSelected("route cycle"))?;
        transition.check(&cycle)?;

        tracing::debug!(id, %transition, "route cycle transition");
        let request = self
            .list
            .context()
            .client()
            .run::<O>(RouteCycleIdVariables::new(id));
        let updated = self.list.toast_on_error(request.await)?;
        self.list.on_updated(updated.clone());
        Ok(updated)
    }
}

/// Report view: pick a route cycle, show its telemetry once it has started.
#[derive(Clone)]
pub struct ReportPage {
    ctx: AppContext,
    cycles: ListPage<RouteCycle>,
    selected: Arc<Mutex<Option<RouteCycle>>>,
    report: Fetcher<String, RouteCycleReport>,
}

impl ReportPage {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            ctx: ctx.clone(),
            cycles: ListPage::new(ctx),
            selected: Default::default(),
            report: ctx.fetcher("route cycle report"),
        }
    }

    pub fn cycles(&self) -> &ListPage<RouteCycle> {
        &self.cycles
    }

    pub fn load(&self) -> impl Future<Output = Settled> + Send + 'static {
        self.cycles.load()
    }

    /// Select a cycle. The previous report is cleared at once; a new one is
    /// fetched only if the cycle has started.
    pub fn select(&self, cycle: Option<RouteCycle>) -> impl Future<Output = Settled> + Send + 'static {
        *self.selected.lock() = cycle.clone();
        self.report.clear();

        let pending = cycle.map(|cycle| {
            let client = self.ctx.client().clone();
            let id = cycle.id.clone();
            self.report.load_when(cycle.id, cycle.started, move || {
                client.run::<DisplayRouteCycleReport>(RouteCycleIdVariables::new(&id))
            })
        });
        async move {
            match pending {
                Some(pending) => pending.await,
                None => Settled::Skipped,
            }
        }
    }

    /// Select by id from the loaded cycles.
    pub fn select_id(&self, id: Option<&str>) -> impl Future<Output = Settled> + Send + 'static {
        let cycle = id.and_then(|id| self.cycles.get(id));
        self.select(cycle)
    }

    pub fn selected(&self) -> Option<RouteCycle> {
        self.selected.lock().clone()
    }

    pub fn report(&self) -> FetchState<RouteCycleReport> {
        self.report.state()
    }
}
