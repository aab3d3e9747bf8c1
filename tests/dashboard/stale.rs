//! Selecting A then B: whatever order the responses arrive in, B is shown.

use std::time::Duration;

use cvp_sync::client::Reply;
use cvp_sync::dashboard::{DeviceListPage, ReportPage, UpdateSheet};
use cvp_sync::domain::{CoreColdtag, DisplayCoreColdtagAll, DisplayCoreColdtagById, DisplayRouteCycleReport, RouteCycle};
use cvp_sync::{Phase, Settled};
use serde_json::Value;

use crate::support::{context, core, core_by_id, core_list, cycle, cycle_by_id};

fn by_id_with_delays(a_ms: u64, b_ms: u64) -> impl Fn(&Value) -> Reply + Send + Sync + 'static {
    move |vars: &Value| {
        let id = vars["coreId"].as_str().unwrap_or_default().to_string();
        let delay = if id == "A" { a_ms } else { b_ms };
        Reply::data(core_by_id(core(&id, &format!("core {id}")))).after(Duration::from_millis(delay))
    }
}

#[tokio::test(start_paused = true)]
async fn late_response_for_a_is_dropped() {
    let (ctx, transport) = context();
    transport.on::<DisplayCoreColdtagById, _>(by_id_with_delays(300, 50));

    let sheet = UpdateSheet::<CoreColdtag>::new(&ctx);
    let a = sheet.open(Some("A".into()));
    let b = sheet.open(Some("B".into()));
    assert_eq!(sheet.phase(), Phase::Loading);

    let (a, b) = tokio::join!(a, b);

    assert_eq!(b, Settled::Committed);
    assert_eq!(a, Settled::Discarded);
    assert_eq!(sheet.record().map(|c| c.id), Some("B".to_string()));
    assert_eq!(sheet.phase(), Phase::Ready);
}

#[tokio::test(start_paused = true)]
async fn early_response_for_a_is_dropped_too() {
    let (ctx, transport) = context();
    transport.on::<DisplayCoreColdtagById, _>(by_id_with_delays(50, 300));

    let sheet = UpdateSheet::<CoreColdtag>::new(&ctx);
    let a = sheet.open(Some("A".into()));
    let b = sheet.open(Some("B".into()));

    let (a, b) = tokio::join!(a, b);

    assert_eq!(a, Settled::Discarded);
    assert_eq!(b, Settled::Committed);
    assert_eq!(sheet.record().map(|c| c.id), Some("B".to_string()));
}

#[tokio::test(start_paused = true)]
async fn superseded_failure_is_not_toasted() {
    let (ctx, transport) = context();
    transport.on::<DisplayCoreColdtagById, _>(|vars| {
        if vars["coreId"] == "A" {
            Reply::transport_error("connection reset").after(Duration::from_millis(200))
        } else {
            Reply::data(core_by_id(core("B", "core B")))
        }
    });

    let sheet = UpdateSheet::<CoreColdtag>::new(&ctx);
    let a = sheet.open(Some("A".into()));
    let b = sheet.open(Some("B".into()));
    let (a, _) = tokio::join!(a, b);

    assert_eq!(a, Settled::Discarded);
    assert_eq!(sheet.phase(), Phase::Ready);
    assert!(ctx.toasts().visible().is_empty());
}

#[tokio::test(start_paused = true)]
async fn report_resets_when_selected_cycle_has_not_started() {
    let (ctx, transport) = context();
    transport.on::<DisplayRouteCycleReport, _>(|vars| {
        let id = vars["routeCycleId"].as_str().unwrap_or_default();
        Reply::data(cycle_by_id(cycle(id, true, false, false))).after(Duration::from_millis(100))
    });

    let page = ReportPage::new(&ctx);
    let running: RouteCycle = serde_json::from_value(cycle("r1", true, false, false)).unwrap();
    let pending: RouteCycle = serde_json::from_value(cycle("r2", false, false, false)).unwrap();

    let first = page.select(Some(running));
    let second = page.select(Some(pending));
    assert_eq!(page.report().phase, Phase::Idle);

    let (first, second) = tokio::join!(first, second);

    assert_eq!(first, Settled::Discarded);
    assert_eq!(second, Settled::Skipped);
    assert!(page.report().data.is_none());
    assert_eq!(page.selected().map(|c| c.id), Some("r2".to_string()));
    assert_eq!(transport.call_count::<DisplayRouteCycleReport>(), 1);
}

#[tokio::test]
async fn report_loads_for_started_cycle() {
    let (ctx, transport) = context();
    let mut report = cycle("r1", true, false, false);
    report["telemetry"] = serde_json::json!({
        "id": "n1",
        "macAddress": "BB:n1",
        "events": { "basic": [], "alertLiquid": [], "alertImpact": [] }
    });
    transport.respond::<DisplayRouteCycleReport>(cycle_by_id(report));

    let page = ReportPage::new(&ctx);
    let running: RouteCycle = serde_json::from_value(cycle("r1", true, false, false)).unwrap();
    assert!(page.select(Some(running)).await.is_committed());

    let state = page.report();
    let report = state.data.unwrap();
    assert_eq!(report.cycle.id, "r1");
    assert_eq!(report.telemetry.map(|t| t.id), Some("n1".to_string()));
}

#[tokio::test(start_paused = true)]
async fn dropped_list_load_does_not_stay_loading() {
    let (ctx, transport) = context();
    transport.respond::<DisplayCoreColdtagAll>(core_list(vec![core("c1", "Yard")]));

    let page = DeviceListPage::<CoreColdtag>::new(&ctx);
    drop(page.load());
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(page.phase(), Phase::Idle);
    assert_eq!(transport.call_count::<DisplayCoreColdtagAll>(), 0);

    assert!(page.load().await.is_committed());
    assert_eq!(page.phase(), Phase::Ready);
    assert_eq!(page.records().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn sheet_open_cut_short_by_timeout_returns_to_idle() {
    let (ctx, transport) = context();
    transport.on::<DisplayCoreColdtagById, _>(by_id_with_delays(1_000, 0));

    let sheet = UpdateSheet::<CoreColdtag>::new(&ctx);
    assert!(sheet.open(Some("B".into())).await.is_committed());

    let opening = sheet.open(Some("A".into()));
    let timed_out = tokio::time::timeout(Duration::from_millis(100), opening).await;

    assert!(timed_out.is_err());
    assert_eq!(sheet.phase(), Phase::Idle);
    assert_eq!(sheet.record(), None);
}
