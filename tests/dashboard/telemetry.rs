//! Telemetry view: device catalog and per-device history.

use std::time::Duration;

use cvp_sync::client::Reply;
use cvp_sync::dashboard::{DeviceRef, Telemetry, TelemetryView};
use cvp_sync::domain::{
    DisplayCoreColdtagAll, DisplayCoreColdtagTelemetry, DisplayNodeColdtagAll,
    DisplayNodeColdtagTelemetry,
};
use cvp_sync::{Phase, Settled, SyncError};
use serde_json::json;

use crate::support::{context, core, core_list, node};

#[tokio::test]
async fn catalog_joins_cores_and_nodes() {
    let (ctx, transport) = context();
    transport.respond::<DisplayCoreColdtagAll>(core_list(vec![core("c1", "Yard")]));
    transport.respond::<DisplayNodeColdtagAll>(json!({
        "displayNodeColdtag": { "all": [node("n1", "Pallet"), node("n2", "Crate")] }
    }));

    let view = TelemetryView::new(&ctx);
    assert!(view.load_devices().await.is_committed());

    let catalog = view.catalog().data.unwrap();
    assert_eq!(
        catalog.devices().collect::<Vec<_>>(),
        vec![
            DeviceRef::Core("c1".into()),
            DeviceRef::Node("n1".into()),
            DeviceRef::Node("n2".into()),
        ]
    );
}

#[tokio::test]
async fn catalog_fails_if_either_list_fails() {
    let (ctx, transport) = context();
    transport.respond::<DisplayCoreColdtagAll>(core_list(vec![]));
    transport.fail::<DisplayNodeColdtagAll>("Unauthorized");

    let view = TelemetryView::new(&ctx);
    let settled = view.load_devices().await;

    assert!(matches!(settled, Settled::Failed(SyncError::GraphQL(_))));
    assert_eq!(view.catalog().phase, Phase::Error);
    assert_eq!(ctx.toasts().visible().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn switching_from_core_to_node_shows_the_node() {
    let (ctx, transport) = context();
    transport.on::<DisplayCoreColdtagTelemetry, _>(|_| {
        Reply::data(json!({ "displayCoreColdtag": { "byId": {
            "id": "c1", "macAddress": "AA:c1", "events": { "basic": [] }
        } } }))
        .after(Duration::from_secs(2))
    });
    transport.on::<DisplayNodeColdtagTelemetry, _>(|vars| {
        Reply::data(json!({ "displayNodeColdtag": { "byId": {
            "id": vars["nodeId"], "macAddress": "BB:n1",
            "events": { "basic": [{
                "id": "e1", "connectionStatus": "connected", "temperature": 3.5,
                "eventTime": "2024-05-01T10:00:00Z", "time": "2024-05-01T10:00:01Z"
            }] }
        } } }))
    });

    let view = TelemetryView::new(&ctx);
    let core = view.select(Some(DeviceRef::Core("c1".into())));
    let node = view.select(Some(DeviceRef::Node("n1".into())));
    let (core, node) = tokio::join!(core, node);

    assert_eq!(core, Settled::Discarded);
    assert_eq!(node, Settled::Committed);
    assert_eq!(view.selected(), Some(DeviceRef::Node("n1".into())));
    match view.telemetry().data {
        Some(Telemetry::Node(node)) => {
            assert_eq!(node.id, "n1");
            assert_eq!(node.latest_reading().and_then(|e| e.temperature), Some(3.5));
        }
        other => panic!("expected node telemetry, got {other:?}"),
    }

    view.select(None).await;
    assert_eq!(view.telemetry().phase, Phase::Idle);
    assert_eq!(view.selected(), None);
}
