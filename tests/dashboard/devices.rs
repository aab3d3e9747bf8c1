//! Core/node tables: load, then reconcile creates, updates and deletes.

use cvp_sync::dashboard::{CreateSheet, DeviceListPage};
use cvp_sync::domain::{
    CoreColdtag, CreateCoreColdtag, DeleteCoreColdtag, DeviceCreateForm, DisplayCoreColdtagAll,
    DisplayNodeColdtagAll, NodeColdtag,
};
use cvp_sync::{Phase, Record, SyncError};
use serde_json::json;

use crate::support::{context, core, core_list, mutation, node};

fn ids<R: Record>(records: &[R]) -> Vec<&str> {
    records.iter().map(|r| r.id()).collect()
}

#[tokio::test]
async fn load_keeps_server_order() {
    let (ctx, transport) = context();
    transport.respond::<DisplayCoreColdtagAll>(core_list(vec![
        core("c2", "Dock"),
        core("c1", "Yard"),
    ]));

    let page = DeviceListPage::<CoreColdtag>::new(&ctx);
    assert!(page.load().await.is_committed());

    assert_eq!(page.phase(), Phase::Ready);
    assert_eq!(ids(&page.records()), vec!["c2", "c1"]);
}

#[tokio::test]
async fn created_record_is_appended() {
    let (ctx, transport) = context();
    transport.respond::<DisplayCoreColdtagAll>(core_list(vec![core("c1", "Yard")]));
    transport.respond::<CreateCoreColdtag>(mutation("createCoreColdtag", core("c9", "New")));

    let page = DeviceListPage::<CoreColdtag>::new(&ctx);
    page.load().await;

    let sheet = CreateSheet::<CoreColdtag>::new();
    sheet.edit(|form| {
        form.mac_address = Some("AA:c9".into());
        form.identifier = Some("New".into());
    });
    let created = sheet.submit(&page).await.unwrap();

    assert_eq!(created.id, "c9");
    assert_eq!(ids(&page.records()), vec!["c1", "c9"]);
    assert_eq!(sheet.form(), DeviceCreateForm::default());
    assert_eq!(
        transport.calls_to::<CreateCoreColdtag>(),
        vec![json!({ "macAddress": "AA:c9", "identifier": "New" })]
    );
}

#[tokio::test]
async fn missing_mac_address_is_inline_and_not_sent() {
    let (ctx, transport) = context();
    let page = DeviceListPage::<CoreColdtag>::new(&ctx);
    let sheet = CreateSheet::<CoreColdtag>::new();
    sheet.edit(|form| form.identifier = Some("No MAC".into()));

    let err = sheet.submit(&page).await.unwrap_err();

    assert!(matches!(err, SyncError::Validation(_)));
    assert_eq!(sheet.errors().get("macAddress"), Some("MAC Address is required"));
    assert_eq!(sheet.form().identifier.as_deref(), Some("No MAC"));
    assert_eq!(transport.call_count::<CreateCoreColdtag>(), 0);
    assert!(ctx.toasts().visible().is_empty());
}

#[tokio::test]
async fn failed_create_is_toasted_and_keeps_the_form() {
    let (ctx, transport) = context();
    transport.fail::<CreateCoreColdtag>("duplicate MAC address");

    let page = DeviceListPage::<CoreColdtag>::new(&ctx);
    let sheet = CreateSheet::<CoreColdtag>::new();
    sheet.edit(|form| form.mac_address = Some("AA:01".into()));

    let err = sheet.submit(&page).await.unwrap_err();

    assert!(matches!(err, SyncError::GraphQL(_)));
    assert_eq!(sheet.form().mac_address.as_deref(), Some("AA:01"));
    assert!(page.records().is_empty());
    let toasts = ctx.toasts().visible();
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].message.contains("duplicate MAC address"));
}

#[tokio::test]
async fn update_replaces_in_place_and_ignores_unknown_ids() {
    let (ctx, transport) = context();
    transport.respond::<DisplayNodeColdtagAll>(json!({
        "displayNodeColdtag": { "all": [node("n1", "A"), node("n2", "B"), node("n3", "C")] }
    }));

    let page = DeviceListPage::<NodeColdtag>::new(&ctx);
    page.load().await;

    let renamed: NodeColdtag = serde_json::from_value(node("n2", "B2")).unwrap();
    assert!(page.on_updated(renamed));
    let stranger: NodeColdtag = serde_json::from_value(node("n9", "?")).unwrap();
    assert!(!page.on_updated(stranger));

    let records = page.records();
    assert_eq!(ids(&records), vec!["n1", "n2", "n3"]);
    assert_eq!(records[1].identifier.as_deref(), Some("B2"));
}

#[tokio::test]
async fn delete_drops_the_record() {
    let (ctx, transport) = context();
    transport.respond::<DisplayCoreColdtagAll>(core_list(vec![
        core("c1", "Yard"),
        core("c2", "Dock"),
    ]));
    transport.respond::<DeleteCoreColdtag>(mutation("deleteCoreColdtag", core("c1", "Yard")));

    let page = DeviceListPage::<CoreColdtag>::new(&ctx);
    page.load().await;
    let deleted = page.delete("c1").await.unwrap();

    assert_eq!(deleted.id, "c1");
    assert_eq!(ids(&page.records()), vec!["c2"]);
    assert_eq!(
        transport.calls_to::<DeleteCoreColdtag>(),
        vec![json!({ "coreColdtagId": "c1" })]
    );
}
