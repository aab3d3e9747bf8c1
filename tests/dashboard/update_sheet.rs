//! Update sheets: fetch by id, diff, validate, send only what changed.

use cvp_sync::dashboard::{DeviceListPage, UpdateOutcome, UpdateSheet};
use cvp_sync::domain::{
    CoreColdtag, DisplayCoreColdtagAll, DisplayCoreColdtagById, DisplayRouteCycleById,
    RouteCycle, UpdateCoreColdtag, UpdateRouteCycle,
};
use cvp_sync::{Phase, SyncError};
use serde_json::json;

use crate::support::{context, core, core_by_id, core_list, cycle, cycle_by_id, mutation};

#[tokio::test]
async fn unchanged_form_sends_nothing() {
    let (ctx, transport) = context();
    transport.respond::<DisplayCoreColdtagById>(core_by_id(core("c1", "Yard")));

    let sheet = UpdateSheet::<CoreColdtag>::new(&ctx);
    assert!(sheet.open(Some("c1".into())).await.is_committed());

    assert_eq!(sheet.submit().await.unwrap(), UpdateOutcome::Unchanged);
    // Same value typed back in is still no change.
    sheet.edit(|form| form.identifier = Some("Yard".into()));
    assert_eq!(sheet.submit().await.unwrap(), UpdateOutcome::Unchanged);

    assert_eq!(transport.call_count::<UpdateCoreColdtag>(), 0);
    assert!(ctx.toasts().visible().is_empty());
}

#[tokio::test]
async fn rename_sends_the_changed_field_and_reconciles_the_table() {
    let (ctx, transport) = context();
    transport.respond::<DisplayCoreColdtagAll>(core_list(vec![
        core("c1", "Yard"),
        core("c2", "Dock"),
    ]));
    transport.respond::<DisplayCoreColdtagById>(core_by_id(core("c2", "Dock")));
    transport.respond::<UpdateCoreColdtag>(mutation("updateCoreColdtag", core("c2", "Dock 7")));

    let page = DeviceListPage::<CoreColdtag>::new(&ctx);
    page.load().await;
    let sheet = UpdateSheet::<CoreColdtag>::new(&ctx);
    sheet.open(Some("c2".into())).await;

    sheet.edit(|form| form.identifier = Some("Dock 7".into()));
    let outcome = sheet.submit_to(&page).await.unwrap();

    assert_eq!(
        outcome.updated().and_then(|c| c.identifier),
        Some("Dock 7".to_string())
    );
    assert_eq!(
        transport.calls_to::<UpdateCoreColdtag>(),
        vec![json!({ "coreColdtagId": "c2", "identifier": "Dock 7" })]
    );
    let names: Vec<_> = page
        .records()
        .into_iter()
        .map(|c| c.identifier.unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["Yard", "Dock 7"]);
    // The sheet now holds the updated record, so resubmitting is a no-op.
    assert_eq!(sheet.submit().await.unwrap(), UpdateOutcome::Unchanged);
}

#[tokio::test]
async fn blank_name_fails_validation_inline() {
    let (ctx, transport) = context();
    transport.respond::<DisplayCoreColdtagById>(core_by_id(core("c1", "Yard")));

    let sheet = UpdateSheet::<CoreColdtag>::new(&ctx);
    sheet.open(Some("c1".into())).await;
    sheet.edit(|form| form.identifier = Some("  ".into()));

    let err = sheet.submit().await.unwrap_err();

    assert!(matches!(err, SyncError::Validation(_)));
    assert_eq!(sheet.errors().get("identifier"), Some("Name is required"));
    assert_eq!(sheet.form().and_then(|f| f.identifier), Some("  ".to_string()));
    assert_eq!(transport.call_count::<UpdateCoreColdtag>(), 0);
    assert!(ctx.toasts().visible().is_empty());
}

#[tokio::test]
async fn typing_the_name_back_clears_the_error() {
    let (ctx, transport) = context();
    transport.respond::<DisplayCoreColdtagById>(core_by_id(core("c1", "Yard")));

    let sheet = UpdateSheet::<CoreColdtag>::new(&ctx);
    sheet.open(Some("c1".into())).await;
    sheet.edit(|form| form.identifier = Some(String::new()));
    assert!(sheet.submit().await.is_err());
    assert_eq!(sheet.errors().get("identifier"), Some("Name is required"));

    sheet.edit(|form| form.identifier = Some("Yard".into()));
    assert!(sheet.errors().is_empty());
    assert_eq!(sheet.submit().await.unwrap(), UpdateOutcome::Unchanged);
    assert!(sheet.errors().is_empty());
    assert_eq!(transport.call_count::<UpdateCoreColdtag>(), 0);
}

#[tokio::test]
async fn route_cycle_patch_carries_only_changed_fields() {
    let (ctx, transport) = context();
    transport.respond::<DisplayRouteCycleById>(cycle_by_id(cycle("r1", false, false, false)));
    transport.on::<UpdateRouteCycle, _>(|vars| {
        let mut updated = cycle("r1", false, false, false);
        updated["ownerName"] = vars["ownerName"].clone();
        cvp_sync::client::Reply::data(mutation("updateRouteCycle", updated))
    });

    let sheet = UpdateSheet::<RouteCycle>::new(&ctx);
    sheet.open(Some("r1".into())).await;
    sheet.edit(|form| {
        form.owner_name = Some("Globex".into());
        form.temperature_alert_threshold = Some(8.0);
    });

    let updated = sheet.submit().await.unwrap().updated().unwrap();

    assert_eq!(updated.owner_name.as_deref(), Some("Globex"));
    assert_eq!(
        transport.calls_to::<UpdateRouteCycle>(),
        vec![json!({ "routeCycleId": "r1", "ownerName": "Globex" })]
    );
}

#[tokio::test]
async fn ended_route_cycle_cannot_be_edited() {
    let (ctx, transport) = context();
    transport.respond::<DisplayRouteCycleById>(cycle_by_id(cycle("r1", true, true, false)));

    let sheet = UpdateSheet::<RouteCycle>::new(&ctx);
    sheet.open(Some("r1".into())).await;
    sheet.edit(|form| form.description = Some("late note".into()));

    let err = sheet.submit().await.unwrap_err();

    assert!(matches!(err, SyncError::IllegalTransition { .. }));
    assert_eq!(transport.call_count::<UpdateRouteCycle>(), 0);
}

#[tokio::test]
async fn closing_the_sheet_forgets_the_record() {
    let (ctx, transport) = context();
    transport.respond::<DisplayCoreColdtagById>(core_by_id(core("c1", "Yard")));

    let sheet = UpdateSheet::<CoreColdtag>::new(&ctx);
    sheet.open(Some("c1".into())).await;
    assert_eq!(sheet.phase(), Phase::Ready);

    sheet.open(None).await;

    assert_eq!(sheet.phase(), Phase::Idle);
    assert!(sheet.record().is_none());
    assert!(!sheet.edit(|form| form.identifier = Some("x".into())));
    assert_eq!(
        sheet.submit().await.unwrap_err(),
        SyncError::NotSelected("core coldtag")
    );
}
