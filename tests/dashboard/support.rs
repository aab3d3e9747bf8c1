//! Fixtures: JSON records as the API returns them, and a scripted context.

use cvp_sync::{AppContext, ScriptedTransport, SyncConfig};
use serde_json::{json, Value};

pub const T0: &str = "2024-05-01T10:00:00Z";

pub fn context() -> (AppContext, ScriptedTransport) {
    let transport = ScriptedTransport::new();
    let ctx = AppContext::new(transport.clone(), SyncConfig::default());
    (ctx, transport)
}

pub fn core(id: &str, identifier: &str) -> Value {
    json!({
        "id": id,
        "macAddress": format!("AA:{id}"),
        "identifier": identifier,
        "createdTime": T0,
        "updatedTime": T0
    })
}

pub fn node(id: &str, identifier: &str) -> Value {
    json!({
        "id": id,
        "macAddress": format!("BB:{id}"),
        "identifier": identifier,
        "createdTime": T0,
        "updatedTime": T0
    })
}

pub fn cycle(id: &str, started: bool, completed: bool, canceled: bool) -> Value {
    json!({
        "id": id,
        "nodeColdtag": { "id": "n1", "macAddress": "BB:n1", "identifier": "Pallet 1" },
        "identifier": format!("Cycle {id}"),
        "ownerName": "ACME",
        "temperatureAlertThreshold": 8.0,
        "started": started,
        "completed": completed,
        "canceled": canceled,
        "createdTime": T0,
        "updatedTime": T0
    })
}

pub fn core_list(items: Vec<Value>) -> Value {
    json!({ "displayCoreColdtag": { "all": items } })
}

pub fn core_by_id(item: Value) -> Value {
    json!({ "displayCoreColdtag": { "byId": item } })
}

pub fn cycle_list(items: Vec<Value>) -> Value {
    json!({ "displayRouteCycle": { "all": items } })
}

pub fn cycle_by_id(item: Value) -> Value {
    json!({ "displayRouteCycle": { "byId": item } })
}

/// Wrap a mutation result under its root field.
pub fn mutation(root: &str, item: Value) -> Value {
    let mut data = serde_json::Map::new();
    data.insert(root.to_string(), item);
    Value::Object(data)
}
