//! Typed records and GraphQL operations of the cold-chain dashboard.
//!
//! Core coldtags are gateways, node coldtags are the sensors they relay,
//! and route cycles are shipment journeys tracked by one node. The binding
//! traits below tell the generic page controllers which operations load,
//! create, edit and delete each kind of record.

mod core;
mod node;
mod route_cycle;
mod telemetry;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::client::Operation;
use crate::error::SyncError;
use crate::reconcile::{FieldErrors, Record, Validate};

pub use self::core::{
    CoreColdtag, CoreColdtagIdVariables, CoreIdVariables, CreateCoreColdtag, DeleteCoreColdtag,
    DisplayCoreColdtagAll, DisplayCoreColdtagById, DisplayCoreColdtagTelemetry,
    UpdateCoreColdtag, UpdateCoreColdtagVariables,
};
pub use self::node::{
    CreateNodeColdtag, DeleteNodeColdtag, DisplayNodeColdtagAll, DisplayNodeColdtagById,
    DisplayNodeColdtagTelemetry, NodeColdtag, NodeColdtagIdVariables, NodeIdVariables,
    UpdateNodeColdtag, UpdateNodeColdtagVariables,
};
pub use self::route_cycle::{
    AssignedNode, CancelRouteCycle, CompleteRouteCycle, CreateRouteCycle, DisplayRouteCycleAll,
    DisplayRouteCycleById, DisplayRouteCycleReport, RouteCycle, RouteCycleCreateForm,
    RouteCycleForm, RouteCycleIdVariables, RouteCycleReport, RouteCycleStatus, StartRouteCycle,
    Transition, UpdateRouteCycle, UpdateRouteCycleVariables,
};
pub use self::telemetry::{
    ConnectionStatus, Coordinate, CoreColdtagEvent, CoreColdtagEvents, CoreColdtagTelemetry,
    NodeColdtagAlertEvent, NodeColdtagEvent, NodeColdtagEvents, NodeColdtagTelemetry,
};

/// A record kind with a "display all" query.
pub trait Listed: Record + DeserializeOwned + fmt::Debug {
    /// Human label used in logs and `NotSelected` errors.
    const LABEL: &'static str;

    type All: Operation<Variables = (), Output = Vec<Self>>;
}

/// A record kind created from a validated form.
pub trait Creatable: Record {
    type CreateForm: Validate + Clone + Default + fmt::Debug + Send + Sync + 'static;
    type Create: Operation<Output = Self>;

    fn create_variables(form: &Self::CreateForm) -> <Self::Create as Operation>::Variables;
}

/// A record kind edited through a partial-update form.
///
/// `Form` has every field optional and skipped when `None`, so a patch built
/// from a `ChangeSet` carries only the changed fields.
pub trait Editable: Record + fmt::Debug {
    type Form: Validate
        + Serialize
        + DeserializeOwned
        + Clone
        + Default
        + PartialEq
        + fmt::Debug
        + Send
        + Sync
        + 'static;
    type ById: Operation<Output = Self>;
    type Update: Operation<Output = Self>;

    /// Form values as originally fetched.
    fn to_form(&self) -> Self::Form;

    fn by_id_variables(id: &str) -> <Self::ById as Operation>::Variables;

    fn update_variables(id: &str, patch: Self::Form) -> <Self::Update as Operation>::Variables;

    /// Reject edits the server would refuse for this record's state.
    fn check_editable(&self) -> Result<(), SyncError> {
        Ok(())
    }
}

/// A record kind with a delete mutation returning the deleted record.
pub trait Deletable: Record {
    type Delete: Operation<Output = Self>;

    fn delete_variables(id: &str) -> <Self::Delete as Operation>::Variables;
}

/// Create form shared by core and node coldtags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCreateForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl Validate for DeviceCreateForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require(
            "macAddress",
            self.mac_address.as_deref(),
            "MAC Address is required",
        );
        errors
    }
}

/// Update form shared by core and node coldtags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUpdateForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl Validate for DeviceUpdateForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("identifier", self.identifier.as_deref(), "Name is required");
        errors
    }
}

/// Nullable GraphQL booleans read as `false`.
pub(crate) fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
