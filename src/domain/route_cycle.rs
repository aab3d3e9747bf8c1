use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{null_as_false, Creatable, Editable, Listed, NodeColdtagTelemetry};
use crate::client::{All, ById, Root};
use crate::error::SyncError;
use crate::reconcile::{FieldErrors, Validate};
use crate::Record;

/// The node coldtag assigned to a route cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedNode {
    pub id: String,
    pub mac_address: String,
    #[serde(default)]
    pub identifier: Option<String>,
}

/// One shipment journey, tracked by a single node coldtag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct RouteCycle {
    pub id: String,
    #[serde(default)]
    pub node_coldtag: Option<AssignedNode>,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub placed_at: Option<String>,
    #[serde(default)]
    pub departure_latitude: Option<f64>,
    #[serde(default)]
    pub departure_longitude: Option<f64>,
    #[serde(default)]
    pub destination_latitude: Option<f64>,
    #[serde(default)]
    pub destination_longitude: Option<f64>,
    #[serde(default)]
    pub temperature_alert_threshold: Option<f64>,
    #[serde(default)]
    pub humidity_alert_threshold: Option<f64>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub started: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub completed: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub canceled: bool,
    #[serde(default)]
    pub dispatch_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completion_time: Option<DateTime<Utc>>,
    pub created_time: DateTime<Utc>,
    pub updated_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteCycleStatus {
    Pending,
    InProgress,
    Completed,
    Canceled,
}

impl RouteCycle {
    pub fn status(&self) -> RouteCycleStatus {
        if self.canceled {
            RouteCycleStatus::Canceled
        } else if self.completed {
            RouteCycleStatus::Completed
        } else if self.started {
            RouteCycleStatus::InProgress
        } else {
            RouteCycleStatus::Pending
        }
    }

    pub fn is_ended(&self) -> bool {
        self.completed || self.canceled
    }
}

/// Lifecycle changes a route cycle can go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Update,
    Start,
    Complete,
    Cancel,
}

impl Transition {
    pub fn name(self) -> &'static str {
        match self {
            Transition::Update => "update",
            Transition::Start => "start",
            Transition::Complete => "complete",
            Transition::Cancel => "cancel",
        }
    }

    /// Reject transitions the server refuses, before anything is sent.
    pub fn check(self, cycle: &RouteCycle) -> Result<(), SyncError> {
        let reason = match self {
            _ if cycle.is_ended() => Some("route cycle has ended"),
            Transition::Start if cycle.started => Some("route cycle already started"),
            Transition::Complete if !cycle.started => Some("route cycle has not started"),
            _ => None,
        };
        match reason {
            Some(reason) => Err(SyncError::IllegalTransition {
                id: cycle.id.clone(),
                transition: self.name(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields shared by create and update, all optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCycleForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_alert_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_alert_threshold: Option<f64>,
}

impl Validate for RouteCycleForm {
    fn validate(&self) -> FieldErrors {
        FieldErrors::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCycleCreateForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_coldtag_id: Option<String>,
    #[serde(flatten)]
    pub details: RouteCycleForm,
}

impl Validate for RouteCycleCreateForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = self.details.validate();
        errors.require(
            "nodeColdtagId",
            self.node_coldtag_id.as_deref(),
            "Node Coldtag is required",
        );
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCycleIdVariables {
    pub route_cycle_id: String,
}

impl RouteCycleIdVariables {
    pub fn new(id: &str) -> Self {
        Self {
            route_cycle_id: id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRouteCycleVariables {
    pub route_cycle_id: String,
    #[serde(flatten)]
    pub patch: RouteCycleForm,
}

/// A started route cycle together with its node's telemetry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCycleReport {
    #[serde(flatten)]
    pub cycle: RouteCycle,
    #[serde(default)]
    pub telemetry: Option<NodeColdtagTelemetry>,
}

crate::operation! {
    pub DisplayRouteCycleAll: Query<(), Root<All<RouteCycle>>> -> Vec<RouteCycle> {
        |data| data.0.all
    } = "query DisplayRouteCycleAll { displayRouteCycle { all { \
         id nodeColdtag { id macAddress identifier } identifier description ownerName placedAt \
         departureLatitude departureLongitude destinationLatitude destinationLongitude \
         temperatureAlertThreshold humidityAlertThreshold started completed canceled \
         dispatchTime completionTime createdTime updatedTime } } }";

    pub DisplayRouteCycleById: Query<RouteCycleIdVariables, Root<ById<RouteCycle>>> -> RouteCycle {
        |data| data.0.by_id
    } = "query DisplayRouteCycleById($routeCycleId: ID!) { displayRouteCycle { \
         byId(routeCycleId: $routeCycleId) { \
         id nodeColdtag { id macAddress identifier } identifier description ownerName placedAt \
         departureLatitude departureLongitude destinationLatitude destinationLongitude \
         temperatureAlertThreshold humidityAlertThreshold started completed canceled \
         dispatchTime completionTime createdTime updatedTime } } }";

    /// The cycle plus every reading and alert of its node.
    pub DisplayRouteCycleReport:
        Query<RouteCycleIdVariables, Root<ById<RouteCycleReport>>> -> RouteCycleReport {
        |data| data.0.by_id
    } = "query DisplayRouteCycleReport($routeCycleId: ID!) { displayRouteCycle { \
         byId(routeCycleId: $routeCycleId) { \
         id nodeColdtag { id macAddress identifier } identifier description ownerName placedAt \
         departureLatitude departureLongitude destinationLatitude destinationLongitude \
         temperatureAlertThreshold humidityAlertThreshold started completed canceled \
         dispatchTime completionTime createdTime updatedTime \
         telemetry: nodeColdtag { id macAddress identifier events { \
         basic { id connectionStatus temperature humidity latitude longitude eventTime time } \
         alertLiquid { id connectionStatus latitude longitude eventTime time } \
         alertImpact { id connectionStatus latitude longitude eventTime time } } } } } }";

    pub CreateRouteCycle: Mutation<RouteCycleCreateForm, Root<RouteCycle>> -> RouteCycle {
        |data| data.0
    } = "mutation CreateRouteCycle($nodeColdtagId: String!, $identifier: String, \
         $description: String, $ownerName: String, $placedAt: String, \
         $departureLatitude: Float, $departureLongitude: Float, \
         $destinationLatitude: Float, $destinationLongitude: Float, \
         $temperatureAlertThreshold: Float, $humidityAlertThreshold: Float) { \
         createRouteCycle(nodeColdtagId: $nodeColdtagId, identifier: $identifier, \
         description: $description, ownerName: $ownerName, placedAt: $placedAt, \
         departureLatitude: $departureLatitude, departureLongitude: $departureLongitude, \
         destinationLatitude: $destinationLatitude, destinationLongitude: $destinationLongitude, \
         temperatureAlertThreshold: $temperatureAlertThreshold, \
         humidityAlertThreshold: $humidityAlertThreshold) { \
         id nodeColdtag { id macAddress identifier } identifier description ownerName placedAt \
         departureLatitude departureLongitude destinationLatitude destinationLongitude \
         temperatureAlertThreshold humidityAlertThreshold started completed canceled \
         dispatchTime completionTime createdTime updatedTime } }";

    pub UpdateRouteCycle: Mutation<UpdateRouteCycleVariables, Root<RouteCycle>> -> RouteCycle {
        |data| data.0
    } = "mutation UpdateRouteCycle($routeCycleId: ID!, $identifier: String, \
         $description: String, $ownerName: String, $placedAt: String, \
         $departureLatitude: Float, $departureLongitude: Float, \
         $destinationLatitude: Float, $destinationLongitude: Float, \
         $temperatureAlertThreshold: Float, $humidityAlertThreshold: Float) { \
         updateRouteCycle(routeCycleId: $routeCycleId, identifier: $identifier, \
         description: $description, ownerName: $ownerName, placedAt: $placedAt, \
         departureLatitude: $departureLatitude, departureLongitude: $departureLongitude, \
         destinationLatitude: $destinationLatitude, destinationLongitude: $destinationLongitude, \
         temperatureAlertThreshold: $temperatureAlertThreshold, \
         humidityAlertThreshold: $humidityAlertThreshold) { \
         id nodeColdtag { id macAddress identifier } identifier description ownerName placedAt \
         departureLatitude departureLongitude destinationLatitude destinationLongitude \
         temperatureAlertThreshold humidityAlertThreshold started completed canceled \
         dispatchTime completionTime createdTime updatedTime } }";

    pub StartRouteCycle: Mutation<RouteCycleIdVariables, Root<RouteCycle>> -> RouteCycle {
        |data| data.0
    } = "mutation StartRouteCycle($routeCycleId: ID!) { startRouteCycle(routeCycleId: $routeCycleId) { \
         id nodeColdtag { id macAddress identifier } identifier description ownerName placedAt \
         departureLatitude departureLongitude destinationLatitude destinationLongitude \
         temperatureAlertThreshold humidityAlertThreshold started completed canceled \
         dispatchTime completionTime createdTime updatedTime } }";

    pub CompleteRouteCycle: Mutation<RouteCycleIdVariables, Root<RouteCycle>> -> RouteCycle {
        |data| data.0
    } = "mutation CompleteRouteCycle($routeCycleId: ID!) { completeRouteCycle(routeCycleId: $routeCycleId) { \
         id nodeColdtag { id macAddress identifier } identifier description ownerName placedAt \
         departureLatitude departureLongitude destinationLatitude destinationLongitude \
         temperatureAlertThreshold humidityAlertThreshold started completed canceled \
         dispatchTime completionTime createdTime updatedTime } }";

    pub CancelRouteCycle: Mutation<RouteCycleIdVariables, Root<RouteCycle>> -> RouteCycle {
        |data| data.0
    } = "mutation CancelRouteCycle($routeCycleId: ID!) { cancelRouteCycle(routeCycleId: $routeCycleId) { \
         id nodeColdtag { id macAddress identifier } identifier description ownerName placedAt \
         departureLatitude departureLongitude destinationLatitude destinationLongitude \
         temperatureAlertThreshold humidityAlertThreshold started completed canceled \
         dispatchTime completionTime createdTime updatedTime } }";
}

impl Listed for RouteCycle {
    const LABEL: &'static str = "route cycle";

    type All = DisplayRouteCycleAll;
}

impl Creatable for RouteCycle {
    type CreateForm = RouteCycleCreateForm;
    type Create = CreateRouteCycle;

    fn create_variables(form: &RouteCycleCreateForm) -> RouteCycleCreateForm {
        form.clone()
    }
}

impl Editable for RouteCycle {
    type Form = RouteCycleForm;
    type ById = DisplayRouteCycleById;
    type Update = UpdateRouteCycle;

    fn to_form(&self) -> RouteCycleForm {
        RouteCycleForm {
            identifier: self.identifier.clone(),
            description: self.description.clone(),
            owner_name: self.owner_name.clone(),
            placed_at: self.placed_at.clone(),
            departure_latitude: self.departure_latitude,
            departure_longitude: self.departure_longitude,
            destination_latitude: self.destination_latitude,
            destination_longitude: self.destination_longitude,
            temperature_alert_threshold: self.temperature_alert_threshold,
            humidity_alert_threshold: self.humidity_alert_threshold,
        }
    }

    fn by_id_variables(id: &str) -> RouteCycleIdVariables {
        RouteCycleIdVariables::new(id)
    }

    fn update_variables(id: &str, patch: RouteCycleForm) -> UpdateRouteCycleVariables {
        UpdateRouteCycleVariables {
            route_cycle_id: id.to_string(),
            patch,
        }
    }

    fn check_editable(&self) -> Result<(), SyncError> {
        Transition::Update.check(self)
    }
}
