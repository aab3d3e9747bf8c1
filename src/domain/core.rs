use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Creatable, Deletable, DeviceCreateForm, DeviceUpdateForm, Editable, Listed,
    CoreColdtagTelemetry,
};
use crate::client::{All, ById, Root};
use crate::Record;

/// A gateway coldtag relaying node readings to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct CoreColdtag {
    pub id: String,
    pub mac_address: String,
    #[serde(default)]
    pub identifier: Option<String>,
    pub created_time: DateTime<Utc>,
    pub updated_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreIdVariables {
    pub core_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreColdtagIdVariables {
    pub core_coldtag_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCoreColdtagVariables {
    pub core_coldtag_id: String,
    #[serde(flatten)]
    pub patch: DeviceUpdateForm,
}

crate::operation! {
    pub DisplayCoreColdtagAll: Query<(), Root<All<CoreColdtag>>> -> Vec<CoreColdtag> {
        |data| data.0.all
    } = "query DisplayCoreColdtagAll { displayCoreColdtag { all { \
         id macAddress identifier createdTime updatedTime } } }";

    pub DisplayCoreColdtagById: Query<CoreIdVariables, Root<ById<CoreColdtag>>> -> CoreColdtag {
        |data| data.0.by_id
    } = "query DisplayCoreColdtagById($coreId: ID!) { displayCoreColdtag { byId(coreId: $coreId) { \
         id macAddress identifier createdTime updatedTime } } }";

    /// Gateway heartbeat events, for the telemetry view.
    pub DisplayCoreColdtagTelemetry:
        Query<CoreIdVariables, Root<ById<CoreColdtagTelemetry>>> -> CoreColdtagTelemetry {
        |data| data.0.by_id
    } = "query DisplayCoreColdtagTelemetry($coreId: ID!) { displayCoreColdtag { byId(coreId: $coreId) { \
         id macAddress identifier events { basic { id connectionStatus eventTime time } } } } }";

    pub CreateCoreColdtag: Mutation<DeviceCreateForm, Root<CoreColdtag>> -> CoreColdtag {
        |data| data.0
    } = "mutation CreateCoreColdtag($macAddress: String!, $identifier: String) { \
         createCoreColdtag(macAddress: $macAddress, identifier: $identifier) { \
         id macAddress identifier createdTime updatedTime } }";

    pub UpdateCoreColdtag: Mutation<UpdateCoreColdtagVariables, Root<CoreColdtag>> -> CoreColdtag {
        |data| data.0
    } = "mutation UpdateCoreColdtag($coreColdtagId: ID!, $identifier: String) { \
         updateCoreColdtag(coreColdtagId: $coreColdtagId, identifier: $identifier) { \
         id macAddress identifier createdTime updatedTime } }";

    /// Soft-deletes the coldtag and returns it.
    pub DeleteCoreColdtag: Mutation<CoreColdtagIdVariables, Root<CoreColdtag>> -> CoreColdtag {
        |data| data.0
    } = "mutation DeleteCoreColdtag($coreColdtagId: ID!) { \
         deleteCoreColdtag(coreColdtagId: $coreColdtagId) { \
         id macAddress identifier createdTime updatedTime } }";
}

impl Listed for CoreColdtag {
    const LABEL: &'static str = "core coldtag";

    type All = DisplayCoreColdtagAll;
}

impl Creatable for CoreColdtag {
    type CreateForm = DeviceCreateForm;
    type Create = CreateCoreColdtag;

    fn create_variables(form: &DeviceCreateForm) -> DeviceCreateForm {
        form.clone()
    }
}

impl Editable for CoreColdtag {
    type Form = DeviceUpdateForm;
    type ById = DisplayCoreColdtagById;
    type Update = UpdateCoreColdtag;

    fn to_form(&self) -> DeviceUpdateForm {
        DeviceUpdateForm {
            identifier: self.identifier.clone(),
        }
    }

    fn by_id_variables(id: &str) -> CoreIdVariables {
        CoreIdVariables {
            core_id: id.to_string(),
        }
    }

    fn update_variables(id: &str, patch: DeviceUpdateForm) -> UpdateCoreColdtagVariables {
        UpdateCoreColdtagVariables {
            core_coldtag_id: id.to_string(),
            patch,
        }
    }
}

impl Deletable for CoreColdtag {
    type Delete = DeleteCoreColdtag;

    fn delete_variables(id: &str) -> CoreColdtagIdVariables {
        CoreColdtagIdVariables {
            core_coldtag_id: id.to_string(),
        }
    }
}
