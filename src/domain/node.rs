use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Creatable, Deletable, DeviceCreateForm, DeviceUpdateForm, Editable, Listed,
    NodeColdtagTelemetry,
};
use crate::client::{All, ById, Root};
use crate::Record;

/// A sensor coldtag travelling with the goods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct NodeColdtag {
    pub id: String,
    pub mac_address: String,
    #[serde(default)]
    pub identifier: Option<String>,
    pub created_time: DateTime<Utc>,
    pub updated_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeIdVariables {
    pub node_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeColdtagIdVariables {
    pub node_coldtag_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNodeColdtagVariables {
    pub node_coldtag_id: String,
    #[serde(flatten)]
    pub patch: DeviceUpdateForm,
}

crate::operation! {
    pub DisplayNodeColdtagAll: Query<(), Root<All<NodeColdtag>>> -> Vec<NodeColdtag> {
        |data| data.0.all
    } = "query DisplayNodeColdtagAll { displayNodeColdtag { all { \
         id macAddress identifier createdTime updatedTime } } }";

    pub DisplayNodeColdtagById: Query<NodeIdVariables, Root<ById<NodeColdtag>>> -> NodeColdtag {
        |data| data.0.by_id
    } = "query DisplayNodeColdtagById($nodeId: ID!) { displayNodeColdtag { byId(nodeId: $nodeId) { \
         id macAddress identifier createdTime updatedTime } } }";

    /// Readings and alerts reported by one node.
    pub DisplayNodeColdtagTelemetry:
        Query<NodeIdVariables, Root<ById<NodeColdtagTelemetry>>> -> NodeColdtagTelemetry {
        |data| data.0.by_id
    } = "query DisplayNodeColdtagTelemetry($nodeId: ID!) { displayNodeColdtag { byId(nodeId: $nodeId) { \
         id macAddress identifier events { \
         basic { id connectionStatus temperature humidity latitude longitude eventTime time } \
         alertLiquid { id connectionStatus latitude longitude eventTime time } \
         alertImpact { id connectionStatus latitude longitude eventTime time } } } } }";

    pub CreateNodeColdtag: Mutation<DeviceCreateForm, Root<NodeColdtag>> -> NodeColdtag {
        |data| data.0
    } = "mutation CreateNodeColdtag($macAddress: String!, $identifier: String) { \
         createNodeColdtag(macAddress: $macAddress, identifier: $identifier) { \
         id macAddress identifier createdTime updatedTime } }";

    pub UpdateNodeColdtag: Mutation<UpdateNodeColdtagVariables, Root<NodeColdtag>> -> NodeColdtag {
        |data| data.0
    } = "mutation UpdateNodeColdtag($nodeColdtagId: ID!, $identifier: String) { \
         updateNodeColdtag(nodeColdtagId: $nodeColdtagId, identifier: $identifier) { \
         id macAddress identifier createdTime updatedTime } }";

    /// Soft-deletes the coldtag and returns it.
    pub DeleteNodeColdtag: Mutation<NodeColdtagIdVariables, Root<NodeColdtag>> -> NodeColdtag {
        |data| data.0
    } = "mutation DeleteNodeColdtag($nodeColdtagId: ID!) { \
         deleteNodeColdtag(nodeColdtagId: $nodeColdtagId) { \
         id macAddress identifier createdTime updatedTime } }";
}

impl Listed for NodeColdtag {
    const LABEL: &'static str = "node coldtag";

    type All = DisplayNodeColdtagAll;
}

impl Creatable for NodeColdtag {
    type CreateForm = DeviceCreateForm;
    type Create = CreateNodeColdtag;

    fn create_variables(form: &DeviceCreateForm) -> DeviceCreateForm {
        form.clone()
    }
}

impl Editable for NodeColdtag {
    type Form = DeviceUpdateForm;
    type ById = DisplayNodeColdtagById;
    type Update = UpdateNodeColdtag;

    fn to_form(&self) -> DeviceUpdateForm {
        DeviceUpdateForm {
            identifier: self.identifier.clone(),
        }
    }

    fn by_id_variables(id: &str) -> NodeIdVariables {
        NodeIdVariables {
            node_id: id.to_string(),
        }
    }

    fn update_variables(id: &str, patch: DeviceUpdateForm) -> UpdateNodeColdtagVariables {
        UpdateNodeColdtagVariables {
            node_coldtag_id: id.to_string(),
            patch,
        }
    }
}

impl Deletable for NodeColdtag {
    type Delete = DeleteNodeColdtag;

    fn delete_variables(id: &str) -> NodeColdtagIdVariables {
        NodeColdtagIdVariables {
            node_coldtag_id: id.to_string(),
        }
    }
}
