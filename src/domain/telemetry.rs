use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Both halves or nothing.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        Some(Self {
            latitude: latitude?,
            longitude: longitude?,
        })
    }
}

/// Core heartbeat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreColdtagEvent {
    pub id: String,
    pub connection_status: ConnectionStatus,
    pub event_time: DateTime<Utc>,
    pub time: DateTime<Utc>,
}

/// Periodic node reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeColdtagEvent {
    pub id: String,
    pub connection_status: ConnectionStatus,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub event_time: DateTime<Utc>,
    pub time: DateTime<Utc>,
}

impl NodeColdtagEvent {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }
}

/// Liquid or impact alert raised by a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeColdtagAlertEvent {
    pub id: String,
    pub connection_status: ConnectionStatus,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub event_time: DateTime<Utc>,
    pub time: DateTime<Utc>,
}

impl NodeColdtagAlertEvent {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreColdtagEvents {
    #[serde(default)]
    pub basic: Vec<CoreColdtagEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeColdtagEvents {
    #[serde(default)]
    pub basic: Vec<NodeColdtagEvent>,
    #[serde(default)]
    pub alert_liquid: Vec<NodeColdtagAlertEvent>,
    #[serde(default)]
    pub alert_impact: Vec<NodeColdtagAlertEvent>,
}

/// A core coldtag with its event history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreColdtagTelemetry {
    pub id: String,
    pub mac_address: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub events: CoreColdtagEvents,
}

impl CoreColdtagTelemetry {
    pub fn last_seen(&self) -> Option<&CoreColdtagEvent> {
        self.events.basic.iter().max_by_key(|e| e.event_time)
    }
}

/// A node coldtag with its readings and alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeColdtagTelemetry {
    pub id: String,
    pub mac_address: String,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub events: NodeColdtagEvents,
}

impl NodeColdtagTelemetry {
    pub fn latest_reading(&self) -> Option<&NodeColdtagEvent> {
        self.events.basic.iter().max_by_key(|e| e.event_time)
    }

    pub fn alert_count(&self) -> usize {
        self.events.alert_liquid.len() + self.events.alert_impact.len()
    }

    /// Readings above `threshold` degrees.
    pub fn temperature_breaches(&self, threshold: f64) -> impl Iterator<Item = &NodeColdtagEvent> {
        self.events
            .basic
            .iter()
            .filter(move |e| e.temperature.is_some_and(|t| t > threshold))
    }
}
