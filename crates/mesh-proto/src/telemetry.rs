use serde::{Deserialize, Serialize};

/// Link parameters of the local radio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioConfig {
    pub tx_dbm: f64,
    pub adv_interval_ms: f64,
    pub ttl: u32,
    pub wifi_direct: bool,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            tx_dbm: 0.0,
            adv_interval_ms: 600.0,
            ttl: 3,
            wifi_direct: false,
        }
    }
}

impl RadioConfig {
    /// Shallow merge: only fields present on the update are overridden.
    pub fn apply(&mut self, upd: &RadioUpdate) {
        if let Some(v) = upd.tx_dbm {
            self.tx_dbm = v;
        }
        if let Some(v) = upd.adv_interval_ms {
            self.adv_interval_ms = v;
        }
        if let Some(v) = upd.ttl {
            self.ttl = v;
        }
        if let Some(v) = upd.wifi_direct {
            self.wifi_direct = v;
        }
    }
}

/// Partial radio snapshot as it appears in the event log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadioUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_dbm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adv_interval_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi_direct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<i64>,
}

/// One line of the mesh event log. `ts` is Unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MeshEvent {
    Radio(RadioUpdate),
    MessageSent {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ts: Option<i64>,
    },
    MessageDelivered {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hops: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        latency_ms: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ts: Option<i64>,
    },
    PeerSeen {
        peer: String,
        rssi: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ts: Option<i64>,
    },
}

impl MeshEvent {
    pub fn ts(&self) -> Option<i64> {
        match self {
            MeshEvent::Radio(r) => r.ts,
            MeshEvent::MessageSent { ts, .. }
            | MeshEvent::MessageDelivered { ts, .. }
            | MeshEvent::PeerSeen { ts, .. } => *ts,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MeshEvent::Radio(_) => "radio",
            MeshEvent::MessageSent { .. } => "message_sent",
            MeshEvent::MessageDelivered { .. } => "message_delivered",
            MeshEvent::PeerSeen { .. } => "peer_seen",
        }
    }
}
