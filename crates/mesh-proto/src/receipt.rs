use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed model tag stamped on every receipt.
pub const MODEL_TAG: &str = "mesh/bluetooth-wifi-store-and-forward";

/// Claim every receipt makes; `attrs.status` and `but` qualify it.
pub const CLAIM: &str = "Mesh is live and healthy";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Green,
    Amber,
    Red,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Green => "green",
            HealthStatus::Amber => "amber",
            HealthStatus::Red => "red",
        }
    }

    pub fn is_healthy(&self) -> bool {
        *self == HealthStatus::Green
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum delivery ratio (0..1) for a green verdict.
    pub delivery: f64,
    /// Maximum p95 latency for a green verdict.
    pub p95_ms: u64,
    /// Upper bound for any suggested TTL.
    pub ttl_max: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { delivery: 0.95, p95_ms: 2000, ttl_max: 4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadioTelem {
    pub tx_dbm: i64,
    pub adv_interval_ms: i64,
    pub ttl: u32,
    pub wifi_direct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telem {
    pub window_sec: u64,
    pub delivery_success: f64,
    pub latency_ms_p50: i64,
    pub latency_ms_p95: i64,
    pub reach_peers: usize,
    pub hops_median: f64,
    pub radio: RadioTelem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attrs {
    pub status: HealthStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    Flag(bool),
    Int(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchEntry {
    pub key: String,
    pub to: PatchValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextTry {
    pub patch: Vec<PatchEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub claim: String,
    pub because: Vec<String>,
    pub but: Vec<String>,
    pub so: String,
    pub telem: Telem,
    pub threshold: Thresholds,
    pub model: String,
    pub attrs: Attrs,
    pub next_try: Option<NextTry>,
}
