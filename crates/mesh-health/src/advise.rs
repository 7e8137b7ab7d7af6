use mesh_proto::receipt::{HealthStatus, Thresholds};
use mesh_proto::telemetry::RadioConfig;

use crate::window::WindowSummary;

/// Shortest advertisement interval a patch may suggest.
pub const MIN_ADV_INTERVAL_MS: f64 = 200.0;
/// Step applied when shortening the advertisement interval.
pub const ADV_STEP_MS: f64 = 100.0;
/// Transmit power step when Wi-Fi Direct is already on.
pub const TX_STEP_DBM: f64 = 3.0;

/// Which lever the advisor pulls. Reason and action both derive from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnosis {
    Healthy,
    DeliveryShortfall,
    LatencyOverage,
    LowSamples,
}

/// One suggested radio change, kept at full precision until the receipt
/// is assembled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatchOp {
    WifiDirect(bool),
    TxDbm(f64),
    AdvIntervalMs(f64),
    Ttl(u32),
}

impl PatchOp {
    pub fn key(&self) -> &'static str {
        match self {
            PatchOp::WifiDirect(_) => "radio.wifi_direct",
            PatchOp::TxDbm(_) => "radio.tx_dbm",
            PatchOp::AdvIntervalMs(_) => "radio.adv_interval_ms",
            PatchOp::Ttl(_) => "radio.ttl",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Advice {
    pub diagnosis: Diagnosis,
    /// Empty when healthy.
    pub reason: Option<String>,
    pub action: String,
    /// `None` when healthy; otherwise always at least one op.
    pub patch: Option<Vec<PatchOp>>,
}

/// Deliberately independent of the classifier's branch order: a red verdict
/// caused by an empty latency sample still reports a delivery shortfall
/// whenever delivery is below threshold.
pub fn diagnose(status: HealthStatus, s: &WindowSummary, th: &Thresholds) -> Diagnosis {
    if status.is_healthy() {
        Diagnosis::Healthy
    } else if s.delivery < th.delivery {
        Diagnosis::DeliveryShortfall
    } else if s.p95 > th.p95_ms as f64 {
        Diagnosis::LatencyOverage
    } else {
        Diagnosis::LowSamples
    }
}

pub fn advise(status: HealthStatus, s: &WindowSummary, th: &Thresholds) -> Advice {
    let diagnosis = diagnose(status, s, th);
    let radio = &s.radio;

    let (reason, action, patch) = match diagnosis {
        Diagnosis::Healthy => (None, "hold parameters; keep monitoring".to_string(), None),
        Diagnosis::DeliveryShortfall => {
            let reason = format!(
                "delivery {}% < {}%",
                (s.delivery * 100.0).round(),
                (th.delivery * 100.0).round()
            );
            let (action, lever) = if radio.wifi_direct {
                (
                    "increase TX power +3 dB; shorten adv interval (-100ms)",
                    PatchOp::TxDbm(radio.tx_dbm + TX_STEP_DBM),
                )
            } else {
                ("enable Wi-Fi Direct or increase TX power +3 dB", PatchOp::WifiDirect(true))
            };
            (Some(reason), action.to_string(), Some(vec![lever, shorter_adv(radio)]))
        }
        Diagnosis::LatencyOverage => {
            let reason = format!("p95 latency {}ms > {}ms", s.p95.round(), th.p95_ms);
            let mut ops = Vec::with_capacity(2);
            if radio.ttl < th.ttl_max && s.median_hops < 3.0 {
                ops.push(PatchOp::Ttl((radio.ttl + 1).min(th.ttl_max)));
            }
            ops.push(shorter_adv(radio));
            (
                Some(reason),
                "shorten adv interval (-100ms) or add 1 hop TTL if median hops < 3".to_string(),
                Some(ops),
            )
        }
        Diagnosis::LowSamples => (
            Some("mesh unstable (low samples)".to_string()),
            "keep radio steady; gather more samples".to_string(),
            // no-op placeholder: no confident lever yet, but keep the patch populated
            Some(vec![PatchOp::AdvIntervalMs(radio.adv_interval_ms)]),
        ),
    };

    Advice { diagnosis, reason, action, patch }
}

fn shorter_adv(radio: &RadioConfig) -> PatchOp {
    PatchOp::AdvIntervalMs((radio.adv_interval_ms - ADV_STEP_MS).max(MIN_ADV_INTERVAL_MS))
}
