pub mod advise;
pub mod classify;
pub mod doctor;
pub mod quantile;
pub mod receipt;
pub mod window;

use tracing::info;

use mesh_proto::receipt::{HealthStatus, Receipt, Thresholds};
use mesh_proto::telemetry::{MeshEvent, RadioConfig};

use crate::window::{WindowStats, WindowSummary};

/// Everything the pipeline needs besides the events themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthConfig {
    /// Trailing window length in seconds.
    pub window_sec: u64,
    pub threshold: Thresholds,
    /// Radio state assumed before the first `radio` event in the window.
    pub radio_seed: RadioConfig,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            window_sec: 600,
            threshold: Thresholds::default(),
            radio_seed: RadioConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Evaluation {
    pub summary: WindowSummary,
    pub status: HealthStatus,
    pub receipt: Receipt,
}

/// Reduce, classify, advise and assemble one receipt. Every call owns its
/// accumulators, so runs over overlapping windows never interfere.
pub fn evaluate(events: &[MeshEvent], now: i64, cfg: &HealthConfig) -> Evaluation {
    let stats = WindowStats::reduce(events, now, cfg.window_sec, cfg.radio_seed);
    let summary = stats.summary();
    let status = classify::classify(&summary, &cfg.threshold);
    let advice = advise::advise(status, &summary, &cfg.threshold);
    info!(
        "health: status={} delivery={:.3} p95={:.0}ms samples={}",
        status, summary.delivery, summary.p95, summary.latency_samples
    );
    let receipt = receipt::build(&summary, status, &advice, cfg);
    Evaluation { summary, status, receipt }
}

impl Evaluation {
    pub fn summary_line(&self) -> String {
        receipt::summary_line(&self.summary, &self.receipt)
    }
}
