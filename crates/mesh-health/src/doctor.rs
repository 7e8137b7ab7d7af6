use anyhow::Result;

use crate::advise::MIN_ADV_INTERVAL_MS;
use crate::HealthConfig;

pub fn check_config(cfg: &HealthConfig) -> Result<()> {
    let th = &cfg.threshold;
    anyhow::ensure!(cfg.window_sec > 0, "window.window_sec must be > 0");
    anyhow::ensure!(
        th.delivery > 0.0 && th.delivery <= 1.0,
        "threshold.delivery should be in (0, 1], got {}",
        th.delivery
    );
    anyhow::ensure!(th.p95_ms > 0, "threshold.p95_ms must be > 0");
    anyhow::ensure!(th.ttl_max >= 1, "threshold.ttl_max must be >= 1");

    let r = &cfg.radio_seed;
    anyhow::ensure!(
        r.ttl <= th.ttl_max,
        "radio.ttl ({}) exceeds threshold.ttl_max ({})",
        r.ttl,
        th.ttl_max
    );
    anyhow::ensure!(
        r.adv_interval_ms >= MIN_ADV_INTERVAL_MS,
        "radio.adv_interval_ms too short ({}ms < {}ms)",
        r.adv_interval_ms,
        MIN_ADV_INTERVAL_MS
    );
    anyhow::ensure!(r.tx_dbm.is_finite(), "radio.tx_dbm is not a number");
    Ok(())
}
