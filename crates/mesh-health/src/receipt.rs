use mesh_proto::receipt::{
    Attrs, HealthStatus, NextTry, PatchEntry, PatchValue, RadioTelem, Receipt, Telem, CLAIM, MODEL_TAG,
};

use crate::advise::{Advice, PatchOp};
use crate::window::WindowSummary;
use crate::HealthConfig;

/// Assemble the receipt. All integer casts happen here and nowhere upstream.
pub fn build(s: &WindowSummary, status: HealthStatus, advice: &Advice, cfg: &HealthConfig) -> Receipt {
    let because = vec![
        format!("delivery {:.1}% in last {}", delivery_pct(s.delivery), window_label(cfg.window_sec)),
        format!("latency p50 {}ms / p95 {}ms", round_ms(s.p50), round_ms(s.p95)),
        format!("reach {} peers · median hops {}", s.reach, s.median_hops),
    ];

    let but = match (&advice.reason, status.is_healthy()) {
        (Some(r), false) => vec![r.clone()],
        _ => Vec::new(),
    };

    let telem = Telem {
        window_sec: cfg.window_sec,
        delivery_success: (s.delivery * 10_000.0).round() / 10_000.0,
        latency_ms_p50: round_ms(s.p50),
        latency_ms_p95: round_ms(s.p95),
        reach_peers: s.reach,
        hops_median: s.median_hops,
        radio: RadioTelem {
            tx_dbm: s.radio.tx_dbm.trunc() as i64,
            adv_interval_ms: s.radio.adv_interval_ms.trunc() as i64,
            ttl: s.radio.ttl,
            wifi_direct: s.radio.wifi_direct,
        },
    };

    let next_try = advice.patch.as_ref().map(|ops| NextTry {
        patch: ops.iter().map(patch_entry).collect(),
    });

    Receipt {
        claim: CLAIM.to_string(),
        because,
        but,
        so: advice.action.clone(),
        telem,
        threshold: cfg.threshold,
        model: MODEL_TAG.to_string(),
        attrs: Attrs { status },
        next_try,
    }
}

/// One-line console form: `status=<verdict> delivery=<pct>% p95=<ms>ms peers=<n>`.
pub fn summary_line(s: &WindowSummary, r: &Receipt) -> String {
    format!(
        "status={} delivery={:.1}% p95={}ms peers={}",
        r.attrs.status,
        delivery_pct(s.delivery),
        r.telem.latency_ms_p95,
        r.telem.reach_peers,
    )
}

/// Delivery as a percentage with one decimal, ties rounded up.
pub fn delivery_pct(delivery: f64) -> f64 {
    (delivery * 1000.0).round() / 10.0
}

fn patch_entry(op: &PatchOp) -> PatchEntry {
    let to = match *op {
        PatchOp::WifiDirect(on) => PatchValue::Flag(on),
        PatchOp::TxDbm(v) | PatchOp::AdvIntervalMs(v) => PatchValue::Int(v.trunc() as i64),
        PatchOp::Ttl(t) => PatchValue::Int(i64::from(t)),
    };
    PatchEntry { key: op.key().to_string(), to }
}

fn round_ms(v: f64) -> i64 {
    v.round() as i64
}

// "10m" for whole minutes, "45s" otherwise
fn window_label(window_sec: u64) -> String {
    if window_sec > 0 && window_sec % 60 == 0 {
        format!("{}m", window_sec / 60)
    } else {
        format!("{}s", window_sec)
    }
}
