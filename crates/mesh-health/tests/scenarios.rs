use mesh_health::{evaluate, HealthConfig};
use mesh_proto::receipt::{HealthStatus, PatchEntry, PatchValue};
use mesh_proto::telemetry::{MeshEvent, RadioUpdate};

const NOW: i64 = 1_700_000_000;

fn sent(i: usize) -> MeshEvent {
    MeshEvent::MessageSent { id: format!("m{}", i), ts: Some(NOW - 120 + i as i64) }
}

fn delivered(i: usize, latency_ms: f64, hops: u32) -> MeshEvent {
    MeshEvent::MessageDelivered {
        id: format!("m{}", i),
        hops: Some(f64::from(hops)),
        latency_ms: Some(latency_ms),
        ts: Some(NOW - 118 + i as i64),
    }
}

fn peers(n: usize) -> Vec<MeshEvent> {
    (0..n)
        .map(|p| MeshEvent::PeerSeen { peer: format!("P:{:x}", p), rssi: -61.0, ts: Some(NOW - 30) })
        .collect()
}

#[test]
fn healthy_mesh_is_green_with_null_next_try() {
    let mut evs = vec![MeshEvent::Radio(RadioUpdate {
        tx_dbm: Some(4.0),
        adv_interval_ms: Some(400.0),
        ttl: Some(3),
        wifi_direct: Some(false),
        ts: Some(NOW - 130),
    })];
    for i in 0..25 {
        evs.push(sent(i));
        if i < 24 {
            evs.push(delivered(i, 500.0 + 50.0 * i as f64, 2 + (i % 2) as u32));
        }
    }
    evs.extend(peers(9));

    let out = evaluate(&evs, NOW, &HealthConfig::default());
    assert_eq!(out.status, HealthStatus::Green);
    assert!((out.summary.delivery - 0.96).abs() < 1e-12);
    assert!(out.summary.p95 < 2000.0 && out.summary.p95 > 1500.0);

    let r = out.receipt;
    assert!(r.but.is_empty());
    assert!(r.next_try.is_none());
    assert_eq!(r.because.len(), 3);
    assert_eq!(r.because[0], "delivery 96.0% in last 10m");
    assert_eq!(r.so, "hold parameters; keep monitoring");
    assert_eq!(r.telem.reach_peers, 9);
    assert_eq!(r.telem.radio.adv_interval_ms, 400);
}

#[test]
fn poor_delivery_suggests_wifi_direct() {
    let mut evs = Vec::new();
    for i in 0..25 {
        evs.push(sent(i));
        if i < 10 {
            evs.push(delivered(i, 800.0, 2));
        }
    }
    evs.extend(peers(4));

    let out = evaluate(&evs, NOW, &HealthConfig::default());
    assert_eq!(out.status, HealthStatus::Amber);
    assert_eq!(out.receipt.but, vec!["delivery 40% < 95%".to_string()]);

    let patch = out.receipt.next_try.expect("unhealthy receipt carries a patch").patch;
    assert_eq!(patch[0], PatchEntry { key: "radio.wifi_direct".into(), to: PatchValue::Flag(true) });
    assert_eq!(patch[1], PatchEntry { key: "radio.adv_interval_ms".into(), to: PatchValue::Int(500) });
}

#[test]
fn empty_log_is_red_via_delivery_branch() {
    let out = evaluate(&[], NOW, &HealthConfig::default());
    assert_eq!(out.status, HealthStatus::Red);
    assert_eq!(out.summary.delivery, 0.0);

    assert_eq!(out.summary_line(), "status=red delivery=0.0% p95=0ms peers=0");

    let r = out.receipt;
    assert_eq!(r.but, vec!["delivery 0% < 95%".to_string()]);
    assert_ne!(r.but[0], "mesh unstable (low samples)");
    assert_eq!(r.telem.latency_ms_p50, 0);
    assert_eq!(r.telem.latency_ms_p95, 0);
    assert_eq!(r.telem.hops_median, 0.0);
    assert_eq!(r.because[2], "reach 0 peers · median hops 0");
    let patch = r.next_try.expect("patch").patch;
    assert_eq!(patch.len(), 2);
    assert_eq!(patch[0].to, PatchValue::Flag(true));
}

#[test]
fn stale_events_fall_out_of_the_window() {
    let mut evs = Vec::new();
    for i in 0..5 {
        evs.push(MeshEvent::MessageSent { id: format!("old{}", i), ts: Some(NOW - 5_000) });
    }
    for i in 0..4 {
        evs.push(sent(i));
        evs.push(delivered(i, 300.0, 2));
    }
    let out = evaluate(&evs, NOW, &HealthConfig::default());
    assert_eq!(out.summary.sent, 4);
    assert_eq!(out.status, HealthStatus::Green);

    let narrow = HealthConfig { window_sec: 60, ..HealthConfig::default() };
    let out = evaluate(&evs, NOW, &narrow);
    assert_eq!(out.summary.sent, 0);
    assert_eq!(out.receipt.telem.window_sec, 60);
    assert_eq!(out.receipt.because[0], "delivery 0.0% in last 1m");
}

#[test]
fn evaluation_is_repeatable() {
    let mut evs = Vec::new();
    for i in 0..12 {
        evs.push(sent(i));
        if i % 3 != 0 {
            evs.push(delivered(i, 1800.0 + 90.0 * i as f64, 4));
        }
    }
    let cfg = HealthConfig::default();
    let a = evaluate(&evs, NOW, &cfg);
    let b = evaluate(&evs, NOW, &cfg);
    assert_eq!(a.receipt, b.receipt);
    assert_eq!(
        serde_json::to_string(&a.receipt).unwrap(),
        serde_json::to_string(&b.receipt).unwrap()
    );
}

#[test]
fn slow_mesh_with_good_delivery_targets_latency() {
    let mut evs = vec![MeshEvent::Radio(RadioUpdate { ttl: Some(2), ts: Some(NOW - 200), ..Default::default() })];
    for i in 0..20 {
        evs.push(sent(i));
        evs.push(delivered(i, 2100.0 + 10.0 * i as f64, 2));
    }
    let out = evaluate(&evs, NOW, &HealthConfig::default());
    assert_eq!(out.status, HealthStatus::Amber);
    assert!(out.receipt.but[0].starts_with("p95 latency "));
    let patch = out.receipt.next_try.expect("patch").patch;
    assert_eq!(patch[0], PatchEntry { key: "radio.ttl".into(), to: PatchValue::Int(3) });
    assert_eq!(patch[1].key, "radio.adv_interval_ms");
}

#[test]
fn delivery_percentage_ties_round_up_once() {
    let mut evs = Vec::new();
    for i in 0..16 {
        evs.push(sent(i));
        if i < 5 {
            evs.push(delivered(i, 700.0, 2));
        }
    }
    let out = evaluate(&evs, NOW, &HealthConfig::default());
    assert_eq!(out.summary.delivered, 5);
    assert_eq!(out.receipt.because[0], "delivery 31.3% in last 10m");
    assert_eq!(out.receipt.telem.delivery_success, 0.3125);
    assert_eq!(out.summary_line(), "status=amber delivery=31.3% p95=700ms peers=0");
}

#[test]
fn float_hops_still_count_as_delivered() {
    let line = r#"{"type":"message_delivered","id":"m0","hops":3.0,"latency_ms":800,"ts":1699999990}"#;
    let evs = vec![sent(0), serde_json::from_str::<MeshEvent>(line).unwrap()];
    let out = evaluate(&evs, NOW, &HealthConfig::default());
    assert_eq!(out.summary.delivery, 1.0);
    assert_eq!(out.summary.median_hops, 3.0);
    assert_eq!(out.status, HealthStatus::Green);
}
