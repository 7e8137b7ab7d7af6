use std::path::Path;

use anyhow::{Context, Result};
use mesh_proto::telemetry::{MeshEvent, RadioUpdate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::{fs, io::AsyncWriteExt};
use tracing::info;

const MESSAGES: usize = 25;
const PEERS_PER_MESSAGE: usize = 3;
const DELIVERY_P: f64 = 0.96;

/// RNG for [`synthesize`]: fixed when a seed is given, from entropy otherwise.
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// A plausible, mostly healthy minute of mesh traffic ending at `now`.
pub fn synthesize<R: Rng>(now: i64, rng: &mut R) -> Vec<MeshEvent> {
    let t0 = now - 60;
    let mut out = Vec::with_capacity(1 + MESSAGES * (2 + PEERS_PER_MESSAGE));
    out.push(MeshEvent::Radio(RadioUpdate {
        tx_dbm: Some(4.0),
        adv_interval_ms: Some(400.0),
        ttl: Some(3),
        wifi_direct: Some(false),
        ts: Some(t0),
    }));

    for i in 0..MESSAGES {
        let id = format!("m{}", i);
        let ts = t0 + i as i64;
        out.push(MeshEvent::MessageSent { id: id.clone(), ts: Some(ts) });

        // hops and latency are drawn even when the message is lost, so the
        // stream for a given seed does not depend on the delivery outcome
        let hops: u32 = if rng.gen_bool(0.8) { rng.gen_range(2..4) } else { 5 };
        let latency_ms = rng.gen_range(500.0..1700.0);
        if rng.gen_bool(DELIVERY_P) {
            out.push(MeshEvent::MessageDelivered {
                id,
                hops: Some(f64::from(hops)),
                latency_ms: Some(latency_ms),
                ts: Some(ts + 2),
            });
        }

        for _ in 0..PEERS_PER_MESSAGE {
            out.push(MeshEvent::PeerSeen {
                peer: format!("P:{:x}", rng.gen_range(0..0xffffu32)),
                rssi: -50.0 - rng.gen_range(0.0..30.0),
                ts: Some(ts),
            });
        }
    }
    out
}

/// Write events as newline-delimited JSON, creating parent directories.
pub async fn write_jsonl(path: impl AsRef<Path>, events: &[MeshEvent]) -> Result<()> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).await.with_context(|| format!("create {}", dir.display()))?;
    }
    let mut buf = Vec::new();
    for ev in events {
        serde_json::to_writer(&mut buf, ev).context("encode event")?;
        buf.push(b'\n');
    }
    let mut f = fs::File::create(path).await.with_context(|| format!("create {}", path.display()))?;
    f.write_all(&buf).await?;
    f.flush().await?;
    info!("synthetic: wrote {} events to {}", events.len(), path.display());
    Ok(())
}
