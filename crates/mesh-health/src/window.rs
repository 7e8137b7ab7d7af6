use std::collections::BTreeSet;

use tracing::debug;

use mesh_proto::telemetry::{MeshEvent, RadioConfig};

use crate::quantile::quantile;

/// Accumulators folded from the events of one trailing window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowStats {
    pub sent_ids: BTreeSet<String>,
    pub delivered_ids: BTreeSet<String>,
    pub latencies: Vec<f64>,
    pub hops: Vec<f64>,
    pub peers: BTreeSet<String>,
    pub radio: RadioConfig,
}

/// Statistics derived from a [`WindowStats`]; what the classifier, advisor
/// and receipt builder consume.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSummary {
    pub delivery: f64,
    pub p50: f64,
    pub p95: f64,
    pub median_hops: f64,
    pub reach: usize,
    pub latency_samples: usize,
    pub sent: usize,
    pub delivered: usize,
    pub radio: RadioConfig,
}

impl WindowStats {
    /// Keep events with `now - ts <= window_sec` and fold them in order.
    ///
    /// An event without `ts` counts as stamped `now` and is always kept.
    /// Radio updates merge field by field, last write wins.
    pub fn reduce(events: &[MeshEvent], now: i64, window_sec: u64, seed: RadioConfig) -> Self {
        let mut st = WindowStats { radio: seed, ..Default::default() };
        let window = i64::try_from(window_sec).unwrap_or(i64::MAX);
        let mut kept = 0usize;

        for ev in events {
            let ts = ev.ts().unwrap_or(now);
            if now.saturating_sub(ts) > window {
                continue;
            }
            kept += 1;
            st.fold(ev);
        }

        debug!(
            "window: kept {} of {} events (window={}s, sent={}, delivered={}, peers={})",
            kept, events.len(), window_sec, st.sent_ids.len(), st.delivered_ids.len(), st.peers.len()
        );
        st
    }

    fn fold(&mut self, ev: &MeshEvent) {
        match ev {
            MeshEvent::MessageSent { id, .. } => {
                self.sent_ids.insert(id.clone());
            }
            MeshEvent::MessageDelivered { id, hops, latency_ms, .. } => {
                self.delivered_ids.insert(id.clone());
                if let Some(l) = latency_ms.filter(|l| l.is_finite()) {
                    self.latencies.push(l);
                }
                if let Some(h) = hops.filter(|h| h.is_finite()) {
                    self.hops.push(h);
                }
            }
            MeshEvent::PeerSeen { peer, .. } => {
                self.peers.insert(peer.clone());
            }
            MeshEvent::Radio(upd) => self.radio.apply(upd),
        }
    }

    /// Fraction of sent ids with at least one delivery; 0 when nothing was sent.
    pub fn delivery(&self) -> f64 {
        if self.sent_ids.is_empty() {
            return 0.0;
        }
        self.delivered_count() as f64 / self.sent_ids.len() as f64
    }

    /// Sent ids with at least one delivery in the window.
    pub fn delivered_count(&self) -> usize {
        self.sent_ids.intersection(&self.delivered_ids).count()
    }

    pub fn summary(&self) -> WindowSummary {
        WindowSummary {
            delivery: self.delivery(),
            p50: quantile(&self.latencies, 0.5),
            p95: quantile(&self.latencies, 0.95),
            median_hops: quantile(&self.hops, 0.5),
            reach: self.peers.len(),
            latency_samples: self.latencies.len(),
            sent: self.sent_ids.len(),
            delivered: self.delivered_count(),
            radio: self.radio,
        }
    }
}
