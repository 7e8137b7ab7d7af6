use mesh_proto::receipt::{HealthStatus, Thresholds};

use crate::window::WindowSummary;

/// Below this delivery ratio the mesh is red regardless of latency.
pub const RED_DELIVERY_FLOOR: f64 = 0.20;

/// Red is checked first: an empty latency sample can never be green,
/// however good delivery looks.
pub fn classify(s: &WindowSummary, th: &Thresholds) -> HealthStatus {
    if s.delivery < RED_DELIVERY_FLOOR || s.latency_samples == 0 {
        HealthStatus::Red
    } else if s.delivery >= th.delivery && s.p95 <= th.p95_ms as f64 {
        HealthStatus::Green
    } else {
        HealthStatus::Amber
    }
}
