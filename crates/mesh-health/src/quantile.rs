/// Linearly interpolated quantile (NumPy's default method).
///
/// Total over its inputs: an empty sample yields 0, `q` is clamped into
/// [0, 1], and the caller's slice is left untouched.
pub fn quantile(samples: &[f64], q: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q = if q.is_nan() { 0.0 } else { q.clamp(0.0, 1.0) };
    let pos = (sorted.len() - 1) as f64 * q;
    let base = pos.floor() as usize;
    let frac = pos - base as f64;

    match sorted.get(base + 1) {
        Some(next) => sorted[base] + frac * (next - sorted[base]),
        None => sorted[base],
    }
}
