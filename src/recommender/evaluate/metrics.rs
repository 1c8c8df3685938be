//! Ranking quality metrics.

/// Share of the top-`k` slots holding a relevant item.
///
/// Divides by `k` even when fewer than `k` items were ranked, so a short
/// list is penalised. `k == 0` yields 0.
#[inline]
pub fn precision_at_k(hits: usize, k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    hits as f64 / k as f64
}

/// Share of all relevant items that made it into the top `k`
#[inline]
pub fn recall_at_k(hits: usize, relevant_total: usize) -> f64 {
    if relevant_total == 0 {
        return 0.0;
    }
    hits as f64 / relevant_total as f64
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
