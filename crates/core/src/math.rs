//! Mathematical utilities for sparse-vector similarity and
//! time-series statistics.

use std::collections::HashSet;
use std::hash::Hash;

/// Cosine similarity between two sparse vectors, computed over the union
/// of their keys. Returns 0.0 when either vector has zero magnitude.
/// Result is within [-1, 1].
pub fn sparse_cosine_similarity<K: Eq + Hash>(
    a: &std::collections::HashMap<K, f64>,
    b: &std::collections::HashMap<K, f64>,
) -> f64 {
    let keys: HashSet<&K> = a.keys().chain(b.keys()).collect();

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for key in keys {
        let va = a.get(key).copied().unwrap_or(0.0);
        let vb = b.get(key).copied().unwrap_or(0.0);
        dot += va * vb;
        norm_a += va * va;
        norm_b += vb * vb;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0.0 for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Ordinary least squares slope of `values` against their indices
/// (0, 1, 2, ...). `None` when fewer than two points or the series is
/// degenerate.
pub fn ols_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;

    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n as f64 * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    Some((n as f64 * sum_xy - sum_x * sum_y) / denominator)
}

/// Round to the given number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
