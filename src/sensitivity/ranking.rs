//! Rank assignment for scores.

use std::cmp::Ordering;

/// Competition ranking, highest score first.
///
/// Equal scores share the lowest rank of their group and the next distinct
/// score resumes after the group (1, 2, 2, 4). NaN scores rank after every
/// number and tie with each other. Ties are detected by exact equality.
pub fn competition_rank(scores: &[f64]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| descending(scores[a], scores[b]));

    let mut ranks = vec![0u32; scores.len()];
    let mut current = 0u32;
    for (position, &idx) in order.iter().enumerate() {
        let tied = position > 0 && same_score(scores[order[position - 1]], scores[idx]);
        if !tied {
            current = position as u32 + 1;
        }
        ranks[idx] = current;
    }
    ranks
}

/// Fractional ranks in ascending order, ties get the mean of their
/// positions (1.5, 1.5, 3.0). Used for rank correlation.
pub fn average_rank(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| ascending(values[a], values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && same_score(values[order[start]], values[order[end]]) {
            end += 1;
        }
        // positions start..end are 1-based start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

fn ascending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

fn same_score(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}
