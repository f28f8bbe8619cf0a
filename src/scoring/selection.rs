//! Threshold gate over scored postings

use std::cmp::Ordering;

/// Sort descending by score. Equal scores keep their input order.
pub fn rank<T, F>(mut items: Vec<T>, score: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| score(b).partial_cmp(&score(a)).unwrap_or(Ordering::Equal));
    items
}

/// Items scoring at least `threshold`, best first, stable for ties
pub fn select<T, F>(items: Vec<T>, threshold: f64, score: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    let kept: Vec<T> = items.into_iter().filter(|item| score(item) >= threshold).collect();
    rank(kept, score)
}
