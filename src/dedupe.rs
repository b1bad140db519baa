use std::collections::HashSet;
use std::hash::Hash;

/// Keeps the first item per key, preserving input order. O(n) over a
/// seen-set.
pub fn dedupe_by<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}
