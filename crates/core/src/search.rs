//! Scene search and scene-number checks.

use std::collections::BTreeSet;

/// Whether a scene matches the free-text query `q`.
///
/// The query matches when it appears in the description or the time of day,
/// ignoring case. An empty query matches every scene.
pub fn scene_matches(description: Option<&str>, time_of_day: Option<&str>, q: &str) -> bool {
    let q = q.trim();
    if q.is_empty() {
        return true;
    }
    let needle = q.to_lowercase();
    let contains = |text: Option<&str>| {
        text.is_some_and(|t| t.to_lowercase().contains(&needle))
    };
    contains(description) || contains(time_of_day)
}

/// Scene numbers that occur more than once, sorted ascending.
///
/// Blank numbers are ignored; they belong to placeholder scenes that were
/// pre-allocated and not yet filled in.
pub fn duplicate_numbers<'a, I>(numbers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for number in numbers {
        let number = number.trim();
        if number.is_empty() {
            continue;
        }
        if !seen.insert(number) {
            duplicates.insert(number.to_string());
        }
    }
    duplicates.into_iter().collect()
}
