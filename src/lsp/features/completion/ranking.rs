//! Ranking and sorting of completion results
//!
//! General-mode output is assembled in a fixed order so results are
//! deterministic:
//! 1. Local symbols, innermost binding first (already ordered by the analyzer)
//! 2. Registry functions grouped by namespace, in [`NAMESPACE_ORDER`]
//! 3. Within a namespace group: priority descending
//! 4. Name ascending as tie-breaker

use std::cmp::{Ordering, Reverse};

use rustc_hash::FxHashSet;

use super::candidate::CompletionCandidate;

/// Namespace groups offered in general mode, in presentation order
///
/// `str` is the string module and `php` the PHP interop module. Registry
/// namespaces outside this list are not offered.
pub const NAMESPACE_ORDER: &[&str] = &[
    "core", "str", "json", "html", "http", "base64", "test", "php", "repl",
];

/// Priority given to local symbols; above any registry priority
pub const LOCAL_SYMBOL_PRIORITY: i32 = 1000;

/// Position of a namespace in [`NAMESPACE_ORDER`]
pub fn namespace_rank(namespace: &str) -> Option<usize> {
    NAMESPACE_ORDER.iter().position(|&ns| ns == namespace)
}

/// Orders registry candidates by namespace group, then priority, then name
///
/// Candidates without a known namespace are dropped, as are repeats of the
/// same (namespace, name) pair.
pub fn rank_library_candidates(candidates: Vec<CompletionCandidate>) -> Vec<CompletionCandidate> {
    let mut seen: FxHashSet<(String, String)> = FxHashSet::default();
    let mut ranked: Vec<(usize, CompletionCandidate)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let rank = candidate.namespace.as_deref().and_then(namespace_rank)?;
            Some((rank, candidate))
        })
        .filter(|(_, candidate)| {
            seen.insert((
                candidate.namespace.clone().unwrap_or_default(),
                candidate.label.clone(),
            ))
        })
        .collect();

    ranked.sort_by(|(rank_a, a), (rank_b, b)| {
        rank_a
            .cmp(rank_b)
            .then_with(|| compare_within_group(a, b))
    });

    ranked.into_iter().map(|(_, candidate)| candidate).collect()
}

fn compare_within_group(a: &CompletionCandidate, b: &CompletionCandidate) -> Ordering {
    Reverse(a.priority)
        .cmp(&Reverse(b.priority))
        .then_with(|| a.label.cmp(&b.label))
}
