//! Result fusion: dedup, rank, cap.

use std::cmp::Ordering;

use ahash::AHashSet as HashSet;

use crate::store::SearchHit;

/// Ranking order for fused hits: higher score first.
///
/// Full-text hits score above zero and identifier hits score exactly zero,
/// so identifier-only matches always rank after every text match. Used with
/// a stable sort, so hits with equal scores keep the order in which their
/// strategies produced them.
pub fn compare_relevance(a: &SearchHit, b: &SearchHit) -> Ordering {
    b.score.total_cmp(&a.score)
}

/// Concatenate strategy results, keep the first hit per `hash`, sort by
/// [`compare_relevance`] and truncate to `limit`.
pub fn fuse<I>(batches: I, limit: usize) -> Vec<SearchHit>
where
    I: IntoIterator<Item = Vec<SearchHit>>,
{
    let mut seen = HashSet::new();
    let mut hits: Vec<SearchHit> = batches
        .into_iter()
        .flatten()
        .filter(|hit| seen.insert(hit.hash.clone()))
        .collect();
    hits.sort_by(compare_relevance);
    hits.truncate(limit);
    hits
}
