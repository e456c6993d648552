//! Cached index of every known searchable term.
//!
//! The candidate pool for the did-you-mean matcher is the set of all
//! compound names and synonyms. Rebuilding it means a full scan of the
//! collection, so the snapshot is kept for a fixed time-to-live and is
//! never invalidated by writes. A snapshot is replaced with a single atomic
//! swap: readers holding the previous one are unaffected by a rebuild.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ahash::AHashSet as HashSet;
use arc_swap::ArcSwapOption;
use tracing::{debug, error, info, instrument};

use crate::store::{CompoundStore, TermSource};

pub const DEFAULT_TERM_TTL: Duration = Duration::from_secs(60 * 60);

/// One distinct term and where it first came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub term: String,
    /// `true` if sourced from a record name, `false` if from a synonym.
    pub is_primary_name: bool,
}

#[derive(Debug)]
struct Snapshot {
    terms: Arc<[TermEntry]>,
    built_at: Instant,
}

/// Single-slot, time-expiring cache of the term index.
#[derive(Debug)]
pub struct TermCache {
    slot: ArcSwapOption<Snapshot>,
    ttl: Duration,
}

impl Default for TermCache {
    fn default() -> Self {
        Self::new(DEFAULT_TERM_TTL)
    }
}

impl TermCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: ArcSwapOption::empty(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The current term snapshot, rebuilding it from `store` when missing or
    /// expired.
    ///
    /// A failed rebuild is logged and yields an empty snapshot that is not
    /// cached, so the next call tries again.
    #[instrument(name = "Get Search Terms", level = "debug", skip_all)]
    pub async fn get<S>(&self, store: &S) -> Arc<[TermEntry]>
    where
        S: CompoundStore + ?Sized,
    {
        if let Some(snapshot) = self.slot.load_full()
            && snapshot.built_at.elapsed() < self.ttl
        {
            debug!(num_terms = snapshot.terms.len(), "Term cache hit");
            return snapshot.terms.clone();
        }

        let t_build = Instant::now();
        match store.term_sources().await {
            Ok(sources) => {
                let terms: Arc<[TermEntry]> = build_terms(sources).into();
                self.slot.store(Some(Arc::new(Snapshot {
                    terms: terms.clone(),
                    built_at: Instant::now(),
                })));
                info!(
                    num_terms = terms.len(),
                    elapsed_seconds = t_build.elapsed().as_secs_f32(),
                    "Term cache rebuilt"
                );
                terms
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch search terms");
                Arc::from(Vec::new())
            }
        }
    }

    /// Drop the current snapshot; the next [`get`](Self::get) rebuilds it.
    pub fn invalidate(&self) {
        self.slot.store(None);
    }
}

/// Flatten names and synonyms into distinct terms, keeping first-seen order.
/// Blank names and synonyms are skipped; case is preserved, so terms that
/// differ only in case are both kept.
pub fn build_terms(sources: Vec<TermSource>) -> Vec<TermEntry> {
    let mut seen = HashSet::new();
    let mut terms = Vec::new();
    for source in sources {
        let named = source.name.into_iter().map(|name| (name, true));
        let synonyms = source.synonyms.into_iter().map(|syn| (syn, false));
        for (term, is_primary_name) in named.chain(synonyms) {
            if term.trim().is_empty() || !seen.insert(term.clone()) {
                continue;
            }
            terms.push(TermEntry {
                term,
                is_primary_name,
            });
        }
    }
    terms
}
