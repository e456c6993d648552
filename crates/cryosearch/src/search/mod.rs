//! Multi-strategy compound search.
//!
//! A query runs through an ordered list of independent retrieval
//! strategies against the datastore; their results are fused (see
//! [`fusion`]). When nothing at all is found and a closest-match term is
//! available, full-text search is retried once with that term.
//!
//! Datastore failures never escape this module: a failing strategy is
//! logged and contributes no hits.

use regex::Regex;
use tracing::{debug, error, info, instrument};

pub mod fusion;

pub use fusion::{compare_relevance, fuse};

use crate::query::{QueryPolicy, sanitize};
use crate::store::{CompoundStore, ExactField, PatternField, RecordFilter, SearchHit};

pub const DEFAULT_RESULT_LIMIT: usize = 30;

/// One way of retrieving candidate records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Weighted full-text search on the sanitized query; hits keep the
    /// datastore relevance score.
    FullText,
    /// Verbatim match of the decoded query against identifier fields
    /// (CAS number, hash, class, formulas, weight, concentration); score 0.
    ExactField,
    /// Case-insensitive substring match of the sanitized query against the
    /// text fields; score 0.
    FieldPattern,
}

/// Controls which strategies run and how results are bounded.
///
/// Use [`SearchConfig::full`] for the main search (full text plus
/// identifiers, did-you-mean, closest-match fallback) and
/// [`SearchConfig::quick`] for the lightweight quick search (substring plus
/// identifiers only).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Maximum number of fused results returned
    pub limit: usize,
    /// Maximum number of hits requested from each strategy
    pub strategy_limit: usize,
    /// Strategies in evaluation order; earlier ones win dedup ties
    pub strategies: Vec<Strategy>,
    /// Compute a did-you-mean suggestion for the query
    pub did_you_mean: bool,
    /// Retry full-text search with the closest match when nothing is found
    pub closest_match_fallback: bool,
    /// Validation applied to raw queries
    pub query_policy: QueryPolicy,
}

impl SearchConfig {
    pub fn builder() -> crate::SearchConfigBuilder {
        crate::SearchConfigBuilder::default()
    }

    pub fn full() -> Self {
        Self {
            limit: DEFAULT_RESULT_LIMIT,
            strategy_limit: DEFAULT_RESULT_LIMIT,
            strategies: vec![Strategy::FullText, Strategy::ExactField],
            did_you_mean: true,
            closest_match_fallback: true,
            query_policy: QueryPolicy::default(),
        }
    }

    pub fn quick() -> Self {
        Self {
            strategies: vec![Strategy::FieldPattern, Strategy::ExactField],
            did_you_mean: false,
            closest_match_fallback: false,
            ..Self::full()
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::full()
    }
}

/// Equality on every identifier field.
pub fn exact_field_filter(value: &str) -> RecordFilter {
    RecordFilter::Any(
        ExactField::ALL
            .into_iter()
            .map(|field| RecordFilter::Equals {
                field,
                value: value.to_string(),
            })
            .collect(),
    )
}

/// Case-insensitive substring match on every pattern field.
pub fn field_pattern_filter(term: &str) -> Result<RecordFilter, regex::Error> {
    let pattern = Regex::new(&format!("(?i){}", regex::escape(term)))?;
    Ok(RecordFilter::Any(
        PatternField::ALL
            .into_iter()
            .map(|field| RecordFilter::Matches {
                field,
                pattern: pattern.clone(),
            })
            .collect(),
    ))
}

async fn run_strategy<S>(
    store: &S,
    strategy: Strategy,
    raw_query: &str,
    sanitized: &str,
    limit: usize,
) -> Vec<SearchHit>
where
    S: CompoundStore + ?Sized,
{
    let result = match strategy {
        Strategy::FullText if sanitized.is_empty() => Ok(Vec::new()),
        Strategy::FullText => store.text_search(sanitized, limit).await,
        Strategy::ExactField if raw_query.is_empty() => Ok(Vec::new()),
        Strategy::ExactField => store.find(&exact_field_filter(raw_query), limit).await,
        Strategy::FieldPattern if sanitized.is_empty() => Ok(Vec::new()),
        Strategy::FieldPattern => match field_pattern_filter(sanitized) {
            Ok(filter) => store.find(&filter, limit).await,
            Err(e) => Err(anyhow::Error::from(e).into()),
        },
    };

    match result {
        Ok(hits) => {
            debug!(?strategy, num_hits = hits.len(), "Strategy complete");
            hits
        }
        Err(e) => {
            error!(?strategy, error = %e, "Search strategy failed; continuing without it");
            Vec::new()
        }
    }
}

/// Run the configured strategies for `raw_query` and fuse their results.
///
/// `raw_query` is the decoded, unstripped query; it is sanitized here for
/// the text strategies and used verbatim for identifier matching.
/// `closest_match` feeds the single fallback round and may be empty.
/// Never fails: the result is empty when everything fails.
#[instrument(name = "Multi-Strategy Search", level = "info", skip(store, config), fields(strategies = ?config.strategies))]
pub async fn multi_strategy_search<S>(
    store: &S,
    raw_query: &str,
    closest_match: &str,
    config: &SearchConfig,
) -> Vec<SearchHit>
where
    S: CompoundStore + ?Sized,
{
    let raw_query = raw_query.trim();
    let sanitized = sanitize(raw_query);

    let mut batches = Vec::with_capacity(config.strategies.len());
    for &strategy in &config.strategies {
        batches.push(run_strategy(store, strategy, raw_query, &sanitized, config.strategy_limit).await);
    }
    let hits = fuse(batches, config.limit);

    if !hits.is_empty() || !config.closest_match_fallback {
        info!(num_results = hits.len(), "Search complete");
        return hits;
    }

    let sanitized_closest = sanitize(closest_match);
    if sanitized_closest.is_empty() {
        return hits;
    }
    info!(closest_match = %sanitized_closest, "No results; retrying with closest match");
    let mut fallback = run_strategy(
        store,
        Strategy::FullText,
        &sanitized_closest,
        &sanitized_closest,
        config.limit,
    )
    .await;
    fallback.truncate(config.limit);
    fallback
}
