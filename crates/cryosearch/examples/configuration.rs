//! Search configuration
//!
//! Shows how to tune the search pipeline: result limits, which strategies
//! run, the minimum query length and the term cache lifetime.

use std::sync::Arc;
use std::time::Duration;

use cryosearch::{
    CompoundSearcher, InMemoryStore, SearchConfigBuilder, SearcherConfig, Strategy,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = cryosearch::init_logging(tracing::Level::INFO);

    let config = SearcherConfig {
        // Identifier matches only, never more than five
        search: SearchConfigBuilder::full()
            .strategies([Strategy::ExactField])
            .limit(5)
            .did_you_mean(false)
            .try_build()?,
        // Allow two-character type-ahead queries
        quick_search: SearchConfigBuilder::quick().min_query_len(2).try_build()?,
        term_ttl: Duration::from_secs(5 * 60),
    };

    let store = InMemoryStore::new(cryosearch_data::sample_records()?)?;
    let searcher = CompoundSearcher::with_config(Arc::new(store), config);

    let response = searcher.search(Some("Diol")).await?;
    println!("Compounds in class 'Diol': {}", response.search_results.len());

    let hits = searcher.quick_search(Some("pr")).await?;
    println!("Quick search 'pr': {} hits", hits.len());

    Ok(())
}
