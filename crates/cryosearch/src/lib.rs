//! Cryosearch - Cryoprotectant Compound Search Library
//!
//! Cryosearch finds compounds in a catalog of cryoprotectant agents from
//! free-text user queries. It combines weighted full-text search,
//! identifier matching (CAS numbers, formulas, classes) and a Jaro-Winkler
//! "did you mean" matcher over every known compound name and synonym.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cryosearch::CompoundSearcher;
//!
//! # async fn run() -> cryosearch::error::Result<()> {
//! let searcher = CompoundSearcher::from_dump("./cryosearch_data/compounds.json")?;
//!
//! // Full search with did-you-mean
//! let response = searcher.search(Some("glycerine")).await?;
//! for hit in &response.search_results {
//!     println!("{} ({})", hit.name.as_deref().unwrap_or("Unknown"), hit.hash);
//! }
//!
//! // Type-ahead search
//! let hits = searcher.quick_search(Some("glyc")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Behaviour on failure
//!
//! Only query validation errors reach the caller of the search operations.
//! A datastore failure while building the term index yields no suggestion,
//! and a failing search strategy contributes no hits; both are logged.
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

pub mod catalog;
mod config;
mod core;
pub mod error;
pub mod filter;
mod index;
pub mod matcher;
pub mod query;
pub mod response;
pub mod search;
pub mod store;
pub mod terms;

pub use core::CompoundSearcher;

pub use config::{SearchConfigBuilder, SearcherConfig};
pub use cryosearch_data as data;
pub use cryosearch_data::CompoundRecord;
pub use filter::{FilterInput, FilterPipeline, FilterResponse};
pub use index::{CompoundIndex, IndexError, TEXT_FIELD_WEIGHTS};
pub use matcher::Suggestion;
pub use query::{QueryPolicy, ValidatedQuery, ValidationError};
pub use response::{QuickHit, SearchResponse};
pub use search::{SearchConfig, Strategy};
pub use store::{CompoundStore, InMemoryStore, SearchHit, StoreError};
pub use terms::TermCache;

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for the cryosearch library.
///
/// Installs a `fmt` subscriber filtered by `RUST_LOG` when set, by `level`
/// otherwise. Later calls are no-ops.
///
/// # Examples
///
/// ```rust
/// use cryosearch::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), cryosearch::error::CryoError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::CryoError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("tantivy=warn".parse()?)
            .add_directive("hyper_util=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn setup_test_env() {
        let _ = init_logging(tracing::Level::WARN);
    }

    fn searcher() -> CompoundSearcher {
        let records = cryosearch_data::sample_records().unwrap();
        CompoundSearcher::new(Arc::new(InMemoryStore::new(records).unwrap()))
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        setup_test_env();
        assert!(init_logging(tracing::Level::DEBUG).is_ok());
    }

    #[tokio::test]
    async fn test_basic_search() {
        setup_test_env();

        let response = searcher().search(Some("glycerol")).await.unwrap();
        assert_eq!(response.search_results[0].hash, "glyc02");
        assert!(response.search_results.len() <= 30);
    }

    #[tokio::test]
    async fn test_cas_number_hit_ranks_below_text_hits() {
        setup_test_env();

        // Matches only through the CAS number field
        let searcher = searcher();
        let response = searcher.search(Some("56-81-5")).await.unwrap();
        assert_eq!(response.search_results.len(), 1);
        assert!(response.search_results[0].score.abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_configuration() {
        setup_test_env();

        let config = SearcherConfig {
            search: SearchConfigBuilder::full().limit(1).build(),
            ..SearcherConfig::default()
        };
        let records = cryosearch_data::sample_records().unwrap();
        let searcher = CompoundSearcher::with_config(
            Arc::new(InMemoryStore::new(records).unwrap()),
            config,
        );

        let response = searcher.search(Some("penetrating")).await.unwrap();
        assert_eq!(response.search_results.len(), 1);
    }

    #[tokio::test]
    async fn test_nonexistent_compound() {
        setup_test_env();

        // Low-confidence closest match: no suggestion, though the fallback
        // may still surface its hits
        let response = searcher().search(Some("XYZ123NONEXISTENT")).await.unwrap();
        assert_eq!(response.dym, "");
        assert_eq!(response.dym_href, "");
        assert!(response.search_results.len() <= 30);
    }
}
