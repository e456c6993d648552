//! The compound search service.
//!
//! [`CompoundSearcher`] owns the datastore handle, the term index cache and
//! the search configurations, and exposes every read operation of the
//! catalog:
//!
//! - **search**: did-you-mean plus multi-strategy search with fallback
//! - **quick search**: substring and identifier matching for type-ahead
//! - **article / index / references**: direct catalog reads
//! - **filter**: the typed filter pipeline
//!
//! ```rust,no_run
//! use cryosearch::CompoundSearcher;
//!
//! # async fn run() -> cryosearch::error::Result<()> {
//! let searcher = CompoundSearcher::from_dump("./cryosearch_data/compounds.json")?;
//! let response = searcher.search(Some("dimethly sulfoxide")).await?;
//! println!("Did you mean: {}", response.dym);
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;

use cryosearch_data::CompoundRecord;
use tracing::{info, instrument};

use crate::{
    catalog::{self, IndexPage, PageRequest, ReferencePage},
    config::SearcherConfig,
    error::CryoError,
    filter::{FilterInput, FilterPipeline, FilterResponse},
    matcher::{self, Suggestion},
    query::{ValidationError, validate, validate_hash},
    response::{self, QuickHit, SearchResponse},
    search::multi_strategy_search,
    store::{CompoundStore, InMemoryStore},
    terms::TermCache,
};

/// Long-lived search service shared by every request.
///
/// Cloning is not supported; share it behind an `Arc`. The term cache lives
/// here rather than in global state, so two searchers never share a
/// snapshot.
pub struct CompoundSearcher {
    store: Arc<dyn CompoundStore>,
    terms: TermCache,
    config: SearcherConfig,
}

impl std::fmt::Debug for CompoundSearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompoundSearcher")
            .field("backend", &self.store.backend_name())
            .field("terms", &self.terms)
            .field("config", &self.config)
            .finish()
    }
}

impl CompoundSearcher {
    pub fn new(store: Arc<dyn CompoundStore>) -> Self {
        Self::with_config(store, SearcherConfig::default())
    }

    pub fn with_config(store: Arc<dyn CompoundStore>, config: SearcherConfig) -> Self {
        Self {
            store,
            terms: TermCache::new(config.term_ttl),
            config,
        }
    }

    /// Load a datastore dump into an [`InMemoryStore`] and serve from it.
    #[instrument(name = "Create CompoundSearcher from dump", level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_dump(path: impl AsRef<Path>) -> Result<Self, CryoError> {
        let t_init = std::time::Instant::now();
        let store = InMemoryStore::from_dump(path.as_ref())?;
        info!(
            elapsed_seconds = t_init.elapsed().as_secs_f32(),
            "CompoundSearcher ready"
        );
        Ok(Self::new(Arc::new(store)))
    }

    pub fn store(&self) -> &dyn CompoundStore {
        self.store.as_ref()
    }

    pub fn term_cache(&self) -> &TermCache {
        &self.terms
    }

    pub fn config(&self) -> &SearcherConfig {
        &self.config
    }

    /// Closest known name or synonym to `input`.
    pub async fn suggest(&self, input: &str) -> Suggestion {
        let terms = self.terms.get(self.store.as_ref()).await;
        matcher::suggest(input, &terms)
    }

    /// Validate `raw`, compute did-you-mean and run the full search.
    ///
    /// Only validation can fail; datastore trouble degrades to an empty
    /// suggestion and empty results.
    #[instrument(name = "Search", level = "info", skip(self))]
    pub async fn search(&self, raw: Option<&str>) -> Result<SearchResponse, ValidationError> {
        let config = &self.config.search;
        let query = validate(raw, &config.query_policy)?;

        let suggestion = if config.did_you_mean {
            self.suggest(&query.sanitized).await
        } else {
            Suggestion {
                closest_match: String::new(),
                suggestion: String::new(),
                score: 0.0,
            }
        };
        let hits = multi_strategy_search(
            self.store.as_ref(),
            &query.decoded,
            &suggestion.closest_match,
            config,
        )
        .await;

        Ok(response::assemble(&suggestion, hits))
    }

    /// Validate `raw` and run the quick search preset.
    #[instrument(name = "Quick Search", level = "info", skip(self))]
    pub async fn quick_search(&self, raw: Option<&str>) -> Result<Vec<QuickHit>, ValidationError> {
        let config = &self.config.quick_search;
        let query = validate(raw, &config.query_policy)?;
        let hits = multi_strategy_search(self.store.as_ref(), &query.decoded, "", config).await;
        Ok(response::assemble_quick(hits))
    }

    /// The full record for `hash`, if any.
    pub async fn article(&self, hash: &str) -> Result<Option<CompoundRecord>, CryoError> {
        let hash = validate_hash(hash)?;
        Ok(self.store.get(hash).await?)
    }

    /// One page of the catalog plus the class and cell-type facets.
    #[instrument(name = "Index Page", level = "debug", skip(self))]
    pub async fn index_page(
        &self,
        page: Option<usize>,
        limit: Option<usize>,
    ) -> Result<IndexPage, CryoError> {
        let request = PageRequest::new(page, limit)?;
        let total = self.store.count().await?;
        Ok(IndexPage {
            chem_class_filters: self.store.distinct_classes().await?,
            cell_type_filters: self.store.distinct_cell_types().await?,
            entries: self.store.list(request.skip(), request.limit).await?,
            total,
            page: request.page,
            total_pages: request.total_pages(total),
        })
    }

    /// Cited sources grouped across the catalog, optionally searched.
    #[instrument(name = "Reference Page", level = "debug", skip(self))]
    pub async fn references(
        &self,
        page: Option<usize>,
        limit: Option<usize>,
        search: Option<&str>,
    ) -> Result<ReferencePage, CryoError> {
        let request = PageRequest::new(page, limit)?;
        let records = self.store.records().await?;
        let groups = catalog::group_references(&records);
        Ok(catalog::reference_page(groups, search, request))
    }

    /// Run the filter pipeline described by `input` over the catalog.
    #[instrument(name = "Filter", level = "info", skip_all)]
    pub async fn filter(&self, input: &FilterInput) -> Result<FilterResponse, CryoError> {
        let pipeline = FilterPipeline::from_input(input)?;
        let records = self.store.records().await?;
        Ok(FilterResponse {
            results: pipeline.apply(&records),
            classes: self.store.distinct_classes().await?,
            unique_cell_types: self.store.distinct_cell_types().await?,
        })
    }
}
