use ahash::AHashMap as HashMap;
use async_trait::async_trait;
use cryosearch_data::CompoundRecord;
use itertools::Itertools;
use tracing::{debug, info, instrument};

use super::{CompoundStore, RecordFilter, SearchHit, StoreError, TermSource};
use crate::index::CompoundIndex;

/// Datastore backed by records held in process memory plus a Tantivy
/// index over them.
///
/// Equality-only filters are answered from the index; anything involving a
/// pattern falls back to a scan in collection order.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    records: Vec<CompoundRecord>,
    positions: HashMap<String, usize>,
    index: CompoundIndex,
}

impl InMemoryStore {
    #[instrument(name = "Create InMemoryStore", level = "info", skip_all, fields(num_records = records.len()))]
    pub fn new(records: Vec<CompoundRecord>) -> Result<Self, StoreError> {
        cryosearch_data::validate_records(&records)?;
        let positions = records
            .iter()
            .enumerate()
            .map(|(pos, record)| (record.hash.clone(), pos))
            .collect();
        let index = CompoundIndex::build(&records)?;
        info!(num_docs = index.num_docs(), "InMemoryStore ready");
        Ok(Self {
            records,
            positions,
            index,
        })
    }

    /// Load and index a datastore dump.
    pub fn from_dump(path: impl AsRef<std::path::Path>) -> Result<Self, StoreError> {
        Self::new(cryosearch_data::load_records(path)?)
    }

    fn record(&self, hash: &str) -> Option<&CompoundRecord> {
        self.positions.get(hash).map(|&pos| &self.records[pos])
    }

    fn hits_for<I>(&self, scored: I) -> Vec<SearchHit>
    where
        I: IntoIterator<Item = (String, f32)>,
    {
        scored
            .into_iter()
            .filter_map(|(hash, score)| {
                self.record(&hash)
                    .map(|record| SearchHit::from_record(record, score))
            })
            .collect()
    }
}

#[async_trait]
impl CompoundStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "in-memory"
    }

    async fn term_sources(&self) -> Result<Vec<TermSource>, StoreError> {
        Ok(self
            .records
            .iter()
            .map(|record| TermSource {
                name: record.name.clone(),
                synonyms: record.synonyms.clone(),
            })
            .collect())
    }

    async fn text_search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, StoreError> {
        let scored = self.index.text_search(query, limit)?;
        Ok(self.hits_for(scored))
    }

    async fn find(
        &self,
        filter: &RecordFilter,
        limit: usize,
    ) -> Result<Vec<SearchHit>, StoreError> {
        if let Some(terms) = filter.exact_terms() {
            debug!(num_terms = terms.len(), "Answering equality filter from index");
            let hashes = self.index.exact_search(&terms, limit)?;
            return Ok(self.hits_for(hashes.into_iter().map(|hash| (hash, 0.0))));
        }

        debug!("Answering filter with a collection scan");
        Ok(self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .take(limit)
            .map(|record| SearchHit::from_record(record, 0.0))
            .collect())
    }

    async fn get(&self, hash: &str) -> Result<Option<CompoundRecord>, StoreError> {
        Ok(self.record(hash).cloned())
    }

    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<SearchHit>, StoreError> {
        Ok(self
            .records
            .iter()
            .skip(skip)
            .take(limit)
            .map(|record| SearchHit::from_record(record, 0.0))
            .collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.len())
    }

    async fn records(&self) -> Result<Vec<CompoundRecord>, StoreError> {
        Ok(self.records.clone())
    }

    async fn distinct_classes(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter_map(|record| record.class.as_deref())
            .filter(|class| !class.is_empty())
            .map(str::to_string)
            .sorted()
            .dedup()
            .collect())
    }

    async fn distinct_cell_types(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .records
            .iter()
            .flat_map(|record| &record.cell_info)
            .filter_map(|info| info.cell_type.clone())
            .sorted()
            .dedup()
            .collect())
    }
}
