//! The datastore seam.
//!
//! Everything the search core needs from the compound collection goes
//! through [`CompoundStore`]: a term scan for the fuzzy matcher, weighted
//! full-text search, query-by-filter, and a handful of catalog reads.
//! The core only ever reads; nothing here mutates a record.

use async_trait::async_trait;
use cryosearch_data::CompoundRecord;
use regex::Regex;
use serde::Serialize;

mod memory;

pub use error::StoreError;
pub use memory::InMemoryStore;

/// Display projection of a record returned by searches.
///
/// `score` drives ranking only and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub name: Option<String>,
    pub overview: Option<String>,
    pub hash: String,
    pub structure_image: Option<String>,
    #[serde(skip)]
    pub score: f32,
}

impl SearchHit {
    pub fn from_record(record: &CompoundRecord, score: f32) -> Self {
        Self {
            name: record.name.clone(),
            overview: record.overview.clone(),
            hash: record.hash.clone(),
            structure_image: record.structure_image.clone(),
            score,
        }
    }
}

/// The raw material for the term index: one entry per record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermSource {
    pub name: Option<String>,
    pub synonyms: Vec<String>,
}

/// Identifier-like fields matched verbatim (case-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExactField {
    CasNumber,
    Hash,
    Class,
    ChemicalFormula,
    MolecularFormula,
    MolecularWeight,
    OptimalConc,
}

impl ExactField {
    pub const ALL: [Self; 7] = [
        Self::CasNumber,
        Self::Hash,
        Self::Class,
        Self::ChemicalFormula,
        Self::MolecularFormula,
        Self::MolecularWeight,
        Self::OptimalConc,
    ];

    pub fn value(self, record: &CompoundRecord) -> Option<&str> {
        match self {
            Self::CasNumber => record.cas_number.as_deref(),
            Self::Hash => Some(record.hash.as_str()),
            Self::Class => record.class.as_deref(),
            Self::ChemicalFormula => record.chemical_formula.as_deref(),
            Self::MolecularFormula => record.molecular_formula.as_deref(),
            Self::MolecularWeight => record.molecular_weight.as_deref(),
            Self::OptimalConc => record.optimal_conc.as_deref(),
        }
    }
}

/// Text fields that can be matched by pattern. List fields match when any
/// element does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternField {
    Name,
    Overview,
    Tags,
    Synonyms,
    WrittenBy,
    ReferenceText,
    ReferenceUrl,
}

impl PatternField {
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Overview,
        Self::Tags,
        Self::Synonyms,
        Self::WrittenBy,
        Self::ReferenceText,
        Self::ReferenceUrl,
    ];

    fn matches(self, record: &CompoundRecord, pattern: &Regex) -> bool {
        let is_match = |value: Option<&str>| value.is_some_and(|v| pattern.is_match(v));
        match self {
            Self::Name => is_match(record.name.as_deref()),
            Self::Overview => is_match(record.overview.as_deref()),
            Self::Tags => is_match(record.tags.as_deref()),
            Self::Synonyms => record.synonyms.iter().any(|s| pattern.is_match(s)),
            Self::WrittenBy => record.written_by.iter().any(|s| pattern.is_match(s)),
            Self::ReferenceText => record
                .references
                .iter()
                .any(|r| is_match(r.reference.as_deref())),
            Self::ReferenceUrl => record.references.iter().any(|r| is_match(r.url.as_deref())),
        }
    }
}

/// A query-by-filter expression.
#[derive(Debug, Clone)]
pub enum RecordFilter {
    /// Matches when any branch matches. An empty list matches nothing.
    Any(Vec<RecordFilter>),
    Equals { field: ExactField, value: String },
    Matches { field: PatternField, pattern: Regex },
}

impl RecordFilter {
    pub fn matches(&self, record: &CompoundRecord) -> bool {
        match self {
            Self::Any(branches) => branches.iter().any(|b| b.matches(record)),
            Self::Equals { field, value } => field.value(record) == Some(value.as_str()),
            Self::Matches { field, pattern } => field.matches(record, pattern),
        }
    }

    /// The `(field, value)` pairs when this filter is a disjunction of
    /// equality checks only, which a backend can answer from an index.
    pub fn exact_terms(&self) -> Option<Vec<(ExactField, &str)>> {
        match self {
            Self::Equals { field, value } => Some(vec![(*field, value.as_str())]),
            Self::Any(branches) => branches.iter().try_fold(Vec::new(), |mut acc, branch| {
                acc.extend(branch.exact_terms()?);
                Some(acc)
            }),
            Self::Matches { .. } => None,
        }
    }
}

/// Read-only access to the compound collection.
#[async_trait]
pub trait CompoundStore: Send + Sync {
    fn backend_name(&self) -> &'static str;

    /// `name` and `synonyms` of every record, in collection order.
    async fn term_sources(&self) -> Result<Vec<TermSource>, StoreError>;

    /// Weighted full-text search; hits come back in descending score order.
    async fn text_search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, StoreError>;

    /// Query-by-filter. Hits carry a score of zero.
    async fn find(&self, filter: &RecordFilter, limit: usize)
    -> Result<Vec<SearchHit>, StoreError>;

    async fn get(&self, hash: &str) -> Result<Option<CompoundRecord>, StoreError>;

    /// A page of the collection in collection order.
    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<SearchHit>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;

    /// Every record; used by the filter pipeline.
    async fn records(&self) -> Result<Vec<CompoundRecord>, StoreError>;

    /// Distinct non-empty classes, sorted.
    async fn distinct_classes(&self) -> Result<Vec<String>, StoreError>;

    /// Distinct cell types across all `cell_info` entries, sorted.
    async fn distinct_cell_types(&self) -> Result<Vec<String>, StoreError>;
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum StoreError {
        #[error("Index error: {0}")]
        IndexError(#[from] crate::index::IndexError),
        #[error("Data error: {0}")]
        Data(#[from] cryosearch_data::DataError),
        #[error("Datastore unavailable: {0}")]
        Unavailable(String),
        #[error(transparent)]
        Other(#[from] anyhow::Error),
    }
}
