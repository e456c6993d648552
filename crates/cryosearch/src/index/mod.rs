//! Full-text index over compound records.
//!
//! Built on Tantivy, held entirely in memory. Text fields are stemmed and
//! carry relative weights so the relevance score favours hits in the name
//! over hits in, say, a reference citation. Identifier-like fields use the
//! `raw` tokenizer so they only ever match verbatim.

use cryosearch_data::CompoundRecord;
pub use error::IndexError;
use error::Result;
use tantivy::{
    Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term,
    collector::TopDocs,
    query::{BooleanQuery, Occur, Query, QueryParser, TermQuery},
    schema::{
        Field, IndexRecordOption, STORED, STRING, Schema, SchemaBuilder, TextFieldIndexing,
        TextOptions, Value,
    },
};
use tracing::{debug, info, instrument, trace, warn};

use crate::store::ExactField;

/// Relative weight of each text-indexed field; the name dominates and
/// reference citations count least.
pub const TEXT_FIELD_WEIGHTS: [(&str, f32); 6] = [
    ("name", 10.0),
    ("synonyms", 8.0),
    ("overview", 5.0),
    ("tags", 3.0),
    ("written_by", 2.0),
    ("references", 1.0),
];

const WRITER_MEMORY_BYTES: usize = 50_000_000;

#[derive(Debug, Clone, Copy)]
struct CompoundFields {
    hash: Field,
    name: Field,
    synonyms: Field,
    overview: Field,
    tags: Field,
    written_by: Field,
    references: Field,
    cas_number: Field,
    class: Field,
    chemical_formula: Field,
    molecular_formula: Field,
    molecular_weight: Field,
    optimal_conc: Field,
}

impl CompoundFields {
    fn schema() -> (Schema, Self) {
        let mut schema_builder = SchemaBuilder::new();

        // Stemmed text with positions so phrase queries keep working
        let text_indexing = TextFieldIndexing::default()
            .set_tokenizer("en_stem")
            .set_index_option(IndexRecordOption::WithFreqsAndPositions);
        let text_options = TextOptions::default().set_indexing_options(text_indexing);

        let fields = Self {
            hash: schema_builder.add_text_field("hash", STRING | STORED),
            name: schema_builder.add_text_field("name", text_options.clone()),
            synonyms: schema_builder.add_text_field("synonyms", text_options.clone()),
            overview: schema_builder.add_text_field("overview", text_options.clone()),
            tags: schema_builder.add_text_field("tags", text_options.clone()),
            written_by: schema_builder.add_text_field("written_by", text_options.clone()),
            references: schema_builder.add_text_field("references", text_options),
            cas_number: schema_builder.add_text_field("cas_number", STRING),
            class: schema_builder.add_text_field("class", STRING),
            chemical_formula: schema_builder.add_text_field("chemical_formula", STRING),
            molecular_formula: schema_builder.add_text_field("molecular_formula", STRING),
            molecular_weight: schema_builder.add_text_field("molecular_weight", STRING),
            optimal_conc: schema_builder.add_text_field("optimal_conc", STRING),
        };
        (schema_builder.build(), fields)
    }

    fn exact(&self, field: ExactField) -> Field {
        match field {
            ExactField::Hash => self.hash,
            ExactField::CasNumber => self.cas_number,
            ExactField::Class => self.class,
            ExactField::ChemicalFormula => self.chemical_formula,
            ExactField::MolecularFormula => self.molecular_formula,
            ExactField::MolecularWeight => self.molecular_weight,
            ExactField::OptimalConc => self.optimal_conc,
        }
    }

    fn weighted_text_fields(&self) -> [(Field, f32); 6] {
        let [name, synonyms, overview, tags, written_by, references] =
            TEXT_FIELD_WEIGHTS.map(|(_, weight)| weight);
        [
            (self.name, name),
            (self.synonyms, synonyms),
            (self.overview, overview),
            (self.tags, tags),
            (self.written_by, written_by),
            (self.references, references),
        ]
    }

    fn document(&self, record: &CompoundRecord) -> TantivyDocument {
        let mut doc = TantivyDocument::default();
        doc.add_text(self.hash, &record.hash);

        let optional_text = [
            (self.name, record.name.as_deref()),
            (self.overview, record.overview.as_deref()),
            (self.tags, record.tags.as_deref()),
        ];
        for (field, value) in optional_text {
            if let Some(val) = value {
                doc.add_text(field, val);
            }
        }
        for synonym in &record.synonyms {
            doc.add_text(self.synonyms, synonym);
        }
        for author in &record.written_by {
            doc.add_text(self.written_by, author);
        }
        for reference in record.references.iter().filter_map(|r| r.reference.as_deref()) {
            doc.add_text(self.references, reference);
        }

        for field in ExactField::ALL {
            if field == ExactField::Hash {
                continue;
            }
            if let Some(val) = field.value(record) {
                doc.add_text(self.exact(field), val);
            }
        }
        doc
    }
}

/// In-memory Tantivy index mapping queries to record hashes.
#[derive(Clone)]
pub struct CompoundIndex {
    index: Index,
    reader: IndexReader,
    fields: CompoundFields,
}

impl std::fmt::Debug for CompoundIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompoundIndex")
            .field("num_docs", &self.num_docs())
            .finish_non_exhaustive()
    }
}

impl CompoundIndex {
    /// Index every record. Records are expected to have unique hashes.
    #[instrument(name = "Build Compound Index", skip_all, fields(num_records = records.len()))]
    pub fn build(records: &[CompoundRecord]) -> Result<Self> {
        let (schema, fields) = CompoundFields::schema();
        let index = Index::create_in_ram(schema);

        let t_index = std::time::Instant::now();
        let mut index_writer: IndexWriter = index.writer_with_num_threads(1, WRITER_MEMORY_BYTES)?;
        for record in records {
            index_writer.add_document(fields.document(record))?;
        }
        index_writer.commit()?;
        if records.is_empty() {
            warn!("No records to index. Index will be empty.");
        }

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        info!(
            elapsed_seconds = t_index.elapsed().as_secs_f32(),
            "Index creation complete"
        );
        Ok(Self {
            index,
            reader,
            fields,
        })
    }

    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    /// Weighted, stemmed full-text search. Returns `(hash, score)` pairs in
    /// descending score order.
    ///
    /// Words are OR'd together and never read as query syntax: the parser
    /// only treats uppercase `AND`, `OR`, `NOT` and `IN` as operators, and the
    /// stemming tokenizer lowercases anyway.
    #[instrument(name = "Search Text Index", skip_all, level = "debug", fields(query = query_str, limit))]
    pub fn text_search(&self, query_str: &str, limit: usize) -> Result<Vec<(String, f32)>> {
        let query_str = query_str.trim().to_lowercase();
        if query_str.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let weighted = self.fields.weighted_text_fields();
        let mut query_parser =
            QueryParser::for_index(&self.index, weighted.iter().map(|(f, _)| *f).collect());
        for (field, boost) in weighted {
            query_parser.set_field_boost(field, boost);
        }
        let (query, errors) = query_parser.parse_query_lenient(&query_str);
        if errors.is_empty() {
            trace!(parsed_query = ?query, "Full-text query parsed");
        } else {
            warn!(?errors, "Query parsing errors occurred");
        }

        self.collect(&*query, limit)
    }

    /// Verbatim match on any of the given identifier fields. Scores are
    /// meaningless here and callers should ignore them.
    #[instrument(name = "Search Exact Fields", skip_all, level = "debug", fields(num_terms = terms.len(), limit))]
    pub fn exact_search(&self, terms: &[(ExactField, &str)], limit: usize) -> Result<Vec<String>> {
        if terms.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let clauses: Vec<(Occur, Box<dyn Query>)> = terms
            .iter()
            .map(|(field, value)| {
                let term = Term::from_field_text(self.fields.exact(*field), value);
                let query: Box<dyn Query> =
                    Box::new(TermQuery::new(term, IndexRecordOption::Basic));
                (Occur::Should, query)
            })
            .collect();
        let query = BooleanQuery::new(clauses);
        Ok(self
            .collect(&query, limit)?
            .into_iter()
            .map(|(hash, _)| hash)
            .collect())
    }

    fn collect(&self, query: &dyn Query, limit: usize) -> Result<Vec<(String, f32)>> {
        let searcher = self.reader.searcher();

        let t_search = std::time::Instant::now();
        let top_docs = searcher.search(query, &TopDocs::with_limit(limit))?;
        debug!(
            num_results = top_docs.len(),
            search_execution_seconds = t_search.elapsed().as_secs_f32(),
            "Tantivy search execution complete"
        );

        top_docs
            .into_iter()
            .map(|(score, doc_address)| {
                let doc = searcher.doc::<TantivyDocument>(doc_address)?;
                let hash = doc
                    .get_first(self.fields.hash)
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| anyhow::anyhow!("Indexed document has no hash: {doc:?}"))?;
                Ok((hash.to_string(), score))
            })
            .collect()
    }
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum IndexError {
        #[error("Tantivy error: {0}")]
        Tantivy(#[from] tantivy::TantivyError),
        #[error(transparent)]
        Other(#[from] anyhow::Error),
    }
    pub type Result<T> = std::result::Result<T, IndexError>;
}

#[cfg(test)]
mod tests {
    use cryosearch_data::sample_records;

    use super::*;

    fn index() -> CompoundIndex {
        CompoundIndex::build(&sample_records().unwrap()).unwrap()
    }

    #[test]
    fn test_indexes_every_record() {
        assert_eq!(index().num_docs(), 6);
    }

    #[test]
    fn test_name_outranks_overview_mention() {
        // "Trehalose" is only in Trehalose's name; "sugar" is in several overviews
        let hits = index().text_search("trehalose", 10).unwrap();
        assert_eq!(hits.first().map(|(h, _)| h.as_str()), Some("treh04"));
        assert!(hits.iter().all(|(_, score)| *score > 0.0));
    }

    #[test]
    fn test_stemming_matches_inflections() {
        let hits = index().text_search("embryo", 10).unwrap();
        let hashes: Vec<&str> = hits.iter().map(|(h, _)| h.as_str()).collect();
        assert!(hashes.contains(&"egly03"), "'embryos' should stem to 'embryo'");
        assert!(hashes.contains(&"prop06"));
    }

    #[test]
    fn test_scores_descend() {
        let hits = index().text_search("penetrating cryoprotectant", 10).unwrap();
        assert!(hits.len() >= 2);
        assert!(hits.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_uppercase_operator_words_are_plain_terms() {
        let index = index();
        let hits = index.text_search("NOT glycerol", 10).unwrap();
        assert_eq!(hits.first().map(|(h, _)| h.as_str()), Some("glyc02"));

        // Words are OR'd, so an unmatched word never empties the result
        let hits = index.text_search("Trehalose AND zzzz", 10).unwrap();
        assert_eq!(hits.first().map(|(h, _)| h.as_str()), Some("treh04"));
        let hits = index.text_search("sorbitol OR", 10).unwrap();
        assert_eq!(hits.first().map(|(h, _)| h.as_str()), Some("sorb05"));
    }

    #[test]
    fn test_exact_search_is_verbatim() {
        let index = index();
        let hits = index
            .exact_search(&[(ExactField::CasNumber, "56-81-5")], 10)
            .unwrap();
        assert_eq!(hits, vec!["glyc02".to_string()]);

        // Case matters for identifiers
        let hits = index.exact_search(&[(ExactField::Class, "polyol")], 10).unwrap();
        assert!(hits.is_empty());

        let hits = index.exact_search(&[(ExactField::Hash, "sorb05")], 10).unwrap();
        assert_eq!(hits, vec!["sorb05".to_string()]);
    }

    #[test]
    fn test_empty_query_and_zero_limit() {
        let index = index();
        assert!(index.text_search("   ", 10).unwrap().is_empty());
        assert!(index.text_search("glycerol", 0).unwrap().is_empty());
    }
}
