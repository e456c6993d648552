//! Catalog filtering by class, molecular weight, GRAS status and reported
//! cell-type effectiveness.
//!
//! A [`FilterPipeline`] is an ordered list of typed predicates built with
//! [`FilterPipelineBuilder`]. Each predicate can be evaluated on its own
//! against a record; the pipeline applies them all, trims each record's
//! `cell_info` to the entries that satisfy the cell criteria and orders the
//! survivors.

use std::cmp::Ordering;

use cryosearch_data::{CellInfo, CompoundRecord};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::query::ValidationError;

mod input;

pub use input::{ClassSelection, FilterInput, GrasInput, NumberInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrasFilter {
    /// Keep compounds with a GRAS listing whose `found` flag equals this.
    Found(bool),
    /// Keep everything, GRAS-listed compounds first.
    PreferFound,
}

/// Constraints on individual `cell_info` entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellCriteria {
    /// Compared trimmed and case-insensitively.
    pub cell_type: Option<String>,
    pub success_min: Option<f64>,
    pub success_max: Option<f64>,
}

impl CellCriteria {
    pub fn is_empty(&self) -> bool {
        self.cell_type.is_none() && self.success_min.is_none() && self.success_max.is_none()
    }

    pub fn admits(&self, info: &CellInfo) -> bool {
        if let Some(wanted) = &self.cell_type {
            let matches_type = info
                .cell_type
                .as_deref()
                .is_some_and(|cell| cell.trim().eq_ignore_ascii_case(wanted.trim()));
            if !matches_type {
                return false;
            }
        }
        if self.success_min.is_none() && self.success_max.is_none() {
            return true;
        }
        info.success_rate_value().is_some_and(|rate| {
            self.success_min.is_none_or(|min| rate >= min)
                && self.success_max.is_none_or(|max| rate <= max)
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterPredicate {
    ClassIn(Vec<String>),
    /// Inclusive bounds on the leading numeric part of `molecular_weight`;
    /// records without a parseable weight never match.
    MolecularWeightRange {
        min: Option<f64>,
        max: Option<f64>,
    },
    Gras(GrasFilter),
    /// At least one `cell_info` entry satisfies the criteria.
    CellCriteria(CellCriteria),
}

impl FilterPredicate {
    pub fn matches(&self, record: &CompoundRecord) -> bool {
        match self {
            Self::ClassIn(classes) => record
                .class
                .as_ref()
                .is_some_and(|class| classes.contains(class)),
            Self::MolecularWeightRange { min, max } => {
                record.molecular_weight_value().is_some_and(|weight| {
                    min.is_none_or(|min| weight >= min) && max.is_none_or(|max| weight <= max)
                })
            }
            Self::Gras(GrasFilter::Found(found)) => record
                .gras_info
                .as_ref()
                .is_some_and(|gras| gras.found == *found),
            Self::Gras(GrasFilter::PreferFound) => true,
            Self::CellCriteria(criteria) => record.cell_info.iter().any(|info| criteria.admits(info)),
        }
    }
}

/// One row of a filter result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredCompound {
    pub name: Option<String>,
    pub hash: String,
    pub class: Option<String>,
    pub overview: Option<String>,
    pub structure_image: Option<String>,
    pub molecular_weight: Option<String>,
    /// The record's cell entries that satisfy the cell criteria, best
    /// success rate first.
    pub sorted_cell_info: Vec<CellInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResponse {
    pub results: Vec<FilteredCompound>,
    pub classes: Vec<String>,
    pub unique_cell_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPipeline {
    predicates: Vec<FilterPredicate>,
}

impl FilterPipeline {
    pub fn builder() -> FilterPipelineBuilder {
        FilterPipelineBuilder::default()
    }

    /// Build a pipeline from the wire form; blank fields are ignored.
    pub fn from_input(input: &FilterInput) -> Result<Self, ValidationError> {
        let mut builder = Self::builder();
        if let Some(classes) = &input.selected_classes {
            builder = builder.class_in(classes.to_vec());
        }
        builder = builder.molecular_weight(
            input::parse_number("weightRangeMin", input.weight_range_min.as_ref())?,
            input::parse_number("weightRangeMax", input.weight_range_max.as_ref())?,
        );
        if let Some(gras) = &input.gras {
            builder = builder.gras(gras.to_filter());
        }
        builder = builder.cell_criteria(CellCriteria {
            cell_type: input
                .cell_type
                .as_deref()
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(str::to_string),
            success_min: input::parse_number("successRateMin", input.success_rate_min.as_ref())?,
            success_max: input::parse_number("successRateMax", input.success_rate_max.as_ref())?,
        });
        Ok(builder.build())
    }

    pub fn predicates(&self) -> &[FilterPredicate] {
        &self.predicates
    }

    fn cell_criteria(&self) -> Option<&CellCriteria> {
        self.predicates.iter().find_map(|predicate| match predicate {
            FilterPredicate::CellCriteria(criteria) => Some(criteria),
            _ => None,
        })
    }

    fn prefers_gras(&self) -> bool {
        self.predicates
            .contains(&FilterPredicate::Gras(GrasFilter::PreferFound))
    }

    /// Keep the records every predicate matches, in result order.
    ///
    /// Rows are ordered by their best surviving success rate, highest first
    /// and rows without one last; with [`GrasFilter::PreferFound`], GRAS
    /// listing breaks ties. The sort is stable, so remaining ties keep
    /// collection order.
    #[instrument(name = "Apply Filter Pipeline", level = "debug", skip_all, fields(num_records = records.len(), num_predicates = self.predicates.len()))]
    pub fn apply(&self, records: &[CompoundRecord]) -> Vec<FilteredCompound> {
        let criteria = self.cell_criteria();
        let mut kept: Vec<(FilteredCompound, Option<f64>, bool)> = records
            .iter()
            .filter(|record| self.predicates.iter().all(|p| p.matches(record)))
            .map(|record| {
                let mut cells: Vec<CellInfo> = record
                    .cell_info
                    .iter()
                    .filter(|info| criteria.is_none_or(|c| c.admits(info)))
                    .cloned()
                    .collect();
                cells.sort_by(|a, b| {
                    by_success_rate_desc(a.success_rate_value(), b.success_rate_value())
                });
                let best = cells
                    .iter()
                    .filter_map(CellInfo::success_rate_value)
                    .reduce(f64::max);
                (project(record, cells), best, record.is_gras())
            })
            .collect();

        let prefer_gras = self.prefers_gras();
        kept.sort_by(|(_, rate_a, gras_a), (_, rate_b, gras_b)| {
            by_success_rate_desc(*rate_a, *rate_b).then_with(|| {
                if prefer_gras {
                    gras_b.cmp(gras_a)
                } else {
                    Ordering::Equal
                }
            })
        });
        debug!(num_results = kept.len(), "Filter applied");

        kept.into_iter().map(|(row, _, _)| row).collect()
    }
}

fn by_success_rate_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn project(record: &CompoundRecord, sorted_cell_info: Vec<CellInfo>) -> FilteredCompound {
    FilteredCompound {
        name: record.name.clone(),
        hash: record.hash.clone(),
        class: record.class.clone(),
        overview: record.overview.clone(),
        structure_image: record.structure_image.clone(),
        molecular_weight: record.molecular_weight.clone(),
        sorted_cell_info,
    }
}

/// Composes predicates; each setter is a no-op when given nothing to
/// filter on.
#[derive(Debug, Clone, Default)]
pub struct FilterPipelineBuilder {
    predicates: Vec<FilterPredicate>,
}

impl FilterPipelineBuilder {
    pub fn class_in(mut self, classes: Vec<String>) -> Self {
        let classes: Vec<String> = classes.into_iter().filter(|c| !c.is_empty()).collect();
        if !classes.is_empty() {
            self.predicates.push(FilterPredicate::ClassIn(classes));
        }
        self
    }

    pub fn molecular_weight(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        if min.is_some() || max.is_some() {
            self.predicates
                .push(FilterPredicate::MolecularWeightRange { min, max });
        }
        self
    }

    pub fn gras(mut self, filter: GrasFilter) -> Self {
        self.predicates.push(FilterPredicate::Gras(filter));
        self
    }

    pub fn cell_criteria(mut self, criteria: CellCriteria) -> Self {
        if !criteria.is_empty() {
            self.predicates.push(FilterPredicate::CellCriteria(criteria));
        }
        self
    }

    pub fn build(self) -> FilterPipeline {
        FilterPipeline {
            predicates: self.predicates,
        }
    }
}

#[cfg(test)]
mod tests {
    use cryosearch_data::sample_records;

    use super::*;

    fn hashes(rows: &[FilteredCompound]) -> Vec<&str> {
        rows.iter().map(|row| row.hash.as_str()).collect()
    }

    fn record(hash: &str) -> CompoundRecord {
        sample_records()
            .unwrap()
            .into_iter()
            .find(|r| r.hash == hash)
            .unwrap()
    }

    #[test]
    fn test_class_predicate() {
        let predicate = FilterPredicate::ClassIn(vec!["Diol".to_string(), "Sugar".to_string()]);
        assert!(predicate.matches(&record("egly03")));
        assert!(predicate.matches(&record("treh04")));
        assert!(!predicate.matches(&record("sorb05")));
    }

    #[test]
    fn test_weight_predicate_parses_leading_number() {
        let predicate = FilterPredicate::MolecularWeightRange {
            min: Some(70.0),
            max: Some(80.0),
        };
        assert!(predicate.matches(&record("dmso01")));
        assert!(predicate.matches(&record("prop06")));
        assert!(!predicate.matches(&record("glyc02")));

        let mut no_weight = record("glyc02");
        no_weight.molecular_weight = Some("unknown".to_string());
        let open = FilterPredicate::MolecularWeightRange {
            min: None,
            max: Some(1000.0),
        };
        assert!(!open.matches(&no_weight));
    }

    #[test]
    fn test_gras_predicate() {
        let listed = FilterPredicate::Gras(GrasFilter::Found(true));
        let unlisted = FilterPredicate::Gras(GrasFilter::Found(false));
        assert!(listed.matches(&record("glyc02")));
        assert!(unlisted.matches(&record("dmso01")));

        let mut missing = record("glyc02");
        missing.gras_info = None;
        assert!(!listed.matches(&missing));
        assert!(!unlisted.matches(&missing));
        assert!(FilterPredicate::Gras(GrasFilter::PreferFound).matches(&missing));
    }

    #[test]
    fn test_cell_criteria_is_case_insensitive() {
        let criteria = CellCriteria {
            cell_type: Some("  oocyte ".to_string()),
            success_min: Some(70.0),
            success_max: None,
        };
        let predicate = FilterPredicate::CellCriteria(criteria);
        assert!(predicate.matches(&record("egly03")));
        // DMSO's oocyte entry is below the minimum
        assert!(!predicate.matches(&record("dmso01")));
    }

    #[test]
    fn test_builder_skips_empty_inputs() {
        let pipeline = FilterPipeline::builder()
            .class_in(vec![String::new()])
            .molecular_weight(None, None)
            .cell_criteria(CellCriteria::default())
            .build();
        assert!(pipeline.predicates().is_empty());
        assert_eq!(pipeline.apply(&sample_records().unwrap()).len(), 6);
    }

    #[test]
    fn test_unfiltered_order_is_best_success_rate_first() {
        let rows = FilterPipeline::default().apply(&sample_records().unwrap());
        assert_eq!(
            hashes(&rows),
            vec!["glyc02", "dmso01", "egly03", "prop06", "treh04", "sorb05"]
        );
        assert_eq!(
            rows[0].sorted_cell_info[0].cell_type.as_deref(),
            Some("Red blood cell")
        );
    }

    #[test]
    fn test_cell_criteria_trims_cell_info() {
        let pipeline = FilterPipeline::builder()
            .cell_criteria(CellCriteria {
                cell_type: Some("Fibroblast".to_string()),
                success_min: None,
                success_max: None,
            })
            .build();
        let rows = pipeline.apply(&sample_records().unwrap());
        assert_eq!(hashes(&rows), vec!["dmso01", "treh04"]);
        assert!(rows.iter().all(|row| row.sorted_cell_info.len() == 1));
    }

    #[test]
    fn test_prefer_gras_breaks_ties() {
        let mut records = sample_records().unwrap();
        for record in &mut records {
            record.cell_info.clear();
        }
        let rows = FilterPipeline::builder()
            .gras(GrasFilter::PreferFound)
            .build()
            .apply(&records);
        assert_eq!(
            hashes(&rows),
            vec!["glyc02", "treh04", "sorb05", "prop06", "dmso01", "egly03"]
        );
    }

    #[test]
    fn test_combined_predicates() {
        let pipeline = FilterPipeline::builder()
            .class_in(vec!["Diol".to_string()])
            .gras(GrasFilter::Found(true))
            .build();
        let rows = pipeline.apply(&sample_records().unwrap());
        assert_eq!(hashes(&rows), vec!["prop06"]);
    }
}
