//! Paged catalog listings: the article index and the reference list.

use ahash::AHashMap as HashMap;
use cryosearch_data::CompoundRecord;
use serde::Serialize;

use crate::query::ValidationError;
use crate::store::SearchHit;

pub const DEFAULT_PAGE_LIMIT: usize = 36;
pub const MAX_PAGE_LIMIT: usize = 36;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// `page` defaults to 1 and `limit` to [`DEFAULT_PAGE_LIMIT`]; `limit` is
    /// capped at [`MAX_PAGE_LIMIT`]. Zero for either is rejected.
    pub fn new(page: Option<usize>, limit: Option<usize>) -> Result<Self, ValidationError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT);
        if page == 0 || limit == 0 {
            return Err(ValidationError::InvalidPage);
        }
        Ok(Self { page, limit })
    }

    pub fn skip(self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(self, total: usize) -> usize {
        total.div_ceil(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexPage {
    pub chem_class_filters: Vec<String>,
    pub cell_type_filters: Vec<String>,
    pub entries: Vec<SearchHit>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleLink {
    pub name: Option<String>,
    pub hash: String,
}

/// A cited source and every compound citing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceGroup {
    pub reference: Option<String>,
    pub url: Option<String>,
    pub organisation: Option<String>,
    #[serde(rename = "article")]
    pub articles: Vec<ArticleLink>,
}

impl ReferenceGroup {
    fn matches(&self, query_lower: &str) -> bool {
        let contains = |value: Option<&str>| {
            value.is_some_and(|v| v.to_lowercase().contains(query_lower))
        };
        contains(self.reference.as_deref())
            || contains(self.url.as_deref())
            || contains(self.organisation.as_deref())
            || self
                .articles
                .iter()
                .any(|article| contains(article.name.as_deref()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePage {
    pub references: Vec<ReferenceGroup>,
    pub total_pages: usize,
    pub current_page: usize,
    pub total_items: usize,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// Group every citation by URL, or by citation text when there is no URL,
/// in first-seen order. Citations with no URL and no text are never merged.
/// Entries with nothing filled in are dropped.
pub fn group_references(records: &[CompoundRecord]) -> Vec<ReferenceGroup> {
    let mut groups: Vec<ReferenceGroup> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for record in records {
        for reference in &record.references {
            let text = non_empty(reference.reference.as_ref());
            let url = non_empty(reference.url.as_ref());
            let organisation = non_empty(reference.organisation.as_ref());
            if text.is_none() && url.is_none() && organisation.is_none() {
                continue;
            }

            let key = url.clone().or_else(|| text.clone());
            let existing = key.as_ref().and_then(|k| by_key.get(k).copied());
            let slot = match existing {
                Some(slot) => slot,
                None => {
                    groups.push(ReferenceGroup {
                        reference: text,
                        url,
                        organisation,
                        articles: Vec::new(),
                    });
                    if let Some(key) = key {
                        by_key.insert(key, groups.len() - 1);
                    }
                    groups.len() - 1
                }
            };

            let articles = &mut groups[slot].articles;
            if !articles.iter().any(|a| a.hash == record.hash) {
                articles.push(ArticleLink {
                    name: record.name.clone(),
                    hash: record.hash.clone(),
                });
            }
        }
    }
    groups
}

/// Filter grouped references by a case-insensitive substring and cut one
/// page out of the result.
pub fn reference_page(
    groups: Vec<ReferenceGroup>,
    search: Option<&str>,
    request: PageRequest,
) -> ReferencePage {
    let search = search.map(str::trim).filter(|s| !s.is_empty());
    let matching: Vec<ReferenceGroup> = match search {
        Some(query) => {
            let query_lower = query.to_lowercase();
            groups
                .into_iter()
                .filter(|group| group.matches(&query_lower))
                .collect()
        }
        None => groups,
    };

    let total_items = matching.len();
    ReferencePage {
        references: matching
            .into_iter()
            .skip(request.skip())
            .take(request.limit)
            .collect(),
        total_pages: request.total_pages(total_items),
        current_page: request.page,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use cryosearch_data::{Reference, sample_records};

    use super::*;

    fn reference(text: Option<&str>, url: Option<&str>) -> Reference {
        Reference {
            organisation: None,
            reference: text.map(str::to_string),
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_page_request_defaults_and_cap() {
        assert_eq!(
            PageRequest::new(None, None),
            Ok(PageRequest { page: 1, limit: 36 })
        );
        assert_eq!(PageRequest::new(Some(2), Some(100)).unwrap().limit, 36);
        assert_eq!(
            PageRequest::new(Some(0), None),
            Err(ValidationError::InvalidPage)
        );
        assert_eq!(
            PageRequest::new(None, Some(0)),
            Err(ValidationError::InvalidPage)
        );

        let request = PageRequest::new(Some(3), Some(4)).unwrap();
        assert_eq!(request.skip(), 8);
        assert_eq!(request.total_pages(9), 3);
        assert_eq!(request.total_pages(0), 0);
    }

    #[test]
    fn test_references_group_by_url_then_text() {
        let mut first = CompoundRecord::new("a1");
        first.name = Some("Glycerol".to_string());
        first.references = vec![
            reference(Some("Polge 1949"), Some("https://example.org/p")),
            reference(Some("Untracked note"), None),
            reference(None, None),
        ];
        let mut second = CompoundRecord::new("b2");
        second.name = Some("Sorbitol".to_string());
        second.references = vec![
            reference(Some("Polge et al."), Some("https://example.org/p")),
            reference(Some("Untracked note"), None),
            reference(Some("Untracked note"), None),
        ];

        let groups = group_references(&[first, second]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].reference.as_deref(), Some("Polge 1949"));
        let cited_by: Vec<&str> = groups[1].articles.iter().map(|a| a.hash.as_str()).collect();
        assert_eq!(cited_by, vec!["a1", "b2"]);
    }

    #[test]
    fn test_reference_search_and_paging() {
        let groups = group_references(&sample_records().unwrap());
        let all = reference_page(groups.clone(), None, PageRequest::new(None, None).unwrap());
        assert_eq!(all.total_items, groups.len());
        assert_eq!(all.total_pages, 1);

        let found = reference_page(
            groups.clone(),
            Some("  POLGE "),
            PageRequest::new(None, None).unwrap(),
        );
        assert_eq!(found.total_items, 1);
        assert_eq!(found.references[0].articles[0].hash, "glyc02");

        let second = reference_page(groups, None, PageRequest::new(Some(2), Some(1)).unwrap());
        assert_eq!(second.references.len(), 1);
        assert_eq!(second.current_page, 2);
    }
}
