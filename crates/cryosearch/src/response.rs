//! Externally visible response shapes.

use serde::Serialize;

use crate::matcher::Suggestion;
use crate::store::SearchHit;

/// Full search result: did-you-mean plus ranked hits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    /// Suggested alternate query; empty when there is none.
    pub dym: String,
    /// `dym`, percent-encoded for use in a link.
    pub dym_href: String,
    pub search_results: Vec<SearchHit>,
}

/// Quick search projection. Only named compounds are offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickHit {
    pub name: String,
    pub hash: String,
}

impl TryFrom<SearchHit> for QuickHit {
    type Error = SearchHit;

    fn try_from(hit: SearchHit) -> Result<Self, Self::Error> {
        match hit.name {
            Some(name) if !name.trim().is_empty() && !hit.hash.is_empty() => Ok(Self {
                name,
                hash: hit.hash,
            }),
            _ => Err(hit),
        }
    }
}

pub fn assemble(suggestion: &Suggestion, search_results: Vec<SearchHit>) -> SearchResponse {
    SearchResponse {
        dym: suggestion.suggestion.clone(),
        dym_href: urlencoding::encode(&suggestion.suggestion).into_owned(),
        search_results,
    }
}

/// Project hits for type-ahead, dropping any without a name.
pub fn assemble_quick(hits: Vec<SearchHit>) -> Vec<QuickHit> {
    hits.into_iter()
        .filter_map(|hit| QuickHit::try_from(hit).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(text: &str) -> Suggestion {
        Suggestion {
            closest_match: text.to_string(),
            suggestion: text.to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn test_dym_href_is_percent_encoded() {
        let response = assemble(&suggestion("Dimethyl Sulfoxide"), Vec::new());
        assert_eq!(response.dym, "Dimethyl Sulfoxide");
        assert_eq!(response.dym_href, "Dimethyl%20Sulfoxide");

        let response = assemble(&suggestion("Propane-1,2-diol"), Vec::new());
        assert_eq!(response.dym_href, "Propane-1%2C2-diol");
    }

    #[test]
    fn test_no_suggestion_gives_empty_strings() {
        let response = assemble(&suggestion(""), Vec::new());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"dym": "", "dym_href": "", "search_results": []})
        );
    }

    #[test]
    fn test_quick_hits_keep_name_and_hash_only() {
        let hit = SearchHit {
            name: Some("Glycerol".to_string()),
            overview: Some("long text".to_string()),
            hash: "glyc02".to_string(),
            structure_image: None,
            score: 0.0,
        };
        let value = serde_json::to_value(assemble_quick(vec![hit])).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"name": "Glycerol", "hash": "glyc02"}])
        );
    }

    #[test]
    fn test_quick_hits_without_a_name_are_dropped() {
        let hit = |hash: &str, name: Option<&str>| SearchHit {
            name: name.map(str::to_string),
            overview: None,
            hash: hash.to_string(),
            structure_image: None,
            score: 0.0,
        };
        let hits = vec![
            hit("a1", None),
            hit("b2", Some("Trehalose")),
            hit("c3", Some("  ")),
        ];
        let value = serde_json::to_value(assemble_quick(hits)).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"name": "Trehalose", "hash": "b2"}])
        );
    }
}
