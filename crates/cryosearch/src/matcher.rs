//! Approximate "did-you-mean" matching against the term index.
//!
//! Every cached term is scored against the query with Jaro-Winkler
//! similarity on lowercased text. The scan is linear in the number of
//! terms, which stays in the low thousands for this catalog.

use std::cmp::Ordering;

use rapidfuzz::distance::jaro_winkler;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::terms::TermEntry;

/// Added to the similarity of a term equal to the query ignoring case, so an
/// exact match always beats a near match.
pub const EXACT_MATCH_BONUS: f64 = 0.1;

/// A closest match is only offered as a suggestion above this similarity.
pub const SUGGESTION_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    /// Best scoring term, or the input itself when nothing scored above zero.
    pub closest_match: String,
    /// `closest_match` when it is confident and differs from the input
    /// (ignoring case); empty otherwise.
    pub suggestion: String,
    #[serde(skip)]
    pub score: f64,
}

impl Suggestion {
    pub fn has_suggestion(&self) -> bool {
        !self.suggestion.is_empty()
    }
}

/// Similarity of two lowercased strings, with the exact-match bonus applied.
pub fn similarity(term_lower: &str, input_lower: &str) -> f64 {
    let score = jaro_winkler::normalized_similarity(term_lower.chars(), input_lower.chars());
    if term_lower == input_lower {
        score + EXACT_MATCH_BONUS
    } else {
        score
    }
}

/// Find the closest known term to `input`.
///
/// Ties go to the term that comes first in `terms`. The input is its own
/// fallback closest match, so this never fails; an empty term list yields
/// `{closest_match: input, suggestion: ""}`.
#[instrument(name = "Suggest Closest Term", level = "debug", skip(terms), fields(num_terms = terms.len()))]
pub fn suggest(input: &str, terms: &[TermEntry]) -> Suggestion {
    let input_lower = input.to_lowercase();

    let best = terms
        .par_iter()
        .enumerate()
        .map(|(idx, entry)| (idx, similarity(&entry.term.to_lowercase(), &input_lower)))
        .filter(|&(_, score)| score > 0.0)
        // Strictly greater wins; equal scores keep the earlier term
        .reduce_with(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Greater => b,
            Ordering::Equal if b.0 < a.0 => b,
            _ => a,
        });

    let (closest_match, score) = match best {
        Some((idx, score)) => (terms[idx].term.clone(), score),
        None => (input.to_string(), 0.0),
    };

    let suggestion = if score > SUGGESTION_THRESHOLD && closest_match.to_lowercase() != input_lower
    {
        closest_match.clone()
    } else {
        String::new()
    };
    debug!(closest_match, score, suggestion, "Closest term found");

    Suggestion {
        closest_match,
        suggestion,
        score,
    }
}
