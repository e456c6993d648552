//! Validation and cleaning of raw user queries.
//!
//! A raw query goes through, in order: presence check, unsafe character
//! check (on the text as received), percent-decoding, punctuation
//! stripping, and a minimum length check on what is left. Two strings come
//! out: the decoded text, which keeps punctuation for identifier matching
//! (chemical formulas, CAS numbers), and the sanitized text used for
//! full-text and fuzzy matching.

use thiserror::Error;
use tracing::trace;

/// Characters rejected anywhere in a raw query.
pub const UNSAFE_CHARS: [char; 5] = [';', '<', '>', '|', '&'];

pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Query is undefined or invalid")]
    Missing,
    #[error("Invalid characters in query")]
    InvalidCharacters,
    #[error("Invalid query encoding")]
    Encoding,
    #[error("Query is too short. Please enter at least {min_len} characters.")]
    TooShort { min_len: usize },
    #[error("Invalid hash")]
    InvalidHash,
    #[error("Invalid page or limit")]
    InvalidPage,
    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// How strict a given search surface is about its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    /// Minimum number of characters left after sanitizing.
    pub min_len: usize,
    pub reject_unsafe: bool,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_MIN_QUERY_LEN,
            reject_unsafe: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    /// Percent-decoded and trimmed, punctuation kept.
    pub decoded: String,
    /// Word characters and whitespace only, trimmed.
    pub sanitized: String,
}

pub fn validate(raw: Option<&str>, policy: &QueryPolicy) -> Result<ValidatedQuery, ValidationError> {
    let raw = raw.filter(|r| !r.is_empty()).ok_or(ValidationError::Missing)?;

    if policy.reject_unsafe && raw.contains(UNSAFE_CHARS) {
        return Err(ValidationError::InvalidCharacters);
    }

    let decoded = percent_decode(raw)?;
    let sanitized = sanitize(&decoded);
    trace!(decoded, sanitized, "Query cleaned");

    if sanitized.chars().count() < policy.min_len {
        return Err(ValidationError::TooShort {
            min_len: policy.min_len,
        });
    }

    Ok(ValidatedQuery {
        decoded: decoded.trim().to_string(),
        sanitized,
    })
}

/// Keep only word characters and whitespace, then trim.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|&c| is_word_char(c) || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Decode `%XX` escapes. A `%` not followed by two hex digits, or escapes
/// that do not form valid UTF-8, are an encoding error.
pub fn percent_decode(raw: &str) -> Result<String, ValidationError> {
    let bytes = raw.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' {
            let escape = bytes.get(idx + 1..idx + 3).ok_or(ValidationError::Encoding)?;
            if !escape.iter().all(u8::is_ascii_hexdigit) {
                return Err(ValidationError::Encoding);
            }
            idx += 3;
        } else {
            idx += 1;
        }
    }
    urlencoding::decode(raw)
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| ValidationError::Encoding)
}

/// Record hashes are short alphanumeric tokens.
pub fn validate_hash(hash: &str) -> Result<&str, ValidationError> {
    if cryosearch_data::is_valid_hash(hash) {
        Ok(hash)
    } else {
        Err(ValidationError::InvalidHash)
    }
}
