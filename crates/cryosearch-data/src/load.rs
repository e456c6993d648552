//! Loading a datastore dump into memory.
//!
//! Two layouts are accepted: a single JSON array of documents (what a
//! collection export produces) and newline-delimited JSON, one document per
//! line. The layout is detected from the first non-whitespace character.

use std::path::Path;

use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::error::{DataError, Result};
use crate::model::CompoundRecord;

/// Read and validate every record of the dump at `path`.
#[instrument(name = "Load Compound Dump", level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<CompoundRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DataError::DumpNotFound(path.to_path_buf()));
    }
    let t_load = std::time::Instant::now();
    let contents = std::fs::read_to_string(path)?;
    let records = parse_records(&contents)?;
    validate_records(&records)?;
    info!(
        records = records.len(),
        elapsed_seconds = t_load.elapsed().as_secs_f32(),
        "Loaded compound dump"
    );
    Ok(records)
}

/// Parse either a JSON array or NDJSON.
pub fn parse_records(contents: &str) -> Result<Vec<CompoundRecord>> {
    if contents.trim_start().starts_with('[') {
        debug!("Parsing dump as a JSON array");
        return Ok(serde_json::from_str(contents)?);
    }

    debug!("Parsing dump as newline-delimited JSON");
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| DataError::Line {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

/// Every hash must be a non-empty alphanumeric token and unique.
pub fn validate_records(records: &[CompoundRecord]) -> Result<()> {
    if let Some(bad) = records.iter().find(|r| !is_valid_hash(&r.hash)) {
        return Err(DataError::InvalidHash(bad.hash.clone()));
    }
    if let Some(dup) = records.iter().map(|r| r.hash.as_str()).duplicates().next() {
        return Err(DataError::DuplicateHash(dup.to_string()));
    }
    Ok(())
}

pub fn is_valid_hash(hash: &str) -> bool {
    !hash.is_empty() && hash.chars().all(|c| c.is_ascii_alphanumeric())
}
