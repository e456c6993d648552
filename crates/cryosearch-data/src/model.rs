//! Compound records as they are held by the datastore.
//!
//! Field names follow the stored document layout so that a dump of the
//! collection deserializes without any mapping layer. Missing and `null`
//! values are tolerated everywhere except for `hash`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single cryoprotectant compound entry.
///
/// `hash` is the only stable external identifier: it is unique across the
/// collection, never reused, and is what search results are deduplicated on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRecord {
    pub hash: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub written_by: Vec<String>,

    #[serde(default)]
    pub cas_number: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub chemical_formula: Option<String>,
    #[serde(default)]
    pub chemical_formula_html: Option<String>,
    #[serde(default)]
    pub molecular_formula: Option<String>,
    #[serde(default)]
    pub molecular_formula_html: Option<String>,
    #[serde(default)]
    pub molecular_weight: Option<String>,
    #[serde(default)]
    pub optimal_conc: Option<String>,

    #[serde(default)]
    pub structure_image: Option<String>,
    #[serde(default)]
    pub safety_document_sheet: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pricing_info: Vec<serde_json::Value>,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub html_text: Option<String>,
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub references: Vec<Reference>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cell_info: Vec<CellInfo>,
    #[serde(default)]
    pub gras_info: Option<GrasInfo>,

    #[serde(default, deserialize_with = "extended_json_date")]
    pub date_written: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "extended_json_date")]
    pub date_uploaded: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub organisation: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Reported effectiveness of the compound for a given cell type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellInfo {
    #[serde(default)]
    pub cell_type: Option<String>,
    /// Free-form in the source data, usually a percentage such as `"85"`.
    #[serde(default)]
    pub success_rate: Option<String>,
    #[serde(default, rename = "referenceURL")]
    pub reference_url: Option<String>,
}

impl CellInfo {
    /// The success rate as a number, when it parses as one.
    pub fn success_rate_value(&self) -> Option<f64> {
        self.success_rate
            .as_deref()
            .and_then(|rate| rate.trim().trim_end_matches('%').trim().parse().ok())
    }
}

/// Generally Recognized As Safe listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrasInfo {
    pub found: bool,
    #[serde(default)]
    pub reference_url: Option<String>,
}

impl CompoundRecord {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            name: None,
            synonyms: Vec::new(),
            overview: None,
            tags: None,
            written_by: Vec::new(),
            cas_number: None,
            class: None,
            chemical_formula: None,
            chemical_formula_html: None,
            molecular_formula: None,
            molecular_formula_html: None,
            molecular_weight: None,
            optimal_conc: None,
            structure_image: None,
            safety_document_sheet: None,
            pricing_info: Vec::new(),
            raw_text: None,
            html_text: None,
            version: None,
            references: Vec::new(),
            cell_info: Vec::new(),
            gras_info: None,
            date_written: None,
            date_uploaded: None,
        }
    }

    /// Leading numeric part of `molecular_weight`, e.g. `"78.13 g/mol"` -> `78.13`.
    pub fn molecular_weight_value(&self) -> Option<f64> {
        let weight = self.molecular_weight.as_deref()?.trim_start();
        let end = weight
            .char_indices()
            .find(|&(_, c)| !(c.is_ascii_digit() || c == '.'))
            .map_or(weight.len(), |(idx, _)| idx);
        let numeric = weight[..end].trim_end_matches('.');
        if numeric.is_empty() || !numeric.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        numeric.parse().ok()
    }

    pub fn is_gras(&self) -> bool {
        self.gras_info.as_ref().is_some_and(|gras| gras.found)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Dates as they appear in a collection export: a plain RFC 3339 string, or
/// extended JSON `{"$date": "..."}` (relaxed) and
/// `{"$date": {"$numberLong": "..."}}` (canonical, epoch milliseconds).
#[derive(Deserialize)]
#[serde(untagged)]
enum WireDate {
    Rfc3339(DateTime<Utc>),
    Extended {
        #[serde(rename = "$date")]
        date: ExtendedDate,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtendedDate {
    Rfc3339(DateTime<Utc>),
    Millis(i64),
    NumberLong {
        #[serde(rename = "$numberLong")]
        millis: String,
    },
}

fn extended_json_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(wire) = Option::<WireDate>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let millis = match wire {
        WireDate::Rfc3339(date)
        | WireDate::Extended {
            date: ExtendedDate::Rfc3339(date),
        } => return Ok(Some(date)),
        WireDate::Extended {
            date: ExtendedDate::Millis(millis),
        } => millis,
        WireDate::Extended {
            date: ExtendedDate::NumberLong { millis },
        } => millis.parse().map_err(serde::de::Error::custom)?,
    };
    DateTime::from_timestamp_millis(millis)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("date out of range: {millis} ms")))
}
