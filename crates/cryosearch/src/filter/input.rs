use serde::Deserialize;

use super::GrasFilter;
use crate::query::ValidationError;

/// Filter request as sent by clients. Every field is optional and blank
/// values mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterInput {
    pub selected_classes: Option<ClassSelection>,
    pub weight_range_min: Option<NumberInput>,
    pub weight_range_max: Option<NumberInput>,
    pub success_rate_min: Option<NumberInput>,
    pub success_rate_max: Option<NumberInput>,
    pub cell_type: Option<String>,
    #[serde(rename = "GRAS")]
    pub gras: Option<GrasInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ClassSelection {
    One(String),
    Many(Vec<String>),
}

impl ClassSelection {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(class) => vec![class.clone()],
            Self::Many(classes) => classes.clone(),
        }
    }
}

/// Numeric bounds arrive as text from form fields, or as JSON numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GrasInput {
    Flag(bool),
    Text(String),
}

impl GrasInput {
    /// `true`/`false` (as booleans or text) select on the flag; any other
    /// value only asks for GRAS-listed compounds first.
    pub fn to_filter(&self) -> GrasFilter {
        match self {
            Self::Flag(found) => GrasFilter::Found(*found),
            Self::Text(text) => match text.trim() {
                "true" => GrasFilter::Found(true),
                "false" => GrasFilter::Found(false),
                _ => GrasFilter::PreferFound,
            },
        }
    }
}

pub(super) fn parse_number(
    field: &'static str,
    value: Option<&NumberInput>,
) -> Result<Option<f64>, ValidationError> {
    match value {
        None => Ok(None),
        Some(NumberInput::Number(n)) => Ok(Some(*n)),
        Some(NumberInput::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberInput::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidNumber {
                field,
                value: text.clone(),
            }),
    }
}
