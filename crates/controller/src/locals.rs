//! Template context additions.

use serde::Serialize;
use stepflow_core::{FormValues, StepDefinition};

use crate::base::{FieldErrors, Locals};

/// How many validation errors the page is showing, in the shape error
/// summary templates switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLength {
    Single,
    Multiple,
}

impl Serialize for ErrorLength {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let key = match self {
            ErrorLength::Single => "single",
            ErrorLength::Multiple => "multiple",
        };
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(key, &true)?;
        map.end()
    }
}

impl ErrorLength {
    /// `None` when there is nothing to report.
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(ErrorLength::Single),
            _ => Some(ErrorLength::Multiple),
        }
    }
}

/// Progress through one declared step, derived from the values being
/// rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSummary {
    pub step: String,
    pub field_count: usize,
    pub answered: usize,
    pub error_count: usize,
}

impl StepSummary {
    pub fn for_step(step: &StepDefinition, values: &FormValues, errors: &FieldErrors) -> Self {
        StepSummary {
            step: step.id.clone(),
            field_count: step.fields.len(),
            answered: step
                .fields
                .iter()
                .filter(|field| values.get(field.as_str()).is_some_and(is_answered))
                .count(),
            error_count: step
                .fields
                .iter()
                .filter(|field| errors.contains_key(field.as_str()))
                .count(),
        }
    }
}

fn is_answered(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Extend the host's locals.
///
/// Adds `errorLength` when there are errors, then the step's static
/// `locals` (which win over anything the host set), then `stepSummaries`
/// covering every declared step in declaration order.
pub fn extend_locals(
    mut locals: Locals,
    errors: &FieldErrors,
    static_locals: &serde_json::Map<String, serde_json::Value>,
    steps: &[StepDefinition],
    values: &FormValues,
) -> Locals {
    if let Some(length) = ErrorLength::from_count(errors.len()) {
        if let Ok(value) = serde_json::to_value(length) {
            locals.insert("errorLength".to_string(), value);
        }
    }

    for (key, value) in static_locals {
        locals.insert(key.clone(), value.clone());
    }

    let summaries: Vec<serde_json::Value> = steps
        .iter()
        .map(|step| StepSummary::for_step(step, values, errors))
        .filter_map(|summary| serde_json::to_value(summary).ok())
        .collect();
    locals.insert(
        "stepSummaries".to_string(),
        serde_json::Value::Array(summaries),
    );

    locals
}
