//! Wizard configuration as it appears on disk.
//!
//! The raw structs mirror the JSON document one-to-one; [`crate::Wizard`]
//! turns them into validated [`StepDefinition`]s, resolving named
//! predicates against a [`PredicateRegistry`].

use serde::{Deserialize, Serialize};

use crate::condition::{Condition, PredicateRegistry};
use crate::error::ConfigError;
use crate::types::{ClearSession, Fork, StepDefinition};

/// Top-level wizard configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawWizardConfig {
    /// First step of the journey. Defaults to the first declared step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    /// Step users return to after editing. Defaults to `/confirm`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_step: Option<String>,
    pub steps: Vec<RawStep>,
}

/// One step entry in the configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawStep {
    pub id: String,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default)]
    pub forks: Vec<RawFork>,
    #[serde(default)]
    pub continue_on_edit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_session: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default)]
    pub locals: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFork {
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<RawCondition>,
}

/// `{"field": .., "value": ..}` or `{"predicate": ".."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCondition {
    Field {
        field: String,
        value: serde_json::Value,
    },
    Predicate {
        predicate: String,
    },
}

impl RawWizardConfig {
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }
}

impl RawStep {
    /// Resolve this entry into a step definition. Targets are checked later,
    /// once every step is known.
    pub fn resolve(self, registry: &PredicateRegistry) -> Result<StepDefinition, ConfigError> {
        let mut forks = Vec::with_capacity(self.forks.len());
        for raw in self.forks {
            let condition = match raw.condition {
                None => None,
                Some(raw_condition) => Some(resolve_condition(&self.id, raw_condition, registry)?),
            };
            forks.push(Fork {
                target: raw.target,
                condition,
            });
        }

        Ok(StepDefinition {
            id: self.id,
            fields: self.fields,
            next: self.next,
            forks,
            continue_on_edit: self.continue_on_edit,
            clear_session: ClearSession::from(self.clear_session),
            template: self.template,
            locals: self.locals,
        })
    }
}

fn resolve_condition(
    step_id: &str,
    raw: RawCondition,
    registry: &PredicateRegistry,
) -> Result<Condition, ConfigError> {
    match raw {
        RawCondition::Field { field, value } => {
            if field.trim().is_empty() {
                return Err(ConfigError::InvalidCondition {
                    step: step_id.to_string(),
                    message: "field name must not be empty".to_string(),
                });
            }
            Ok(Condition::FieldEquals { field, value })
        }
        RawCondition::Predicate { predicate } => registry
            .get(&predicate)
            .cloned()
            .map(Condition::Predicate)
            .ok_or_else(|| ConfigError::UnknownPredicate {
                step: step_id.to_string(),
                predicate,
            }),
    }
}
