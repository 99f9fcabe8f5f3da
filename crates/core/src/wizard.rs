//! A validated wizard: step definitions, indexes and the step graph.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::condition::PredicateRegistry;
use crate::config::RawWizardConfig;
use crate::error::ConfigError;
use crate::graph::StepGraph;
use crate::types::StepDefinition;

/// Confirmation step used when the configuration does not name one.
pub const DEFAULT_CONFIRM_STEP: &str = "/confirm";

/// Immutable wizard configuration, built once at startup and shared by
/// every request (typically behind an `Arc`).
#[derive(Debug, Clone)]
pub struct Wizard {
    steps: Vec<StepDefinition>,
    step_index: HashMap<String, usize>,
    entry: String,
    confirm_step: String,
    graph: StepGraph,
}

impl Wizard {
    /// Validate `steps` and build the step graph.
    ///
    /// Every `next` pointer and fork target must name a declared step; the
    /// confirmation step is the one exception, since hosts commonly serve it
    /// outside the wizard's own step list.
    pub fn new(
        steps: Vec<StepDefinition>,
        confirm_step: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let confirm_step = confirm_step.into();

        let mut step_index = HashMap::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            if step_index.insert(step.id.clone(), i).is_some() {
                return Err(ConfigError::DuplicateStep {
                    step: step.id.clone(),
                });
            }
        }

        for step in &steps {
            if let Some(next) = step.next.as_deref() {
                check_target(&step_index, &confirm_step, next, || {
                    format!("next of step '{}'", step.id)
                })?;
            }
            for fork in &step.forks {
                check_target(&step_index, &confirm_step, &fork.target, || {
                    format!("fork of step '{}'", step.id)
                })?;
            }
        }

        let entry = steps.first().map(|s| s.id.clone()).unwrap_or_default();
        let graph = StepGraph::from_steps(&steps);
        debug!(
            steps = steps.len(),
            edges = graph.edge_count(),
            confirm_step = %confirm_step,
            "built step graph"
        );

        Ok(Wizard {
            steps,
            step_index,
            entry,
            confirm_step,
            graph,
        })
    }

    /// Override the entry step (defaults to the first declared step).
    pub fn with_entry(mut self, entry: impl Into<String>) -> Result<Self, ConfigError> {
        let entry = entry.into();
        if !self.step_index.contains_key(&entry) {
            return Err(ConfigError::UnknownStep {
                step: entry,
                referenced_by: "wizard entry".to_string(),
            });
        }
        self.entry = entry;
        Ok(self)
    }

    pub fn from_config(
        raw: RawWizardConfig,
        registry: &PredicateRegistry,
    ) -> Result<Self, ConfigError> {
        let steps = raw
            .steps
            .into_iter()
            .map(|step| step.resolve(registry))
            .collect::<Result<Vec<_>, _>>()?;
        let confirm_step = raw
            .confirm_step
            .unwrap_or_else(|| DEFAULT_CONFIRM_STEP.to_string());

        let wizard = Wizard::new(steps, confirm_step)?;
        match raw.entry {
            Some(entry) => wizard.with_entry(entry),
            None => Ok(wizard),
        }
    }

    pub fn from_json(
        value: &serde_json::Value,
        registry: &PredicateRegistry,
    ) -> Result<Self, ConfigError> {
        Wizard::from_config(RawWizardConfig::from_json(value)?, registry)
    }

    pub fn from_json_str(source: &str, registry: &PredicateRegistry) -> Result<Self, ConfigError> {
        Wizard::from_config(RawWizardConfig::from_json_str(source)?, registry)
    }

    /// Read and validate a configuration file.
    pub fn load(path: &Path, registry: &PredicateRegistry) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Wizard::from_json_str(&source, registry)
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn step(&self, id: &str) -> Option<&StepDefinition> {
        self.step_index.get(id).map(|&i| &self.steps[i])
    }

    /// Like [`Wizard::step`], but a missing step is a configuration error
    /// attributed to `referenced_by`.
    pub fn require_step(
        &self,
        id: &str,
        referenced_by: &str,
    ) -> Result<&StepDefinition, ConfigError> {
        self.step(id).ok_or_else(|| ConfigError::UnknownStep {
            step: id.to_string(),
            referenced_by: referenced_by.to_string(),
        })
    }

    /// Steps in declaration order.
    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn confirm_step(&self) -> &str {
        &self.confirm_step
    }

    pub fn graph(&self) -> &StepGraph {
        &self.graph
    }
}

fn check_target(
    index: &HashMap<String, usize>,
    confirm_step: &str,
    target: &str,
    referenced_by: impl FnOnce() -> String,
) -> Result<(), ConfigError> {
    if target == confirm_step || index.contains_key(target) {
        return Ok(());
    }
    Err(ConfigError::UnknownStep {
        step: target.to_string(),
        referenced_by: referenced_by(),
    })
}
