//! Fork conditions.
//!
//! A condition is either a field-equality rule, checked against the values
//! submitted with the request, or a named predicate over the whole request.
//! Predicates are registered in code and referenced from configuration by
//! name, so a wizard's JSON stays declarative.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::types::NavigationRequest;

type PredicateFn = dyn Fn(&NavigationRequest) -> bool + Send + Sync;

/// A predicate over a navigation request, tagged with the name it is
/// registered under.
#[derive(Clone)]
pub struct NamedPredicate {
    name: String,
    func: Arc<PredicateFn>,
}

impl NamedPredicate {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&NavigationRequest) -> bool + Send + Sync + 'static,
    {
        NamedPredicate {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self, request: &NavigationRequest) -> bool {
        (self.func)(request)
    }
}

impl fmt::Debug for NamedPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedPredicate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// When a fork applies.
#[derive(Debug, Clone)]
pub enum Condition {
    /// The submitted value of `field` equals `value` (JSON equality).
    FieldEquals {
        field: String,
        value: serde_json::Value,
    },
    /// An arbitrary predicate over the request.
    Predicate(NamedPredicate),
}

impl Condition {
    pub fn field_equals(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Condition::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn predicate<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&NavigationRequest) -> bool + Send + Sync + 'static,
    {
        Condition::Predicate(NamedPredicate::new(name, func))
    }

    pub fn is_satisfied_by(&self, request: &NavigationRequest) -> bool {
        match self {
            Condition::FieldEquals { field, value } => request.value(field) == Some(value),
            Condition::Predicate(predicate) => predicate.evaluate(request),
        }
    }
}

/// Predicates available to configuration, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct PredicateRegistry {
    predicates: BTreeMap<String, NamedPredicate>,
}

impl PredicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `func` under `name`, replacing any earlier registration.
    pub fn register<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&NavigationRequest) -> bool + Send + Sync + 'static,
    {
        let predicate = NamedPredicate::new(name, func);
        self.predicates
            .insert(predicate.name().to_string(), predicate);
        self
    }

    pub fn get(&self, name: &str) -> Option<&NamedPredicate> {
        self.predicates.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.predicates.keys().map(String::as_str)
    }
}
