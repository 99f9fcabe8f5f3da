use std::collections::BTreeMap;

use crate::error::SessionError;
use crate::record::SessionMutation;
use crate::traits::SessionModel;

/// A session held in process memory.
///
/// Every mutation is appended to a journal, which the CLI prints and tests
/// assert against.
#[derive(Debug, Clone, Default)]
pub struct InMemorySession {
    values: BTreeMap<String, serde_json::Value>,
    journal: Vec<SessionMutation>,
}

impl InMemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a session from a JSON object. Seeding is not journalled.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, SessionError> {
        let object = value.as_object().ok_or_else(|| {
            SessionError::Backend(format!("session snapshot must be a JSON object, got {value}"))
        })?;
        Ok(InMemorySession {
            values: object
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            journal: Vec::new(),
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    pub fn journal(&self) -> &[SessionMutation] {
        &self.journal
    }

    pub fn take_journal(&mut self) -> Vec<SessionMutation> {
        std::mem::take(&mut self.journal)
    }
}

impl SessionModel for InMemorySession {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, SessionError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: serde_json::Value) -> Result<(), SessionError> {
        self.journal.push(SessionMutation::Set {
            key: key.to_string(),
            value: value.clone(),
        });
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn unset(&mut self, keys: &[String]) -> Result<(), SessionError> {
        self.journal.push(SessionMutation::Unset {
            keys: keys.to_vec(),
        });
        for key in keys {
            self.values.remove(key);
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<(), SessionError> {
        self.journal.push(SessionMutation::Reset);
        self.values.clear();
        Ok(())
    }
}
