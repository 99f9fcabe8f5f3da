//! Step, fork and request types shared by every stepflow crate.

use serde::{Deserialize, Serialize};

use crate::condition::Condition;

/// Submitted form values, keyed by field name.
pub type FormValues = serde_json::Map<String, serde_json::Value>;

/// Marker appended to a step path when the journey is being edited.
pub const EDIT_SUFFIX: &str = "/edit";

// ──────────────────────────────────────────────
// Navigation request
// ──────────────────────────────────────────────

/// Navigation mode carried in the route (`/step/edit`) of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Normal,
    Edit,
}

impl Action {
    /// Interpret the `action` route parameter. Anything other than `edit`
    /// is a normal submission.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("edit") => Action::Edit,
            _ => Action::Normal,
        }
    }

    pub fn is_edit(self) -> bool {
        self == Action::Edit
    }
}

/// Everything a navigation decision needs to know about one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationRequest {
    /// Id of the step being submitted, e.g. `/address`.
    pub step: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub action: Action,
    /// Mount point of the wizard, prefixed to every step path returned.
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub values: FormValues,
}

fn default_method() -> String {
    "POST".to_string()
}

impl NavigationRequest {
    pub fn new(step: impl Into<String>) -> Self {
        NavigationRequest {
            step: step.into(),
            method: default_method(),
            action: Action::Normal,
            base_url: String::new(),
            values: FormValues::new(),
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    pub fn value(&self, field: &str) -> Option<&serde_json::Value> {
        self.values.get(field)
    }

    pub fn is_edit(&self) -> bool {
        self.action.is_edit()
    }

    /// Mount a step id under this request's base URL.
    pub fn mount(&self, step: &str) -> String {
        mount(&self.base_url, step)
    }

    /// Inverse of [`NavigationRequest::mount`]: the step id of a mounted path.
    pub fn unmount<'a>(&self, path: &'a str) -> &'a str {
        let base = self.base_url.trim_end_matches('/');
        if base.is_empty() {
            return path;
        }
        path.strip_prefix(base).unwrap_or(path)
    }
}

/// Join a base URL and a step id without doubling the separator.
pub fn mount(base_url: &str, step: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), step)
}

// ──────────────────────────────────────────────
// Step configuration
// ──────────────────────────────────────────────

/// Whether reaching a step clears the whole session.
///
/// `Unset` resets only when the step has no `next`; `True` always resets;
/// `False` never does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClearSession {
    #[default]
    Unset,
    True,
    False,
}

impl ClearSession {
    pub fn should_reset(self, has_next: bool) -> bool {
        match self {
            ClearSession::True => true,
            ClearSession::False => false,
            ClearSession::Unset => !has_next,
        }
    }
}

impl From<Option<bool>> for ClearSession {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => ClearSession::Unset,
            Some(true) => ClearSession::True,
            Some(false) => ClearSession::False,
        }
    }
}

/// A conditional branch away from a step's default `next`.
#[derive(Debug, Clone)]
pub struct Fork {
    pub target: String,
    /// `None` keeps the edge in the step graph but never matches a request.
    pub condition: Option<Condition>,
}

impl Fork {
    pub fn new(target: impl Into<String>, condition: Condition) -> Self {
        Fork {
            target: target.into(),
            condition: Some(condition),
        }
    }

    pub fn unconditional(target: impl Into<String>) -> Self {
        Fork {
            target: target.into(),
            condition: None,
        }
    }

    pub fn matches(&self, request: &NavigationRequest) -> bool {
        self.condition
            .as_ref()
            .is_some_and(|condition| condition.is_satisfied_by(request))
    }
}

/// One page of the wizard.
#[derive(Debug, Clone, Default)]
pub struct StepDefinition {
    pub id: String,
    pub fields: Vec<String>,
    pub next: Option<String>,
    pub forks: Vec<Fork>,
    pub continue_on_edit: bool,
    pub clear_session: ClearSession,
    /// Template to render; the default base controller falls back to the
    /// id without its leading slash.
    pub template: Option<String>,
    /// Static values merged into the template context.
    pub locals: serde_json::Map<String, serde_json::Value>,
}

impl StepDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        StepDefinition {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next = Some(next.into());
        self
    }

    pub fn with_fork(mut self, fork: Fork) -> Self {
        self.forks.push(fork);
        self
    }

    pub fn with_continue_on_edit(mut self, continue_on_edit: bool) -> Self {
        self.continue_on_edit = continue_on_edit;
        self
    }

    pub fn with_clear_session(mut self, clear_session: ClearSession) -> Self {
        self.clear_session = clear_session;
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_local(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.locals.insert(key.into(), value.into());
        self
    }

    /// Outgoing edges in resolution order: `next` first, then every fork
    /// target in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = &str> {
        self.next
            .as_deref()
            .into_iter()
            .chain(self.forks.iter().map(|fork| fork.target.as_str()))
    }

    pub fn has_forks(&self) -> bool {
        !self.forks.is_empty()
    }
}
