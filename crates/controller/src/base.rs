//! The host framework's side of the contract.
//!
//! A form wizard framework supplies a base controller per step: it knows
//! the linear `next` pointer, where to send a user after a validation
//! failure, how to read the step's values from the session, and what goes
//! into the template context. [`crate::StepFlowController`] wraps it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stepflow_core::{FormValues, NavigationRequest, StepDefinition};
use stepflow_session::SessionModel;

use crate::error::ControllerError;

/// Template context handed to the renderer.
pub type Locals = serde_json::Map<String, serde_json::Value>;

/// Validation errors for the current step, keyed by field name.
pub type FieldErrors = BTreeMap<String, FieldError>;

/// A single field's validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub key: String,
    /// Validator that failed, e.g. `required`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldError {
    pub fn new(key: impl Into<String>, kind: impl Into<String>) -> Self {
        FieldError {
            key: key.into(),
            kind: kind.into(),
            message: None,
        }
    }
}

/// What the host has prepared for rendering the current response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseContext {
    /// Values about to be rendered.
    #[serde(default)]
    pub values: FormValues,
    /// Validation errors raised for this request.
    #[serde(default)]
    pub errors: FieldErrors,
}

/// Hook points exposed by the host framework's base controller.
pub trait BaseController {
    /// Linear next step, already mounted under the request's base URL.
    fn next_step(&self, request: &NavigationRequest) -> String;

    /// Where to redirect after a validation failure.
    fn error_step(&self, errors: &FieldErrors, request: &NavigationRequest) -> String;

    /// Values to render for this step.
    fn values(
        &self,
        request: &NavigationRequest,
        session: &mut dyn SessionModel,
    ) -> Result<FormValues, ControllerError>;

    /// Base template context.
    fn locals(&self, request: &NavigationRequest, response: &ResponseContext) -> Locals;

    /// Validation errors for this request.
    fn errors(&self, request: &NavigationRequest, response: &ResponseContext) -> FieldErrors;
}

/// Conventional wizard behaviour for one step: follow `next`, send errors
/// back to the step itself, and read the step's own fields from the
/// session. The template defaults to the route without its leading slash.
#[derive(Debug, Clone)]
pub struct WizardController {
    route: String,
    template: String,
    next: Option<String>,
    fields: Vec<String>,
}

impl WizardController {
    pub fn for_step(step: &StepDefinition) -> Self {
        WizardController {
            route: step.id.clone(),
            template: step
                .template
                .clone()
                .unwrap_or_else(|| step.id.trim_start_matches('/').to_string()),
            next: step.next.clone(),
            fields: step.fields.clone(),
        }
    }
}

impl BaseController for WizardController {
    fn next_step(&self, request: &NavigationRequest) -> String {
        request.mount(self.next.as_deref().unwrap_or(&self.route))
    }

    fn error_step(&self, _errors: &FieldErrors, request: &NavigationRequest) -> String {
        request.mount(&self.route)
    }

    fn values(
        &self,
        _request: &NavigationRequest,
        session: &mut dyn SessionModel,
    ) -> Result<FormValues, ControllerError> {
        let mut values = FormValues::new();
        for field in &self.fields {
            if let Some(value) = session.get(field)? {
                values.insert(field.clone(), value);
            }
        }
        Ok(values)
    }

    fn locals(&self, request: &NavigationRequest, response: &ResponseContext) -> Locals {
        let mut locals = Locals::new();
        locals.insert("route".to_string(), self.route.clone().into());
        locals.insert("template".to_string(), self.template.clone().into());
        locals.insert("baseUrl".to_string(), request.base_url.clone().into());
        locals.insert(
            "values".to_string(),
            serde_json::Value::Object(response.values.clone()),
        );
        locals
    }

    fn errors(&self, _request: &NavigationRequest, response: &ResponseContext) -> FieldErrors {
        response.errors.clone()
    }
}
