use std::future::Future;
use std::pin::Pin;

use crate::form::control::Validatable;

use super::rules::Rules;
use super::{FieldError, ValidationResult};

/// One control with its rules, type-erased behind [`Entry`].
struct Field<C: Validatable> {
    name: String,
    control: C,
    rules: Rules<C::Value>,
}

impl<C: Validatable> Field<C> {
    /// Mark the control and turn a failure into a [`FieldError`].
    fn settle(&self, failure: Option<&str>) -> Option<FieldError> {
        self.control.mark(failure.map(str::to_string));
        failure.map(|message| FieldError {
            field: self.name.clone(),
            control: self.control.control_id().to_string(),
            message: message.to_string(),
        })
    }
}

trait Entry: Send + Sync {
    fn run(&self) -> Option<FieldError>;

    fn run_async(&self) -> Pin<Box<dyn Future<Output = Option<FieldError>> + Send + '_>>;
}

impl<C: Validatable> Entry for Field<C> {
    fn run(&self) -> Option<FieldError> {
        let value = self.control.snapshot();
        self.settle(self.rules.first_failure(&value))
    }

    fn run_async(&self) -> Pin<Box<dyn Future<Output = Option<FieldError>> + Send + '_>> {
        Box::pin(async move {
            let failure = self.rules.first_failure_async(self.control.snapshot()).await;
            self.settle(failure)
        })
    }
}

/// A form's fields and their rules.
///
/// Build it once and run it on every submit: each run reads the controls
/// again, sets or clears their error and reports the first failing rule
/// of every field.
#[derive(Default)]
pub struct Validator {
    fields: Vec<Box<dyn Entry>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `control` under `name`, with the rules `build` adds.
    pub fn field<C, F>(mut self, control: &C, name: impl Into<String>, build: F) -> Self
    where
        C: Validatable,
        F: FnOnce(Rules<C::Value>) -> Rules<C::Value>,
    {
        self.fields.push(Box::new(Field {
            name: name.into(),
            control: control.clone(),
            rules: build(Rules::new()),
        }));
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Run the synchronous rules only.
    pub fn validate(&self) -> ValidationResult {
        let errors: Vec<FieldError> = self.fields.iter().filter_map(|f| f.run()).collect();
        Self::report(errors)
    }

    /// Run every rule, awaiting async ones in place.
    pub async fn validate_async(&self) -> ValidationResult {
        let mut errors = Vec::new();
        for field in &self.fields {
            if let Some(error) = field.run_async().await {
                errors.push(error);
            }
        }
        Self::report(errors)
    }

    fn report(errors: Vec<FieldError>) -> ValidationResult {
        if !errors.is_empty() {
            log::debug!("[form] {} field(s) invalid", errors.len());
        }
        ValidationResult::from(errors)
    }
}
