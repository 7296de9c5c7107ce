//! Typed rule lists and the validator that runs them against controls.
//!
//! ```ignore
//! let form = Validator::new()
//!     .field(&email, "email", |rules| {
//!         rules
//!             .required("Email is required")
//!             .email("Please enter a valid email")
//!     })
//!     .field(&menus, "menus", |rules| rules.at_least(1, "Pick at least one menu"));
//!
//! if form.validate().is_invalid() { /* errors are already on the controls */ }
//! ```

use std::fmt;

mod rules;
mod validator;

pub use rules::Rules;
pub use validator::Validator;

/// The first failing rule of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name given to [`Validator::field`].
    pub field: String,
    pub control: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    #[default]
    Valid,
    /// Failing fields in the order they were added.
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(errors) => errors,
        }
    }

    pub fn first_error(&self) -> Option<&FieldError> {
        self.errors().first()
    }

    /// Message for the field registered as `field`, if it failed.
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors()
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Control to focus after a failed submit.
    pub fn first_invalid_control(&self) -> Option<&str> {
        self.first_error().map(|e| e.control.as_str())
    }
}

impl From<Vec<FieldError>> for ValidationResult {
    fn from(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }
}
