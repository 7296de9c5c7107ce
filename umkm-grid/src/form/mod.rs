//! Form controls and validation.
//!
//! Controls are cheap-to-clone handles over shared state, so a
//! [`Validator`] can hold one while the form keeps editing another.
//!
//! # Example
//!
//! ```ignore
//! let name = TextInput::new("name", String::new());
//! let revenue = DecimalInput::new("revenue", Parsed::Empty);
//!
//! let result = Validator::new()
//!     .field(&name, "name", |rules| rules.required("Business name is required"))
//!     .field(&revenue, "revenue", |rules| {
//!         rules
//!             .parsed("Revenue must be a number")
//!             .min_value(Decimal::ZERO, "Revenue cannot be negative")
//!     })
//!     .validate();
//! ```

mod control;
mod validation;

pub use control::{
    Choice, ChoiceOption, Control, DATE_FORMAT, DateInput, DecimalInput, FileInput, FileMeta,
    Parsed, RadioGroup, Select, TextInput, TreeSelect, Validatable,
};
pub use validation::{FieldError, Rules, ValidationResult, Validator};
