//! Input Module
//!
//! Value set, JSON document view, validation and the controller that keeps
//! the form and document surfaces in agreement.

mod controller;
mod document;
mod validation;
mod value_set;

pub use controller::{Features, InputController, InputMode, Readiness};
pub use document::{parse_document, render_document};
pub use validation::{validate, FieldError, ValidationResult};
pub use value_set::{FieldValue, ValueSet};
