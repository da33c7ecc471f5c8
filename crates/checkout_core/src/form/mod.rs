//! Generic form state and validation.
//!
//! [`FormController`] owns one form: its values, the last error computed for
//! each field and the list of fields highlighted as missing. Inputs report
//! changes with [`FieldChangeEvent`]s; [`FormController::validate_all`] is the
//! authoritative check before submitting.

mod controller;
mod rule;
mod state;
mod value;

pub use controller::{
    BindMode, ChangeHandle, ChangeKind, CheckboxBinding, ClearTarget, FieldBinding,
    FieldChangeEvent, FormController, FormOptions, FormSchema, PlainBinding, RadioBinding,
};
pub use rule::{
    validate, Pattern, Required, ValidationRule, Validator, INVALID_MESSAGE, REQUIRED_MESSAGE,
};
pub use state::FormState;
pub use value::{FieldValue, FormValues};
