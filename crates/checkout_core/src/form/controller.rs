use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::warn;

use super::rule::{validate, ValidationRule};
use super::state::FormState;
use super::value::{FieldValue, FormValues};
use crate::error::FormError;

/// Ordered field name to rule mapping. Field order drives the order of the
/// missing list produced by [`FormController::validate_all`].
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<(String, ValidationRule)>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for `name`.
    pub fn field(mut self, name: impl Into<String>, rule: ValidationRule) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = rule,
            None => self.fields.push((name, rule)),
        }
        self
    }

    pub fn rule(&self, name: &str) -> Option<&ValidationRule> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rule)| rule)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rule(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// Everything needed to build a [`FormController`].
#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    pub defaults: Arc<FormValues>,
    pub labels: BTreeMap<String, String>,
    pub schema: FormSchema,
}

/// Explicit change notification, decoupled from any UI event shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChangeEvent {
    pub field_name: String,
    pub raw_value: FieldValue,
}

impl FieldChangeEvent {
    pub fn new(field_name: impl Into<String>, raw_value: impl Into<FieldValue>) -> Self {
        Self {
            field_name: field_name.into(),
            raw_value: raw_value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Value,
    Toggle,
}

/// Change callback handed out by a binding, closed over its field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeHandle {
    field_name: String,
    kind: ChangeKind,
}

impl ChangeHandle {
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn event(&self, raw_value: impl Into<FieldValue>) -> FieldChangeEvent {
        FieldChangeEvent::new(self.field_name.clone(), raw_value)
    }

    pub fn apply(
        &self,
        form: &mut FormController,
        raw_value: impl Into<FieldValue>,
    ) -> Result<(), FormError> {
        let event = self.event(raw_value);
        match self.kind {
            ChangeKind::Value => form.on_value_change(event),
            ChangeKind::Toggle => form.on_toggle_change(event),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BindMode {
    #[default]
    Plain,
    Checkbox,
    Radio,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlainBinding {
    pub field_name: String,
    pub current_value: FieldValue,
    pub on_value_change: ChangeHandle,
    pub has_error: bool,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxBinding {
    pub field_name: String,
    pub is_checked: bool,
    pub on_toggle: ChangeHandle,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadioBinding {
    pub field_name: String,
    pub is_selected: bool,
    pub on_change: ChangeHandle,
    pub has_error: bool,
}

/// Props for one presentational input.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldBinding {
    Plain(PlainBinding),
    Checkbox(CheckboxBinding),
    Radio(RadioBinding),
}

impl FieldBinding {
    pub fn field_name(&self) -> &str {
        match self {
            FieldBinding::Plain(binding) => &binding.field_name,
            FieldBinding::Checkbox(binding) => &binding.field_name,
            FieldBinding::Radio(binding) => &binding.field_name,
        }
    }

    pub fn has_error(&self) -> bool {
        match self {
            FieldBinding::Plain(binding) => binding.has_error,
            FieldBinding::Checkbox(_) => false,
            FieldBinding::Radio(binding) => binding.has_error,
        }
    }

    pub fn handle(&self) -> &ChangeHandle {
        match self {
            FieldBinding::Plain(binding) => &binding.on_value_change,
            FieldBinding::Checkbox(binding) => &binding.on_toggle,
            FieldBinding::Radio(binding) => &binding.on_change,
        }
    }
}

/// Target of [`FormController::clear_invalid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearTarget {
    Field(String),
    All,
}

impl From<&str> for ClearTarget {
    fn from(field: &str) -> Self {
        ClearTarget::Field(field.to_string())
    }
}

impl From<String> for ClearTarget {
    fn from(field: String) -> Self {
        ClearTarget::Field(field)
    }
}

/// Owns the values, errors and missing list of one form and validates
/// changes against its schema.
#[derive(Debug, Clone)]
pub struct FormController {
    schema: FormSchema,
    labels: BTreeMap<String, String>,
    defaults: Arc<FormValues>,
    state: FormState,
}

impl FormController {
    pub fn new(options: FormOptions) -> Result<Self, FormError> {
        let FormOptions {
            defaults,
            labels,
            schema,
        } = options;

        if let Some(name) = schema.names().find(|name| !defaults.contains(name)) {
            return Err(FormError::SchemaMismatch(name.to_string()));
        }
        if let Some(name) = defaults.names().find(|name| !schema.contains(name)) {
            return Err(FormError::SchemaMismatch(name.to_string()));
        }

        let state = FormState::new(defaults.as_ref().clone());
        Ok(Self {
            schema,
            labels,
            defaults,
            state,
        })
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        self.state.values()
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.state.value(field)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        self.state.errors()
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.state.error(field)
    }

    pub fn missing(&self) -> &[String] {
        self.state.missing()
    }

    /// Run the field's rule against `value` without touching any state.
    pub fn validate_field(&self, field: &str, value: &FieldValue) -> String {
        self.schema
            .rule(field)
            .map(|rule| validate(rule, value))
            .unwrap_or_default()
    }

    pub fn bind(&self, field: &str, mode: BindMode) -> Result<FieldBinding, FormError> {
        let field_name = self.checked_name(field)?.to_string();
        let current_value = self.state.value(field).cloned().unwrap_or_default();
        let has_error = self.state.is_missing(field);
        let label = self.labels.get(field).cloned();

        let binding = match mode {
            BindMode::Plain => FieldBinding::Plain(PlainBinding {
                on_value_change: self.handle(field, ChangeKind::Value),
                field_name,
                current_value,
                has_error,
                label,
            }),
            BindMode::Checkbox => FieldBinding::Checkbox(CheckboxBinding {
                on_toggle: self.handle(field, ChangeKind::Toggle),
                field_name,
                is_checked: current_value.as_bool(),
                label,
            }),
            BindMode::Radio => FieldBinding::Radio(RadioBinding {
                on_change: self.handle(field, ChangeKind::Value),
                field_name,
                is_selected: current_value.as_bool(),
                has_error,
            }),
        };
        Ok(binding)
    }

    /// Store a new value and recompute that field's error.
    ///
    /// A field is dropped from the missing list only when its previous error
    /// was empty. Live changes never add to the missing list.
    pub fn on_value_change(&mut self, event: FieldChangeEvent) -> Result<(), FormError> {
        self.apply_change(event.field_name, event.raw_value)
    }

    /// Same as [`Self::on_value_change`] for boolean inputs; the raw value is
    /// read as a checked flag.
    pub fn on_toggle_change(&mut self, event: FieldChangeEvent) -> Result<(), FormError> {
        let checked = FieldValue::Bool(event.raw_value.as_bool());
        self.apply_change(event.field_name, checked)
    }

    /// Revalidate every field. The missing list is replaced with the failing
    /// fields in schema order; the error map is left as the live changes
    /// wrote it. Returns true when nothing failed.
    pub fn validate_all(&mut self) -> bool {
        let failing = self
            .schema
            .fields
            .iter()
            .filter(|(name, rule)| {
                let value = self.state.value(name).cloned().unwrap_or_default();
                !validate(rule, &value).is_empty()
            })
            .map(|(name, _)| name.clone())
            .collect::<Vec<_>>();

        let valid = failing.is_empty();
        self.state.replace_missing(failing);
        valid
    }

    /// Build a typed record from the current values, coercing each value to
    /// the kind of scalar its default holds (a numeric entry in a text field
    /// becomes text).
    pub fn to_record<T: DeserializeOwned>(&self) -> Result<T, FormError> {
        self.values().coerced_to(&self.defaults).to_record()
    }

    /// Restore the default snapshot. Errors and the missing list are kept.
    pub fn reset(&mut self) {
        self.state.restore_values(self.defaults.as_ref().clone());
    }

    /// Write a value without validating it.
    pub fn set_field(
        &mut self,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), FormError> {
        self.checked_name(field)?;
        self.state.set_value(field, value.into());
        Ok(())
    }

    /// Flag one or more fields as missing. Names outside the schema are
    /// ignored.
    pub fn mark_invalid<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for field in fields {
            let field = field.as_ref();
            if self.schema.contains(field) {
                self.state.add_missing(field);
            } else {
                warn!(field, "ignoring unknown field in mark_invalid");
            }
        }
    }

    pub fn clear_invalid(&mut self, target: impl Into<ClearTarget>) {
        match target.into() {
            ClearTarget::Field(field) => self.state.remove_missing(&field),
            ClearTarget::All => self.state.clear_missing(),
        }
    }

    fn apply_change(&mut self, field: String, value: FieldValue) -> Result<(), FormError> {
        self.checked_name(&field)?;
        let previously_valid = self.state.error(&field).is_none_or(str::is_empty);

        let message = self.validate_field(&field, &value);
        self.state.set_value(&field, value);
        self.state.set_error(&field, message);

        if previously_valid {
            self.state.remove_missing(&field);
        }
        Ok(())
    }

    fn checked_name<'a>(&self, field: &'a str) -> Result<&'a str, FormError> {
        if field.is_empty() {
            return Err(FormError::EmptyFieldName);
        }
        if !self.schema.contains(field) {
            return Err(FormError::UnknownField(field.to_string()));
        }
        Ok(field)
    }

    fn handle(&self, field: &str, kind: ChangeKind) -> ChangeHandle {
        ChangeHandle {
            field_name: field.to_string(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::rule::Pattern;

    fn contact_form() -> FormController {
        let defaults: FormValues = [
            ("name", FieldValue::from("")),
            ("email", FieldValue::from("")),
            ("policy", FieldValue::Bool(false)),
        ]
        .into_iter()
        .collect();
        let schema = FormSchema::new()
            .field("name", ValidationRule::required())
            .field(
                "email",
                ValidationRule::required()
                    .with_pattern(Pattern::new(r"^\S+@\S+\.\S+$", "bad email").expect("regex")),
            )
            .field("policy", ValidationRule::optional());
        let labels = [("name".to_string(), "Nombre".to_string())]
            .into_iter()
            .collect();

        FormController::new(FormOptions {
            defaults: Arc::new(defaults),
            labels,
            schema,
        })
        .expect("schema matches defaults")
    }

    #[test]
    fn bind_rejects_empty_and_unknown_names() {
        let form = contact_form();
        assert_eq!(form.bind("", BindMode::Plain), Err(FormError::EmptyFieldName));
        assert_eq!(
            form.bind("zip", BindMode::Plain),
            Err(FormError::UnknownField("zip".to_string()))
        );
    }

    #[test]
    fn bind_exposes_value_label_and_error_flag() {
        let mut form = contact_form();
        form.mark_invalid(["name"]);

        let FieldBinding::Plain(binding) = form.bind("name", BindMode::Plain).expect("binding")
        else {
            panic!("expected plain binding");
        };
        assert_eq!(binding.field_name, "name");
        assert_eq!(binding.current_value, FieldValue::from(""));
        assert!(binding.has_error);
        assert_eq!(binding.label.as_deref(), Some("Nombre"));
        assert_eq!(binding.on_value_change.kind(), ChangeKind::Value);
    }

    #[test]
    fn checkbox_binding_toggles_boolean_value() {
        let mut form = contact_form();
        let binding = form.bind("policy", BindMode::Checkbox).expect("binding");
        let handle = binding.handle().clone();
        assert_eq!(handle.kind(), ChangeKind::Toggle);

        handle.apply(&mut form, "on").expect("known field");
        assert_eq!(form.value("policy"), Some(&FieldValue::Bool(true)));

        let FieldBinding::Checkbox(binding) = form.bind("policy", BindMode::Checkbox).expect("binding")
        else {
            panic!("expected checkbox binding");
        };
        assert!(binding.is_checked);
    }

    #[test]
    fn live_change_never_adds_to_missing() {
        let mut form = contact_form();
        form.on_value_change(FieldChangeEvent::new("email", "bad"))
            .expect("known field");
        assert_eq!(form.error("email"), Some("bad email"));
        assert!(form.missing().is_empty());

        form.on_value_change(FieldChangeEvent::new("email", "good@x.com"))
            .expect("known field");
        assert_eq!(form.error("email"), Some(""));
        assert!(form.missing().is_empty());
    }

    #[test]
    fn first_fix_after_failed_validation_lifts_untouched_field() {
        let mut form = contact_form();
        assert!(!form.validate_all());
        assert!(form.missing().contains(&"name".to_string()));
        assert_eq!(form.error("name"), None);

        form.on_value_change(FieldChangeEvent::new("name", "Ana"))
            .expect("known field");
        assert!(!form.missing().contains(&"name".to_string()));
    }

    #[test]
    fn live_change_removes_only_when_previous_error_was_empty() {
        let mut form = contact_form();
        form.on_value_change(FieldChangeEvent::new("email", "bad"))
            .expect("known field");
        form.mark_invalid(["email"]);

        // The previous error for `email` is set, so the first fix keeps the
        // highlight until the next change or a full validation.
        form.on_value_change(FieldChangeEvent::new("email", "ana@example.com"))
            .expect("known field");
        assert!(form.missing().contains(&"email".to_string()));

        form.on_value_change(FieldChangeEvent::new("email", "ana@example.mx"))
            .expect("known field");
        assert!(!form.missing().contains(&"email".to_string()));
    }

    #[test]
    fn validate_all_replaces_missing_in_schema_order() {
        let mut form = contact_form();
        assert!(!form.validate_all());
        assert_eq!(form.missing(), ["name", "email"]);

        form.set_field("name", "Ana").expect("known field");
        form.set_field("email", "ana@example.com").expect("known field");
        assert!(form.validate_all());
        assert!(form.missing().is_empty());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn record_coerces_values_to_default_kinds() {
        #[derive(serde::Deserialize)]
        struct Contact {
            name: String,
            email: String,
            policy: bool,
        }

        let mut form = contact_form();
        form.set_field("name", 42.0).expect("known field");
        form.set_field("email", "a@b.co").expect("known field");
        form.on_value_change(FieldChangeEvent::new("policy", "yes"))
            .expect("known field");

        let contact: Contact = form.to_record().expect("values coerce");
        assert_eq!(contact.name, "42");
        assert_eq!(contact.email, "a@b.co");
        assert!(contact.policy);
    }

    #[test]
    fn change_for_unknown_field_is_rejected() {
        let mut form = contact_form();
        let result = form.on_value_change(FieldChangeEvent::new("zip", "1"));
        assert_eq!(result, Err(FormError::UnknownField("zip".to_string())));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn reset_restores_defaults_but_keeps_markers() {
        let mut form = contact_form();
        form.on_value_change(FieldChangeEvent::new("name", "Ana"))
            .expect("known field");
        form.mark_invalid(["email", "email", "policy"]);
        form.reset();

        assert_eq!(form.value("name"), Some(&FieldValue::from("")));
        assert_eq!(form.missing(), ["email", "policy"]);
        assert_eq!(form.error("name"), Some(""));
    }

    #[test]
    fn clear_invalid_removes_one_or_all() {
        let mut form = contact_form();
        form.mark_invalid(["name", "email"]);
        form.clear_invalid("name");
        assert_eq!(form.missing(), ["email"]);
        form.clear_invalid(ClearTarget::All);
        assert!(form.missing().is_empty());
    }

    #[test]
    fn construction_rejects_schema_mismatch() {
        let defaults: FormValues = [("name", "")].into_iter().collect();
        let result = FormController::new(FormOptions {
            defaults: Arc::new(defaults),
            labels: BTreeMap::new(),
            schema: FormSchema::new()
                .field("name", ValidationRule::required())
                .field("email", ValidationRule::required()),
        });
        assert_eq!(
            result.err(),
            Some(FormError::SchemaMismatch("email".to_string()))
        );
    }
}
