use std::collections::BTreeMap;

use super::value::{FieldValue, FormValues};

/// Values, last computed error messages and the list of fields flagged as
/// missing for display.
///
/// Every mutation goes through `&mut self`, so a write is visible to the next
/// read and updates to different fields cannot overwrite each other.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: FormValues,
    errors: BTreeMap<String, String>,
    missing: Vec<String>,
}

impl FormState {
    pub fn new(values: FormValues) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn set_value(&mut self, field: &str, value: FieldValue) {
        self.values.insert(field, value);
    }

    pub fn restore_values(&mut self, values: FormValues) {
        self.values = values;
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn set_error(&mut self, field: &str, message: String) {
        self.errors.insert(field.to_string(), message);
    }

    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub fn is_missing(&self, field: &str) -> bool {
        self.missing.iter().any(|name| name == field)
    }

    pub fn add_missing(&mut self, field: &str) {
        if !self.is_missing(field) {
            self.missing.push(field.to_string());
        }
    }

    pub fn remove_missing(&mut self, field: &str) {
        self.missing.retain(|name| name != field);
    }

    pub fn replace_missing(&mut self, fields: Vec<String>) {
        self.missing = fields;
    }

    pub fn clear_missing(&mut self) {
        self.missing.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_list_stays_free_of_duplicates() {
        let mut state = FormState::default();
        state.add_missing("email");
        state.add_missing("name");
        state.add_missing("email");
        assert_eq!(state.missing(), ["email", "name"]);

        state.remove_missing("email");
        state.remove_missing("email");
        assert_eq!(state.missing(), ["name"]);

        state.clear_missing();
        assert!(state.missing().is_empty());
    }

    #[test]
    fn writes_to_different_fields_do_not_clobber() {
        let mut state = FormState::new([("name", ""), ("email", "")].into_iter().collect());
        state.set_value("name", FieldValue::from("Ana"));
        state.set_value("email", FieldValue::from("ana@example.com"));
        state.set_error("name", String::new());
        state.set_error("email", "invalid".to_string());

        assert_eq!(state.value("name"), Some(&FieldValue::from("Ana")));
        assert_eq!(state.value("email"), Some(&FieldValue::from("ana@example.com")));
        assert_eq!(state.error("name"), Some(""));
        assert_eq!(state.error("email"), Some("invalid"));
    }
}
