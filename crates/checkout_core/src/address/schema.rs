use std::collections::BTreeMap;
use std::sync::Arc;

use regex::Regex;

use crate::error::FormError;
use crate::form::{FormOptions, FormSchema, FormValues, Pattern, ValidationRule};
use crate::models::ContactRecord;

pub const NAME_FIELD: &str = "name";
pub const LAST_NAME_FIELD: &str = "lastName";
pub const TELEPHONE_FIELD: &str = "telephone";
pub const EMAIL_FIELD: &str = "email";
pub const CODE_FIELD: &str = "code";
pub const STATE_FIELD: &str = "state";
pub const TOWN_FIELD: &str = "town";
pub const COLONY_FIELD: &str = "colony";
pub const CITY_FIELD: &str = "city";
pub const STREET_FIELD: &str = "street";
pub const POLICY_FIELD: &str = "policy";

/// Fields whose error markers belong to the postal-code lookup.
pub const LOCALITY_FIELDS: [&str; 5] = [CODE_FIELD, CITY_FIELD, TOWN_FIELD, STATE_FIELD, COLONY_FIELD];

pub const EMAIL_MESSAGE: &str = "Email inválido";

// RFC 5322 style address search; unanchored.
const EMAIL_PATTERN: &str = r##"(?:[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])"##;

pub fn email_pattern() -> Pattern {
    let regex = Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex");
    Pattern::from_regex(regex, EMAIL_MESSAGE)
}

pub fn contact_schema() -> FormSchema {
    FormSchema::new()
        .field(CITY_FIELD, ValidationRule::required())
        .field(COLONY_FIELD, ValidationRule::required())
        .field(CODE_FIELD, ValidationRule::required())
        .field(
            EMAIL_FIELD,
            ValidationRule::required().with_pattern(email_pattern()),
        )
        .field(LAST_NAME_FIELD, ValidationRule::required())
        .field(NAME_FIELD, ValidationRule::required())
        .field(STATE_FIELD, ValidationRule::required())
        .field(TELEPHONE_FIELD, ValidationRule::required())
        .field(TOWN_FIELD, ValidationRule::required())
        .field(STREET_FIELD, ValidationRule::required())
        .field(POLICY_FIELD, ValidationRule::optional())
}

/// Options for the shipping address form, starting from `defaults`.
pub fn contact_form_options(defaults: &ContactRecord) -> Result<FormOptions, FormError> {
    let defaults = FormValues::from_record(defaults)?;
    let labels = defaults
        .names()
        .map(|name| (name.to_string(), String::new()))
        .collect::<BTreeMap<_, _>>();
    Ok(FormOptions {
        defaults: Arc::new(defaults),
        labels,
        schema: contact_schema(),
    })
}
