use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::value::FieldValue;

pub const REQUIRED_MESSAGE: &str = "required";
pub const INVALID_MESSAGE: &str = "invalid";

/// Custom check run after `required` and `pattern`. Returns the error message,
/// or `None` when the value is acceptable.
pub type Validator = Arc<dyn Fn(&FieldValue) -> Option<String> + Send + Sync>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Required {
    #[default]
    No,
    Yes,
    /// Required, reported with a custom message.
    Message(String),
}

#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    message: String,
}

impl Pattern {
    pub fn new(expression: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(expression)?, message))
    }

    pub fn from_regex(regex: Regex, message: impl Into<String>) -> Self {
        Self {
            regex,
            message: message.into(),
        }
    }

    pub fn is_match(&self, value: &FieldValue) -> bool {
        self.regex.is_match(&value.text())
    }

    pub fn message(&self) -> &str {
        if self.message.is_empty() {
            INVALID_MESSAGE
        } else {
            &self.message
        }
    }
}

/// Validation rules for one field.
#[derive(Clone, Default)]
pub struct ValidationRule {
    pub required: Required,
    pub pattern: Option<Pattern>,
    pub validate: Option<Validator>,
}

impl ValidationRule {
    pub fn optional() -> Self {
        Self::default()
    }

    pub fn required() -> Self {
        Self {
            required: Required::Yes,
            ..Self::default()
        }
    }

    pub fn required_with(message: impl Into<String>) -> Self {
        Self {
            required: Required::Message(message.into()),
            ..Self::default()
        }
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_validator<F>(mut self, check: F) -> Self
    where
        F: Fn(&FieldValue) -> Option<String> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(check));
        self
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("required", &self.required)
            .field("pattern", &self.pattern)
            .field("validate", &self.validate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Check `value` against `rule`. Returns the first failing message, or an
/// empty string when the value passes.
///
/// Checks run in the order `required`, `pattern`, `validate`.
pub fn validate(rule: &ValidationRule, value: &FieldValue) -> String {
    match &rule.required {
        Required::No => {}
        Required::Yes if value.is_blank() => return REQUIRED_MESSAGE.to_string(),
        Required::Message(message) if value.is_blank() => return message.clone(),
        Required::Yes | Required::Message(_) => {}
    }

    if let Some(pattern) = &rule.pattern {
        if !pattern.is_match(value) {
            return pattern.message().to_string();
        }
    }

    if let Some(check) = &rule.validate {
        if let Some(message) = check(value).filter(|message| !message.is_empty()) {
            return message;
        }
    }

    String::new()
}
