//! Validation schemas and field validators.
//!
//! The form controller only talks to the [`Schema`] trait. [`ValidationSchema`]
//! is the rule-based implementation used by the intake forms: a map from field
//! name to [`FieldRules`], each a required flag plus an ordered list of
//! [`Validator`]s.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;

use crate::error::FieldErrors;
use crate::value::{FieldValue, FormValues};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\d{10,15}$").expect("phone pattern"));

/// A validation collaborator: a pure function from values to errors.
pub trait Schema: Send + Sync {
    /// Validates every field the schema knows about.
    fn validate(&self, values: &FormValues) -> FieldErrors;

    /// Validates one field. The default runs the whole schema and picks the field out.
    fn validate_field(&self, name: &str, values: &FormValues) -> Option<String> {
        self.validate(values).get(name).map(str::to_string)
    }

    /// Whether the schema declares this field.
    fn declares(&self, _name: &str) -> bool {
        true
    }

    /// Whether an empty value fails for this field.
    fn is_required(&self, _name: &str) -> bool {
        false
    }
}

/// Trait for field validators.
pub trait Validator: Send + Sync {
    /// Validates a value and returns an error message if invalid.
    fn validate(&self, value: &FieldValue) -> Result<(), String>;

    /// Returns the error message for this validator.
    fn message(&self) -> &str;
}

/// Validator that requires a non-empty value.
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    message: String,
}

impl RequiredValidator {
    /// Creates a new RequiredValidator with default message.
    pub fn new() -> Self {
        Self::with_message("This field is required.")
    }

    /// Creates a new RequiredValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for RequiredValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for RequiredValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        if value.is_empty() {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that enforces a maximum length on text values.
#[derive(Debug, Clone)]
pub struct MaxLengthValidator {
    max_length: usize,
    message: String,
}

impl MaxLengthValidator {
    /// Creates a new MaxLengthValidator.
    pub fn new(max_length: usize) -> Self {
        Self::with_message(
            max_length,
            format!("Must be at most {max_length} characters."),
        )
    }

    /// Creates a new MaxLengthValidator with custom message.
    pub fn with_message(max_length: usize, message: impl Into<String>) -> Self {
        Self {
            max_length,
            message: message.into(),
        }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        match value.as_text() {
            Some(text) if text.chars().count() > self.max_length => Err(self.message.clone()),
            _ => Ok(()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that enforces a minimum length on text values.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    min_length: usize,
    message: String,
}

impl MinLengthValidator {
    /// Creates a new MinLengthValidator.
    pub fn new(min_length: usize) -> Self {
        Self::with_message(
            min_length,
            format!("Must be at least {min_length} characters."),
        )
    }

    /// Creates a new MinLengthValidator with custom message.
    pub fn with_message(min_length: usize, message: impl Into<String>) -> Self {
        Self {
            min_length,
            message: message.into(),
        }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        match value.as_text() {
            Some(text) if text.chars().count() < self.min_length => Err(self.message.clone()),
            _ => Ok(()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for email addresses.
#[derive(Debug, Clone)]
pub struct EmailValidator {
    message: String,
}

impl EmailValidator {
    /// Creates a new EmailValidator with default message.
    pub fn new() -> Self {
        Self::with_message("Invalid email address.")
    }

    /// Creates a new EmailValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for EmailValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        match value.as_text() {
            Some(text) if !EMAIL_RE.is_match(text) => Err(self.message.clone()),
            _ => Ok(()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for international phone numbers (`+` then 10 to 15 digits).
#[derive(Debug, Clone)]
pub struct PhoneValidator {
    message: String,
}

impl PhoneValidator {
    /// Creates a new PhoneValidator with default message.
    pub fn new() -> Self {
        Self::with_message("Invalid phone number.")
    }

    /// Creates a new PhoneValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for PhoneValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for PhoneValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        match value.as_text() {
            Some(text) if !PHONE_RE.is_match(text) => Err(self.message.clone()),
            _ => Ok(()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator using a custom regex pattern.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: Regex,
    message: String,
}

impl RegexValidator {
    /// Creates a new RegexValidator.
    pub fn new(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            message: message.into(),
        })
    }
}

impl Validator for RegexValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        match value.as_text() {
            Some(text) if !self.pattern.is_match(text) => Err(self.message.clone()),
            _ => Ok(()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for checkboxes that must be ticked (consents).
#[derive(Debug, Clone)]
pub struct MustBeTrueValidator {
    message: String,
}

impl MustBeTrueValidator {
    /// Creates a new MustBeTrueValidator.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Validator for MustBeTrueValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        if value.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for dates that must not lie in the future.
#[derive(Debug, Clone)]
pub struct PastDateValidator {
    today: Option<NaiveDate>,
    message: String,
}

impl PastDateValidator {
    /// Creates a validator comparing against the local date at validation time.
    pub fn new() -> Self {
        Self {
            today: None,
            message: "Date cannot be in the future.".to_string(),
        }
    }

    /// Pins "today" to a fixed date.
    #[must_use]
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

impl Default for PastDateValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for PastDateValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        match value.as_date() {
            Some(date) if date > today => Err(self.message.clone()),
            _ => Ok(()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Rules for one field: required flag plus validators, checked in order.
pub struct FieldRules {
    required: Option<RequiredValidator>,
    validators: Vec<Box<dyn Validator>>,
}

impl std::fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRules")
            .field("required", &self.required.is_some())
            .field("validators", &self.validators.len())
            .finish()
    }
}

impl FieldRules {
    /// Rules for an optional field: empty values pass, others go through the validators.
    pub fn optional() -> Self {
        Self {
            required: None,
            validators: Vec::new(),
        }
    }

    /// Rules for a required field.
    pub fn required() -> Self {
        Self {
            required: Some(RequiredValidator::new()),
            validators: Vec::new(),
        }
    }

    /// Rules for a required field with a custom message.
    pub fn required_with(message: impl Into<String>) -> Self {
        Self {
            required: Some(RequiredValidator::with_message(message)),
            validators: Vec::new(),
        }
    }

    /// Whether an empty value fails.
    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }

    /// Adds a validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Adds a minimum length.
    #[must_use]
    pub fn min_length(self, min: usize) -> Self {
        self.validator(MinLengthValidator::new(min))
    }

    /// Adds a maximum length.
    #[must_use]
    pub fn max_length(self, max: usize) -> Self {
        self.validator(MaxLengthValidator::new(max))
    }

    /// Adds an email format check.
    #[must_use]
    pub fn email(self) -> Self {
        self.validator(EmailValidator::new())
    }

    /// Adds a phone format check.
    #[must_use]
    pub fn phone(self) -> Self {
        self.validator(PhoneValidator::new())
    }

    /// Checks a value against the rules, returning the first failure.
    pub fn check(&self, value: &FieldValue) -> Result<(), String> {
        if value.is_empty() {
            return match &self.required {
                Some(required) => Err(required.message().to_string()),
                None => Ok(()),
            };
        }
        self.validators.iter().try_for_each(|v| v.validate(value))
    }
}

/// A rule-based schema keyed by field name.
#[derive(Debug, Default)]
pub struct ValidationSchema {
    rules: BTreeMap<String, FieldRules>,
}

impl ValidationSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the rules for a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rules: FieldRules) -> Self {
        self.rules.insert(name.into(), rules);
        self
    }

    /// Returns the rules for a field.
    pub fn rules(&self, name: &str) -> Option<&FieldRules> {
        self.rules.get(name)
    }

    /// Declared field names, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

impl Schema for ValidationSchema {
    fn validate(&self, values: &FormValues) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for (name, rules) in &self.rules {
            let value = values.get(name).unwrap_or(&FieldValue::Null);
            if let Err(message) = rules.check(value) {
                errors.insert(name, message);
            }
        }
        errors
    }

    fn validate_field(&self, name: &str, values: &FormValues) -> Option<String> {
        let rules = self.rules.get(name)?;
        let value = values.get(name).unwrap_or(&FieldValue::Null);
        rules.check(value).err()
    }

    fn declares(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    fn is_required(&self, name: &str) -> bool {
        self.rules.get(name).is_some_and(FieldRules::is_required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::from(s)
    }

    #[test]
    fn test_required_validator() {
        let v = RequiredValidator::new();
        assert!(v.validate(&text("hello")).is_ok());
        assert!(v.validate(&text("")).is_err());
        assert!(v.validate(&text("   ")).is_err());
        assert!(v.validate(&FieldValue::Null).is_err());
    }

    #[test]
    fn test_length_validators() {
        assert!(MaxLengthValidator::new(5).validate(&text("hello")).is_ok());
        assert!(MaxLengthValidator::new(5).validate(&text("hello world")).is_err());
        assert!(MinLengthValidator::new(2).validate(&text("Jo")).is_ok());
        assert!(MinLengthValidator::new(2).validate(&text("J")).is_err());
    }

    #[test]
    fn test_email_validator() {
        let v = EmailValidator::new();
        assert!(v.validate(&text("user@example.com")).is_ok());
        assert!(v.validate(&text("user.name@domain.co.uk")).is_ok());
        assert!(v.validate(&text("invalid")).is_err());
        assert!(v.validate(&text("@example.com")).is_err());
    }

    #[test]
    fn test_phone_validator() {
        let v = PhoneValidator::new();
        assert!(v.validate(&text("+15551234567")).is_ok());
        assert!(v.validate(&text("5551234567")).is_err());
        assert!(v.validate(&text("+1555")).is_err());
    }

    #[test]
    fn test_regex_validator() {
        let v = RegexValidator::new(r"^[A-Z]{3}\d+$", "Enter a valid policy number.").unwrap();
        assert!(v.validate(&text("ABC123456789")).is_ok());
        assert!(v.validate(&text("123")).is_err());
    }

    #[test]
    fn test_must_be_true_validator() {
        let v = MustBeTrueValidator::new("You must consent to treatment in order to proceed");
        assert!(v.validate(&FieldValue::Bool(true)).is_ok());
        assert!(v.validate(&FieldValue::Bool(false)).is_err());
    }

    #[test]
    fn test_past_date_validator() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let v = PastDateValidator::new().as_of(today);
        assert!(v
            .validate(&FieldValue::Date(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()))
            .is_ok());
        assert!(v
            .validate(&FieldValue::Date(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()))
            .is_err());
    }

    #[test]
    fn test_optional_rules_skip_empty_values() {
        let rules = FieldRules::optional().email();
        assert!(rules.check(&text("")).is_ok());
        assert!(rules.check(&text("nope")).is_err());
    }

    #[test]
    fn test_rules_report_first_failure() {
        let rules = FieldRules::required().min_length(2).max_length(50);
        assert_eq!(
            rules.check(&text("")),
            Err("This field is required.".to_string())
        );
        assert_eq!(
            rules.check(&text("J")),
            Err("Must be at least 2 characters.".to_string())
        );
        assert!(rules.check(&text("Jane Doe")).is_ok());
    }

    #[test]
    fn test_required_rules_use_custom_message() {
        let rules = FieldRules::required_with("Please enter your full name.");
        assert!(rules.is_required());
        assert_eq!(
            rules.check(&FieldValue::Null),
            Err("Please enter your full name.".to_string())
        );
        assert!(rules.check(&text("Jane")).is_ok());
    }

    #[test]
    fn test_schema_validate() {
        let schema = ValidationSchema::new()
            .field("name", FieldRules::required().min_length(2))
            .field("email", FieldRules::required().email());

        let mut values = FormValues::new();
        values.insert("name".into(), text("Jane"));
        values.insert("email".into(), text("bad"));

        let errors = schema.validate(&values);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Invalid email address."));
        assert_eq!(schema.validate_field("name", &values), None);
        assert!(schema.declares("email"));
        assert!(!schema.declares("phone"));
        assert!(schema.is_required("email"));
        assert!(!schema.is_required("phone"));
    }

    #[test]
    fn test_schema_treats_missing_values_as_null() {
        let schema = ValidationSchema::new().field("phone", FieldRules::required().phone());
        let errors = schema.validate(&FormValues::new());
        assert_eq!(errors.get("phone"), Some("This field is required."));
    }
}
