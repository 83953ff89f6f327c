use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

use crate::database::models::{MAX_PRIORITY, MIN_PRIORITY};
use crate::error::ApiError;

static NATIONAL_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{16}$").expect("valid national id pattern"));
static PHONE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^07\d{8}$").expect("valid phone pattern"));
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));
static PASSWORD_SPECIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[@$!%*?&#]").expect("valid special pattern"));

pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Field name to message, for every field that failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Validation failed on {} field(s)", .0.len())]
pub struct ValidationErrors(pub HashMap<String, String>);

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::validation_error("Validation failed", Some(errors.0))
    }
}

/// Collects field errors so a request reports every problem at once.
#[derive(Debug, Default)]
pub struct Validator {
    errors: HashMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
        self
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "This field is required");
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !EMAIL.is_match(value.trim()) {
            self.fail(field, "Invalid email address");
        }
        self
    }

    pub fn national_id(&mut self, field: &str, value: &str) -> &mut Self {
        if !NATIONAL_ID.is_match(value) {
            self.fail(field, "National ID must be exactly 16 digits");
        }
        self
    }

    pub fn phone_number(&mut self, field: &str, value: &str) -> &mut Self {
        if !PHONE_NUMBER.is_match(value) {
            self.fail(field, "Phone number must start with 07 followed by 8 digits");
        }
        self
    }

    pub fn password(&mut self, field: &str, value: &str) -> &mut Self {
        if value.chars().count() < PASSWORD_MIN_LENGTH {
            self.fail(field, format!("Password must be at least {} characters long", PASSWORD_MIN_LENGTH));
        } else if !value.chars().any(|c| c.is_ascii_uppercase()) {
            self.fail(field, "Password must contain at least one uppercase letter");
        } else if !value.chars().any(|c| c.is_ascii_lowercase()) {
            self.fail(field, "Password must contain at least one lowercase letter");
        } else if !value.chars().any(|c| c.is_ascii_digit()) {
            self.fail(field, "Password must contain at least one number");
        } else if !PASSWORD_SPECIAL.is_match(value) {
            self.fail(field, "Password must contain at least one special character (@$!%*?&#)");
        }
        self
    }

    pub fn priority(&mut self, field: &str, value: Option<i32>) -> &mut Self {
        if let Some(p) = value {
            if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&p) {
                self.fail(field, format!("Priority must be between {} and {}", MIN_PRIORITY, MAX_PRIORITY));
            }
        }
        self
    }

    /// `required` for fields that may be absent from a partial update.
    pub fn present(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.required(field, v);
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(ValidationErrors(std::mem::take(&mut self.errors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_errors(result: Result<(), ValidationErrors>) -> HashMap<String, String> {
        result.expect_err("expected validation errors").0
    }

    #[test]
    fn accepts_well_formed_registration_fields() {
        let result = Validator::new()
            .email("email", "jane@example.com")
            .national_id("national_id", "1199780012345678")
            .phone_number("phone_number", "0788123456")
            .password("password", "Str0ng!Pass")
            .required("full_name", "Jane Doe")
            .finish();
        assert!(result.is_ok());
    }

    #[test]
    fn reports_every_bad_field() {
        let errors = field_errors(
            Validator::new()
                .email("email", "not-an-email")
                .national_id("national_id", "12345")
                .phone_number("phone_number", "0812345678")
                .required("full_name", "   ")
                .finish(),
        );
        assert_eq!(errors.len(), 4);
        assert_eq!(errors["national_id"], "National ID must be exactly 16 digits");
    }

    #[test]
    fn password_rules_apply_in_order() {
        let cases = [
            ("Sh0rt!", "at least 8 characters"),
            ("alllower1!", "uppercase"),
            ("ALLUPPER1!", "lowercase"),
            ("NoDigits!!", "number"),
            ("NoSpecial12", "special character"),
        ];
        for (password, expected) in cases {
            let errors = field_errors(Validator::new().password("password", password).finish());
            assert!(errors["password"].contains(expected), "{}: {}", password, errors["password"]);
        }
    }

    #[test]
    fn priority_must_be_in_range() {
        assert!(Validator::new().priority("priority", Some(5)).finish().is_ok());
        assert!(Validator::new().priority("priority", None).finish().is_ok());
        assert!(Validator::new().priority("priority", Some(0)).finish().is_err());
        assert!(Validator::new().priority("priority", Some(6)).finish().is_err());
    }

    #[test]
    fn converts_to_a_400_with_field_errors() {
        let errors = Validator::new().required("title", "").finish().unwrap_err();
        let err = ApiError::from(errors);
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_json()["field_errors"]["title"], "This field is required");
    }
}
