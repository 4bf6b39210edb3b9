use std::borrow::Cow;
use std::collections::BTreeMap;

use lettre::Address;
use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use super::tax_id::validate_tax_id;
use crate::models::Specialty;

/// Field name -> first failure message for that field.
pub type FieldErrors = BTreeMap<String, String>;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s.][^@\s]*\.[^@\s]+$").expect("valid email regex"));

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 100;

/// Flatten validator output into one message per field.
pub fn collect_field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first()
                .map(|error| (field.to_string(), message_for(error)))
        })
        .collect()
}

/// Run derive validation and flatten failures for a 422 body.
pub fn validate_form<T: Validate>(form: &T) -> Result<(), FieldErrors> {
    form.validate().map_err(|errors| collect_field_errors(&errors))
}

fn message_for(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| error.code.to_string())
}

fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Must also parse as a lettre address, or mail to it could never be sent.
pub fn is_valid_email(email: &str) -> bool {
    let email = normalize_email(email);
    EMAIL_RE.is_match(&email) && email.parse::<Address>().is_ok()
}

pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(field_error("required", "Email is required."));
    }
    if !is_valid_email(email) {
        return Err(field_error(
            "email",
            "Invalid email. Use the format: you@example.com",
        ));
    }
    Ok(())
}

pub fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(field_error("required", "Name is required."));
    }
    if len < NAME_MIN_CHARS {
        return Err(field_error("length", "Name must have at least 3 characters."));
    }
    if len > NAME_MAX_CHARS {
        return Err(field_error("length", "Name must have at most 100 characters."));
    }
    Ok(())
}

/// Non-blank once trimmed, at most `max` characters.
fn required_text(value: &str, max: usize, message: &'static str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len == 0 || len > max {
        return Err(field_error("length", message));
    }
    Ok(())
}

pub fn validate_plan_name(name: &str) -> Result<(), ValidationError> {
    required_text(name, 100, "Plan name must have between 1 and 100 characters.")
}

pub fn validate_training_name(name: &str) -> Result<(), ValidationError> {
    required_text(name, 100, "Name must have between 1 and 100 characters.")
}

pub fn validate_training_goal(goal: &str) -> Result<(), ValidationError> {
    required_text(goal, 100, "Goal is required.")
}

pub fn validate_subject(subject: &str) -> Result<(), ValidationError> {
    required_text(subject, 200, "Subject is required.")
}

pub fn validate_login_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(field_error("required", "Password is required."));
    }
    if password.chars().count() < 6 {
        return Err(field_error("length", "Password must have at least 6 characters."));
    }
    Ok(())
}

pub fn validate_no_whitespace(password: &str) -> Result<(), ValidationError> {
    if password.chars().any(char::is_whitespace) {
        return Err(field_error("whitespace", "Password cannot contain spaces."));
    }
    Ok(())
}

pub fn validate_specialty(specialty: &str) -> Result<(), ValidationError> {
    match Specialty::from_label(specialty) {
        Some(_) => Ok(()),
        None => Err(field_error("specialty", "Invalid specialty.")),
    }
}

pub fn validate_tax_id_field(tax_id: &str) -> Result<(), ValidationError> {
    validate_tax_id(tax_id)
        .map(|_| ())
        .map_err(|e| field_error("tax_id", e.field_message()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("  User@Example.COM "));
        assert!(is_valid_email("test.user@domain.co.uk"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("invalid-email"));
        assert!(!is_valid_email("@domain.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@domain"));
        assert!(!is_valid_email("user@@domain.com"));
        assert!(!is_valid_email("ana,bob@example.com"));
        assert!(!is_valid_email("ana<x>@example.com"));
    }

    #[test]
    fn test_name_bounds() {
        assert!(validate_person_name("Ana").is_ok());
        assert!(validate_person_name("  Al  ").is_err());
        assert!(validate_person_name("").is_err());
        assert!(validate_person_name(&"x".repeat(101)).is_err());
        assert!(validate_person_name(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_blank_text_is_required() {
        assert_eq!(
            validate_plan_name("   ").unwrap_err().message.as_deref(),
            Some("Plan name must have between 1 and 100 characters.")
        );
        assert!(validate_training_name("\t\n").is_err());
        assert!(validate_training_goal(" ").is_err());
        assert!(validate_subject("  ").is_err());
        assert!(validate_training_name(" Hypertrophy A ").is_ok());
        assert!(validate_plan_name(&format!("  {}  ", "x".repeat(100))).is_ok());
        assert!(validate_plan_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(
            validate_login_password("").unwrap_err().message.as_deref(),
            Some("Password is required.")
        );
        assert!(validate_login_password("12345").is_err());
        assert!(validate_login_password("123456").is_ok());
        assert!(validate_no_whitespace("with space").is_err());
        assert!(validate_no_whitespace("nospace").is_ok());
    }

    #[test]
    fn test_tax_id_field_message() {
        let error = validate_tax_id_field("11144477736").unwrap_err();
        assert_eq!(error.message.as_deref(), Some("Invalid CPF."));
        assert!(validate_tax_id_field("111.444.777-35").is_ok());
    }
}
