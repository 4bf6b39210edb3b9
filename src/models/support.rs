use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{validate_email_address, validate_person_name, validate_subject};

/// Public contact form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SupportRequest {
    #[validate(custom(function = "validate_person_name"))]
    pub name: String,
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
    #[validate(custom(function = "validate_subject"))]
    pub subject: String,
    #[validate(length(min = 10, max = 5000, message = "Message must have at least 10 characters."))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_support_request_reports_every_field() {
        let request = SupportRequest {
            name: String::new(),
            email: "nope".to_string(),
            subject: String::new(),
            message: "short".to_string(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 4);
    }
}
