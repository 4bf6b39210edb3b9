use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{NewProfessional, Specialty};
use crate::validation::{
    normalize_email, strip_non_digits, validate_email_address, validate_form,
    validate_login_password, validate_no_whitespace, validate_person_name, validate_specialty,
    validate_tax_id_field, FieldErrors,
};

/// User roles for role-based access control
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Client,
    Professional,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Client => "client",
            UserRole::Professional => "professional",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "client" => Some(UserRole::Client),
            "professional" => Some(UserRole::Professional),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub kind: TokenKind,
    pub exp: usize,
    pub iat: usize,
    /// Token id, used for logout blacklisting.
    pub jti: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
    #[validate(custom(function = "validate_login_password"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterClientRequest {
    #[validate(custom(function = "validate_person_name"))]
    pub name: String,
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
    #[validate(length(min = 6, max = 50, message = "Password must have between 6 and 50 characters."))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub password_confirmation: String,
}

impl RegisterClientRequest {
    /// Validate every field and return the trimmed name and normalized email.
    pub fn normalized(self) -> Result<Self, FieldErrors> {
        validate_form(&self)?;
        Ok(Self {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            ..self
        })
    }
}

/// Text fields of the multipart professional registration form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterProfessionalRequest {
    #[validate(custom(function = "validate_person_name"))]
    pub name: String,
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
    #[validate(
        length(min = 6, message = "Password must have at least 6 characters."),
        custom(function = "validate_no_whitespace")
    )]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match."))]
    pub password_confirmation: String,
    #[validate(custom(function = "validate_specialty"))]
    pub specialty: String,
    pub professional_registry: Option<String>,
    #[validate(custom(function = "validate_tax_id_field"))]
    pub tax_id: String,
}

impl RegisterProfessionalRequest {
    /// Every failing field is reported, never just the first.
    pub fn field_errors(&self) -> FieldErrors {
        validate_form(self).err().unwrap_or_default()
    }

    pub fn into_new_professional(self) -> Result<NewProfessional, FieldErrors> {
        validate_form(&self)?;

        let specialty = Specialty::from_label(&self.specialty).ok_or_else(|| {
            let mut fields = FieldErrors::new();
            fields.insert("specialty".to_string(), "Invalid specialty.".to_string());
            fields
        })?;

        Ok(NewProfessional {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            password: self.password,
            specialty,
            professional_registry: self
                .professional_registry
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            tax_id: strip_non_digits(&self.tax_id),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required."))]
    pub current_password: String,
    #[validate(length(min = 6, max = 50, message = "Password must have between 6 and 50 characters."))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match."))]
    pub new_password_confirmation: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: usize,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Approval status, present for professionals only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_status: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ProfessionalRegistrationResponse {
    pub message: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Password reset outcome handed to the mailer.
#[derive(Debug, Clone)]
pub struct TemporaryPassword {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// User session information
#[derive(Debug, Clone)]
pub struct UserSession {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub jti: String,
}

impl UserSession {
    pub fn from_claims(claims: &Claims) -> Result<Self, uuid::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub)?,
            email: claims.email.clone(),
            role: claims.role,
            jti: claims.jti.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn professional_form() -> RegisterProfessionalRequest {
        RegisterProfessionalRequest {
            name: "  Carla Souza ".to_string(),
            email: " Carla@Example.com".to_string(),
            password: "secret123".to_string(),
            password_confirmation: "secret123".to_string(),
            specialty: "Personal Trainer".to_string(),
            professional_registry: Some("  ".to_string()),
            tax_id: "111.444.777-35".to_string(),
        }
    }

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Client, UserRole::Professional, UserRole::Admin] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::from_str("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_str("athlete"), None);
    }

    #[test]
    fn test_professional_form_normalizes() {
        let professional = professional_form().into_new_professional().unwrap();
        assert_eq!(professional.name, "Carla Souza");
        assert_eq!(professional.email, "carla@example.com");
        assert_eq!(professional.tax_id, "11144477735");
        assert_eq!(professional.specialty, Specialty::PersonalTrainer);
        assert_eq!(professional.professional_registry, None);
    }

    #[test]
    fn test_professional_form_reports_all_failures() {
        let form = RegisterProfessionalRequest {
            name: "Al".to_string(),
            email: "carla".to_string(),
            password: "has space".to_string(),
            password_confirmation: "different".to_string(),
            specialty: "Astrologer".to_string(),
            professional_registry: None,
            tax_id: "11.222.333/0001-82".to_string(),
        };

        let fields = form.field_errors();
        let keys: Vec<_> = fields.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["email", "name", "password", "password_confirmation", "specialty", "tax_id"]
        );
        assert_eq!(fields["tax_id"], "Invalid CNPJ.");
        assert_eq!(fields["password"], "Password cannot contain spaces.");
    }

    #[test]
    fn test_wrong_length_tax_id_message() {
        let mut form = professional_form();
        form.tax_id = "123".to_string();
        assert_eq!(form.field_errors()["tax_id"], "Invalid CPF or CNPJ.");
    }

    #[test]
    fn test_client_form_confirmation_must_match() {
        let form = RegisterClientRequest {
            name: "Bruno Lima".to_string(),
            email: "bruno@example.com".to_string(),
            password: "secret123".to_string(),
            password_confirmation: "secret321".to_string(),
        };
        let fields = form.normalized().unwrap_err();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["password_confirmation"], "Passwords do not match.");
    }

    #[test]
    fn test_login_form() {
        let form = LoginRequest {
            email: "".to_string(),
            password: "123".to_string(),
        };
        let fields = validate_form(&form).unwrap_err();
        assert_eq!(fields["email"], "Email is required.");
        assert_eq!(fields["password"], "Password must have at least 6 characters.");
    }
}
